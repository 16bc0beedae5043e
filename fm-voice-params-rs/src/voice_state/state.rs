use core::fmt::Write;

use heapless::String;

use super::gateway::{read_number, read_text, truncate_into, ParamGateway, ParamKey};
use super::{COMMAND_TRIGGER, OCTAVE_MAX, OCTAVE_MIN, PATCH_NAME_LEN};

/// Cached patch name as shown on screen.
pub type PatchName = String<PATCH_NAME_LEN>;

/// Fallback values used whenever the host cannot supply one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateDefaults {
    /// Bank size assumed when `preset_count` is missing. Default: 32.
    pub preset_count: u16,
    /// Algorithm shown when `algorithm` is missing. Default: 1.
    pub algorithm: u8,
    /// Name shown before the host reports one. Default: `"Init"`.
    pub patch_name: &'static str,
}

impl Default for StateDefaults {
    fn default() -> Self {
        Self {
            preset_count: 32,
            algorithm: 1,
            patch_name: "Init",
        }
    }
}

/// Local copy of the host-owned voice state, plus the display dirty flag.
///
/// # Invariants
///
/// * `preset_count > 0`
/// * `current_preset < preset_count`
/// * `algorithm >= 1`
/// * `OCTAVE_MIN <= octave_transpose <= OCTAVE_MAX`
///
/// Fields are private so the invariants cannot be bypassed; every mutator
/// sets `needs_redraw`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerState {
    current_preset: u16,
    preset_count: u16,
    patch_name: PatchName,
    algorithm: u8,
    octave_transpose: i8,
    voice_count: u16,
    needs_redraw: bool,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self::new(&StateDefaults::default())
    }
}

impl ControllerState {
    /// State before anything has been read from the host.
    ///
    /// `needs_redraw` starts `true` so the first tick always paints.
    pub fn new(defaults: &StateDefaults) -> Self {
        Self {
            current_preset: 0,
            preset_count: defaults.preset_count.max(1),
            patch_name: truncate_into(defaults.patch_name),
            algorithm: defaults.algorithm.max(1),
            octave_transpose: 0,
            voice_count: 0,
            needs_redraw: true,
        }
    }

    /// Build the initial state from whatever the host currently reports.
    ///
    /// Reads `preset_count`, `patch_name`, `preset`, `algorithm`,
    /// `octave_transpose` and `polyphony`. Each read that is missing,
    /// unparseable or out of range falls back to `defaults` (or 0 for the
    /// index, transpose and voice count). A stored preset index outside the
    /// bank is wrapped into range.
    pub fn load<G>(gateway: &G, defaults: &StateDefaults) -> Self
    where
        G: ParamGateway + ?Sized,
    {
        let mut state = Self::new(defaults);

        match read_number::<u16, _>(gateway, ParamKey::PresetCount) {
            Ok(count) if count > 0 => state.preset_count = count,
            _ => {
                #[cfg(feature = "defmt")]
                defmt::warn!("preset_count unavailable, assuming {}", state.preset_count);
            }
        }

        if let Ok(name) = read_text(gateway, ParamKey::PatchName) {
            state.patch_name = truncate_into(&name);
        }

        if let Ok(index) = read_number::<i32, _>(gateway, ParamKey::Preset) {
            state.current_preset = state.wrap_index(index);
        }

        if let Ok(alg) = read_number::<u8, _>(gateway, ParamKey::Algorithm) {
            if alg >= 1 {
                state.algorithm = alg;
            }
        }

        if let Ok(octave) = read_number::<i32, _>(gateway, ParamKey::OctaveTranspose) {
            state.octave_transpose = clamp_octave(octave);
        }

        if let Ok(voices) = read_number::<u16, _>(gateway, ParamKey::Polyphony) {
            state.voice_count = voices;
        }

        #[cfg(feature = "defmt")]
        defmt::info!(
            "voice state loaded: preset {}/{}, alg {}",
            state.current_preset + 1,
            state.preset_count,
            state.algorithm
        );

        state
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// Current preset index, 0-based.
    pub fn current_preset(&self) -> u16 {
        self.current_preset
    }

    /// Number of presets in the bank (always > 0).
    pub fn preset_count(&self) -> u16 {
        self.preset_count
    }

    pub fn patch_name(&self) -> &str {
        &self.patch_name
    }

    /// Algorithm number, 1-based.
    pub fn algorithm(&self) -> u8 {
        self.algorithm
    }

    pub fn octave_transpose(&self) -> i8 {
        self.octave_transpose
    }

    /// Voices sounding at the last sync.
    pub fn voice_count(&self) -> u16 {
        self.voice_count
    }

    // ── Dirty flag ───────────────────────────────────────────────────

    /// Whether the display is stale relative to this state.
    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// Mark the display stale without changing any field.
    pub fn mark_redraw(&mut self) {
        self.needs_redraw = true;
    }

    /// Clear the dirty flag. Call only once a repaint has completed.
    pub fn clear_redraw(&mut self) {
        self.needs_redraw = false;
    }

    /// Note-on/off traffic arrived; voice activity may have changed.
    pub fn mark_activity(&mut self) {
        self.needs_redraw = true;
    }

    // ── Preset selection ─────────────────────────────────────────────

    /// Wrap any integer into `[0, preset_count)`.
    ///
    /// `-1` maps to the last preset and `preset_count` maps to 0.
    pub fn wrap_index(&self, index: i32) -> u16 {
        // rem_euclid result is in [0, preset_count), which fits in u16.
        index.rem_euclid(i32::from(self.preset_count)) as u16
    }

    /// Switch to preset `index`, wrapping it into the bank.
    ///
    /// In order:
    /// 1. send `panic` so no voice from the old patch keeps ringing,
    /// 2. write the new index to `preset`,
    /// 3. read back `patch_name` and `algorithm`,
    /// 4. mark the display stale.
    ///
    /// A missing name becomes `"Patch N"` (1-based); a missing or invalid
    /// algorithm keeps the previous one. Re-selecting the current preset
    /// re-sends both commands so the host can re-sync after a dropped write.
    pub fn select_preset<G>(&mut self, gateway: &mut G, index: i32)
    where
        G: ParamGateway + ?Sized,
    {
        let index = self.wrap_index(index);

        gateway.set(ParamKey::Panic, COMMAND_TRIGGER);
        self.current_preset = index;

        let mut value: String<8> = String::new();
        let _ = write!(value, "{}", index);
        gateway.set(ParamKey::Preset, &value);

        match read_text(&*gateway, ParamKey::PatchName) {
            Ok(name) => self.patch_name = truncate_into(&name),
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("patch_name unavailable ({}), using placeholder", _e);
                self.patch_name.clear();
                let _ = write!(self.patch_name, "Patch {}", u32::from(index) + 1);
            }
        }

        match read_number::<u8, _>(&*gateway, ParamKey::Algorithm) {
            Ok(alg) if alg >= 1 => self.algorithm = alg,
            _ => {
                #[cfg(feature = "defmt")]
                defmt::warn!("algorithm unavailable, keeping {}", self.algorithm);
            }
        }

        self.needs_redraw = true;

        #[cfg(feature = "defmt")]
        defmt::info!(
            "Preset {}: {} (Alg {})",
            self.current_preset + 1,
            self.patch_name.as_str(),
            self.algorithm
        );
    }

    /// Move one preset forward, wrapping past the end of the bank.
    pub fn next_preset<G>(&mut self, gateway: &mut G)
    where
        G: ParamGateway + ?Sized,
    {
        self.select_preset(gateway, i32::from(self.current_preset) + 1);
    }

    /// Move one preset back, wrapping past the start of the bank.
    pub fn previous_preset<G>(&mut self, gateway: &mut G)
    where
        G: ParamGateway + ?Sized,
    {
        self.select_preset(gateway, i32::from(self.current_preset) - 1);
    }

    // ── Octave transpose ─────────────────────────────────────────────

    /// Shift the octave transpose by `delta`, saturating at the limits.
    ///
    /// Sends `all_notes_off` first so held notes release at their old pitch,
    /// then writes the clamped value to `octave_transpose`. Requests beyond
    /// the range saturate silently.
    pub fn adjust_octave<G>(&mut self, gateway: &mut G, delta: i32)
    where
        G: ParamGateway + ?Sized,
    {
        gateway.set(ParamKey::AllNotesOff, COMMAND_TRIGGER);

        self.octave_transpose =
            clamp_octave(i32::from(self.octave_transpose).saturating_add(delta));

        let mut value: String<4> = String::new();
        let _ = write!(value, "{}", self.octave_transpose);
        gateway.set(ParamKey::OctaveTranspose, &value);

        self.needs_redraw = true;

        #[cfg(feature = "defmt")]
        defmt::info!("Octave transpose: {}", self.octave_transpose);
    }

    // ── Live sync ────────────────────────────────────────────────────

    /// Refresh the voice count from the host.
    ///
    /// A failed read keeps the previous count. Returns `true` (and marks the
    /// display stale) only if the count changed.
    pub fn sync_voice_count<G>(&mut self, gateway: &G) -> bool
    where
        G: ParamGateway + ?Sized,
    {
        match read_number::<u16, _>(gateway, ParamKey::Polyphony) {
            Ok(voices) if voices != self.voice_count => {
                self.voice_count = voices;
                self.needs_redraw = true;
                true
            }
            _ => false,
        }
    }
}

fn clamp_octave(value: i32) -> i8 {
    // Clamped into the i8 range, so the cast is lossless.
    value.clamp(i32::from(OCTAVE_MIN), i32::from(OCTAVE_MAX)) as i8
}
