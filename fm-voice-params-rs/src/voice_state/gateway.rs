use heapless::String;

use super::error::ReadError;
use super::PARAM_TEXT_LEN;

/// A single value as exchanged with the host.
pub type ParamText = String<PARAM_TEXT_LEN>;

/// Parameter names understood by the host DSP engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParamKey {
    /// Current preset index, 0-based.
    Preset,
    /// Number of presets in the loaded bank.
    PresetCount,
    /// Name of the current patch.
    PatchName,
    /// Algorithm number of the current patch, 1-based.
    Algorithm,
    /// Octave transpose applied by the DSP to incoming notes.
    OctaveTranspose,
    /// Number of currently sounding voices (read-only, live).
    Polyphony,
    /// Command: release all voices gracefully.
    AllNotesOff,
    /// Command: silence all voices immediately.
    Panic,
}

impl ParamKey {
    /// Number of distinct keys.
    pub const COUNT: usize = 8;

    /// Every key, in declaration order.
    pub const ALL: [ParamKey; Self::COUNT] = [
        ParamKey::Preset,
        ParamKey::PresetCount,
        ParamKey::PatchName,
        ParamKey::Algorithm,
        ParamKey::OctaveTranspose,
        ParamKey::Polyphony,
        ParamKey::AllNotesOff,
        ParamKey::Panic,
    ];

    /// Host-side name of the parameter.
    pub const fn as_str(self) -> &'static str {
        match self {
            ParamKey::Preset => "preset",
            ParamKey::PresetCount => "preset_count",
            ParamKey::PatchName => "patch_name",
            ParamKey::Algorithm => "algorithm",
            ParamKey::OctaveTranspose => "octave_transpose",
            ParamKey::Polyphony => "polyphony",
            ParamKey::AllNotesOff => "all_notes_off",
            ParamKey::Panic => "panic",
        }
    }

    /// Dense index in `0..COUNT`, usable for per-key tables.
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Host-backed key/value store connecting the controller to the DSP engine.
///
/// Calls never block. A read may return `None`, an empty string, or a value
/// that predates a write made a moment ago; callers treat every read as an
/// eventually-consistent snapshot.
pub trait ParamGateway {
    /// Fetch the current value of `key`, or `None` if the host has none.
    fn get(&self, key: ParamKey) -> Option<ParamText>;

    /// Push `value` for `key` to the host. Delivery is not confirmed.
    fn set(&mut self, key: ParamKey, value: &str);
}

impl<G: ParamGateway + ?Sized> ParamGateway for &mut G {
    fn get(&self, key: ParamKey) -> Option<ParamText> {
        (**self).get(key)
    }

    fn set(&mut self, key: ParamKey, value: &str) {
        (**self).set(key, value)
    }
}

/// Read `key` as trimmed text.
///
/// # Errors
///
/// [`ReadError::Missing`] if the host returned nothing or only whitespace.
pub fn read_text<G>(gateway: &G, key: ParamKey) -> Result<ParamText, ReadError>
where
    G: ParamGateway + ?Sized,
{
    let raw = gateway.get(key).ok_or(ReadError::Missing)?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ReadError::Missing);
    }
    Ok(truncate_into(trimmed))
}

/// Read `key` as a decimal integer and narrow it to `T`.
///
/// Surrounding whitespace and a leading sign are accepted.
///
/// # Errors
///
/// * [`ReadError::Missing`] for an absent or blank value.
/// * [`ReadError::Unparseable`] if the text is not an integer.
/// * [`ReadError::OutOfRange`] if the integer does not fit in `T`.
///
/// # Examples
///
/// ```
/// use fm_voice::voice_state::{read_number, MemoryGateway, ParamKey, ReadError};
///
/// let mut gateway = MemoryGateway::new();
/// gateway.insert(ParamKey::PresetCount, " 16 ");
/// assert_eq!(read_number::<u16, _>(&gateway, ParamKey::PresetCount), Ok(16));
/// assert_eq!(
///     read_number::<u16, _>(&gateway, ParamKey::Algorithm),
///     Err(ReadError::Missing)
/// );
/// ```
pub fn read_number<T, G>(gateway: &G, key: ParamKey) -> Result<T, ReadError>
where
    T: TryFrom<i64>,
    G: ParamGateway + ?Sized,
{
    let text = read_text(gateway, key)?;
    let wide: i64 = text.parse().map_err(|_| ReadError::Unparseable)?;
    T::try_from(wide).map_err(|_| ReadError::OutOfRange)
}

/// Copy `text` into a fixed-capacity string, dropping whatever does not fit.
///
/// Truncation happens on a char boundary, never mid-codepoint.
pub fn truncate_into<const N: usize>(text: &str) -> String<N> {
    let mut out = String::new();
    for ch in text.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}
