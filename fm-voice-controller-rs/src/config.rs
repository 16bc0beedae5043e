//! Controller configuration.
//!
//! One [`ControllerConfig`] describes a synth model and the control surface
//! it runs on. Variants for other FM models reuse the same controller with
//! a different config instead of a copy of the logic.

use fm_voice::voice_state::StateDefaults;
use fm_voice_display_rs::DisplayConfig;

/// Controller numbers of the navigation controls on the surface.
///
/// Defaults match an Ableton Move: main jog wheel on CC 14, left/right
/// arrows on 62/63, up/down (octave plus/minus) on 55/54.
///
/// Give every control its own number. When two share one,
/// [`dispatch`](crate::dispatch) takes the first matching rule (left,
/// right, plus, minus, then the jog wheel): a button on the jog wheel's
/// number turns every non-zero jog value into that button's action, and
/// only value 0 reaches the jog-wheel rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlMap {
    /// Relative encoder used to scroll presets.
    pub jog_wheel: u8,
    /// Previous preset.
    pub left: u8,
    /// Next preset.
    pub right: u8,
    /// Octave up.
    pub plus: u8,
    /// Octave down.
    pub minus: u8,
}

impl Default for ControlMap {
    fn default() -> Self {
        Self {
            jog_wheel: 14,
            left: 62,
            right: 63,
            plus: 55,
            minus: 54,
        }
    }
}

/// Everything that varies between synth models and control surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Values assumed when the host cannot report one.
    pub defaults: StateDefaults,
    /// CC numbers of the navigation controls.
    pub controls: ControlMap,
    /// Force a repaint at least every this many ticks. Default: 6
    /// (≈10 Hz at a 60 Hz host tick).
    pub redraw_interval: u32,
    /// Title and geometry of the status screen.
    pub display: DisplayConfig,
}

impl ControllerConfig {
    /// DX7 voice on the default control surface.
    pub fn dx7() -> Self {
        Self {
            defaults: StateDefaults::default(),
            controls: ControlMap::default(),
            redraw_interval: 6,
            display: DisplayConfig::default(),
        }
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::dx7()
    }
}
