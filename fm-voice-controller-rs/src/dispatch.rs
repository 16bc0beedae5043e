//! Controller-change dispatch.
//!
//! Maps one CC event to at most one action. Rules are checked in priority
//! order and the first match wins:
//!
//! | control   | value        | action        |
//! |-----------|--------------|---------------|
//! | left      | > 0          | previous preset |
//! | right     | > 0          | next preset   |
//! | plus      | > 0          | octave up     |
//! | minus     | > 0          | octave down   |
//! | jog wheel | 1            | next preset   |
//! | jog wheel | 127 or 65    | previous preset |
//! | jog wheel | anything else | absorbed (no-op) |
//! | other     | any          | unhandled     |
//!
//! Buttons act on the press edge only; the release (value 0) is ignored.

use crate::config::ControlMap;

/// Jog-wheel value for one detent clockwise.
const JOG_FORWARD: u8 = 1;

/// Jog-wheel values for one detent counter-clockwise (two's complement and
/// sign-magnitude encoders).
const JOG_BACKWARD: [u8; 2] = [127, 65];

/// What a CC event asks the controller to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CcAction {
    PresetNext,
    PresetPrev,
    OctaveUp,
    OctaveDown,
    /// A jog-wheel value with no meaning. Consumed, nothing happens.
    Absorbed,
    /// Not one of our controls; a surrounding layer may act on it.
    Unhandled,
}

impl CcAction {
    /// Whether the event was consumed and must not reach global handling.
    pub fn is_handled(self) -> bool {
        self != CcAction::Unhandled
    }
}

/// Map a controller change to an action.
///
/// # Examples
///
/// ```
/// use fm_voice_controller::{dispatch, CcAction, ControlMap};
///
/// let map = ControlMap::default();
/// assert_eq!(dispatch(&map, map.right, 127), CcAction::PresetNext);
/// assert_eq!(dispatch(&map, map.right, 0), CcAction::Unhandled);
/// assert_eq!(dispatch(&map, map.jog_wheel, 127), CcAction::PresetPrev);
/// ```
pub fn dispatch(map: &ControlMap, controller: u8, value: u8) -> CcAction {
    let pressed = value > 0;

    if controller == map.left && pressed {
        CcAction::PresetPrev
    } else if controller == map.right && pressed {
        CcAction::PresetNext
    } else if controller == map.plus && pressed {
        CcAction::OctaveUp
    } else if controller == map.minus && pressed {
        CcAction::OctaveDown
    } else if controller == map.jog_wheel {
        if value == JOG_FORWARD {
            CcAction::PresetNext
        } else if JOG_BACKWARD.contains(&value) {
            CcAction::PresetPrev
        } else {
            CcAction::Absorbed
        }
    } else {
        CcAction::Unhandled
    }
}
