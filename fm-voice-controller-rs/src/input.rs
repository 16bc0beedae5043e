//! Raw input classification.
//!
//! The host delivers each control-surface message as a short byte slice.
//! Capacitive touch sensors on the knobs share the note-on/off status with
//! the pads, so they are split off first and discarded.

use core::ops::RangeInclusive;

/// Notes the control surface uses for capacitive knob-touch sensing.
pub const TOUCH_NOTES: RangeInclusive<u8> = 0..=9;

/// Kind of channel-voice message, from the status byte's high nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageKind {
    NoteOff,
    NoteOn,
    PolyPressure,
    ControlChange,
    ProgramChange,
    ChannelPressure,
    PitchBend,
}

impl MessageKind {
    /// Decode the high nibble of a status byte; `None` for system messages
    /// and data bytes.
    pub fn from_status(status: u8) -> Option<Self> {
        match status & 0xF0 {
            0x80 => Some(MessageKind::NoteOff),
            0x90 => Some(MessageKind::NoteOn),
            0xA0 => Some(MessageKind::PolyPressure),
            0xB0 => Some(MessageKind::ControlChange),
            0xC0 => Some(MessageKind::ProgramChange),
            0xD0 => Some(MessageKind::ChannelPressure),
            0xE0 => Some(MessageKind::PitchBend),
            _ => None,
        }
    }

    /// Number of data bytes following the status byte.
    pub fn data_len(self) -> usize {
        match self {
            MessageKind::ProgramChange | MessageKind::ChannelPressure => 1,
            _ => 2,
        }
    }

    pub fn is_note(self) -> bool {
        matches!(self, MessageKind::NoteOn | MessageKind::NoteOff)
    }
}

/// A decoded channel-voice message.
///
/// `data2` is 0 for one-data-byte kinds. A note-on with velocity 0 is
/// reported as [`MessageKind::NoteOff`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelMessage {
    pub kind: MessageKind,
    /// MIDI channel, 0–15.
    pub channel: u8,
    pub data1: u8,
    pub data2: u8,
}

/// Result of classifying one raw input message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputEvent {
    /// Capacitive touch on a knob; carries no action.
    Touch,
    /// A well-formed channel-voice message.
    Channel(ChannelMessage),
    /// Empty, truncated, malformed, or a system message.
    Ignored,
}

/// Classify a raw message from the control surface.
///
/// Never fails: anything that is not a complete channel-voice message is
/// [`InputEvent::Ignored`]. Bytes past the expected length are ignored.
///
/// # Examples
///
/// ```
/// use fm_voice_controller::input::{classify, InputEvent, MessageKind};
///
/// match classify(&[0xB0, 63, 127]) {
///     InputEvent::Channel(msg) => {
///         assert_eq!(msg.kind, MessageKind::ControlChange);
///         assert_eq!((msg.data1, msg.data2), (63, 127));
///     }
///     other => panic!("unexpected {:?}", other),
/// }
/// assert_eq!(classify(&[0x90, 3, 127]), InputEvent::Touch);
/// assert_eq!(classify(&[0xB0]), InputEvent::Ignored);
/// ```
pub fn classify(raw: &[u8]) -> InputEvent {
    let Some((&status, data)) = raw.split_first() else {
        return InputEvent::Ignored;
    };

    // Running status and system messages are not handled.
    let Some(mut kind) = MessageKind::from_status(status) else {
        return InputEvent::Ignored;
    };

    let needed = kind.data_len();
    if data.len() < needed || data[..needed].iter().any(|&b| b & 0x80 != 0) {
        return InputEvent::Ignored;
    }

    let data1 = data[0];
    let data2 = if needed == 2 { data[1] } else { 0 };

    if kind.is_note() && TOUCH_NOTES.contains(&data1) {
        return InputEvent::Touch;
    }

    if kind == MessageKind::NoteOn && data2 == 0 {
        kind = MessageKind::NoteOff;
    }

    InputEvent::Channel(ChannelMessage {
        kind,
        channel: status & 0x0F,
        data1,
        data2,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(raw: &[u8]) -> ChannelMessage {
        match classify(raw) {
            InputEvent::Channel(msg) => msg,
            other => panic!("expected channel message, got {:?}", other),
        }
    }

    #[test]
    fn control_change_fields() {
        let msg = channel(&[0xB3, 14, 1]);
        assert_eq!(msg.kind, MessageKind::ControlChange);
        assert_eq!(msg.channel, 3);
        assert_eq!(msg.data1, 14);
        assert_eq!(msg.data2, 1);
    }

    #[test]
    fn touch_notes_are_split_off() {
        assert_eq!(classify(&[0x90, 0, 127]), InputEvent::Touch);
        assert_eq!(classify(&[0x80, 9, 0]), InputEvent::Touch);
        assert_eq!(classify(&[0x9F, 5, 64]), InputEvent::Touch);
        // First pad note is a real note.
        assert_eq!(channel(&[0x90, 68, 100]).kind, MessageKind::NoteOn);
    }

    #[test]
    fn touch_range_does_not_apply_to_cc() {
        assert_eq!(channel(&[0xB0, 3, 127]).kind, MessageKind::ControlChange);
    }

    #[test]
    fn note_on_zero_velocity_is_note_off() {
        assert_eq!(channel(&[0x90, 60, 0]).kind, MessageKind::NoteOff);
        assert_eq!(channel(&[0x80, 60, 64]).kind, MessageKind::NoteOff);
    }

    #[test]
    fn one_byte_kinds() {
        let pc = channel(&[0xC1, 5]);
        assert_eq!(pc.kind, MessageKind::ProgramChange);
        assert_eq!((pc.data1, pc.data2), (5, 0));
        assert_eq!(channel(&[0xD0, 90]).kind, MessageKind::ChannelPressure);
    }

    #[test]
    fn malformed_input_is_ignored() {
        assert_eq!(classify(&[]), InputEvent::Ignored);
        assert_eq!(classify(&[0xB0, 14]), InputEvent::Ignored);
        assert_eq!(classify(&[0x90]), InputEvent::Ignored);
        assert_eq!(classify(&[0xC0]), InputEvent::Ignored);
        // Running status (no status byte).
        assert_eq!(classify(&[14, 1, 0]), InputEvent::Ignored);
        // Data byte with the high bit set.
        assert_eq!(classify(&[0xB0, 0x8E, 1]), InputEvent::Ignored);
    }

    #[test]
    fn system_messages_are_ignored() {
        assert_eq!(classify(&[0xF8]), InputEvent::Ignored);
        assert_eq!(classify(&[0xF0, 0x7E, 0x7F, 0xF7]), InputEvent::Ignored);
    }

    #[test]
    fn trailing_bytes_are_tolerated() {
        assert_eq!(channel(&[0xB0, 62, 127, 0, 0]).data2, 127);
    }

    #[test]
    fn every_channel_nibble_has_a_kind() {
        for status in (0x80u8..=0xE0).step_by(0x10) {
            assert!(MessageKind::from_status(status | 0x05).is_some());
        }
        assert!(MessageKind::from_status(0xF0).is_none());
    }
}
