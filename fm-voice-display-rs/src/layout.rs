//! Display layout types and rendering logic.
//!
//! This module defines the immutable [`DisplayState`] snapshot, the
//! [`DisplayConfig`] geometry, and the [`render_display`] function that
//! paints one frame through a [`Screen`].

use core::fmt::Write;

use fm_voice::voice_state::{ControllerState, PatchName};
use heapless::String;

use crate::screen::{Color, Screen};

/// Capacity of one rendered text line.
const LINE_LEN: usize = 48;

/// One line of rendered text.
pub type Line = String<LINE_LEN>;

// ── DisplayConfig ────────────────────────────────────────────────────────

/// Title and layout geometry for the status screen.
///
/// All layout geometry lives here; there are **no** module-level layout
/// constants. [`DisplayConfig::default()`] is the DX7 layout on a 128×64
/// canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Text in the title bar. Default: `"DX7 Synth"`.
    pub title: &'static str,
    /// Canvas width in pixels. Default: 128.
    pub display_width: u32,
    /// Left edge of every text line. Default: 2.
    pub margin_x: i32,
    /// Top of the title text. Default: 2.
    pub title_y: i32,
    /// Top of the rule under the title. Default: 12.
    pub rule_y: i32,
    /// Thickness of the rule. Default: 1.
    pub rule_height: u32,
    /// Top of the `"NN: name"` line. Default: 18.
    pub preset_y: i32,
    /// Top of the algorithm line. Default: 30.
    pub algorithm_y: i32,
    /// Top of the octave/voices line. Default: 42.
    pub status_y: i32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: "DX7 Synth",
            display_width: 128,
            margin_x: 2,
            title_y: 2,
            rule_y: 12,
            rule_height: 1,
            preset_y: 18,
            algorithm_y: 30,
            status_y: 42,
        }
    }
}

// ── DisplayState ─────────────────────────────────────────────────────────

/// Immutable snapshot of everything the screen needs to render one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayState {
    /// Preset number as shown, 1-based.
    pub preset_number: u32,
    pub patch_name: PatchName,
    pub algorithm: u8,
    pub octave_transpose: i8,
    pub voice_count: u16,
}

impl DisplayState {
    /// Copy the displayed fields out of the controller state.
    pub fn capture(state: &ControllerState) -> Self {
        Self {
            preset_number: u32::from(state.current_preset()) + 1,
            patch_name: fm_voice::voice_state::truncate_into(state.patch_name()),
            algorithm: state.algorithm(),
            octave_transpose: state.octave_transpose(),
            voice_count: state.voice_count(),
        }
    }

    /// `"NN: name"`, number zero-padded to two digits.
    ///
    /// A name too long for the line is cut off.
    pub fn preset_line(&self) -> Line {
        let mut line = Line::new();
        let _ = write!(line, "{:02}: ", self.preset_number);
        for ch in self.patch_name.chars() {
            if line.push(ch).is_err() {
                break;
            }
        }
        line
    }

    /// `"Algorithm: N"`.
    pub fn algorithm_line(&self) -> Line {
        let mut line = Line::new();
        let _ = write!(line, "Algorithm: {}", self.algorithm);
        line
    }

    /// `"Oct:+N  Voices:N"`; zero and positive transposes carry a `+`.
    pub fn status_line(&self) -> Line {
        let mut line = Line::new();
        let _ = write!(
            line,
            "Oct:{:+}  Voices:{}",
            self.octave_transpose, self.voice_count
        );
        line
    }
}

// ── Rendering ────────────────────────────────────────────────────────────

/// Paint a [`DisplayState`] onto `screen`.
///
/// # Layout
///
/// ```text
/// ┌──────────────────────────────┐
/// │ DX7 Synth                    │  ← title_y
/// ├──────────────────────────────┤  ← rule_y
/// │ 01: BRASS   1                │  ← preset_y
/// │ Algorithm: 22                │  ← algorithm_y
/// │ Oct:+0  Voices:3             │  ← status_y
/// └──────────────────────────────┘
/// ```
///
/// # Errors
///
/// Returns the first error reported by the screen; later primitives are
/// not attempted.
pub fn render_display<S>(
    screen: &mut S,
    state: &DisplayState,
    config: &DisplayConfig,
) -> Result<(), S::Error>
where
    S: Screen + ?Sized,
{
    screen.clear_screen()?;

    // ── Title bar ────────────────────────────────────────────────────
    screen.print_text(config.margin_x, config.title_y, config.title, Color::On)?;
    screen.fill_rect(
        0,
        config.rule_y,
        config.display_width,
        config.rule_height,
        Color::On,
    )?;

    // ── Body ─────────────────────────────────────────────────────────
    screen.print_text(config.margin_x, config.preset_y, &state.preset_line(), Color::On)?;
    screen.print_text(
        config.margin_x,
        config.algorithm_y,
        &state.algorithm_line(),
        Color::On,
    )?;
    screen.print_text(config.margin_x, config.status_y, &state.status_line(), Color::On)?;

    Ok(())
}

// ── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use fm_voice::voice_state::{MemoryGateway, ParamKey, StateDefaults};

    #[derive(Debug, PartialEq)]
    enum Call {
        Clear,
        Text(i32, i32, std::string::String),
        Rect(i32, i32, u32, u32),
    }

    #[derive(Default)]
    struct RecordingScreen {
        calls: Vec<Call>,
    }

    impl Screen for RecordingScreen {
        type Error = core::convert::Infallible;

        fn clear_screen(&mut self) -> Result<(), Self::Error> {
            self.calls.push(Call::Clear);
            Ok(())
        }

        fn print_text(&mut self, x: i32, y: i32, text: &str, _: Color) -> Result<(), Self::Error> {
            self.calls.push(Call::Text(x, y, text.into()));
            Ok(())
        }

        fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, _: Color) -> Result<(), Self::Error> {
            self.calls.push(Call::Rect(x, y, w, h));
            Ok(())
        }
    }

    /// Fails on the first text call.
    struct BrokenScreen {
        cleared: bool,
    }

    impl Screen for BrokenScreen {
        type Error = ();

        fn clear_screen(&mut self) -> Result<(), ()> {
            self.cleared = true;
            Ok(())
        }

        fn print_text(&mut self, _: i32, _: i32, _: &str, _: Color) -> Result<(), ()> {
            Err(())
        }

        fn fill_rect(&mut self, _: i32, _: i32, _: u32, _: u32, _: Color) -> Result<(), ()> {
            panic!("fill_rect must not run after a failed print");
        }
    }

    fn snapshot(preset: u32, name: &str, alg: u8, oct: i8, voices: u16) -> DisplayState {
        DisplayState {
            preset_number: preset,
            patch_name: fm_voice::voice_state::truncate_into(name),
            algorithm: alg,
            octave_transpose: oct,
            voice_count: voices,
        }
    }

    #[test]
    fn default_config_values() {
        let c = DisplayConfig::default();
        assert_eq!(c.title, "DX7 Synth");
        assert_eq!(c.display_width, 128);
        assert_eq!(c.rule_y, 12);
        assert_eq!((c.preset_y, c.algorithm_y, c.status_y), (18, 30, 42));
    }

    #[test]
    fn capture_copies_state() {
        let mut gw = MemoryGateway::new();
        gw.insert(ParamKey::Preset, "4");
        gw.insert(ParamKey::PatchName, "STRINGS 2");
        gw.insert(ParamKey::Algorithm, "2");
        gw.insert(ParamKey::Polyphony, "6");
        let state = ControllerState::load(&gw, &StateDefaults::default());

        let snap = DisplayState::capture(&state);
        assert_eq!(snap.preset_number, 5);
        assert_eq!(snap.patch_name.as_str(), "STRINGS 2");
        assert_eq!(snap.algorithm, 2);
        assert_eq!(snap.voice_count, 6);
    }

    #[test]
    fn preset_line_zero_pads() {
        assert_eq!(snapshot(1, "Init", 1, 0, 0).preset_line().as_str(), "01: Init");
        assert_eq!(snapshot(32, "X", 1, 0, 0).preset_line().as_str(), "32: X");
        assert_eq!(snapshot(128, "X", 1, 0, 0).preset_line().as_str(), "128: X");
    }

    #[test]
    fn status_line_signs() {
        assert_eq!(snapshot(1, "", 1, 0, 0).status_line().as_str(), "Oct:+0  Voices:0");
        assert_eq!(snapshot(1, "", 1, 3, 12).status_line().as_str(), "Oct:+3  Voices:12");
        assert_eq!(snapshot(1, "", 1, -2, 1).status_line().as_str(), "Oct:-2  Voices:1");
    }

    #[test]
    fn algorithm_line_format() {
        assert_eq!(snapshot(1, "", 22, 0, 0).algorithm_line().as_str(), "Algorithm: 22");
    }

    #[test]
    fn render_emits_layout_in_order() {
        let mut screen = RecordingScreen::default();
        let state = snapshot(7, "E.PIANO 1", 5, -1, 2);
        render_display(&mut screen, &state, &DisplayConfig::default()).unwrap();

        assert_eq!(
            screen.calls,
            [
                Call::Clear,
                Call::Text(2, 2, "DX7 Synth".into()),
                Call::Rect(0, 12, 128, 1),
                Call::Text(2, 18, "07: E.PIANO 1".into()),
                Call::Text(2, 30, "Algorithm: 5".into()),
                Call::Text(2, 42, "Oct:-1  Voices:2".into()),
            ]
        );
    }

    #[test]
    fn render_uses_configured_title() {
        let mut screen = RecordingScreen::default();
        let config = DisplayConfig {
            title: "TX816",
            ..DisplayConfig::default()
        };
        render_display(&mut screen, &DisplayState::default(), &config).unwrap();
        assert_eq!(screen.calls[1], Call::Text(2, 2, "TX816".into()));
    }

    #[test]
    fn render_stops_at_first_error() {
        let mut screen = BrokenScreen { cleared: false };
        let result = render_display(&mut screen, &DisplayState::default(), &DisplayConfig::default());
        assert!(result.is_err());
        assert!(screen.cleared);
    }
}
