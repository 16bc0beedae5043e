//! Status screen for the FM synth voice module.
//!
//! The host owns the physical screen and exposes three primitives: clear,
//! print text, fill rectangle. This crate turns a [`ControllerState`] into
//! calls on those primitives through the [`Screen`] trait, and provides
//! [`GraphicsScreen`] for running the same renderer on any
//! `embedded-graphics` draw target.
//!
//! # Quick Start
//!
//! ```
//! use fm_voice::voice_state::ControllerState;
//! use fm_voice_display_rs::{render_display, DisplayConfig, DisplayState, GraphicsScreen};
//! use embedded_graphics::mock_display::MockDisplay;
//! use embedded_graphics::pixelcolor::BinaryColor;
//!
//! let mut target: MockDisplay<BinaryColor> = MockDisplay::new();
//! target.set_allow_out_of_bounds_drawing(true);
//! target.set_allow_overdraw(true);
//! let mut screen = GraphicsScreen::new(target);
//!
//! let snapshot = DisplayState::capture(&ControllerState::default());
//! render_display(&mut screen, &snapshot, &DisplayConfig::default()).unwrap();
//! ```
//!
//! # Crate Features
//!
//! - **`defmt`** — structured logging via [`defmt`].
//!
//! [`ControllerState`]: fm_voice::voice_state::ControllerState

#![cfg_attr(not(test), no_std)]

pub mod layout;
pub mod screen;

// ── Re-exports for convenience ───────────────────────────────────────────

pub use layout::{render_display, DisplayConfig, DisplayState};
pub use screen::{Color, GraphicsScreen, Screen};
