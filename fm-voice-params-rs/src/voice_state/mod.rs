//! Voice controller state and the host parameter gateway.
//!
//! This module provides [`ControllerState`], the single process-wide copy of
//! everything the module displays, and the [`ParamGateway`] trait through
//! which it talks to the host-owned DSP engine.
//!
//! # Architecture
//!
//! ```text
//!   input event ──► select_preset / adjust_octave ──► gateway.set(..)
//!                              │
//!                              ▼
//!                     ControllerState.needs_redraw ──► next tick repaints
//!                              ▲
//!   host tick ──► sync_voice_count ◄── gateway.get(polyphony)
//! ```
//!
//! # Gateway reads
//!
//! The gateway has no delivery guarantees. Reads may come back empty, stale
//! or garbled; every read goes through [`read_text`] or [`read_number`] and
//! the caller maps a [`ReadError`] to a documented default. No operation in
//! this module fails.
//!
//! # Change tracking
//!
//! [`ControllerState`] carries a single display flag, `needs_redraw`. Every
//! mutation sets it; only the redraw scheduler clears it, and only after a
//! repaint has completed.
//!
//! # `no_std` Compatibility
//!
//! No heap allocation. Text is held in fixed-capacity [`heapless::String`]s
//! and silently truncated on a char boundary.

mod error;
mod gateway;
mod memory;
mod state;

pub use error::ReadError;
pub use gateway::{read_number, read_text, truncate_into, ParamGateway, ParamKey, ParamText};
pub use memory::MemoryGateway;
pub use state::{ControllerState, PatchName, StateDefaults};

/// Capacity in bytes of a single gateway value.
pub const PARAM_TEXT_LEN: usize = 64;

/// Capacity in bytes of a cached patch name.
pub const PATCH_NAME_LEN: usize = 32;

/// Lowest octave transpose the controller will request.
pub const OCTAVE_MIN: i8 = -4;

/// Highest octave transpose the controller will request.
pub const OCTAVE_MAX: i8 = 4;

/// Value written for fire-and-forget commands (`panic`, `all_notes_off`).
pub const COMMAND_TRIGGER: &str = "1";
