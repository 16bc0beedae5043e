//! Host-driven controller for an FM synthesizer voice module.
//!
//! Wires the shared [`ControllerState`], the host parameter gateway and the
//! status screen into the three callbacks a host runtime drives:
//!
//! 1. `init` loads the state from the gateway and schedules a first paint.
//! 2. `on_input_internal` classifies a raw control-surface message, maps
//!    controller changes to preset/octave actions and pushes the result to
//!    the gateway.
//! 3. `tick` refreshes the live voice count and repaints when the dirty
//!    flag is set or the forced-refresh interval has elapsed.
//!
//! The host serializes all callbacks, so nothing here locks.
//!
//! [`ControllerState`]: fm_voice::voice_state::ControllerState

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod dispatch;
pub mod input;
pub mod module;
pub mod scheduler;

pub use config::{ControlMap, ControllerConfig};
pub use dispatch::{dispatch, CcAction};
pub use input::{classify, ChannelMessage, InputEvent, MessageKind};
pub use module::{HostModule, VoiceController};
pub use scheduler::RedrawScheduler;
