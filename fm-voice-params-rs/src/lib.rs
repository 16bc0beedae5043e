//! Controller state for an FM synthesizer voice module.
//!
//! The host owns the DSP engine and exposes it as a string key/value store
//! (the parameter gateway). This crate holds the local, display-oriented
//! copy of that state and the bounded operations that keep the two in step.
//!
//! See [`voice_state`] for the data model.

#![cfg_attr(not(test), no_std)]

pub mod voice_state;
