//! Hardware- and renderer-agnostic RSVP reading engine.
//!
//! Text goes in once through [`tokenizer`]; afterwards the host calls
//! [`engine::Engine::tick`] once per display frame and pulls the current
//! state back out. Nothing in this crate performs I/O or reads a clock.

pub mod engine;
pub mod focus;
pub mod pacing;
pub mod playback;
pub mod settings;
pub mod tokenizer;
pub mod view_sync;
