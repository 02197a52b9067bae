//! Audio playback subsystem.
//!
//! A dedicated thread owns the output stream and the current sink; the UI
//! talks to it exclusively through [`AudioCmd`] messages and reads back a
//! shared [`PlaybackInfo`] snapshot. Track bytes are fetched over HTTP and
//! cached for the lifetime of the current track so seeking never refetches.

mod player;
mod sink;
mod thread;
mod types;

pub use player::AudioPlayer;
pub use types::{AudioCmd, PlaybackHandle, PlaybackInfo};

#[cfg(test)]
mod tests;
