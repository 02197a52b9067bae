//! Audio-related small types and handles.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::catalog::Track;

#[derive(Debug)]
pub enum AudioCmd {
    /// Start playing the track at the given index of the current list.
    Play(usize),
    /// Replace the track list (folder switch). Stops nothing by itself,
    /// but the playing index no longer refers to the new list.
    SetTracks(Vec<Track>),
    /// Stop playback immediately.
    Stop,
    /// Toggle pause/resume.
    TogglePause,
    /// Set sink gain, 0.0-1.0.
    SetVolume(f32),
    /// Seek to an absolute position in the current track.
    SeekTo(Duration),
    /// Seek by the specified number of seconds (positive or negative).
    SeekBy(i32),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// Runtime playback information shared with the UI and MPRIS.
#[derive(Debug, Clone)]
pub struct PlaybackInfo {
    /// Index of the current track in the list last sent via `SetTracks`.
    /// `None` after a list swap even while the old track keeps playing.
    pub index: Option<usize>,
    /// Elapsed playback time for the current track.
    pub elapsed: Duration,
    /// Total duration, when the track's header could be probed.
    pub duration: Option<Duration>,
    /// Whether playback is currently active.
    pub playing: bool,
    /// Display name of the current track, kept across list swaps.
    pub title: Option<String>,
    /// Source URL of the current track.
    pub url: Option<String>,
}

impl Default for PlaybackInfo {
    fn default() -> Self {
        Self {
            index: None,
            elapsed: Duration::ZERO,
            duration: None,
            playing: false,
            title: None,
            url: None,
        }
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;

/// New elapsed position after scrubbing by `secs` from `elapsed`.
/// Clamped at zero; the thread clamps the upper bound against the duration.
pub(super) fn scrub_from(elapsed: Duration, secs: i32) -> Duration {
    let cur = elapsed.as_secs() as i64;
    Duration::from_secs((cur + i64::from(secs)).max(0) as u64)
}
