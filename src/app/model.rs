use std::time::Duration;

use crate::catalog::{Album, Track};

/// Which list the keyboard is driving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Albums,
    Tracks,
}

/// Coarse transport state mirrored from the audio thread's snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// The whole UI-facing state of the player.
///
/// Playback itself lives on the audio thread; this struct only keeps what
/// the interface needs to render and to decide what commands to send.
pub struct App {
    pub albums: Vec<Album>,
    pub tracks: Vec<Track>,
    /// Folder the current track list belongs to (empty for the root listing).
    pub current_folder: String,
    pub selected_album: usize,
    pub selected_track: usize,
    pub focus: Pane,
    pub sidebar_visible: bool,
    pub playback: PlaybackState,
    /// Volume as shown in the UI, 0-100.
    pub volume: u8,
    pub metadata_window: bool,
    /// Monotonic token for track loads; results from a superseded load
    /// are discarded.
    generation: u64,
}

impl App {
    pub fn new() -> Self {
        Self {
            albums: Vec::new(),
            tracks: Vec::new(),
            current_folder: String::new(),
            selected_album: 0,
            selected_track: 0,
            focus: Pane::Albums,
            sidebar_visible: true,
            playback: PlaybackState::Stopped,
            volume: 50,
            metadata_window: false,
            generation: 0,
        }
    }

    /// Start a track load for `folder`; returns the generation token the
    /// result must carry to be applied.
    pub fn begin_track_load(&mut self, folder: &str) -> u64 {
        self.generation += 1;
        self.current_folder = folder.to_string();
        self.generation
    }

    /// Apply a finished track load. Returns `false` (and changes nothing)
    /// when a later load has been started since.
    pub fn apply_tracks(&mut self, generation: u64, tracks: Vec<Track>) -> bool {
        if generation != self.generation {
            return false;
        }
        self.tracks = tracks;
        self.selected_track = 0;
        true
    }

    pub fn set_albums(&mut self, albums: Vec<Album>) {
        self.albums = albums;
        if self.selected_album >= self.albums.len() {
            self.selected_album = self.albums.len().saturating_sub(1);
        }
    }

    /// Index after `current` in the track list, or `None` at the end.
    /// No wraparound; `None` in means `None` out.
    pub fn next_track(&self, current: Option<usize>) -> Option<usize> {
        let i = current?;
        let next = i.checked_add(1)?;
        (next < self.tracks.len()).then_some(next)
    }

    /// Index before `current`, or `None` at the start.
    pub fn prev_track(&self, current: Option<usize>) -> Option<usize> {
        let i = current?;
        i.checked_sub(1)
    }

    pub fn set_volume(&mut self, volume: u8) {
        self.volume = volume.min(100);
    }

    /// Mute to 0, or bring a muted player back to the 50% default.
    /// A plain toggle: the pre-mute level is not remembered.
    pub fn toggle_mute(&mut self) {
        self.volume = if self.volume > 0 { 0 } else { 50 };
    }

    /// Volume as the 0.0-1.0 gain the audio sink expects.
    pub fn volume_level(&self) -> f32 {
        f32::from(self.volume) / 100.0
    }

    /// Absolute seek position for a click at `fraction` of the seek bar.
    /// The fraction is clamped to 0..=1; a non-finite value seeks to the start.
    pub fn seek_target(duration: Duration, fraction: f64) -> Duration {
        if !fraction.is_finite() {
            return Duration::ZERO;
        }
        duration.mul_f64(fraction.clamp(0.0, 1.0))
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_visible = !self.sidebar_visible;
        if !self.sidebar_visible {
            self.focus = Pane::Tracks;
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Pane::Albums => Pane::Tracks,
            Pane::Tracks if self.sidebar_visible => Pane::Albums,
            Pane::Tracks => Pane::Tracks,
        };
    }

    /// Move the focused list's selection down one row.
    pub fn select_next(&mut self) {
        match self.focus {
            Pane::Albums => {
                if self.selected_album + 1 < self.albums.len() {
                    self.selected_album += 1;
                }
            }
            Pane::Tracks => {
                if self.selected_track + 1 < self.tracks.len() {
                    self.selected_track += 1;
                }
            }
        }
    }

    /// Move the focused list's selection up one row.
    pub fn select_prev(&mut self) {
        match self.focus {
            Pane::Albums => self.selected_album = self.selected_album.saturating_sub(1),
            Pane::Tracks => self.selected_track = self.selected_track.saturating_sub(1),
        }
    }

    pub fn current_album(&self) -> Option<&Album> {
        self.albums.get(self.selected_album)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
