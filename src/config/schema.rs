use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/shelfplay/config.toml` or `~/.config/shelfplay/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `SHELFPLAY__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub audio: AudioSettings,
    pub ui: UiSettings,
    pub controls: ControlsSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            audio: AudioSettings::default(),
            ui: UiSettings::default(),
            controls: ControlsSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Base URL of the static file server hosting the album folders.
    pub base_url: String,
    /// Path segment under which album folders live (also the root listing).
    pub listing_path: String,
    /// Name of the per-album metadata file.
    pub metadata_file: String,
    /// Name of the per-album cover image.
    pub cover_file: String,
    /// Reference substituted when an album's cover cannot be fetched,
    /// relative to the base URL.
    pub fallback_cover: String,
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            listing_path: "songs".to_string(),
            metadata_file: "info.json".to_string(),
            cover_file: "Cover.jpg".to_string(),
            fallback_cover: "fallback.jpg".to_string(),
            extensions: vec!["mp3".into()],
        }
    }
}

impl ServerSettings {
    fn root_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.listing_path.trim_matches('/')
        )
    }

    /// Directory listing URL for `folder` (the root listing when empty).
    pub fn listing_url(&self, folder: &str) -> String {
        let folder = folder.trim_matches('/');
        if folder.is_empty() {
            format!("{}/", self.root_url())
        } else {
            format!("{}/{}/", self.root_url(), folder)
        }
    }

    /// URL of an audio file inside `folder`. `file` is kept as listed
    /// (possibly percent-encoded).
    pub fn track_url(&self, folder: &str, file: &str) -> String {
        format!("{}{}", self.listing_url(folder), file)
    }

    pub fn metadata_url(&self, folder: &str) -> String {
        format!("{}{}", self.listing_url(folder), self.metadata_file)
    }

    pub fn cover_url(&self, folder: &str) -> String {
        format!("{}{}", self.listing_url(folder), self.cover_file)
    }

    pub fn fallback_cover_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.fallback_cover.trim_start_matches('/')
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Volume the player starts with, 0-100.
    pub initial_volume: u8,
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            initial_volume: 50,
            quit_fade_out_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,

    /// Whether the album sidebar starts visible.
    pub sidebar_visible: bool,

    /// Separator between the elapsed and total time, e.g. `1:05 / 3:42`.
    pub time_separator: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ shelfplay: albums off the shelf ~ ".to_string(),
            sidebar_visible: true,
            time_separator: " / ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub scrub_seconds: u64,
    /// Volume change applied by the `-` / `+` keys, 1-50.
    pub volume_step: u8,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            scrub_seconds: 5,
            volume_step: 5,
        }
    }
}
