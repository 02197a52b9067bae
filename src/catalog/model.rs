use serde::Deserialize;

/// An audio file inside the currently selected folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    /// File name as listed by the server (possibly percent-encoded).
    pub file: String,
    /// Decoded, human-readable name shown in the track list.
    pub name: String,
    /// Absolute URL the audio bytes are fetched from.
    pub url: String,
}

/// A renderable album card: a folder that carried valid metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Album {
    /// Folder name under the listing path.
    pub folder: String,
    pub title: String,
    pub description: String,
    /// Cover art URL, or the configured fallback reference when the cover
    /// could not be fetched.
    pub cover: String,
}

/// Shape of a folder's `info.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct AlbumInfo {
    pub title: String,
    pub description: String,
}
