//! Song catalog loader.

use crate::config::ServerSettings;

use super::listing;
use super::model::Track;
use super::remote::Remote;

/// Fetch `folder`'s listing and build its track list.
///
/// An empty listing is an empty track list, not an error; a failed fetch is
/// logged and also yields an empty list. Entries keep the server's order.
pub fn load_tracks<R: Remote>(remote: &R, server: &ServerSettings, folder: &str) -> Vec<Track> {
    let listing_url = server.listing_url(folder);
    let html = match remote.fetch_text(&listing_url) {
        Ok(html) => html,
        Err(e) => {
            log::warn!("track listing unavailable at {listing_url}: {e}");
            return Vec::new();
        }
    };

    let tracks: Vec<Track> = listing::audio_files(&html, folder, &server.extensions)
        .into_iter()
        .map(|file| {
            let name = urlencoding::decode(&file)
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| file.clone());
            let url = server.track_url(folder, &file);
            Track { file, name, url }
        })
        .collect();

    log::info!("loaded {} tracks from {listing_url}", tracks.len());
    tracks
}
