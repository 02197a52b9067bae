//! Album catalog loader.

use crate::config::ServerSettings;

use super::listing;
use super::model::{Album, AlbumInfo};
use super::remote::{Remote, RemoteError};

#[derive(Debug, thiserror::Error)]
enum InfoError {
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error("invalid metadata: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Fetch the root listing and build the album catalog.
///
/// Only folders whose metadata file fetches and parses become albums; any
/// per-folder failure skips just that folder. A failed root listing yields
/// an empty catalog. Order follows the server's listing.
pub fn load_albums<R: Remote>(remote: &R, server: &ServerSettings) -> Vec<Album> {
    let listing_url = server.listing_url("");
    let html = match remote.fetch_text(&listing_url) {
        Ok(html) => html,
        Err(e) => {
            log::warn!("album listing unavailable at {listing_url}: {e}");
            return Vec::new();
        }
    };

    let mut albums: Vec<Album> = Vec::new();
    for folder in listing::folders(&html, &server.listing_path) {
        match fetch_info(remote, server, &folder) {
            Ok(info) => {
                let cover = resolve_cover(remote, server, &folder);
                albums.push(Album {
                    folder,
                    title: info.title,
                    description: info.description,
                    cover,
                });
            }
            Err(e) => {
                // A folder without valid metadata is not an album.
                log::debug!("skipping folder {folder}: {e}");
            }
        }
    }

    log::info!("loaded {} albums from {listing_url}", albums.len());
    albums
}

fn fetch_info<R: Remote>(
    remote: &R,
    server: &ServerSettings,
    folder: &str,
) -> Result<AlbumInfo, InfoError> {
    let text = remote.fetch_text(&server.metadata_url(folder))?;
    Ok(serde_json::from_str(&text)?)
}

fn resolve_cover<R: Remote>(remote: &R, server: &ServerSettings, folder: &str) -> String {
    let cover = server.cover_url(folder);
    match remote.fetch_bytes(&cover) {
        Ok(_) => cover,
        Err(e) => {
            log::debug!("cover missing for {folder}, using fallback: {e}");
            server.fallback_cover_url()
        }
    }
}
