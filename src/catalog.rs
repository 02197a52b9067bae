//! Remote catalog: album and track discovery against a static file server.
//!
//! The server is expected to serve autoindex-style HTML listings; albums are
//! folders under the listing path carrying an `info.json`, tracks are audio
//! files inside a folder. All fetching goes through the [`Remote`] seam so
//! the loaders are testable without a network.

mod albums;
mod listing;
mod model;
mod remote;
mod tracks;
mod worker;

pub use albums::load_albums;
pub use model::{Album, AlbumInfo, Track};
pub use remote::{HttpRemote, Remote, RemoteError};
pub use tracks::load_tracks;
pub use worker::{FetchCmd, FetchEvent, Fetcher};

#[cfg(test)]
mod tests;
