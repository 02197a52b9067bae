//! Fetch worker thread.
//!
//! Listing and metadata fetches run off the UI thread; the worker processes
//! commands strictly sequentially and reports results back over a channel.
//! Track loads carry a generation token so the event loop can discard a
//! result that was superseded by a later folder selection.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use crate::config::ServerSettings;

use super::model::{Album, Track};
use super::remote::HttpRemote;
use super::{albums, tracks};

#[derive(Debug)]
pub enum FetchCmd {
    /// Load the album catalog from the root listing.
    Albums,
    /// Load the track list of `folder` (the root listing when empty).
    Tracks {
        folder: String,
        generation: u64,
        /// Start the first track once the list is applied (album card click).
        autoplay: bool,
    },
    /// Shut the worker down.
    Quit,
}

#[derive(Debug)]
pub enum FetchEvent {
    Albums(Vec<Album>),
    Tracks {
        folder: String,
        generation: u64,
        autoplay: bool,
        tracks: Vec<Track>,
    },
}

/// Handle to the fetch worker thread.
pub struct Fetcher {
    tx: Sender<FetchCmd>,
}

impl Fetcher {
    /// Spawn the worker; returns the handle and the event receiver.
    pub fn spawn(remote: HttpRemote, server: ServerSettings) -> (Self, Receiver<FetchEvent>) {
        let (tx, rx) = mpsc::channel::<FetchCmd>();
        let (event_tx, event_rx) = mpsc::channel::<FetchEvent>();

        thread::spawn(move || run(remote, server, rx, event_tx));

        (Self { tx }, event_rx)
    }

    pub fn send(&self, cmd: FetchCmd) -> Result<(), mpsc::SendError<FetchCmd>> {
        self.tx.send(cmd)
    }
}

fn run(
    remote: HttpRemote,
    server: ServerSettings,
    rx: Receiver<FetchCmd>,
    events: Sender<FetchEvent>,
) {
    while let Ok(cmd) = rx.recv() {
        match cmd {
            FetchCmd::Albums => {
                let albums = albums::load_albums(&remote, &server);
                if events.send(FetchEvent::Albums(albums)).is_err() {
                    break;
                }
            }
            FetchCmd::Tracks {
                folder,
                generation,
                autoplay,
            } => {
                let tracks = tracks::load_tracks(&remote, &server, &folder);
                let event = FetchEvent::Tracks {
                    folder,
                    generation,
                    autoplay,
                    tracks,
                };
                if events.send(event).is_err() {
                    break;
                }
            }
            FetchCmd::Quit => break,
        }
    }
}
