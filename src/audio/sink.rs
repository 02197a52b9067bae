//! Sink construction and stream probing over in-memory track bytes.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use lofty::prelude::*;
use lofty::probe::Probe;
use rodio::{Decoder, OutputStream, Sink, Source};
use thiserror::Error;

use crate::catalog::RemoteError;

#[derive(Debug, Error)]
pub(super) enum PlayError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] RemoteError),
    #[error("decode failed: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),
}

/// Create a paused `Sink` over `data` that starts playback at `start_at`.
pub(super) fn create_sink_at(
    handle: &OutputStream,
    data: Arc<[u8]>,
    start_at: Duration,
) -> Result<Sink, PlayError> {
    let source = Decoder::new(Cursor::new(data))?
        // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
        .skip_duration(start_at);

    let sink = Sink::connect_new(handle.mixer());
    sink.append(source);
    sink.pause();
    Ok(sink)
}

/// Read the track duration from the stream header, if the format carries one.
pub(super) fn probe_duration(data: &[u8]) -> Option<Duration> {
    let file = Probe::new(Cursor::new(data))
        .guess_file_type()
        .ok()?
        .read()
        .ok()?;
    let duration = file.properties().duration();
    (duration > Duration::ZERO).then_some(duration)
}
