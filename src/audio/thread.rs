use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStreamBuilder, Sink};

use crate::catalog::{HttpRemote, Remote, Track};

use super::sink::{create_sink_at, probe_duration};
use super::types::{AudioCmd, PlaybackHandle, scrub_from};

/// Decoded-at-most-once bytes of the current track, kept so seeking can
/// rebuild the sink without refetching.
struct Loaded {
    bytes: Arc<[u8]>,
    duration: Option<Duration>,
}

pub(super) fn spawn_audio_thread(
    remote: HttpRemote,
    rx: Receiver<AudioCmd>,
    playback_info: PlaybackHandle,
    initial_volume: f32,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = OutputStreamBuilder::open_default_stream().expect("ERR: No audio output device");
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        let mut stream = stream;
        stream.log_on_drop(false);

        let mut tracks: Vec<Track> = Vec::new();
        let mut index: Option<usize> = None;
        let mut paused = true;
        let mut sink: Option<Sink> = None;
        let mut loaded: Option<Loaded> = None;
        let mut volume = initial_volume.clamp(0.0, 1.0);

        // Track start time and accumulated elapsed when paused.
        let mut started_at: Option<Instant> = None;
        let mut accumulated = Duration::ZERO;

        // Spawn a ticker thread to update playback_info.elapsed periodically.
        let info_for_ticker_clone = playback_info.clone();
        thread::spawn(move || loop {
            thread::sleep(Duration::from_millis(500));
            let mut info = info_for_ticker_clone.lock().unwrap();
            if info.playing {
                info.elapsed = info.elapsed + Duration::from_millis(500);
            }
        });

        fn do_play(
            i: usize,
            stream: &rodio::OutputStream,
            remote: &HttpRemote,
            tracks: &[Track],
            sink: &mut Option<Sink>,
            index: &mut Option<usize>,
            paused: &mut bool,
            started_at: &mut Option<Instant>,
            accumulated: &mut Duration,
            loaded: &mut Option<Loaded>,
            volume: f32,
            playback_info: &PlaybackHandle,
        ) {
            let Some(track) = tracks.get(i) else {
                return;
            };

            if let Some(old_sink) = sink.take() {
                old_sink.stop();
            }
            *started_at = None;
            *accumulated = Duration::ZERO;

            let new_sink = remote
                .fetch_bytes(&track.url)
                .map_err(super::sink::PlayError::from)
                .and_then(|bytes| {
                    let bytes: Arc<[u8]> = bytes.into();
                    let duration = probe_duration(&bytes);
                    let s = create_sink_at(stream, bytes.clone(), Duration::ZERO)?;
                    *loaded = Some(Loaded { bytes, duration });
                    Ok(s)
                });

            match new_sink {
                Ok(s) => {
                    s.set_volume(volume);
                    s.play();
                    *sink = Some(s);
                    *index = Some(i);
                    *paused = false;
                    *started_at = Some(Instant::now());

                    if let Ok(mut info) = playback_info.lock() {
                        info.index = Some(i);
                        info.elapsed = Duration::ZERO;
                        info.duration = loaded.as_ref().and_then(|l| l.duration);
                        info.playing = true;
                        info.title = Some(track.name.clone());
                        info.url = Some(track.url.clone());
                    }
                }
                Err(e) => {
                    log::warn!("cannot play {}: {}", track.url, e);
                    *index = Some(i);
                    *paused = true;
                    *loaded = None;

                    if let Ok(mut info) = playback_info.lock() {
                        info.index = Some(i);
                        info.elapsed = Duration::ZERO;
                        info.duration = None;
                        info.playing = false;
                        info.title = Some(track.name.clone());
                        info.url = Some(track.url.clone());
                    }
                }
            }
        }

        fn do_stop(
            sink: &mut Option<Sink>,
            index: &mut Option<usize>,
            paused: &mut bool,
            started_at: &mut Option<Instant>,
            accumulated: &mut Duration,
            loaded: &mut Option<Loaded>,
            playback_info: &PlaybackHandle,
        ) {
            if let Some(s) = sink.as_ref() {
                s.stop();
            }
            *sink = None;
            *index = None;
            *paused = true;
            *started_at = None;
            *accumulated = Duration::ZERO;
            *loaded = None;
            if let Ok(mut info) = playback_info.lock() {
                info.index = None;
                info.elapsed = Duration::ZERO;
                info.duration = None;
                info.playing = false;
                info.title = None;
                info.url = None;
            }
        }

        // Rebuild the current sink at `target`, preserving the paused state.
        fn do_seek(
            target: Duration,
            stream: &rodio::OutputStream,
            sink: &mut Option<Sink>,
            paused: bool,
            started_at: &mut Option<Instant>,
            accumulated: &mut Duration,
            loaded: &Option<Loaded>,
            volume: f32,
            playback_info: &PlaybackHandle,
        ) {
            let Some(l) = loaded.as_ref() else {
                return;
            };
            if sink.is_none() {
                return;
            }

            let target = match l.duration {
                Some(d) => target.min(d),
                None => target,
            };

            if let Some(s) = sink.take() {
                s.stop();
            }

            match create_sink_at(stream, l.bytes.clone(), target) {
                Ok(new_sink) => {
                    new_sink.set_volume(volume);
                    if paused {
                        *started_at = None;
                    } else {
                        new_sink.play();
                        *started_at = Some(Instant::now());
                    }
                    *sink = Some(new_sink);
                    *accumulated = target;
                    if let Ok(mut info) = playback_info.lock() {
                        info.elapsed = target;
                    }
                }
                Err(e) => {
                    log::warn!("seek failed: {e}");
                    *started_at = None;
                    if let Ok(mut info) = playback_info.lock() {
                        info.playing = false;
                    }
                }
            }
        }

        fn fade_out_sink(sink: &Sink, from: f32, fade_out_ms: u64) {
            if fade_out_ms == 0 {
                sink.set_volume(0.0);
                return;
            }
            let steps: u64 = 20;
            let step_ms = (fade_out_ms / steps).max(1);
            for step in 1..=steps {
                let t = step as f32 / steps as f32;
                sink.set_volume(from * (1.0 - t));
                thread::sleep(Duration::from_millis(step_ms));
            }
            sink.set_volume(0.0);
        }

        loop {
            match rx.recv_timeout(Duration::from_millis(200)) {
                Ok(cmd) => match cmd {
                    AudioCmd::Play(i) => {
                        do_play(
                            i,
                            &stream,
                            &remote,
                            &tracks,
                            &mut sink,
                            &mut index,
                            &mut paused,
                            &mut started_at,
                            &mut accumulated,
                            &mut loaded,
                            volume,
                            &playback_info,
                        );
                    }

                    AudioCmd::SetTracks(new_tracks) => {
                        // The old list's index means nothing in the new list.
                        // Whatever is in the sink keeps playing until the next
                        // Play or Stop.
                        tracks = new_tracks;
                        index = None;
                        if let Ok(mut info) = playback_info.lock() {
                            info.index = None;
                        }
                    }

                    AudioCmd::Stop => {
                        do_stop(
                            &mut sink,
                            &mut index,
                            &mut paused,
                            &mut started_at,
                            &mut accumulated,
                            &mut loaded,
                            &playback_info,
                        );
                    }

                    AudioCmd::TogglePause => {
                        if let Some(ref s) = sink {
                            if paused {
                                s.play();
                                started_at = Some(Instant::now());
                                if let Ok(mut info) = playback_info.lock() {
                                    info.playing = true;
                                }
                            } else {
                                s.pause();
                                if let Some(st) = started_at {
                                    accumulated += Instant::now() - st;
                                }
                                started_at = None;
                                if let Ok(mut info) = playback_info.lock() {
                                    info.playing = false;
                                }
                            }
                            paused = !paused;
                        }
                    }

                    AudioCmd::SetVolume(v) => {
                        volume = v.clamp(0.0, 1.0);
                        if let Some(ref s) = sink {
                            s.set_volume(volume);
                        }
                    }

                    AudioCmd::SeekTo(target) => {
                        do_seek(
                            target,
                            &stream,
                            &mut sink,
                            paused,
                            &mut started_at,
                            &mut accumulated,
                            &loaded,
                            volume,
                            &playback_info,
                        );
                    }

                    AudioCmd::SeekBy(secs) => {
                        if sink.is_none() {
                            continue;
                        }
                        let elapsed =
                            accumulated + started_at.map_or(Duration::ZERO, |st| st.elapsed());
                        do_seek(
                            scrub_from(elapsed, secs),
                            &stream,
                            &mut sink,
                            paused,
                            &mut started_at,
                            &mut accumulated,
                            &loaded,
                            volume,
                            &playback_info,
                        );
                    }

                    AudioCmd::Quit { fade_out_ms } => {
                        if let Some(ref s) = sink {
                            // Fade out gently before stopping.
                            fade_out_sink(s, volume, fade_out_ms);
                            s.stop();
                        }
                        // Update shared state so UI/MPRIS don't keep showing Playing.
                        if let Ok(mut info) = playback_info.lock() {
                            info.playing = false;
                        }
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {
                    // The current track ran out. Park at the end instead of
                    // advancing; Next is always an explicit request.
                    if let Some(ref s) = sink {
                        if !paused && s.empty() {
                            sink = None;
                            paused = true;
                            started_at = None;
                            if let Ok(mut info) = playback_info.lock() {
                                info.playing = false;
                                if let Some(d) = info.duration {
                                    info.elapsed = d;
                                }
                            }
                        }
                    }
                    continue;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}
