use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::{Position, Rect};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, Pane, PlaybackState};
use crate::audio::{AudioCmd, AudioPlayer, PlaybackInfo};
use crate::catalog::{FetchCmd, FetchEvent, Fetcher};
use crate::config;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::runtime::mpris_sync::update_mpris;
use crate::ui;

/// State tracked by the runtime event loop across iterations.
struct EventLoopState {
    /// Last playback state emitted to MPRIS.
    last_playback: PlaybackState,
    /// Last now-playing title emitted to MPRIS.
    last_title: Option<String>,
}

/// Main terminal event loop: drains fetch results, syncs with the audio
/// thread and MPRIS, draws, and handles input. Returns `Ok(())` when
/// shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    fetcher: &Fetcher,
    fetch_rx: &mpsc::Receiver<FetchEvent>,
    mpris: &MprisHandle,
    control_rx: &mpsc::Receiver<ControlCmd>,
) -> Result<(), Box<dyn std::error::Error>> {
    let playback_handle = audio_player.playback_handle();
    let mut state = EventLoopState {
        last_playback: app.playback,
        last_title: None,
    };

    loop {
        // Apply finished fetches. Stale track loads carry an old generation
        // and are dropped by `apply_tracks`.
        while let Ok(ev) = fetch_rx.try_recv() {
            match ev {
                FetchEvent::Albums(albums) => app.set_albums(albums),
                FetchEvent::Tracks {
                    folder,
                    generation,
                    autoplay,
                    tracks,
                } => {
                    if app.apply_tracks(generation, tracks) {
                        log::debug!("showing {} tracks from '{}'", app.tracks.len(), folder);
                        let _ = audio_player.send(AudioCmd::SetTracks(app.tracks.clone()));
                        if autoplay && !app.tracks.is_empty() {
                            play_track(app, audio_player, 0);
                        }
                    } else {
                        log::debug!("dropping stale track load for '{}'", folder);
                    }
                }
            }
        }

        // Sync playback state from the audio thread's snapshot.
        let snapshot: PlaybackInfo = playback_handle
            .lock()
            .map(|info| info.clone())
            .unwrap_or_default();
        app.playback = if snapshot.playing {
            PlaybackState::Playing
        } else if snapshot.title.is_some() {
            PlaybackState::Paused
        } else {
            PlaybackState::Stopped
        };

        // Keep MPRIS fresh even when changes come from track end or media keys.
        if app.playback != state.last_playback || snapshot.title != state.last_title {
            update_mpris(mpris, app, &snapshot);
            state.last_playback = app.playback;
            state.last_title = snapshot.title.clone();
        }

        terminal.draw(|f| ui::draw(f, app, &snapshot, &settings.ui, &settings.controls))?;

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, settings, app, audio_player, fetcher, &snapshot)? {
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if handle_key_event(key, settings, app, audio_player, fetcher, &snapshot)? {
                        return Ok(());
                    }
                }
                Event::Mouse(mouse) => {
                    let size = terminal.size()?;
                    let area = Rect::new(0, 0, size.width, size.height);
                    handle_mouse_event(mouse, area, settings, app, audio_player, fetcher, &snapshot);
                }
                _ => {}
            }
        }
    }
}

fn play_track(app: &mut App, audio_player: &AudioPlayer, i: usize) {
    if i < app.tracks.len() {
        app.selected_track = i;
        let _ = audio_player.send(AudioCmd::Play(i));
        app.playback = PlaybackState::Playing;
    }
}

/// Load `folder`'s track list, optionally starting its first track once the
/// listing arrives.
fn open_folder(app: &mut App, fetcher: &Fetcher, folder: String, autoplay: bool) {
    let generation = app.begin_track_load(&folder);
    let _ = fetcher.send(FetchCmd::Tracks {
        folder,
        generation,
        autoplay,
    });
}

fn handle_control_cmd(
    cmd: ControlCmd,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    fetcher: &Fetcher,
    snapshot: &PlaybackInfo,
) -> Result<bool, Box<dyn std::error::Error>> {
    match cmd {
        ControlCmd::Quit => {
            super::shutdown(audio_player, fetcher, settings.audio.quit_fade_out_ms);
            return Ok(true);
        }
        ControlCmd::Play => match app.playback {
            PlaybackState::Paused => {
                let _ = audio_player.send(AudioCmd::TogglePause);
                app.playback = PlaybackState::Playing;
            }
            PlaybackState::Stopped => {
                play_track(app, audio_player, app.selected_track);
            }
            PlaybackState::Playing => {}
        },
        ControlCmd::Pause => {
            if app.playback == PlaybackState::Playing {
                let _ = audio_player.send(AudioCmd::TogglePause);
                app.playback = PlaybackState::Paused;
            }
        }
        ControlCmd::PlayPause => match app.playback {
            PlaybackState::Stopped => {
                play_track(app, audio_player, app.selected_track);
            }
            PlaybackState::Playing => {
                let _ = audio_player.send(AudioCmd::TogglePause);
                app.playback = PlaybackState::Paused;
            }
            PlaybackState::Paused => {
                let _ = audio_player.send(AudioCmd::TogglePause);
                app.playback = PlaybackState::Playing;
            }
        },
        ControlCmd::Stop => {
            let _ = audio_player.send(AudioCmd::Stop);
            app.playback = PlaybackState::Stopped;
        }
        ControlCmd::Next => {
            if let Some(i) = app.next_track(snapshot.index) {
                play_track(app, audio_player, i);
            }
        }
        ControlCmd::Prev => {
            if let Some(i) = app.prev_track(snapshot.index) {
                play_track(app, audio_player, i);
            }
        }
    }

    Ok(false)
}

fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    fetcher: &Fetcher,
    snapshot: &PlaybackInfo,
) -> Result<bool, Box<dyn std::error::Error>> {
    match key.code {
        KeyCode::Char('q') => {
            super::shutdown(audio_player, fetcher, settings.audio.quit_fade_out_ms);
            return Ok(true);
        }
        KeyCode::Char('b') => app.toggle_sidebar(),
        KeyCode::Tab => app.toggle_focus(),
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_prev(),
        KeyCode::Enter => match app.focus {
            Pane::Albums => {
                let folder = app.current_album().map(|a| a.folder.clone());
                if let Some(folder) = folder {
                    open_folder(app, fetcher, folder, true);
                    app.focus = Pane::Tracks;
                }
            }
            Pane::Tracks => play_track(app, audio_player, app.selected_track),
        },
        KeyCode::Char(' ') | KeyCode::Char('p') => {
            handle_control_cmd(
                ControlCmd::PlayPause,
                settings,
                app,
                audio_player,
                fetcher,
                snapshot,
            )?;
        }
        KeyCode::Char('h') => {
            handle_control_cmd(
                ControlCmd::Prev,
                settings,
                app,
                audio_player,
                fetcher,
                snapshot,
            )?;
        }
        KeyCode::Char('l') => {
            handle_control_cmd(
                ControlCmd::Next,
                settings,
                app,
                audio_player,
                fetcher,
                snapshot,
            )?;
        }
        KeyCode::Char('H') => {
            let _ = audio_player.send(AudioCmd::SeekBy(-(settings.controls.scrub_seconds as i32)));
        }
        KeyCode::Char('L') => {
            let _ = audio_player.send(AudioCmd::SeekBy(settings.controls.scrub_seconds as i32));
        }
        KeyCode::Char('m') => {
            app.toggle_mute();
            let _ = audio_player.send(AudioCmd::SetVolume(app.volume_level()));
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            app.set_volume(app.volume.saturating_add(settings.controls.volume_step));
            let _ = audio_player.send(AudioCmd::SetVolume(app.volume_level()));
        }
        KeyCode::Char('-') => {
            app.set_volume(app.volume.saturating_sub(settings.controls.volume_step));
            let _ = audio_player.send(AudioCmd::SetVolume(app.volume_level()));
        }
        KeyCode::Char('K') => app.metadata_window = !app.metadata_window,
        KeyCode::Esc => app.metadata_window = false,
        _ => {}
    }

    Ok(false)
}

fn handle_mouse_event(
    mouse: MouseEvent,
    area: Rect,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    fetcher: &Fetcher,
    snapshot: &PlaybackInfo,
) {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return;
    }
    let pos = Position::new(mouse.column, mouse.row);
    let r = ui::regions(area, app.sidebar_visible);

    if r.header.contains(pos) {
        app.toggle_sidebar();
    } else if r.seekbar.contains(pos) {
        if let Some(duration) = snapshot.duration {
            let fraction = ui::click_fraction(r.seekbar, mouse.column);
            let _ = audio_player.send(AudioCmd::SeekTo(App::seek_target(duration, fraction)));
        }
    } else if r.volume.contains(pos) {
        let fraction = ui::click_fraction(r.volume, mouse.column);
        app.set_volume((fraction * 100.0).round() as u8);
        let _ = audio_player.send(AudioCmd::SetVolume(app.volume_level()));
    } else if r.mute_button.contains(pos) {
        app.toggle_mute();
        let _ = audio_player.send(AudioCmd::SetVolume(app.volume_level()));
    } else if r.play_button.contains(pos) {
        let _ = handle_control_cmd(
            ControlCmd::PlayPause,
            settings,
            app,
            audio_player,
            fetcher,
            snapshot,
        );
    } else if r.prev_button.contains(pos) {
        let _ = handle_control_cmd(
            ControlCmd::Prev,
            settings,
            app,
            audio_player,
            fetcher,
            snapshot,
        );
    } else if r.next_button.contains(pos) {
        let _ = handle_control_cmd(
            ControlCmd::Next,
            settings,
            app,
            audio_player,
            fetcher,
            snapshot,
        );
    } else if r.tracks.contains(pos) {
        if let Some(i) = clicked_row(r.tracks, pos, app.tracks.len(), app.selected_track) {
            app.focus = Pane::Tracks;
            play_track(app, audio_player, i);
        }
    } else if let Some(sidebar) = r.sidebar {
        if sidebar.contains(pos) {
            if let Some(i) = clicked_row(sidebar, pos, app.albums.len(), app.selected_album) {
                app.focus = Pane::Albums;
                app.selected_album = i;
                let folder = app.albums[i].folder.clone();
                open_folder(app, fetcher, folder, true);
            }
        }
    }
}

/// Map a click inside a bordered list to the index of the row it landed on,
/// accounting for the centered scroll window.
fn clicked_row(region: Rect, pos: Position, total: usize, selected: usize) -> Option<usize> {
    let inner_top = region.y.checked_add(1)?;
    if pos.y < inner_top || pos.y >= region.y + region.height.saturating_sub(1) {
        return None;
    }
    let height = region.height.saturating_sub(2) as usize;
    let (start, end, _) = ui::list_window(total, height, selected);
    let row = start + (pos.y - inner_top) as usize;
    (row < end).then_some(row)
}
