use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::catalog::{FetchCmd, Fetcher, HttpRemote};
use crate::mpris::ControlCmd;

mod event_loop;
mod mpris_sync;
mod settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let settings = settings::load_settings();
    let remote = HttpRemote::new();

    let (fetcher, fetch_rx) = Fetcher::spawn(remote.clone(), settings.server.clone());

    let mut app = App::new();
    app.sidebar_visible = settings.ui.sidebar_visible;
    app.set_volume(settings.audio.initial_volume);

    // Kick off the initial loads: the album catalog plus the root listing's
    // own tracks, so loose files under the listing path are playable too.
    let _ = fetcher.send(FetchCmd::Albums);
    let generation = app.begin_track_load("");
    let _ = fetcher.send(FetchCmd::Tracks {
        folder: String::new(),
        generation,
        autoplay: false,
    });

    let audio_player = AudioPlayer::new(remote, app.volume_level());

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx.clone());

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &audio_player,
        &fetcher,
        &fetch_rx,
        &mpris,
        &control_rx,
    );

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    run_result
}

/// Fade playback out and shut the background threads down.
fn shutdown(audio_player: &AudioPlayer, fetcher: &Fetcher, quit_fade_out_ms: u64) {
    audio_player.quit_softly(Duration::from_millis(quit_fade_out_ms));
    let _ = fetcher.send(FetchCmd::Quit);
}
