//! UI rendering for the terminal interface.
//!
//! Layout: header, main area (album sidebar + track list), transport bar
//! with clickable controls, footer with key help. The geometry helpers are
//! kept pure so mouse hit-testing and the renderer agree on the same rects.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Padding, Paragraph, Wrap},
};
use std::time::Duration;

use crate::app::{App, Pane, PlaybackState};
use crate::audio::PlaybackInfo;
use crate::config::{ControlsSettings, UiSettings};

/// Format an optional duration as `M:SS`, minutes unpadded.
/// An unknown duration renders as `0:00`.
pub fn format_time(d: Option<Duration>) -> String {
    let secs = d.unwrap_or(Duration::ZERO).as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Screen rectangles of everything the mouse can hit.
pub struct Regions {
    pub header: Rect,
    pub sidebar: Option<Rect>,
    pub tracks: Rect,
    /// Whole transport bar including its border.
    pub transport: Rect,
    pub prev_button: Rect,
    pub play_button: Rect,
    pub next_button: Rect,
    pub time: Rect,
    pub seekbar: Rect,
    pub mute_button: Rect,
    pub volume: Rect,
    pub footer: Rect,
}

/// Split `area` into the layout both `draw` and the mouse handler use.
pub fn regions(area: Rect, sidebar_visible: bool) -> Regions {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(area);

    let (sidebar, tracks) = if sidebar_visible {
        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
            .split(chunks[1]);
        (Some(halves[0]), halves[1])
    } else {
        (None, chunks[1])
    };

    // Transport children are laid out inside the bar's border.
    let inner = Block::default().borders(Borders::ALL).inner(chunks[2]);
    let transport = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(4),  // prev
            Constraint::Length(4),  // play/pause
            Constraint::Length(4),  // next
            Constraint::Length(16), // elapsed / total
            Constraint::Min(10),    // seek bar
            Constraint::Length(6),  // mute
            Constraint::Length(12), // volume bar
        ])
        .split(inner);

    Regions {
        header: chunks[0],
        sidebar,
        tracks,
        transport: chunks[2],
        prev_button: transport[0],
        play_button: transport[1],
        next_button: transport[2],
        time: transport[3],
        seekbar: transport[4],
        mute_button: transport[5],
        volume: transport[6],
        footer: chunks[3],
    }
}

/// Horizontal position of `column` within `region` as a 0.0-1.0 fraction.
/// The leftmost cell maps to 0.0 and the rightmost to 1.0, so a click on the
/// far edge of the volume gauge reaches full volume and a far-edge seek
/// reaches the end of the track.
pub fn click_fraction(region: Rect, column: u16) -> f64 {
    if region.width <= 1 {
        return 0.0;
    }
    let offset = column.saturating_sub(region.x).min(region.width - 1);
    f64::from(offset) / f64::from(region.width - 1)
}

/// Elapsed/total as a gauge ratio, clamped to 0.0-1.0.
pub fn progress_ratio(elapsed: Duration, duration: Option<Duration>) -> f64 {
    let Some(total) = duration.filter(|d| !d.is_zero()) else {
        return 0.0;
    };
    (elapsed.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0)
}

/// Visible window of a list: `(start, end, selected_pos_in_visible)`.
/// Centers the selection when the list is taller than the viewport.
pub fn list_window(total: usize, height: usize, selected: usize) -> (usize, usize, usize) {
    let selected = selected.min(total.saturating_sub(1));
    if total <= height || height == 0 {
        return (0, total, selected);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height, selected - start)
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn controls_text(controls: &ControlsSettings) -> String {
    format!(
        "[j/k] up/down | [tab] focus | [enter] open/play | [space/p] play/pause | [h/l] prev/next \
         | [H/L] scrub -/+{}s | [-/+] volume | [m] mute | [b] sidebar | [K] info | [q] quit",
        controls.scrub_seconds
    )
}

fn render_list(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    items: &[String],
    selected: usize,
    focused: bool,
) {
    let height = area.height.saturating_sub(2) as usize;
    let (start, end, sel_in_visible) = list_window(items.len(), height, selected);

    let visible: Vec<ListItem> = items[start..end]
        .iter()
        .map(|s| ListItem::new(s.as_str()))
        .collect();

    let border_style = if focused {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let list = List::new(visible)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(title.to_string()),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ratatui::widgets::ListState::default();
    if !items.is_empty() {
        state.select(Some(sel_in_visible));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

/// Render the entire UI into `frame` from `app` state and the last playback
/// snapshot.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    snapshot: &PlaybackInfo,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let r = regions(frame.area(), app.sidebar_visible);

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" shelfplay ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, r.header);

    // Album sidebar
    if let Some(sidebar) = r.sidebar {
        let titles: Vec<String> = app.albums.iter().map(|a| a.title.clone()).collect();
        render_list(
            frame,
            sidebar,
            " albums ",
            &titles,
            app.selected_album,
            app.focus == Pane::Albums,
        );
    }

    // Track list, marking the track the audio thread is on.
    let names: Vec<String> = app
        .tracks
        .iter()
        .enumerate()
        .map(|(i, t)| {
            if snapshot.index == Some(i) {
                format!("♪ {}", t.name)
            } else {
                format!("  {}", t.name)
            }
        })
        .collect();
    let tracks_title = if app.current_folder.is_empty() {
        " tracks ".to_string()
    } else {
        format!(" tracks: {} ", app.current_folder)
    };
    render_list(
        frame,
        r.tracks,
        &tracks_title,
        &names,
        app.selected_track,
        app.focus == Pane::Tracks,
    );

    // Transport bar
    let now_playing = snapshot.title.as_deref().unwrap_or("nothing playing");
    let transport_block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {now_playing} "));
    frame.render_widget(transport_block, r.transport);

    let play_symbol = match app.playback {
        PlaybackState::Playing => "||",
        PlaybackState::Paused | PlaybackState::Stopped => ">",
    };
    frame.render_widget(
        Paragraph::new("<<").alignment(Alignment::Center),
        r.prev_button,
    );
    frame.render_widget(
        Paragraph::new(play_symbol).alignment(Alignment::Center),
        r.play_button,
    );
    frame.render_widget(
        Paragraph::new(">>").alignment(Alignment::Center),
        r.next_button,
    );

    let time_text = format!(
        "{}{}{}",
        format_time(Some(snapshot.elapsed)),
        ui_settings.time_separator,
        format_time(snapshot.duration),
    );
    frame.render_widget(
        Paragraph::new(time_text).alignment(Alignment::Center),
        r.time,
    );

    let seek = Gauge::default()
        .ratio(progress_ratio(snapshot.elapsed, snapshot.duration))
        .label("");
    frame.render_widget(seek, r.seekbar);

    let mute_text = if app.volume == 0 { " mut " } else { " vol " };
    frame.render_widget(
        Paragraph::new(mute_text).alignment(Alignment::Center),
        r.mute_button,
    );

    let volume = Gauge::default()
        .ratio(f64::from(app.volume) / 100.0)
        .label(format!("{}%", app.volume));
    frame.render_widget(volume, r.volume);

    // Overlay album metadata popup (keeps the lists visible under it)
    if app.metadata_window {
        let popup_area = centered_rect_sized(60, 8, r.tracks);
        frame.render_widget(Clear, popup_area);

        let text = match app.current_album() {
            Some(album) => format!(
                "Title: {}\nDescription: {}\nFolder: {}\nCover: {}",
                album.title, album.description, album.folder, album.cover
            ),
            None => "No album selected".to_string(),
        };
        let popup = Paragraph::new(text)
            .block(
                Block::default()
                    .padding(Padding {
                        left: 1,
                        right: 0,
                        top: 0,
                        bottom: 0,
                    })
                    .borders(Borders::ALL)
                    .title(" album (K closes) "),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(popup, popup_area);
    }

    // Footer
    let footer = Paragraph::new(controls_text(controls_settings))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, r.footer);
}

#[cfg(test)]
mod tests;
