use std::time::Duration;

use ratatui::layout::Rect;

use super::{click_fraction, format_time, list_window, progress_ratio, regions};

#[test]
fn format_time_leaves_minutes_unpadded() {
    assert_eq!(format_time(Some(Duration::from_secs(65))), "1:05");
    assert_eq!(format_time(Some(Duration::from_secs(5))), "0:05");
    assert_eq!(format_time(Some(Duration::from_secs(600))), "10:00");
    assert_eq!(format_time(Some(Duration::ZERO)), "0:00");
}

#[test]
fn format_time_renders_unknown_as_zero() {
    assert_eq!(format_time(None), "0:00");
}

#[test]
fn progress_ratio_is_clamped_and_zero_safe() {
    let total = Some(Duration::from_secs(200));
    assert!((progress_ratio(Duration::from_secs(100), total) - 0.5).abs() < 1e-9);
    assert_eq!(progress_ratio(Duration::from_secs(300), total), 1.0);
    assert_eq!(progress_ratio(Duration::from_secs(10), None), 0.0);
    assert_eq!(
        progress_ratio(Duration::from_secs(10), Some(Duration::ZERO)),
        0.0
    );
}

#[test]
fn click_fraction_spans_the_region() {
    let bar = Rect::new(10, 0, 21, 1);
    assert_eq!(click_fraction(bar, 10), 0.0);
    assert!((click_fraction(bar, 20) - 0.5).abs() < 1e-9);
    assert_eq!(click_fraction(bar, 30), 1.0);
    // Clicks left of or past the region clamp to the edges.
    assert_eq!(click_fraction(bar, 5), 0.0);
    assert_eq!(click_fraction(bar, 100), 1.0);
    assert_eq!(click_fraction(Rect::new(0, 0, 0, 1), 3), 0.0);
    assert_eq!(click_fraction(Rect::new(0, 0, 1, 1), 0), 0.0);
}

#[test]
fn rightmost_cell_reaches_full_scale() {
    // A click on the last cell of the 12-wide volume gauge must be able to
    // set volume 100, not ~92%.
    let volume = Rect::new(80, 28, 12, 1);
    assert_eq!(click_fraction(volume, 91), 1.0);
    assert_eq!((click_fraction(volume, 91) * 100.0).round() as u8, 100);
}

#[test]
fn list_window_centers_the_selection() {
    // Short list fits as-is.
    assert_eq!(list_window(3, 10, 1), (0, 3, 1));
    // Long list centers the selection.
    let (start, end, sel) = list_window(100, 10, 50);
    assert_eq!(end - start, 10);
    assert_eq!(start + sel, 50);
    // Near the end the window pins to the tail.
    let (start, end, sel) = list_window(100, 10, 99);
    assert_eq!((start, end), (90, 100));
    assert_eq!(sel, 9);
}

#[test]
fn regions_drop_sidebar_when_hidden() {
    let area = Rect::new(0, 0, 100, 30);

    let with = regions(area, true);
    assert!(with.sidebar.is_some());

    let without = regions(area, false);
    assert!(without.sidebar.is_none());
    assert_eq!(without.tracks.width, area.width);
}

#[test]
fn transport_children_sit_inside_the_bar() {
    let area = Rect::new(0, 0, 100, 30);
    let r = regions(area, true);

    for child in [
        r.prev_button,
        r.play_button,
        r.next_button,
        r.time,
        r.seekbar,
        r.mute_button,
        r.volume,
    ] {
        assert!(child.x >= r.transport.x);
        assert!(child.x + child.width <= r.transport.x + r.transport.width);
        assert!(child.y > r.transport.y);
    }
    assert!(r.seekbar.width >= 10);
}
