use std::time::Duration;

use super::types::{PlaybackInfo, scrub_from};

#[test]
fn scrub_moves_forward_and_backward() {
    let at = Duration::from_secs(60);
    assert_eq!(scrub_from(at, 5), Duration::from_secs(65));
    assert_eq!(scrub_from(at, -5), Duration::from_secs(55));
}

#[test]
fn scrub_clamps_at_the_start() {
    assert_eq!(scrub_from(Duration::from_secs(2), -10), Duration::ZERO);
    assert_eq!(scrub_from(Duration::ZERO, -1), Duration::ZERO);
}

#[test]
fn playback_info_starts_idle() {
    let info = PlaybackInfo::default();
    assert_eq!(info.index, None);
    assert_eq!(info.elapsed, Duration::ZERO);
    assert!(!info.playing);
    assert!(info.title.is_none());
}
