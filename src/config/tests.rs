use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_shelfplay_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("SHELFPLAY_CONFIG_PATH", "/tmp/shelfplay-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/shelfplay-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("shelfplay")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("shelfplay")
            .join("config.toml")
    );
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[server]
base_url = "http://music.local:9000"
listing_path = "albums"
metadata_file = "album.json"
cover_file = "front.jpg"
fallback_cover = "missing.png"
extensions = ["mp3", "ogg"]

[audio]
initial_volume = 35
quit_fade_out_ms = 123

[ui]
header_text = "hello"
sidebar_visible = false
time_separator = " | "

[controls]
scrub_seconds = 9
volume_step = 10
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("SHELFPLAY_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("SHELFPLAY__AUDIO__INITIAL_VOLUME");

    let s = Settings::load().unwrap();
    assert_eq!(s.server.base_url, "http://music.local:9000");
    assert_eq!(s.server.listing_path, "albums");
    assert_eq!(s.server.metadata_file, "album.json");
    assert_eq!(s.server.cover_file, "front.jpg");
    assert_eq!(s.server.fallback_cover, "missing.png");
    assert_eq!(s.server.extensions, vec!["mp3".to_string(), "ogg".to_string()]);
    assert_eq!(s.audio.initial_volume, 35);
    assert_eq!(s.audio.quit_fade_out_ms, 123);
    assert_eq!(s.ui.header_text, "hello");
    assert!(!s.ui.sidebar_visible);
    assert_eq!(s.ui.time_separator, " | ");
    assert_eq!(s.controls.scrub_seconds, 9);
    assert_eq!(s.controls.volume_step, 10);
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[audio]
initial_volume = 70
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("SHELFPLAY_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("SHELFPLAY__AUDIO__INITIAL_VOLUME", "15");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.initial_volume, 15);
}

#[test]
fn validate_rejects_out_of_range_values() {
    let mut s = Settings::default();
    assert!(s.validate().is_ok());

    s.audio.initial_volume = 101;
    assert!(s.validate().is_err());
    s.audio.initial_volume = 50;

    s.controls.volume_step = 0;
    assert!(s.validate().is_err());
    s.controls.volume_step = 5;

    // A scrub that overflows i32 seconds would wrap the seek direction.
    s.controls.scrub_seconds = 0;
    assert!(s.validate().is_err());
    s.controls.scrub_seconds = u64::MAX;
    assert!(s.validate().is_err());
    s.controls.scrub_seconds = 5;

    s.server.base_url = "  ".to_string();
    assert!(s.validate().is_err());
}

#[test]
fn server_urls_join_cleanly() {
    let server = ServerSettings {
        base_url: "http://test/".to_string(),
        ..ServerSettings::default()
    };

    assert_eq!(server.listing_url(""), "http://test/songs/");
    assert_eq!(server.listing_url("Indie"), "http://test/songs/Indie/");
    assert_eq!(
        server.track_url("Indie", "My%20Song.mp3"),
        "http://test/songs/Indie/My%20Song.mp3"
    );
    assert_eq!(
        server.metadata_url("Indie"),
        "http://test/songs/Indie/info.json"
    );
    assert_eq!(server.cover_url("Indie"), "http://test/songs/Indie/Cover.jpg");
    assert_eq!(server.fallback_cover_url(), "http://test/fallback.jpg");
}
