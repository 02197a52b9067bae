use std::collections::HashMap;

use crate::config::ServerSettings;

use super::listing;
use super::model::Track;
use super::remote::{Remote, RemoteError};
use super::{load_albums, load_tracks};

/// In-memory [`Remote`] mapping URLs to canned responses.
#[derive(Default)]
struct FakeRemote {
    text: HashMap<String, String>,
    bytes: HashMap<String, Vec<u8>>,
}

impl FakeRemote {
    fn with_text(mut self, url: &str, body: &str) -> Self {
        self.text.insert(url.to_string(), body.to_string());
        self
    }

    fn with_bytes(mut self, url: &str, body: &[u8]) -> Self {
        self.bytes.insert(url.to_string(), body.to_vec());
        self
    }
}

impl Remote for FakeRemote {
    fn fetch_text(&self, url: &str) -> Result<String, RemoteError> {
        self.text
            .get(url)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound(url.to_string()))
    }

    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, RemoteError> {
        self.bytes
            .get(url)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound(url.to_string()))
    }
}

fn server() -> ServerSettings {
    ServerSettings {
        base_url: "http://test".to_string(),
        ..ServerSettings::default()
    }
}

#[test]
fn hrefs_keeps_document_order_and_duplicates() {
    let html = r#"<html><body>
        <a href="first/">first</a>
        <a href="second.mp3">second</a>
        <a href="first/">again</a>
    </body></html>"#;

    assert_eq!(listing::hrefs(html), vec!["first/", "second.mp3", "first/"]);
}

#[test]
fn hrefs_tolerates_sloppy_autoindex_markup() {
    // Unclosed tags and a bare <hr>, as nginx autoindex emits them.
    let html = r#"<html><head><title>Index of /songs/</title></head>
<body><h1>Index of /songs/</h1><hr><pre>
<a href="../">../</a>
<a href="alpha/">alpha/</a>
<a href="one.mp3">one.mp3</a>
</pre><hr></body></html>"#;

    let hrefs = listing::hrefs(html);
    assert!(hrefs.contains(&"alpha/".to_string()));
    assert!(hrefs.contains(&"one.mp3".to_string()));
}

#[test]
fn audio_files_filters_and_preserves_order() {
    let html = r#"<a href="/songs/a.mp3">a</a>
        <a href="/songs/cover.jpg">cover</a>
        <a href="/songs/c.mp3">c</a>
        <a href="/songs/notes.txt">notes</a>"#;

    let files = listing::audio_files(html, "", &["mp3".to_string()]);
    assert_eq!(files, vec!["a.mp3", "c.mp3"]);
}

#[test]
fn audio_files_matches_extension_case_insensitively() {
    let html = r#"<a href="loud.MP3">loud</a><a href="quiet.mp3">quiet</a>"#;
    let files = listing::audio_files(html, "", &["mp3".to_string()]);
    assert_eq!(files, vec!["loud.MP3", "quiet.mp3"]);
}

#[test]
fn audio_files_strips_folder_prefix() {
    let html = r#"<a href="/songs/alpha/01 intro.mp3">x</a>"#;
    let files = listing::audio_files(html, "alpha", &["mp3".to_string()]);
    assert_eq!(files, vec!["01 intro.mp3"]);
}

#[test]
fn folders_takes_trailing_component_under_segment() {
    let html = r#"<a href="../">../</a>
        <a href="/songs/alpha/">alpha</a>
        <a href="/songs/beta/">beta</a>
        <a href="/other/gamma/">gamma</a>
        <a href="delta/">delta/</a>"#;

    assert_eq!(
        listing::folders(html, "songs"),
        vec!["alpha", "beta", "delta"]
    );
}

#[test]
fn folders_accepts_relative_autoindex_links() {
    // nginx autoindex and `python -m http.server` link folders relative to
    // the page, without the listing path anywhere in the href.
    let html = r#"<html><body><h1>Directory listing for /songs/</h1><hr><ul>
<li><a href="../">../</a></li>
<li><a href="alpha/">alpha/</a></li>
<li><a href="beta/">beta/</a></li>
<li><a href="one.mp3">one.mp3</a></li>
<li><a href="?C=M;O=A">sort</a></li>
<li><a href="http://elsewhere/x/">x</a></li>
</ul><hr></body></html>"#;

    assert_eq!(listing::folders(html, "songs"), vec!["alpha", "beta"]);
}

#[test]
fn only_folders_with_valid_metadata_become_albums() {
    let server = server();
    let root = r#"<a href="/songs/good/">good</a><a href="/songs/bare/">bare</a>"#;
    let remote = FakeRemote::default()
        .with_text(&server.listing_url(""), root)
        .with_text(
            &server.metadata_url("good"),
            r#"{"title":"Good Album","description":"fine"}"#,
        )
        .with_bytes(&server.cover_url("good"), b"jpg");

    let albums = load_albums(&remote, &server);

    assert_eq!(albums.len(), 1);
    assert_eq!(albums[0].folder, "good");
    assert_eq!(albums[0].title, "Good Album");
    assert_eq!(albums[0].cover, server.cover_url("good"));
}

#[test]
fn albums_load_from_relative_listing_links() {
    let server = server();
    let root = r#"<a href="../">../</a><a href="good/">good/</a>"#;
    let remote = FakeRemote::default()
        .with_text(&server.listing_url(""), root)
        .with_text(
            &server.metadata_url("good"),
            r#"{"title":"Good","description":""}"#,
        )
        .with_bytes(&server.cover_url("good"), b"jpg");

    let albums = load_albums(&remote, &server);
    assert_eq!(albums.len(), 1);
    assert_eq!(albums[0].folder, "good");
}

#[test]
fn malformed_metadata_skips_the_folder() {
    let server = server();
    let root = r#"<a href="/songs/broken/">broken</a>"#;
    let remote = FakeRemote::default()
        .with_text(&server.listing_url(""), root)
        .with_text(&server.metadata_url("broken"), "not json");

    assert!(load_albums(&remote, &server).is_empty());
}

#[test]
fn missing_cover_falls_back() {
    let server = server();
    let root = r#"<a href="/songs/bare/">bare</a>"#;
    let remote = FakeRemote::default()
        .with_text(&server.listing_url(""), root)
        .with_text(
            &server.metadata_url("bare"),
            r#"{"title":"Bare","description":""}"#,
        );

    let albums = load_albums(&remote, &server);
    assert_eq!(albums[0].cover, server.fallback_cover_url());
}

#[test]
fn unreachable_root_listing_yields_empty_catalog() {
    let server = server();
    assert!(load_albums(&FakeRemote::default(), &server).is_empty());
}

#[test]
fn load_tracks_decodes_names_and_builds_urls() {
    let server = server();
    let html = r#"<a href="01%20intro.mp3">01 intro.mp3</a><a href="outro.mp3">outro.mp3</a>"#;
    let remote = FakeRemote::default().with_text(&server.listing_url("alpha"), html);

    let tracks = load_tracks(&remote, &server, "alpha");

    assert_eq!(
        tracks,
        vec![
            Track {
                file: "01%20intro.mp3".to_string(),
                name: "01 intro.mp3".to_string(),
                url: "http://test/songs/alpha/01%20intro.mp3".to_string(),
            },
            Track {
                file: "outro.mp3".to_string(),
                name: "outro.mp3".to_string(),
                url: "http://test/songs/alpha/outro.mp3".to_string(),
            },
        ]
    );
}

#[test]
fn load_tracks_handles_empty_and_missing_listings() {
    let server = server();

    let remote = FakeRemote::default().with_text(&server.listing_url("empty"), "<html></html>");
    assert!(load_tracks(&remote, &server, "empty").is_empty());

    assert!(load_tracks(&FakeRemote::default(), &server, "missing").is_empty());
}
