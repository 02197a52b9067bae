//! Directory listing parser.
//!
//! Autoindex pages enumerate a folder through anchor elements; this module
//! reads those anchors structurally (markup events only, nothing embedded in
//! the page is ever evaluated) and filters them into album folder candidates
//! or audio file names. Autoindex HTML is rarely well-formed XML, so parse
//! errors are logged and skipped rather than surfaced to the caller.

use quick_xml::Reader;
use quick_xml::events::Event;

/// Extract all anchor `href` targets from `html`, in document order.
/// Duplicates are preserved; an unparseable input yields whatever was
/// readable up to that point (possibly nothing).
pub fn hrefs(html: &str) -> Vec<String> {
    let mut reader = Reader::from_str(html);
    {
        let config = reader.config_mut();
        config.trim_text(true);
        config.check_end_names = false;
    }

    let mut out: Vec<String> = Vec::new();
    let mut last_err_pos = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.name().as_ref().eq_ignore_ascii_case(b"a") {
                    for attr in e.attributes().with_checks(false).flatten() {
                        if attr.key.as_ref().eq_ignore_ascii_case(b"href") {
                            if let Ok(value) = attr.unescape_value() {
                                out.push(value.into_owned());
                            }
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                let pos = reader.buffer_position();
                log::warn!("listing parse error at {}: {}", pos, e);
                // Bail out if the reader stopped making progress.
                if Some(pos) == last_err_pos {
                    break;
                }
                last_err_pos = Some(pos);
            }
            Ok(_) => {}
        }
    }

    out
}

/// Album folder candidates: the trailing path component of every href that
/// contains `/<segment>/`, plus the bare relative trailing-slash form
/// autoindex pages emit (`alpha/`). Parent links and query-string links are
/// never candidates.
pub fn folders(html: &str, segment: &str) -> Vec<String> {
    let needle = format!("/{}/", segment.trim_matches('/'));

    hrefs(html)
        .into_iter()
        .filter(|href| href.contains(&needle) || is_relative_folder(href))
        .filter_map(|href| {
            href.split('/')
                .filter(|part| !part.is_empty())
                .next_back()
                .map(str::to_string)
        })
        .filter(|name| name != "..")
        .collect()
}

/// Relative folder link as served by nginx autoindex or
/// `python -m http.server`: no scheme, no leading slash, trailing slash.
fn is_relative_folder(href: &str) -> bool {
    href.ends_with('/')
        && !href.starts_with('/')
        && !href.starts_with("../")
        && !href.starts_with("./")
        && !href.contains("://")
        && !href.contains('?')
}

/// Audio file names inside `folder`: hrefs ending in one of `extensions`,
/// with everything up to and including `<folder>/` stripped. When `folder`
/// is empty (the listing root), the last path component is used.
pub fn audio_files(html: &str, folder: &str, extensions: &[String]) -> Vec<String> {
    let suffixes: Vec<String> = extensions
        .iter()
        .map(|e| format!(".{}", e.trim().trim_start_matches('.').to_ascii_lowercase()))
        .filter(|e| e.len() > 1)
        .collect();

    let folder = folder.trim_matches('/');
    let prefix = if folder.is_empty() {
        None
    } else {
        Some(format!("{folder}/"))
    };

    hrefs(html)
        .into_iter()
        .filter(|href| {
            let lower = href.to_ascii_lowercase();
            suffixes.iter().any(|s| lower.ends_with(s.as_str()))
        })
        .map(|href| strip_folder_prefix(&href, prefix.as_deref()))
        .collect()
}

fn strip_folder_prefix(href: &str, prefix: Option<&str>) -> String {
    if let Some(p) = prefix {
        if let Some(idx) = href.find(p) {
            return href[idx + p.len()..].to_string();
        }
    }
    // Root listing, or an href that does not mention the folder at all:
    // fall back to the bare file name.
    href.rsplit('/').next().unwrap_or(href).to_string()
}
