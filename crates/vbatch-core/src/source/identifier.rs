//! Identifier (output filename stem) derivation from URLs.

use url::Url;

/// Extensions treated as direct media links (fetched without an extractor).
pub const MEDIA_EXTENSIONS: &[&str] = &[
    "mp4", "webm", "mkv", "mov", "m4v", "avi", "flv", "mp3", "m4a",
];

/// True for `youtube.com` (and subdomains), `youtube-nocookie.com` and `youtu.be`.
pub fn is_youtube_host(host: &str) -> bool {
    let host = host.to_ascii_lowercase();
    host == "youtu.be"
        || host == "youtube.com"
        || host.ends_with(".youtube.com")
        || host == "youtube-nocookie.com"
        || host.ends_with(".youtube-nocookie.com")
}

/// Extracts the video id from a YouTube URL.
///
/// Handles `watch?v=<id>`, `youtu.be/<id>`, and `/shorts/`, `/embed/`, `/live/` paths.
pub fn youtube_video_id(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    if !is_youtube_host(host) {
        return None;
    }
    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    let raw: Option<String> = if host.eq_ignore_ascii_case("youtu.be") {
        segments.first().map(|s| s.to_string())
    } else if matches!(segments.first(), Some(&"shorts" | &"embed" | &"live" | &"v")) {
        segments.get(1).map(|s| s.to_string())
    } else {
        url.query_pairs()
            .find(|(k, _)| k == "v")
            .map(|(_, v)| v.into_owned())
    };

    let id = sanitize_identifier(&raw?);
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}

/// Splits the last URL path segment into `(stem, extension)` when the
/// extension is a known media type. The extension is lowercased.
pub fn direct_file_name(url: &Url) -> Option<(String, String)> {
    let segment = url.path_segments()?.filter(|s| !s.is_empty()).last()?;
    let (stem, ext) = segment.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    if !MEDIA_EXTENSIONS.contains(&ext.as_str()) {
        return None;
    }
    let stem = sanitize_identifier(stem);
    if stem.is_empty() {
        return None;
    }
    Some((stem, ext))
}

/// Sanitizes a candidate identifier for use as a Linux filename stem.
///
/// - Replaces NUL, `/`, `\`, whitespace and control characters with `_`
/// - Collapses consecutive underscores
/// - Trims leading/trailing dots and underscores
/// - Limits length to 200 bytes, leaving room for the extension
pub fn sanitize_identifier(name: &str) -> String {
    const STEM_MAX: usize = 200;

    let mut out = String::with_capacity(name.len());
    let mut prev_underscore = false;

    for c in name.chars() {
        let replacement = if c == '/' || c == '\\' || c.is_control() || c.is_whitespace() {
            '_'
        } else {
            c
        };

        if replacement == '_' {
            if !prev_underscore {
                out.push('_');
            }
            prev_underscore = true;
        } else {
            out.push(replacement);
            prev_underscore = false;
        }
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_');

    if trimmed.len() > STEM_MAX {
        let mut take = STEM_MAX;
        while take > 0 && !trimmed.is_char_boundary(take) {
            take -= 1;
        }
        trimmed[..take].to_string()
    } else {
        trimmed.to_string()
    }
}
