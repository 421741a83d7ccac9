//! Video embed detection for Markdown links

use html_escape::encode_double_quoted_attribute as attr;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref YOUTUBE_URL: Regex = Regex::new(
        r"^(?:https?:)?(?://)?(?:www\.|m\.)?(?:youtube(?:-nocookie)?\.com/(?:watch\?(?:[^#]*&)?v=|embed/|v/|shorts/|live/)|youtu\.be/)([A-Za-z0-9_-]{11})(?:[?&#/].*)?$"
    )
    .unwrap();
    static ref VIDEO_FILE: Regex = Regex::new(r"(?i)\.(mp4|webm|ogg)(?:\?.*)?$").unwrap();
}

/// Origin every generated player iframe points at
pub const YOUTUBE_EMBED_ORIGIN: &str = "https://www.youtube.com/embed/";

/// What a link destination should become
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget<'a> {
    /// A YouTube page, with its 11-character video id
    Youtube(&'a str),
    /// A direct video file; carries the MIME type
    VideoFile(&'static str),
    /// Anything else
    Plain,
}

/// Classify a link destination
pub fn classify(href: &str) -> LinkTarget<'_> {
    if let Some(id) = youtube_id(href) {
        return LinkTarget::Youtube(id);
    }
    if let Some(mime) = video_mime(href) {
        return LinkTarget::VideoFile(mime);
    }
    LinkTarget::Plain
}

/// Extract the video id from a YouTube watch/share/embed URL
pub fn youtube_id(href: &str) -> Option<&str> {
    YOUTUBE_URL
        .captures(href.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// MIME type for a link whose path ends in a known video extension
pub fn video_mime(href: &str) -> Option<&'static str> {
    let caps = VIDEO_FILE.captures(href.trim())?;
    let mime = match caps.get(1)?.as_str().to_ascii_lowercase().as_str() {
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        _ => "video/ogg",
    };
    Some(mime)
}

/// Responsive 16:9 player for a YouTube id.
///
/// The wrapper is a block-styled `span` so the player stays valid inside a paragraph.
pub fn youtube_player(id: &str) -> String {
    format!(
        concat!(
            r#"<span class="video-embed" style="display:block;position:relative;padding-bottom:56.25%;height:0;overflow:hidden;margin:1.5rem 0;border-radius:8px;">"#,
            r#"<iframe src="{}{}" title="YouTube video player" style="position:absolute;top:0;left:0;width:100%;height:100%;border:0;" "#,
            r#"allow="accelerometer; clipboard-write; encrypted-media; gyroscope; picture-in-picture" allowfullscreen></iframe></span>"#
        ),
        YOUTUBE_EMBED_ORIGIN,
        attr(id)
    )
}

/// Native player with a single source
pub fn video_player(src: &str, mime: &str) -> String {
    format!(
        concat!(
            r#"<video controls preload="metadata" style="display:block;width:100%;max-width:100%;margin:1.5rem 0;border-radius:8px;">"#,
            r#"<source src="{}" type="{}">Seu navegador não suporta a reprodução de vídeos.</video>"#
        ),
        attr(src),
        mime
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_youtube_id_variants() {
        for url in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
            "https://m.youtube.com/watch?v=dQw4w9WgXcQ&t=42s",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ?si=abc",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube.com/shorts/dQw4w9WgXcQ",
            "//www.youtube-nocookie.com/embed/dQw4w9WgXcQ",
        ] {
            assert_eq!(youtube_id(url), Some("dQw4w9WgXcQ"), "{}", url);
        }
    }

    #[test]
    fn test_youtube_id_rejects() {
        for url in [
            "https://www.youtube.com/watch?v=short",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQextra",
            "https://www.youtube.com/channel/UC123",
            "https://example.com/dev/dQw4w9WgXcQ",
            "https://notyoutube.com/watch?v=dQw4w9WgXcQ",
        ] {
            assert_eq!(youtube_id(url), None, "{}", url);
        }
    }

    #[test]
    fn test_video_mime() {
        assert_eq!(video_mime("/uploads/aula.mp4"), Some("video/mp4"));
        assert_eq!(video_mime("https://cdn.x/v.WEBM?token=1"), Some("video/webm"));
        assert_eq!(video_mime("clip.ogg"), Some("video/ogg"));
        assert_eq!(video_mime("/files/mp4-guide.pdf"), None);
        assert_eq!(video_mime("/video.mp4/page"), None);
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            classify("https://youtu.be/dQw4w9WgXcQ"),
            LinkTarget::Youtube("dQw4w9WgXcQ")
        );
        assert_eq!(classify("/v.mp4"), LinkTarget::VideoFile("video/mp4"));
        assert_eq!(classify("https://example.com"), LinkTarget::Plain);
    }

    #[test]
    fn test_players() {
        let html = youtube_player("dQw4w9WgXcQ");
        assert!(html.contains(r#"src="https://www.youtube.com/embed/dQw4w9WgXcQ""#));
        assert!(html.contains("allowfullscreen"));
        assert!(html.contains("padding-bottom:56.25%"));

        let html = video_player("/a.mp4?x=1&y=2", "video/mp4");
        assert!(html.contains(r#"<source src="/a.mp4?x=1&amp;y=2" type="video/mp4">"#));
        assert!(html.starts_with("<video controls"));
    }
}
