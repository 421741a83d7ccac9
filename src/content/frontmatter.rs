//! Front-matter extraction
//!
//! A content file may open with a header block delimited by `---` lines:
//!
//! ```text
//! ---
//! title: Hello World
//! date: 2024-01-01
//! ---
//! Body text here
//! ```
//!
//! Every header line holding `": "` becomes a string pair. Nothing is typed
//! at parse time; consumers ask for the shape they need (`date()`,
//! `number()`, [`FeaturedVideo`]).

use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::Serialize;

/// Header block delimiter line
pub const DELIMITER: &str = "---";

/// Separator between key and value on a header line
const SEPARATOR: &str = ": ";

/// A parsed content file: header metadata plus the Markdown body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    pub metadata: FrontMatter,
    pub body: String,
}

/// String key/value metadata taken from a document header
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FrontMatter {
    fields: IndexMap<String, String>,
    /// Indented records that follow a bare `key:` line
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    sections: IndexMap<String, IndexMap<String, String>>,
}

impl FrontMatter {
    /// Split raw text into metadata and body.
    ///
    /// Total over all inputs: a missing or unterminated header yields empty
    /// metadata and the whole input as body.
    pub fn extract(raw: &str) -> Document {
        match split_header(raw) {
            Some((header, body)) => Document {
                metadata: Self::parse_header(header),
                body: body.to_string(),
            },
            None => Document {
                metadata: FrontMatter::default(),
                body: raw.to_string(),
            },
        }
    }

    /// Parse the lines between the delimiters
    fn parse_header(header: &str) -> Self {
        let mut fm = FrontMatter::default();
        let mut section: Option<String> = None;

        for line in header.lines() {
            let indented = line.starts_with(char::is_whitespace);

            if !indented {
                section = None;
                let trimmed = line.trim_end();
                if trimmed.ends_with(':') && !trimmed.contains(SEPARATOR) {
                    let name = trimmed.trim_end_matches(':').trim();
                    if !name.is_empty() {
                        fm.sections.insert(name.to_string(), IndexMap::new());
                        section = Some(name.to_string());
                    }
                }
            }

            let Some((key, value)) = line.split_once(SEPARATOR) else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            if indented {
                if let Some(record) = section.as_ref().and_then(|s| fm.sections.get_mut(s)) {
                    record.insert(key.to_string(), value.to_string());
                }
            }

            // Last occurrence wins
            fm.fields.insert(key.to_string(), value.to_string());
        }

        fm
    }

    /// Raw value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Value for `key`, treating an empty string as absent
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    /// Value for `key` parsed as an unsigned number
    pub fn number(&self, key: &str) -> Option<u32> {
        self.text(key).and_then(|v| v.parse().ok())
    }

    /// Value for `key` parsed as a date
    pub fn date(&self, key: &str) -> Option<NaiveDateTime> {
        self.text(key).and_then(parse_date_string)
    }

    /// Indented record introduced by a bare `name:` line
    pub fn section(&self, name: &str) -> Option<&IndexMap<String, String>> {
        self.sections.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Locate the header block, returning `(header, body)`.
///
/// The first line must be exactly `---`; the header runs to the next line
/// that is exactly `---`. The closing line may end the input.
fn split_header(raw: &str) -> Option<(&str, &str)> {
    let rest = raw
        .strip_prefix("---\r\n")
        .or_else(|| raw.strip_prefix("---\n"))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let content = line.trim_end_matches('\n').trim_end_matches('\r');
        if content == DELIMITER {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }

    None
}

/// A header record describing a video shown above a post.
///
/// ```text
/// featuredVideo:
///   type: youtube
///   url: https://www.youtube.com/watch?v=dQw4w9WgXcQ
///   caption: Entrevista
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeaturedVideo {
    pub source: VideoSource,
    pub caption: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum VideoSource {
    Youtube { url: String },
    File { file: String },
}

impl FeaturedVideo {
    const KEYS: [&'static str; 2] = ["featuredVideo", "featured_video"];

    /// Read the fixed `type`/`url`/`file`/`caption` record, if present and complete
    pub fn from_front_matter(fm: &FrontMatter) -> Option<Self> {
        let record = Self::KEYS.iter().find_map(|k| fm.section(k))?;
        let field = |name: &str| {
            record
                .get(name)
                .map(String::as_str)
                .filter(|v| !v.is_empty())
        };

        let source = match field("type")? {
            "youtube" => VideoSource::Youtube {
                url: field("url")?.to_string(),
            },
            "file" | "upload" => VideoSource::File {
                file: field("file").or_else(|| field("url"))?.to_string(),
            },
            other => {
                tracing::debug!("Ignoring featured video of unknown type: {}", other);
                return None;
            }
        };

        Some(Self {
            source,
            caption: field("caption").map(str::to_string),
        })
    }

    /// URL the player should load
    pub fn src(&self) -> &str {
        match &self.source {
            VideoSource::Youtube { url } => url,
            VideoSource::File { file } => file,
        }
    }
}

/// Parse a date string in the formats content editors use
fn parse_date_string(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim().trim_matches(|c| c == '"' || c == '\'');

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y/%m/%d %H:%M:%S",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    // CMS output carries an offset, e.g. 2024-01-01T10:00:00.000Z
    chrono::DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.naive_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_key_values() {
        let raw = "---\ntitle: Hello World\ndate: 2024-01-01\n---\nBody text here";
        let doc = FrontMatter::extract(raw);

        assert_eq!(doc.metadata.get("title"), Some("Hello World"));
        assert_eq!(doc.metadata.get("date"), Some("2024-01-01"));
        assert_eq!(doc.metadata.len(), 2);
        assert_eq!(doc.body, "Body text here");
    }

    #[test]
    fn test_no_header_returns_raw_body() {
        let inputs = [
            "",
            "Just a paragraph.",
            "# Title\n\nSome text with key: value inside.",
            "--- not a delimiter\ntitle: x\n---",
            "text\n---\ntitle: late header\n---\n",
        ];
        for raw in inputs {
            let doc = FrontMatter::extract(raw);
            assert!(doc.metadata.is_empty(), "metadata for {:?}", raw);
            assert_eq!(doc.body, raw);
        }
    }

    #[test]
    fn test_extract_is_idempotent_on_body() {
        let raw = "---\ntitle: A\n---\nFirst line\n\nSecond: line\n";
        let first = FrontMatter::extract(raw);
        let second = FrontMatter::extract(&first.body);

        assert!(second.metadata.is_empty());
        assert_eq!(second.body, first.body);
    }

    #[test]
    fn test_duplicate_keys_last_wins() {
        let doc = FrontMatter::extract("---\ntitle: A\nauthor: Edson\ntitle: B\n---\n");
        assert_eq!(doc.metadata.get("title"), Some("B"));
        assert_eq!(doc.metadata.len(), 2);
    }

    #[test]
    fn test_empty_header() {
        let doc = FrontMatter::extract("---\n---\nOnly body");
        assert!(doc.metadata.is_empty());
        assert_eq!(doc.body, "Only body");
    }

    #[test]
    fn test_unterminated_header_is_body() {
        let raw = "---\ntitle: Never closed\n\nBody";
        let doc = FrontMatter::extract(raw);
        assert!(doc.metadata.is_empty());
        assert_eq!(doc.body, raw);
    }

    #[test]
    fn test_value_keeps_later_separators() {
        let doc = FrontMatter::extract("---\ndescription: Lei: artigo 5: caput \n---\n");
        assert_eq!(doc.metadata.get("description"), Some("Lei: artigo 5: caput"));
    }

    #[test]
    fn test_lines_without_separator_ignored() {
        let doc = FrontMatter::extract("---\njust words\nurl:https://x\ntags:\n  - a\nok: yes\n---\n");
        assert_eq!(doc.metadata.len(), 1);
        assert_eq!(doc.metadata.get("ok"), Some("yes"));
    }

    #[test]
    fn test_crlf_and_closing_at_end() {
        let doc = FrontMatter::extract("---\r\ntitle: Windows\r\n---");
        assert_eq!(doc.metadata.get("title"), Some("Windows"));
        assert_eq!(doc.body, "");
    }

    #[test]
    fn test_typed_accessors() {
        let doc = FrontMatter::extract(
            "---\ndate: 2024-03-15\nexperience: 12\ncases: many\nimage: \n---\n",
        );
        let fm = &doc.metadata;

        let date = fm.date("date").unwrap();
        assert_eq!(date.format("%d/%m/%Y").to_string(), "15/03/2024");
        assert_eq!(fm.number("experience"), Some(12));
        assert_eq!(fm.number("cases"), None);
        assert_eq!(fm.get("image"), Some(""));
        assert_eq!(fm.text("image"), None);
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        for s in [
            "2024-01-15",
            "2024/01/15",
            "2024-01-15 10:30:00",
            "2024-01-15T10:30:00.000Z",
            "\"2024-01-15\"",
        ] {
            assert_eq!(parse_date_string(s).map(|d| d.date()), Some(expected), "{}", s);
        }
        assert_eq!(parse_date_string("ontem"), None);
    }

    #[test]
    fn test_featured_video_youtube() {
        let doc = FrontMatter::extract(
            "---\ntitle: Post\nfeaturedVideo:\n  type: youtube\n  url: https://youtu.be/dQw4w9WgXcQ\n  caption: Entrevista\nauthor: Edson\n---\nBody",
        );
        let video = FeaturedVideo::from_front_matter(&doc.metadata).unwrap();

        assert_eq!(
            video.source,
            VideoSource::Youtube {
                url: "https://youtu.be/dQw4w9WgXcQ".to_string()
            }
        );
        assert_eq!(video.caption.as_deref(), Some("Entrevista"));
        // Indented lines remain visible as flat pairs too
        assert_eq!(doc.metadata.get("caption"), Some("Entrevista"));
        assert_eq!(doc.metadata.get("author"), Some("Edson"));
    }

    #[test]
    fn test_featured_video_file_and_invalid() {
        let doc = FrontMatter::extract(
            "---\nfeaturedVideo:\n  type: file\n  file: /uploads/aula.mp4\n---\n",
        );
        let video = FeaturedVideo::from_front_matter(&doc.metadata).unwrap();
        assert_eq!(video.src(), "/uploads/aula.mp4");
        assert_eq!(video.caption, None);

        let missing_url = FrontMatter::extract("---\nfeaturedVideo:\n  type: youtube\n---\n");
        assert_eq!(FeaturedVideo::from_front_matter(&missing_url.metadata), None);

        let unknown = FrontMatter::extract("---\nfeaturedVideo:\n  type: vimeo\n  url: x\n---\n");
        assert_eq!(FeaturedVideo::from_front_matter(&unknown.metadata), None);

        let none = FrontMatter::extract("---\ntitle: x\n---\n");
        assert_eq!(FeaturedVideo::from_front_matter(&none.metadata), None);
    }
}
