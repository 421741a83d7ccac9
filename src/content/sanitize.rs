//! Allow-list HTML sanitizer
//!
//! Rendered Markdown is inserted into pages verbatim, and content files can
//! be edited through the CMS, so every rendered fragment passes through
//! [`Sanitizer::clean`] before it reaches a template.

use ego_tree::NodeRef;
use html_escape::{encode_double_quoted_attribute, encode_text};
use scraper::{Html, Node};

use super::embed::YOUTUBE_EMBED_ORIGIN;

/// Elements kept as-is (with filtered attributes)
const ALLOWED_TAGS: &[&str] = &[
    "a", "abbr", "b", "blockquote", "br", "code", "dd", "del", "div", "dl", "dt", "em",
    "figcaption", "figure", "h1", "h2", "h3", "h4", "h5", "h6", "hr", "i", "iframe", "img",
    "input", "ins", "kbd", "li", "mark", "ol", "p", "pre", "s", "small", "source", "span",
    "strong", "sub", "sup", "table", "tbody", "td", "tfoot", "th", "thead", "tr", "u", "ul",
    "video",
];

/// Elements removed together with everything inside them
const DROPPED_TAGS: &[&str] = &[
    "script", "style", "object", "embed", "applet", "template", "noscript", "textarea",
    "select", "button", "form", "frame", "frameset", "head", "link", "meta", "base", "svg",
    "math",
];

const VOID_TAGS: &[&str] = &["br", "hr", "img", "input", "source"];

const GLOBAL_ATTRS: &[&str] = &["class", "id", "title"];

/// Allowed URL schemes for `href`/`src`
const URL_SCHEMES: &[&str] = &["http", "https", "mailto", "tel"];

fn tag_attrs(tag: &str) -> &'static [&'static str] {
    match tag {
        "a" => &["href", "target", "rel", "name"],
        "img" => &["src", "alt", "loading", "style", "width", "height"],
        "iframe" => &[
            "src",
            "style",
            "allow",
            "allowfullscreen",
            "width",
            "height",
            "frameborder",
        ],
        "video" => &["controls", "preload", "poster", "style", "width", "height"],
        "source" => &["src", "type"],
        "input" => &["type", "checked", "disabled"],
        "ol" => &["start"],
        "td" | "th" => &["style", "colspan", "rowspan"],
        "span" | "div" | "pre" | "code" | "p" => &["style"],
        _ => &[],
    }
}

/// Allow-list sanitizer for rendered fragments
#[derive(Debug, Clone)]
pub struct Sanitizer {
    iframe_origins: Vec<String>,
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self {
            iframe_origins: vec![
                YOUTUBE_EMBED_ORIGIN.to_string(),
                "https://www.youtube-nocookie.com/embed/".to_string(),
            ],
        }
    }
}

impl Sanitizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clean an HTML fragment, keeping only allow-listed markup
    pub fn clean(&self, html: &str) -> String {
        if html.is_empty() {
            return String::new();
        }

        let fragment = Html::parse_fragment(html);
        let mut out = String::with_capacity(html.len());
        for child in fragment.root_element().children() {
            self.write_node(child, &mut out);
        }
        out
    }

    fn write_node(&self, node: NodeRef<'_, Node>, out: &mut String) {
        match node.value() {
            Node::Text(text) => out.push_str(&encode_text(&**text)),
            Node::Element(element) => {
                let tag = element.name().to_ascii_lowercase();

                if DROPPED_TAGS.contains(&tag.as_str()) {
                    tracing::debug!("Sanitizer dropped <{}>", tag);
                    return;
                }

                if !ALLOWED_TAGS.contains(&tag.as_str()) {
                    // Unknown wrapper: keep what it contains
                    for child in node.children() {
                        self.write_node(child, out);
                    }
                    return;
                }

                let Some(attrs) = self.filter_attrs(&tag, element.attrs()) else {
                    tracing::debug!("Sanitizer dropped <{}> with a disallowed source", tag);
                    return;
                };

                out.push('<');
                out.push_str(&tag);
                for (name, value) in &attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&encode_double_quoted_attribute(value));
                    out.push('"');
                }
                out.push('>');

                if VOID_TAGS.contains(&tag.as_str()) {
                    return;
                }

                for child in node.children() {
                    self.write_node(child, out);
                }
                out.push_str("</");
                out.push_str(&tag);
                out.push('>');
            }
            // Comments, doctypes and processing instructions are dropped
            _ => {}
        }
    }

    /// Keep allowed attributes, sorted by name.
    ///
    /// Returns `None` when the element must go entirely (an iframe pointing
    /// outside the allowed origins, a non-checkbox input).
    fn filter_attrs<'a>(
        &self,
        tag: &str,
        attrs: impl Iterator<Item = (&'a str, &'a str)>,
    ) -> Option<Vec<(String, String)>> {
        let allowed = tag_attrs(tag);
        let mut kept: Vec<(String, String)> = Vec::new();

        for (name, value) in attrs {
            let name = name.to_ascii_lowercase();
            if !GLOBAL_ATTRS.contains(&name.as_str()) && !allowed.contains(&name.as_str()) {
                continue;
            }

            let keep = match name.as_str() {
                "href" => is_safe_url(value, false),
                "src" if tag == "img" => is_safe_url(value, true),
                "src" if tag == "iframe" => self.is_allowed_frame(value),
                "src" | "poster" => is_safe_url(value, false),
                "style" => is_safe_style(value),
                _ => true,
            };
            if keep {
                kept.push((name, value.to_string()));
            }
        }

        let has = |attr: &str| kept.iter().any(|(n, _)| n == attr);
        match tag {
            "iframe" if !has("src") => return None,
            "input" => {
                let checkbox = kept
                    .iter()
                    .any(|(n, v)| n == "type" && v.eq_ignore_ascii_case("checkbox"));
                if !checkbox {
                    return None;
                }
            }
            "a" if has("target") => {
                kept.retain(|(n, _)| n != "rel");
                kept.push(("rel".to_string(), "noopener noreferrer".to_string()));
            }
            _ => {}
        }

        kept.sort_by(|a, b| a.0.cmp(&b.0));
        Some(kept)
    }

    fn is_allowed_frame(&self, src: &str) -> bool {
        let src = src.trim();
        self.iframe_origins.iter().any(|origin| src.starts_with(origin.as_str()))
    }
}

/// Accept relative URLs and the allow-listed schemes.
///
/// `data:image/*` is accepted only where `allow_data_image` is set.
pub(crate) fn is_safe_url(url: &str, allow_data_image: bool) -> bool {
    // Browsers ignore embedded whitespace and control characters in schemes
    let normalized: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();

    let scheme_end = normalized.find(|c| matches!(c, ':' | '/' | '?' | '#'));
    match scheme_end {
        Some(pos) if normalized[pos..].starts_with(':') => {
            let scheme = &normalized[..pos];
            if URL_SCHEMES.contains(&scheme) {
                return true;
            }
            allow_data_image && scheme == "data" && normalized.starts_with("data:image/")
        }
        _ => true,
    }
}

fn is_safe_style(style: &str) -> bool {
    let lower = style.to_ascii_lowercase();
    !(lower.contains("url(")
        || lower.contains("expression")
        || lower.contains("javascript:")
        || lower.contains("behavior"))
}
