//! Markdown rendering with link and image rules

use html_escape::{encode_double_quoted_attribute as attr, encode_text};
use lazy_static::lazy_static;
use pulldown_cmark::{
    html, CodeBlockKind, CowStr, Event, LinkType, Options, Parser, Tag, TagEnd, TextMergeStream,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use super::embed::{self, LinkTarget};

lazy_static! {
    /// Bare URLs that GFM turns into links
    static ref BARE_URL: Regex = Regex::new(r"(?i)\b(?:https?://|www\.)[^\s<>]+").unwrap();
    static ref RAW_ANCHOR_OPEN: Regex = Regex::new(r"(?i)<a[\s>]").unwrap();
    static ref RAW_ANCHOR_CLOSE: Regex = Regex::new(r"(?i)</a\s*>").unwrap();
}

/// Default inline style for images in content
pub const DEFAULT_IMAGE_STYLE: &str =
    "max-width:100%;height:auto;border-radius:8px;display:block;margin:1.5rem auto;box-shadow:0 4px 12px rgba(0,0,0,0.15);";

/// How Markdown is turned into HTML.
///
/// Passed to [`MarkdownRenderer::new`]; every render call uses the rules of
/// the renderer it is made on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderRules {
    /// Single newlines become `<br />`
    pub breaks: bool,
    /// Tables, strikethrough, task lists and bare-URL autolinks
    pub gfm: bool,
    /// YouTube links become players, video file links become `<video>`
    pub embed_videos: bool,
    /// Links open in a new tab with `rel="noopener noreferrer"`
    pub external_links: bool,
    /// Images get `loading="lazy"`
    pub lazy_images: bool,
    /// Inline style applied to every image
    pub image_style: String,
    /// Highlight fenced code blocks with syntect
    pub highlight_code: bool,
    pub highlight_theme: String,
}

impl Default for RenderRules {
    fn default() -> Self {
        Self {
            breaks: true,
            gfm: true,
            embed_videos: true,
            external_links: true,
            lazy_images: true,
            image_style: DEFAULT_IMAGE_STYLE.to_string(),
            highlight_code: true,
            highlight_theme: "InspiredGitHub".to_string(),
        }
    }
}

/// Markdown renderer with custom link/image output
pub struct MarkdownRenderer {
    rules: RenderRules,
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl MarkdownRenderer {
    /// Create a renderer with the given rules
    pub fn new(rules: RenderRules) -> Self {
        Self {
            rules,
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }

    pub fn rules(&self) -> &RenderRules {
        &self.rules
    }

    /// Render Markdown to HTML. Absent or blank input renders to an empty string.
    pub fn render(&self, markdown: Option<&str>) -> String {
        let markdown = match markdown {
            Some(m) if !m.trim().is_empty() => m,
            _ => return String::new(),
        };

        let parser = TextMergeStream::new(Parser::new_ext(markdown, self.options()));
        let mut rewriter = Rewriter::new(self);
        for event in parser {
            rewriter.push(event);
        }

        let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut html_output, rewriter.out.into_iter());
        html_output
    }

    fn options(&self) -> Options {
        // Header blocks are stripped by FrontMatter::extract, not by the parser
        let mut options = Options::ENABLE_FOOTNOTES | Options::ENABLE_HEADING_ATTRIBUTES;
        if self.rules.gfm {
            options |= Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM;
        }
        options
    }

    /// Opening markup for a link, and how its closing tag is handled
    fn open_link(&self, href: &str, title: &str) -> (String, LinkState) {
        if self.rules.embed_videos {
            match embed::classify(href) {
                LinkTarget::Youtube(id) => {
                    return (embed::youtube_player(id), LinkState::Replaced);
                }
                LinkTarget::VideoFile(mime) => {
                    return (embed::video_player(href, mime), LinkState::Replaced);
                }
                LinkTarget::Plain => {}
            }
        }

        let mut tag = format!(r#"<a href="{}""#, attr(href));
        if !title.is_empty() {
            tag.push_str(&format!(r#" title="{}""#, attr(title)));
        }
        if self.rules.external_links {
            tag.push_str(r#" target="_blank" rel="noopener noreferrer""#);
        }
        tag.push('>');
        (tag, LinkState::Anchor)
    }

    fn image_tag(&self, src: &str, alt: &str, title: &str) -> String {
        let mut tag = format!(
            r#"<img src="{}" alt="{}" title="{}""#,
            attr(src),
            attr(alt),
            attr(title)
        );
        if self.rules.lazy_images {
            tag.push_str(r#" loading="lazy""#);
        }
        if !self.rules.image_style.is_empty() {
            tag.push_str(&format!(r#" style="{}""#, attr(&self.rules.image_style)));
        }
        tag.push_str(" />");
        tag
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");
        let plain = || {
            format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                attr(lang),
                encode_text(code)
            )
        };

        if !self.rules.highlight_code {
            return plain();
        }

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let Some(theme) = self
            .theme_set
            .themes
            .get(&self.rules.highlight_theme)
            .or_else(|| self.theme_set.themes.values().next())
        else {
            return plain();
        };

        match highlighted_html_for_string(code, &self.syntax_set, syntax, theme) {
            Ok(highlighted) => highlighted,
            Err(e) => {
                tracing::debug!("Highlighting failed for {}: {}", lang, e);
                plain()
            }
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new(RenderRules::default())
    }
}

/// What the end of the current link should produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkState {
    /// Closed with `</a>`
    Anchor,
    /// Replaced by a player; inner events are dropped
    Replaced,
}

struct PendingImage {
    src: String,
    title: String,
    alt: String,
    nesting: usize,
}

struct PendingCode {
    lang: Option<String>,
    content: String,
}

/// Rewrites parser events according to the renderer's rules
struct Rewriter<'r, 'a> {
    renderer: &'r MarkdownRenderer,
    out: Vec<Event<'a>>,
    link: Option<LinkState>,
    image: Option<PendingImage>,
    code: Option<PendingCode>,
    /// Open `<a>` tags written as raw inline HTML
    raw_anchors: usize,
}

impl<'r, 'a> Rewriter<'r, 'a> {
    fn new(renderer: &'r MarkdownRenderer) -> Self {
        Self {
            renderer,
            out: Vec::new(),
            link: None,
            image: None,
            code: None,
            raw_anchors: 0,
        }
    }

    fn push(&mut self, event: Event<'a>) {
        if let Some(code) = self.code.as_mut() {
            match event {
                Event::End(TagEnd::CodeBlock) => {
                    let html = self
                        .renderer
                        .highlight_code(&code.content, code.lang.as_deref());
                    self.out.push(Event::Html(CowStr::from(html)));
                    self.code = None;
                }
                Event::Text(text) => code.content.push_str(&text),
                _ => {}
            }
            return;
        }

        if let Some(image) = self.image.as_mut() {
            match event {
                Event::Start(Tag::Image { .. }) => image.nesting += 1,
                Event::End(TagEnd::Image) if image.nesting > 0 => image.nesting -= 1,
                Event::End(TagEnd::Image) => {
                    let html = self
                        .renderer
                        .image_tag(&image.src, &image.alt, &image.title);
                    self.image = None;
                    self.emit_html(html);
                }
                Event::Text(text) | Event::Code(text) => image.alt.push_str(&text),
                Event::SoftBreak | Event::HardBreak => image.alt.push(' '),
                _ => {}
            }
            return;
        }

        if self.link == Some(LinkState::Replaced) {
            if let Event::End(TagEnd::Link) = event {
                self.link = None;
            }
            return;
        }

        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(str::to_string)
                        .filter(|l| !l.is_empty()),
                    CodeBlockKind::Indented => None,
                };
                self.code = Some(PendingCode {
                    lang,
                    content: String::new(),
                });
            }
            Event::Start(Tag::Link {
                link_type,
                dest_url,
                title,
                ..
            }) => {
                let href = match link_type {
                    LinkType::Email => format!("mailto:{}", dest_url),
                    _ => dest_url.to_string(),
                };
                let (html, state) = self.renderer.open_link(&href, &title);
                self.link = Some(state);
                self.emit_html(html);
            }
            Event::End(TagEnd::Link) => {
                self.link = None;
                self.emit_html("</a>".to_string());
            }
            Event::Start(Tag::Image {
                dest_url, title, ..
            }) => {
                self.image = Some(PendingImage {
                    src: dest_url.to_string(),
                    title: title.to_string(),
                    alt: String::new(),
                    nesting: 0,
                });
            }
            Event::InlineHtml(html) => {
                let opened = RAW_ANCHOR_OPEN.find_iter(&html).count();
                let closed = RAW_ANCHOR_CLOSE.find_iter(&html).count();
                self.raw_anchors = (self.raw_anchors + opened).saturating_sub(closed);
                self.out.push(Event::InlineHtml(html));
            }
            Event::End(TagEnd::Paragraph) => {
                self.raw_anchors = 0;
                self.out.push(Event::End(TagEnd::Paragraph));
            }
            Event::SoftBreak if self.renderer.rules.breaks => self.out.push(Event::HardBreak),
            Event::Text(text)
                if self.renderer.rules.gfm && self.link.is_none() && self.raw_anchors == 0 =>
            {
                self.autolink(text)
            }
            other => self.out.push(other),
        }
    }

    /// Link bare URLs inside a text run
    fn autolink(&mut self, text: CowStr<'a>) {
        let mut last = 0;
        let mut found = false;

        for m in BARE_URL.find_iter(&text) {
            let url = trim_url_end(m.as_str());
            if url.len() <= "www.".len() {
                continue;
            }
            found = true;

            if m.start() > last {
                self.out
                    .push(Event::Text(CowStr::from(text[last..m.start()].to_string())));
            }

            let href = if url.to_ascii_lowercase().starts_with("www.") {
                format!("http://{}", url)
            } else {
                url.to_string()
            };
            let (open, state) = self.renderer.open_link(&href, "");
            self.emit_html(open);
            if state == LinkState::Anchor {
                self.out.push(Event::Text(CowStr::from(url.to_string())));
                self.emit_html("</a>".to_string());
            }
            last = m.start() + url.len();
        }

        if !found {
            self.out.push(Event::Text(text));
        } else if last < text.len() {
            self.out
                .push(Event::Text(CowStr::from(text[last..].to_string())));
        }
    }

    fn emit_html(&mut self, html: String) {
        self.out.push(Event::InlineHtml(CowStr::from(html)));
    }
}

/// Drop trailing punctuation that belongs to the sentence, not the URL
fn trim_url_end(url: &str) -> &str {
    let mut end = url.len();
    loop {
        let candidate = &url[..end];
        let Some(last) = candidate.chars().last() else {
            break;
        };
        let strip = match last {
            '.' | ',' | ':' | ';' | '!' | '?' | '"' | '\'' | '*' | '_' | '~' => true,
            ')' => candidate.matches(')').count() > candidate.matches('(').count(),
            _ => false,
        };
        if !strip {
            break;
        }
        end -= last.len_utf8();
    }
    &url[..end]
}
