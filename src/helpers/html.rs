//! HTML helper functions
//!
//! Everything taken from content files goes through [`text`] or [`attr`]
//! before it lands in a template.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::content::is_safe_url;

/// Escape text content
pub fn text(s: &str) -> String {
    encode_text(s).into_owned()
}

/// Escape a double-quoted attribute value
pub fn attr(s: &str) -> String {
    encode_double_quoted_attribute(s).into_owned()
}

/// Relative links and `http`, `https`, `mailto` and `tel` URLs
pub fn is_safe_href(href: &str) -> bool {
    !href.trim().is_empty() && is_safe_url(href, false)
}

/// Generate an anchor tag; external links open in a new tab.
///
/// A link with a disallowed scheme renders as its label only.
///
/// # Examples
/// ```ignore
/// link_to("/sobre", "Sobre") // -> <a href="/sobre">Sobre</a>
/// ```
pub fn link_to(href: &str, label: &str) -> String {
    if !is_safe_href(href) {
        return text(label);
    }
    if href.starts_with("http://") || href.starts_with("https://") {
        format!(
            r#"<a href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
            attr(href),
            text(label)
        )
    } else {
        format!(r#"<a href="{}">{}</a>"#, attr(href), text(label))
    }
}

/// Navigation link, marked when it points at the current page
pub fn nav_link(href: &str, label: &str, active: bool) -> String {
    if active {
        format!(
            r#"<a href="{}" class="active" aria-current="page">{}</a>"#,
            attr(href),
            text(label)
        )
    } else {
        format!(r#"<a href="{}">{}</a>"#, attr(href), text(label))
    }
}

/// Generate an image tag, or nothing when the source is empty or unsafe
pub fn image_tag(src: &str, alt: &str, class: Option<&str>) -> String {
    if src.trim().is_empty() || !is_safe_url(src, true) {
        return String::new();
    }
    match class {
        Some(class) => format!(
            r#"<img src="{}" alt="{}" class="{}" loading="lazy">"#,
            attr(src),
            attr(alt),
            attr(class)
        ),
        None => format!(
            r#"<img src="{}" alt="{}" loading="lazy">"#,
            attr(src),
            attr(alt)
        ),
    }
}

/// Button that opens the browser's print dialog
pub fn print_button(label: &str) -> String {
    format!(
        r#"<button type="button" class="print-button" onclick="window.print()">{}</button>"#,
        text(label)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escaping() {
        assert_eq!(text("<b>&</b>"), "&lt;b&gt;&amp;&lt;/b&gt;");
        assert_eq!(attr(r#"a"b"#), "a&quot;b");
    }

    #[test]
    fn test_link_to() {
        assert_eq!(link_to("/sobre", "Sobre"), r#"<a href="/sobre">Sobre</a>"#);
        assert!(link_to("https://oab.org.br", "OAB").contains(r#"target="_blank""#));
    }

    #[test]
    fn test_link_to_drops_script_urls() {
        assert_eq!(link_to("javascript:alert(1)", "<Clique>"), "&lt;Clique&gt;");
        assert_eq!(link_to(" JavaScript:alert(1)", "x"), "x");
        assert!(link_to("mailto:contato@example.com", "E-mail").contains("href=\"mailto:"));
        assert!(!is_safe_href(""));
        assert!(!is_safe_href("vbscript:msgbox"));
    }

    #[test]
    fn test_image_tag() {
        assert_eq!(image_tag("", "x", None), "");
        assert_eq!(image_tag("javascript:alert(1)", "x", None), "");
        assert!(image_tag("data:image/png;base64,AAAA", "x", None).starts_with("<img"));
        assert_eq!(
            image_tag("/a.jpg", "Foto \"1\"", Some("cover")),
            r#"<img src="/a.jpg" alt="Foto &quot;1&quot;" class="cover" loading="lazy">"#
        );
    }

    #[test]
    fn test_nav_link() {
        assert!(nav_link("/blog", "Blog", true).contains("aria-current"));
        assert!(!nav_link("/blog", "Blog", false).contains("active"));
    }
}
