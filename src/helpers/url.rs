//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters escaped in query values and fragments
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Encode a query or fragment component
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url("https://example.com/", "/blog/ola") // -> "https://example.com/blog/ola"
/// ```
pub fn full_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Click-to-chat link for a WhatsApp number
///
/// # Examples
/// ```ignore
/// whatsapp_link("5519996319810", Some("Olá")) // -> "https://wa.me/5519996319810?text=Ol%C3%A1"
/// ```
pub fn whatsapp_link(number: &str, message: Option<&str>) -> String {
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();
    match message {
        Some(text) if !text.is_empty() => {
            format!("https://wa.me/{}?text={}", digits, encode_component(text))
        }
        _ => format!("https://wa.me/{}", digits),
    }
}

/// `tel:` link for a formatted phone number
pub fn tel_link(phone: &str) -> String {
    let digits: String = phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();
    format!("tel:{}", digits)
}

/// A social network share target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLink {
    pub network: &'static str,
    pub href: String,
}

/// Share links for a page
pub fn share_links(page_url: &str, title: &str) -> Vec<ShareLink> {
    let url = encode_component(page_url);
    let text = encode_component(title);

    vec![
        ShareLink {
            network: "WhatsApp",
            href: format!(
                "https://wa.me/?text={}",
                encode_component(&format!("{} {}", title, page_url))
            ),
        },
        ShareLink {
            network: "Facebook",
            href: format!("https://www.facebook.com/sharer/sharer.php?u={}", url),
        },
        ShareLink {
            network: "LinkedIn",
            href: format!("https://www.linkedin.com/sharing/share-offsite/?url={}", url),
        },
        ShareLink {
            network: "X",
            href: format!("https://twitter.com/intent/tweet?url={}&text={}", url, text),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_url() {
        assert_eq!(
            full_url("https://example.com/", "/blog/ola"),
            "https://example.com/blog/ola"
        );
        assert_eq!(full_url("https://example.com", "sobre"), "https://example.com/sobre");
    }

    #[test]
    fn test_whatsapp_link() {
        assert_eq!(
            whatsapp_link("+55 (19) 99631-9810", None),
            "https://wa.me/5519996319810"
        );
        assert_eq!(
            whatsapp_link("5519996319810", Some("Olá, doutor")),
            "https://wa.me/5519996319810?text=Ol%C3%A1%2C%20doutor"
        );
    }

    #[test]
    fn test_tel_link() {
        assert_eq!(tel_link("(19) 99631-9810"), "tel:19996319810");
    }

    #[test]
    fn test_share_links() {
        let links = share_links("https://example.com/blog/a b", "Título");
        assert_eq!(links.len(), 4);
        assert_eq!(
            links[1].href,
            "https://www.facebook.com/sharer/sharer.php?u=https%3A%2F%2Fexample.com%2Fblog%2Fa%20b"
        );
        assert!(links[0].href.starts_with("https://wa.me/?text=T%C3%ADtulo%20https"));
        assert!(links[3].href.ends_with("&text=T%C3%ADtulo"));
    }
}
