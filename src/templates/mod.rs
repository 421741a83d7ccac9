//! Page templates: shared chrome (header, footer, WhatsApp button) and
//! the layout every page is wrapped in.
//!
//! Markup is kept minimal; the stylesheet only covers layout.

mod pages;

pub use pages::*;

use crate::content::SiteSettings;
use crate::helpers::{attr, is_safe_href, nav_link, tel_link, text, whatsapp_link};

/// Top-level site sections, for navigation highlighting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Home,
    About,
    Blog,
    Contact,
    Other,
}

/// Everything a page template needs besides its own content
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    pub settings: &'a SiteSettings,
    /// Public site URL without trailing slash
    pub site_url: &'a str,
    pub language: &'a str,
    pub section: Section,
}

/// Message prefilled when a visitor opens WhatsApp from the site
pub const WHATSAPP_GREETING: &str = "Olá! Gostaria de agendar uma consulta.";

const NAV: [(&str, &str, Section); 4] = [
    ("/", "Início", Section::Home),
    ("/sobre", "Sobre", Section::About),
    ("/blog", "Artigos", Section::Blog),
    ("/contato", "Contato", Section::Contact),
];

const STYLE: &str = r#"
*{box-sizing:border-box}body{margin:0;font-family:system-ui,sans-serif;color:#1f2e45;line-height:1.6}
.container{max-width:1100px;margin:0 auto;padding:0 1rem}
.site-header{background:#141f30;color:#fff;padding:1rem 0}.site-header a{color:#fff;text-decoration:none;margin-left:1rem}
.site-header .brand{font-weight:700;margin:0}.site-header .oab{font-size:.8rem;opacity:.8}
.site-header a.active{color:#c9a227}.site-header .bar{display:flex;justify-content:space-between;align-items:center;flex-wrap:wrap}
main{min-height:60vh;padding:2rem 0}.site-footer{background:#0a1220;color:#d0d9e6;padding:2rem 0;font-size:.9rem}
.site-footer a{color:#c9a227}.whatsapp-float{position:fixed;right:1.5rem;bottom:1.5rem;background:#25d366;color:#fff;border-radius:999px;padding:.9rem 1.2rem;text-decoration:none;font-weight:700;box-shadow:0 4px 12px rgba(0,0,0,.25)}
.cards{display:grid;grid-template-columns:repeat(auto-fill,minmax(280px,1fr));gap:1.5rem}
.card{border-radius:12px;box-shadow:0 4px 16px rgba(0,0,0,.08);overflow:hidden}.card .body{padding:1.25rem}
.card img{width:100%;height:190px;object-fit:cover}.category{color:#a87f1f;font-weight:600;font-size:.85rem}
.hero{background:#1f2e45;color:#fff;padding:4rem 0}.button{display:inline-block;background:#c9a227;color:#141f30;padding:.75rem 1.5rem;border-radius:8px;text-decoration:none;font-weight:700}
.share a{margin-right:.75rem}.empty{text-align:center;color:#7a8fad;padding:3rem 0}
@media print{.site-header,.site-footer,.whatsapp-float,.share,.print-button{display:none}}
"#;

/// Wrap page content in the document shell and shared chrome
pub fn layout(ctx: &PageContext<'_>, title: &str, description: Option<&str>, main: &str) -> String {
    let settings = ctx.settings;
    let full_title = if title.is_empty() || title == settings.site_name {
        settings.site_name.clone()
    } else {
        format!("{} | {}", title, settings.site_name)
    };
    let description = description.unwrap_or(&settings.hero_subtitle);

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<meta name="description" content="{description}">
<style>{style}</style>
</head>
<body>
{header}
<main>
<div class="container">
{main}
</div>
</main>
{footer}
{whatsapp}
</body>
</html>
"#,
        lang = attr(ctx.language),
        title = text(&full_title),
        description = attr(description),
        style = STYLE,
        header = header(ctx),
        main = main,
        footer = footer(settings),
        whatsapp = whatsapp_button(settings),
    )
}

/// Site header with brand and navigation
pub fn header(ctx: &PageContext<'_>) -> String {
    let nav: String = NAV
        .iter()
        .map(|(href, label, section)| nav_link(href, label, *section == ctx.section))
        .collect();

    format!(
        r#"<header class="site-header"><div class="container bar"><div><p class="brand"><a href="/">{}</a></p><span class="oab">{}</span></div><nav>{}</nav></div></header>"#,
        text(&ctx.settings.site_name),
        text(&ctx.settings.oab),
        nav
    )
}

/// Site footer with contact details and social links
pub fn footer(settings: &SiteSettings) -> String {
    let mut contacts = String::new();
    if !settings.phone.is_empty() {
        contacts.push_str(&format!(
            r#"<li>Telefone: <a href="{}">{}</a></li>"#,
            attr(&tel_link(&settings.phone)),
            text(&settings.phone)
        ));
    }
    if !settings.email.is_empty() {
        contacts.push_str(&format!(
            r#"<li>E-mail: <a href="mailto:{0}">{1}</a></li>"#,
            attr(&settings.email),
            text(&settings.email)
        ));
    }
    if !settings.address.is_empty() {
        contacts.push_str(&format!("<li>{}</li>", text(&settings.address)));
    }

    let social: String = [
        ("Instagram", &settings.instagram),
        ("LinkedIn", &settings.linkedin),
        ("Facebook", &settings.facebook),
    ]
    .iter()
    .filter(|(_, href)| href.as_str() != "#" && is_safe_href(href))
    .map(|(label, href)| {
        format!(
            r#"<a href="{}" target="_blank" rel="noopener noreferrer">{}</a> "#,
            attr(href),
            label
        )
    })
    .collect();

    format!(
        r#"<footer class="site-footer"><div class="container"><p><strong>{}</strong> · {}</p><ul>{}</ul><p class="social">{}</p><p>© {} {}. Todos os direitos reservados.</p></div></footer>"#,
        text(&settings.site_name),
        text(&settings.oab),
        contacts,
        social,
        chrono::Local::now().format("%Y"),
        text(&settings.site_name)
    )
}

/// Floating WhatsApp button; omitted when no number is configured
pub fn whatsapp_button(settings: &SiteSettings) -> String {
    let number = settings.whatsapp_digits();
    if number.is_empty() {
        return String::new();
    }
    format!(
        r#"<a class="whatsapp-float" href="{}" target="_blank" rel="noopener noreferrer" aria-label="Fale conosco pelo WhatsApp">WhatsApp</a>"#,
        attr(&whatsapp_link(&number, Some(WHATSAPP_GREETING)))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::FrontMatter;

    fn ctx(settings: &SiteSettings) -> PageContext<'_> {
        PageContext {
            settings,
            site_url: "https://example.com",
            language: "pt-BR",
            section: Section::Blog,
        }
    }

    #[test]
    fn test_layout_wraps_content() {
        let settings = SiteSettings::default();
        let html = layout(&ctx(&settings), "Artigos", None, "<p>conteúdo</p>");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<html lang="pt-BR">"#));
        assert!(html.contains("<title>Artigos | Edson Silva Maltez</title>"));
        assert!(html.contains("<p>conteúdo</p>"));
        assert!(html.contains("site-header"));
        assert!(html.contains("site-footer"));
        assert!(html.contains("whatsapp-float"));
    }

    #[test]
    fn test_header_marks_active_section() {
        let settings = SiteSettings::default();
        let html = header(&ctx(&settings));
        assert!(html.contains(r#"<a href="/blog" class="active" aria-current="page">Artigos</a>"#));
        assert!(html.contains(r#"<a href="/sobre">Sobre</a>"#));
        assert!(html.contains("OAB/SP 344.956"));
    }

    #[test]
    fn test_settings_are_escaped() {
        let settings = SiteSettings {
            site_name: "<script>x</script>".to_string(),
            ..Default::default()
        };
        let html = layout(&ctx(&settings), "", None, "");
        assert!(!html.contains("<script>x"));
        assert!(html.contains("&lt;script&gt;x"));
    }

    #[test]
    fn test_whatsapp_button() {
        let settings = SiteSettings::default();
        let html = whatsapp_button(&settings);
        assert!(html.contains("https://wa.me/5519996319810?text="));

        let none = SiteSettings {
            whatsapp: String::new(),
            ..Default::default()
        };
        assert_eq!(whatsapp_button(&none), "");
    }

    #[test]
    fn test_footer_skips_placeholder_social_links() {
        let settings = SiteSettings {
            instagram: "https://instagram.com/escritorio".to_string(),
            ..Default::default()
        };
        let html = footer(&settings);
        assert!(html.contains("https://instagram.com/escritorio"));
        assert!(!html.contains(">Facebook<"));
        assert!(html.contains("tel:19996319810"));
    }

    #[test]
    fn test_footer_drops_script_social_links() {
        let mut settings = SiteSettings::default();
        settings.apply(
            &FrontMatter::extract(
                "---\ninstagram: javascript:alert(document.cookie)\nlinkedin:  JaVaScRiPt:alert(1)\nfacebook: https://facebook.com/escritorio\n---\n",
            )
            .metadata,
        );
        let html = footer(&settings);
        assert!(!html.to_ascii_lowercase().contains("javascript:"));
        assert!(!html.contains(">Instagram<"));
        assert!(!html.contains(">LinkedIn<"));
        assert!(html.contains(r#"<a href="https://facebook.com/escritorio""#));
    }
}
