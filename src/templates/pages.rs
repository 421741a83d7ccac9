//! Page bodies

use super::{layout, PageContext, WHATSAPP_GREETING};
use crate::content::embed::{video_mime, video_player, youtube_id, youtube_player};
use crate::content::{FeaturedVideo, Post, VideoSource};
use crate::helpers::{
    attr, date_xml, format_date_br, full_url, image_tag, link_to, long_date_br, print_button,
    share_links, tel_link, text, whatsapp_link,
};

/// Practice areas listed on the home page
const PRACTICE_AREAS: [(&str, &str); 4] = [
    (
        "Direito Civil",
        "Contratos, indenizações, cobranças e responsabilidade civil.",
    ),
    (
        "Direito Criminal",
        "Defesa técnica em inquéritos e processos criminais.",
    ),
    (
        "Direito Trabalhista",
        "Rescisões, horas extras, acidentes e reclamações trabalhistas.",
    ),
    (
        "Direito Imobiliário",
        "Compra e venda, locação, usucapião e regularização de imóveis.",
    ),
];

/// Posts shown on the home page
pub const HOME_POSTS: usize = 3;

fn date_label(post: &Post) -> String {
    match &post.date {
        Some(date) => format!(
            r#"<time datetime="{}">{}</time>"#,
            date_xml(date),
            format_date_br(date)
        ),
        None => "Data não informada".to_string(),
    }
}

fn post_card(post: &Post) -> String {
    let cover = post
        .image
        .as_deref()
        .map(|src| image_tag(src, &post.title, None))
        .unwrap_or_default();

    format!(
        r#"<article class="card">{cover}<div class="body"><span class="category">{category}</span><h2><a href="{href}">{title}</a></h2><p>{summary}</p><p class="meta">{date} · <a href="{href}">Ler mais →</a></p></div></article>"#,
        cover = cover,
        category = text(&post.category),
        href = attr(&post.path()),
        title = text(&post.title),
        summary = text(post.summary()),
        date = date_label(post),
    )
}

fn lawyer_section(ctx: &PageContext<'_>) -> String {
    let s = ctx.settings;
    format!(
        r#"<section class="about">{photo}<h2>{name}</h2><p>{bio}</p><ul class="stats"><li><strong>{experience}+</strong> Anos de experiência</li><li><strong>{cases}+</strong> Casos bem-sucedidos</li></ul></section>"#,
        photo = image_tag(&s.lawyer_photo, &s.lawyer_name, Some("lawyer-photo")),
        name = text(&s.lawyer_name),
        bio = text(&s.lawyer_bio),
        experience = s.experience,
        cases = s.cases,
    )
}

/// Landing page: hero, practice areas, the lawyer and the latest posts
pub fn home(ctx: &PageContext<'_>, latest: &[Post]) -> String {
    let s = ctx.settings;
    let cta = whatsapp_link(&s.whatsapp_digits(), Some(WHATSAPP_GREETING));

    let areas: String = PRACTICE_AREAS
        .iter()
        .map(|(name, blurb)| {
            format!(
                r#"<div class="card"><div class="body"><h3>{}</h3><p>{}</p></div></div>"#,
                name, blurb
            )
        })
        .collect();

    let posts = if latest.is_empty() {
        String::new()
    } else {
        let cards: String = latest.iter().take(HOME_POSTS).map(post_card).collect();
        format!(
            r#"<section class="latest"><h2>Artigos recentes</h2><div class="cards">{}</div><p>{}</p></section>"#,
            cards,
            link_to("/blog", "Ver todos os artigos")
        )
    };

    let hero_image = image_tag(&s.hero_image, &s.site_name, Some("hero-image"));

    let main = format!(
        r#"<section class="hero"><div class="container"><h1>{title}</h1><p>{subtitle}</p><a class="button" href="{cta}" target="_blank" rel="noopener noreferrer">Agende sua consulta</a>{hero_image}</div></section><section class="areas"><h2>Áreas de atuação</h2><div class="cards">{areas}</div></section>{about}{posts}"#,
        title = text(&s.hero_title),
        subtitle = text(&s.hero_subtitle),
        cta = attr(&cta),
        hero_image = hero_image,
        areas = areas,
        about = lawyer_section(ctx),
        posts = posts,
    );

    layout(ctx, &s.site_name, None, &main)
}

/// About page; `body_html` is the sanitized body of `pages/sobre.md`
pub fn about(ctx: &PageContext<'_>, body_html: &str) -> String {
    let main = format!(
        r#"<h1>Sobre</h1>{}<div class="page-body">{}</div>"#,
        lawyer_section(ctx),
        body_html
    );
    layout(ctx, "Sobre", Some(&ctx.settings.lawyer_bio), &main)
}

/// Blog listing with the search form
pub fn blog(ctx: &PageContext<'_>, posts: &[&Post], query: &str) -> String {
    let listing = if posts.is_empty() {
        r#"<p class="empty">Nenhum artigo encontrado.</p>"#.to_string()
    } else {
        let cards: String = posts.iter().map(|p| post_card(p)).collect();
        format!(r#"<div class="cards">{}</div>"#, cards)
    };

    let main = format!(
        r#"<section><h1>Artigos &amp; Publicações</h1><p>Análises jurídicas, dicas e informações relevantes para você e seu negócio.</p><form class="search" method="get" action="/blog"><input type="search" name="q" value="{}" placeholder="Buscar artigos..." aria-label="Buscar artigos"></form></section><section>{}</section>"#,
        attr(query),
        listing
    );

    layout(ctx, "Artigos", None, &main)
}

/// Player markup for a post's featured video, unsanitized
pub fn featured_video(video: &FeaturedVideo) -> String {
    let player = match &video.source {
        VideoSource::Youtube { url } => match youtube_id(url) {
            Some(id) => youtube_player(id),
            None => link_to(url, "Assistir ao vídeo"),
        },
        VideoSource::File { file } => video_player(file, video_mime(file).unwrap_or("video/mp4")),
    };

    match &video.caption {
        Some(caption) => format!(
            r#"<figure class="featured-video">{}<figcaption>{}</figcaption></figure>"#,
            player,
            text(caption)
        ),
        None => format!(r#"<figure class="featured-video">{}</figure>"#, player),
    }
}

/// Single post. `video_html` is the sanitized featured player, or empty.
pub fn post(ctx: &PageContext<'_>, post: &Post, video_html: &str) -> String {
    let page_url = full_url(ctx.site_url, &post.path());

    let mut meta = Vec::new();
    if let Some(date) = &post.date {
        meta.push(format!(
            r#"<time datetime="{}">{}</time>"#,
            date_xml(date),
            long_date_br(date)
        ));
    }
    if let Some(author) = &post.author {
        meta.push(format!("Por {}", text(author)));
    }

    let cover = post
        .image
        .as_deref()
        .map(|src| image_tag(src, &post.title, Some("cover")))
        .unwrap_or_default();

    let share: String = share_links(&page_url, &post.title)
        .iter()
        .map(|link| link_to(&link.href, link.network))
        .collect();

    let main = format!(
        r#"<article class="post"><p>{back}</p><span class="category">{category}</span><h1>{title}</h1><p class="meta">{meta}</p>{cover}{video}<div class="post-body">{body}</div><footer><div class="share"><strong>Compartilhe:</strong> {share}</div>{print}</footer></article>"#,
        back = link_to("/blog", "← Voltar para os artigos"),
        category = text(&post.category),
        title = text(&post.title),
        meta = meta.join(" · "),
        cover = cover,
        video = video_html,
        body = post.html,
        share = share,
        print = print_button("Imprimir"),
    );

    layout(ctx, &post.title, Some(post.summary()), &main)
}

/// Contact page; `body_html` is the sanitized body of `pages/contato.md`
pub fn contact(ctx: &PageContext<'_>, body_html: &str) -> String {
    let s = ctx.settings;
    let digits = s.whatsapp_digits();

    let mut details = String::new();
    if !s.address.is_empty() {
        details.push_str(&format!("<li><h3>Endereço</h3><p>{}</p></li>", text(&s.address)));
    }
    if !s.phone.is_empty() || !digits.is_empty() {
        details.push_str(&format!(
            r#"<li><h3>Telefone / WhatsApp</h3><p><a href="{}">{}</a></p><p>{}</p></li>"#,
            attr(&tel_link(&s.phone)),
            text(&s.phone),
            link_to(&whatsapp_link(&digits, None), "Iniciar conversa")
        ));
    }
    if !s.email.is_empty() {
        details.push_str(&format!(
            r#"<li><h3>E-mail</h3><p><a href="mailto:{}">{}</a></p></li>"#,
            attr(&s.email),
            text(&s.email)
        ));
    }
    details.push_str(
        "<li><h3>Horário de atendimento</h3><p>Segunda a Sexta: 9h às 17h</p><p>Sábado e Domingo: Fechado</p></li>",
    );

    let form = r#"<form class="contact-form" method="post" action="/contato"><h2>Envie uma mensagem</h2><label>Nome completo* <input type="text" name="name" required></label><label>E-mail* <input type="email" name="email" required></label><label>Telefone* <input type="tel" name="phone" required></label><label>Assunto <input type="text" name="subject"></label><label>Mensagem* <textarea name="message" rows="5" required></textarea></label><button type="submit" class="button">Enviar pelo WhatsApp</button></form>"#;

    let main = format!(
        r#"<h1>Entre em Contato</h1><p>Estamos prontos para atender você. Tire suas dúvidas ou agende uma consulta.</p><ul class="contact-details">{}</ul><div class="page-body">{}</div>{}"#,
        details, body_html, form
    );

    layout(ctx, "Contato", None, &main)
}

/// Shown for unknown routes and missing posts or pages
pub fn not_found(ctx: &PageContext<'_>) -> String {
    let main = format!(
        r#"<section class="not-found"><h1>Página não encontrada</h1><p>O conteúdo que você procura não existe ou foi removido.</p><p>{} · {}</p></section>"#,
        link_to("/", "Voltar ao início"),
        link_to("/blog", "Ver artigos")
    );
    layout(ctx, "Página não encontrada", None, &main)
}
