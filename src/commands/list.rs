//! List site content

use anyhow::Result;

use crate::content::post::load_posts;
use crate::content::{ContentKind, Post};
use crate::Site;

fn post_line(post: &Post) -> String {
    let date = post
        .date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "----------".to_string());
    format!("  {} - {} [{}]", date, post.title, post.slug)
}

/// List site content by type
pub fn run(site: &Site, content_type: &str) -> Result<()> {
    let kind: ContentKind = content_type.parse()?;
    let store = site.store();

    match kind {
        ContentKind::Posts => {
            let posts = load_posts(&store);
            println!("Posts ({}):", posts.len());
            for post in &posts {
                println!("{}", post_line(post));
            }
        }
        ContentKind::Pages | ContentKind::Settings => {
            let slugs = store.list(kind);
            println!("{} ({}):", capitalize(kind.dir_name()), slugs.len());
            for slug in slugs {
                let title = store
                    .fetch(kind, &slug)
                    .found()
                    .and_then(|doc| doc.metadata.text("title").map(str::to_string))
                    .unwrap_or_default();
                println!("  {} [{}]", title, slug);
            }
        }
    }

    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
