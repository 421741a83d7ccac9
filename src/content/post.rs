//! Blog post model

use chrono::NaiveDateTime;
use serde::Serialize;

use super::loader::{ContentKind, ContentStore, LoadState};
use super::{ContentPipeline, Document, FeaturedVideo, FrontMatter};

/// Title shown when a post has none
pub const DEFAULT_TITLE: &str = "Sem título";

/// Category shown when a post has none
pub const DEFAULT_CATEGORY: &str = "Direito";

/// Characters of body text kept in a listing excerpt
pub const EXCERPT_CHARS: usize = 150;

/// A blog post
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    /// File name without extension; also the URL segment
    pub slug: String,

    pub title: String,

    pub description: Option<String>,

    pub category: String,

    /// Cover image URL
    pub image: Option<String>,

    pub author: Option<String>,

    /// Publication date, when the header has a parsable one
    pub date: Option<NaiveDateTime>,

    pub featured_video: Option<FeaturedVideo>,

    /// Start of the body, for listings
    pub excerpt: String,

    /// Raw markdown body
    pub raw: String,

    /// Rendered, sanitized body. Empty until [`Post::rendered`] is called.
    pub html: String,

    /// All header fields
    pub metadata: FrontMatter,
}

impl Post {
    /// Build a post from a parsed document without rendering its body
    pub fn from_document(slug: &str, doc: Document) -> Self {
        let fm = doc.metadata;
        let text = |key: &str| fm.text(key).map(str::to_string);

        Self {
            slug: slug.to_string(),
            title: text("title").unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            description: text("description"),
            category: text("category").unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            image: text("image"),
            author: text("author"),
            date: fm.date("date"),
            featured_video: FeaturedVideo::from_front_matter(&fm),
            excerpt: excerpt(&doc.body, EXCERPT_CHARS),
            raw: doc.body,
            html: String::new(),
            metadata: fm,
        }
    }

    /// Render the body through the pipeline
    pub fn rendered(mut self, pipeline: &ContentPipeline) -> Self {
        self.html = pipeline.render(Some(&self.raw));
        self
    }

    /// Listing text: the description when present, else the excerpt
    pub fn summary(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.excerpt)
    }

    /// Case-insensitive match against title or description
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(&term)
            || self
                .description
                .as_ref()
                .is_some_and(|d| d.to_lowercase().contains(&term))
    }

    /// URL path of the post page
    pub fn path(&self) -> String {
        format!("/blog/{}", self.slug)
    }
}

/// Load every post, newest first. Posts without a date go last.
pub fn load_posts(store: &ContentStore) -> Vec<Post> {
    let mut posts: Vec<Post> = store
        .list(ContentKind::Posts)
        .into_iter()
        .filter_map(|slug| match store.fetch(ContentKind::Posts, &slug) {
            LoadState::Found(doc) => Some(Post::from_document(&slug, doc)),
            LoadState::NotFound => {
                tracing::warn!("Listed post vanished: {}", slug);
                None
            }
        })
        .collect();

    posts.sort_by(|a, b| match (a.date, b.date) {
        (Some(x), Some(y)) => y.cmp(&x).then_with(|| a.slug.cmp(&b.slug)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.slug.cmp(&b.slug),
    });

    posts
}

/// Load one post with its body rendered
pub fn load_post(store: &ContentStore, pipeline: &ContentPipeline, slug: &str) -> Option<Post> {
    store
        .fetch(ContentKind::Posts, slug)
        .found()
        .map(|doc| Post::from_document(slug, doc).rendered(pipeline))
}

/// Posts matching a search term
pub fn search<'a>(posts: &'a [Post], term: &str) -> Vec<&'a Post> {
    posts.iter().filter(|p| p.matches(term)).collect()
}

/// First `max` characters of the body with whitespace collapsed
fn excerpt(body: &str, max: usize) -> String {
    let flat = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        return flat;
    }
    let cut: String = flat.chars().take(max).collect();
    format!("{}...", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_post(dir: &TempDir, slug: &str, content: &str) {
        let posts = dir.path().join("posts");
        fs::create_dir_all(&posts).unwrap();
        fs::write(posts.join(format!("{}.md", slug)), content).unwrap();
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let post = Post::from_document("sem-dados", FrontMatter::extract("Apenas texto."));
        assert_eq!(post.title, DEFAULT_TITLE);
        assert_eq!(post.category, DEFAULT_CATEGORY);
        assert_eq!(post.date, None);
        assert_eq!(post.image, None);
        assert_eq!(post.summary(), "Apenas texto.");
        assert_eq!(post.path(), "/blog/sem-dados");
    }

    #[test]
    fn test_unparsable_date_is_absent() {
        let post = Post::from_document(
            "x",
            FrontMatter::extract("---\ntitle: X\ndate: amanhã\n---\n"),
        );
        assert_eq!(post.date, None);
        assert_eq!(post.metadata.get("date"), Some("amanhã"));
    }

    #[test]
    fn test_excerpt_truncates() {
        let body = "palavra ".repeat(40);
        let text = excerpt(&body, 20);
        assert!(text.ends_with("..."));
        assert!(text.chars().count() <= 23);
        assert_eq!(excerpt("curto\n\ntexto", 150), "curto texto");
    }

    #[test]
    fn test_load_posts_sorted_newest_first() {
        let dir = TempDir::new().unwrap();
        write_post(&dir, "antigo", "---\ntitle: Antigo\ndate: 2023-05-01\n---\nA");
        write_post(&dir, "novo", "---\ntitle: Novo\ndate: 2024-02-10\n---\nB");
        write_post(&dir, "sem-data", "---\ntitle: Sem data\n---\nC");

        let posts = load_posts(&ContentStore::new(dir.path()));
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["novo", "antigo", "sem-data"]);
        assert!(posts.iter().all(|p| p.html.is_empty()));
    }

    #[test]
    fn test_load_post_renders_body() {
        let dir = TempDir::new().unwrap();
        write_post(&dir, "ola", "---\ntitle: Olá\n---\n**forte**");
        let store = ContentStore::new(dir.path());
        let pipeline = ContentPipeline::default();

        let post = load_post(&store, &pipeline, "ola").unwrap();
        assert!(post.html.contains("<strong>forte</strong>"));
        assert!(load_post(&store, &pipeline, "outro").is_none());
    }

    #[test]
    fn test_search() {
        let posts = vec![
            Post::from_document(
                "a",
                FrontMatter::extract("---\ntitle: Direito Trabalhista\n---\n"),
            ),
            Post::from_document(
                "b",
                FrontMatter::extract("---\ntitle: Outro\ndescription: Guia de CONTRATOS\n---\n"),
            ),
        ];

        let found: Vec<_> = search(&posts, "trabalhista").iter().map(|p| p.slug.clone()).collect();
        assert_eq!(found, vec!["a"]);
        let found: Vec<_> = search(&posts, "contratos").iter().map(|p| p.slug.clone()).collect();
        assert_eq!(found, vec!["b"]);
        assert_eq!(search(&posts, "  ").len(), 2);
        assert!(search(&posts, "penal").is_empty());
    }
}
