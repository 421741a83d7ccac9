//! Content store - reads documents from the content directory
//!
//! Files live at `<content_dir>/<kind>/<slug>.md`. Every fetch reads the
//! file again; nothing is cached.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use super::{Document, FrontMatter};

/// Content folders under the content root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Settings,
    Pages,
    Posts,
}

impl ContentKind {
    pub fn dir_name(self) -> &'static str {
        match self {
            ContentKind::Settings => "settings",
            ContentKind::Pages => "pages",
            ContentKind::Posts => "posts",
        }
    }
}

impl std::str::FromStr for ContentKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "settings" | "setting" => Ok(ContentKind::Settings),
            "page" | "pages" => Ok(ContentKind::Pages),
            "post" | "posts" => Ok(ContentKind::Posts),
            _ => anyhow::bail!("Unknown content kind: {}. Available: post, page, settings", s),
        }
    }
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Invalid slug: {0:?}")]
    InvalidSlug(String),

    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ContentError {
    pub fn is_not_found(&self) -> bool {
        match self {
            ContentError::InvalidSlug(_) => true,
            ContentError::Io { source, .. } => source.kind() == io::ErrorKind::NotFound,
        }
    }
}

/// Outcome of a document fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Found(Document),
    NotFound,
}

impl LoadState {
    pub fn found(self) -> Option<Document> {
        match self {
            LoadState::Found(doc) => Some(doc),
            LoadState::NotFound => None,
        }
    }
}

/// Reads content documents by kind and slug
#[derive(Debug, Clone)]
pub struct ContentStore {
    root: PathBuf,
}

impl ContentStore {
    /// Create a store rooted at the content directory
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// File path for a document; rejects slugs that are not URL-safe
    pub fn path_for(&self, kind: ContentKind, slug: &str) -> Result<PathBuf, ContentError> {
        if !is_valid_slug(slug) {
            return Err(ContentError::InvalidSlug(slug.to_string()));
        }
        Ok(self
            .root
            .join(kind.dir_name())
            .join(format!("{}.md", slug)))
    }

    /// Raw text of a document
    pub fn read(&self, kind: ContentKind, slug: &str) -> Result<String, ContentError> {
        let path = self.path_for(kind, slug)?;
        fs::read_to_string(&path).map_err(|source| ContentError::Io { path, source })
    }

    /// Fetch and parse a document. Every failure collapses to `NotFound`.
    pub fn fetch(&self, kind: ContentKind, slug: &str) -> LoadState {
        match self.read(kind, slug) {
            Ok(raw) => LoadState::Found(FrontMatter::extract(&raw)),
            Err(e) if e.is_not_found() => {
                tracing::debug!("{}/{} not found: {}", kind.dir_name(), slug, e);
                LoadState::NotFound
            }
            Err(e) => {
                tracing::warn!("{}", e);
                LoadState::NotFound
            }
        }
    }

    /// Slugs of all documents of a kind, sorted
    pub fn list(&self, kind: ContentKind) -> Vec<String> {
        let dir = self.root.join(kind.dir_name());
        if !dir.exists() {
            return Vec::new();
        }

        let mut slugs: Vec<String> = WalkDir::new(&dir)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && is_markdown_file(e.path()))
            .filter_map(|e| {
                e.path()
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .map(str::to_string)
            })
            .filter(|slug| is_valid_slug(slug))
            .collect();

        slugs.sort();
        slugs
    }
}

/// URL-safe identifier: ASCII letters, digits, `-` and `_`
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= 200
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md")
        .unwrap_or(false)
}
