//! lawsite: content engine and server for a law-practice website
//!
//! Markdown documents with a small front-matter header are rendered,
//! sanitized and served as pages, with embeds for YouTube links and
//! video files and an OAuth relay for the CMS admin panel.

pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::{ContentPipeline, ContentStore, SiteSettings};

/// Name of the configuration file at the site root
pub const CONFIG_FILE: &str = "site.yml";

/// A site on disk
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Markdown content (settings/, pages/, posts/)
    pub content_dir: PathBuf,
    /// Static assets
    pub public_dir: PathBuf,
}

impl Site {
    /// Open the site in a directory; without `site.yml`, defaults and the environment apply
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::from_env()
        };

        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            content_dir,
            public_dir,
        })
    }

    pub fn store(&self) -> ContentStore {
        ContentStore::new(&self.content_dir)
    }

    /// Renderer and sanitizer configured from `render:` in the config
    pub fn pipeline(&self) -> ContentPipeline {
        ContentPipeline::new(self.config.render.clone())
    }

    /// Settings for a page: configured defaults, `settings/general.md`, then the page itself
    pub fn settings(&self, page: Option<&str>) -> SiteSettings {
        SiteSettings::load(&self.store(), &self.config.defaults, page)
    }

    /// Create a new post
    pub fn new_post(&self, title: &str) -> Result<PathBuf> {
        commands::new::run(self, title, content::ContentKind::Posts)
    }
}
