//! Site configuration (site.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::content::{RenderRules, SiteSettings};

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Public URL of the site, used for share links and the OAuth callback
    pub url: String,
    pub language: String,

    // Directory
    pub content_dir: String,
    /// Static assets (images, admin panel) served as-is
    pub public_dir: String,

    /// Markdown rendering rules
    pub render: RenderRules,

    /// CMS login through GitHub
    pub oauth: OAuthConfig,

    /// Settings used when the content tree does not provide them
    pub defaults: SiteSettings,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:4000".to_string(),
            language: "pt-BR".to_string(),

            content_dir: "content".to_string(),
            public_dir: "public".to_string(),

            render: RenderRules::default(),
            oauth: OAuthConfig::default(),
            defaults: SiteSettings::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        let mut config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        config.oauth.apply_env();
        Ok(config)
    }

    /// Defaults plus environment overrides, for sites without a config file
    pub fn from_env() -> Self {
        let mut config = SiteConfig::default();
        config.oauth.apply_env();
        config
    }
}

/// OAuth application settings for the CMS login flow
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuthConfig {
    pub client_id: Option<String>,
    /// Prefer the `GITHUB_CLIENT_SECRET` environment variable over the file
    #[serde(skip_serializing)]
    pub client_secret: Option<String>,
    pub authorize_url: String,
    pub token_url: String,
    /// Callback registered with the provider; defaults to `<url>/api/auth`
    pub redirect_uri: Option<String>,
    pub scope: String,
    /// Admin panel path the token is handed to
    pub admin_path: String,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            authorize_url: "https://github.com/login/oauth/authorize".to_string(),
            token_url: "https://github.com/login/oauth/access_token".to_string(),
            redirect_uri: None,
            scope: "repo,user".to_string(),
            admin_path: "/admin/".to_string(),
        }
    }
}

impl OAuthConfig {
    pub const CLIENT_ID_ENV: &'static str = "GITHUB_CLIENT_ID";
    pub const CLIENT_SECRET_ENV: &'static str = "GITHUB_CLIENT_SECRET";

    /// Take client credentials from the environment when set
    pub fn apply_env(&mut self) {
        if let Ok(id) = std::env::var(Self::CLIENT_ID_ENV) {
            if !id.is_empty() {
                self.client_id = Some(id);
            }
        }
        if let Ok(secret) = std::env::var(Self::CLIENT_SECRET_ENV) {
            if !secret.is_empty() {
                self.client_secret = Some(secret);
            }
        }
    }

    /// Callback URL for a site served at `site_url`
    pub fn redirect_uri_for(&self, site_url: &str) -> String {
        self.redirect_uri
            .clone()
            .unwrap_or_else(|| format!("{}/api/auth", site_url.trim_end_matches('/')))
    }
}
