//! Render a single Markdown file to sanitized HTML

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::content::{FeaturedVideo, FrontMatter};
use crate::Site;

/// What `render` prints: the header as JSON, then the HTML
#[derive(Debug, Serialize)]
pub struct RenderOutput {
    pub metadata: FrontMatter,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_video: Option<FeaturedVideo>,
    pub html: String,
}

/// Extract and render a file with the site's rules
pub fn render_file(site: &Site, path: &Path) -> Result<RenderOutput> {
    let raw = fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    let doc = FrontMatter::extract(&raw);
    let html = site.pipeline().render(Some(&doc.body));

    Ok(RenderOutput {
        featured_video: FeaturedVideo::from_front_matter(&doc.metadata),
        metadata: doc.metadata,
        html,
    })
}

/// Run the render command
pub fn run(site: &Site, path: &Path, json: bool) -> Result<()> {
    let output = render_file(site, path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&output.metadata)?);
        println!();
        println!("{}", output.html);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_render_file() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();
        let path = dir.path().join("post.md");
        fs::write(
            &path,
            "---\ntitle: Teste\n---\nOlá <script>alert(1)</script>\n\n[vídeo](https://youtu.be/dQw4w9WgXcQ)\n",
        )
        .unwrap();

        let output = render_file(&site, &path).unwrap();
        assert_eq!(output.metadata.get("title"), Some("Teste"));
        assert!(!output.html.contains("<script"));
        assert!(output.html.contains("https://www.youtube.com/embed/dQw4w9WgXcQ"));

        let json = serde_json::to_value(&output).unwrap();
        assert!(json.get("featured_video").is_none());
    }

    #[test]
    fn test_render_missing_file() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();
        assert!(render_file(&site, &dir.path().join("nope.md")).is_err());
    }
}
