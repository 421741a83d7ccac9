//! Markdown body to page-ready HTML

use super::markdown::{MarkdownRenderer, RenderRules};
use super::sanitize::Sanitizer;

/// Renders a document body and sanitizes the result.
///
/// Sanitizing is not optional: there is no way to get unsanitized HTML out
/// of the pipeline.
pub struct ContentPipeline {
    renderer: MarkdownRenderer,
    sanitizer: Sanitizer,
}

impl ContentPipeline {
    pub fn new(rules: RenderRules) -> Self {
        Self {
            renderer: MarkdownRenderer::new(rules),
            sanitizer: Sanitizer::default(),
        }
    }

    /// Render Markdown and pass the HTML through the sanitizer
    pub fn render(&self, body: Option<&str>) -> String {
        let html = self.renderer.render(body);
        self.sanitizer.clean(&html)
    }

    /// Sanitize HTML assembled outside the renderer
    pub fn sanitize(&self, html: &str) -> String {
        self.sanitizer.clean(html)
    }

    pub fn rules(&self) -> &RenderRules {
        self.renderer.rules()
    }
}

impl Default for ContentPipeline {
    fn default() -> Self {
        Self::new(RenderRules::default())
    }
}
