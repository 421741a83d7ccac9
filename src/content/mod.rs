//! Content module - documents, front-matter, rendering and sanitizing

pub mod embed;
mod frontmatter;
pub mod loader;
mod markdown;
mod pipeline;
pub mod post;
mod sanitize;
mod settings;

pub use frontmatter::{Document, FeaturedVideo, FrontMatter, VideoSource};
pub use loader::{ContentKind, ContentStore, LoadState};
pub use markdown::{MarkdownRenderer, RenderRules};
pub use pipeline::ContentPipeline;
pub use post::Post;
pub(crate) use sanitize::is_safe_url;
pub use sanitize::Sanitizer;
pub use settings::SiteSettings;
