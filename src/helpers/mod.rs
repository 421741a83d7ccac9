//! Helper functions for page templates
//!
//! Dates in Brazilian format, share and contact URLs, and small HTML
//! builders with escaping built in.

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;
