//! Configuration module

mod site;

pub use site::OAuthConfig;
pub use site::SiteConfig;
