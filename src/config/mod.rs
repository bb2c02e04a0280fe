//! Configuration module

mod site;

pub use site::ExternalLinkConfig;
pub use site::SiteConfig;
