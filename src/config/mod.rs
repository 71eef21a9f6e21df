//! Configuration module

mod cms;
mod site;

pub use cms::CmsConfig;
pub use site::SiteConfig;
