//! cosmic-blog: a server-rendered blog front end for a headless CMS
//!
//! All content lives in a remote Cosmic bucket. This crate wraps the
//! bucket's read API in a typed client, normalizes results and errors in a
//! small data-access layer, and renders pages with embedded Tera templates.

pub mod client;
pub mod config;
pub mod content;
pub mod helpers;
pub mod server;
pub mod store;
pub mod templates;

use anyhow::Result;
use std::path::Path;

use crate::client::CmsClient;
use crate::config::{CmsConfig, SiteConfig};
use crate::content::markdown::MarkdownRenderer;
use crate::store::ContentStore;
use crate::templates::TemplateRenderer;

/// The assembled blog application: configuration, data access and rendering.
///
/// Built once at startup and shared (behind an `Arc`) by every request
/// handler. Holds no mutable state; each request fetches its own entity
/// snapshots from the remote bucket.
pub struct Blog {
    /// Site presentation settings (title, nav limits, ...)
    pub site: SiteConfig,
    /// Data-access layer over the remote content bucket
    pub store: ContentStore,
    /// Embedded Tera template set
    pub templates: TemplateRenderer,
    /// Markdown renderer for post bodies
    pub markdown: MarkdownRenderer,
}

impl Blog {
    /// Assemble the application from a base directory.
    ///
    /// Reads `blog.yml` from the base directory if present (falling back to
    /// defaults) and the bucket credentials from the environment.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let config_path = base_dir.as_ref().join("blog.yml");

        let site = if config_path.exists() {
            SiteConfig::load(&config_path)?
        } else {
            SiteConfig::default()
        };

        let cms = CmsConfig::from_env()?;
        let store = ContentStore::new(CmsClient::new(cms)?);
        let templates = TemplateRenderer::new()?;
        let markdown = MarkdownRenderer::new();

        Ok(Self {
            site,
            store,
            templates,
            markdown,
        })
    }

    /// Serve the blog over HTTP until interrupted.
    pub async fn serve(self, ip: &str, port: u16) -> Result<()> {
        server::start(self, ip, port).await
    }
}
