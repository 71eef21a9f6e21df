//! Remote content bucket credentials

use anyhow::{Context, Result};

/// Default Cosmic API endpoint.
const DEFAULT_API_URL: &str = "https://api.cosmicjs.com/v3";

/// Connection settings for the remote content bucket.
///
/// Constructed once at process start and handed to [`crate::client::CmsClient`]
/// explicitly; there is no process-global client handle.
#[derive(Debug, Clone)]
pub struct CmsConfig {
    /// Logical container holding all content objects of this site
    pub bucket_slug: String,
    /// Read-only access key for the bucket
    pub read_key: String,
    /// Base URL of the content API
    pub api_url: String,
}

impl CmsConfig {
    /// Read bucket credentials from the environment.
    ///
    /// `COSMIC_BUCKET_SLUG` and `COSMIC_READ_KEY` are required;
    /// `COSMIC_API_URL` overrides the hosted endpoint (used by tests).
    pub fn from_env() -> Result<Self> {
        let bucket_slug =
            std::env::var("COSMIC_BUCKET_SLUG").context("COSMIC_BUCKET_SLUG is not set")?;
        let read_key = std::env::var("COSMIC_READ_KEY").context("COSMIC_READ_KEY is not set")?;
        let api_url =
            std::env::var("COSMIC_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        Ok(Self {
            bucket_slug,
            read_key,
            api_url,
        })
    }

    /// Build a config directly, bypassing the environment.
    pub fn new(bucket_slug: &str, read_key: &str, api_url: &str) -> Self {
        Self {
            bucket_slug: bucket_slug.to_string(),
            read_key: read_key.to_string(),
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash() {
        let config = CmsConfig::new("my-bucket", "key", "http://localhost:8000/");
        assert_eq!(config.api_url, "http://localhost:8000");
    }
}
