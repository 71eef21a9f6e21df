//! Site configuration (blog.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Presentation settings for the rendered site.
///
/// Loaded from an optional `blog.yml`; every field has a default so the
/// file can be partial or absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site title shown in the header and page titles
    pub title: String,
    /// Site description used for the home page meta tags
    pub description: String,
    /// How many categories the navigation menus show
    pub nav_category_limit: usize,
    /// How many posts the home page grid shows below the featured post
    pub recent_post_limit: usize,
    /// How many category badges a post card shows
    pub card_category_limit: usize,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Modern Tech Blog".to_string(),
            description: "Explore the latest in AI, web development, and cloud computing"
                .to_string(),
            nav_category_limit: 6,
            recent_post_limit: 6,
            card_category_limit: 2,
        }
    }
}

impl SiteConfig {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = SiteConfig::default();
        assert_eq!(config.nav_category_limit, 6);
        assert_eq!(config.recent_post_limit, 6);
    }

    #[test]
    fn test_load_partial_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "title: My Blog").unwrap();

        let config = SiteConfig::load(file.path()).unwrap();
        assert_eq!(config.title, "My Blog");
        // Unspecified fields fall back to defaults
        assert_eq!(config.nav_category_limit, 6);
    }
}
