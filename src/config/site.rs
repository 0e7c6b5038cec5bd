//! Site configuration (config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,

    // URL
    pub base_url: String,
    pub root: String,

    // Directory
    pub source_dir: String,
    pub public_dir: String,
    pub blog_dir: String,
    pub category_dir: String,
    pub pagination_dir: String,

    // Content
    pub per_page: usize,
    pub summary_length: usize,
    pub related_posts: usize,
    pub render_drafts: bool,

    // Theme
    #[serde(default)]
    pub theme: ThemeConfig,

    // Contact page
    #[serde(default)]
    pub contact: ContactConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_string(),
            description: String::new(),
            author: "John Doe".to_string(),

            base_url: "http://example.com".to_string(),
            root: "/".to_string(),

            source_dir: "content".to_string(),
            public_dir: "public".to_string(),
            blog_dir: "blog".to_string(),
            category_dir: "categories".to_string(),
            pagination_dir: "page".to_string(),

            per_page: 4,
            summary_length: 150,
            related_posts: 3,
            render_drafts: false,

            theme: ThemeConfig::default(),
            contact: ContactConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// UI theme state, resolved once at startup and passed to templates
/// through the render context. There is no global theme state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Theme emitted as the page's data-theme attribute ("light" or "dark")
    pub default: String,
    /// Whether the rendered pages include the client-side toggle hook
    pub allow_toggle: bool,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            default: "light".to_string(),
            allow_toggle: true,
        }
    }
}

/// Contact page details
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ContactConfig {
    pub email: Option<String>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub location: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SiteConfig::default();
        assert_eq!(config.per_page, 4);
        assert_eq!(config.blog_dir, "blog");
        assert_eq!(config.theme.default, "light");
    }

    #[test]
    fn test_parse_partial_yaml() {
        let yaml = r#"
title: My Portfolio
base_url: https://example.org
per_page: 6
theme:
  default: dark
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Portfolio");
        assert_eq!(config.per_page, 6);
        assert_eq!(config.theme.default, "dark");
        // Unspecified fields keep defaults
        assert_eq!(config.source_dir, "content");
        assert!(config.theme.allow_toggle);
    }
}
