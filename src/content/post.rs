//! Post, page and category models

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::helpers::slugify;

/// A blog post, immutable once loaded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Post title
    pub title: String,

    /// Publication date
    pub date: DateTime<Local>,

    /// Raw markdown content
    pub raw: String,

    /// Rendered HTML content
    pub content: String,

    /// Short description; falls back to a truncated body excerpt
    pub description: String,

    /// Optional cover image path
    pub image: Option<String>,

    /// Post categories
    pub categories: Vec<String>,

    /// Source file path (relative to source dir)
    pub source: String,

    /// Full source file path
    pub full_source: PathBuf,

    /// URL path (without domain)
    pub path: String,

    /// Full permalink URL
    pub permalink: String,

    /// Whether the post is a draft
    pub draft: bool,

    /// Slug derived from the source filename
    pub slug: String,

    /// Estimated reading time in minutes
    pub reading_time: usize,

    /// Custom front-matter fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Post {
    /// Create a new post with minimal required fields
    pub fn new(title: String, date: DateTime<Local>, source: String) -> Self {
        let slug = slugify(&title);
        Self {
            title,
            date,
            raw: String::new(),
            content: String::new(),
            description: String::new(),
            image: None,
            categories: Vec::new(),
            source: source.clone(),
            full_source: PathBuf::from(&source),
            path: String::new(),
            permalink: String::new(),
            draft: false,
            slug,
            reading_time: 1,
            extra: HashMap::new(),
        }
    }
}

/// A standalone page (about, contact, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Page title
    pub title: String,

    /// Creation date
    pub date: DateTime<Local>,

    /// Raw markdown content
    pub raw: String,

    /// Rendered HTML content
    pub content: String,

    /// Layout template to use
    pub layout: String,

    /// Source file path (relative)
    pub source: String,

    /// Full source file path
    pub full_source: PathBuf,

    /// URL path (without domain)
    pub path: String,

    /// Full permalink URL
    pub permalink: String,

    /// Custom front-matter fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Page {
    /// Create a new page with minimal required fields
    pub fn new(title: String, date: DateTime<Local>, source: String) -> Self {
        Self {
            title,
            date,
            raw: String::new(),
            content: String::new(),
            layout: "page".to_string(),
            source: source.clone(),
            full_source: PathBuf::from(&source),
            path: String::new(),
            permalink: String::new(),
            extra: HashMap::new(),
        }
    }
}

/// A category with its usage count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub name: String,
    pub slug: String,
    pub path: String,
    pub permalink: String,
    pub count: usize,
}

impl Category {
    pub fn new(name: &str, base_url: &str, category_dir: &str) -> Self {
        let slug = slugify(name);
        let path = format!("/{}/{}/", category_dir, slug);
        let permalink = format!("{}{}", base_url.trim_end_matches('/'), path);
        Self {
            name: name.to_string(),
            slug,
            path,
            permalink,
            count: 0,
        }
    }
}

/// A heading extracted from post content, used for anchor navigation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    /// Heading depth, restricted to 2 or 3
    pub level: usize,
    pub text: String,
    pub slug: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_paths() {
        let cat = Category::new("Engineering Leadership", "https://example.com/", "categories");
        assert_eq!(cat.slug, "engineering-leadership");
        assert_eq!(cat.path, "/categories/engineering-leadership/");
        assert_eq!(
            cat.permalink,
            "https://example.com/categories/engineering-leadership/"
        );
    }
}
