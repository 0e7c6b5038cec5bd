//! Embedded theme templates using the Tera template engine
//!
//! All templates are compiled into the binary, so a generated site needs no
//! theme directory on disk.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::content::Heading;

/// Template renderer with the embedded theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // The templates emit HTML and already-safe URLs
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("theme/layout.html")),
            ("index.html", include_str!("theme/index.html")),
            ("post.html", include_str!("theme/post.html")),
            ("page.html", include_str!("theme/page.html")),
            ("contact.html", include_str!("theme/contact.html")),
            ("category.html", include_str!("theme/category.html")),
            ("categories.html", include_str!("theme/categories.html")),
            (
                "partials/head.html",
                include_str!("theme/partials/head.html"),
            ),
            (
                "partials/header.html",
                include_str!("theme/partials/header.html"),
            ),
            (
                "partials/footer.html",
                include_str!("theme/partials/footer.html"),
            ),
            (
                "partials/pagination.html",
                include_str!("theme/partials/pagination.html"),
            ),
            (
                "partials/post_card.html",
                include_str!("theme/partials/post_card.html"),
            ),
        ])?;

        tera.register_filter("strip_html", strip_html_filter);
        tera.register_filter("truncate_chars", truncate_chars_filter);
        tera.register_filter("date_format", date_format_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: strip HTML tags
fn strip_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("strip_html", "value", String, value);
    Ok(tera::Value::String(crate::helpers::strip_html(&s)))
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };
    Ok(tera::Value::String(crate::helpers::truncate(
        &s, length, None,
    )))
}

/// Tera filter: reformat a `YYYY-MM-DD` date string
fn date_format_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("date_format", "value", String, value);
    let format = match args.get("format") {
        Some(val) => tera::try_get_value!("date_format", "format", String, val),
        None => "short".to_string(),
    };

    if format == "full" {
        if let Ok(date) = chrono::NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
            return Ok(tera::Value::String(date.format("%B %d, %Y").to_string()));
        }
    }

    Ok(tera::Value::String(s))
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub posts: Vec<PostData>,
    pub pages: Vec<PageData>,
    pub categories: Vec<CategoryData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub title: String,
    pub date: String,
    pub path: String,
    pub permalink: String,
    pub description: String,
    pub image: Option<String>,
    pub categories: Vec<String>,
    pub content: String,
    pub reading_time: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageData {
    pub title: String,
    pub date: String,
    pub path: String,
    pub permalink: String,
    pub content: String,
    pub layout: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryData {
    pub name: String,
    pub slug: String,
    pub path: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaginationData {
    pub per_page: usize,
    pub total: usize,
    pub current: usize,
    pub prev_link: String,
    pub next_link: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeadingData {
    pub level: usize,
    pub text: String,
    pub slug: String,
}

impl From<&Heading> for HeadingData {
    fn from(h: &Heading) -> Self {
        Self {
            level: h.level,
            text: h.text.clone(),
            slug: h.slug.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub base_url: String,
    pub root: String,
    pub blog_dir: String,
    pub category_dir: String,
    pub per_page: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ThemeData {
    /// Value of the data-theme attribute on <html>
    pub default: String,
    pub allow_toggle: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_compile() {
        // add_raw_templates parses every template eagerly
        assert!(TemplateRenderer::new().is_ok());
    }

    #[test]
    fn test_date_format_filter_full() {
        let mut args = HashMap::new();
        args.insert("format".to_string(), tera::Value::String("full".into()));
        let out = date_format_filter(&tera::Value::String("2024-01-15".into()), &args).unwrap();
        assert_eq!(out, tera::Value::String("January 15, 2024".into()));
    }
}
