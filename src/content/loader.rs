//! Content loader - reads posts and pages from the source directory

use anyhow::{Context, Result};
use chrono::Local;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::{FrontMatter, MarkdownRenderer, Page, Post};
use crate::helpers::{excerpt, full_url_for, reading_time, url_for};
use crate::Folio;

/// Loads content from the source directory
pub struct ContentLoader<'a> {
    folio: &'a Folio,
    renderer: MarkdownRenderer,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(folio: &'a Folio) -> Self {
        Self {
            folio,
            renderer: MarkdownRenderer::new(),
        }
    }

    /// Load all posts from `<source_dir>/<blog_dir>`, newest first.
    ///
    /// A file that cannot be read is fatal to the build; malformed
    /// front-matter only degrades that post to defaults.
    pub fn load_posts(&self) -> Result<Vec<Post>> {
        let posts_dir = self.folio.source_dir.join(&self.folio.config.blog_dir);
        if !posts_dir.exists() {
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();

        for entry in WalkDir::new(&posts_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && is_markdown_file(path) {
                let post = self
                    .load_post(path)
                    .with_context(|| format!("Failed to load post {:?}", path))?;
                if !post.draft || self.folio.config.render_drafts {
                    posts.push(post);
                }
            }
        }

        // Sort by date descending (newest first)
        posts.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(posts)
    }

    /// Load a single post from a file
    fn load_post(&self, path: &Path) -> Result<Post> {
        let content = fs::read_to_string(path)?;
        let (fm, body) = FrontMatter::parse(&content);

        let metadata = fs::metadata(path)?;
        let file_modified = metadata
            .modified()
            .ok()
            .map(chrono::DateTime::<Local>::from);

        let date = fm
            .parse_date()
            .unwrap_or_else(|| file_modified.unwrap_or_else(Local::now));

        // Title falls back to the filename
        let title = fm.title.unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Untitled")
                .to_string()
        });

        let source = path
            .strip_prefix(&self.folio.source_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        // Slug comes from the filename, not the title, so renaming the
        // title never breaks existing URLs
        let slug = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("untitled")
            .to_string();

        let blog_path = format!("{}/{}/", self.folio.config.blog_dir, slug);
        let path_url = url_for(&self.folio.config, &blog_path);
        let permalink = full_url_for(&self.folio.config, &blog_path);

        let content_html = self.renderer.render(body)?;

        // Missing description degrades to a truncated body excerpt
        let description = fm
            .description
            .unwrap_or_else(|| excerpt(body, self.folio.config.summary_length));

        let mut post = Post::new(title, date, source);
        post.raw = body.to_string();
        post.content = content_html;
        post.description = description;
        post.image = fm.image;
        post.categories = fm.categories;
        post.full_source = path.to_path_buf();
        post.path = path_url;
        post.permalink = permalink;
        post.draft = fm.draft;
        post.slug = slug;
        post.reading_time = reading_time(body);
        post.extra = fm.extra;

        Ok(post)
    }

    /// Load standalone pages (markdown files outside the blog directory)
    pub fn load_pages(&self) -> Result<Vec<Page>> {
        if !self.folio.source_dir.exists() {
            return Ok(Vec::new());
        }

        let mut pages = Vec::new();

        for entry in WalkDir::new(&self.folio.source_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            // Posts are handled by load_posts
            let relative = path.strip_prefix(&self.folio.source_dir).unwrap_or(path);
            let first_component = relative
                .components()
                .next()
                .and_then(|c| c.as_os_str().to_str());

            if let Some(first) = first_component {
                if first == self.folio.config.blog_dir || first.starts_with('_') {
                    continue;
                }
            }

            if path.is_file() && is_markdown_file(path) {
                let page = self
                    .load_page(path)
                    .with_context(|| format!("Failed to load page {:?}", path))?;
                pages.push(page);
            }
        }

        Ok(pages)
    }

    /// Load a single page from a file
    fn load_page(&self, path: &Path) -> Result<Page> {
        let content = fs::read_to_string(path)?;
        let (fm, body) = FrontMatter::parse(&content);

        let metadata = fs::metadata(path)?;
        let file_modified = metadata
            .modified()
            .ok()
            .map(chrono::DateTime::<Local>::from);

        let date = fm
            .parse_date()
            .unwrap_or_else(|| file_modified.unwrap_or_else(Local::now));

        let title = fm.title.unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Untitled")
                .to_string()
        });

        let source = path
            .strip_prefix(&self.folio.source_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        // index.md maps to its parent directory
        let page_path = {
            let without_ext = source.trim_end_matches(".md").trim_end_matches(".markdown");
            if without_ext.ends_with("/index") || without_ext == "index" {
                without_ext.trim_end_matches("index").to_string()
            } else {
                format!("{}/", without_ext)
            }
        };
        let page_path = if page_path.is_empty() {
            "/".to_string()
        } else {
            format!("/{}", page_path.trim_start_matches('/'))
        };

        let permalink = full_url_for(&self.folio.config, &page_path);

        let content_html = self.renderer.render(body)?;

        let mut page = Page::new(title, date, source);
        page.raw = body.to_string();
        page.content = content_html;
        page.layout = fm.layout.unwrap_or_else(|| "page".to_string());
        page.full_source = path.to_path_buf();
        page.path = page_path;
        page.permalink = permalink;
        page.extra = fm.extra;

        Ok(page)
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn site_with_content(files: &[(&str, &str)]) -> (TempDir, Folio) {
        let dir = TempDir::new().unwrap();
        for (rel, content) in files {
            let path = dir.path().join("content").join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        let folio = Folio::new(dir.path()).unwrap();
        (dir, folio)
    }

    #[test]
    fn test_load_posts_sorted_newest_first() {
        let (_dir, folio) = site_with_content(&[
            (
                "blog/older.md",
                "---\ntitle: Older\ndate: 2023-01-01\n---\n\nOld body.\n",
            ),
            (
                "blog/newer.md",
                "---\ntitle: Newer\ndate: 2024-06-01\n---\n\nNew body.\n",
            ),
        ]);

        let loader = ContentLoader::new(&folio);
        let posts = loader.load_posts().unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].title, "Newer");
        assert_eq!(posts[1].title, "Older");
    }

    #[test]
    fn test_post_slug_and_path_from_filename() {
        let (_dir, folio) = site_with_content(&[(
            "blog/scaling-teams.md",
            "---\ntitle: A Completely Different Title\ndate: 2024-01-01\n---\n\nBody.\n",
        )]);

        let loader = ContentLoader::new(&folio);
        let posts = loader.load_posts().unwrap();
        assert_eq!(posts[0].slug, "scaling-teams");
        assert_eq!(posts[0].path, "/blog/scaling-teams/");
    }

    #[test]
    fn test_missing_description_falls_back_to_excerpt() {
        let (_dir, folio) = site_with_content(&[(
            "blog/no-desc.md",
            "---\ntitle: No Description\ndate: 2024-01-01\n---\n\nFirst paragraph here.\n",
        )]);

        let loader = ContentLoader::new(&folio);
        let posts = loader.load_posts().unwrap();
        assert!(posts[0].description.starts_with("First paragraph"));
    }

    #[test]
    fn test_drafts_skipped_by_default() {
        let (_dir, folio) = site_with_content(&[(
            "blog/wip.md",
            "---\ntitle: WIP\ndate: 2024-01-01\ndraft: true\n---\n\nUnfinished.\n",
        )]);

        let loader = ContentLoader::new(&folio);
        assert!(loader.load_posts().unwrap().is_empty());
    }

    #[test]
    fn test_load_pages_skips_blog_dir() {
        let (_dir, folio) = site_with_content(&[
            ("contact.md", "---\ntitle: Contact\n---\n\nSay hi.\n"),
            ("blog/post.md", "---\ntitle: Post\ndate: 2024-01-01\n---\n\nBody.\n"),
        ]);

        let loader = ContentLoader::new(&folio);
        let pages = loader.load_pages().unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].title, "Contact");
        assert_eq!(pages[0].path, "/contact/");
    }
}
