//! Generator module - renders the site to static HTML files

mod sitemap;

pub use sitemap::build_sitemap;

use anyhow::Result;
use chrono::Datelike;
use std::fs;

use tera::Context;
use walkdir::WalkDir;

use crate::content::{Category, Page, Post};
use crate::helpers::{short_date, slugify};
use crate::index::{category_index, extract_headings, paginate, posts_in_category, related_posts};
use crate::templates::{
    CategoryData, ConfigData, HeadingData, PaginationData, PostData, SiteData, TemplateRenderer,
    ThemeData,
};
use crate::Folio;

/// Static site generator using the embedded Tera theme
pub struct Generator {
    folio: Folio,
    renderer: TemplateRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(folio: &Folio) -> Result<Self> {
        let renderer = TemplateRenderer::new()?;
        Ok(Self {
            folio: folio.clone(),
            renderer,
        })
    }

    /// Generate the entire site
    pub fn generate(&self, posts: &[Post], pages: &[Page]) -> Result<()> {
        fs::create_dir_all(&self.folio.public_dir)?;

        self.write_stylesheet()?;
        self.copy_source_assets()?;

        // Sort posts by date (newest first); every derived collection below
        // is computed once from this ordering
        let mut sorted_posts: Vec<_> = posts.to_vec();
        sorted_posts.sort_by(|a, b| b.date.cmp(&a.date));

        let categories = category_index(&sorted_posts, &self.folio.config);

        let site_data = self.build_site_data(&sorted_posts, pages, &categories);
        let config_data = self.build_config_data();
        let theme_data = self.build_theme_data();

        self.generate_index_pages(&sorted_posts, &site_data, &config_data, &theme_data)?;
        self.generate_post_pages(&sorted_posts, &site_data, &config_data, &theme_data)?;
        self.generate_page_pages(pages, &site_data, &config_data, &theme_data)?;
        self.generate_category_pages(&sorted_posts, &categories, &site_data, &config_data, &theme_data)?;
        self.generate_sitemap(&sorted_posts, &categories)?;
        self.generate_atom_feed(&sorted_posts)?;

        Ok(())
    }

    /// Build site data for templates
    fn build_site_data(
        &self,
        posts: &[Post],
        pages: &[Page],
        categories: &[Category],
    ) -> SiteData {
        let post_data: Vec<PostData> = posts.iter().map(|p| self.post_data(p)).collect();

        let page_data = pages
            .iter()
            .map(|p| crate::templates::PageData {
                title: p.title.clone(),
                date: short_date(&p.date),
                path: p.path.clone(),
                permalink: p.permalink.clone(),
                content: p.content.clone(),
                layout: p.layout.clone(),
            })
            .collect();

        let category_data = categories
            .iter()
            .map(|c| CategoryData {
                name: c.name.clone(),
                slug: c.slug.clone(),
                path: c.path.clone(),
                count: c.count,
            })
            .collect();

        SiteData {
            posts: post_data,
            pages: page_data,
            categories: category_data,
        }
    }

    fn post_data(&self, p: &Post) -> PostData {
        PostData {
            title: p.title.clone(),
            date: short_date(&p.date),
            path: p.path.clone(),
            permalink: p.permalink.clone(),
            description: p.description.clone(),
            image: p.image.clone(),
            categories: p.categories.clone(),
            content: p.content.clone(),
            reading_time: p.reading_time,
        }
    }

    /// Build config data for templates
    fn build_config_data(&self) -> ConfigData {
        let c = &self.folio.config;
        ConfigData {
            title: c.title.clone(),
            description: c.description.clone(),
            author: c.author.clone(),
            base_url: c.base_url.clone(),
            root: c.root.clone(),
            blog_dir: c.blog_dir.clone(),
            category_dir: c.category_dir.clone(),
            per_page: c.per_page,
        }
    }

    /// Build theme data for templates
    fn build_theme_data(&self) -> ThemeData {
        ThemeData {
            default: self.folio.config.theme.default.clone(),
            allow_toggle: self.folio.config.theme.allow_toggle,
        }
    }

    /// Create a base context with common variables
    fn create_base_context(
        &self,
        site_data: &SiteData,
        config_data: &ConfigData,
        theme_data: &ThemeData,
    ) -> Context {
        let mut context = Context::new();
        context.insert("site", site_data);
        context.insert("config", config_data);
        context.insert("theme", theme_data);
        context.insert("contact", &self.folio.config.contact);
        context.insert("current_year", &chrono::Local::now().year());
        // Page-specific values get overridden by each generator; empty
        // defaults keep the shared partials renderable everywhere
        context.insert("page_title", "");
        context.insert("page_description", "");
        context
    }

    /// Generate the paginated blog listing.
    ///
    /// Page 1 is written to both `/` and `/<blog_dir>/`; later pages live
    /// under `/<pagination_dir>/N/`.
    fn generate_index_pages(
        &self,
        posts: &[Post],
        site_data: &SiteData,
        config_data: &ConfigData,
        theme_data: &ThemeData,
    ) -> Result<()> {
        let per_page = self.folio.config.per_page;
        let pagination_dir = &self.folio.config.pagination_dir;
        let total_pages = paginate(posts.len(), per_page, 1).total_pages;

        for page_num in 1..=total_pages {
            let slice = paginate(posts.len(), per_page, page_num);
            let page_posts: Vec<PostData> = posts[slice.start..slice.end]
                .iter()
                .map(|p| self.post_data(p))
                .collect();

            let page_link = |n: usize| {
                if n == 1 {
                    "/".to_string()
                } else {
                    format!("/{}/{}/", pagination_dir, n)
                }
            };

            let pagination = PaginationData {
                per_page,
                total: slice.total_pages,
                current: slice.current,
                prev_link: if slice.has_prev() {
                    page_link(slice.current - 1)
                } else {
                    String::new()
                },
                next_link: if slice.has_next() {
                    page_link(slice.current + 1)
                } else {
                    String::new()
                },
            };

            let mut context = self.create_base_context(site_data, config_data, theme_data);
            context.insert("page_posts", &page_posts);
            context.insert("pagination", &pagination);

            let html = self.renderer.render("index.html", &context)?;

            let output_path = if page_num == 1 {
                self.folio.public_dir.join("index.html")
            } else {
                self.folio
                    .public_dir
                    .join(format!("{}/{}/index.html", pagination_dir, page_num))
            };

            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&output_path, &html)?;
            tracing::debug!("Generated: {:?}", output_path);

            // The blog index alias mirrors page 1
            if page_num == 1 {
                let alias = self
                    .folio
                    .public_dir
                    .join(&self.folio.config.blog_dir)
                    .join("index.html");
                if let Some(parent) = alias.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&alias, &html)?;
            }
        }

        Ok(())
    }

    /// Generate individual post pages
    fn generate_post_pages(
        &self,
        posts: &[Post],
        site_data: &SiteData,
        config_data: &ConfigData,
        theme_data: &ThemeData,
    ) -> Result<()> {
        for post in posts {
            // Headings come from raw markdown; their slugs match the anchor
            // ids the renderer wrote into post.content
            let headings: Vec<HeadingData> = extract_headings(&post.raw)
                .iter()
                .map(HeadingData::from)
                .collect();

            let related: Vec<PostData> =
                related_posts(post, posts, self.folio.config.related_posts)
                    .into_iter()
                    .map(|p| self.post_data(p))
                    .collect();

            let post_categories: Vec<serde_json::Value> = post
                .categories
                .iter()
                .map(|name| {
                    serde_json::json!({
                        "name": name,
                        "slug": slugify(name),
                    })
                })
                .collect();

            let mut context = self.create_base_context(site_data, config_data, theme_data);
            context.insert("page_title", &post.title);
            context.insert("page_date", &short_date(&post.date));
            context.insert("page_description", &post.description);
            context.insert("page_content", &post.content);
            context.insert("page_image", &post.image);
            context.insert("page_categories", &post_categories);
            context.insert("reading_time", &post.reading_time);
            context.insert("headings", &headings);
            context.insert("related_posts", &related);

            let html = self.renderer.render("post.html", &context)?;

            let clean_path = post.path.trim_start_matches('/');
            let output_path = self.folio.public_dir.join(clean_path).join("index.html");
            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&output_path, &html)?;
            tracing::debug!("Generated post: {:?}", output_path);
        }

        Ok(())
    }

    /// Generate standalone pages
    fn generate_page_pages(
        &self,
        pages: &[Page],
        site_data: &SiteData,
        config_data: &ConfigData,
        theme_data: &ThemeData,
    ) -> Result<()> {
        for page in pages {
            let template_name = match page.layout.as_str() {
                "contact" => "contact.html",
                _ => "page.html",
            };

            let mut context = self.create_base_context(site_data, config_data, theme_data);
            context.insert("page_title", &page.title);
            context.insert("page_date", &short_date(&page.date));
            context.insert("page_content", &page.content);

            let html = self.renderer.render(template_name, &context)?;

            let clean_path = page.path.trim_start_matches('/');
            let output_path = self.folio.public_dir.join(clean_path).join("index.html");
            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&output_path, html)?;
            tracing::debug!("Generated page: {:?}", output_path);
        }

        Ok(())
    }

    /// Generate per-category listings and the categories overview
    fn generate_category_pages(
        &self,
        posts: &[Post],
        categories: &[Category],
        site_data: &SiteData,
        config_data: &ConfigData,
        theme_data: &ThemeData,
    ) -> Result<()> {
        for category in categories {
            let category_posts: Vec<PostData> = posts_in_category(posts, &category.name)
                .into_iter()
                .map(|p| self.post_data(p))
                .collect();

            let mut context = self.create_base_context(site_data, config_data, theme_data);
            context.insert("page_title", &category.name);
            context.insert("category_name", &category.name);
            context.insert("category_posts", &category_posts);

            let html = self.renderer.render("category.html", &context)?;

            let output_path = self
                .folio
                .public_dir
                .join(&self.folio.config.category_dir)
                .join(&category.slug)
                .join("index.html");
            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&output_path, html)?;
        }

        // Overview listing all categories with counts
        let mut context = self.create_base_context(site_data, config_data, theme_data);
        context.insert("page_title", "Categories");
        let html = self.renderer.render("categories.html", &context)?;

        let output_path = self
            .folio
            .public_dir
            .join(&self.folio.config.category_dir)
            .join("index.html");
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&output_path, html)?;

        tracing::info!("Generated {} category pages", categories.len());
        Ok(())
    }

    /// Generate sitemap.xml
    fn generate_sitemap(&self, posts: &[Post], categories: &[Category]) -> Result<()> {
        let xml = build_sitemap(&self.folio.config, posts, categories);
        let output_path = self.folio.public_dir.join("sitemap.xml");
        fs::write(&output_path, xml)?;
        tracing::info!("Generated sitemap.xml");
        Ok(())
    }

    /// Generate the Atom feed for the most recent posts
    fn generate_atom_feed(&self, posts: &[Post]) -> Result<()> {
        use crate::helpers::{encode_url, escape_xml};

        let base_url = self.folio.config.base_url.trim_end_matches('/');

        let mut feed = String::new();
        feed.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
        feed.push('\n');
        feed.push_str(r#"<feed xmlns="http://www.w3.org/2005/Atom">"#);
        feed.push('\n');
        feed.push_str(&format!(
            "  <title>{}</title>\n",
            escape_xml(&self.folio.config.title)
        ));
        feed.push_str(&format!(
            "  <link href=\"{}/atom.xml\" rel=\"self\"/>\n",
            base_url
        ));
        feed.push_str(&format!("  <link href=\"{}/\"/>\n", base_url));
        feed.push_str(&format!(
            "  <updated>{}</updated>\n",
            chrono::Utc::now().to_rfc3339()
        ));
        feed.push_str(&format!("  <id>{}/</id>\n", base_url));
        feed.push_str(&format!(
            "  <author><name>{}</name></author>\n",
            escape_xml(&self.folio.config.author)
        ));

        for post in posts.iter().take(20) {
            feed.push_str("  <entry>\n");
            feed.push_str(&format!("    <title>{}</title>\n", escape_xml(&post.title)));
            feed.push_str(&format!(
                "    <link href=\"{}{}\"/>\n",
                base_url,
                encode_url(&post.path)
            ));
            feed.push_str(&format!("    <id>{}{}</id>\n", base_url, post.path));
            feed.push_str(&format!(
                "    <published>{}</published>\n",
                post.date.to_rfc3339()
            ));
            feed.push_str(&format!(
                "    <updated>{}</updated>\n",
                post.date.to_rfc3339()
            ));
            feed.push_str(&format!(
                "    <summary>{}</summary>\n",
                escape_xml(&post.description)
            ));
            let content = convert_relative_urls_to_absolute(&post.content, base_url);
            feed.push_str(&format!(
                "    <content type=\"html\"><![CDATA[{}]]></content>\n",
                strip_invalid_xml_chars(&content)
            ));
            feed.push_str("  </entry>\n");
        }

        feed.push_str("</feed>\n");

        let output_path = self.folio.public_dir.join("atom.xml");
        fs::write(&output_path, feed)?;
        tracing::info!("Generated atom.xml");

        Ok(())
    }

    /// Write the embedded stylesheet
    fn write_stylesheet(&self) -> Result<()> {
        let css_dir = self.folio.public_dir.join("css");
        fs::create_dir_all(&css_dir)?;
        fs::write(
            css_dir.join("site.css"),
            include_str!("../templates/theme/site.css"),
        )?;
        Ok(())
    }

    /// Copy source assets (images, etc.) to the public directory
    fn copy_source_assets(&self) -> Result<()> {
        let source_dir = &self.folio.source_dir;
        if !source_dir.exists() {
            return Ok(());
        }

        for entry in WalkDir::new(source_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if path.is_file() {
                let ext = path.extension().and_then(|e| e.to_str());

                // Markdown files are rendered, not copied
                if matches!(ext, Some("md") | Some("markdown")) {
                    continue;
                }

                let relative = path.strip_prefix(source_dir)?;
                let dest = self.folio.public_dir.join(relative);

                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)?;
                }

                fs::copy(path, &dest)?;
            }
        }

        Ok(())
    }
}

/// Convert relative URLs in HTML content to absolute URLs
fn convert_relative_urls_to_absolute(content: &str, base_url: &str) -> String {
    content
        .replace("href=\"/", &format!("href=\"{}/", base_url))
        .replace("src=\"/", &format!("src=\"{}/", base_url))
        .replace("href='/", &format!("href='{}/", base_url))
        .replace("src='/", &format!("src='{}/", base_url))
}

/// Strip control characters XML 1.0 does not allow
fn strip_invalid_xml_chars(s: &str) -> String {
    s.chars()
        .filter(|&c| {
            c == '\t'
                || c == '\n'
                || c == '\r'
                || ('\u{0020}'..='\u{D7FF}').contains(&c)
                || ('\u{E000}'..='\u{FFFD}').contains(&c)
                || ('\u{10000}'..='\u{10FFFF}').contains(&c)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::loader::ContentLoader;
    use std::fs as stdfs;
    use tempfile::TempDir;

    fn site_with_posts() -> (TempDir, Folio) {
        let dir = TempDir::new().unwrap();
        let blog = dir.path().join("content/blog");
        stdfs::create_dir_all(&blog).unwrap();
        stdfs::write(
            blog.join("first.md"),
            "---\ntitle: First Post\ndate: 2024-01-10\ncategories: [Rust]\n---\n\n## Intro\n\nHello.\n",
        )
        .unwrap();
        stdfs::write(
            blog.join("second.md"),
            "---\ntitle: Second Post\ndate: 2024-02-10\ncategories: [Rust, Career]\n---\n\nMore.\n",
        )
        .unwrap();
        stdfs::write(
            dir.path().join("content/contact.md"),
            "---\ntitle: Contact\nlayout: contact\n---\n\nReach out.\n",
        )
        .unwrap();
        let folio = Folio::new(dir.path()).unwrap();
        (dir, folio)
    }

    #[test]
    fn test_generate_writes_expected_tree() {
        let (_dir, folio) = site_with_posts();
        let loader = ContentLoader::new(&folio);
        let posts = loader.load_posts().unwrap();
        let pages = loader.load_pages().unwrap();

        let generator = Generator::new(&folio).unwrap();
        generator.generate(&posts, &pages).unwrap();

        let public = &folio.public_dir;
        assert!(public.join("index.html").exists());
        assert!(public.join("blog/index.html").exists());
        assert!(public.join("blog/first/index.html").exists());
        assert!(public.join("blog/second/index.html").exists());
        assert!(public.join("categories/rust/index.html").exists());
        assert!(public.join("categories/index.html").exists());
        assert!(public.join("contact/index.html").exists());
        assert!(public.join("sitemap.xml").exists());
        assert!(public.join("atom.xml").exists());
        assert!(public.join("css/site.css").exists());
    }

    #[test]
    fn test_post_page_has_anchor_and_toc() {
        let (_dir, folio) = site_with_posts();
        let loader = ContentLoader::new(&folio);
        let posts = loader.load_posts().unwrap();

        let generator = Generator::new(&folio).unwrap();
        generator.generate(&posts, &[]).unwrap();

        let html =
            stdfs::read_to_string(folio.public_dir.join("blog/first/index.html")).unwrap();
        assert!(html.contains(r##"<h2 id="intro">"##));
        assert!(html.contains(r##"href="#intro""##));
    }

    #[test]
    fn test_theme_attribute_emitted() {
        let (_dir, folio) = site_with_posts();
        let generator = Generator::new(&folio).unwrap();
        generator.generate(&[], &[]).unwrap();

        let html = stdfs::read_to_string(folio.public_dir.join("index.html")).unwrap();
        assert!(html.contains(r#"data-theme="light""#));
    }

    #[test]
    fn test_theme_toggle_wired_and_persisted() {
        let (_dir, folio) = site_with_posts();
        let generator = Generator::new(&folio).unwrap();
        generator.generate(&[], &[]).unwrap();

        // The toggle button must come with the script that flips the
        // attribute and restores the stored preference on load
        let html = stdfs::read_to_string(folio.public_dir.join("index.html")).unwrap();
        assert!(html.contains("data-theme-toggle"));
        assert!(html.contains("localStorage.getItem('theme')"));
        assert!(html.contains("localStorage.setItem('theme'"));
    }

    #[test]
    fn test_toggle_disabled_renders_no_button_or_script() {
        let dir = TempDir::new().unwrap();
        stdfs::write(
            dir.path().join("config.yml"),
            "theme:\n  default: dark\n  allow_toggle: false\n",
        )
        .unwrap();
        let folio = Folio::new(dir.path()).unwrap();

        let generator = Generator::new(&folio).unwrap();
        generator.generate(&[], &[]).unwrap();

        let html = stdfs::read_to_string(folio.public_dir.join("index.html")).unwrap();
        assert!(html.contains(r#"data-theme="dark""#));
        assert!(!html.contains("data-theme-toggle"));
        assert!(!html.contains("localStorage"));
    }
}
