//! Sitemap generation

use chrono::Local;

use crate::config::SiteConfig;
use crate::content::{Category, Post};
use crate::helpers::{encode_url, escape_xml, short_date};

/// One sitemap entry
struct Entry {
    loc: String,
    lastmod: String,
    changefreq: &'static str,
    priority: &'static str,
}

/// Build the sitemap.xml document.
///
/// Lists home, the blog index, the contact page, every post and every
/// category page. Posts carry their publication date as lastmod; the
/// structural pages carry the build date.
pub fn build_sitemap(config: &SiteConfig, posts: &[Post], categories: &[Category]) -> String {
    let base = config.base_url.trim_end_matches('/');
    let today = short_date(&Local::now());

    let mut entries = vec![
        Entry {
            loc: format!("{}/", base),
            lastmod: today.clone(),
            changefreq: "weekly",
            priority: "1.0",
        },
        Entry {
            loc: format!("{}/{}/", base, config.blog_dir),
            lastmod: today.clone(),
            changefreq: "weekly",
            priority: "0.9",
        },
        Entry {
            loc: format!("{}/contact/", base),
            lastmod: today.clone(),
            changefreq: "monthly",
            priority: "0.8",
        },
    ];

    for post in posts {
        entries.push(Entry {
            loc: format!("{}{}", base, post.path),
            lastmod: short_date(&post.date),
            changefreq: "monthly",
            priority: "0.7",
        });
    }

    for category in categories {
        entries.push(Entry {
            loc: format!("{}{}", base, category.path),
            lastmod: today.clone(),
            changefreq: "weekly",
            priority: "0.6",
        });
    }

    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for entry in entries {
        xml.push_str("  <url>\n");
        xml.push_str(&format!(
            "    <loc>{}</loc>\n",
            escape_xml(&encode_url(&entry.loc))
        ));
        xml.push_str(&format!("    <lastmod>{}</lastmod>\n", entry.lastmod));
        xml.push_str(&format!(
            "    <changefreq>{}</changefreq>\n",
            entry.changefreq
        ));
        xml.push_str(&format!("    <priority>{}</priority>\n", entry.priority));
        xml.push_str("  </url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}
