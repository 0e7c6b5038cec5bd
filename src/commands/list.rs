//! List site content

use anyhow::Result;

use crate::content::loader::ContentLoader;
use crate::index::category_index;
use crate::Folio;

/// List site content by type
pub fn run(folio: &Folio, content_type: &str) -> Result<()> {
    let loader = ContentLoader::new(folio);

    match content_type {
        "post" | "posts" => {
            let posts = loader.load_posts()?;
            println!("Posts ({}):", posts.len());
            for post in posts {
                println!(
                    "  {} - {} [{}]",
                    post.date.format("%Y-%m-%d"),
                    post.title,
                    post.source
                );
            }
        }
        "page" | "pages" => {
            let pages = loader.load_pages()?;
            println!("Pages ({}):", pages.len());
            for page in pages {
                println!("  {} [{}]", page.title, page.source);
            }
        }
        "category" | "categories" => {
            let posts = loader.load_posts()?;
            let categories = category_index(&posts, &folio.config);
            println!("Categories ({}):", categories.len());
            for cat in categories {
                println!("  {} ({})", cat.name, cat.count);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, page, category",
                content_type
            );
        }
    }

    Ok(())
}
