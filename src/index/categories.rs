//! Category index derived from the post collection

use indexmap::IndexMap;

use crate::config::SiteConfig;
use crate::content::{Category, Post};

/// Build the category index: one entry per distinct category name with its
/// usage count, sorted by count descending.
///
/// Equal counts keep first-seen order: the map is insertion-ordered and the
/// sort is stable, so a category encountered earlier in the (date-sorted)
/// post collection lists first among ties.
pub fn category_index(posts: &[Post], config: &SiteConfig) -> Vec<Category> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();

    for post in posts {
        for name in &post.categories {
            if name.trim().is_empty() {
                continue;
            }
            *counts.entry(name.clone()).or_insert(0) += 1;
        }
    }

    let mut categories: Vec<Category> = counts
        .into_iter()
        .map(|(name, count)| {
            let mut cat = Category::new(&name, &config.base_url, &config.category_dir);
            cat.count = count;
            cat
        })
        .collect();

    categories.sort_by(|a, b| b.count.cmp(&a.count));
    categories
}

/// Posts carrying the given category name
pub fn posts_in_category<'a>(posts: &'a [Post], name: &str) -> Vec<&'a Post> {
    posts
        .iter()
        .filter(|p| p.categories.iter().any(|c| c == name))
        .collect()
}
