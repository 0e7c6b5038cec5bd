//! Related-posts selection by shared categories

use crate::content::Post;

/// Pick up to `limit` posts related to `current`.
///
/// Score is the number of category names shared with the current post;
/// posts sharing nothing are excluded, as is the current post itself
/// (matched by slug). Ties are broken by newer date first, which keeps the
/// selection deterministic for a fixed collection.
pub fn related_posts<'a>(current: &Post, posts: &'a [Post], limit: usize) -> Vec<&'a Post> {
    let mut scored: Vec<(usize, &Post)> = posts
        .iter()
        .filter(|p| p.slug != current.slug)
        .filter_map(|p| {
            let shared = p
                .categories
                .iter()
                .filter(|c| current.categories.contains(c))
                .count();
            (shared > 0).then_some((shared, p))
        })
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.date.cmp(&a.1.date)));
    scored.into_iter().take(limit).map(|(_, p)| p).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    fn post(slug: &str, categories: &[&str], day: u32) -> Post {
        let date = Local.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap();
        let mut p = Post::new(slug.to_string(), date, format!("{}.md", slug));
        p.slug = slug.to_string();
        p.categories = categories.iter().map(|s| s.to_string()).collect();
        p
    }

    #[test]
    fn test_never_includes_current_post() {
        let posts = vec![post("a", &["Rust"], 1), post("b", &["Rust"], 2)];
        let related = related_posts(&posts[0], &posts, 5);
        assert!(related.iter().all(|p| p.slug != "a"));
        assert_eq!(related.len(), 1);
    }

    #[test]
    fn test_more_shared_categories_rank_higher() {
        let current = post("current", &["Rust", "Leadership"], 1);
        let posts = vec![
            current.clone(),
            post("one-shared", &["Rust"], 2),
            post("two-shared", &["Rust", "Leadership"], 3),
        ];
        let related = related_posts(&current, &posts, 5);
        assert_eq!(related[0].slug, "two-shared");
        assert_eq!(related[1].slug, "one-shared");
    }

    #[test]
    fn test_ties_broken_by_newer_date() {
        let current = post("current", &["Rust"], 1);
        let posts = vec![
            current.clone(),
            post("older", &["Rust"], 5),
            post("newer", &["Rust"], 20),
        ];
        let related = related_posts(&current, &posts, 5);
        assert_eq!(related[0].slug, "newer");
        assert_eq!(related[1].slug, "older");
    }

    #[test]
    fn test_zero_score_excluded_and_limit_applies() {
        let current = post("current", &["Rust"], 1);
        let posts = vec![
            current.clone(),
            post("unrelated", &["Cooking"], 2),
            post("r1", &["Rust"], 3),
            post("r2", &["Rust"], 4),
        ];
        let related = related_posts(&current, &posts, 1);
        assert_eq!(related.len(), 1);
        assert!(related[0].slug.starts_with('r'));
    }

    #[test]
    fn test_no_categories_yields_nothing() {
        let current = post("current", &[], 1);
        let posts = vec![current.clone(), post("other", &["Rust"], 2)];
        assert!(related_posts(&current, &posts, 3).is_empty());
    }
}
