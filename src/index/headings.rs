//! Heading extraction from raw markdown

use lazy_static::lazy_static;
use regex::Regex;

use crate::content::Heading;
use crate::helpers::slugify;

lazy_static! {
    static ref HEADING_RE: Regex = Regex::new(r"(?m)^(#{2,6})\s+(.+)$").unwrap();
}

/// Extract h2/h3 headings from raw markdown, in document order.
///
/// Deeper levels are matched and discarded so they never leak through as
/// malformed h2 text. Slugs come from the shared [`slugify`] function, the
/// same one the markdown renderer uses for `id` attributes. Duplicate
/// heading text produces duplicate slugs; they are not deduplicated.
pub fn extract_headings(content: &str) -> Vec<Heading> {
    let mut headings = Vec::new();

    for cap in HEADING_RE.captures_iter(content) {
        let level = cap[1].len();
        if !(2..=3).contains(&level) {
            continue;
        }
        let text = cap[2].trim().to_string();
        let slug = slugify(&text);
        headings.push(Heading { level, text, slug });
    }

    headings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_two_and_three_only() {
        let headings = extract_headings("## A\n### B\n#### C");
        assert_eq!(headings.len(), 2);
        assert_eq!(headings[0].level, 2);
        assert_eq!(headings[0].text, "A");
        assert_eq!(headings[1].level, 3);
        assert_eq!(headings[1].text, "B");
    }

    #[test]
    fn test_document_order_preserved() {
        let md = "intro\n\n### First\n\ntext\n\n## Second\n\n### Third\n";
        let headings = extract_headings(md);
        let texts: Vec<_> = headings.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(texts, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_slug_generation() {
        let headings = extract_headings("## What's Next?");
        assert_eq!(headings[0].slug, "whats-next");
    }

    #[test]
    fn test_duplicate_headings_keep_duplicate_slugs() {
        let headings = extract_headings("## Setup\n\ntext\n\n## Setup");
        assert_eq!(headings.len(), 2);
        assert_eq!(headings[0].slug, headings[1].slug);
    }

    #[test]
    fn test_h1_and_plain_text_ignored() {
        let headings = extract_headings("# Title\n\nNot # a heading\n\n##NoSpace");
        assert!(headings.is_empty());
    }

    #[test]
    fn test_empty_content() {
        assert!(extract_headings("").is_empty());
    }
}
