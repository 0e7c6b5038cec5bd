//! Text helper functions: slugs, excerpts, reading time

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NON_SLUG_CHARS: Regex = Regex::new(r"[^\w\s-]").unwrap();
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
    static ref HYPHEN_RUN: Regex = Regex::new(r"-+").unwrap();
}

/// Turn display text into a URL-safe slug.
///
/// Lowercase, drop anything outside `[\w\s-]`, collapse whitespace runs to a
/// single hyphen, collapse repeated hyphens, trim leading/trailing hyphens.
/// Idempotent: applying it twice gives the same result as applying it once.
///
/// This is the only slugifier in the crate. Heading anchors written by the
/// markdown renderer and anchor links produced by the heading extractor both
/// go through here, so they can never drift apart.
///
/// # Examples
/// ```
/// use folio_rs::helpers::slugify;
/// assert_eq!(slugify("Scaling Engineering Teams"), "scaling-engineering-teams");
/// assert_eq!(slugify("What's  Next?"), "whats-next");
/// ```
pub fn slugify(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let cleaned = NON_SLUG_CHARS.replace_all(&lowered, "");
    let hyphenated = WHITESPACE_RUN.replace_all(&cleaned, "-");
    let collapsed = HYPHEN_RUN.replace_all(&hyphenated, "-");
    collapsed.trim_matches('-').to_string()
}

/// Words-per-minute rate used for reading time estimates
const WORDS_PER_MINUTE: usize = 200;

/// Estimate reading time in whole minutes for a markdown or plain-text body.
///
/// Rounds up, never returns less than one minute.
pub fn reading_time(text: &str) -> usize {
    let words = text.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1)
}

/// Strip HTML tags from a string
pub fn strip_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;

    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
}

/// Truncate a string to a specified number of characters
pub fn truncate(s: &str, length: usize, omission: Option<&str>) -> String {
    let omission = omission.unwrap_or("...");

    if s.chars().count() <= length {
        s.to_string()
    } else {
        let truncated: String = s
            .chars()
            .take(length.saturating_sub(omission.len()))
            .collect();
        format!("{}{}", truncated.trim_end(), omission)
    }
}

/// Build a plain-text excerpt from markdown, used when a post has no
/// frontmatter description.
pub fn excerpt(markdown: &str, length: usize) -> String {
    let mut text = String::with_capacity(markdown.len());
    let mut in_fence = false;

    for line in markdown.lines() {
        let trimmed = line.trim();
        // Skip headings, fenced code blocks and empty lines; keep prose
        if trimmed.starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence || trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(trimmed);
        if text.chars().count() >= length {
            break;
        }
    }

    truncate(&strip_html(&text), length, None)
}

/// Escape XML special characters
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Engineering  Leadership"), "engineering-leadership");
    }

    #[test]
    fn test_slugify_special_chars() {
        assert_eq!(slugify("What's Next?"), "whats-next");
        assert_eq!(slugify("C++ & Rust: A Tale"), "c-rust-a-tale");
        assert_eq!(slugify("  spaced  out  "), "spaced-out");
    }

    #[test]
    fn test_slugify_idempotent() {
        for input in ["Hello, World!", "a--b", "Already-A-Slug", "Mixed CASE 123"] {
            let once = slugify(input);
            assert_eq!(slugify(&once), once, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_slugify_keeps_underscores() {
        // \w includes underscore, matching the anchor ids the renderer emits
        assert_eq!(slugify("snake_case title"), "snake_case-title");
    }

    #[test]
    fn test_reading_time() {
        assert_eq!(reading_time("one two three"), 1);
        let long = "word ".repeat(401);
        assert_eq!(reading_time(&long), 3);
        assert_eq!(reading_time(""), 1);
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<p>Hello <b>World</b></p>"), "Hello World");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello World", 8, None), "Hello...");
        assert_eq!(truncate("Hi", 10, None), "Hi");
    }

    #[test]
    fn test_excerpt_skips_headings() {
        let md = "## Title\n\nFirst paragraph of prose.\n\n```rust\nlet hidden = 1;\n```\nMore text.";
        let e = excerpt(md, 80);
        assert!(e.starts_with("First paragraph"));
        assert!(!e.contains("## Title"));
        assert!(!e.contains("```"));
        // Fenced code bodies never leak into the description
        assert!(!e.contains("hidden"));
        assert!(e.contains("More text."));
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a & b <c>"), "a &amp; b &lt;c&gt;");
    }
}
