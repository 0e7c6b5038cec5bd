//! Markdown rendering with heading anchors and syntax highlighting

use anyhow::Result;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::helpers::slugify;

/// Markdown renderer with syntax highlighting.
///
/// Headings are emitted with an `id` attribute produced by
/// [`crate::helpers::slugify`] — the same function the heading extractor
/// uses — so in-page anchor links always resolve.
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: "base16-ocean.dark".to_string(),
        }
    }

    /// Create with a custom highlight theme
    pub fn with_theme(theme: &str) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
        }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> Result<String> {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut code_block_lang: Option<String> = None;
        let mut in_code_block = false;
        let mut code_block_content = String::new();
        // Heading level plus its buffered inline events
        let mut heading: Option<(usize, Vec<Event>)> = None;

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    in_code_block = true;
                    code_block_lang = match kind {
                        CodeBlockKind::Fenced(lang) => {
                            let lang = lang.to_string();
                            if lang.is_empty() {
                                None
                            } else {
                                Some(lang)
                            }
                        }
                        CodeBlockKind::Indented => None,
                    };
                    code_block_content.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    let highlighted =
                        self.highlight_code(&code_block_content, code_block_lang.as_deref());
                    events.push(Event::Html(CowStr::from(highlighted)));
                    in_code_block = false;
                    code_block_lang = None;
                }
                Event::Text(text) if in_code_block => {
                    code_block_content.push_str(&text);
                }
                Event::Start(Tag::Heading { level, .. }) => {
                    heading = Some((level as usize, Vec::new()));
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some((level, inner)) = heading.take() {
                        let text = inline_text(&inner);
                        let id = slugify(&text);
                        events.push(Event::Html(CowStr::from(format!(
                            r#"<h{} id="{}">"#,
                            level, id
                        ))));
                        events.extend(inner);
                        events.push(Event::Html(CowStr::from(format!("</h{}>", level))));
                    }
                }
                other => {
                    if let Some((_, inner)) = heading.as_mut() {
                        inner.push(other);
                    } else {
                        events.push(other);
                    }
                }
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Ok(html_output)
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .unwrap_or_else(|| {
                self.theme_set
                    .themes
                    .values()
                    .next()
                    .expect("No themes available")
            });

        match highlighted_html_for_string(code, &self.syntax_set, syntax, theme) {
            Ok(highlighted) => format!(r#"<div class="highlight {}">{}</div>"#, lang, highlighted),
            Err(_) => {
                // Fallback to plain code block
                let escaped = html_escape(code);
                format!(
                    r#"<pre><code class="language-{}">{}</code></pre>"#,
                    lang, escaped
                )
            }
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Concatenate the text content of inline events
fn inline_text(events: &[Event]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            _ => {}
        }
    }
    text
}

/// Simple HTML escaping
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic_markdown() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("Some paragraph text.").unwrap();
        assert!(html.contains("<p>Some paragraph text.</p>"));
    }

    #[test]
    fn test_headings_get_slug_ids() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("## Scaling Teams\n\nbody").unwrap();
        assert!(html.contains(r#"<h2 id="scaling-teams">"#));
        assert!(html.contains("</h2>"));
    }

    #[test]
    fn test_heading_id_matches_extractor_slug() {
        // Anchor round-trip: the id written here must equal the slug the
        // heading extractor computes from the raw markdown line.
        let renderer = MarkdownRenderer::new();
        let raw = "## What's Next for `cargo`?";
        let html = renderer.render(raw).unwrap();
        let expected = crate::helpers::slugify("What's Next for `cargo`?");
        assert!(html.contains(&format!(r#"<h2 id="{}">"#, expected)));
    }

    #[test]
    fn test_heading_with_emphasis_keeps_formatting() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("## A *big* idea").unwrap();
        assert!(html.contains(r#"<h2 id="a-big-idea">"#));
        assert!(html.contains("<em>big</em>"));
    }

    #[test]
    fn test_render_code_block() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("```rust\nfn main() {}\n```").unwrap();
        assert!(html.contains("highlight"));
    }
}
