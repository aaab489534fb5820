use std::convert::Infallible;

use once_cell::sync::Lazy;
use regex::Regex;

use super::Renderer;

static H1: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^# (.*)$").expect("valid h1 regex"));
static H2: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^## (.*)$").expect("valid h2 regex"));
static H3: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^### (.*)$").expect("valid h3 regex"));
static H4: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^#### (.*)$").expect("valid h4 regex"));

static BOLD_ITALIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*\*(.*?)\*\*\*").expect("valid bold italic regex"));
static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid bold regex"));
static ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.*?)\*").expect("valid italic regex"));
static UNDERSCORE_ITALIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_(.*?)_").expect("valid underscore regex"));

static FENCED_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```(\w+)?\n((?s:.*?))\n```").expect("valid fence regex"));
static INLINE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`(.*?)`").expect("valid code regex"));

static UNORDERED_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[*+-] (.*)$").expect("valid unordered item regex"));
static ORDERED_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\. (.*)$").expect("valid ordered item regex"));

static BLOCK_QUOTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^> (.*)$").expect("valid quote regex"));
static HYPHEN_RULE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^-{3,}$").expect("valid hyphen rule regex"));
static ASTERISK_RULE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\*{3,}$").expect("valid asterisk rule regex"));
static LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(.*?)\]\((.*?)\)").expect("valid link regex"));

/// Markdown renderer built from a fixed, ordered pipeline of pattern
/// substitutions.
///
/// The pipeline is deliberately not a full markdown parser: unmatched
/// constructs pass through as literal text, and later passes may act on HTML
/// inserted by earlier ones, so the pass order is part of the output
/// contract. The output is an HTML fragment wrapped in a single outer
/// paragraph.
///
/// The output is *not* sanitized. Raw HTML in the input is passed through
/// verbatim, so this renderer must only be fed trusted notebooks.
#[derive(Debug)]
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    /// Create a new instance of the renderer.
    pub fn new() -> MarkdownRenderer {
        MarkdownRenderer
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for MarkdownRenderer {
    type Error = Infallible;

    fn render(&self, markdown: &str, html: &mut String) -> Result<(), Self::Error> {
        // Headings, four independent line-anchored passes. The mandatory
        // space after the hashes keeps them from matching each other.
        let text = H1.replace_all(markdown, "<h1>${1}</h1>");
        let text = H2.replace_all(&text, "<h2>${1}</h2>");
        let text = H3.replace_all(&text, "<h3>${1}</h3>");
        let text = H4.replace_all(&text, "<h4>${1}</h4>");

        // Emphasis, longest match first.
        let text = BOLD_ITALIC.replace_all(&text, "<strong><em>${1}</em></strong>");
        let text = BOLD.replace_all(&text, "<strong>${1}</strong>");
        let text = ITALIC.replace_all(&text, "<em>${1}</em>");
        let text = UNDERSCORE_ITALIC.replace_all(&text, "<em>${1}</em>");

        // Fenced blocks must run before the inline pass, which would
        // otherwise pair up the backticks inside the fence markers.
        let text = FENCED_CODE.replace_all(
            &text,
            "<pre><code class=\"language-${1}\">${2}</code></pre>",
        );
        let text = INLINE_CODE.replace_all(&text, "<code>${1}</code>");

        let text = wrap_lists(&text);

        // Each quoted line stands alone; consecutive quotes are not merged.
        let text = BLOCK_QUOTE.replace_all(&text, "<blockquote>${1}</blockquote>");

        // An asterisk rule only survives to this pass if the emphasis passes
        // left it alone, which they never do. Kept for parity with hyphens.
        let text = HYPHEN_RULE.replace_all(&text, "<hr />");
        let text = ASTERISK_RULE.replace_all(&text, "<hr />");

        let text = LINK.replace_all(
            &text,
            "<a href=\"${2}\" target=\"_blank\" rel=\"noopener noreferrer\">${1}</a>",
        );

        // Paragraph boundaries, then hard breaks for what remains.
        let text = text.replace("\n\n", "</p><p>");
        let text = text.replace('\n', "<br />");

        html.push_str("<p>");
        html.push_str(&text);
        html.push_str("</p>");

        Ok(())
    }

    fn size_hint(&self, input: &str) -> usize {
        input.len() * 3 / 2
    }
}

#[derive(Clone, Copy, PartialEq)]
enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    fn tag(self) -> &'static str {
        match self {
            ListKind::Unordered => "ul",
            ListKind::Ordered => "ol",
        }
    }
}

/// Wraps contiguous runs of list-item lines in a single `<ul>` or `<ol>`.
///
/// This is a line-based block pass so that unordered and ordered runs never
/// produce overlapping containers; a run ends at the first line that is not
/// an item of the same kind.
fn wrap_lists(text: &str) -> String {
    let mut lines = Vec::new();
    let mut run: Option<(ListKind, String)> = None;

    for line in text.split('\n') {
        let item = UNORDERED_ITEM
            .captures(line)
            .map(|caps| (ListKind::Unordered, caps))
            .or_else(|| {
                ORDERED_ITEM
                    .captures(line)
                    .map(|caps| (ListKind::Ordered, caps))
            });

        match item {
            Some((kind, caps)) => {
                let li = format!("<li>{}</li>", &caps[1]);
                match &mut run {
                    Some((current, items)) if *current == kind => items.push_str(&li),
                    _ => {
                        flush_run(&mut run, &mut lines);
                        run = Some((kind, li));
                    }
                }
            }
            None => {
                flush_run(&mut run, &mut lines);
                lines.push(line.to_owned());
            }
        }
    }

    flush_run(&mut run, &mut lines);

    lines.join("\n")
}

fn flush_run(run: &mut Option<(ListKind, String)>, lines: &mut Vec<String>) {
    if let Some((kind, items)) = run.take() {
        let tag = kind.tag();
        lines.push(format!("<{}>{}</{}>", tag, items, tag));
    }
}

#[cfg(test)]
mod tests {
    use crate::render::Renderer;

    use super::MarkdownRenderer;

    fn render(input: &str) -> String {
        let renderer = MarkdownRenderer::new();
        let mut html = String::new();
        let _ = renderer.render(input, &mut html);
        html
    }

    #[test]
    fn plain_text_is_identity_modulo_paragraph() {
        assert_eq!(render("hello world"), "<p>hello world</p>");
    }

    #[test]
    fn headings() {
        assert_eq!(render("# Title"), "<p><h1>Title</h1></p>");
        assert_eq!(render("## Sub"), "<p><h2>Sub</h2></p>");
        assert_eq!(render("### Deep"), "<p><h3>Deep</h3></p>");
        assert_eq!(render("#### Deeper"), "<p><h4>Deeper</h4></p>");
    }

    #[test]
    fn emphasis_longest_match_first() {
        assert!(render("***x***").contains("<strong><em>x</em></strong>"));
        assert!(render("**bold**").contains("<strong>bold</strong>"));
        assert!(render("*x*").contains("<em>x</em>"));
        assert!(render("_x_").contains("<em>x</em>"));
    }

    #[test]
    fn inline_code() {
        assert!(render("`code`").contains("<code>code</code>"));
    }

    #[test]
    fn fenced_code_block_keeps_language_tag() {
        let html = render("```python\nx = 1\n```");

        assert!(html.contains("<pre><code class=\"language-python\">x = 1</code></pre>"));
    }

    #[test]
    fn fenced_code_block_without_tag() {
        let html = render("```\nx\n```");

        assert!(html.contains("<pre><code class=\"language-\">x</code></pre>"));
    }

    #[test]
    fn unordered_list_wraps_a_contiguous_run_once() {
        let html = render("* a\n* b\nplain");

        assert!(html.contains("<ul><li>a</li><li>b</li></ul>"));
        assert_eq!(html.matches("<ul>").count(), 1);
    }

    #[test]
    fn ordered_list_wraps_numbered_lines() {
        let html = render("1. a\n2. b");

        assert!(html.contains("<ol><li>a</li><li>b</li></ol>"));
    }

    #[test]
    fn mixed_lists_do_not_overlap() {
        let html = render("* a\n1. b");

        assert!(html.contains("<ul><li>a</li></ul>"));
        assert!(html.contains("<ol><li>b</li></ol>"));
        assert_eq!(html.matches("<li>").count(), 2);
    }

    #[test]
    fn block_quotes_are_per_line() {
        let html = render("> a\n> b");

        assert_eq!(html.matches("<blockquote>").count(), 2);
    }

    #[test]
    fn hyphen_rule() {
        assert!(render("---").contains("<hr />"));
    }

    #[test]
    fn asterisk_rule_is_consumed_by_emphasis() {
        // The emphasis passes run first and pair up the asterisks, so an
        // asterisk-only line never becomes a rule.
        assert!(!render("***").contains("<hr />"));
    }

    #[test]
    fn links_open_in_a_new_tab() {
        let html = render("[x](http://y)");

        assert!(html.contains(
            "<a href=\"http://y\" target=\"_blank\" rel=\"noopener noreferrer\">x</a>"
        ));
    }

    #[test]
    fn blank_lines_split_paragraphs() {
        assert_eq!(render("a\n\nb"), "<p>a</p><p>b</p>");
    }

    #[test]
    fn single_newlines_become_breaks() {
        assert_eq!(render("a\nb"), "<p>a<br />b</p>");
    }

    #[test]
    fn rerendering_does_not_duplicate_tags() {
        for input in ["# Title", "**bold**", "`code`", "[x](http://y)"] {
            let once = render(input);
            let twice = render(&once);

            assert_eq!(
                once.matches('<').count() + 2,
                twice.matches('<').count(),
                "rerendering {:?} added more than the outer paragraph",
                input
            );
        }
    }
}
