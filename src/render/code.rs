use std::convert::Infallible;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::Renderer;

/// One pattern per token category, tried leftmost-first. The alternation
/// order only matters when two categories could start at the same position:
/// comments win over operators, strings win over everything they contain.
/// The leading span pattern passes already-highlighted regions through
/// untouched, which keeps the highlighter idempotent on its own output.
static TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#"(?P<span><span class="[a-z]+">[^<]*</span>)"#,
        r"|(?P<comment>#[^\n]*)",
        r#"|(?P<string>'[^'\n]*'|"[^"\n]*")"#,
        r"|(?P<keyword>\b(?:",
        "def|class|return|if|else|elif|for|while",
        "|import|from|as|try|except|finally|with",
        "|global|nonlocal|lambda|yield|async|await",
        "|True|False|None|and|or|not|in|is",
        "|break|continue|pass|raise|assert|del",
        r")\b)",
        r"|(?P<builtin>\b(?:",
        "print|len|range|type|str|int|float|list",
        "|dict|set|tuple|enumerate|zip|map|filter",
        "|abs|sum|min|max|sorted|reversed|open",
        r")\()",
        r"|(?P<number>\b\d+\.?\d*\b)",
        r"|(?P<operator>(?P<op_before>\s)(?P<op>==|!=|<=|>=|//|\*\*|[=<>+\-*/%])(?P<op_after>\s))",
    ))
    .expect("valid token regex")
});

/// Syntax highlighter for Python's lexical surface.
///
/// A single combined scan classifies keywords, a fixed allow-list of
/// built-in call names, string literals, numeric literals, `#` comments, and
/// whitespace-delimited operators, wrapping each in a `<span>` carrying its
/// category as a CSS class.
///
/// Known limitations, inherent to the lexical approach: string literals have
/// no escape-sequence awareness (a quote inside a string ends the match
/// early), and `<`/`>`/`&` in the source are not escaped, so source that
/// contains markup will be passed through as markup.
#[derive(Debug)]
pub struct CodeHighlighter;

impl CodeHighlighter {
    /// Create a new instance of the highlighter.
    pub fn new() -> CodeHighlighter {
        CodeHighlighter
    }
}

impl Default for CodeHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for CodeHighlighter {
    type Error = Infallible;

    fn render(&self, source: &str, html: &mut String) -> Result<(), Self::Error> {
        let highlighted = TOKEN.replace_all(source, |caps: &Captures| {
            if let Some(span) = caps.name("span") {
                span.as_str().to_owned()
            } else if let Some(comment) = caps.name("comment") {
                format!("<span class=\"comment\">{}</span>", comment.as_str())
            } else if let Some(string) = caps.name("string") {
                format!("<span class=\"string\">{}</span>", string.as_str())
            } else if let Some(keyword) = caps.name("keyword") {
                format!("<span class=\"keyword\">{}</span>", keyword.as_str())
            } else if let Some(builtin) = caps.name("builtin") {
                // The paren is part of the match so that bare names are left
                // alone, but it stays outside the span.
                let name = builtin.as_str().trim_end_matches('(');
                format!("<span class=\"function\">{}</span>(", name)
            } else if let Some(number) = caps.name("number") {
                format!("<span class=\"number\">{}</span>", number.as_str())
            } else {
                format!(
                    "{}<span class=\"operator\">{}</span>{}",
                    &caps["op_before"], &caps["op"], &caps["op_after"]
                )
            }
        });

        html.push_str(&highlighted);

        Ok(())
    }

    fn size_hint(&self, input: &str) -> usize {
        input.len() * 2
    }
}

#[cfg(test)]
mod tests {
    use crate::render::Renderer;

    use super::CodeHighlighter;

    fn highlight(input: &str) -> String {
        let highlighter = CodeHighlighter::new();
        let mut html = String::new();
        let _ = highlighter.render(input, &mut html);
        html
    }

    #[test]
    fn plain_text_is_identity() {
        assert_eq!(highlight("hello world"), "hello world");
    }

    #[test]
    fn keywords_are_wrapped() {
        assert_eq!(
            highlight("def f():"),
            "<span class=\"keyword\">def</span> f():"
        );
    }

    #[test]
    fn builtins_need_a_call_paren() {
        assert_eq!(
            highlight("print(1)"),
            "<span class=\"function\">print</span>(<span class=\"number\">1</span>)"
        );
        // A bare reference is not a call.
        assert_eq!(highlight("print"), "print");
    }

    #[test]
    fn numbers_and_comments() {
        let html = highlight("x = 5 # c");

        assert!(html.contains("<span class=\"number\">5</span>"));
        assert!(html.contains("<span class=\"comment\"># c</span>"));
    }

    #[test]
    fn operators_require_surrounding_whitespace() {
        assert!(highlight("a = b").contains("<span class=\"operator\">=</span>"));
        assert!(!highlight("a=b").contains("operator"));
    }

    #[test]
    fn string_literals() {
        assert_eq!(
            highlight("s = 'hi'"),
            "s <span class=\"operator\">=</span> <span class=\"string\">'hi'</span>"
        );
    }

    #[test]
    fn string_wins_over_its_contents() {
        assert_eq!(
            highlight("\"def 5\""),
            "<span class=\"string\">\"def 5\"</span>"
        );
    }

    #[test]
    fn decimals() {
        assert!(highlight("y = 3.14").contains("<span class=\"number\">3.14</span>"));
    }

    #[test]
    fn rehighlighting_is_idempotent() {
        for input in ["def f():", "print(1)", "x = 5 # c", "s = 'hi'"] {
            let once = highlight(input);
            let twice = highlight(&once);

            assert_eq!(once, twice, "rehighlighting {:?} changed the output", input);
        }
    }
}
