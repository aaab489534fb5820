//! Cell rendering.
//!
//! Turns a notebook's cells into the HTML blocks shown on the detail page.
//! Markdown and code bodies go through the renderers in [`crate::render`]
//! and are inserted as trusted HTML; execution outputs and fallback JSON are
//! literal text and are escaped.

use serde_json::Value;

use crate::notebook::{Cell, CodeCell, MarkdownCell, Output};
use crate::render::{CodeHighlighter, MarkdownRenderer, Renderer};

/// Renders cells in array order with 1-based display indices.
///
/// Array order is the only ordering guarantee; cells are never reordered by
/// type or content.
pub fn render_cells(cells: &[Cell]) -> String {
    let mut html = String::new();

    for (index, cell) in cells.iter().enumerate() {
        html.push_str(&render_cell(cell, index + 1));
    }

    html
}

fn render_cell(cell: &Cell, number: usize) -> String {
    match cell {
        Cell::Markdown(cell) => render_markdown_cell(cell, number),
        Cell::Code(cell) => render_code_cell(cell, number),
        Cell::Other(raw) => render_unknown_cell(raw, number),
    }
}

fn render_markdown_cell(cell: &MarkdownCell, number: usize) -> String {
    let renderer = MarkdownRenderer::new();
    let source = cell.source.text();

    let mut body = String::with_capacity(renderer.size_hint(&source));
    let _ = renderer.render(&source, &mut body);

    format!(
        "<div class=\"cell markdown-cell\">\
         <div class=\"cell-header\">\
         <span class=\"cell-type\">Markdown</span>\
         <span class=\"cell-number\">#{number}</span>\
         </div>\
         <div class=\"cell-content\">{body}</div>\
         </div>"
    )
}

fn render_code_cell(cell: &CodeCell, number: usize) -> String {
    let highlighter = CodeHighlighter::new();
    let source = cell.source.text();

    let mut body = String::with_capacity(highlighter.size_hint(&source));
    let _ = highlighter.render(&source, &mut body);

    // A counter of 0 means the cell never ran; no badge.
    let execution_count = cell
        .execution_count
        .filter(|&count| count != 0)
        .map(|count| format!("<span class=\"execution-count\">In [{count}]</span>"))
        .unwrap_or_default();

    let mut outputs = String::new();
    if !cell.outputs.is_empty() {
        outputs.push_str("<div class=\"cell-outputs\"><div class=\"outputs-header\">Output</div>");
        for output in &cell.outputs {
            outputs.push_str(&render_output(output));
        }
        outputs.push_str("</div>");
    }

    format!(
        "<div class=\"cell code-cell\">\
         <div class=\"cell-header\">\
         <span class=\"cell-type\">Code</span>\
         {execution_count}\
         <span class=\"cell-number\">#{number}</span>\
         </div>\
         <div class=\"cell-content\">\
         <pre class=\"code-block\"><code>{body}</code></pre>\
         </div>\
         {outputs}\
         </div>"
    )
}

fn render_output(output: &Output) -> String {
    match output {
        Output::Stream(stream) => {
            let text = stream.text.text();
            if text.is_empty() {
                String::new()
            } else {
                format!(
                    "<pre class=\"stream-output\">{}</pre>",
                    html_escape::encode_text(&text)
                )
            }
        }
        Output::ExecuteResult(result) => match result.text_plain() {
            Some(text) => format!(
                "<pre class=\"execute-result\">{}</pre>",
                html_escape::encode_text(&text)
            ),
            // Results with no text/plain representation are dropped.
            None => String::new(),
        },
        Output::Error(error) => format!(
            "<div class=\"error-output\"><strong>Error:</strong> {}: {}<pre>{}</pre></div>",
            html_escape::encode_text(&error.ename),
            html_escape::encode_text(&error.evalue),
            html_escape::encode_text(&error.traceback.join("\n")),
        ),
        Output::Other => String::new(),
    }
}

fn render_unknown_cell(raw: &Value, number: usize) -> String {
    let kind = raw
        .get("cell_type")
        .and_then(Value::as_str)
        .unwrap_or("unknown");
    let json = serde_json::to_string_pretty(raw).unwrap_or_else(|_| raw.to_string());

    format!(
        "<div class=\"cell unknown-cell\">\
         <div class=\"cell-header\">\
         <span class=\"cell-type\">{}</span>\
         <span class=\"cell-number\">#{number}</span>\
         </div>\
         <pre>{}</pre>\
         </div>",
        html_escape::encode_text(kind),
        html_escape::encode_text(&json),
    )
}
