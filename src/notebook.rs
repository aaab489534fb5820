//! Notebook document model.
//!
//! Mirrors the subset of the `.ipynb` JSON schema that the viewer consumes.
//! Documents are deserialized fresh for every request and never mutated;
//! anything the viewer does not recognize is preserved as raw JSON so it can
//! still be displayed.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A parsed notebook document.
#[derive(Debug, Clone, Deserialize)]
pub struct Notebook {
    /// Cells in document order. `None` when the document is missing the
    /// `cells` array entirely, which is a terminal display condition rather
    /// than a parse failure.
    pub cells: Option<Vec<Cell>>,

    /// File metadata attached by the backend.
    #[serde(rename = "_file_info")]
    pub file_info: Option<FileInfo>,
}

/// Backend-provided metadata about the notebook file.
#[derive(Debug, Clone, Deserialize)]
pub struct FileInfo {
    /// File size in bytes.
    pub size: u64,
}

/// One unit of a notebook document.
///
/// Cells are tagged by `cell_type`. Anything other than `markdown` or `code`
/// keeps its raw JSON for the fallback rendering.
#[derive(Debug, Clone)]
pub enum Cell {
    /// A markdown cell.
    Markdown(MarkdownCell),
    /// An executable code cell with optional outputs.
    Code(CodeCell),
    /// A cell with an unrecognized `cell_type`.
    Other(Value),
}

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D>(deserializer: D) -> Result<Cell, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;

        let kind = value
            .get("cell_type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();

        let cell = match kind.as_str() {
            "markdown" => Cell::Markdown(
                serde_json::from_value(value).map_err(serde::de::Error::custom)?,
            ),
            "code" => {
                Cell::Code(serde_json::from_value(value).map_err(serde::de::Error::custom)?)
            }
            _ => Cell::Other(value),
        };

        Ok(cell)
    }
}

/// A markdown cell body.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkdownCell {
    /// Markdown source.
    #[serde(default)]
    pub source: SourceText,
}

/// A code cell body.
#[derive(Debug, Clone, Deserialize)]
pub struct CodeCell {
    /// Code source.
    #[serde(default)]
    pub source: SourceText,

    /// Kernel execution counter, when the cell has been run.
    #[serde(default)]
    pub execution_count: Option<i64>,

    /// Outputs from a prior execution, in order.
    #[serde(default)]
    pub outputs: Vec<Output>,
}

/// A result attached to a code cell, tagged by `output_type`.
#[derive(Debug, Clone)]
pub enum Output {
    /// Text written to stdout or stderr.
    Stream(StreamOutput),
    /// The value of the last expression, keyed by MIME type.
    ExecuteResult(ExecuteResult),
    /// An exception raised during execution.
    Error(ErrorOutput),
    /// An output type this viewer does not render.
    Other,
}

impl<'de> Deserialize<'de> for Output {
    fn deserialize<D>(deserializer: D) -> Result<Output, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;

        let kind = value
            .get("output_type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();

        let output = match kind.as_str() {
            "stream" => Output::Stream(
                serde_json::from_value(value).map_err(serde::de::Error::custom)?,
            ),
            "execute_result" => Output::ExecuteResult(
                serde_json::from_value(value).map_err(serde::de::Error::custom)?,
            ),
            "error" => {
                Output::Error(serde_json::from_value(value).map_err(serde::de::Error::custom)?)
            }
            _ => Output::Other,
        };

        Ok(output)
    }
}

/// A `stream` output.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamOutput {
    /// The streamed text.
    #[serde(default)]
    pub text: SourceText,
}

/// An `execute_result` output.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecuteResult {
    /// Representations of the result, keyed by MIME type. Only `text/plain`
    /// is rendered; other representations are carried but ignored.
    #[serde(default)]
    pub data: serde_json::Map<String, Value>,
}

impl ExecuteResult {
    /// Returns the `text/plain` representation, if present.
    pub fn text_plain(&self) -> Option<String> {
        match self.data.get("text/plain")? {
            Value::String(text) => Some(text.clone()),
            Value::Array(parts) => Some(parts.iter().filter_map(Value::as_str).collect()),
            _ => None,
        }
    }
}

/// An `error` output.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorOutput {
    /// Exception type name.
    #[serde(default)]
    pub ename: String,

    /// Exception message.
    #[serde(default)]
    pub evalue: String,

    /// Traceback lines, in order.
    #[serde(default)]
    pub traceback: Vec<String>,
}

/// Cell text as stored on the wire: either a single string or an ordered
/// sequence of fragments. Both forms normalize to the same concatenation.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SourceText {
    /// The text as one string.
    Single(String),
    /// The text as ordered fragments.
    Fragments(Vec<String>),
}

impl SourceText {
    /// Concatenates the text into a single string.
    pub fn text(&self) -> String {
        match self {
            SourceText::Single(text) => text.clone(),
            SourceText::Fragments(parts) => parts.concat(),
        }
    }
}

impl Default for SourceText {
    fn default() -> Self {
        SourceText::Single(String::new())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{Cell, Notebook, Output, SourceText};

    #[test]
    fn source_forms_normalize_identically() {
        let single: SourceText = serde_json::from_value(json!("a\nb")).unwrap();
        let fragments: SourceText = serde_json::from_value(json!(["a\n", "b"])).unwrap();

        assert_eq!(single.text(), fragments.text());
    }

    #[test]
    fn cell_tags_dispatch() {
        let cells: Vec<Cell> = serde_json::from_value(json!([
            { "cell_type": "markdown", "source": "# Hi" },
            { "cell_type": "code", "source": ["x = 1"], "outputs": [] },
            { "cell_type": "raw", "source": "anything" },
        ]))
        .unwrap();

        assert!(matches!(cells[0], Cell::Markdown(_)));
        assert!(matches!(cells[1], Cell::Code(_)));
        assert!(matches!(cells[2], Cell::Other(_)));
    }

    #[test]
    fn unknown_output_maps_to_other() {
        let output: Output = serde_json::from_value(json!({
            "output_type": "display_data",
            "data": { "image/png": "..." },
        }))
        .unwrap();

        assert!(matches!(output, Output::Other));
    }

    #[test]
    fn execute_result_exposes_text_plain_only() {
        let output: Output = serde_json::from_value(json!({
            "output_type": "execute_result",
            "data": { "text/plain": ["4", "2"], "text/html": "<b>42</b>" },
        }))
        .unwrap();

        match output {
            Output::ExecuteResult(result) => assert_eq!(result.text_plain().unwrap(), "42"),
            other => panic!("unexpected output: {:?}", other),
        }
    }

    #[test]
    fn missing_cells_is_not_a_parse_error() {
        let notebook: Notebook = serde_json::from_value(json!({})).unwrap();

        assert!(notebook.cells.is_none());
    }
}
