mod code;
mod markdown;

pub use code::CodeHighlighter;
pub use markdown::MarkdownRenderer;

/// HTML fragment renderer.
///
/// Implementors of this trait convert notebook cell text into HTML.
pub trait Renderer {
    /// Potential errors returned by rendering. If rendering is infallible
    /// (any input produces some HTML), this type can be set to
    /// [`std::convert::Infallible`].
    type Error;

    /// Renders the input as an HTML fragment.
    ///
    /// The HTML should be written directly into the `html` buffer.
    fn render(&self, input: &str, html: &mut String) -> Result<(), Self::Error>;

    /// A hint for how many bytes the output will be.
    ///
    /// This hint should be cheap to compute and is not required to be accurate. However, accurate
    /// hints may improve performance by saving intermediate allocations.
    fn size_hint(&self, input: &str) -> usize {
        input.len()
    }
}
