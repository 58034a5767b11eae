//! Error types with rich diagnostics using miette
//!
//! Markup errors carry the pasted source and a span so the error console can
//! point at the offending spot.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// The only MIME type accepted from the file picker
pub const SVG_MIME_TYPE: &str = "image/svg+xml";

/// Source context for error reporting
#[derive(Debug, Clone)]
pub struct SourceContext {
    /// Name of the source (file name or "<input>")
    pub name: String,
    /// The full source text
    pub source: String,
}

impl SourceContext {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    /// Create a NamedSource for miette
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.name, self.source.clone())
    }

    /// Byte offset of a 1-based row/column position, clamped to the source.
    pub fn offset_of(&self, row: u32, col: u32) -> usize {
        let mut offset = 0;
        for (idx, line) in self.source.split_inclusive('\n').enumerate() {
            if idx + 1 == row as usize {
                let col_offset = line
                    .char_indices()
                    .nth(col.saturating_sub(1) as usize)
                    .map(|(i, _)| i)
                    .unwrap_or(line.len());
                return offset + col_offset;
            }
            offset += line.len();
        }
        self.source.len()
    }

    /// A one-character span at a 1-based row/column position.
    pub fn span_at(&self, row: u32, col: u32) -> SourceSpan {
        let start = self.offset_of(row, col);
        let len = self.source[start..].chars().next().map_or(0, char::len_utf8);
        (start, len).into()
    }
}

/// Everything that can go wrong between raw input and generated component.
#[derive(Error, Diagnostic, Debug)]
pub enum ConvertError {
    #[error("empty input: paste SVG markup or select an SVG file")]
    #[diagnostic(code(svgicon::parse::empty_input))]
    EmptyInput,

    #[error("invalid SVG markup: {message}")]
    #[diagnostic(code(svgicon::parse::markup))]
    MarkupParseFailure {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("invalid SVG markup: no <svg> element found")]
    #[diagnostic(
        code(svgicon::parse::missing_root),
        help("the document must contain an <svg> element")
    )]
    MissingRootElement,

    #[error("no drawable elements found in the SVG")]
    #[diagnostic(
        code(svgicon::parse::no_drawable_elements),
        help("the <svg> element needs at least one child element such as <path>")
    )]
    NoDrawableElements,

    #[error("unsupported file type '{mime_type}': select an SVG file")]
    #[diagnostic(
        code(svgicon::file::unsupported_type),
        help("only files declared as image/svg+xml are accepted")
    )]
    UnsupportedFileType { mime_type: String },

    #[error("could not copy the component code to the clipboard: {message}")]
    #[diagnostic(code(svgicon::clipboard::write_failed))]
    ClipboardWriteFailure { message: String },

    #[error("invalid component source: {message}")]
    #[diagnostic(code(svgicon::jsx::syntax))]
    ComponentSyntax {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },
}

impl ConvertError {
    /// Build a markup error from the XML parser's diagnostic.
    pub fn markup(ctx: &SourceContext, err: &roxmltree::Error) -> Self {
        let pos = err.pos();
        ConvertError::MarkupParseFailure {
            message: err.to_string(),
            src: ctx.named_source(),
            span: ctx.span_at(pos.row, pos.col),
        }
    }

    /// True for errors raised while turning input text into a tree.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            ConvertError::EmptyInput
                | ConvertError::MarkupParseFailure { .. }
                | ConvertError::MissingRootElement
                | ConvertError::NoDrawableElements
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_of_counts_bytes_per_line() {
        let ctx = SourceContext::new("<input>", "<svg>\n  <path/\n</svg>");
        assert_eq!(ctx.offset_of(1, 1), 0);
        assert_eq!(ctx.offset_of(2, 3), 8);
        assert_eq!(ctx.offset_of(9, 1), ctx.source.len());
    }

    #[test]
    fn span_at_end_of_input_is_empty() {
        let ctx = SourceContext::new("<input>", "<svg>");
        let span = ctx.span_at(1, 6);
        assert_eq!(span.offset(), 5);
        assert_eq!(span.len(), 0);
    }

    #[test]
    fn markup_errors_point_into_source() {
        let text = "<svg>\n<path d='1'></svg>";
        let err = roxmltree::Document::parse(text).unwrap_err();
        let ctx = SourceContext::new("<input>", text);
        let converted = ConvertError::markup(&ctx, &err);
        assert!(converted.is_parse_error());
        match converted {
            ConvertError::MarkupParseFailure { span, .. } => {
                assert!(span.offset() > 0);
                assert!(span.offset() <= text.len());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
