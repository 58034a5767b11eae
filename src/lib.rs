//! Convert SVG documents into Material-UI `SvgIcon` React components.
//!
//! ```
//! let code = svgicon::convert(r#"<svg viewBox="0 0 24 24"><path d="M1 1h2v2"/></svg>"#, "Dot")?;
//! assert!(code.contains(r#"<path key={0} d="M1 1h2v2" />"#));
//! # Ok::<(), svgicon::ConvertError>(())
//! ```

pub mod ast;
pub mod attrs;
pub mod compare;
pub mod errors;
pub mod jsx;
pub mod log;
pub mod number;
pub mod parse;
pub mod render;
pub mod session;
pub mod viewbox;

use pest_derive::Parser;

pub use ast::{ElementNode, ParsedDocument, PropValue, Props, StyleMap};
pub use errors::{ConvertError, SVG_MIME_TYPE};
pub use jsx::{ParsedComponent, parse_component};
pub use parse::parse_document;
pub use render::{GeneratorOptions, PreviewIcon, generate_component, render_preview};
pub use session::{
    Clipboard, DEFAULT_COMPONENT_NAME, ErrorConsole, MemoryClipboard, SelectedFile, Session,
    SessionState,
};
pub use viewbox::{ViewBoxField, ViewBoxValues};

#[derive(Parser)]
#[grammar = "jsx.pest"]
pub struct ComponentParser;

/// Convert SVG markup to component source in one step, using the document's
/// own frame.
pub fn convert(svg: &str, name: &str) -> Result<String, ConvertError> {
    let doc = parse_document(svg)?;
    let view_box = ViewBoxValues::from_frame(&doc.original_view_box);
    Ok(generate_component(&doc.elements, name, &view_box))
}
