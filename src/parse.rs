//! Parse SVG markup into an element tree

use roxmltree::{Document, Node, ParsingOptions};

use crate::ast::{ElementNode, ParsedDocument, PropValue, Props};
use crate::attrs::normalize_attribute;
use crate::errors::{ConvertError, SourceContext};
use crate::log::{debug, trace};
use crate::viewbox::resolve_view_box;

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Parse raw SVG text into a document: the element tree under the first
/// `<svg>` element plus its resolved frame string.
pub fn parse_document(source: &str) -> Result<ParsedDocument, ConvertError> {
    parse_named(&SourceContext::new("<input>", source))
}

/// Like [`parse_document`], with a source name for diagnostics.
pub fn parse_named(ctx: &SourceContext) -> Result<ParsedDocument, ConvertError> {
    if ctx.source.trim().is_empty() {
        return Err(ConvertError::EmptyInput);
    }

    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(&ctx.source, options)
        .map_err(|e| ConvertError::markup(ctx, &e))?;

    let svg = find_svg(&doc).ok_or(ConvertError::MissingRootElement)?;
    let original_view_box = resolve_view_box(svg);
    let elements = parse_children(svg);

    if elements.is_empty() {
        return Err(ConvertError::NoDrawableElements);
    }

    debug!(
        name = %ctx.name,
        top_level = elements.len(),
        view_box = %original_view_box,
        "parsed svg document"
    );
    Ok(ParsedDocument {
        elements,
        original_view_box,
    })
}

/// First element named `svg`, in document order.
fn find_svg<'a, 'input>(doc: &'a Document<'input>) -> Option<Node<'a, 'input>> {
    doc.descendants()
        .find(|n| n.is_element() && n.tag_name().name() == "svg")
}

/// One [`ElementNode`] per element child of `parent`, recursively.
/// Text, comments and processing instructions are skipped.
pub fn parse_children(parent: Node<'_, '_>) -> Vec<ElementNode> {
    parent
        .children()
        .filter(Node::is_element)
        .map(parse_element)
        .collect()
}

fn parse_element(node: Node<'_, '_>) -> ElementNode {
    let tag = qualified_name(node, node.tag_name().namespace(), node.tag_name().name())
        .to_lowercase();

    let mut props = Props::new();
    for (name, uri) in declared_namespaces(node) {
        props.insert(name, PropValue::Text(uri));
    }
    for attr in node.attributes() {
        let name = qualified_name(node, attr.namespace(), attr.name());
        let (name, value) = normalize_attribute(&name, attr.value());
        props.insert(name, value);
    }

    let children = parse_children(node);
    trace!(tag = %tag, props = props.len(), children = children.len(), "element");
    ElementNode {
        tag,
        props,
        children,
    }
}

/// Namespace declarations written on `node` itself, as `xmlns` or
/// `xmlns:prefix` attribute names. Bindings already in scope on the parent
/// element are not repeated.
fn declared_namespaces(node: Node<'_, '_>) -> Vec<(String, String)> {
    let parent = node.parent_element();
    node.namespaces()
        .filter(|ns| ns.name() != Some("xml"))
        .filter(|ns| {
            !parent.is_some_and(|p| {
                p.namespaces()
                    .any(|inherited| inherited.name() == ns.name() && inherited.uri() == ns.uri())
            })
        })
        .map(|ns| {
            let name = match ns.name() {
                Some(prefix) => format!("xmlns:{prefix}"),
                None => "xmlns".to_string(),
            };
            (name, ns.uri().to_string())
        })
        .collect()
}

/// Rebuild `prefix:local` from the namespace URI, so prefixed names such as
/// `xlink:href` or `sodipodi:namedview` pass through as written.
fn qualified_name(node: Node<'_, '_>, namespace: Option<&str>, local: &str) -> String {
    let prefix = namespace.and_then(|uri| match uri {
        XML_NAMESPACE => Some("xml"),
        _ => node.lookup_prefix(uri),
    });
    match prefix {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}:{local}"),
        _ => local.to_string(),
    }
}
