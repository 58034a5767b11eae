//! Live preview
//!
//! The preview is built straight from the parsed tree: every node borrows its
//! tag and property map from the [`ElementNode`] it renders, and the wrapper
//! carries the working frame. Serializing to SVG markup follows what React
//! DOM writes for the same element tree.

use std::borrow::Cow;
use std::fmt::Write;

use super::{TreeVisitor, render_elements};
use crate::ast::{ElementNode, PropValue, Props, StyleMap};
use crate::viewbox::ViewBoxValues;

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";
const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";

/// Class list the icon wrapper puts on its root `<svg>`
pub const WRAPPER_CLASS: &str = "MuiSvgIcon-root";

/// One displayable element
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewElement<'a> {
    pub tag: &'a str,
    pub key: usize,
    pub props: &'a Props,
    pub children: Vec<PreviewElement<'a>>,
}

/// The icon wrapper and its content
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewIcon<'a> {
    pub view_box: String,
    pub children: Vec<PreviewElement<'a>>,
}

struct PreviewBuilder;

impl<'a> TreeVisitor<'a> for PreviewBuilder {
    type Output = PreviewElement<'a>;

    fn element(
        &mut self,
        node: &'a ElementNode,
        key: usize,
        _depth: usize,
        children: Vec<PreviewElement<'a>>,
    ) -> PreviewElement<'a> {
        PreviewElement {
            tag: &node.tag,
            key,
            props: &node.props,
            children,
        }
    }
}

/// Build the preview for a tree and the working frame.
pub fn render_preview<'a>(elements: &'a [ElementNode], view_box: &ViewBoxValues) -> PreviewIcon<'a> {
    PreviewIcon {
        view_box: view_box.to_string(),
        children: render_elements(&mut PreviewBuilder, elements, 0),
    }
}

impl PreviewIcon<'_> {
    /// Standalone SVG document for the preview.
    ///
    /// Prefixes used by tags or attributes that no standard namespace covers
    /// are declared with placeholder URNs so the document stays well-formed.
    pub fn to_svg_markup(&self) -> String {
        let mut prefixes = Vec::new();
        for child in &self.children {
            child.collect_prefixes(&mut prefixes);
        }

        let mut out = String::new();
        let _ = write!(
            out,
            r#"<svg class="{WRAPPER_CLASS}" focusable="false" aria-hidden="true" viewBox="{}" xmlns="{SVG_NAMESPACE}" xmlns:xlink="{XLINK_NAMESPACE}""#,
            escape(&self.view_box)
        );
        for prefix in &prefixes {
            let _ = write!(out, r#" xmlns:{prefix}="urn:svgicon:{prefix}""#);
        }
        out.push('>');
        for child in &self.children {
            child.write_markup(&mut out);
        }
        out.push_str("</svg>");
        out
    }

    /// Total number of preview elements below the wrapper.
    pub fn element_count(&self) -> usize {
        self.children.iter().map(PreviewElement::count).sum()
    }
}

impl PreviewElement<'_> {
    fn count(&self) -> usize {
        1 + self.children.iter().map(PreviewElement::count).sum::<usize>()
    }

    fn collect_prefixes(&self, prefixes: &mut Vec<String>) {
        let names = std::iter::once(Cow::Borrowed(self.tag))
            .chain(self.props.keys().map(dom_attribute_name));
        for name in names {
            if let Some((prefix, _)) = name.split_once(':') {
                if !matches!(prefix, "xml" | "xlink" | "xmlns")
                    && !prefixes.iter().any(|p| p == prefix)
                {
                    prefixes.push(prefix.to_string());
                }
            }
        }
        for child in &self.children {
            child.collect_prefixes(prefixes);
        }
    }

    fn write_markup(&self, out: &mut String) {
        let _ = write!(out, "<{}", self.tag);
        for (name, value) in self.props.iter() {
            if declared_on_root(name, value) {
                continue;
            }
            let value = match value {
                PropValue::Text(text) => Cow::Borrowed(text.as_str()),
                PropValue::Style(style) => Cow::Owned(css_text(style)),
            };
            let _ = write!(out, r#" {}="{}""#, dom_attribute_name(name), escape(&value));
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &self.children {
            child.write_markup(out);
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

/// Namespace bindings the root `<svg>` of the markup always carries.
fn declared_on_root(name: &str, value: &PropValue) -> bool {
    match (name, value.as_text()) {
        ("xmlns", Some(uri)) => uri == SVG_NAMESPACE,
        ("xmlns:xlink" | "xmlnsXlink", Some(uri)) => uri == XLINK_NAMESPACE,
        _ => false,
    }
}

/// SVG attributes whose canonical spelling is camelCase.
const CAMEL_CASE_ATTRIBUTES: &[&str] = &[
    "allowReorder", "attributeName", "attributeType", "autoReverse", "baseFrequency",
    "baseProfile", "calcMode", "clipPathUnits", "contentScriptType", "contentStyleType",
    "diffuseConstant", "edgeMode", "externalResourcesRequired", "filterRes", "filterUnits",
    "glyphRef", "gradientTransform", "gradientUnits", "kernelMatrix", "kernelUnitLength",
    "keyPoints", "keySplines", "keyTimes", "lengthAdjust", "limitingConeAngle",
    "markerHeight", "markerUnits", "markerWidth", "maskContentUnits", "maskUnits",
    "numOctaves", "pathLength", "patternContentUnits", "patternTransform", "patternUnits",
    "pointsAtX", "pointsAtY", "pointsAtZ", "preserveAlpha", "preserveAspectRatio",
    "primitiveUnits", "refX", "refY", "repeatCount", "repeatDur", "requiredExtensions",
    "requiredFeatures", "specularConstant", "specularExponent", "spreadMethod",
    "startOffset", "stdDeviation", "stitchTiles", "surfaceScale", "systemLanguage",
    "tableValues", "targetX", "targetY", "textLength", "viewBox", "viewTarget",
    "xChannelSelector", "yChannelSelector", "zoomAndPan",
];

/// Attribute name React DOM writes for a property name.
pub fn dom_attribute_name(prop: &str) -> Cow<'_, str> {
    match prop {
        "className" => return Cow::Borrowed("class"),
        "htmlFor" => return Cow::Borrowed("for"),
        "xmlnsXlink" => return Cow::Borrowed("xmlns:xlink"),
        _ => {}
    }
    if prop.contains(':') || CAMEL_CASE_ATTRIBUTES.contains(&prop) {
        return Cow::Borrowed(prop);
    }
    for prefix in ["xlink", "xml"] {
        if let Some(rest) = prop.strip_prefix(prefix) {
            if rest.starts_with(|c: char| c.is_ascii_uppercase()) {
                return Cow::Owned(format!("{prefix}:{}", rest.to_ascii_lowercase()));
            }
        }
    }
    hyphenate(prop)
}

/// `strokeWidth` -> `stroke-width`; `WebkitMask` -> `-webkit-mask`.
fn hyphenate(name: &str) -> Cow<'_, str> {
    if !name.contains(|c: char| c.is_ascii_uppercase()) {
        return Cow::Borrowed(name);
    }
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

/// Inline CSS for a style map, `name:value` joined by `;`.
fn css_text(style: &StyleMap) -> String {
    let mut css = String::new();
    for (property, value) in style.iter() {
        if !css.is_empty() {
            css.push(';');
        }
        let property = match property.strip_prefix("ms") {
            Some(rest) if rest.starts_with(|c: char| c.is_ascii_uppercase()) => {
                Cow::Owned(format!("-ms{}", hyphenate(rest)))
            }
            _ => hyphenate(property),
        };
        let _ = write!(css, "{property}:{value}");
    }
    css
}

fn escape(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_document;

    #[test]
    fn preview_borrows_the_parsed_tree() {
        let doc = parse_document(
            r#"<svg viewBox="0 0 24 24"><g fill="red"><path d="M0 0"/></g><circle r="2"/></svg>"#,
        )
        .expect("parses");
        let preview = render_preview(&doc.elements, &ViewBoxValues::from_frame("0 0 24 24"));
        assert_eq!(preview.view_box, "0 0 24 24");
        assert_eq!(preview.element_count(), 3);
        assert_eq!(preview.children[1].key, 1);
        assert!(std::ptr::eq(preview.children[0].props, &doc.elements[0].props));
        assert_eq!(preview.children[0].children[0].tag, "path");
    }

    #[test]
    fn markup_maps_property_names_back() {
        let doc = parse_document(
            r##"<svg xmlns:xlink="http://www.w3.org/1999/xlink" viewBox="0 0 10 10">
                <path stroke-width="2" fill-rule="evenodd" d="M0 0"/>
                <use xlink:href="#a"/>
                <radialGradient gradientUnits="userSpaceOnUse"/>
            </svg>"##,
        )
        .expect("parses");
        let markup = render_preview(&doc.elements, &ViewBoxValues::new(0.0, 0.0, 10.0, 10.0))
            .to_svg_markup();
        insta::assert_snapshot!(markup, @r##"<svg class="MuiSvgIcon-root" focusable="false" aria-hidden="true" viewBox="0 0 10 10" xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink"><path stroke-width="2" fill-rule="evenodd" d="M0 0"/><use xlink:href="#a"/><radialgradient gradientUnits="userSpaceOnUse"/></svg>"##);
    }

    #[test]
    fn style_becomes_css_text() {
        let doc = parse_document(
            r#"<svg><text style="font-size: 12px; -ms-transform: none; fill:a&amp;b">x</text></svg>"#,
        )
        .expect("parses");
        let markup = render_preview(&doc.elements, &ViewBoxValues::default()).to_svg_markup();
        assert!(
            markup.contains(r#"<text style="font-size:12px;-ms-transform:none;fill:a&amp;b"/>"#),
            "{markup}"
        );
    }

    #[test]
    fn unknown_prefixes_are_declared() {
        let doc = parse_document(
            r#"<svg xmlns:sodipodi="http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd">
                <sodipodi:namedview sodipodi:docname="a.svg"/><path d="M0 0"/>
            </svg>"#,
        )
        .expect("parses");
        let markup = render_preview(&doc.elements, &ViewBoxValues::default()).to_svg_markup();
        assert!(markup.contains(r#"xmlns:sodipodi="urn:svgicon:sodipodi""#), "{markup}");
        assert!(roxmltree::Document::parse(&markup).is_ok(), "{markup}");
    }

    #[test]
    fn child_namespace_declarations_stay_on_their_element() {
        let doc = parse_document(
            r#"<svg viewBox="0 0 24 24">
                <foreignObject><div xmlns="http://www.w3.org/1999/xhtml">x</div></foreignObject>
                <g xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink"><path d="M0 0"/></g>
                <svg xmlns:foo="urn:foo" foo:a="1" width="2"/>
            </svg>"#,
        )
        .expect("parses");
        let markup = render_preview(&doc.elements, &ViewBoxValues::default()).to_svg_markup();
        assert!(
            markup.contains(r#"<div xmlns="http://www.w3.org/1999/xhtml"/>"#),
            "{markup}"
        );
        assert!(markup.contains(r#"<g><path d="M0 0"/></g>"#), "{markup}");
        assert!(markup.contains(r#"<svg xmlns:foo="urn:foo" foo:a="1" width="2"/>"#), "{markup}");
        assert!(roxmltree::Document::parse(&markup).is_ok(), "{markup}");
    }

    #[test]
    fn attribute_names() {
        assert_eq!(dom_attribute_name("strokeWidth"), "stroke-width");
        assert_eq!(dom_attribute_name("className"), "class");
        assert_eq!(dom_attribute_name("xlinkHref"), "xlink:href");
        assert_eq!(dom_attribute_name("xmlSpace"), "xml:space");
        assert_eq!(dom_attribute_name("viewBox"), "viewBox");
        assert_eq!(dom_attribute_name("d"), "d");
        assert_eq!(dom_attribute_name("xlink:href"), "xlink:href");
    }
}
