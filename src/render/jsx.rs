//! Component source generation

use std::fmt::Write;

use super::{TreeVisitor, WRAPPER_MODULE, WRAPPER_TAG, render_elements};
use crate::ast::{ElementNode, PropValue, Props};
use crate::log::debug;
use crate::viewbox::ViewBoxValues;

/// Layout knobs for generated source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Spaces per nesting level
    pub indent_width: usize,
    /// Nesting level of top-level elements inside the wrapper
    pub base_depth: usize,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            indent_width: 2,
            base_depth: 3,
        }
    }
}

/// Generate the component module for `elements` with the default layout.
pub fn generate_component(elements: &[ElementNode], name: &str, view_box: &ViewBoxValues) -> String {
    generate_component_with(elements, name, view_box, &GeneratorOptions::default())
}

pub fn generate_component_with(
    elements: &[ElementNode],
    name: &str,
    view_box: &ViewBoxValues,
    options: &GeneratorOptions,
) -> String {
    let body = generate_elements(elements, options);
    debug!(name, view_box = %view_box, bytes = body.len(), "generated component");

    let mut out = String::new();
    let _ = writeln!(out, "import React from 'react';");
    let _ = writeln!(out, "import {{ {WRAPPER_TAG} }} from '{WRAPPER_MODULE}';");
    let _ = writeln!(out);
    let _ = writeln!(out, "const {name} = (props) => {{");
    let _ = writeln!(out, "  return (");
    let _ = writeln!(out, "    <{WRAPPER_TAG} {{...props}} viewBox=\"{view_box}\">");
    let _ = writeln!(out, "{body}");
    let _ = writeln!(out, "    </{WRAPPER_TAG}>");
    let _ = writeln!(out, "  );");
    let _ = writeln!(out, "}};");
    let _ = writeln!(out);
    let _ = write!(out, "export default {name};");
    out
}

/// The element lines alone, siblings joined by newlines.
pub fn generate_elements(elements: &[ElementNode], options: &GeneratorOptions) -> String {
    let mut writer = JsxWriter { options };
    render_elements(&mut writer, elements, options.base_depth).join("\n")
}

struct JsxWriter<'o> {
    options: &'o GeneratorOptions,
}

impl<'a> TreeVisitor<'a> for JsxWriter<'_> {
    type Output = String;

    fn element(
        &mut self,
        node: &'a ElementNode,
        key: usize,
        depth: usize,
        children: Vec<String>,
    ) -> String {
        let indent = " ".repeat(self.options.indent_width * depth);
        let tag = &node.tag;
        let props = props_source(&node.props);
        if children.is_empty() {
            format!("{indent}<{tag} key={{{key}}} {props} />")
        } else {
            format!(
                "{indent}<{tag} key={{{key}}} {props}>\n{}\n{indent}</{tag}>",
                children.join("\n")
            )
        }
    }
}

/// `name="value"` pairs and style objects, joined by single spaces.
fn props_source(props: &Props) -> String {
    props
        .iter()
        .map(|(name, value)| match value {
            PropValue::Text(text) => format!("{name}=\"{text}\""),
            PropValue::Style(style) => {
                let entries = style
                    .iter()
                    .map(|(property, value)| format!("{property}: '{value}'"))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{name}={{{{ {entries} }}}}")
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::StyleMap;

    fn frame() -> ViewBoxValues {
        ViewBoxValues::new(0.0, 0.0, 24.0, 24.0)
    }

    #[test]
    fn single_path_component() {
        let elements = vec![ElementNode::new("path").with_prop("d", "M1 1h2v2")];
        insta::assert_snapshot!(generate_component(&elements, "CustomIcon", &frame()), @r#"
        import React from 'react';
        import { SvgIcon } from '@mui/material';

        const CustomIcon = (props) => {
          return (
            <SvgIcon {...props} viewBox="0 0 24 24">
              <path key={0} d="M1 1h2v2" />
            </SvgIcon>
          );
        };

        export default CustomIcon;
        "#);
    }

    #[test]
    fn nested_elements_indent_per_depth() {
        let elements = vec![
            ElementNode::new("g")
                .with_prop("fill", "none")
                .with_child(ElementNode::new("circle").with_prop("r", "4"))
                .with_child(ElementNode::new("g").with_child(ElementNode::new("rect"))),
            ElementNode::new("path"),
        ];
        let body = generate_elements(&elements, &GeneratorOptions::default());
        let expected = [
            "      <g key={0} fill=\"none\">",
            "        <circle key={0} r=\"4\" />",
            "        <g key={1} >",
            "          <rect key={0}  />",
            "        </g>",
            "      </g>",
            "      <path key={1}  />",
        ]
        .join("\n");
        assert_eq!(body, expected);
    }

    #[test]
    fn style_objects() {
        let style: StyleMap = [("fill", "red"), ("strokeWidth", "2")].into_iter().map(|(k, v)| (k, v.to_string())).collect();
        let elements = vec![
            ElementNode::new("path").with_prop("style", style).with_prop("d", "M0 0"),
            ElementNode::new("rect").with_prop("style", StyleMap::new()),
        ];
        let body = generate_elements(
            &elements,
            &GeneratorOptions {
                indent_width: 0,
                base_depth: 0,
            },
        );
        assert_eq!(
            body,
            "<path key={0} style={{ fill: 'red', strokeWidth: '2' }} d=\"M0 0\" />\n\
             <rect key={1} style={{  }} />"
        );
    }

    #[test]
    fn view_box_uses_number_formatting() {
        let elements = vec![ElementNode::new("path")];
        let code = generate_component(
            &elements,
            "Icon",
            &ViewBoxValues::new(-0.5, 0.0, f64::NAN, 1e21),
        );
        assert!(code.contains(r#"viewBox="-0.5 0 NaN 1e+21""#), "{code}");
        assert!(code.ends_with("export default Icon;"));
    }
}
