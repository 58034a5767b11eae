//! Read generated component source back into an element tree
//!
//! The inverse of [`crate::render::jsx`]: keys are checked and dropped, the
//! wrapper's frame string is kept verbatim.

use pest::Parser;
use pest::error::InputLocation;
use pest::iterators::Pair;

use crate::ast::{ElementNode, PropValue, StyleMap};
use crate::errors::{ConvertError, SourceContext};
use crate::log::debug;
use crate::{ComponentParser, Rule};

/// A component module read back from source
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedComponent {
    pub name: String,
    pub view_box: String,
    pub elements: Vec<ElementNode>,
}

/// Parse generated component source.
pub fn parse_component(source: &str) -> Result<ParsedComponent, ConvertError> {
    let ctx = SourceContext::new("<component>", source);
    let mut pairs = ComponentParser::parse(Rule::component, source).map_err(|e| {
        let span = match e.location {
            InputLocation::Pos(pos) => (pos, 0),
            InputLocation::Span((start, end)) => (start, end - start),
        };
        syntax(&ctx, e.variant.message().into_owned(), span)
    })?;
    let Some(component) = pairs.next() else {
        return Err(syntax(&ctx, "empty component".to_string(), (0, 0)));
    };

    let mut name: Option<String> = None;
    let mut icon = None;
    for inner in component.into_inner() {
        match inner.as_rule() {
            Rule::ident => {
                let ident = inner.as_str();
                if let Some(declared) = &name {
                    if declared != ident {
                        return Err(syntax(
                            &ctx,
                            format!("default export '{ident}' does not match '{declared}'"),
                            span_of(&inner),
                        ));
                    }
                } else {
                    name = Some(ident.to_string());
                }
            }
            Rule::icon => icon = Some(inner),
            _ => {}
        }
    }

    let (Some(name), Some(icon)) = (name, icon) else {
        return Err(syntax(&ctx, "missing component body".to_string(), (0, 0)));
    };

    let mut view_box = String::new();
    let mut elements = Vec::new();
    for inner in icon.into_inner() {
        match inner.as_rule() {
            Rule::view_box => view_box = quoted_text(inner),
            Rule::element => {
                let index = elements.len();
                elements.push(parse_element(&ctx, inner, index)?);
            }
            _ => {}
        }
    }

    debug!(name = %name, view_box = %view_box, top_level = elements.len(), "parsed component");
    Ok(ParsedComponent {
        name,
        view_box,
        elements,
    })
}

fn parse_element(
    ctx: &SourceContext,
    pair: Pair<'_, Rule>,
    index: usize,
) -> Result<ElementNode, ConvertError> {
    let mut node = ElementNode::new("");
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::tag_name => node.tag = inner.as_str().to_string(),
            Rule::key_attr => {
                let span = span_of(&inner);
                let found = inner.into_inner().next().map(|p| p.as_str().to_string());
                if found.as_deref().and_then(|k| k.parse::<usize>().ok()) != Some(index) {
                    return Err(syntax(
                        ctx,
                        format!("expected key {{{index}}}, found {{{}}}", found.unwrap_or_default()),
                        span,
                    ));
                }
            }
            Rule::plain_attr => {
                let mut parts = inner.into_inner();
                let name = parts.next().map(|p| p.as_str().to_string()).unwrap_or_default();
                let value = parts.next().map(quoted_text).unwrap_or_default();
                node.props.insert(name, PropValue::Text(value));
            }
            Rule::style_attr => {
                let mut style = StyleMap::new();
                for entry in inner.into_inner() {
                    let mut parts = entry.into_inner();
                    let name = parts.next().map(|p| p.as_str().trim().to_string());
                    let value = parts.next().map(quoted_text);
                    if let (Some(name), Some(value)) = (name, value) {
                        style.insert(name, value);
                    }
                }
                node.props.insert("style", PropValue::Style(style));
            }
            Rule::element => {
                let child_index = node.children.len();
                node.children.push(parse_element(ctx, inner, child_index)?);
            }
            Rule::close_tag => {
                if inner.as_str() != node.tag {
                    return Err(syntax(
                        ctx,
                        format!("closing tag </{}> does not match <{}>", inner.as_str(), node.tag),
                        span_of(&inner),
                    ));
                }
            }
            _ => {}
        }
    }
    Ok(node)
}

/// Text between the quotes of a quoted value rule.
fn quoted_text(pair: Pair<'_, Rule>) -> String {
    pair.into_inner()
        .next()
        .map(|p| p.as_str().to_string())
        .unwrap_or_default()
}

fn span_of(pair: &Pair<'_, Rule>) -> (usize, usize) {
    let span = pair.as_span();
    (span.start(), span.end() - span.start())
}

fn syntax(ctx: &SourceContext, message: String, span: (usize, usize)) -> ConvertError {
    ConvertError::ComponentSyntax {
        message,
        src: ctx.named_source(),
        span: span.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"import React from 'react';
import { SvgIcon } from '@mui/material';

const Star = (props) => {
  return (
    <SvgIcon {...props} viewBox="0 0 24 24">
      <g key={0} fill="none" style={{ strokeWidth: '2', fontFamily: 'a, b' }}>
        <path key={0} d="M1 1h2" />
        <circle key={1} cx="4" />
      </g>
      <rect key={1}  />
    </SvgIcon>
  );
};

export default Star;
"#;

    #[test]
    fn reads_generated_component() {
        let parsed = parse_component(SAMPLE).expect("parses");
        assert_eq!(parsed.name, "Star");
        assert_eq!(parsed.view_box, "0 0 24 24");
        assert_eq!(parsed.elements.len(), 2);

        let group = &parsed.elements[0];
        assert_eq!(group.tag, "g");
        assert_eq!(group.props.get("fill").and_then(PropValue::as_text), Some("none"));
        let style = group.props.get("style").and_then(PropValue::as_style).expect("style");
        assert_eq!(style.get("strokeWidth").map(String::as_str), Some("2"));
        assert_eq!(style.get("fontFamily").map(String::as_str), Some("a, b"));
        assert_eq!(group.children[1].tag, "circle");

        let rect = &parsed.elements[1];
        assert!(rect.props.is_empty());
        assert!(rect.children.is_empty());
    }

    #[test]
    fn empty_style_object() {
        let source = SAMPLE.replace(
            "style={{ strokeWidth: '2', fontFamily: 'a, b' }}",
            "style={{  }}",
        );
        let parsed = parse_component(&source).expect("parses");
        let style = parsed.elements[0].props.get("style").and_then(PropValue::as_style);
        assert!(style.is_some_and(StyleMap::is_empty));
    }

    #[test]
    fn mismatched_closing_tag() {
        let source = SAMPLE.replace("      </g>", "      </defs>");
        let err = parse_component(&source).unwrap_err();
        assert!(err.to_string().contains("</defs>"), "{err}");
    }

    #[test]
    fn export_must_match_declaration() {
        let source = SAMPLE.replace("export default Star;", "export default Moon;");
        let err = parse_component(&source).unwrap_err();
        assert!(matches!(err, ConvertError::ComponentSyntax { .. }));
    }

    #[test]
    fn keys_follow_sibling_order() {
        let source = SAMPLE.replace("<circle key={1}", "<circle key={5}");
        let err = parse_component(&source).unwrap_err();
        assert!(err.to_string().contains("expected key {1}"), "{err}");
    }

    #[test]
    fn garbage_is_a_syntax_error() {
        let err = parse_component("const x = 1;").unwrap_err();
        match err {
            ConvertError::ComponentSyntax { span, .. } => assert!(span.offset() <= 12),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
