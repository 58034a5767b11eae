//! Element tree comparison
//!
//! Shared by the fixture harness and the xtask preview page: checks that a
//! generated component reads back into the tree it was generated from.

use crate::ast::{ElementNode, PropValue};
use crate::jsx::parse_component;
use crate::parse::parse_document;
use crate::render::generate_component;
use crate::viewbox::ViewBoxValues;

/// Result of comparing two element trees
#[derive(Debug, Clone, PartialEq)]
pub enum CompareResult {
    /// Trees and frames are identical
    Match,
    /// The trees differ; `details` names the first difference
    TreeMismatch { details: String },
    /// The frames differ
    ViewBoxMismatch { expected: String, actual: String },
    /// One side could not be parsed
    ParseError { details: String },
}

impl CompareResult {
    pub fn is_match(&self) -> bool {
        matches!(self, CompareResult::Match)
    }
}

/// Compare two element sequences, reporting the first difference.
pub fn compare_trees(expected: &[ElementNode], actual: &[ElementNode]) -> CompareResult {
    match first_difference("", expected, actual) {
        None => CompareResult::Match,
        Some(details) => CompareResult::TreeMismatch { details },
    }
}

fn first_difference(path: &str, expected: &[ElementNode], actual: &[ElementNode]) -> Option<String> {
    for (index, (e, a)) in expected.iter().zip(actual).enumerate() {
        let here = format!("{path}/{}[{index}]", e.tag);
        if e.tag != a.tag {
            return Some(format!("{here}: tag '{}' became '{}'", e.tag, a.tag));
        }
        if e.props != a.props {
            return Some(describe_props(&here, e, a));
        }
        if let Some(details) = first_difference(&here, &e.children, &a.children) {
            return Some(details);
        }
    }
    if expected.len() != actual.len() {
        let at = if path.is_empty() { "/" } else { path };
        return Some(format!(
            "{at}: expected {} children, found {}",
            expected.len(),
            actual.len()
        ));
    }
    None
}

fn describe_props(here: &str, expected: &ElementNode, actual: &ElementNode) -> String {
    let expected_names: Vec<_> = expected.props.keys().collect();
    let actual_names: Vec<_> = actual.props.keys().collect();
    if expected_names != actual_names {
        return format!("{here}: properties {expected_names:?} became {actual_names:?}");
    }
    for (name, value) in expected.props.iter() {
        let other = actual.props.get(name);
        if other != Some(value) {
            return format!(
                "{here}: property '{name}' {} became {}",
                show(Some(value)),
                show(other)
            );
        }
    }
    format!("{here}: properties differ")
}

fn show(value: Option<&PropValue>) -> String {
    match value {
        None => "(missing)".to_string(),
        Some(PropValue::Text(text)) => format!("{text:?}"),
        Some(PropValue::Style(style)) => {
            let entries: Vec<_> = style.iter().map(|(k, v)| format!("{k}: {v:?}")).collect();
            format!("{{ {} }}", entries.join(", "))
        }
    }
}

/// Convert `svg`, read the generated code back, and compare both trees and
/// the frame string.
pub fn check_round_trip(svg: &str, name: &str) -> CompareResult {
    let doc = match parse_document(svg) {
        Ok(doc) => doc,
        Err(e) => {
            return CompareResult::ParseError {
                details: format!("Failed to parse SVG: {e}"),
            };
        }
    };
    let view_box = ViewBoxValues::from_frame(&doc.original_view_box);
    let code = generate_component(&doc.elements, name, &view_box);
    let component = match parse_component(&code) {
        Ok(component) => component,
        Err(e) => {
            return CompareResult::ParseError {
                details: format!("Failed to read generated component: {e}"),
            };
        }
    };

    let expected_frame = view_box.to_string();
    if component.view_box != expected_frame {
        return CompareResult::ViewBoxMismatch {
            expected: expected_frame,
            actual: component.view_box,
        };
    }
    compare_trees(&doc.elements, &component.elements)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_trees_match() {
        let tree = vec![ElementNode::new("g").with_child(ElementNode::new("path").with_prop("d", "M0 0"))];
        assert!(compare_trees(&tree, &tree.clone()).is_match());
    }

    #[test]
    fn reports_first_differing_property() {
        let expected = vec![ElementNode::new("g").with_child(ElementNode::new("path").with_prop("d", "M0 0"))];
        let actual = vec![ElementNode::new("g").with_child(ElementNode::new("path").with_prop("d", "M1 1"))];
        assert_eq!(
            compare_trees(&expected, &actual),
            CompareResult::TreeMismatch {
                details: r#"/g[0]/path[0]: property 'd' "M0 0" became "M1 1""#.to_string()
            }
        );
    }

    #[test]
    fn reports_missing_children() {
        let expected = vec![ElementNode::new("path"), ElementNode::new("circle")];
        let actual = vec![ElementNode::new("path")];
        assert_eq!(
            compare_trees(&expected, &actual),
            CompareResult::TreeMismatch {
                details: "/: expected 2 children, found 1".to_string()
            }
        );
    }

    #[test]
    fn round_trip_of_nested_document() {
        let svg = r#"<svg viewBox="0 0 48 48">
            <g fill="none" style="stroke: red; stroke-width: 2">
                <path d="M4 4h40v40H4z"/>
                <circle cx="24" cy="24" r="8"/>
            </g>
        </svg>"#;
        assert_eq!(check_round_trip(svg, "Boxed"), CompareResult::Match);
    }

    #[test]
    fn round_trip_reports_unparseable_input() {
        assert!(matches!(
            check_round_trip("<svg>", "X"),
            CompareResult::ParseError { .. }
        ));
    }
}
