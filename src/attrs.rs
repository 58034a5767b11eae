//! Attribute normalization
//!
//! Turns markup attributes into component properties: kebab-case names become
//! camelCase and `style` declarations become a [`StyleMap`].

use std::sync::LazyLock;

use regex_lite::{Captures, Regex};

use crate::ast::{PropValue, StyleMap};

static HYPHEN_LETTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-([a-z])").unwrap());

/// `stroke-width` -> `strokeWidth`. Only a hyphen followed by a lowercase
/// ASCII letter is folded; anything else is left alone.
pub fn camel_case(name: &str) -> String {
    HYPHEN_LETTER
        .replace_all(name, |caps: &Captures<'_>| caps[1].to_ascii_uppercase())
        .into_owned()
}

/// Parse a `style` attribute value into a style map.
///
/// Declarations are split on `;`, then on the first `:`. Declarations missing
/// a name or a value are dropped.
pub fn parse_style(declarations: &str) -> StyleMap {
    let mut map = StyleMap::new();
    for declaration in declarations.split(';') {
        let Some((property, value)) = declaration.split_once(':') else {
            continue;
        };
        let (property, value) = (property.trim(), value.trim());
        if property.is_empty() || value.is_empty() {
            continue;
        }
        map.insert(camel_case(property), value);
    }
    map
}

/// Normalize one attribute into a property name and value.
pub fn normalize_attribute(name: &str, value: &str) -> (String, PropValue) {
    if name == "style" {
        return (name.to_string(), PropValue::Style(parse_style(value)));
    }
    (camel_case(name), PropValue::Text(value.to_string()))
}
