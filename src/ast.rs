//! Element tree types
//!
//! These types represent one parsed SVG document: generic element nodes with
//! normalized property maps, in document order.

use std::fmt;

/// One parsed graphical element and its subtree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementNode {
    /// Lower-cased tag name, prefix included (`path`, `sodipodi:namedview`)
    pub tag: String,
    pub props: Props,
    pub children: Vec<ElementNode>,
}

impl ElementNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            props: Props::default(),
            children: Vec::new(),
        }
    }

    pub fn with_prop(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.props.insert(name, value);
        self
    }

    pub fn with_child(mut self, child: ElementNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Number of nodes in this subtree, this one included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(ElementNode::node_count).sum::<usize>()
    }
}

/// A property value: plain text, or a parsed inline style
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropValue {
    Text(String),
    Style(StyleMap),
}

impl PropValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropValue::Text(s) => Some(s),
            PropValue::Style(_) => None,
        }
    }

    pub fn as_style(&self) -> Option<&StyleMap> {
        match self {
            PropValue::Style(map) => Some(map),
            PropValue::Text(_) => None,
        }
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        PropValue::Text(s.to_string())
    }
}

impl From<String> for PropValue {
    fn from(s: String) -> Self {
        PropValue::Text(s)
    }
}

impl From<StyleMap> for PropValue {
    fn from(map: StyleMap) -> Self {
        PropValue::Style(map)
    }
}

/// Insertion-ordered string map.
///
/// Re-inserting a key replaces its value but keeps its original position,
/// the way assigning to an existing object key does in JavaScript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<V>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = OrderedMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// Normalized style property name -> value
pub type StyleMap = OrderedMap<String>;

/// Normalized property name -> value
pub type Props = OrderedMap<PropValue>;

/// The output of one successful parse
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    pub elements: Vec<ElementNode>,
    /// The resolved frame string, exactly as resolved (`viewBox` verbatim or synthesized)
    pub original_view_box: String,
}

impl fmt::Display for ElementNode {
    /// Compact one-line outline, used in logs and mismatch reports.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        for (name, value) in self.props.iter() {
            match value {
                PropValue::Text(text) => write!(f, " {name}=\"{text}\"")?,
                PropValue::Style(map) => write!(f, " {name}=[{} decl]", map.len())?,
            }
        }
        if self.children.is_empty() {
            return write!(f, "/>");
        }
        write!(f, ">")?;
        for child in &self.children {
            write!(f, "{child}")?;
        }
        write!(f, "</{}>", self.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reinsert_keeps_position() {
        let mut map = StyleMap::new();
        map.insert("fill", "red");
        map.insert("stroke", "blue");
        map.insert("fill", "green");
        let entries: Vec<_> = map.iter().collect();
        assert_eq!(
            entries,
            vec![("fill", &"green".to_string()), ("stroke", &"blue".to_string())]
        );
    }

    #[test]
    fn node_count_includes_descendants() {
        let tree = ElementNode::new("g")
            .with_child(ElementNode::new("path"))
            .with_child(ElementNode::new("g").with_child(ElementNode::new("circle")));
        assert_eq!(tree.node_count(), 4);
        assert!(tree.has_children());
    }

    #[test]
    fn display_outline() {
        let node = ElementNode::new("g")
            .with_prop("fill", "none")
            .with_child(ElementNode::new("path").with_prop("d", "M0 0"));
        assert_eq!(node.to_string(), r#"<g fill="none"><path d="M0 0"/></g>"#);
    }
}
