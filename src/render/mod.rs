//! Rendering of element trees
//!
//! This module is organized into submodules:
//! - `jsx`: component source text
//! - `preview`: the live icon tree and its SVG markup
//!
//! Both walk the tree through [`render_elements`], so they see the same tags,
//! properties and sibling keys.

pub mod jsx;
pub mod preview;

pub use jsx::{GeneratorOptions, generate_component, generate_component_with};
pub use preview::{PreviewElement, PreviewIcon, render_preview};

use crate::ast::ElementNode;

/// Name of the icon wrapper component
pub const WRAPPER_TAG: &str = "SvgIcon";

/// Module the wrapper is imported from
pub const WRAPPER_MODULE: &str = "@mui/material";

/// Per-node callback of the shared traversal.
pub trait TreeVisitor<'a> {
    type Output;

    /// Called once per node, after its children have been visited.
    fn element(
        &mut self,
        node: &'a ElementNode,
        key: usize,
        depth: usize,
        children: Vec<Self::Output>,
    ) -> Self::Output;
}

/// Visit sibling elements in document order. Each gets its index among its
/// siblings as key; children are visited at `depth + 1`.
pub fn render_elements<'a, V: TreeVisitor<'a>>(
    visitor: &mut V,
    elements: &'a [ElementNode],
    depth: usize,
) -> Vec<V::Output> {
    let mut out = Vec::with_capacity(elements.len());
    for (key, node) in elements.iter().enumerate() {
        let children = render_elements(visitor, &node.children, depth + 1);
        out.push(visitor.element(node, key, depth, children));
    }
    out
}
