//! DOM abstraction traits for equation annotation.
//!
//! The annotation logic never touches a concrete DOM. Everything it needs
//! from the page goes through [`MathDom`], which the browser crate implements
//! over `web-sys` and the tests implement over an in-memory tree. This keeps
//! the structural assumptions about MathJax output in [`crate::renderer`]
//! and the platform plumbing out of the core entirely.

use crate::geometry::LineBox;

/// Error type for DOM operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomError(pub String);

impl std::fmt::Display for DomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for DomError {}

impl From<&str> for DomError {
    fn from(s: &str) -> Self {
        DomError(s.to_string())
    }
}

impl From<String> for DomError {
    fn from(s: String) -> Self {
        DomError(s)
    }
}

/// Read/write access to a rendered document.
///
/// All methods take `&self`: DOM handles are shared references into a tree
/// owned by the platform, and mutation happens through them the same way it
/// does in the browser. Only element nodes are ever exposed.
pub trait MathDom {
    /// Handle to an element. Equality must be node identity.
    type Node: Clone + PartialEq + std::fmt::Debug;

    /// Lower-case tag name of the element.
    fn tag_name(&self, node: &Self::Node) -> String;

    /// Parent element, if any.
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Element children in document order.
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str) -> Result<(), DomError>;

    fn remove_attribute(&self, node: &Self::Node, name: &str);

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    fn add_class(&self, node: &Self::Node, class: &str);

    /// Look up an element anywhere in the document by its `id`.
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// All descendants with the given (lower-case) tag, in document order.
    ///
    /// With `scope = None` the whole document is searched.
    fn descendants_by_tag(&self, scope: Option<&Self::Node>, tag: &str) -> Vec<Self::Node>;

    fn next_element_sibling(&self, node: &Self::Node) -> Option<Self::Node>;

    fn inner_html(&self, node: &Self::Node) -> String;

    /// Create a detached element.
    fn create_element(&self, tag: &str) -> Result<Self::Node, DomError>;

    fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<(), DomError>;

    /// Put `new_child` where `old_child` is, detaching `old_child`.
    fn replace_child(
        &self,
        parent: &Self::Node,
        new_child: &Self::Node,
        old_child: &Self::Node,
    ) -> Result<(), DomError>;

    fn set_style_property(
        &self,
        node: &Self::Node,
        property: &str,
        value: &str,
    ) -> Result<(), DomError>;

    /// Current layout box of the element relative to its offset parent.
    ///
    /// This is a layout read; callers keep it out of hot paths.
    fn layout_box(&self, node: &Self::Node) -> LineBox;

    /// Walk up from `node` (inclusive) until `pred` matches.
    fn find_ancestor(
        &self,
        node: &Self::Node,
        mut pred: impl FnMut(&Self::Node) -> bool,
    ) -> Option<Self::Node> {
        let mut current = Some(node.clone());
        while let Some(n) = current {
            if pred(&n) {
                return Some(n);
            }
            current = self.parent(&n);
        }
        None
    }
}
