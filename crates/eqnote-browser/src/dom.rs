//! `MathDom` over the live browser document.

use eqnote_core::{DomError, LineBox, MathDom};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlCollection, HtmlElement};

/// Convert a thrown JS value into a `DomError`.
pub(crate) fn js_error(value: JsValue) -> DomError {
    match value.as_string() {
        Some(message) => DomError(message),
        None => DomError(format!("{:?}", value)),
    }
}

fn collect(collection: &HtmlCollection) -> Vec<Element> {
    (0..collection.length())
        .filter_map(|i| collection.item(i))
        .collect()
}

/// Browser-based DOM access.
///
/// Holds the document handle; cloning is cheap.
#[derive(Clone, Debug)]
pub struct BrowserDom {
    document: Document,
}

impl BrowserDom {
    /// DOM access for the current page's document.
    pub fn current() -> Self {
        Self::new(gloo_utils::document())
    }

    pub fn new(document: Document) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

impl MathDom for BrowserDom {
    type Node = Element;

    fn tag_name(&self, node: &Element) -> String {
        // HTML documents report upper-case names, custom elements included.
        node.tag_name().to_ascii_lowercase()
    }

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn children(&self, node: &Element) -> Vec<Element> {
        collect(&node.children())
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&self, node: &Element, name: &str, value: &str) -> Result<(), DomError> {
        node.set_attribute(name, value).map_err(js_error)
    }

    fn remove_attribute(&self, node: &Element, name: &str) {
        let _ = node.remove_attribute(name);
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn add_class(&self, node: &Element, class: &str) {
        let _ = node.class_list().add_1(class);
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn descendants_by_tag(&self, scope: Option<&Element>, tag: &str) -> Vec<Element> {
        let collection = match scope {
            Some(scope) => scope.get_elements_by_tag_name(tag),
            None => self.document.get_elements_by_tag_name(tag),
        };
        collect(&collection)
    }

    fn next_element_sibling(&self, node: &Element) -> Option<Element> {
        node.next_element_sibling()
    }

    fn inner_html(&self, node: &Element) -> String {
        node.inner_html()
    }

    fn create_element(&self, tag: &str) -> Result<Element, DomError> {
        self.document.create_element(tag).map_err(js_error)
    }

    fn append_child(&self, parent: &Element, child: &Element) -> Result<(), DomError> {
        parent.append_child(child).map(|_| ()).map_err(js_error)
    }

    fn replace_child(
        &self,
        parent: &Element,
        new_child: &Element,
        old_child: &Element,
    ) -> Result<(), DomError> {
        parent
            .replace_child(new_child, old_child)
            .map(|_| ())
            .map_err(js_error)
    }

    fn set_style_property(
        &self,
        node: &Element,
        property: &str,
        value: &str,
    ) -> Result<(), DomError> {
        let element = node
            .dyn_ref::<HtmlElement>()
            .ok_or_else(|| DomError::from("element has no inline style"))?;
        element
            .style()
            .set_property(property, value)
            .map_err(js_error)
    }

    fn layout_box(&self, node: &Element) -> LineBox {
        match node.dyn_ref::<HtmlElement>() {
            Some(element) => LineBox::new(
                f64::from(element.offset_top()),
                f64::from(element.offset_height()),
            ),
            None => {
                tracing::warn!(tag = %node.tag_name(), "no layout box for non-HTML element");
                LineBox::default()
            }
        }
    }
}
