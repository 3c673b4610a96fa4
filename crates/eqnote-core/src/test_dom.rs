//! In-memory `MathDom` for unit tests, plus builders for MathJax-shaped
//! markup.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::dom::{DomError, MathDom};
use crate::geometry::LineBox;

#[derive(Debug, Default)]
struct Element {
    tag: String,
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    styles: BTreeMap<String, String>,
    parent: Option<usize>,
    children: Vec<usize>,
    text: String,
    layout: LineBox,
}

/// Arena-backed element tree. Node `0` is the document body.
#[derive(Clone, Debug)]
pub struct FakeDom {
    nodes: Rc<RefCell<Vec<Element>>>,
}

pub const BODY: usize = 0;

impl FakeDom {
    pub fn new() -> Self {
        let body = Element {
            tag: "body".into(),
            ..Default::default()
        };
        Self {
            nodes: Rc::new(RefCell::new(vec![body])),
        }
    }

    /// Create an element and append it to `parent`.
    pub fn add(&self, parent: usize, tag: &str) -> usize {
        let child = self.create_element(tag).unwrap();
        self.append_child(&parent, &child).unwrap();
        child
    }

    pub fn add_with_id(&self, parent: usize, tag: &str, id: &str) -> usize {
        let child = self.add(parent, tag);
        self.set_attribute(&child, "id", id).unwrap();
        child
    }

    pub fn set_text(&self, node: usize, text: &str) {
        self.nodes.borrow_mut()[node].text = text.to_string();
    }

    pub fn set_layout(&self, node: usize, layout: LineBox) {
        self.nodes.borrow_mut()[node].layout = layout;
    }

    pub fn style(&self, node: usize, property: &str) -> Option<String> {
        self.nodes.borrow()[node].styles.get(property).cloned()
    }

    /// Indented outline of the tree under `node`, for structural asserts.
    pub fn outline(&self, node: usize) -> String {
        let mut out = String::new();
        self.outline_into(node, 0, &mut out);
        out
    }

    fn outline_into(&self, node: usize, depth: usize, out: &mut String) {
        let nodes = self.nodes.borrow();
        let el = &nodes[node];
        out.push_str(&"  ".repeat(depth));
        out.push_str(&el.tag);
        if !el.classes.is_empty() {
            out.push('.');
            out.push_str(&el.classes.join("."));
        }
        for (name, value) in &el.attributes {
            out.push_str(&format!(" {name}={value:?}"));
        }
        out.push('\n');
        let children = el.children.clone();
        drop(nodes);
        for child in children {
            self.outline_into(child, depth + 1, out);
        }
    }

    fn collect_by_tag(&self, node: usize, tag: &str, out: &mut Vec<usize>) {
        let children = self.nodes.borrow()[node].children.clone();
        for child in children {
            if self.nodes.borrow()[child].tag == tag {
                out.push(child);
            }
            self.collect_by_tag(child, tag, out);
        }
    }

    fn detach(&self, node: usize) {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(parent) = nodes[node].parent.take() {
            nodes[parent].children.retain(|c| *c != node);
        }
    }
}

impl MathDom for FakeDom {
    type Node = usize;

    fn tag_name(&self, node: &usize) -> String {
        self.nodes.borrow()[*node].tag.clone()
    }

    fn parent(&self, node: &usize) -> Option<usize> {
        self.nodes.borrow()[*node].parent
    }

    fn children(&self, node: &usize) -> Vec<usize> {
        self.nodes.borrow()[*node].children.clone()
    }

    fn attribute(&self, node: &usize, name: &str) -> Option<String> {
        self.nodes.borrow()[*node].attributes.get(name).cloned()
    }

    fn set_attribute(&self, node: &usize, name: &str, value: &str) -> Result<(), DomError> {
        self.nodes.borrow_mut()[*node]
            .attributes
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn remove_attribute(&self, node: &usize, name: &str) {
        self.nodes.borrow_mut()[*node].attributes.remove(name);
    }

    fn has_class(&self, node: &usize, class: &str) -> bool {
        self.nodes.borrow()[*node].classes.iter().any(|c| c == class)
    }

    fn add_class(&self, node: &usize, class: &str) {
        if !self.has_class(node, class) {
            self.nodes.borrow_mut()[*node].classes.push(class.to_string());
        }
    }

    fn element_by_id(&self, id: &str) -> Option<usize> {
        let mut all = Vec::new();
        self.collect_all(BODY, &mut all);
        all.into_iter()
            .find(|n| self.attribute(n, "id").as_deref() == Some(id))
    }

    fn descendants_by_tag(&self, scope: Option<&usize>, tag: &str) -> Vec<usize> {
        let mut out = Vec::new();
        self.collect_by_tag(scope.copied().unwrap_or(BODY), tag, &mut out);
        out
    }

    fn next_element_sibling(&self, node: &usize) -> Option<usize> {
        let parent = self.parent(node)?;
        let siblings = self.children(&parent);
        let pos = siblings.iter().position(|s| s == node)?;
        siblings.get(pos + 1).copied()
    }

    fn inner_html(&self, node: &usize) -> String {
        self.nodes.borrow()[*node].text.clone()
    }

    fn create_element(&self, tag: &str) -> Result<usize, DomError> {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(Element {
            tag: tag.to_string(),
            ..Default::default()
        });
        Ok(nodes.len() - 1)
    }

    fn append_child(&self, parent: &usize, child: &usize) -> Result<(), DomError> {
        self.detach(*child);
        let mut nodes = self.nodes.borrow_mut();
        nodes[*child].parent = Some(*parent);
        nodes[*parent].children.push(*child);
        Ok(())
    }

    fn replace_child(
        &self,
        parent: &usize,
        new_child: &usize,
        old_child: &usize,
    ) -> Result<(), DomError> {
        self.detach(*new_child);
        let pos = self
            .children(parent)
            .iter()
            .position(|c| c == old_child)
            .ok_or_else(|| DomError::from("node is not a child of parent"))?;
        let mut nodes = self.nodes.borrow_mut();
        nodes[*parent].children[pos] = *new_child;
        nodes[*new_child].parent = Some(*parent);
        nodes[*old_child].parent = None;
        Ok(())
    }

    fn set_style_property(
        &self,
        node: &usize,
        property: &str,
        value: &str,
    ) -> Result<(), DomError> {
        self.nodes.borrow_mut()[*node]
            .styles
            .insert(property.to_string(), value.to_string());
        Ok(())
    }

    fn layout_box(&self, node: &usize) -> LineBox {
        self.nodes.borrow()[*node].layout
    }
}

impl FakeDom {
    fn collect_all(&self, node: usize, out: &mut Vec<usize>) {
        let children = self.nodes.borrow()[node].children.clone();
        for child in children {
            out.push(child);
            self.collect_all(child, out);
        }
    }
}

/// Handles into a MathJax block built by [`mathjax_block`].
pub struct BuiltBlock {
    pub root: usize,
    pub lines: Vec<usize>,
    pub anchors: Vec<usize>,
}

/// Build a tabular MathJax block under `parent`.
///
/// `labels[i]` is the label of line `i`, if it is numbered. Each line gets
/// a 20px tall layout box stacked from the top. With `with_labels = false`
/// the `mjx-labels` sub-tree is omitted entirely.
pub fn mathjax_block(
    dom: &FakeDom,
    parent: usize,
    labels: &[Option<&str>],
    with_labels: bool,
) -> BuiltBlock {
    let root = dom.add(parent, "mjx-container");
    let math = dom.add(root, "mjx-math");
    dom.add(root, "mjx-assistive-mml");
    let mtable = dom.add(math, "mjx-mtable");
    let table = dom.add(mtable, "mjx-table");
    let itable = dom.add(table, "mjx-itable");

    let mut lines = Vec::new();
    for (idx, label) in labels.iter().enumerate() {
        let tag = if label.is_some() { "mjx-mlabeledtr" } else { "mjx-mtr" };
        let line = dom.add(itable, tag);
        dom.set_layout(line, LineBox::new(idx as f64 * 20.0, 20.0));
        lines.push(line);
    }

    let mut anchors = Vec::new();
    if with_labels {
        let labels_root = dom.add(mtable, "mjx-labels");
        let label_table = dom.add(labels_root, "mjx-itable");
        for label in labels.iter().flatten() {
            let row = dom.add(label_table, "mjx-mtr");
            anchors.push(dom.add_with_id(row, "mjx-mtd", &format!("mjx-eqn-{label}")));
        }
    }

    BuiltBlock {
        root,
        lines,
        anchors,
    }
}

/// Build a single-equation block with no table.
pub fn single_equation_block(dom: &FakeDom, parent: usize) -> usize {
    let root = dom.add(parent, "mjx-container");
    let math = dom.add(root, "mjx-math");
    dom.add(math, "mjx-mi");
    dom.add(root, "mjx-assistive-mml");
    root
}

/// Build `dl.mathjax-code-annotation` with one `dt`/`dd` pair per entry.
pub fn annotation_list(
    dom: &FakeDom,
    parent: usize,
    entries: &[(&str, &str)],
) -> (usize, Vec<usize>) {
    let dl = dom.add(parent, "dl");
    dom.add_class(&dl, "mathjax-code-annotation");
    let mut terms = Vec::new();
    for (targets, body) in entries {
        let dt = dom.add(dl, "dt");
        dom.set_attribute(&dt, "data-annotation-target-ids", targets)
            .unwrap();
        let dd = dom.add(dl, "dd");
        dom.set_text(dd, body);
        terms.push(dt);
    }
    (dl, terms)
}
