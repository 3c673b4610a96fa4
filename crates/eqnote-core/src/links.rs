//! Removing hyperlinks from equation references.
//!
//! MathJax renders `\ref` and `\eqref` as an `mjx-mrow.MathJax_ref` wrapped
//! in an `<a href="#...">`, and makes the surrounding container focusable.
//! With annotations the numbers become tooltip triggers instead, so the
//! link and the stale `tabindex` are removed.

use crate::dom::{DomError, MathDom};
use crate::renderer::{REFERENCE_CLASS, REFERENCE_TAG};

/// Unwrap every reference row from its link. Returns how many links were
/// removed; a second run removes none.
pub fn strip_reference_links<D: MathDom>(dom: &D) -> Result<usize, DomError> {
    let mut stripped = 0;
    for reference in dom.descendants_by_tag(None, REFERENCE_TAG) {
        if !dom.has_class(&reference, REFERENCE_CLASS) {
            continue;
        }

        if let Some(link) = dom.parent(&reference).filter(|p| dom.tag_name(p) == "a") {
            if let Some(link_parent) = dom.parent(&link) {
                dom.replace_child(&link_parent, &reference, &link)?;
                stripped += 1;
            }
        }

        if let Some(container) = dom.parent(&reference).and_then(|p| dom.parent(&p)) {
            dom.remove_attribute(&container, "tabindex");
        }
    }

    tracing::debug!(stripped, "removed equation reference links");
    Ok(stripped)
}
