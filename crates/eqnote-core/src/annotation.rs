//! Annotation declarations.
//!
//! Authors annotate equations with a definition list:
//!
//! ```html
//! <dl class="mathjax-code-annotation">
//!   <dt data-annotation-target-ids="eq:energy;eq:momentum">Conservation</dt>
//!   <dd>Both quantities are conserved because ...</dd>
//! </dl>
//! ```
//!
//! Each `dt` names its target equations by label; the following sibling
//! holds the explanation shown in the tooltip.

use crate::anchor::{AnchorId, parse_target_list};
use crate::dom::MathDom;

/// Attribute on a `dt` listing `;`-separated equation labels.
pub const TARGET_IDS_ATTRIBUTE: &str = "data-annotation-target-ids";
/// Tag of a declaration term.
pub const TERM_TAG: &str = "dt";
/// Tag of an annotation list.
pub const LIST_TAG: &str = "dl";

/// One `dt` and what it points at.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotationDeclaration<N> {
    pub term: N,
    /// Explanatory content, the `dt`'s next element sibling.
    pub body: Option<N>,
    /// Anchor ids in the order the author listed them.
    pub targets: Vec<AnchorId>,
}

impl<N: Clone> AnnotationDeclaration<N> {
    /// Read a declaration from a `dt` element.
    pub fn read<D: MathDom<Node = N>>(dom: &D, term: &N, anchor_prefix: &str) -> Self {
        let targets = dom
            .attribute(term, TARGET_IDS_ATTRIBUTE)
            .map(|raw| {
                parse_target_list(&raw)
                    .into_iter()
                    .map(|label| AnchorId::from_label(anchor_prefix, label))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            term: term.clone(),
            body: dom.next_element_sibling(term),
            targets,
        }
    }

    /// HTML of the explanatory body, if there is one.
    pub fn body_html<D: MathDom<Node = N>>(&self, dom: &D) -> Option<String> {
        self.body.as_ref().map(|body| dom.inner_html(body))
    }
}

/// Every annotation list on the page, in document order.
pub fn annotation_lists<D: MathDom>(dom: &D, class: &str) -> Vec<D::Node> {
    dom.descendants_by_tag(None, LIST_TAG)
        .into_iter()
        .filter(|dl| dom.has_class(dl, class))
        .collect()
}

/// Declarations of one annotation list.
pub fn declarations<D: MathDom>(
    dom: &D,
    list: &D::Node,
    anchor_prefix: &str,
) -> Vec<AnnotationDeclaration<D::Node>> {
    dom.descendants_by_tag(Some(list), TERM_TAG)
        .iter()
        .map(|term| AnnotationDeclaration::read(dom, term, anchor_prefix))
        .collect()
}
