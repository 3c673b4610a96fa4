//! Highlight regions over groups of equation lines.
//!
//! A region is a `div.mjx_eqn_highlight` appended to the block root and
//! positioned with two CSS custom properties. It is created once per
//! ordered list of target ids and then only toggled:
//!
//! ```text
//!   Inactive --activate()--> Active --deactivate()--> Inactive
//! ```
//!
//! `activate` re-measures the lines first, since layout may have shifted
//! since the region was created.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use smol_str::SmolStr;

use crate::anchor::{AnchorId, region_marker_id};
use crate::dom::{DomError, MathDom};
use crate::error::{AnnotateError, Result};
use crate::geometry::{HEIGHT_PROPERTY, HighlightSpan, TOP_PROPERTY};
use crate::renderer::{MathBlock, locate_block_root};

/// Class of the highlight element.
pub const HIGHLIGHT_CLASS: &str = "mjx_eqn_highlight";
/// Attribute set to [`ACTIVE_STATUS`] while the owning tooltip is shown.
pub const STATUS_ATTRIBUTE: &str = "data-status";
pub const ACTIVE_STATUS: &str = "active";

#[derive(Clone, Debug, Copy, PartialEq, Eq, Default)]
pub enum RegionState {
    #[default]
    Inactive,
    Active,
}

/// A highlight over the union of one or more equation groups.
#[derive(Debug)]
pub struct HighlightRegion<N> {
    marker_id: SmolStr,
    element: N,
    block_root: N,
    /// Line elements covered, in index order.
    lines: Vec<N>,
    line_indices: Vec<usize>,
    state: Cell<RegionState>,
}

impl<N: Clone + PartialEq + std::fmt::Debug> HighlightRegion<N> {
    pub fn marker_id(&self) -> &str {
        &self.marker_id
    }

    pub fn element(&self) -> &N {
        &self.element
    }

    pub fn block_root(&self) -> &N {
        &self.block_root
    }

    /// Indices of the covered lines, sorted and deduplicated.
    pub fn line_indices(&self) -> &[usize] {
        &self.line_indices
    }

    pub fn state(&self) -> RegionState {
        self.state.get()
    }

    /// Measure the covered lines against the current layout and write the
    /// resulting span to the element.
    pub fn remeasure<D: MathDom<Node = N>>(
        &self,
        dom: &D,
    ) -> Result<Option<HighlightSpan>, DomError> {
        let span = HighlightSpan::covering(self.lines.iter().map(|line| dom.layout_box(line)));
        if let Some(span) = span {
            dom.set_style_property(&self.element, TOP_PROPERTY, &span.top_css())?;
            dom.set_style_property(&self.element, HEIGHT_PROPERTY, &span.height_css())?;
        }
        Ok(span)
    }

    /// `Inactive -> Active`. Re-measures before marking the region active.
    pub fn activate<D: MathDom<Node = N>>(&self, dom: &D) -> Result<(), DomError> {
        self.remeasure(dom)?;
        dom.set_attribute(&self.element, STATUS_ATTRIBUTE, ACTIVE_STATUS)?;
        self.state.set(RegionState::Active);
        Ok(())
    }

    /// `Active -> Inactive`.
    pub fn deactivate<D: MathDom<Node = N>>(&self, dom: &D) {
        dom.remove_attribute(&self.element, STATUS_ATTRIBUTE);
        self.state.set(RegionState::Inactive);
    }
}

/// Page-lifetime memo of highlight regions and parsed blocks.
#[derive(Debug)]
pub struct HighlightRegistry<N> {
    regions: HashMap<SmolStr, Rc<HighlightRegion<N>>>,
    /// Blocks already read, keyed by root. Pages have few blocks, so a
    /// linear scan is fine.
    blocks: Vec<Rc<MathBlock<N>>>,
}

impl<N> Default for HighlightRegistry<N> {
    fn default() -> Self {
        Self {
            regions: HashMap::new(),
            blocks: Vec::new(),
        }
    }
}

impl<N: Clone + PartialEq + std::fmt::Debug> HighlightRegistry<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Block containing `root`, reading it on first use.
    pub fn block<D: MathDom<Node = N>>(&mut self, dom: &D, root: &N) -> Result<Rc<MathBlock<N>>> {
        if let Some(block) = self.blocks.iter().find(|b| &b.root == root) {
            return Ok(Rc::clone(block));
        }
        let block = Rc::new(MathBlock::read(dom, root)?);
        self.blocks.push(Rc::clone(&block));
        Ok(block)
    }

    /// Region highlighting the equations tagged `ids`.
    ///
    /// All ids must belong to the block of the first one. The same ordered
    /// list always returns the same region.
    pub fn resolve<D: MathDom<Node = N>>(
        &mut self,
        dom: &D,
        ids: &[AnchorId],
    ) -> Result<Rc<HighlightRegion<N>>> {
        let first = ids.first().ok_or(AnnotateError::NoTargets)?;
        let marker_id = region_marker_id(ids);
        if let Some(region) = self.regions.get(&marker_id) {
            return Ok(Rc::clone(region));
        }

        let anchor = dom
            .element_by_id(first.as_str())
            .ok_or_else(|| AnnotateError::not_found("equation anchor", first.as_str()))?;
        // An element with the id but outside any block is in no block's map.
        let root = locate_block_root(dom, &anchor).map_err(|_| AnnotateError::MissingTarget {
            id: first.clone(),
            available: Vec::new(),
        })?;
        let block = self.block(dom, &root)?;

        let mut line_indices = Vec::new();
        for id in ids {
            let Some(lines) = block.lines_for(id) else {
                return Err(self.unresolved(dom, &block, id, first));
            };
            line_indices.extend_from_slice(lines);
        }
        line_indices.sort_unstable();
        line_indices.dedup();

        let lines = line_indices
            .iter()
            .filter_map(|idx| block.lines().get(*idx).cloned())
            .collect();

        // A previous session may already have put the element in the page.
        let element = match dom.element_by_id(&marker_id) {
            Some(existing) => existing,
            None => {
                let element = dom.create_element("div")?;
                dom.set_attribute(&element, "id", &marker_id)?;
                dom.add_class(&element, HIGHLIGHT_CLASS);
                dom.append_child(&root, &element)?;
                element
            }
        };

        let region = Rc::new(HighlightRegion {
            marker_id: marker_id.clone(),
            element,
            block_root: root,
            lines,
            line_indices,
            state: Cell::new(RegionState::Inactive),
        });
        region.remeasure(dom)?;

        tracing::debug!(
            marker_id = %marker_id,
            lines = ?region.line_indices,
            "created equation highlight"
        );
        self.regions.insert(marker_id, Rc::clone(&region));
        Ok(region)
    }

    fn unresolved<D: MathDom<Node = N>>(
        &self,
        dom: &D,
        block: &MathBlock<N>,
        id: &AnchorId,
        first: &AnchorId,
    ) -> AnnotateError {
        let elsewhere = dom
            .element_by_id(id.as_str())
            .and_then(|anchor| locate_block_root(dom, &anchor).ok())
            .is_some_and(|other_root| other_root != block.root);
        if elsewhere {
            AnnotateError::CrossBlock {
                id: id.clone(),
                first: first.clone(),
            }
        } else {
            AnnotateError::MissingTarget {
                id: id.clone(),
                available: block.anchor_names(),
            }
        }
    }
}
