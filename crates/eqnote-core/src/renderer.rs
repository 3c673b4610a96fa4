//! Adapter over MathJax CHTML output.
//!
//! Every structural assumption about the renderer's DOM lives here. A
//! rendered display equation looks like this:
//!
//! ```text
//! mjx-container                    <- block root
//! ├── mjx-math                     <- content root
//! │   └── mjx-mtable               <- only for multi-line / tagged displays
//! │       ├── mjx-table
//! │       │   └── mjx-itable       <- line container
//! │       │       ├── mjx-mtr          (plain line)
//! │       │       └── mjx-mlabeledtr   (numbered line)
//! │       └── mjx-labels
//! │           └── mjx-itable
//! │               └── mjx-mtr > mjx-mtd#mjx-eqn-...   (one per numbered line)
//! └── mjx-assistive-mml            <- assistive root
//! ```
//!
//! A renderer upgrade that changes this shape should only need changes in
//! this module.

use serde::Serialize;

use crate::anchor::AnchorId;
use crate::dom::MathDom;
use crate::error::{AnnotateError, Result};
use crate::line_map::{AnchorIndex, EquationLineMap};

/// Root element of one rendered math block.
pub const BLOCK_ROOT_TAG: &str = "mjx-container";
/// Table wrapper used for multi-line and tagged displays.
pub const TABLE_TAG: &str = "mjx-mtable";
/// Container of the equation-number cells.
pub const LABELS_TAG: &str = "mjx-labels";
/// A line carrying an equation number.
pub const LABELED_ROW_TAG: &str = "mjx-mlabeledtr";
/// Cell holding an equation anchor id.
pub const ANCHOR_CELL_TAG: &str = "mjx-mtd";
/// Row element produced for `\ref` and `\eqref`.
pub const REFERENCE_TAG: &str = "mjx-mrow";
/// Class marking a reference row.
pub const REFERENCE_CLASS: &str = "MathJax_ref";

/// Walk up from any node inside a rendered block to the block root.
pub fn locate_block_root<D: MathDom>(dom: &D, node: &D::Node) -> Result<D::Node> {
    dom.find_ancestor(node, |n| dom.tag_name(n) == BLOCK_ROOT_TAG)
        .ok_or_else(|| AnnotateError::not_found("math block root", dom.tag_name(node)))
}

/// Lines of a tabular block and the anchors of its numbered lines.
#[derive(Clone, Debug)]
pub struct TableLayout<N> {
    /// Row elements in document order.
    pub lines: Vec<N>,
    /// Anchor ids of numbered lines; `None` when the block has no labels
    /// sub-structure at all.
    pub anchors: Option<AnchorIndex>,
}

/// How a block's content is laid out.
#[derive(Clone, Debug)]
pub enum BlockLayout<N> {
    /// A single unlabeled equation without table structure.
    Single,
    Table(TableLayout<N>),
}

/// A rendered math block with its equation-to-lines map.
#[derive(Clone, Debug)]
pub struct MathBlock<N> {
    pub root: N,
    pub content_root: N,
    pub assistive_root: Option<N>,
    pub layout: BlockLayout<N>,
    pub line_map: EquationLineMap,
}

impl<N: Clone + PartialEq> MathBlock<N> {
    /// Read a block from its root element and build its line map.
    pub fn read<D: MathDom<Node = N>>(dom: &D, root: &N) -> Result<Self> {
        let children = dom.children(root);
        let content_root = children
            .first()
            .cloned()
            .ok_or_else(|| AnnotateError::not_found("math content root", BLOCK_ROOT_TAG))?;
        let assistive_root = children.get(1).cloned();

        let table = dom
            .children(&content_root)
            .into_iter()
            .next()
            .filter(|first| dom.tag_name(first) == TABLE_TAG);

        let Some(table) = table else {
            return Ok(Self {
                root: root.clone(),
                content_root,
                assistive_root,
                layout: BlockLayout::Single,
                line_map: EquationLineMap::single_line(),
            });
        };

        let lines = table_lines(dom, &table)?;
        let labels = dom
            .descendants_by_tag(Some(&content_root), LABELS_TAG)
            .into_iter()
            .next();

        let (line_map, anchors) = match labels {
            Some(labels) => {
                let ids = dom
                    .descendants_by_tag(Some(&labels), ANCHOR_CELL_TAG)
                    .iter()
                    .filter_map(|cell| dom.attribute(cell, "id"))
                    .filter(|id| !id.is_empty())
                    .map(AnchorId::new)
                    .collect();
                let map = EquationLineMap::from_labels(
                    lines.iter().map(|line| dom.tag_name(line) == LABELED_ROW_TAG),
                );
                (map, Some(AnchorIndex::new(ids)))
            }
            None => (
                EquationLineMap::from_labels(lines.iter().map(|_| false)),
                None,
            ),
        };

        tracing::debug!(
            num_lines = lines.len(),
            num_eqn = line_map.num_equations(),
            num_eqn_tags = anchors.as_ref().map_or(0, AnchorIndex::len),
            "read math block"
        );

        Ok(Self {
            root: root.clone(),
            content_root,
            assistive_root,
            layout: BlockLayout::Table(TableLayout { lines, anchors }),
            line_map,
        })
    }

    /// Row elements of the block; empty for single-equation blocks.
    pub fn lines(&self) -> &[N] {
        match &self.layout {
            BlockLayout::Single => &[],
            BlockLayout::Table(table) => &table.lines,
        }
    }

    pub fn anchors(&self) -> Option<&AnchorIndex> {
        match &self.layout {
            BlockLayout::Single => None,
            BlockLayout::Table(table) => table.anchors.as_ref(),
        }
    }

    pub fn num_lines(&self) -> usize {
        self.line_map.num_lines()
    }

    pub fn num_eqn_tags(&self) -> usize {
        self.anchors().map_or(0, AnchorIndex::len)
    }

    /// Line indices of the equation tagged `id`, if it is in this block.
    pub fn lines_for(&self, id: &AnchorId) -> Option<&[usize]> {
        self.anchors()?.lines_for(&self.line_map, id)
    }

    /// Anchor ids of this block as plain strings, for error messages.
    pub fn anchor_names(&self) -> Vec<String> {
        self.anchors()
            .map(|index| index.ids().iter().map(ToString::to_string).collect())
            .unwrap_or_default()
    }

    pub fn analysis(&self) -> BlockAnalysis {
        BlockAnalysis {
            num_lines: self.num_lines(),
            num_eqn_tags: self.num_eqn_tags(),
            num_eqn: self.line_map.num_equations(),
            ids: self
                .anchors()
                .map(|index| index.ids().to_vec())
                .unwrap_or_default(),
            eqn_to_line_map: self.line_map.groups().to_vec(),
            anomalous: self.line_map.anomaly().is_some(),
        }
    }
}

/// `mjx-mtable > mjx-table > mjx-itable > rows`
fn table_lines<D: MathDom>(dom: &D, table: &D::Node) -> Result<Vec<D::Node>> {
    let grid = dom
        .children(table)
        .into_iter()
        .next()
        .ok_or_else(|| AnnotateError::not_found("math table body", TABLE_TAG))?;
    let Some(container) = dom.children(&grid).into_iter().next() else {
        return Ok(Vec::new());
    };
    Ok(dom.children(&container))
}

/// Summary of one block, as printed by [`analysis_report`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockAnalysis {
    pub num_lines: usize,
    pub num_eqn_tags: usize,
    pub num_eqn: usize,
    pub ids: Vec<AnchorId>,
    pub eqn_to_line_map: Vec<Vec<usize>>,
    pub anomalous: bool,
}

/// Analyze every math block in the document.
///
/// Blocks that cannot be read are logged and skipped.
pub fn analysis_report<D: MathDom>(dom: &D) -> Vec<BlockAnalysis> {
    let roots = dom.descendants_by_tag(None, BLOCK_ROOT_TAG);
    tracing::info!(count = roots.len(), "found math roots");

    roots
        .iter()
        .enumerate()
        .filter_map(|(idx, root)| match MathBlock::read(dom, root) {
            Ok(block) => {
                let analysis = block.analysis();
                tracing::debug!(idx, ?analysis, "analyzed math root");
                Some(analysis)
            }
            Err(error) => {
                tracing::warn!(idx, %error, "failed to analyze math root");
                None
            }
        })
        .collect()
}
