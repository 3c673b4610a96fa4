//! eqnote-core: equation annotations for MathJax-rendered documents.
//!
//! This crate provides:
//! - `MathDom` trait for DOM access, so the logic runs against any tree
//! - `MathBlock` - adapter over MathJax output, mapping anchors to lines
//! - `HighlightRegistry` - memoized highlight regions over equation groups
//! - `Binder` - wiring annotation declarations to a `TooltipBackend`
//! - `strip_reference_links` and `enhance_page` for page setup

pub mod anchor;
pub mod annotation;
pub mod binder;
pub mod config;
pub mod dom;
pub mod error;
pub mod geometry;
pub mod highlight;
pub mod line_map;
pub mod links;
pub mod page;
pub mod renderer;
pub mod tooltip;

#[cfg(test)]
mod test_dom;

pub use anchor::{AnchorId, parse_target_list, region_marker_id};
pub use annotation::{AnnotationDeclaration, TARGET_IDS_ATTRIBUTE, annotation_lists, declarations};
pub use binder::{BindReport, Binder, TRIGGER_CLASS};
pub use config::{PageConfig, RendererSetup};
pub use dom::{DomError, MathDom};
pub use error::{AnnotateError, Result};
pub use geometry::{HighlightSpan, LineBox};
pub use highlight::{HighlightRegion, HighlightRegistry, RegionState};
pub use line_map::{AnchorIndex, EquationLineMap, StructuralAnomaly};
pub use links::strip_reference_links;
pub use page::{PageReport, PageSession, enhance_page};
pub use renderer::{BlockAnalysis, BlockLayout, MathBlock, analysis_report, locate_block_root};
pub use smol_str::SmolStr;
pub use tooltip::{
    TooltipBackend, TooltipCallback, TooltipConfig, TooltipMount, TooltipOptions, TooltipStyle,
};
