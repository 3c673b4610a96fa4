//! Page-level entry point.

use std::cell::Cell;

use crate::annotation::annotation_lists;
use crate::binder::{BindReport, Binder};
use crate::config::PageConfig;
use crate::dom::MathDom;
use crate::links::strip_reference_links;
use crate::tooltip::TooltipBackend;

/// What one enhancement pass did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageReport {
    pub links_stripped: usize,
    pub lists: usize,
    pub annotations: BindReport,
}

/// Strip reference links, then bind every annotation list.
///
/// Must run after the math renderer has finished producing the DOM.
pub fn enhance_page<D, B>(dom: D, tooltips: B, config: &PageConfig) -> PageReport
where
    D: MathDom + Clone + 'static,
    D::Node: 'static,
    B: TooltipBackend<Node = D::Node> + Clone + 'static,
{
    let mut report = PageReport::default();

    match strip_reference_links(&dom) {
        Ok(stripped) => report.links_stripped = stripped,
        Err(error) => tracing::error!(%error, "failed to strip reference links"),
    }

    let lists = annotation_lists(&dom, &config.annotation_class);
    let mut binder = Binder::new(dom, tooltips, config.tooltip.clone());
    for (idx, list) in lists.iter().enumerate() {
        let style = config.style_for(idx);
        let list_report =
            binder.bind_annotation_list(list, style, &config.renderer.anchor_prefix);
        report.annotations.merge(list_report);
    }
    report.lists = lists.len();

    tracing::info!(
        links_stripped = report.links_stripped,
        lists = report.lists,
        bound = report.annotations.bound,
        failed = report.annotations.failed,
        "enhanced page"
    );
    report
}

/// One page view. Runs the enhancement at most once.
#[derive(Debug)]
pub struct PageSession {
    config: PageConfig,
    ran: Cell<bool>,
}

impl PageSession {
    pub fn new(config: PageConfig) -> Self {
        Self {
            config,
            ran: Cell::new(false),
        }
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn has_run(&self) -> bool {
        self.ran.get()
    }

    /// Enhance the page, or do nothing if this session already did.
    pub fn run<D, B>(&self, dom: D, tooltips: B) -> Option<PageReport>
    where
        D: MathDom + Clone + 'static,
        D::Node: 'static,
        B: TooltipBackend<Node = D::Node> + Clone + 'static,
    {
        if self.ran.replace(true) {
            tracing::debug!("page already enhanced");
            return None;
        }
        Some(enhance_page(dom, tooltips, &self.config))
    }
}
