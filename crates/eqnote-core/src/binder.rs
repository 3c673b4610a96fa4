//! Binding annotation declarations to interactive highlights.

use std::rc::Rc;

use crate::annotation::{AnnotationDeclaration, declarations};
use crate::dom::MathDom;
use crate::error::{AnnotateError, Result};
use crate::highlight::{HighlightRegion, HighlightRegistry};
use crate::tooltip::{TooltipBackend, TooltipConfig, TooltipMount, TooltipOptions, TooltipStyle};

/// Class added to every trigger element.
pub const TRIGGER_CLASS: &str = "mathjax-code-annotation-trigger";

/// Outcome of binding one annotation list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BindReport {
    pub bound: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl BindReport {
    pub fn merge(&mut self, other: BindReport) {
        self.bound += other.bound;
        self.failed += other.failed;
        self.skipped += other.skipped;
    }
}

/// Shared state for binding declarations on one page.
pub struct Binder<D: MathDom, B> {
    dom: D,
    tooltips: B,
    registry: HighlightRegistry<D::Node>,
    config: TooltipConfig,
}

impl<D, B> Binder<D, B>
where
    D: MathDom + Clone + 'static,
    D::Node: 'static,
    B: TooltipBackend<Node = D::Node> + Clone + 'static,
{
    pub fn new(dom: D, tooltips: B, config: TooltipConfig) -> Self {
        Self {
            dom,
            tooltips,
            registry: HighlightRegistry::new(),
            config,
        }
    }

    pub fn registry(&self) -> &HighlightRegistry<D::Node> {
        &self.registry
    }

    /// Resolve a declaration's targets and attach its tooltip.
    pub fn bind_annotation(
        &mut self,
        decl: &AnnotationDeclaration<D::Node>,
        style: TooltipStyle,
    ) -> Result<Rc<HighlightRegion<D::Node>>> {
        let region = self.registry.resolve(&self.dom, &decl.targets)?;

        let (triggers, content, attach_to) = match style {
            TooltipStyle::Bottom => (vec![decl.term.clone()], None, decl.term.clone()),
            TooltipStyle::Side => {
                let triggers = decl
                    .targets
                    .iter()
                    .map(|id| {
                        self.dom
                            .element_by_id(id.as_str())
                            .ok_or_else(|| {
                                AnnotateError::not_found("equation anchor", id.as_str())
                            })
                    })
                    .collect::<Result<Vec<_>>>()?;
                (
                    triggers,
                    decl.body_html(&self.dom),
                    region.element().clone(),
                )
            }
        };

        let on_show = {
            let dom = self.dom.clone();
            let tooltips = self.tooltips.clone();
            let region = Rc::clone(&region);
            Box::new(move || {
                tooltips.hide_all();
                if let Err(error) = region.activate(&dom) {
                    tracing::warn!(
                        marker_id = region.marker_id(),
                        %error,
                        "failed to activate highlight"
                    );
                }
            })
        };
        let on_hide = {
            let dom = self.dom.clone();
            let region = Rc::clone(&region);
            Box::new(move || region.deactivate(&dom))
        };

        // Triggers are only marked once a tooltip stands behind them.
        self.tooltips.mount(TooltipMount {
            attach_to,
            triggers: triggers.clone(),
            options: TooltipOptions::new(&self.config, content),
            suppress_popper: style == TooltipStyle::Bottom,
            on_show,
            on_hide,
        })?;

        for trigger in &triggers {
            self.dom.add_class(trigger, TRIGGER_CLASS);
            self.dom.set_attribute(trigger, "tabindex", "0")?;
        }

        Ok(region)
    }

    /// Bind every declaration in one `dl`.
    ///
    /// A failing declaration is logged and does not stop the others.
    pub fn bind_annotation_list(
        &mut self,
        list: &D::Node,
        style: TooltipStyle,
        anchor_prefix: &str,
    ) -> BindReport {
        if style == TooltipStyle::Side {
            if let Err(error) = self.dom.set_style_property(list, "display", "none") {
                tracing::warn!(%error, "failed to hide annotation list");
            }
        }

        let mut report = BindReport::default();
        for decl in declarations(&self.dom, list, anchor_prefix) {
            if decl.targets.is_empty() {
                tracing::debug!(term = ?decl.term, "annotation declaration has no targets");
                report.skipped += 1;
                continue;
            }
            match self.bind_annotation(&decl, style) {
                Ok(region) => {
                    tracing::debug!(marker_id = region.marker_id(), ?style, "bound annotation");
                    report.bound += 1;
                }
                Err(error) => {
                    tracing::error!(
                        targets = ?decl.targets,
                        error = %error,
                        "failed to bind annotation"
                    );
                    report.failed += 1;
                }
            }
        }
        report
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::dom::DomError;
    use crate::highlight::{ACTIVE_STATUS, RegionState, STATUS_ATTRIBUTE};
    use crate::test_dom::{BODY, FakeDom, annotation_list, mathjax_block};

    /// Records mounts and lets tests fire the callbacks.
    #[derive(Clone, Default)]
    pub(crate) struct FakeTooltips {
        pub mounts: Rc<RefCell<Vec<TooltipMount<usize>>>>,
        pub hide_all_calls: Rc<RefCell<usize>>,
        /// When set, every mount is rejected.
        pub reject_mounts: bool,
    }

    impl FakeTooltips {
        pub fn show(&self, idx: usize) {
            let mounts = self.mounts.borrow();
            (mounts[idx].on_show)();
        }

        pub fn hide(&self, idx: usize) {
            let mounts = self.mounts.borrow();
            (mounts[idx].on_hide)();
        }
    }

    impl TooltipBackend for FakeTooltips {
        type Node = usize;

        fn mount(&self, mount: TooltipMount<usize>) -> Result<(), DomError> {
            if self.reject_mounts {
                return Err(DomError::from("tooltip library unavailable"));
            }
            self.mounts.borrow_mut().push(mount);
            Ok(())
        }

        fn hide_all(&self) {
            *self.hide_all_calls.borrow_mut() += 1;
        }
    }

    fn binder(dom: &FakeDom, tooltips: &FakeTooltips) -> Binder<FakeDom, FakeTooltips> {
        Binder::new(dom.clone(), tooltips.clone(), TooltipConfig::default())
    }

    #[test]
    fn test_bottom_style_binds_term() {
        let dom = FakeDom::new();
        mathjax_block(&dom, BODY, &[Some("a"), Some("b")], true);
        let (dl, terms) = annotation_list(&dom, BODY, &[("a", "about a")]);
        let tooltips = FakeTooltips::default();

        let report =
            binder(&dom, &tooltips).bind_annotation_list(&dl, TooltipStyle::Bottom, "mjx-eqn-");

        assert_eq!(report.bound, 1);
        let mounts = tooltips.mounts.borrow();
        assert_eq!(mounts[0].attach_to, terms[0]);
        assert_eq!(mounts[0].triggers, vec![terms[0]]);
        assert_eq!(mounts[0].options.content, None);
        assert!(mounts[0].suppress_popper);
        assert!(dom.has_class(&terms[0], TRIGGER_CLASS));
        assert_eq!(dom.attribute(&terms[0], "tabindex").as_deref(), Some("0"));
        assert_eq!(dom.style(dl, "display"), None);
    }

    #[test]
    fn test_side_style_binds_anchors() {
        let dom = FakeDom::new();
        let block = mathjax_block(&dom, BODY, &[Some("a"), None, Some("b")], true);
        let (dl, _) = annotation_list(&dom, BODY, &[("a;b", "<b>both</b>")]);
        let tooltips = FakeTooltips::default();

        let mut binder = binder(&dom, &tooltips);
        let report = binder.bind_annotation_list(&dl, TooltipStyle::Side, "mjx-eqn-");

        assert_eq!(report.bound, 1);
        assert_eq!(dom.style(dl, "display").as_deref(), Some("none"));
        let mounts = tooltips.mounts.borrow();
        assert_eq!(mounts[0].triggers, block.anchors);
        assert_eq!(mounts[0].options.content.as_deref(), Some("<b>both</b>"));
        assert!(!mounts[0].suppress_popper);
        assert_eq!(dom.parent(&mounts[0].attach_to), Some(block.root));
        assert!(block.anchors.iter().all(|a| dom.has_class(a, TRIGGER_CLASS)));
    }

    #[test]
    fn test_show_and_hide_toggle_region() {
        let dom = FakeDom::new();
        mathjax_block(&dom, BODY, &[Some("a")], true);
        let (_, terms) = annotation_list(&dom, BODY, &[("a", "x")]);
        let tooltips = FakeTooltips::default();

        let mut binder = binder(&dom, &tooltips);
        let decl = AnnotationDeclaration::read(&dom, &terms[0], "mjx-eqn-");
        let region = binder.bind_annotation(&decl, TooltipStyle::Bottom).unwrap();

        tooltips.show(0);
        assert_eq!(*tooltips.hide_all_calls.borrow(), 1);
        assert_eq!(region.state(), RegionState::Active);
        assert_eq!(
            dom.attribute(region.element(), STATUS_ATTRIBUTE).as_deref(),
            Some(ACTIVE_STATUS)
        );

        tooltips.hide(0);
        assert_eq!(region.state(), RegionState::Inactive);
        assert_eq!(dom.attribute(region.element(), STATUS_ATTRIBUTE), None);
    }

    #[test]
    fn test_shared_targets_share_region() {
        let dom = FakeDom::new();
        mathjax_block(&dom, BODY, &[Some("a")], true);
        let (first, _) = annotation_list(&dom, BODY, &[("a", "x")]);
        let (second, _) = annotation_list(&dom, BODY, &[("a", "y")]);
        let tooltips = FakeTooltips::default();

        let mut binder = binder(&dom, &tooltips);
        binder.bind_annotation_list(&first, TooltipStyle::Bottom, "mjx-eqn-");
        binder.bind_annotation_list(&second, TooltipStyle::Side, "mjx-eqn-");

        assert_eq!(binder.registry().len(), 1);
        assert_eq!(tooltips.mounts.borrow().len(), 2);
    }

    #[test]
    fn test_failure_is_isolated_per_declaration() {
        let dom = FakeDom::new();
        mathjax_block(&dom, BODY, &[Some("a"), Some("b")], true);
        let (dl, _) = annotation_list(
            &dom,
            BODY,
            &[("missing", "x"), ("a;missing", "y"), ("", "z"), ("b", "w")],
        );
        let tooltips = FakeTooltips::default();

        let report =
            binder(&dom, &tooltips).bind_annotation_list(&dl, TooltipStyle::Bottom, "mjx-eqn-");

        assert_eq!(
            report,
            BindReport {
                bound: 1,
                failed: 2,
                skipped: 1
            }
        );
        assert_eq!(tooltips.mounts.borrow().len(), 1);
    }

    #[test]
    fn test_failed_mount_leaves_triggers_untouched() {
        let dom = FakeDom::new();
        let block = mathjax_block(&dom, BODY, &[Some("a")], true);
        let (_, terms) = annotation_list(&dom, BODY, &[("a", "x")]);
        let tooltips = FakeTooltips {
            reject_mounts: true,
            ..FakeTooltips::default()
        };

        let mut binder = binder(&dom, &tooltips);
        let decl = AnnotationDeclaration::read(&dom, &terms[0], "mjx-eqn-");
        let err = binder.bind_annotation(&decl, TooltipStyle::Side).unwrap_err();

        assert!(matches!(err, AnnotateError::Dom(_)), "{err:?}");
        assert!(!dom.has_class(&block.anchors[0], TRIGGER_CLASS));
        assert_eq!(dom.attribute(&block.anchors[0], "tabindex"), None);
        assert!(!dom.has_class(&terms[0], TRIGGER_CLASS));
    }
}
