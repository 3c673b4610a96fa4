//! Page configuration.
//!
//! A [`PageConfig`] is built once, before the math renderer starts, and is
//! passed explicitly to everything that needs it. Nothing mutates it after
//! setup.

use serde::{Deserialize, Serialize};

use crate::anchor::AnchorId;
use crate::tooltip::{TooltipConfig, TooltipStyle};

/// Settings handed to the math renderer at startup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RendererSetup {
    /// Equation numbering mode (`ams`, `all` or `none`).
    pub tags: String,
    /// Prefix of every equation anchor id.
    pub anchor_prefix: String,
}

impl Default for RendererSetup {
    fn default() -> Self {
        Self {
            tags: "ams".into(),
            anchor_prefix: "mjx-eqn-".into(),
        }
    }
}

impl RendererSetup {
    /// Anchor id the renderer should give the equation labeled `label`.
    pub fn anchor_id(&self, label: &str) -> AnchorId {
        AnchorId::from_label(&self.anchor_prefix, label)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageConfig {
    /// Class identifying annotation `dl` elements.
    pub annotation_class: String,
    /// Style of the first annotation list on the page.
    pub first_style: TooltipStyle,
    /// Style of every following annotation list.
    pub style: TooltipStyle,
    pub tooltip: TooltipConfig,
    pub renderer: RendererSetup,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            annotation_class: "mathjax-code-annotation".into(),
            first_style: TooltipStyle::Bottom,
            style: TooltipStyle::Side,
            tooltip: TooltipConfig::default(),
            renderer: RendererSetup::default(),
        }
    }
}

impl PageConfig {
    /// Style for the `index`-th annotation list on the page.
    pub fn style_for(&self, index: usize) -> TooltipStyle {
        if index == 0 {
            self.first_style
        } else {
            self.style
        }
    }
}
