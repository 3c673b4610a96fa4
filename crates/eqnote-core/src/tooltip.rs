//! Tooltip presentation contract.
//!
//! Positioning and animation belong to an external tooltip library (Tippy.js
//! in the browser). The binder hands a [`TooltipBackend`] a fully described
//! [`TooltipMount`]; the backend only has to translate it.

use serde::{Deserialize, Serialize};

use crate::dom::DomError;

/// How an annotation list is presented.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TooltipStyle {
    /// The `dt` itself is the trigger and the list stays visible under the
    /// equation. The tooltip is suppressed; only the highlight toggles.
    #[default]
    Bottom,
    /// The equation numbers are the triggers and the `dd` content pops up
    /// next to the highlight. The list itself is hidden.
    Side,
}

/// User-tunable tooltip behavior.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TooltipConfig {
    pub max_width: u32,
    /// Show/hide delay in ms.
    pub delay: [u32; 2],
    /// Show/hide animation duration in ms.
    pub duration: [u32; 2],
    /// Skidding and distance in px.
    pub offset: [i32; 2],
    pub arrow: bool,
    /// Space-separated trigger events.
    pub trigger: String,
    pub interactive_border: u32,
    pub theme: String,
    pub placement: String,
    /// Placements tried in order when the preferred one overflows.
    pub fallback_placements: Vec<String>,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            max_width: 300,
            delay: [50, 0],
            duration: [200, 0],
            offset: [5, 10],
            arrow: true,
            trigger: "click mouseenter focus".into(),
            interactive_border: 10,
            theme: "quarto".into(),
            placement: "right".into(),
            fallback_placements: ["right", "top-end", "top-start", "top"]
                .map(String::from)
                .to_vec(),
        }
    }
}

/// Tippy options object, minus the callbacks and element references the
/// backend wires itself.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipOptions {
    #[serde(rename = "allowHTML")]
    pub allow_html: bool,
    pub content: Option<String>,
    pub max_width: u32,
    pub delay: [u32; 2],
    pub duration: [u32; 2],
    pub offset: [i32; 2],
    pub arrow: bool,
    pub trigger: String,
    pub interactive: bool,
    pub interactive_border: u32,
    pub theme: String,
    pub placement: String,
    pub position_fixed: bool,
    pub popper_options: PopperOptions,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PopperOptions {
    pub modifiers: Vec<PopperModifier>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "name", content = "options", rename_all = "camelCase")]
pub enum PopperModifier {
    #[serde(rename_all = "camelCase")]
    Flip {
        flip_variations: bool,
        allowed_auto_placements: Vec<String>,
        fallback_placements: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    PreventOverflow { main_axis: bool, alt_axis: bool },
}

impl TooltipOptions {
    pub fn new(config: &TooltipConfig, content: Option<String>) -> Self {
        Self {
            allow_html: true,
            content,
            max_width: config.max_width,
            delay: config.delay,
            duration: config.duration,
            offset: config.offset,
            arrow: config.arrow,
            trigger: config.trigger.clone(),
            interactive: true,
            interactive_border: config.interactive_border,
            theme: config.theme.clone(),
            placement: config.placement.clone(),
            position_fixed: true,
            popper_options: PopperOptions {
                modifiers: vec![
                    PopperModifier::Flip {
                        flip_variations: false,
                        allowed_auto_placements: vec![config.placement.clone()],
                        fallback_placements: config.fallback_placements.clone(),
                    },
                    PopperModifier::PreventOverflow {
                        main_axis: false,
                        alt_axis: false,
                    },
                ],
            },
        }
    }
}

/// Callback run by the tooltip library on show or hide.
pub type TooltipCallback = Box<dyn Fn()>;

/// Everything a backend needs to create one tooltip.
pub struct TooltipMount<N> {
    /// Element the tooltip is created on and whose subtree parents the
    /// rendered popper.
    pub attach_to: N,
    /// Elements whose events open the tooltip.
    pub triggers: Vec<N>,
    pub options: TooltipOptions,
    /// Hide the popper so that only the highlight is visible.
    pub suppress_popper: bool,
    pub on_show: TooltipCallback,
    pub on_hide: TooltipCallback,
}

impl<N: std::fmt::Debug> std::fmt::Debug for TooltipMount<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TooltipMount")
            .field("attach_to", &self.attach_to)
            .field("triggers", &self.triggers)
            .field("options", &self.options)
            .field("suppress_popper", &self.suppress_popper)
            .finish_non_exhaustive()
    }
}

/// A tooltip library.
pub trait TooltipBackend {
    type Node;

    /// Create a tooltip. The backend keeps the callbacks alive for the page's
    /// lifetime.
    fn mount(&self, mount: TooltipMount<Self::Node>) -> Result<(), DomError>;

    /// Hide every open tooltip.
    fn hide_all(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_match_tippy_shape() {
        let options = TooltipOptions::new(&TooltipConfig::default(), Some("<p>x</p>".into()));
        let json = serde_json::to_value(&options).unwrap();

        assert_eq!(json["allowHTML"], true);
        assert_eq!(json["content"], "<p>x</p>");
        assert_eq!(json["maxWidth"], 300);
        assert_eq!(json["delay"], serde_json::json!([50, 0]));
        assert_eq!(json["trigger"], "click mouseenter focus");
        assert_eq!(json["interactiveBorder"], 10);
        assert_eq!(json["positionFixed"], true);
        assert_eq!(
            json["popperOptions"]["modifiers"],
            serde_json::json!([
                {
                    "name": "flip",
                    "options": {
                        "flipVariations": false,
                        "allowedAutoPlacements": ["right"],
                        "fallbackPlacements": ["right", "top-end", "top-start", "top"],
                    },
                },
                {
                    "name": "preventOverflow",
                    "options": { "mainAxis": false, "altAxis": false },
                },
            ])
        );
    }

    #[test]
    fn test_no_content_serializes_null() {
        let options = TooltipOptions::new(&TooltipConfig::default(), None);
        let json = serde_json::to_value(&options).unwrap();
        assert!(json["content"].is_null());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: TooltipConfig =
            serde_json::from_str(r#"{ "theme": "light", "maxWidth": 420 }"#).unwrap();
        assert_eq!(config.theme, "light");
        assert_eq!(config.max_width, 420);
        assert_eq!(config.placement, "right");
    }

    #[test]
    fn test_style_names() {
        let style: TooltipStyle = serde_json::from_str(r#""side""#).unwrap();
        assert_eq!(style, TooltipStyle::Side);
    }
}
