//! Tippy.js implementation of the tooltip contract.
//!
//! Tippy is loaded by the page as a global (`window.tippy`); this module
//! only binds the two entry points it needs.

use eqnote_core::{DomError, TooltipBackend, TooltipMount};
use js_sys::{Array, Reflect};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement};

use crate::dom::js_error;

// === Tippy bindings ===

#[wasm_bindgen]
extern "C" {
    /// A tooltip created by `tippy(target, options)`.
    pub type TippyInstance;

    /// The element Tippy positions; present from creation on.
    #[wasm_bindgen(method, getter, structural)]
    pub fn popper(this: &TippyInstance) -> HtmlElement;

    #[wasm_bindgen(catch, js_name = tippy)]
    fn tippy_create(target: &Element, options: &JsValue) -> Result<TippyInstance, JsValue>;

    #[wasm_bindgen(catch, js_namespace = tippy, js_name = hideAll)]
    fn tippy_hide_all() -> Result<(), JsValue>;
}

fn set(target: &JsValue, key: &str, value: &JsValue) -> Result<(), DomError> {
    Reflect::set(target, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(js_error)
}

/// Tooltips rendered by the page's Tippy.js.
#[derive(Clone, Copy, Debug, Default)]
pub struct TippyTooltips;

impl TooltipBackend for TippyTooltips {
    type Node = Element;

    fn mount(&self, mount: TooltipMount<Element>) -> Result<(), DomError> {
        let TooltipMount {
            attach_to,
            triggers,
            options,
            suppress_popper,
            on_show,
            on_hide,
        } = mount;

        // JSON-compatible so that `content: None` arrives as `null`.
        let js_options = options
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| DomError(format!("invalid tooltip options: {}", e)))?;

        let trigger_target: Array = triggers.iter().collect();
        set(&js_options, "triggerTarget", &trigger_target)?;

        let parent = attach_to.clone();
        let append_to = Closure::<dyn Fn(JsValue) -> JsValue>::new(move |_reference| {
            JsValue::from(parent.clone())
        });
        set(&js_options, "appendTo", append_to.as_ref())?;

        let on_show = Closure::<dyn Fn(JsValue)>::new(move |_instance| on_show());
        set(&js_options, "onShow", on_show.as_ref())?;

        let on_hide = Closure::<dyn Fn(JsValue)>::new(move |_instance| on_hide());
        set(&js_options, "onHide", on_hide.as_ref())?;

        let instance = tippy_create(&attach_to, &js_options).map_err(js_error)?;
        if suppress_popper {
            instance
                .popper()
                .style()
                .set_property("display", "none")
                .map_err(js_error)?;
        }

        // Tooltips live as long as the page.
        append_to.forget();
        on_show.forget();
        on_hide.forget();
        Ok(())
    }

    fn hide_all(&self) {
        if let Err(error) = tippy_hide_all() {
            tracing::warn!(error = ?error, "tippy.hideAll failed");
        }
    }
}
