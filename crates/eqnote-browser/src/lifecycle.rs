//! MathJax startup hookup.
//!
//! The page enhancement has to run after MathJax has typeset the document,
//! exactly once. MathJax reads its configuration from `window.MathJax`
//! before it loads, and calls `startup.pageReady` when it is ready to
//! typeset; the default implementation returns a promise that resolves
//! once typesetting is done. [`install`] fills in that configuration:
//!
//! - `tex.tags` from [`RendererSetup::tags`]
//! - `tex.tagformat.id`, so equation anchor ids use [`RendererSetup::anchor_id`]
//! - `startup.pageReady`, chaining the enhancement after the default
//!
//! If MathJax is already loaded the configuration can no longer take
//! effect; the enhancement is chained onto `MathJax.startup.promise`
//! instead.

use std::rc::Rc;

use eqnote_core::{DomError, PageReport, PageSession, RendererSetup};
use js_sys::{Function, Object, Promise, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, future_to_promise, spawn_local};

use crate::dom::{BrowserDom, js_error};
use crate::tippy::TippyTooltips;

fn get(target: &JsValue, key: &str) -> Result<JsValue, DomError> {
    Reflect::get(target, &JsValue::from_str(key)).map_err(js_error)
}

fn set(target: &JsValue, key: &str, value: &JsValue) -> Result<(), DomError> {
    Reflect::set(target, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(js_error)
}

/// `target[key]`, creating an empty object there if it is missing.
fn child_object(target: &JsValue, key: &str) -> Result<JsValue, DomError> {
    let existing = get(target, key)?;
    if existing.is_object() {
        return Ok(existing);
    }
    let created: JsValue = Object::new().into();
    set(target, key, &created)?;
    Ok(created)
}

/// Run the session against the live page.
pub fn run_session(session: &PageSession) -> Option<PageReport> {
    session.run(BrowserDom::current(), TippyTooltips)
}

/// Whether `window.MathJax` is the loaded library rather than a config
/// object waiting for it.
fn mathjax_loaded(mathjax: &JsValue) -> Result<bool, DomError> {
    Ok(get(mathjax, "version")?.is_string())
}

/// Configure MathJax to enhance the page once typesetting is done.
pub fn install(session: Rc<PageSession>) -> Result<(), DomError> {
    let window: JsValue = gloo_utils::window().into();
    let mathjax = child_object(&window, "MathJax")?;

    if mathjax_loaded(&mathjax)? {
        let prefix = &session.config().renderer.anchor_prefix;
        tracing::warn!(
            anchor_prefix = %prefix,
            "MathJax loaded before eqnote setup: equation ids keep MathJax's own format \
             (mjx-eqn:label) and will not match the configured prefix; load eqnote first"
        );
        let startup = get(&mathjax, "startup")?;
        let promise: Promise = get(&startup, "promise")?
            .dyn_into()
            .map_err(|_| DomError::from("MathJax.startup.promise is not a promise"))?;
        spawn_local(async move {
            match JsFuture::from(promise).await {
                Ok(_) => {
                    run_session(&session);
                }
                Err(error) => tracing::error!(?error, "MathJax startup failed"),
            }
        });
        return Ok(());
    }

    configure_tex(&mathjax, &session.config().renderer)?;
    configure_startup(&mathjax, session)?;
    tracing::debug!("installed MathJax configuration");
    Ok(())
}

fn configure_tex(mathjax: &JsValue, setup: &RendererSetup) -> Result<(), DomError> {
    let tex = child_object(mathjax, "tex")?;
    set(&tex, "tags", &JsValue::from_str(&setup.tags))?;

    let tagformat = child_object(&tex, "tagformat")?;
    let setup = setup.clone();
    let format_id = Closure::<dyn Fn(String) -> String>::new(move |label: String| {
        setup.anchor_id(&label).to_string()
    });
    set(&tagformat, "id", format_id.as_ref())?;
    // MathJax may call the formatter for as long as the page is open.
    format_id.forget();
    Ok(())
}

fn configure_startup(mathjax: &JsValue, session: Rc<PageSession>) -> Result<(), DomError> {
    let startup = child_object(mathjax, "startup")?;

    let page_ready = Closure::<dyn Fn() -> Promise>::new(move || {
        let session = Rc::clone(&session);
        future_to_promise(async move {
            // By now `window.MathJax` is the library, not our config object.
            let window: JsValue = gloo_utils::window().into();
            let startup = Reflect::get(&window, &JsValue::from_str("MathJax"))
                .and_then(|mathjax| Reflect::get(&mathjax, &JsValue::from_str("startup")))?;
            let default_ready: Function =
                Reflect::get(&startup, &JsValue::from_str("defaultPageReady"))?.dyn_into()?;
            let typeset: Promise = default_ready.call0(&startup)?.dyn_into()?;
            JsFuture::from(typeset).await?;
            run_session(&session);
            Ok(JsValue::UNDEFINED)
        })
    });
    set(&startup, "pageReady", page_ready.as_ref())?;
    page_ready.forget();
    Ok(())
}
