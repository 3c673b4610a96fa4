//! WASM bindings for eqnote.
//!
//! Load the module before MathJax and call `setup()`; annotations are bound
//! once MathJax has typeset the page.
//!
//! ```html
//! <script type="module">
//!   import init, { setup } from "./eqnote_js.js";
//!   await init();
//!   setup({ tooltip: { theme: "quarto" } });
//! </script>
//! <script src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-chtml.js"></script>
//! ```

mod types;

pub use types::*;

use std::cell::RefCell;
use std::rc::Rc;

use eqnote_browser::{BrowserDom, install, run_session};
use eqnote_core::{PageConfig, PageSession, analysis_report};
use wasm_bindgen::prelude::*;

thread_local! {
    /// The page's session. Set once by `setup` or the first `enhance`.
    static SESSION: RefCell<Option<Rc<PageSession>>> = const { RefCell::new(None) };
}

/// Initialize panic hook and console logging.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    init_tracing();
}

fn init_tracing() {
    use tracing::Level;
    use tracing_subscriber::Registry;
    use tracing_subscriber::layer::SubscriberExt;

    let console_level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let wasm_layer = tracing_wasm::WASMLayer::new(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(console_level)
            .build(),
    );

    let _ = tracing::subscriber::set_global_default(Registry::default().with(wasm_layer));
}

fn parse_config(config: JsValue) -> Result<PageConfig, JsError> {
    if config.is_undefined() || config.is_null() {
        return Ok(PageConfig::default());
    }
    serde_wasm_bindgen::from_value(config)
        .map_err(|e| JsError::new(&format!("Invalid eqnote config: {}", e)))
}

fn new_session(config: JsValue) -> Result<Rc<PageSession>, JsError> {
    let config = parse_config(config)?;
    SESSION.with(|slot| {
        let mut slot = slot.borrow_mut();
        if slot.is_some() {
            return Err(JsError::new("eqnote is already set up for this page"));
        }
        let session = Rc::new(PageSession::new(config));
        *slot = Some(Rc::clone(&session));
        Ok(session)
    })
}

/// Configure MathJax and bind annotations once it has typeset the page.
///
/// # Arguments
/// * `config` - Optional page configuration; omitted fields use defaults
#[wasm_bindgen]
pub fn setup(config: JsValue) -> Result<(), JsError> {
    let session = new_session(config)?;
    install(session).map_err(|e| JsError::new(&e.to_string()))
}

/// Enhance the page now, for pages whose math is already rendered.
///
/// Uses the session from `setup` if there is one. Enhancing twice is a
/// no-op; the report says whether anything ran.
#[wasm_bindgen]
pub fn enhance(config: JsValue) -> Result<JsPageReport, JsError> {
    let existing = SESSION.with(|slot| slot.borrow().clone());
    let session = match existing {
        Some(session) => session,
        None => new_session(config)?,
    };
    Ok(run_session(&session).into())
}

/// Describe every math block on the page.
#[wasm_bindgen(js_name = analysisReport)]
pub fn analysis_report_js() -> JsAnalysisReport {
    let blocks = analysis_report(&BrowserDom::current())
        .into_iter()
        .map(JsBlockAnalysis::from)
        .collect();
    JsAnalysisReport { blocks }
}
