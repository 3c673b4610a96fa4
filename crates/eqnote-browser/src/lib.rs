//! Browser DOM layer for eqnote.
//!
//! This crate implements the `eqnote-core` platform traits against the live
//! page. It assumes a `wasm32-unknown-unknown` target environment, MathJax
//! 3 (CHTML output) and a global Tippy.js.
//!
//! # Architecture
//!
//! - `dom`: `MathDom` over `web_sys::Document`
//! - `tippy`: `TooltipBackend` over Tippy.js
//! - `lifecycle`: MathJax configuration and the page-ready hook
//!
//! # Re-exports
//!
//! This crate re-exports `eqnote-core` for convenience, so consumers only
//! need to depend on `eqnote-browser`.

pub use eqnote_core;

pub mod dom;
pub mod lifecycle;
pub mod tippy;

pub use dom::BrowserDom;
pub use lifecycle::{install, run_session};
pub use tippy::{TippyInstance, TippyTooltips};
