//! Browser layer
//!
//! Implements the router's collaborator traits over `web_sys` and exposes
//! the `DittoApp` entry point to JavaScript.
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { DittoApp } from 'ditto';
//!
//! await init();
//!
//! const app = new DittoApp({
//!   index: 'README.md',
//!   sidebar_file: 'sidebar.md',
//!   base_url: 'https://github.com/me/docs/edit/master',
//!   document_title: 'Docs',
//!   save_progress: true,
//! });
//! app.onComment((identifier, url) => resetCommentThread(identifier, url));
//! app.run();
//! ```

mod app;
mod bindings;
mod controls;
mod fetch;
mod indicator;
mod storage;
mod surface;

pub use app::DittoApp;
pub use bindings::{JsCommentWidget, MarkedRenderer, PrismHighlighter};
pub use indicator::PulseIndicator;
pub use storage::LocalStorage;
pub use surface::WebSurface;

use wasm_bindgen::JsValue;

use crate::error::DittoError;

/// Best-effort text of a thrown JS value
pub(crate) fn js_reason(value: JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

pub(crate) fn dom_err(value: JsValue) -> DittoError {
    DittoError::Dom(js_reason(value))
}

pub(crate) fn to_js(error: DittoError) -> JsValue {
    JsValue::from_str(&error.to_string())
}
