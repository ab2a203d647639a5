//! Ditto: hash-routed Markdown documentation viewer
//!
//! A Rust/WASM port of the single-page docs viewer. The page fragment names
//! a chapter (and optionally a section inside it); the viewer fetches that
//! chapter's Markdown, renders it, and keeps navigation chrome in step.
//!
//! # Architecture
//!
//! ## Navigation core (platform-free)
//! - `address.rs` - Address / AddressParser: fragment `#chapter#anchor` parsing
//! - `paths.rs` - document paths, asset normalisation, edit and search URLs
//! - `chapters.rs` - ChapterIndex: sidebar order and previous/next adjacency
//! - `sections.rs` - SectionIndex: heading slugs and the page outline
//! - `progress.rs` - ProgressStore: last address and scroll fraction
//!
//! ## Router
//! - `router/mod.rs` - Router: Idle -> Loading -> Rendered / Error
//! - `router/host.rs` - collaborator traits (surface, renderer, indicator, ...)
//!
//! ## Browser layer
//! - `web/` - `web_sys` implementations and the `DittoApp` entry point
//!
//! Everything outside `web/` is free of DOM types and tested natively.

#[macro_use]
mod log;

pub mod config;
pub mod error;
pub mod navigation;
pub mod router;
pub mod web;

pub use config::DittoConfig;
pub use error::DittoError;
pub use navigation::*;
pub use router::{Completion, FetchRequest, NavState, Router};
pub use web::DittoApp;

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("ditto v{}", env!("CARGO_PKG_VERSION"))
}
