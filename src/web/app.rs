//! DittoApp: JavaScript entry point
//!
//! Owns the router once the sidebar has loaded, and wires `hashchange` and
//! `scroll` events into it.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Function;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Event, Window};

use super::bindings::{JsCommentWidget, MarkedRenderer, PrismHighlighter};
use super::controls::{alert, init_back_to_top, init_edit_button, init_search, load_sidebar, SIDEBAR_ALERT};
use super::fetch::{current_fragment, fetch_text};
use super::indicator::PulseIndicator;
use super::storage::LocalStorage;
use super::surface::{scroll_metrics, WebSurface};
use super::to_js;
use crate::config::DittoConfig;
use crate::error::DittoError;
use crate::navigation::{scroll_fraction, ChapterIndex, FrameThrottle, KeyValueStore, MemoryStore};
use crate::router::host::Collaborators;
use crate::router::{NavState, Router};

type SharedRouter = Rc<RefCell<Option<Router<WebSurface>>>>;

#[wasm_bindgen]
pub struct DittoApp {
    config: DittoConfig,
    comment_hook: Option<Function>,
    router: SharedRouter,
    started: bool,
}

#[wasm_bindgen]
impl DittoApp {
    /// Create from a config object (snake_case keys, all optional)
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<DittoApp, JsValue> {
        let config = if config.is_undefined() || config.is_null() {
            DittoConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| to_js(DittoError::InvalidConfig(e.to_string())))?
        };
        Ok(Self::with_config(config))
    }

    /// Create from a JSON config string
    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(json: &str) -> Result<DittoApp, JsValue> {
        DittoConfig::from_json(json)
            .map(Self::with_config)
            .map_err(to_js)
    }

    /// Register `(identifier, url) => void`, called after every render
    #[wasm_bindgen(js_name = onComment)]
    pub fn on_comment(&mut self, hook: Function) {
        self.comment_hook = Some(hook);
    }

    /// Initialize controls, load the sidebar and route the current address.
    /// Calling it again is a no-op.
    pub fn run(&mut self) -> Result<(), JsValue> {
        if self.started {
            return Ok(());
        }
        let window = web_sys::window().ok_or_else(|| to_js(DittoError::Dom("no window".into())))?;
        let document = window
            .document()
            .ok_or_else(|| to_js(DittoError::Dom("no document".into())))?;

        for problem in self.config.validate() {
            console_warn!("[Ditto] {}", problem);
            alert(&window, &problem.to_string());
        }
        self.init_controls(&window, &document);

        let surface = WebSurface::new(window.clone(), &self.config).map_err(to_js)?;
        let collaborators = Collaborators::new(
            Box::new(MarkedRenderer),
            Box::new(PulseIndicator::new(window.clone(), document.clone(), self.config.loading_id.clone())),
        )
        .with_highlighter(Box::new(PrismHighlighter::new(document.clone())))
        .with_comments(Box::new(JsCommentWidget::new(self.comment_hook.clone())));

        let store: Box<dyn KeyValueStore> = match LocalStorage::open() {
            Ok(storage) => Box::new(storage),
            Err(e) => {
                console_warn!("[Progress] {}; progress kept in memory", e);
                Box::new(MemoryStore::new())
            }
        };

        self.started = true;
        let shared = self.router.clone();
        let config = self.config.clone();
        spawn_local(async move {
            let chapters = if config.sidebar {
                match load_sidebar(&document, &config, &MarkedRenderer).await {
                    Ok(chapters) => chapters,
                    Err(e) => {
                        console_error!("[Sidebar] {}", e);
                        if matches!(e, DittoError::SidebarFetch { .. }) {
                            alert(&window, SIDEBAR_ALERT);
                        }
                        ChapterIndex::new()
                    }
                }
            } else {
                ChapterIndex::new()
            };

            let save_progress = config.save_progress;
            *shared.borrow_mut() = Some(Router::new(config, surface, collaborators, chapters, store));

            navigate(&shared);
            if let Err(e) = install_listeners(&window, &document, &shared, save_progress) {
                console_error!("[Ditto] {}", e);
            }
        });
        Ok(())
    }

    /// Router state: "idle", "loading", "rendered" or "error"
    #[wasm_bindgen(js_name = stateName)]
    pub fn state_name(&self) -> String {
        self.router
            .borrow()
            .as_ref()
            .map(|r| r.state())
            .unwrap_or(NavState::Idle)
            .as_str()
            .to_string()
    }

    /// Ordered chapters from the sidebar
    pub fn chapters(&self) -> Result<JsValue, JsValue> {
        let router = self.router.borrow();
        let chapters = router
            .as_ref()
            .map(|r| r.chapters().chapters().to_vec())
            .unwrap_or_default();
        serde_wasm_bindgen::to_value(&chapters).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Stored reading progress, or null when saving is off
    #[wasm_bindgen(js_name = readingProgress)]
    pub fn reading_progress(&self) -> Result<JsValue, JsValue> {
        let progress = self
            .router
            .borrow()
            .as_ref()
            .and_then(|r| r.reading_progress());
        serde_wasm_bindgen::to_value(&progress).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl DittoApp {
    pub fn with_config(config: DittoConfig) -> Self {
        Self {
            config,
            comment_hook: None,
            router: Rc::new(RefCell::new(None)),
            started: false,
        }
    }

    pub fn config(&self) -> &DittoConfig {
        &self.config
    }

    /// Failures here disable the one control, never the viewer
    fn init_controls(&self, window: &Window, document: &Document) {
        let config = &self.config;
        if config.back_to_top_button {
            if let Err(e) = init_back_to_top(window, document, config) {
                console_warn!("[Ditto] back-to-top: {}", e);
            }
        }
        if config.edit_enabled() {
            if let Err(e) = init_edit_button(window, document, config) {
                console_warn!("[Ditto] edit: {}", e);
            }
        }
        if config.search_bar {
            if let Err(e) = init_search(window, document, config) {
                console_warn!("[Ditto] search: {}", e);
            }
        }
    }
}

/// Route the current address: enter Loading now, render when the fetch lands
fn navigate(shared: &SharedRouter) {
    let fragment = current_fragment();
    let request = match shared.borrow_mut().as_mut() {
        Some(router) => router.begin(&fragment),
        None => return,
    };

    let shared = shared.clone();
    spawn_local(async move {
        let result = fetch_text(&request.path)
            .await
            .map_err(|reason| DittoError::DocumentFetch {
                path: request.path.clone(),
                reason,
            });
        if let Some(router) = shared.borrow_mut().as_mut() {
            router.complete(request.generation, result);
        }
    });
}

fn install_listeners(
    window: &Window,
    document: &Document,
    shared: &SharedRouter,
    save_progress: bool,
) -> Result<(), DittoError> {
    let on_hash = {
        let shared = shared.clone();
        Closure::wrap(Box::new(move |_: Event| navigate(&shared)) as Box<dyn FnMut(Event)>)
    };
    window
        .add_event_listener_with_callback("hashchange", on_hash.as_ref().unchecked_ref())
        .map_err(super::dom_err)?;
    on_hash.forget();

    if !save_progress {
        return Ok(());
    }

    let throttle = Rc::new(RefCell::new(FrameThrottle::new()));
    let on_scroll = {
        let shared = shared.clone();
        let window = window.clone();
        let document = document.clone();
        Closure::wrap(Box::new(move |_: Event| {
            if !throttle.borrow_mut().try_schedule() {
                return;
            }
            let shared = shared.clone();
            let frame_throttle = throttle.clone();
            let sample_window = window.clone();
            let document = document.clone();
            let frame = Closure::once_into_js(move || {
                let (top, height, viewport) = scroll_metrics(&sample_window, &document);
                if let Ok(mut router) = shared.try_borrow_mut() {
                    if let Some(router) = router.as_mut() {
                        router.record_scroll(scroll_fraction(top, height, viewport));
                    }
                }
                frame_throttle.borrow_mut().frame_done();
            });
            if window.request_animation_frame(frame.unchecked_ref()).is_err() {
                throttle.borrow_mut().frame_done();
            }
        }) as Box<dyn FnMut(Event)>)
    };
    window
        .add_event_listener_with_callback("scroll", on_scroll.as_ref().unchecked_ref())
        .map_err(super::dom_err)?;
    on_scroll.forget();
    Ok(())
}
