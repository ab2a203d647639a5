//! External JS collaborators: `marked`, `Prism` and the comment hook.

use js_sys::Function;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element};

use crate::router::host::{CodeHighlighter, CommentWidget, MarkdownRenderer};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = marked, js_name = parse)]
    fn marked_parse(src: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = Prism, js_name = highlightElement)]
    fn prism_highlight_element(element: &Element) -> Result<(), JsValue>;
}

/// Renders through the page's global `marked`
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkedRenderer;

impl MarkdownRenderer for MarkedRenderer {
    fn render(&self, markdown: &str) -> String {
        match marked_parse(markdown) {
            Ok(html) => html.as_string().unwrap_or_default(),
            Err(e) => {
                console_error!("[Markdown] marked.parse failed: {}", super::js_reason(e));
                String::new()
            }
        }
    }
}

/// Highlights `<container> code` elements through the page's global `Prism`
pub struct PrismHighlighter {
    document: Document,
    available: bool,
}

impl PrismHighlighter {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            available: true,
        }
    }
}

impl CodeHighlighter for PrismHighlighter {
    fn highlight(&mut self, container: &str) {
        if !self.available {
            return;
        }
        let selector = format!("{} code", container);
        let Ok(nodes) = self.document.query_selector_all(&selector) else {
            return;
        };
        for i in 0..nodes.length() {
            let Some(element) = nodes.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            if let Err(e) = prism_highlight_element(&element) {
                // Prism missing from the page: stop trying for this session
                console_warn!("[Highlight] {}", super::js_reason(e));
                self.available = false;
                return;
            }
        }
    }
}

/// Calls a JS function `(identifier, url)` on every render
#[derive(Default)]
pub struct JsCommentWidget {
    hook: Option<Function>,
}

impl JsCommentWidget {
    pub fn new(hook: Option<Function>) -> Self {
        Self { hook }
    }
}

impl CommentWidget for JsCommentWidget {
    fn reset(&mut self, identifier: &str, url: &str) {
        let Some(hook) = &self.hook else {
            return;
        };
        if let Err(e) = hook.call2(&JsValue::NULL, &identifier.into(), &url.into()) {
            console_warn!("[Comments] hook failed: {}", super::js_reason(e));
        }
    }
}
