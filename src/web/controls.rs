//! Page controls outside the router: sidebar, back-to-top, edit, search.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, HtmlInputElement, Window};

use super::fetch::{current_fragment, fetch_text};
use super::surface::{query, query_all, set_visible};
use crate::config::DittoConfig;
use crate::error::DittoError;
use crate::navigation::{edit_url, search_url, AddressParser, ChapterIndex};
use crate::router::host::MarkdownRenderer;

pub(crate) const SIDEBAR_ALERT: &str = "Opps! can't find the sidebar file to display!";

pub(crate) fn alert(window: &Window, message: &str) {
    if window.alert_with_message(message).is_err() {
        console_error!("[Ditto] {}", message);
    }
}

/// Attach a listener for the lifetime of the page
fn listen_forever<F>(target: &web_sys::EventTarget, event: &str, handler: F) -> Result<(), DittoError>
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .map_err(super::dom_err)?;
    closure.forget();
    Ok(())
}

fn required(document: &Document, selector: &str) -> Result<web_sys::Element, DittoError> {
    query(document, selector).ok_or_else(|| DittoError::Dom(format!("missing element {}", selector)))
}

// =============================================================================
// Sidebar
// =============================================================================

/// Render the sidebar document and build the chapter index from its links
pub(crate) async fn load_sidebar(
    document: &Document,
    config: &DittoConfig,
    renderer: &dyn MarkdownRenderer,
) -> Result<ChapterIndex, DittoError> {
    let markdown = fetch_text(&config.sidebar_file)
        .await
        .map_err(|reason| DittoError::SidebarFetch {
            path: config.sidebar_file.clone(),
            reason,
        })?;
    let sidebar = required(document, &config.sidebar_id)?;
    sidebar.set_inner_html(&renderer.render(&markdown));

    let hrefs: Vec<String> = query_all(&sidebar, "a[href]")
        .iter()
        .filter_map(|a| a.get_attribute("href"))
        // marked percent-encodes hrefs; location.hash is matched decoded
        .map(|href| {
            js_sys::decode_uri_component(&href)
                .map(String::from)
                .unwrap_or(href)
        })
        .collect();
    let chapters = ChapterIndex::from_links(&hrefs, &config.index);
    console_log!("[Sidebar] {} chapters from {}", chapters.len(), config.sidebar_file);
    Ok(chapters)
}

// =============================================================================
// Buttons
// =============================================================================

pub(crate) fn init_back_to_top(window: &Window, document: &Document, config: &DittoConfig) -> Result<(), DittoError> {
    let button = required(document, &config.back_to_top_id)?;
    set_visible(&button, true);
    let window = window.clone();
    listen_forever(&button, "click", move |_| {
        window.scroll_to_with_x_and_y(0.0, 0.0);
    })
}

pub(crate) fn init_edit_button(window: &Window, document: &Document, config: &DittoConfig) -> Result<(), DittoError> {
    let base_url = config
        .base_url_trimmed()
        .ok_or(DittoError::MissingBaseUrl)?
        .to_string();
    let button = required(document, &config.edit_id)?;
    set_visible(&button, true);

    let window = window.clone();
    let parser = AddressParser::new(config.comment_prefix.clone());
    let index = config.index.clone();
    listen_forever(&button, "click", move |_| {
        let address = parser.parse(&current_fragment());
        let url = edit_url(&base_url, &address, &index);
        // new window keeps the viewer's history intact
        if let Err(e) = window.open_with_url_and_target(&url, "_blank") {
            console_warn!("[Edit] {}", super::js_reason(e));
        }
    })
}

pub(crate) fn init_search(window: &Window, document: &Document, config: &DittoConfig) -> Result<(), DittoError> {
    let form = required(document, &config.search_id)?;
    let input = query_all(&form, "input")
        .into_iter()
        .find_map(|el| el.dyn_into::<HtmlInputElement>().ok())
        .ok_or_else(|| DittoError::Dom(format!("no input inside {}", config.search_id)))?;
    set_visible(&form, true);

    let window = window.clone();
    let engine = config.search_engine.clone();
    let site = config.site.clone();
    listen_forever(&form, "submit", move |event: Event| {
        event.prevent_default();
        let host = site
            .clone()
            .or_else(|| window.location().host().ok());
        let url = search_url(&engine, host.as_deref(), &input.value(), |q| {
            String::from(js_sys::encode_uri_component(q))
        });
        if let Err(e) = window.open_with_url_and_target(&url, "_blank") {
            console_warn!("[Search] {}", super::js_reason(e));
        }
    })
}
