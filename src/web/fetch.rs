//! Plain-text document fetches and location helpers

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use super::js_reason;

/// GET `path` relative to the site root. Any failure, HTTP or network, is
/// reported as a reason string.
pub(crate) async fn fetch_text(path: &str) -> Result<String, String> {
    let window = web_sys::window().ok_or("no window")?;
    let response = JsFuture::from(window.fetch_with_str(path))
        .await
        .map_err(js_reason)?;
    let response: Response = response.dyn_into().map_err(js_reason)?;
    if !response.ok() {
        return Err(format!("HTTP {}", response.status()));
    }
    let body = JsFuture::from(response.text().map_err(js_reason)?)
        .await
        .map_err(js_reason)?;
    body.as_string()
        .ok_or_else(|| "response body is not text".to_string())
}

/// Current `location.hash`, percent-decoded when possible
pub(crate) fn current_fragment() -> String {
    let raw = web_sys::window()
        .and_then(|w| w.location().hash().ok())
        .unwrap_or_default();
    js_sys::decode_uri_component(&raw)
        .map(String::from)
        .unwrap_or(raw)
}
