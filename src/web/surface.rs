//! DOM-backed document surface

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, HtmlElement, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition, Window,
};

use crate::config::DittoConfig;
use crate::error::DittoError;
use crate::navigation::{scroll_offset, Address, Heading, Section};
use crate::router::host::DocumentSurface;

pub const OUTLINE_ID: &str = "content-toc";
const HEADING_SELECTOR: &str = "h2, h3, h4";
const FLASH_MS: i32 = 500;

/// Show or hide an element (inline `display` plus the `hidden` attribute)
pub(crate) fn set_visible(element: &Element, visible: bool) {
    if visible {
        let _ = element.remove_attribute("hidden");
    }
    if let Some(html) = element.dyn_ref::<HtmlElement>() {
        let _ = html
            .style()
            .set_property("display", if visible { "" } else { "none" });
    }
}

pub(crate) fn query(document: &Document, selector: &str) -> Option<Element> {
    document.query_selector(selector).ok().flatten()
}

pub(crate) fn query_all(root: &Element, selector: &str) -> Vec<Element> {
    let Ok(nodes) = root.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// Page scroll metrics: (scroll top, scroll height, viewport height)
pub(crate) fn scroll_metrics(window: &Window, document: &Document) -> (f64, f64, f64) {
    let top = window.scroll_y().unwrap_or(0.0);
    let height = document
        .document_element()
        .map(|el| el.scroll_height() as f64)
        .unwrap_or(0.0);
    let viewport = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    (top, height, viewport)
}

pub struct WebSurface {
    window: Window,
    document: Document,
    content_id: String,
    loading_id: String,
    error_id: String,
    previous_id: String,
    next_id: String,
    highlight_color: String,
    /// Listeners on the current document's elements, dropped with them
    listeners: Vec<Closure<dyn FnMut(Event)>>,
}

impl WebSurface {
    pub fn new(window: Window, config: &DittoConfig) -> Result<Self, DittoError> {
        let document = window
            .document()
            .ok_or_else(|| DittoError::Dom("window has no document".into()))?;
        if query(&document, &config.content_id).is_none() {
            return Err(DittoError::Dom(format!("missing content element {}", config.content_id)));
        }
        Ok(Self {
            window,
            document,
            content_id: config.content_id.clone(),
            loading_id: config.loading_id.clone(),
            error_id: config.error_id.clone(),
            previous_id: config.previous_id.clone(),
            next_id: config.next_id.clone(),
            highlight_color: config.highlight_color.clone(),
            listeners: Vec::new(),
        })
    }

    fn content(&self) -> Option<Element> {
        query(&self.document, &self.content_id)
    }

    fn toggle(&self, selector: &str, visible: bool) {
        if let Some(element) = query(&self.document, selector) {
            set_visible(&element, visible);
        }
    }

    fn content_all(&self, selector: &str) -> Vec<Element> {
        self.content()
            .map(|content| query_all(&content, selector))
            .unwrap_or_default()
    }

    fn listen<F>(&mut self, target: &Element, event: &str, handler: F)
    where
        F: FnMut(Event) + 'static,
    {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        match target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
            Ok(()) => self.listeners.push(closure),
            Err(e) => console_warn!("[Surface] {} listener: {}", event, super::js_reason(e)),
        }
    }

    fn anchor_link(&mut self, heading: &Element, fragment: String) -> Result<(), DittoError> {
        let link = self.document.create_element("a").map_err(super::dom_err)?;
        link.set_class_name("header-link");
        link.set_attribute("href", &format!("#{}", fragment))
            .map_err(super::dom_err)?;
        link.set_text_content(Some(" ¶"));
        set_visible(&link, false);
        heading.append_child(&link).map_err(super::dom_err)?;

        let shown = link.clone();
        self.listen(heading, "mouseenter", move |_| set_visible(&shown, true));
        let hidden = link.clone();
        self.listen(heading, "mouseleave", move |_| set_visible(&hidden, false));

        let window = self.window.clone();
        self.listen(&link, "click", move |event: Event| {
            event.prevent_default();
            // address bar only; a hashchange would re-fetch the document
            if let Ok(history) = window.history() {
                let url = format!("#{}", fragment);
                let _ = history.push_state_with_url(&JsValue::NULL, "", Some(&url));
            }
        });
        Ok(())
    }

    /// Scoped to the content container, so page chrome sharing the id is skipped.
    /// Slugs never contain quotes or backslashes.
    fn heading_by_id(&self, slug: &str) -> Option<Element> {
        self.content()?
            .query_selector(&format!("[id=\"{}\"]", slug))
            .ok()
            .flatten()
    }
}

impl DocumentSurface for WebSurface {
    fn show_loading(&mut self) {
        self.toggle(&self.loading_id, true);
    }

    fn hide_loading(&mut self) {
        self.toggle(&self.loading_id, false);
    }

    fn clear_content(&mut self) {
        if let Some(content) = self.content() {
            content.set_inner_html("");
        }
        self.listeners.clear();
    }

    fn set_content(&mut self, html: &str) {
        if let Some(content) = self.content() {
            content.set_inner_html(html);
        }
        self.listeners.clear();
    }

    fn show_error(&mut self) {
        self.toggle(&self.error_id, true);
    }

    fn hide_error(&mut self) {
        self.toggle(&self.error_id, false);
    }

    fn title_heading(&self) -> Option<String> {
        self.content_all("h1")
            .first()
            .and_then(|h1| h1.text_content())
    }

    fn set_document_title(&mut self, title: &str) {
        self.document.set_title(title);
    }

    fn image_sources(&self) -> Vec<String> {
        self.content_all("img")
            .iter()
            .map(|img| img.get_attribute("src").unwrap_or_default())
            .collect()
    }

    fn set_image_source(&mut self, index: usize, src: &str) {
        if let Some(img) = self.content_all("img").get(index) {
            let _ = img.set_attribute("src", src);
        }
    }

    fn headings(&self) -> Vec<Heading> {
        self.content_all(HEADING_SELECTOR)
            .iter()
            .filter_map(|el| {
                let level = el.tag_name().get(1..)?.parse::<u8>().ok()?;
                Some(Heading::new(level, el.text_content().unwrap_or_default()))
            })
            .collect()
    }

    fn decorate_headings(&mut self, chapter: &str, sections: &[Section]) {
        let headings = self.content_all(HEADING_SELECTOR);
        for (heading, section) in headings.iter().zip(sections) {
            heading.set_id(&section.slug);
            let _ = heading.class_list().add_1(&section.slug);
            let fragment = Address::new(chapter, Some(section.slug.clone())).to_fragment();
            if let Err(e) = self.anchor_link(heading, fragment) {
                console_warn!("[Surface] {}", e);
            }
        }
    }

    fn install_outline(&mut self, sections: &[&Section]) {
        if let Some(stale) = self.document.get_element_by_id(OUTLINE_ID) {
            stale.remove();
        }
        if sections.is_empty() {
            return;
        }
        let Some(content) = self.content() else {
            return;
        };
        let Ok(list) = self.document.create_element("ul") else {
            return;
        };
        list.set_id(OUTLINE_ID);
        list.set_class_name("content-toc");

        for section in sections {
            let Ok(item) = self.document.create_element("li") else {
                continue;
            };
            item.set_class_name("link");
            item.set_text_content(Some(&section.display_text));
            let _ = item.set_attribute("data-anchor", &section.slug);
            if list.append_child(&item).is_err() {
                continue;
            }

            let slug = section.slug.clone();
            let target = self.heading_by_id(&slug);
            let flash_surface = FlashTarget {
                window: self.window.clone(),
                color: self.highlight_color.clone(),
            };
            self.listen(&item, "click", move |_| {
                if let Some(heading) = &target {
                    smooth_scroll_to(heading);
                    flash_surface.flash(heading);
                }
            });
        }

        let placed = match query_all(&content, "h1").first() {
            Some(h1) => h1.insert_adjacent_element("afterend", &list),
            None => content.insert_adjacent_element("afterbegin", &list),
        };
        if let Err(e) = placed {
            console_warn!("[Surface] outline: {}", super::js_reason(e));
        }
    }

    fn scroll_to_anchor(&mut self, slug: &str) -> bool {
        match self.heading_by_id(slug) {
            Some(heading) => {
                heading.scroll_into_view();
                true
            }
            None => false,
        }
    }

    fn scroll_to_fraction(&mut self, fraction: f64) {
        let (_, height, viewport) = scroll_metrics(&self.window, &self.document);
        self.window
            .scroll_to_with_x_and_y(0.0, scroll_offset(fraction, height, viewport));
    }

    fn set_adjacency(&mut self, previous: Option<&str>, next: Option<&str>) {
        for (selector, target) in [(&self.previous_id, previous), (&self.next_id, next)] {
            let Some(control) = query(&self.document, selector) else {
                continue;
            };
            match target {
                Some(chapter) => {
                    let _ = control.set_attribute("href", &format!("#{}", chapter));
                    set_visible(&control, true);
                }
                None => set_visible(&control, false),
            }
        }
    }

    fn page_url(&self) -> String {
        let href = self.window.location().href().unwrap_or_default();
        match href.split_once('#') {
            Some((base, _)) => base.to_string(),
            None => href,
        }
    }
}

fn smooth_scroll_to(element: &Element) {
    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    options.set_block(ScrollLogicalPosition::Start);
    element.scroll_into_view_with_scroll_into_view_options(&options);
}

/// Colour flash for headings reached from the outline
struct FlashTarget {
    window: Window,
    color: String,
}

impl FlashTarget {
    fn flash(&self, heading: &Element) {
        let Some(html) = heading.dyn_ref::<HtmlElement>().cloned() else {
            return;
        };
        let style = html.style();
        let original = style.get_property_value("color").unwrap_or_default();
        let _ = style.set_property("transition", "color 0.5s");
        let _ = style.set_property("color", &self.color);

        let restore = Closure::once_into_js(move || {
            let _ = html.style().set_property("color", &original);
        });
        let _ = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(restore.unchecked_ref(), FLASH_MS);
    }
}
