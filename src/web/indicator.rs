//! Pulsing loading indicator driven by `setInterval`

use std::collections::HashMap;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, Window};

use crate::router::host::{LoadingIndicator, TimerHandle};

/// Toggle period; the CSS transition makes each half a fade
const PULSE_MS: i32 = 1000;

pub struct PulseIndicator {
    window: Window,
    document: Document,
    selector: String,
    /// Interval callbacks, kept alive until cancelled
    pulses: HashMap<i32, Closure<dyn FnMut()>>,
}

impl PulseIndicator {
    pub fn new(window: Window, document: Document, selector: impl Into<String>) -> Self {
        Self {
            window,
            document,
            selector: selector.into(),
            pulses: HashMap::new(),
        }
    }

    fn element(&self) -> Option<HtmlElement> {
        self.document
            .query_selector(&self.selector)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    }

    pub fn active(&self) -> usize {
        self.pulses.len()
    }
}

impl LoadingIndicator for PulseIndicator {
    fn start(&mut self) -> TimerHandle {
        let Some(element) = self.element() else {
            return TimerHandle(-1);
        };
        let style = element.style();
        let _ = style.set_property("transition", "opacity 1s");
        let _ = style.set_property("opacity", "1");

        let mut faded = false;
        let pulse = Closure::wrap(Box::new(move || {
            faded = !faded;
            let _ = element
                .style()
                .set_property("opacity", if faded { "0.2" } else { "1" });
        }) as Box<dyn FnMut()>);

        match self
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(pulse.as_ref().unchecked_ref(), PULSE_MS)
        {
            Ok(id) => {
                self.pulses.insert(id, pulse);
                TimerHandle(id)
            }
            Err(e) => {
                console_warn!("[Loading] setInterval failed: {}", super::js_reason(e));
                TimerHandle(-1)
            }
        }
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if self.pulses.remove(&handle.0).is_some() {
            self.window.clear_interval_with_handle(handle.0);
        }
        if let Some(element) = self.element() {
            let _ = element.style().set_property("opacity", "1");
        }
    }
}
