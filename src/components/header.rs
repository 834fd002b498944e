use std::cell::Cell;
use std::rc::Rc;

use log::{debug, warn};
use wasm_bindgen::closure::Closure;
use web_sys::{Document, Window};

use crate::config::SiteConfig;
use crate::dom::{self, Surface};
use crate::error::SetupError;

/// Two-state header styling: plain below the threshold, scrolled above it.
/// The stored flag guards the class so scroll events inside one state never
/// touch the DOM.
pub struct HeaderController<E> {
    header: E,
    threshold: f64,
    class: String,
    scrolled: Cell<bool>,
}

impl<E: Surface> HeaderController<E> {
    pub fn new(header: E, threshold: f64, class: &str) -> Self {
        Self {
            header,
            threshold,
            class: class.to_string(),
            scrolled: Cell::new(false),
        }
    }

    pub fn is_scrolled(&self) -> bool {
        self.scrolled.get()
    }

    /// Returns true when the offset moved the header into the other state.
    pub fn on_scroll(&self, offset: f64) -> bool {
        let past_threshold = offset > self.threshold;
        if past_threshold == self.scrolled.get() {
            return false;
        }

        if past_threshold {
            self.header.add_class(&self.class);
        } else {
            self.header.remove_class(&self.class);
        }
        self.scrolled.set(past_threshold);
        true
    }
}

pub fn wire(window: &Window, document: &Document, config: &SiteConfig) -> Result<(), SetupError> {
    let Some(header) = dom::query(document, &config.header_selector)? else {
        debug!("No header matching {}", config.header_selector);
        return Ok(());
    };

    let controller = Rc::new(HeaderController::new(
        header,
        config.scroll_threshold,
        &config.scrolled_class,
    ));

    // A reload can restore a scrolled position before any scroll event fires.
    if let Ok(offset) = window.scroll_y() {
        controller.on_scroll(offset);
    }

    let scroll_window = window.clone();
    let on_scroll = Closure::wrap(Box::new(move || match scroll_window.scroll_y() {
        Ok(offset) => {
            controller.on_scroll(offset);
        }
        Err(err) => warn!("Could not read scroll offset: {:?}", err),
    }) as Box<dyn FnMut()>);
    dom::listen(window, "scroll", on_scroll)
}
