use std::cell::Cell;

use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Document, Event, Window};

pub mod config;
pub mod dom;
pub mod error;
pub mod components {
    pub mod theme;
    pub mod header;
    pub mod menu;
    pub mod anchor;
    pub mod hero;
    pub mod reveal;
    pub mod accordion;
}
#[cfg(test)]
mod testing;

use components::{accordion, anchor, header, hero, menu, reveal, theme};
use config::{SiteConfig, INLINE_CONFIG_ID};
use error::SetupError;

thread_local! {
    static INITIALIZED: Cell<bool> = Cell::new(false);
}

/// Runs `initialize` once the document is interactive.
pub fn start() {
    let document = match dom::document() {
        Ok(document) => document,
        Err(err) => {
            warn!("Site behavior not started: {}", err);
            return;
        }
    };

    if document.ready_state() != "loading" {
        initialize();
        return;
    }

    let on_ready = Closure::wrap(Box::new(move |_: Event| initialize()) as Box<dyn FnMut(Event)>);
    let options = AddEventListenerOptions::new();
    options.set_once(true);
    let registered = document.add_event_listener_with_callback_and_add_event_listener_options(
        "DOMContentLoaded",
        on_ready.as_ref().unchecked_ref(),
        &options,
    );
    match registered {
        Ok(()) => on_ready.forget(),
        Err(err) => warn!("Could not wait for DOMContentLoaded: {:?}", err),
    }
}

/// Wires every controller using the inline JSON config when the page has
/// one, the built-in defaults otherwise.
#[wasm_bindgen]
pub fn initialize() {
    let raw = dom::document().ok().and_then(|document| {
        document
            .get_element_by_id(INLINE_CONFIG_ID)
            .and_then(|script| script.text_content())
    });
    initialize_with_config(&config_from_inline(raw));
}

/// JS entry taking a (possibly partial) config object.
#[wasm_bindgen(js_name = initializeWith)]
pub fn initialize_with(config: JsValue) -> Result<(), JsValue> {
    let config: SiteConfig = serde_wasm_bindgen::from_value(config)
        .map_err(SetupError::from)
        .map_err(|err| JsValue::from_str(&err.to_string()))?;
    initialize_with_config(&config);
    Ok(())
}

pub fn initialize_with_config(config: &SiteConfig) {
    if !claim_initialization() {
        warn!("Site behavior already initialized; ignoring repeat call");
        return;
    }

    let (window, document) = match dom::window().and_then(|window| {
        let document = window.document().ok_or(SetupError::MissingDocument)?;
        Ok((window, document))
    }) {
        Ok(pair) => pair,
        Err(err) => {
            warn!("Site behavior not initialized: {}", err);
            return;
        }
    };

    wire_all(&window, &document, config);
    info!("Site behavior initialized");
}

fn wire_all(window: &Window, document: &Document, config: &SiteConfig) {
    let theme = theme::wire(window, document, config)
        .map_err(|err| warn!("Setup of theme failed: {}", err))
        .ok();

    report("header", header::wire(window, document, config));

    let menu = menu::wire(document, config)
        .map_err(|err| warn!("Setup of menu failed: {}", err))
        .ok()
        .flatten();

    if let Some(theme) = theme {
        report("theme toggle", theme::wire_toggle(document, config, theme));
    }
    report("anchor scroll", anchor::wire(window, document, config, menu));

    report("hero", hero::wire(document, &config.hero, &config.reveal));
    for group in &config.reveal_groups {
        report(&group.section_selector, reveal::wire(document, group, &config.reveal));
    }

    report("accordion", accordion::wire(document, &config.accordion));
}

fn report<T>(part: &str, result: Result<T, SetupError>) {
    if let Err(err) = result {
        warn!("Setup of {} failed: {}", part, err);
    }
}

/// True for the first caller only.
fn claim_initialization() -> bool {
    !INITIALIZED.with(|flag| flag.replace(true))
}

/// Inline config when present and valid, the defaults otherwise.
fn config_from_inline(raw: Option<String>) -> SiteConfig {
    let Some(raw) = raw else {
        return SiteConfig::default();
    };
    match SiteConfig::from_json(&raw) {
        Ok(config) => config,
        Err(err) => {
            warn!("Ignoring inline config: {}", err);
            SiteConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialization_is_claimed_once() {
        assert!(claim_initialization());
        assert!(!claim_initialization());
        assert!(!claim_initialization());
    }

    #[test]
    fn absent_inline_config_uses_defaults() {
        assert_eq!(config_from_inline(None), SiteConfig::default());
    }

    #[test]
    fn inline_config_overrides_selected_fields() {
        let raw = r##"{ "scroll_threshold": 80, "theme_toggle_selector": "#mode" }"##;
        let config = config_from_inline(Some(raw.to_string()));

        assert_eq!(config.scroll_threshold, 80.0);
        assert_eq!(config.theme_toggle_selector, "#mode");
        assert_eq!(config.storage_key, SiteConfig::default().storage_key);
    }

    #[test]
    fn malformed_inline_config_falls_back_to_defaults() {
        let config = config_from_inline(Some("{ \"scroll_threshold\": ".to_string()));
        assert_eq!(config, SiteConfig::default());
    }
}
