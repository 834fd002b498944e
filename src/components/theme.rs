use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use log::{debug, info};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, MouseEvent, Window};

use crate::config::SiteConfig;
use crate::dom::{self, BrowserPreferences, PreferenceStore, Surface};
use crate::error::SetupError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Only the two literal stored values are recognised.
    pub fn parse(value: &str) -> Option<Theme> {
        match value {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owns the active theme. Every apply writes the document attribute and the
/// stored preference.
pub struct ThemeController<P, E> {
    store: P,
    root: E,
    storage_key: String,
    attribute: String,
    current: Cell<Theme>,
}

impl<P: PreferenceStore, E: Surface> ThemeController<P, E> {
    pub fn new(store: P, root: E, storage_key: &str, attribute: &str) -> Self {
        Self {
            store,
            root,
            storage_key: storage_key.to_string(),
            attribute: attribute.to_string(),
            current: Cell::new(Theme::Light),
        }
    }

    pub fn current(&self) -> Theme {
        self.current.get()
    }

    /// Stored preference, else the system dark-mode signal, else light.
    pub fn load(&self) -> Theme {
        let stored = self
            .store
            .read(&self.storage_key)
            .and_then(|value| Theme::parse(&value));
        let theme = match stored {
            Some(theme) => theme,
            None if self.store.prefers_dark() => Theme::Dark,
            None => Theme::Light,
        };
        self.apply(theme);
        theme
    }

    pub fn apply(&self, theme: Theme) {
        self.root.set_attribute(&self.attribute, theme.as_str());
        self.current.set(theme);
        self.store.write(&self.storage_key, theme.as_str());
        debug!("Applied {} theme", theme);
    }

    pub fn toggle(&self) -> Theme {
        let next = self.current.get().toggled();
        self.apply(next);
        next
    }
}

pub type BrowserTheme = ThemeController<BrowserPreferences, HtmlElement>;

/// Resolves and applies the initial theme on the document root.
pub fn wire(
    window: &Window,
    document: &Document,
    config: &SiteConfig,
) -> Result<Rc<BrowserTheme>, SetupError> {
    let root = document
        .document_element()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        .ok_or(SetupError::MissingDocument)?;

    let controller = Rc::new(ThemeController::new(
        BrowserPreferences::new(window.clone()),
        root,
        &config.storage_key,
        &config.theme_attribute,
    ));
    let theme = controller.load();
    info!("Initial theme: {}", theme);
    Ok(controller)
}

pub fn wire_toggle(
    document: &Document,
    config: &SiteConfig,
    controller: Rc<BrowserTheme>,
) -> Result<(), SetupError> {
    let Some(button) = dom::query(document, &config.theme_toggle_selector)? else {
        debug!("No theme toggle on this page");
        return Ok(());
    };

    let on_click = Closure::wrap(Box::new(move |_: MouseEvent| {
        controller.toggle();
    }) as Box<dyn FnMut(MouseEvent)>);
    dom::listen(&button, "click", on_click)
}
