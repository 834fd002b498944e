use std::cell::Cell;
use std::rc::Rc;

use log::debug;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, HtmlElement, KeyboardEvent, MouseEvent};

use crate::config::SiteConfig;
use crate::dom::{self, Surface};
use crate::error::SetupError;

/// Mobile navigation panel. The `open` flag is the only source of truth;
/// toggle class, panel class, `aria-expanded` and the body scroll lock are
/// all rewritten from it on every transition.
pub struct MenuController<E> {
    toggle: E,
    panel: E,
    body: E,
    active_class: String,
    open: Cell<bool>,
}

impl<E: Surface> MenuController<E> {
    pub fn new(toggle: E, panel: E, body: E, active_class: &str) -> Self {
        Self {
            toggle,
            panel,
            body,
            active_class: active_class.to_string(),
            open: Cell::new(false),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    pub fn open(&self) {
        self.open.set(true);
        self.toggle.add_class(&self.active_class);
        self.panel.add_class(&self.active_class);
        self.toggle.set_attribute("aria-expanded", "true");
        self.body.set_style("overflow", "hidden");
        debug!("Menu opened");
    }

    pub fn close(&self) {
        self.open.set(false);
        self.toggle.remove_class(&self.active_class);
        self.panel.remove_class(&self.active_class);
        self.toggle.set_attribute("aria-expanded", "false");
        self.body.set_style("overflow", "");
    }

    pub fn toggle(&self) {
        if self.open.get() {
            self.close();
        } else {
            self.open();
        }
    }

    /// Any click landing outside the header closes the panel.
    pub fn on_document_click(&self, inside_header: bool) {
        if !inside_header {
            self.close();
        }
    }

    pub fn on_key(&self, key: &str) {
        if is_close_key(key) {
            self.close();
        }
    }

    pub fn on_nav_link(&self) {
        self.close();
    }
}

fn is_close_key(key: &str) -> bool {
    key == "Escape"
}

pub type BrowserMenu = MenuController<HtmlElement>;

/// Returns `None` when the page has no toggle/panel pair.
pub fn wire(
    document: &Document,
    config: &SiteConfig,
) -> Result<Option<Rc<BrowserMenu>>, SetupError> {
    let toggle = dom::query(document, &config.menu_toggle_selector)?;
    let panel = dom::query(document, &config.nav_menu_selector)?;
    let (Some(toggle), Some(panel), Some(body)) = (toggle, panel, document.body()) else {
        debug!("No mobile menu on this page");
        return Ok(None);
    };

    let links = dom::query_all_within(&panel, &config.nav_link_selector)?;
    let menu = Rc::new(MenuController::new(
        toggle.clone(),
        panel,
        body,
        &config.active_class,
    ));

    let on_toggle = {
        let menu = menu.clone();
        Closure::wrap(Box::new(move |_: MouseEvent| menu.toggle()) as Box<dyn FnMut(MouseEvent)>)
    };
    dom::listen(&toggle, "click", on_toggle)?;

    for link in &links {
        let menu = menu.clone();
        let on_link = Closure::wrap(Box::new(move |_: MouseEvent| {
            menu.on_nav_link();
        }) as Box<dyn FnMut(MouseEvent)>);
        dom::listen(link, "click", on_link)?;
    }

    let on_outside = {
        let menu = menu.clone();
        let header_selector = config.header_selector.clone();
        Closure::wrap(Box::new(move |e: MouseEvent| {
            menu.on_document_click(dom::closest_to_target(&e, &header_selector).is_some());
        }) as Box<dyn FnMut(MouseEvent)>)
    };
    dom::listen(document, "click", on_outside)?;

    let on_key = {
        let menu = menu.clone();
        Closure::wrap(Box::new(move |e: KeyboardEvent| {
            menu.on_key(&e.key());
        }) as Box<dyn FnMut(KeyboardEvent)>)
    };
    dom::listen(document, "keydown", on_key)?;

    debug!("Menu wired with {} nav links", links.len());
    Ok(Some(menu))
}
