use std::rc::Rc;

use log::debug;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, MouseEvent, ScrollBehavior, ScrollToOptions, Window};

use crate::components::menu::{BrowserMenu, MenuController};
use crate::config::SiteConfig;
use crate::dom::{self, Surface};
use crate::error::SetupError;

const SAME_PAGE_LINK: &str = "a[href^=\"#\"]";

#[derive(Debug, Clone, PartialEq)]
pub enum Navigation {
    /// Not a same-page link; the browser handles it.
    Ignore,
    /// Same-page link whose fragment names no element.
    NoTarget,
    ScrollTo(f64),
}

/// Element id named by a same-page href. Bare `#` names nothing.
pub fn fragment_id(href: &str) -> Option<String> {
    let raw = href.strip_prefix('#').filter(|rest| !rest.is_empty())?;
    let id = urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw.to_string());
    Some(id)
}

/// Scroll destination that keeps the target clear of the fixed header.
pub fn scroll_offset(target_top: f64, header_height: f64) -> f64 {
    target_top - header_height
}

/// Decides what a click on `href` does. Closes an open menu for every
/// same-page link, found or not. `locate` returns the document-relative top
/// of the element with the given id.
pub fn route<E, F>(
    href: &str,
    menu: Option<&MenuController<E>>,
    header_height: f64,
    locate: F,
) -> Navigation
where
    E: Surface,
    F: FnOnce(&str) -> Option<f64>,
{
    let Some(id) = fragment_id(href) else {
        return Navigation::Ignore;
    };

    if let Some(menu) = menu.filter(|menu| menu.is_open()) {
        menu.close();
    }

    match locate(&id) {
        Some(top) => Navigation::ScrollTo(scroll_offset(top, header_height)),
        None => Navigation::NoTarget,
    }
}

pub fn wire(
    window: &Window,
    document: &Document,
    config: &SiteConfig,
    menu: Option<Rc<BrowserMenu>>,
) -> Result<(), SetupError> {
    let window = window.clone();
    let document_ref = document.clone();
    let header_selector = config.header_selector.clone();

    let on_click = Closure::wrap(Box::new(move |e: MouseEvent| {
        let Some(link) = dom::closest_to_target(&e, SAME_PAGE_LINK) else {
            return;
        };
        let href = link.get_attribute("href").unwrap_or_default();

        // Measured per click: responsive layout and the scrolled state both
        // change the header's height.
        let header_height = dom::query(&document_ref, &header_selector)
            .ok()
            .flatten()
            .map(|header| f64::from(header.offset_height()))
            .unwrap_or(0.0);

        let scroll_y = window.scroll_y().unwrap_or(0.0);
        let navigation = route(&href, menu.as_deref(), header_height, |id| {
            document_ref
                .get_element_by_id(id)
                .map(|target| target.get_bounding_client_rect().top() + scroll_y)
        });

        match navigation {
            Navigation::Ignore => {}
            Navigation::NoTarget => {
                e.prevent_default();
                debug!("No element for {}", href);
            }
            Navigation::ScrollTo(top) => {
                e.prevent_default();
                let options = ScrollToOptions::new();
                options.set_top(top);
                options.set_behavior(ScrollBehavior::Smooth);
                window.scroll_to_with_scroll_to_options(&options);
            }
        }
    }) as Box<dyn FnMut(MouseEvent)>);

    dom::listen(document, "click", on_click)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeElement;

    fn open_menu() -> MenuController<Rc<FakeElement>> {
        let menu = MenuController::new(
            Rc::new(FakeElement::new()),
            Rc::new(FakeElement::new()),
            Rc::new(FakeElement::new()),
            "active",
        );
        menu.open();
        menu
    }

    #[test]
    fn bare_hash_and_external_links_are_ignored() {
        let none: Option<&MenuController<FakeElement>> = None;
        assert_eq!(route("#", none, 0.0, |_| Some(10.0)), Navigation::Ignore);
        assert_eq!(route("/pricing", none, 0.0, |_| Some(10.0)), Navigation::Ignore);
        assert_eq!(fragment_id(""), None);
    }

    #[test]
    fn missing_target_is_a_silent_no_op() {
        let menu = open_menu();
        let navigation = route("#nonexistent-id", Some(&menu), 80.0, |_| None);

        assert_eq!(navigation, Navigation::NoTarget);
        assert!(!menu.is_open());
    }

    #[test]
    fn offset_subtracts_header_height() {
        let none: Option<&MenuController<FakeElement>> = None;
        let navigation = route("#pricing", none, 72.0, |id| {
            assert_eq!(id, "pricing");
            Some(1200.0)
        });
        assert_eq!(navigation, Navigation::ScrollTo(1128.0));
    }

    #[test]
    fn absent_header_means_zero_offset() {
        assert_eq!(scroll_offset(640.0, 0.0), 640.0);
    }

    #[test]
    fn open_menu_closes_before_scrolling() {
        let menu = open_menu();
        let navigation = route("#faq", Some(&menu), 0.0, |_| Some(300.0));

        assert_eq!(navigation, Navigation::ScrollTo(300.0));
        assert!(!menu.is_open());
    }

    #[test]
    fn fragment_is_percent_decoded() {
        assert_eq!(fragment_id("#caf%C3%A9").as_deref(), Some("café"));
        assert_eq!(fragment_id("#how-it-works").as_deref(), Some("how-it-works"));
    }
}
