//! Thin seams over the browser: element surfaces, the preference store and
//! the query/listener helpers every controller wires itself through.

use std::rc::Rc;

use log::warn;
use wasm_bindgen::closure::{Closure, WasmClosure};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, NodeList, Node, Window};

use crate::error::SetupError;

const DARK_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";

/// The parts of an element the controllers read and write.
pub trait Surface {
    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);
    fn has_class(&self, class: &str) -> bool;
    fn attribute(&self, name: &str) -> Option<String>;
    fn set_attribute(&self, name: &str, value: &str);
    fn remove_attribute(&self, name: &str);
    fn set_style(&self, property: &str, value: &str);
    fn style(&self, property: &str) -> String;
}

impl<S: Surface + ?Sized> Surface for Rc<S> {
    fn add_class(&self, class: &str) {
        (**self).add_class(class)
    }
    fn remove_class(&self, class: &str) {
        (**self).remove_class(class)
    }
    fn has_class(&self, class: &str) -> bool {
        (**self).has_class(class)
    }
    fn attribute(&self, name: &str) -> Option<String> {
        (**self).attribute(name)
    }
    fn set_attribute(&self, name: &str, value: &str) {
        (**self).set_attribute(name, value)
    }
    fn remove_attribute(&self, name: &str) {
        (**self).remove_attribute(name)
    }
    fn set_style(&self, property: &str, value: &str) {
        (**self).set_style(property, value)
    }
    fn style(&self, property: &str) -> String {
        (**self).style(property)
    }
}

impl Surface for HtmlElement {
    fn add_class(&self, class: &str) {
        if let Err(err) = self.class_list().add_1(class) {
            warn!("Failed to add class {}: {:?}", class, err);
        }
    }

    fn remove_class(&self, class: &str) {
        if let Err(err) = self.class_list().remove_1(class) {
            warn!("Failed to remove class {}: {:?}", class, err);
        }
    }

    fn has_class(&self, class: &str) -> bool {
        self.class_list().contains(class)
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.get_attribute(name)
    }

    fn set_attribute(&self, name: &str, value: &str) {
        if let Err(err) = Element::set_attribute(self, name, value) {
            warn!("Failed to set attribute {}: {:?}", name, err);
        }
    }

    fn remove_attribute(&self, name: &str) {
        if let Err(err) = Element::remove_attribute(self, name) {
            warn!("Failed to remove attribute {}: {:?}", name, err);
        }
    }

    fn set_style(&self, property: &str, value: &str) {
        if let Err(err) = HtmlElement::style(self).set_property(property, value) {
            warn!("Failed to set style {}: {:?}", property, err);
        }
    }

    fn style(&self, property: &str) -> String {
        HtmlElement::style(self)
            .get_property_value(property)
            .unwrap_or_default()
    }
}

/// Durable key/value preferences plus the platform color-scheme signal.
pub trait PreferenceStore {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &str, value: &str);
    fn prefers_dark(&self) -> bool;
}

impl<P: PreferenceStore + ?Sized> PreferenceStore for Rc<P> {
    fn read(&self, key: &str) -> Option<String> {
        (**self).read(key)
    }
    fn write(&self, key: &str, value: &str) {
        (**self).write(key, value)
    }
    fn prefers_dark(&self) -> bool {
        (**self).prefers_dark()
    }
}

/// `localStorage` and `matchMedia` on the live window. Either may be missing
/// (private browsing, sandboxed iframes); both degrade to "no signal".
pub struct BrowserPreferences {
    window: Window,
}

impl BrowserPreferences {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl PreferenceStore for BrowserPreferences {
    fn read(&self, key: &str) -> Option<String> {
        self.window
            .local_storage()
            .ok()
            .flatten()
            .and_then(|storage| storage.get_item(key).ok().flatten())
    }

    fn write(&self, key: &str, value: &str) {
        match self.window.local_storage() {
            Ok(Some(storage)) => {
                if let Err(err) = storage.set_item(key, value) {
                    warn!("Failed to persist {}: {:?}", key, err);
                }
            }
            _ => warn!("localStorage unavailable, {} not persisted", key),
        }
    }

    fn prefers_dark(&self) -> bool {
        self.window
            .match_media(DARK_SCHEME_QUERY)
            .ok()
            .flatten()
            .map(|query| query.matches())
            .unwrap_or(false)
    }
}

pub fn window() -> Result<Window, SetupError> {
    web_sys::window().ok_or(SetupError::MissingWindow)
}

pub fn document() -> Result<Document, SetupError> {
    window()?.document().ok_or(SetupError::MissingDocument)
}

pub fn query(document: &Document, selector: &str) -> Result<Option<HtmlElement>, SetupError> {
    Ok(document
        .query_selector(selector)?
        .and_then(|el| el.dyn_into::<HtmlElement>().ok()))
}

pub fn query_all(document: &Document, selector: &str) -> Result<Vec<HtmlElement>, SetupError> {
    Ok(html_elements(&document.query_selector_all(selector)?))
}

pub fn query_within(root: &Element, selector: &str) -> Result<Option<HtmlElement>, SetupError> {
    Ok(root
        .query_selector(selector)?
        .and_then(|el| el.dyn_into::<HtmlElement>().ok()))
}

pub fn query_all_within(root: &Element, selector: &str) -> Result<Vec<HtmlElement>, SetupError> {
    Ok(html_elements(&root.query_selector_all(selector)?))
}

fn html_elements(list: &NodeList) -> Vec<HtmlElement> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect()
}

/// Closest inclusive ancestor of the event target matching `selector`.
/// Text-node targets are resolved through their parent element.
pub fn closest_to_target(event: &Event, selector: &str) -> Option<Element> {
    let target = event.target()?;
    let element = match target.dyn_into::<Element>() {
        Ok(element) => element,
        Err(other) => other.dyn_into::<Node>().ok()?.parent_element()?,
    };
    element.closest(selector).ok().flatten()
}

/// Registers a listener for the lifetime of the page.
pub fn listen<T>(target: &EventTarget, event: &str, callback: Closure<T>) -> Result<(), SetupError>
where
    T: ?Sized + WasmClosure,
{
    target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
    callback.forget();
    Ok(())
}
