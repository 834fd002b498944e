use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::dom::{PreferenceStore, Surface};

/// In-memory element that records what the controllers wrote to it.
#[derive(Default)]
pub struct FakeElement {
    classes: RefCell<BTreeSet<String>>,
    attributes: RefCell<BTreeMap<String, String>>,
    styles: RefCell<BTreeMap<String, String>>,
    writes: Cell<usize>,
}

impl FakeElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attribute(self, name: &str, value: &str) -> Self {
        self.attributes
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
        self
    }

    /// Number of mutating calls received so far.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    fn touch(&self) {
        self.writes.set(self.writes.get() + 1);
    }
}

impl Surface for FakeElement {
    fn add_class(&self, class: &str) {
        self.touch();
        self.classes.borrow_mut().insert(class.to_string());
    }

    fn remove_class(&self, class: &str) {
        self.touch();
        self.classes.borrow_mut().remove(class);
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.borrow().contains(class)
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.borrow().get(name).cloned()
    }

    fn set_attribute(&self, name: &str, value: &str) {
        self.touch();
        self.attributes
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
    }

    fn remove_attribute(&self, name: &str) {
        self.touch();
        self.attributes.borrow_mut().remove(name);
    }

    fn set_style(&self, property: &str, value: &str) {
        self.touch();
        let mut styles = self.styles.borrow_mut();
        if value.is_empty() {
            styles.remove(property);
        } else {
            styles.insert(property.to_string(), value.to_string());
        }
    }

    fn style(&self, property: &str) -> String {
        self.styles.borrow().get(property).cloned().unwrap_or_default()
    }
}

#[derive(Default)]
pub struct MemoryPreferences {
    values: RefCell<HashMap<String, String>>,
    dark: bool,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn preferring_dark() -> Self {
        Self {
            dark: true,
            ..Self::default()
        }
    }
}

impl PreferenceStore for MemoryPreferences {
    fn read(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn prefers_dark(&self) -> bool {
        self.dark
    }
}
