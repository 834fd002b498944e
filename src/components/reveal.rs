//! Viewport-triggered fade-in for a group of elements inside one section.
//!
//! Each item starts hidden and is revealed exactly once, the first time it
//! intersects the viewport. Items that become visible in the same observer
//! notification are staggered by their position within that notification.
//! A revealed item is unobserved and never hidden again.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use log::debug;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::Array;
use web_sys::{
    Document, Element, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit,
};

use crate::config::{RevealGroupConfig, RevealStyle};
use crate::dom::{self, Surface};
use crate::error::SetupError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledReveal {
    pub index: usize,
    pub delay_ms: u32,
}

pub struct RevealGroup<E> {
    items: Vec<E>,
    stagger_ms: u32,
    style: RevealStyle,
    revealed: RefCell<Vec<bool>>,
}

impl<E: Surface> RevealGroup<E> {
    pub fn new(items: Vec<E>, stagger_ms: u32, style: RevealStyle) -> Self {
        let revealed = RefCell::new(vec![false; items.len()]);
        Self {
            items,
            stagger_ms,
            style,
            revealed,
        }
    }

    /// `None` for an empty group: nothing to hide and nothing to observe.
    pub fn non_empty(items: Vec<E>, stagger_ms: u32, style: RevealStyle) -> Option<Self> {
        if items.is_empty() {
            None
        } else {
            Some(Self::new(items, stagger_ms, style))
        }
    }

    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed.borrow().get(index).copied().unwrap_or(false)
    }

    /// Puts every item in its pre-animation state. Must run before the
    /// observer is registered so final-state content never flashes.
    pub fn hide_all(&self) {
        for item in &self.items {
            item.set_style("opacity", "0");
            item.set_style("transform", &self.style.hidden_transform);
            item.set_style("transition", &self.style.transition);
        }
    }

    /// Claims the newly intersecting items of one notification, in delivery
    /// order. Already revealed or unknown indices are skipped and do not
    /// consume a stagger slot.
    pub fn plan_batch<I>(&self, intersecting: I) -> Vec<ScheduledReveal>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut revealed = self.revealed.borrow_mut();
        let mut plan = Vec::new();
        for index in intersecting {
            match revealed.get_mut(index) {
                Some(done) if !*done => {
                    *done = true;
                    let position = u32::try_from(plan.len()).unwrap_or(u32::MAX);
                    plan.push(ScheduledReveal {
                        index,
                        delay_ms: self.stagger_ms.saturating_mul(position),
                    });
                }
                _ => {}
            }
        }
        plan
    }

    pub fn reveal(&self, index: usize) {
        if let Some(item) = self.items.get(index) {
            item.set_style("opacity", "1");
            item.set_style("transform", &self.style.shown_transform);
        }
    }
}

pub type BrowserRevealGroup = RevealGroup<HtmlElement>;

/// Sets up one section. Missing sections and empty item lists are not errors:
/// no observer is registered for them.
pub fn wire(
    document: &Document,
    group: &RevealGroupConfig,
    style: &RevealStyle,
) -> Result<(), SetupError> {
    let Some(section) = dom::query(document, &group.section_selector)? else {
        debug!("Reveal section {} not on this page", group.section_selector);
        return Ok(());
    };

    let items = dom::query_all_within(&section, &group.item_selector)?;
    let Some(reveal_group) = RevealGroup::non_empty(items, group.stagger_ms, style.clone()) else {
        debug!("No {} items in {}", group.item_selector, group.section_selector);
        return Ok(());
    };

    let reveal_group = Rc::new(reveal_group);
    reveal_group.hide_all();

    let callback = {
        let reveal_group = reveal_group.clone();
        Closure::wrap(Box::new(move |entries: Array, observer: IntersectionObserver| {
            on_intersection(&reveal_group, &entries, &observer);
        }) as Box<dyn FnMut(Array, IntersectionObserver)>)
    };

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(style.threshold));
    options.set_root_margin(&style.root_margin);
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
    callback.forget();

    for item in reveal_group.items() {
        observer.observe(item);
    }
    debug!(
        "Observing {} {} items in {}",
        reveal_group.items().len(),
        group.item_selector,
        group.section_selector
    );
    Ok(())
}

fn on_intersection(
    group: &Rc<BrowserRevealGroup>,
    entries: &Array,
    observer: &IntersectionObserver,
) {
    let mut intersecting = Vec::new();
    for entry in entries.iter() {
        let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
            continue;
        };
        if !entry.is_intersecting() {
            continue;
        }
        let target = entry.target();
        observer.unobserve(&target);
        if let Some(index) = position_of(group.items(), &target) {
            intersecting.push(index);
        }
    }

    for scheduled in group.plan_batch(intersecting) {
        let group = group.clone();
        Timeout::new(scheduled.delay_ms, move || group.reveal(scheduled.index)).forget();
    }
}

fn position_of(items: &[HtmlElement], target: &Element) -> Option<usize> {
    items.iter().position(|item| {
        let element: &Element = item.as_ref();
        element == target
    })
}
