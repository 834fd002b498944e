use std::rc::Rc;

use gloo_timers::callback::Timeout;
use log::debug;
use web_sys::{Document, HtmlElement};

use crate::config::{HeroConfig, RevealStyle};
use crate::dom::{self, Surface};
use crate::error::SetupError;

/// Load-time fade for the hero copy and image. Unlike the section reveals it
/// runs on a fixed timer since the hero is always in the first viewport.
pub struct HeroFade<E> {
    content: Option<E>,
    image: Option<E>,
    config: HeroConfig,
    hidden_transform: String,
    shown_transform: String,
}

impl<E: Surface> HeroFade<E> {
    pub fn new(
        content: Option<E>,
        image: Option<E>,
        config: &HeroConfig,
        style: &RevealStyle,
    ) -> Self {
        Self {
            content,
            image,
            config: config.clone(),
            hidden_transform: style.hidden_transform.clone(),
            shown_transform: style.shown_transform.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.image.is_none()
    }

    pub fn hide(&self) {
        for element in self.content.iter().chain(self.image.iter()) {
            element.set_style("opacity", "0");
            element.set_style("transform", &self.hidden_transform);
        }
    }

    pub fn show(&self) {
        if let Some(content) = &self.content {
            self.show_with(content, &self.config.content_transition);
        }
        if let Some(image) = &self.image {
            self.show_with(image, &self.config.image_transition);
        }
    }

    fn show_with(&self, element: &E, transition: &str) {
        element.set_style("transition", transition);
        element.set_style("opacity", "1");
        element.set_style("transform", &self.shown_transform);
    }
}

pub fn wire(
    document: &Document,
    config: &HeroConfig,
    style: &RevealStyle,
) -> Result<(), SetupError> {
    let Some(section) = dom::query(document, &config.section_selector)? else {
        debug!("No hero section on this page");
        return Ok(());
    };

    let content = dom::query_within(&section, &config.content_selector)?;
    let image = dom::query_within(&section, &config.image_selector)?;
    let hero: Rc<HeroFade<HtmlElement>> = Rc::new(HeroFade::new(content, image, config, style));
    if hero.is_empty() {
        debug!("No hero content or image to fade");
        return Ok(());
    }

    hero.hide();
    Timeout::new(config.delay_ms, move || hero.show()).forget();
    Ok(())
}
