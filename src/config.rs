use log::Level;
use serde::{Deserialize, Serialize};

use crate::error::SetupError;

/// Id of the optional inline `<script type="application/json">` block that
/// overrides the built-in selectors and timings.
pub const INLINE_CONFIG_ID: &str = "site-behavior-config";

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug // Verbose while developing locally
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub header_selector: String,
    pub menu_toggle_selector: String,
    pub nav_menu_selector: String,
    pub nav_link_selector: String,
    pub theme_toggle_selector: String,
    /// Vertical offset in pixels past which the header counts as scrolled.
    pub scroll_threshold: f64,
    pub storage_key: String,
    pub theme_attribute: String,
    pub active_class: String,
    pub scrolled_class: String,
    pub hero: HeroConfig,
    pub reveal: RevealStyle,
    pub reveal_groups: Vec<RevealGroupConfig>,
    pub accordion: AccordionConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            header_selector: "#dropnova-lab".to_string(),
            menu_toggle_selector: "#menuToggle".to_string(),
            nav_menu_selector: "#navMenu".to_string(),
            nav_link_selector: ".nav-link".to_string(),
            theme_toggle_selector: "#themeToggle".to_string(),
            scroll_threshold: 50.0,
            storage_key: "dropnova-theme".to_string(),
            theme_attribute: "data-theme".to_string(),
            active_class: "active".to_string(),
            scrolled_class: "scrolled".to_string(),
            hero: HeroConfig::default(),
            reveal: RevealStyle::default(),
            reveal_groups: vec![
                RevealGroupConfig::new("#how-it-works-4-simple-steps", ".step-card", 100),
                RevealGroupConfig::new(
                    "#key-benefits-why-choose-dropshipping",
                    ".benefit-card",
                    80,
                ),
                RevealGroupConfig::new(
                    "#trending-products-market-opportunities",
                    ".product-card",
                    100,
                ),
                RevealGroupConfig::new(
                    "#success-stories-real-results-from-real-entrepreneurs",
                    ".story-card",
                    100,
                ),
            ],
            accordion: AccordionConfig::default(),
        }
    }
}

impl SiteConfig {
    pub fn from_json(raw: &str) -> Result<Self, SetupError> {
        Ok(serde_json::from_str(raw)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroConfig {
    pub section_selector: String,
    pub content_selector: String,
    pub image_selector: String,
    pub delay_ms: u32,
    pub content_transition: String,
    /// Carries its own transition-delay so the image trails the copy.
    pub image_transition: String,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            section_selector: "#build-your-dropshipping-business-effortlessly".to_string(),
            content_selector: ".hero-content".to_string(),
            image_selector: ".hero-image".to_string(),
            delay_ms: 100,
            content_transition: "opacity 0.6s ease-out, transform 0.6s ease-out".to_string(),
            image_transition: "opacity 0.6s ease-out 0.2s, transform 0.6s ease-out 0.2s"
                .to_string(),
        }
    }
}

/// Visual states and observer tuning shared by every reveal group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealStyle {
    pub threshold: f64,
    pub root_margin: String,
    pub hidden_transform: String,
    pub shown_transform: String,
    pub transition: String,
}

impl Default for RevealStyle {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin: "0px 0px -50px 0px".to_string(),
            hidden_transform: "translateY(20px)".to_string(),
            shown_transform: "translateY(0)".to_string(),
            transition: "opacity 0.6s ease-out, transform 0.6s ease-out".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealGroupConfig {
    pub section_selector: String,
    pub item_selector: String,
    pub stagger_ms: u32,
}

impl RevealGroupConfig {
    pub fn new(section_selector: &str, item_selector: &str, stagger_ms: u32) -> Self {
        Self {
            section_selector: section_selector.to_string(),
            item_selector: item_selector.to_string(),
            stagger_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccordionConfig {
    pub item_selector: String,
    pub question_selector: String,
    pub answer_selector: String,
}

impl Default for AccordionConfig {
    fn default() -> Self {
        Self {
            item_selector: ".qa-item".to_string(),
            question_selector: ".qa-question".to_string(),
            answer_selector: ".qa-answer".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_cover_four_reveal_sections() {
        let config = SiteConfig::default();
        let staggers: Vec<u32> = config.reveal_groups.iter().map(|g| g.stagger_ms).collect();
        assert_eq!(staggers, vec![100, 80, 100, 100]);
        assert_eq!(config.scroll_threshold, 50.0);
        assert_eq!(config.storage_key, "dropnova-theme");
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let raw = json!({
            "scroll_threshold": 120.0,
            "hero": { "delay_ms": 250 }
        })
        .to_string();

        let config = SiteConfig::from_json(&raw).unwrap();
        assert_eq!(config.scroll_threshold, 120.0);
        assert_eq!(config.hero.delay_ms, 250);
        assert_eq!(config.hero.content_selector, ".hero-content");
        assert_eq!(config.header_selector, "#dropnova-lab");
        assert_eq!(config.reveal_groups.len(), 4);
    }

    #[test]
    fn replacing_reveal_groups_replaces_the_whole_list() {
        let raw = json!({
            "reveal_groups": [
                { "section_selector": "#faq", "item_selector": ".faq-card", "stagger_ms": 40 }
            ]
        })
        .to_string();

        let config = SiteConfig::from_json(&raw).unwrap();
        assert_eq!(config.reveal_groups, vec![RevealGroupConfig::new("#faq", ".faq-card", 40)]);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = SiteConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SetupError::Config(_)));
    }
}
