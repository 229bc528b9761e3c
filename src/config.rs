use serde::Deserialize;

use crate::dom::Dom;
use crate::{Error, Result};

/// `<meta name="enhancer-config" content='{...}'>` carries page-level overrides.
pub(crate) const CONFIG_META_NAME: &str = "enhancer-config";

/// Which optional passes run at boot and how the enhancer finds its targets.
///
/// Every field has a default, so a page may override only what it needs:
///
/// ```
/// use portal_enhancer::EnhancerConfig;
///
/// let config = EnhancerConfig::from_json(r#"{"tableSearch": true}"#).unwrap();
/// assert!(config.table_search);
/// assert!(config.button_effects);
/// assert_eq!(config.timings.alert_auto_hide_ms, 5000);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct EnhancerConfig {
    pub button_effects: bool,
    pub grade_validation: bool,
    pub table_search: bool,
    pub console_banner: bool,
    /// Buttons matching this selector get hover lift and press pulse.
    pub button_selector: String,
    /// Forms carrying this attribute keep their submit button untouched.
    pub loading_opt_out_attr: String,
    /// Visible fraction at which a section is revealed by the viewport observer.
    pub reveal_threshold: f64,
    pub timings: Timings,
}

impl Default for EnhancerConfig {
    fn default() -> Self {
        Self {
            button_effects: true,
            grade_validation: true,
            table_search: false,
            console_banner: true,
            button_selector: ".btn".to_string(),
            loading_opt_out_attr: "data-no-loading".to_string(),
            reveal_threshold: 0.1,
            timings: Timings::default(),
        }
    }
}

/// Delays and transition durations, all in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Timings {
    pub section_stagger_ms: i64,
    pub section_transition_ms: i64,
    pub row_stagger_ms: i64,
    pub row_transition_ms: i64,
    pub shake_ms: i64,
    pub alert_auto_hide_ms: i64,
    pub alert_fade_ms: i64,
    pub alert_close_fade_ms: i64,
    pub notification_lifetime_ms: i64,
    pub notification_fade_ms: i64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            section_stagger_ms: 150,
            section_transition_ms: 600,
            row_stagger_ms: 50,
            row_transition_ms: 400,
            shake_ms: 500,
            alert_auto_hide_ms: 5000,
            alert_fade_ms: 500,
            alert_close_fade_ms: 300,
            notification_lifetime_ms: 3000,
            notification_fade_ms: 300,
        }
    }
}

impl EnhancerConfig {
    pub fn from_json(source: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.button_selector.trim().is_empty() {
            return Err(Error::Config("buttonSelector must not be empty".into()));
        }
        if self.loading_opt_out_attr.trim().is_empty() {
            return Err(Error::Config("loadingOptOutAttr must not be empty".into()));
        }
        if !(0.0..=1.0).contains(&self.reveal_threshold) {
            return Err(Error::Config(format!(
                "revealThreshold must be within [0, 1], got {}",
                self.reveal_threshold
            )));
        }
        let t = &self.timings;
        let negative = [
            ("sectionStaggerMs", t.section_stagger_ms),
            ("sectionTransitionMs", t.section_transition_ms),
            ("rowStaggerMs", t.row_stagger_ms),
            ("rowTransitionMs", t.row_transition_ms),
            ("shakeMs", t.shake_ms),
            ("alertAutoHideMs", t.alert_auto_hide_ms),
            ("alertFadeMs", t.alert_fade_ms),
            ("alertCloseFadeMs", t.alert_close_fade_ms),
            ("notificationLifetimeMs", t.notification_lifetime_ms),
            ("notificationFadeMs", t.notification_fade_ms),
        ]
        .into_iter()
        .find(|(_, value)| *value < 0);
        if let Some((name, value)) = negative {
            return Err(Error::Config(format!(
                "timings.{name} must be non-negative, got {value}"
            )));
        }
        Ok(())
    }

    /// Reads the first config meta tag of a loaded page, if any.
    pub(crate) fn from_meta(dom: &Dom) -> Result<Option<Self>> {
        let meta = dom
            .query_selector(&format!(r#"meta[name="{CONFIG_META_NAME}"]"#))?;
        let Some(meta) = meta else {
            return Ok(None);
        };
        let content = dom.attr(meta, "content").unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(None);
        }
        Self::from_json(&content).map(Some)
    }
}
