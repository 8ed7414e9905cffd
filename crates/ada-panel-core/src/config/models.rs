use super::defaults;
use crate::feature::Feature;
use crate::presentation::Node;
use crate::settings::NumericSetting;
use serde::{Deserialize, Serialize};

/// Widget configuration; deserializable from TOML through `ConfigTables`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WidgetConfig {
    #[serde(default = "defaults::default_storage_key")]
    pub storage_key: String,
    #[serde(default = "defaults::default_legacy_storage_keys")]
    pub legacy_storage_keys: Vec<String>,
    #[serde(default = "defaults::default_welcome_key")]
    pub welcome_key: String,
    #[serde(default)]
    pub selectors: ElementSelectors,
    #[serde(default = "defaults::default_class_prefix")]
    pub class_prefix: String,
    #[serde(default = "defaults::default_active_class")]
    pub active_class: String,
    #[serde(default = "defaults::default_focus_delay_ms")]
    pub focus_delay_ms: u64,
    #[serde(default = "defaults::default_notice_duration_ms")]
    pub notice_duration_ms: u64,
    #[serde(default = "defaults::default_notice_fade_ms")]
    pub notice_fade_ms: u64,
    #[serde(default = "defaults::default_welcome_delay_ms")]
    pub welcome_delay_ms: u64,
    #[serde(default = "defaults::default_speech_rate")]
    pub speech_rate: f32,
    #[serde(default = "defaults::default_speech_pitch")]
    pub speech_pitch: f32,
    #[serde(default = "defaults::default_speech_volume")]
    pub speech_volume: f32,
    #[serde(default = "defaults::default_speech_max_chars")]
    pub speech_max_chars: usize,
    #[serde(default)]
    pub speech_lang: Option<String>,
    #[serde(default = "defaults::default_key_toggle_panel")]
    pub key_toggle_panel: String,
    #[serde(default = "defaults::default_key_reset")]
    pub key_reset: String,
    #[serde(default = "defaults::default_key_close_panel")]
    pub key_close_panel: String,
    #[serde(default = "defaults::default_confirm_reset")]
    pub confirm_reset: bool,
    #[serde(default = "defaults::default_toggle_notices")]
    pub toggle_notices: bool,
    #[serde(default = "defaults::default_speech_notices")]
    pub speech_notices: bool,
    #[serde(default = "defaults::default_welcome_notice")]
    pub welcome_notice: bool,
    #[serde(default = "defaults::default_log_level")]
    pub log_level: LogLevel,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        WidgetConfig {
            storage_key: defaults::default_storage_key(),
            legacy_storage_keys: defaults::default_legacy_storage_keys(),
            welcome_key: defaults::default_welcome_key(),
            selectors: ElementSelectors::default(),
            class_prefix: defaults::default_class_prefix(),
            active_class: defaults::default_active_class(),
            focus_delay_ms: defaults::default_focus_delay_ms(),
            notice_duration_ms: defaults::default_notice_duration_ms(),
            notice_fade_ms: defaults::default_notice_fade_ms(),
            welcome_delay_ms: defaults::default_welcome_delay_ms(),
            speech_rate: defaults::default_speech_rate(),
            speech_pitch: defaults::default_speech_pitch(),
            speech_volume: defaults::default_speech_volume(),
            speech_max_chars: defaults::default_speech_max_chars(),
            speech_lang: None,
            key_toggle_panel: defaults::default_key_toggle_panel(),
            key_reset: defaults::default_key_reset(),
            key_close_panel: defaults::default_key_close_panel(),
            confirm_reset: defaults::default_confirm_reset(),
            toggle_notices: defaults::default_toggle_notices(),
            speech_notices: defaults::default_speech_notices(),
            welcome_notice: defaults::default_welcome_notice(),
            log_level: defaults::default_log_level(),
        }
    }
}

/// CSS selectors binding the widget to the host page's markup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ElementSelectors {
    pub trigger: String,
    pub panel: String,
    pub close: String,
    pub reset: String,
    pub zoom_slider: String,
    pub zoom_value: String,
    pub text_slider: String,
    pub text_value: String,
    pub line_slider: String,
    pub line_value: String,
    pub toggles: String,
    pub feature_attribute: String,
    pub read_start: String,
    pub read_pause: String,
    pub read_stop: String,
    pub guide: String,
}

impl Default for ElementSelectors {
    fn default() -> Self {
        Self {
            trigger: ".ada-widget-btn".to_string(),
            panel: ".ada-widget-panel".to_string(),
            close: ".ada-close".to_string(),
            reset: ".ada-reset".to_string(),
            zoom_slider: "#adaZoom".to_string(),
            zoom_value: "#zoomValue".to_string(),
            text_slider: "#adaTextSize".to_string(),
            text_value: "#textSizeValue".to_string(),
            line_slider: "#adaLineHeight".to_string(),
            line_value: "#lineHeightValue".to_string(),
            toggles: ".ada-toggle".to_string(),
            feature_attribute: "data-feature".to_string(),
            read_start: "#readStart".to_string(),
            read_pause: "#readPause".to_string(),
            read_stop: "#readStop".to_string(),
            guide: ".ada-reading-guide".to_string(),
        }
    }
}

impl ElementSelectors {
    /// Selector for a node; `None` for the document root and body, which are
    /// resolved directly by the host.
    pub fn selector_for(&self, node: Node) -> Option<String> {
        let selector = match node {
            Node::Root | Node::Body => return None,
            Node::Trigger => self.trigger.clone(),
            Node::Panel => self.panel.clone(),
            Node::CloseButton => self.close.clone(),
            Node::ResetButton => self.reset.clone(),
            Node::Slider(NumericSetting::Zoom) => self.zoom_slider.clone(),
            Node::Slider(NumericSetting::TextSize) => self.text_slider.clone(),
            Node::Slider(NumericSetting::LineHeight) => self.line_slider.clone(),
            Node::ValueDisplay(NumericSetting::Zoom) => self.zoom_value.clone(),
            Node::ValueDisplay(NumericSetting::TextSize) => self.text_value.clone(),
            Node::ValueDisplay(NumericSetting::LineHeight) => self.line_value.clone(),
            Node::ReadStart => self.read_start.clone(),
            Node::ReadPause => self.read_pause.clone(),
            Node::ReadStop => self.read_stop.clone(),
            Node::Guide => self.guide.clone(),
            Node::Toggle(feature) => self.toggle_selector(feature),
        };
        let selector = selector.trim().to_string();
        if selector.is_empty() {
            None
        } else {
            Some(selector)
        }
    }

    fn toggle_selector(&self, feature: Feature) -> String {
        format!(
            "{}[{}=\"{}\"]",
            self.toggles.trim(),
            self.feature_attribute.trim(),
            feature.identifier()
        )
    }
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
