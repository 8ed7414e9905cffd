use super::defaults;
use super::models::{ElementSelectors, LogLevel, WidgetConfig};
use serde::{Deserialize, Serialize};

/// On-disk TOML layout: one table per concern.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub(super) struct ConfigTables {
    #[serde(default)]
    storage: StorageConfig,
    #[serde(default)]
    selectors: ElementSelectors,
    #[serde(default)]
    appearance: AppearanceConfig,
    #[serde(default)]
    timing: TimingConfig,
    #[serde(default)]
    speech: SpeechConfig,
    #[serde(default)]
    keys: KeysConfig,
    #[serde(default)]
    behavior: BehaviorConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

impl From<ConfigTables> for WidgetConfig {
    fn from(tables: ConfigTables) -> Self {
        WidgetConfig {
            storage_key: tables.storage.key,
            legacy_storage_keys: tables.storage.legacy_keys,
            welcome_key: tables.storage.welcome_key,
            selectors: tables.selectors,
            class_prefix: tables.appearance.class_prefix,
            active_class: tables.appearance.active_class,
            focus_delay_ms: tables.timing.focus_delay_ms,
            notice_duration_ms: tables.timing.notice_duration_ms,
            notice_fade_ms: tables.timing.notice_fade_ms,
            welcome_delay_ms: tables.timing.welcome_delay_ms,
            speech_rate: tables.speech.rate,
            speech_pitch: tables.speech.pitch,
            speech_volume: tables.speech.volume,
            speech_max_chars: tables.speech.max_chars,
            speech_lang: tables.speech.lang,
            key_toggle_panel: tables.keys.toggle_panel,
            key_reset: tables.keys.reset,
            key_close_panel: tables.keys.close_panel,
            confirm_reset: tables.behavior.confirm_reset,
            toggle_notices: tables.behavior.toggle_notices,
            speech_notices: tables.behavior.speech_notices,
            welcome_notice: tables.behavior.welcome_notice,
            log_level: tables.logging.log_level,
        }
    }
}

impl From<&WidgetConfig> for ConfigTables {
    fn from(config: &WidgetConfig) -> Self {
        ConfigTables {
            storage: StorageConfig {
                key: config.storage_key.clone(),
                legacy_keys: config.legacy_storage_keys.clone(),
                welcome_key: config.welcome_key.clone(),
            },
            selectors: config.selectors.clone(),
            appearance: AppearanceConfig {
                class_prefix: config.class_prefix.clone(),
                active_class: config.active_class.clone(),
            },
            timing: TimingConfig {
                focus_delay_ms: config.focus_delay_ms,
                notice_duration_ms: config.notice_duration_ms,
                notice_fade_ms: config.notice_fade_ms,
                welcome_delay_ms: config.welcome_delay_ms,
            },
            speech: SpeechConfig {
                rate: config.speech_rate,
                pitch: config.speech_pitch,
                volume: config.speech_volume,
                max_chars: config.speech_max_chars,
                lang: config.speech_lang.clone(),
            },
            keys: KeysConfig {
                toggle_panel: config.key_toggle_panel.clone(),
                reset: config.key_reset.clone(),
                close_panel: config.key_close_panel.clone(),
            },
            behavior: BehaviorConfig {
                confirm_reset: config.confirm_reset,
                toggle_notices: config.toggle_notices,
                speech_notices: config.speech_notices,
                welcome_notice: config.welcome_notice,
            },
            logging: LoggingConfig {
                log_level: config.log_level,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct StorageConfig {
    #[serde(default = "defaults::default_storage_key")]
    key: String,
    #[serde(default = "defaults::default_legacy_storage_keys")]
    legacy_keys: Vec<String>,
    #[serde(default = "defaults::default_welcome_key")]
    welcome_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            key: defaults::default_storage_key(),
            legacy_keys: defaults::default_legacy_storage_keys(),
            welcome_key: defaults::default_welcome_key(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct AppearanceConfig {
    #[serde(default = "defaults::default_class_prefix")]
    class_prefix: String,
    #[serde(default = "defaults::default_active_class")]
    active_class: String,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        AppearanceConfig {
            class_prefix: defaults::default_class_prefix(),
            active_class: defaults::default_active_class(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct TimingConfig {
    #[serde(default = "defaults::default_focus_delay_ms")]
    focus_delay_ms: u64,
    #[serde(default = "defaults::default_notice_duration_ms")]
    notice_duration_ms: u64,
    #[serde(default = "defaults::default_notice_fade_ms")]
    notice_fade_ms: u64,
    #[serde(default = "defaults::default_welcome_delay_ms")]
    welcome_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            focus_delay_ms: defaults::default_focus_delay_ms(),
            notice_duration_ms: defaults::default_notice_duration_ms(),
            notice_fade_ms: defaults::default_notice_fade_ms(),
            welcome_delay_ms: defaults::default_welcome_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct SpeechConfig {
    #[serde(default = "defaults::default_speech_rate")]
    rate: f32,
    #[serde(default = "defaults::default_speech_pitch")]
    pitch: f32,
    #[serde(default = "defaults::default_speech_volume")]
    volume: f32,
    #[serde(default = "defaults::default_speech_max_chars")]
    max_chars: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lang: Option<String>,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        SpeechConfig {
            rate: defaults::default_speech_rate(),
            pitch: defaults::default_speech_pitch(),
            volume: defaults::default_speech_volume(),
            max_chars: defaults::default_speech_max_chars(),
            lang: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct KeysConfig {
    #[serde(default = "defaults::default_key_toggle_panel")]
    toggle_panel: String,
    #[serde(default = "defaults::default_key_reset")]
    reset: String,
    #[serde(default = "defaults::default_key_close_panel")]
    close_panel: String,
}

impl Default for KeysConfig {
    fn default() -> Self {
        KeysConfig {
            toggle_panel: defaults::default_key_toggle_panel(),
            reset: defaults::default_key_reset(),
            close_panel: defaults::default_key_close_panel(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct BehaviorConfig {
    #[serde(default = "defaults::default_confirm_reset")]
    confirm_reset: bool,
    #[serde(default = "defaults::default_toggle_notices")]
    toggle_notices: bool,
    #[serde(default = "defaults::default_speech_notices")]
    speech_notices: bool,
    #[serde(default = "defaults::default_welcome_notice")]
    welcome_notice: bool,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        BehaviorConfig {
            confirm_reset: defaults::default_confirm_reset(),
            toggle_notices: defaults::default_toggle_notices(),
            speech_notices: defaults::default_speech_notices(),
            welcome_notice: defaults::default_welcome_notice(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct LoggingConfig {
    #[serde(default = "defaults::default_log_level")]
    log_level: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            log_level: defaults::default_log_level(),
        }
    }
}
