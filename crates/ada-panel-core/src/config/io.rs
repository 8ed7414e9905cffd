use super::models::WidgetConfig;
use super::tables::ConfigTables;
use anyhow::{Context, Result};
use tracing::{debug, warn};

const MIN_SPEECH_RATE: f32 = 0.1;
const MAX_SPEECH_RATE: f32 = 10.0;
const MAX_SPEECH_PITCH: f32 = 2.0;
const MAX_SPEECH_VOLUME: f32 = 1.0;

/// Parse a TOML configuration, falling back to defaults when it is invalid.
pub fn parse_config(contents: &str) -> WidgetConfig {
    match try_parse_config(contents) {
        Ok(config) => {
            debug!("Parsed widget configuration");
            config
        }
        Err(err) => {
            warn!("Invalid widget config TOML, using defaults: {err:#}");
            WidgetConfig::default()
        }
    }
}

/// Strict variant of [`parse_config`]; values are still sanitized.
pub fn try_parse_config(contents: &str) -> Result<WidgetConfig> {
    let tables: ConfigTables =
        toml::from_str(contents).context("Failed to parse widget config TOML")?;
    Ok(sanitize(WidgetConfig::from(tables)))
}

/// Marks a `<script>` element whose text is the widget config. A page that
/// contains one gets a widget as soon as the module loads.
pub const AUTO_START_SELECTOR: &str = "script[data-ada-widget]";

/// Config from the body of an embedded script element; a blank body means
/// the defaults.
pub fn embedded_config(body: Option<&str>) -> WidgetConfig {
    match body.map(str::trim) {
        Some(text) if !text.is_empty() => parse_config(text),
        _ => WidgetConfig::default(),
    }
}

pub fn serialize_config(config: &WidgetConfig) -> Result<String> {
    toml::to_string(&ConfigTables::from(config)).context("Failed to serialize widget config")
}

fn sanitize(mut config: WidgetConfig) -> WidgetConfig {
    let defaults = WidgetConfig::default();

    if !config.speech_rate.is_finite() {
        config.speech_rate = defaults.speech_rate;
    }
    if !config.speech_pitch.is_finite() {
        config.speech_pitch = defaults.speech_pitch;
    }
    if !config.speech_volume.is_finite() {
        config.speech_volume = defaults.speech_volume;
    }
    config.speech_rate = config.speech_rate.clamp(MIN_SPEECH_RATE, MAX_SPEECH_RATE);
    config.speech_pitch = config.speech_pitch.clamp(0.0, MAX_SPEECH_PITCH);
    config.speech_volume = config.speech_volume.clamp(0.0, MAX_SPEECH_VOLUME);

    if config.speech_max_chars == 0 {
        warn!("speech.max_chars must be positive; using default");
        config.speech_max_chars = defaults.speech_max_chars;
    }
    if config.storage_key.trim().is_empty() {
        warn!("storage.key is empty; using default");
        config.storage_key = defaults.storage_key;
    }
    config
        .legacy_storage_keys
        .retain(|key| !key.trim().is_empty() && *key != config.storage_key);
    if config.active_class.trim().is_empty() {
        config.active_class = defaults.active_class;
    }
    config.speech_lang = config
        .speech_lang
        .map(|lang| lang.trim().to_string())
        .filter(|lang| !lang.is_empty());
    config
}
