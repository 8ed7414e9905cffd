//! The `AdaWidget` class seen from JavaScript.

use crate::host::Host;
use crate::logging::{init_tracing, set_log_level};
use ada_panel_core::config::{AUTO_START_SELECTOR, embedded_config};
use ada_panel_core::{Message, Settings, SettingsPatch, WidgetConfig, parse_config};
use js_sys::JSON;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, info, warn};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct AdaWidget {
    host: Rc<Host>,
}

#[wasm_bindgen]
impl AdaWidget {
    /// `configToml` is optional; missing or malformed config falls back to
    /// the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_toml: Option<String>) -> Result<AdaWidget, JsValue> {
        init_tracing();
        let config = match config_toml.as_deref() {
            Some(contents) => parse_config(contents),
            None => WidgetConfig::default(),
        };
        AdaWidget::with_config(config)
    }

    #[wasm_bindgen(getter)]
    pub fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    pub fn open(&self) {
        self.host.dispatch(Message::OpenRequested);
    }

    pub fn close(&self) {
        self.host.dispatch(Message::CloseRequested);
    }

    pub fn toggle(&self) {
        self.host.dispatch(Message::ToggleRequested);
    }

    /// Reset without the confirmation prompt.
    pub fn reset(&self) {
        self.host.dispatch(Message::ResetRequested);
    }

    #[wasm_bindgen(js_name = getSettings)]
    pub fn get_settings(&self) -> Result<JsValue, JsValue> {
        settings_to_js(&self.host.settings())
    }

    /// Apply a partial settings object and return the normalized snapshot.
    /// Unknown keys and values of the wrong type are ignored. A patch sent
    /// before the page is ready, or from inside a widget callback, is applied
    /// later; the returned snapshot is the one it is expected to produce.
    #[wasm_bindgen(js_name = setSettings)]
    pub fn set_settings(&self, patch: JsValue) -> Result<JsValue, JsValue> {
        let json = JSON::stringify(&patch)?
            .as_string()
            .ok_or_else(|| JsValue::from_str("settings patch is not serializable"))?;
        let value: serde_json::Value = serde_json::from_str(&json)
            .map_err(|err| JsValue::from_str(&format!("Invalid settings patch: {err}")))?;
        let Some(object) = value.as_object() else {
            return Err(JsValue::from_str("settings patch must be an object"));
        };
        let patch = SettingsPatch::from_json_object(object);
        if patch.is_empty() {
            warn!("Ignoring settings patch without recognized fields");
            return settings_to_js(&self.host.settings());
        }
        debug!(?patch, "Applying settings patch");
        settings_to_js(&self.host.patch_settings(patch))
    }

    #[wasm_bindgen(js_name = speechState)]
    pub fn speech_state(&self) -> Result<String, JsValue> {
        match serde_json::to_value(self.host.speech_state()) {
            Ok(serde_json::Value::String(state)) => Ok(state),
            Ok(other) => Err(JsValue::from_str(&format!("unexpected speech state {other}"))),
            Err(err) => Err(JsValue::from_str(&err.to_string())),
        }
    }

    /// Remove listeners, stop speech, and cancel pending timers. The page
    /// keeps its current presentation.
    pub fn dispose(&self) {
        self.host.dispose();
        info!("Accessibility widget disposed");
    }
}

impl AdaWidget {
    fn with_config(config: WidgetConfig) -> Result<AdaWidget, JsValue> {
        set_log_level(config.log_level);
        let host = Host::start(config)?;
        info!(version = env!("CARGO_PKG_VERSION"), "Accessibility widget created");
        Ok(AdaWidget { host })
    }
}

thread_local! {
    static AUTO_STARTED: RefCell<Option<AdaWidget>> = const { RefCell::new(None) };
}

/// Start a widget on module load when the page embeds its config in a
/// `<script data-ada-widget>` element. Other pages construct `AdaWidget`
/// themselves.
#[wasm_bindgen(start)]
pub fn auto_start() {
    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        return;
    };
    let Ok(Some(script)) = document.query_selector(AUTO_START_SELECTOR) else {
        return;
    };
    init_tracing();
    let config = embedded_config(script.text_content().as_deref());
    match AdaWidget::with_config(config) {
        Ok(widget) => AUTO_STARTED.with(|slot| *slot.borrow_mut() = Some(widget)),
        Err(err) => warn!(?err, "Failed to auto-start accessibility widget"),
    }
}

/// The widget started by [`auto_start`], if any.
#[wasm_bindgen(js_name = autoStartedWidget)]
pub fn auto_started_widget() -> Option<AdaWidget> {
    AUTO_STARTED.with(|slot| {
        slot.borrow().as_ref().map(|widget| AdaWidget {
            host: Rc::clone(&widget.host),
        })
    })
}

fn settings_to_js(settings: &Settings) -> Result<JsValue, JsValue> {
    let json = serde_json::to_string(settings)
        .map_err(|err| JsValue::from_str(&format!("Failed to serialize settings: {err}")))?;
    JSON::parse(&json)
}
