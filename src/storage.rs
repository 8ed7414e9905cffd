use ada_panel_core::{Storage, StorageError};
use js_sys::Reflect;
use tracing::warn;
use wasm_bindgen::JsValue;

/// `window.localStorage` / `window.sessionStorage`.
pub(crate) struct WebStorage {
    inner: web_sys::Storage,
}

impl WebStorage {
    /// `None` when the browser refuses access, e.g. under strict privacy
    /// settings.
    pub(crate) fn local() -> Option<Self> {
        let window = web_sys::window()?;
        Self::from_access(window.local_storage(), "localStorage")
    }

    pub(crate) fn session() -> Option<Self> {
        let window = web_sys::window()?;
        Self::from_access(window.session_storage(), "sessionStorage")
    }

    fn from_access(
        access: Result<Option<web_sys::Storage>, JsValue>,
        kind: &'static str,
    ) -> Option<Self> {
        match access {
            Ok(Some(inner)) => Some(Self { inner }),
            Ok(None) => {
                warn!(kind, "Storage unavailable; keeping settings in memory");
                None
            }
            Err(err) => {
                warn!(kind, reason = %js_error_text(&err), "Storage unavailable; keeping settings in memory");
                None
            }
        }
    }
}

impl Storage for WebStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner
            .get_item(key)
            .map_err(|err| StorageError::Read {
                key: key.to_string(),
                reason: js_error_text(&err),
            })
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.set_item(key, value).map_err(|err| {
            if js_error_name(&err).as_deref() == Some("QuotaExceededError") {
                StorageError::QuotaExceeded {
                    key: key.to_string(),
                }
            } else {
                StorageError::Write {
                    key: key.to_string(),
                    reason: js_error_text(&err),
                }
            }
        })
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.inner
            .remove_item(key)
            .map_err(|err| StorageError::Write {
                key: key.to_string(),
                reason: js_error_text(&err),
            })
    }
}

fn js_error_name(err: &JsValue) -> Option<String> {
    Reflect::get(err, &JsValue::from_str("name"))
        .ok()
        .and_then(|name| name.as_string())
}

pub(crate) fn js_error_text(err: &JsValue) -> String {
    Reflect::get(err, &JsValue::from_str("message"))
        .ok()
        .and_then(|message| message.as_string())
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{err:?}"))
}
