//! The settings store: one `Settings` value plus its persisted record.

use crate::config::WidgetConfig;
use crate::settings::{Settings, SettingsPatch};
use crate::storage::Storage;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Where the settings came from on the last [`SettingsStore::load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Defaults,
    Restored,
    Migrated { from: String },
}

pub struct SettingsStore<S: Storage> {
    storage: S,
    key: String,
    legacy_keys: Vec<String>,
    settings: Settings,
}

impl<S: Storage> SettingsStore<S> {
    pub fn new(storage: S, config: &WidgetConfig) -> Self {
        Self {
            storage,
            key: config.storage_key.clone(),
            legacy_keys: config.legacy_storage_keys.clone(),
            settings: Settings::default(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Copy of the current settings; mutating it does not affect the store.
    pub fn snapshot(&self) -> Settings {
        self.settings
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Replace the in-memory settings with defaults overlaid by the persisted
    /// record. Never fails; problems are logged and leave the defaults.
    pub fn load(&mut self) -> LoadOutcome {
        self.settings = Settings::default();

        let key = self.key.clone();
        if let Some(raw) = self.read_key(&key) {
            if self.overlay(&raw, &key) {
                info!(key = %key, "Restored accessibility settings");
                return LoadOutcome::Restored;
            }
            return LoadOutcome::Defaults;
        }

        for legacy in self.legacy_keys.clone() {
            let Some(raw) = self.read_key(&legacy) else {
                continue;
            };
            if !self.overlay(&raw, &legacy) {
                continue;
            }
            info!(from = %legacy, to = %self.key, "Migrating accessibility settings");
            if self.save() {
                if let Err(err) = self.storage.remove(&legacy) {
                    debug!(key = %legacy, "Could not remove legacy settings: {err}");
                }
            }
            return LoadOutcome::Migrated { from: legacy };
        }

        debug!(key = %self.key, "No saved accessibility settings");
        LoadOutcome::Defaults
    }

    /// Persist the full current record. Returns whether the write succeeded.
    pub fn save(&mut self) -> bool {
        let json = match serde_json::to_string(&self.settings) {
            Ok(json) => json,
            Err(err) => {
                warn!("Failed to serialize accessibility settings: {err}");
                return false;
            }
        };
        match self.storage.set(&self.key, &json) {
            Ok(()) => {
                debug!(key = %self.key, bytes = json.len(), "Saved accessibility settings");
                true
            }
            Err(err) => {
                warn!("Failed to save accessibility settings: {err}");
                false
            }
        }
    }

    /// Restore defaults in memory. Persisting is the caller's decision.
    pub fn reset(&mut self) {
        self.settings = Settings::default();
    }

    /// Merge a patch; returns whether anything changed.
    pub fn patch(&mut self, patch: &SettingsPatch) -> bool {
        self.settings.apply_patch(patch)
    }

    pub(crate) fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    fn read_key(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(err) => {
                warn!("Failed to read accessibility settings: {err}");
                None
            }
        }
    }

    fn overlay(&mut self, raw: &str, key: &str) -> bool {
        let value = match serde_json::from_str::<Value>(raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, "Ignoring corrupt accessibility settings: {err}");
                return false;
            }
        };
        let Some(object) = value.as_object() else {
            warn!(key, "Ignoring accessibility settings that are not a JSON object");
            return false;
        };
        let patch = SettingsPatch::from_json_object(object);
        self.settings.apply_patch(&patch);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::storage::{FallbackStorage, MemoryStorage};

    fn store_with(entries: &[(&str, &str)]) -> SettingsStore<MemoryStorage> {
        let mut storage = MemoryStorage::new();
        for (key, value) in entries {
            storage.set(key, value).expect("seed");
        }
        SettingsStore::new(storage, &WidgetConfig::default())
    }

    #[test]
    fn empty_storage_loads_defaults() {
        let mut store = store_with(&[]);
        assert_eq!(store.load(), LoadOutcome::Defaults);
        assert_eq!(store.snapshot(), Settings::default());
    }

    #[test]
    fn save_then_fresh_load_reproduces_the_record() {
        let mut store = store_with(&[]);
        store.settings_mut().text_size = 150;
        store.settings_mut().grayscale = true;
        store.settings_mut().line_height = 250;
        assert!(store.save());
        let saved = store.snapshot();

        let mut reloaded = SettingsStore::new(store.storage().clone(), &WidgetConfig::default());
        assert_eq!(reloaded.load(), LoadOutcome::Restored);
        assert_eq!(reloaded.snapshot(), saved);
    }

    #[test]
    fn partial_records_overlay_defaults() {
        let mut store = store_with(&[("adaWidgetSettings", r#"{"invert":true,"zoom":null}"#)]);
        assert_eq!(store.load(), LoadOutcome::Restored);
        assert!(store.settings().invert);
        assert_eq!(store.settings().zoom, 100);
    }

    #[test]
    fn corrupt_records_are_treated_as_absent() {
        for raw in ["{not json", "[1,2,3]", "\"text\"", "null"] {
            let mut store = store_with(&[("adaWidgetSettings", raw)]);
            assert_eq!(store.load(), LoadOutcome::Defaults, "input {raw}");
            assert_eq!(store.snapshot(), Settings::default());
        }
    }

    #[test]
    fn stored_values_are_normalized() {
        let mut store = store_with(&[(
            "adaWidgetSettings",
            r#"{"zoom":125,"textSize":999,"lineHeight":"tall","readAloud":1}"#,
        )]);
        store.load();
        assert_eq!(store.settings().zoom, 130);
        assert_eq!(store.settings().text_size, 200);
        assert_eq!(store.settings().line_height, 150);
        assert!(!store.settings().read_aloud);
    }

    #[test]
    fn legacy_record_is_migrated_to_the_canonical_key() {
        let mut store = store_with(&[("adaWidget", r#"{"highContrast":true}"#)]);
        assert_eq!(
            store.load(),
            LoadOutcome::Migrated {
                from: "adaWidget".to_string()
            }
        );
        assert!(store.settings().high_contrast);
        let stored = store.storage().get("adaWidgetSettings").expect("get");
        assert!(stored.is_some_and(|raw| raw.contains("\"highContrast\":true")));
        assert_eq!(store.storage().get("adaWidget").expect("get"), None);
    }

    #[test]
    fn canonical_key_wins_over_legacy() {
        let mut store = store_with(&[
            ("adaWidget", r#"{"invert":true}"#),
            ("adaWidgetSettings", r#"{"grayscale":true}"#),
        ]);
        assert_eq!(store.load(), LoadOutcome::Restored);
        assert!(store.settings().grayscale);
        assert!(!store.settings().invert);
    }

    #[test]
    fn failed_save_keeps_memory_state() {
        let mut store = SettingsStore::new(MemoryStorage::with_quota(4), &WidgetConfig::default());
        store.settings_mut().zoom = 200;
        assert!(!store.save());
        assert_eq!(store.settings().zoom, 200);
        assert!(matches!(
            store.storage_mut().set("adaWidgetSettings", "{}"),
            Err(StorageError::QuotaExceeded { .. })
        ));
    }

    #[test]
    fn unavailable_storage_loads_defaults() {
        let mut store = SettingsStore::new(MemoryStorage::unavailable(), &WidgetConfig::default());
        assert_eq!(store.load(), LoadOutcome::Defaults);
        assert!(!store.save());
    }

    #[test]
    fn refused_platform_storage_still_saves_for_the_page() {
        let mut store = SettingsStore::new(
            FallbackStorage::<MemoryStorage>::new(None),
            &WidgetConfig::default(),
        );
        assert_eq!(store.load(), LoadOutcome::Defaults);
        store.settings_mut().text_size = 150;
        assert!(store.save());

        let mut reloaded = SettingsStore::new(store.storage().clone(), &WidgetConfig::default());
        assert_eq!(reloaded.load(), LoadOutcome::Restored);
        assert_eq!(reloaded.settings().text_size, 150);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut store = store_with(&[]);
        store.patch(&SettingsPatch {
            zoom: Some(300.0),
            hide_images: Some(true),
            ..SettingsPatch::default()
        });
        store.reset();
        assert_eq!(store.snapshot(), Settings::default());
    }
}
