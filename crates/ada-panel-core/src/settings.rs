//! The persisted accessibility preferences and their value domains.

use crate::feature::Feature;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;
use ts_rs::TS;

/// Every user-adjustable preference. Serialized with camelCase keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Settings {
    pub zoom: u32,
    pub text_size: u32,
    pub line_height: u32,
    pub high_contrast: bool,
    pub grayscale: bool,
    pub invert: bool,
    pub highlight_links: bool,
    pub readable_font: bool,
    pub text_spacing: bool,
    pub hide_images: bool,
    pub reading_guide: bool,
    pub read_aloud: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            zoom: NumericSetting::Zoom.default_value(),
            text_size: NumericSetting::TextSize.default_value(),
            line_height: NumericSetting::LineHeight.default_value(),
            high_contrast: false,
            grayscale: false,
            invert: false,
            highlight_links: false,
            readable_font: false,
            text_spacing: false,
            hide_images: false,
            reading_guide: false,
            read_aloud: false,
        }
    }
}

impl Settings {
    /// Merge a patch into these settings, normalizing numeric values.
    /// Returns whether anything changed.
    pub fn apply_patch(&mut self, patch: &SettingsPatch) -> bool {
        let before = *self;
        for setting in NumericSetting::ALL {
            if let Some(raw) = patch.numeric(setting) {
                if let Some(value) = setting.range().normalize(raw) {
                    setting.set(self, value);
                } else {
                    debug!(field = setting.field_name(), raw, "Ignoring non-finite value");
                }
            }
        }
        for feature in Feature::ALL {
            if let Some(enabled) = patch.flag(feature) {
                feature.set_enabled(self, enabled);
            }
        }
        *self != before
    }

    /// `true` when every numeric field sits on its slider grid.
    pub fn is_normalized(&self) -> bool {
        NumericSetting::ALL
            .iter()
            .all(|setting| setting.range().contains(setting.get(self)))
    }
}

/// Inclusive slider bounds with a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliderRange {
    pub min: u32,
    pub max: u32,
    pub step: u32,
}

impl SliderRange {
    pub const fn new(min: u32, max: u32, step: u32) -> Self {
        Self { min, max, step }
    }

    pub fn contains(self, value: u32) -> bool {
        value >= self.min && value <= self.max && (value - self.min) % self.step == 0
    }

    /// Clamp into range and snap to the nearest step (ties round up).
    /// Non-finite input has no meaningful position and yields `None`.
    pub fn normalize(self, raw: f64) -> Option<u32> {
        if !raw.is_finite() {
            return None;
        }
        let min = i64::from(self.min);
        let max = i64::from(self.max);
        let step = i64::from(self.step.max(1));
        let clamped = (raw.round() as i64).clamp(min, max);
        let snapped = (clamped - min + step / 2) / step * step + min;
        u32::try_from(snapped.min(max)).ok()
    }
}

/// The slider-backed settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NumericSetting {
    Zoom,
    TextSize,
    LineHeight,
}

impl NumericSetting {
    pub const ALL: [NumericSetting; 3] = [
        NumericSetting::Zoom,
        NumericSetting::TextSize,
        NumericSetting::LineHeight,
    ];

    pub fn field_name(self) -> &'static str {
        match self {
            NumericSetting::Zoom => "zoom",
            NumericSetting::TextSize => "textSize",
            NumericSetting::LineHeight => "lineHeight",
        }
    }

    pub fn range(self) -> SliderRange {
        match self {
            NumericSetting::Zoom => SliderRange::new(100, 300, 10),
            NumericSetting::TextSize => SliderRange::new(80, 200, 10),
            NumericSetting::LineHeight => SliderRange::new(100, 250, 10),
        }
    }

    pub fn default_value(self) -> u32 {
        match self {
            NumericSetting::Zoom => 100,
            NumericSetting::TextSize => 100,
            NumericSetting::LineHeight => 150,
        }
    }

    pub fn get(self, settings: &Settings) -> u32 {
        match self {
            NumericSetting::Zoom => settings.zoom,
            NumericSetting::TextSize => settings.text_size,
            NumericSetting::LineHeight => settings.line_height,
        }
    }

    pub fn set(self, settings: &mut Settings, value: u32) {
        match self {
            NumericSetting::Zoom => settings.zoom = value,
            NumericSetting::TextSize => settings.text_size = value,
            NumericSetting::LineHeight => settings.line_height = value,
        }
    }
}

/// Partial update of [`Settings`]; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub zoom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub text_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub line_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub high_contrast: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub grayscale: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub invert: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub highlight_links: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub readable_font: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub text_spacing: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub hide_images: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub reading_guide: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub read_aloud: Option<bool>,
}

impl SettingsPatch {
    /// Build a patch from an untrusted JSON object, one field at a time.
    /// Unknown keys, `null`, and values of the wrong type are skipped.
    pub fn from_json_object(object: &Map<String, Value>) -> Self {
        let mut patch = SettingsPatch::default();
        for setting in NumericSetting::ALL {
            match object.get(setting.field_name()) {
                None | Some(Value::Null) => {}
                Some(Value::Number(number)) => {
                    patch.set_numeric(setting, number.as_f64());
                }
                Some(other) => {
                    debug!(field = setting.field_name(), value = %other, "Ignoring non-numeric value");
                }
            }
        }
        for feature in Feature::ALL {
            match object.get(feature.field_name()) {
                None | Some(Value::Null) => {}
                Some(Value::Bool(enabled)) => patch.set_flag(feature, Some(*enabled)),
                Some(other) => {
                    debug!(field = feature.field_name(), value = %other, "Ignoring non-boolean value");
                }
            }
        }
        patch
    }

    pub fn is_empty(&self) -> bool {
        *self == SettingsPatch::default()
    }

    pub fn numeric(&self, setting: NumericSetting) -> Option<f64> {
        match setting {
            NumericSetting::Zoom => self.zoom,
            NumericSetting::TextSize => self.text_size,
            NumericSetting::LineHeight => self.line_height,
        }
    }

    pub fn set_numeric(&mut self, setting: NumericSetting, value: Option<f64>) {
        match setting {
            NumericSetting::Zoom => self.zoom = value,
            NumericSetting::TextSize => self.text_size = value,
            NumericSetting::LineHeight => self.line_height = value,
        }
    }

    pub fn flag(&self, feature: Feature) -> Option<bool> {
        match feature {
            Feature::HighContrast => self.high_contrast,
            Feature::Grayscale => self.grayscale,
            Feature::Invert => self.invert,
            Feature::HighlightLinks => self.highlight_links,
            Feature::ReadableFont => self.readable_font,
            Feature::TextSpacing => self.text_spacing,
            Feature::HideImages => self.hide_images,
            Feature::ReadingGuide => self.reading_guide,
            Feature::ReadAloud => self.read_aloud,
        }
    }

    pub fn set_flag(&mut self, feature: Feature, value: Option<bool>) {
        let slot = match feature {
            Feature::HighContrast => &mut self.high_contrast,
            Feature::Grayscale => &mut self.grayscale,
            Feature::Invert => &mut self.invert,
            Feature::HighlightLinks => &mut self.highlight_links,
            Feature::ReadableFont => &mut self.readable_font,
            Feature::TextSpacing => &mut self.text_spacing,
            Feature::HideImages => &mut self.hide_images,
            Feature::ReadingGuide => &mut self.reading_guide,
            Feature::ReadAloud => &mut self.read_aloud,
        };
        *slot = value;
    }
}

impl From<&Settings> for SettingsPatch {
    fn from(settings: &Settings) -> Self {
        let mut patch = SettingsPatch::default();
        for setting in NumericSetting::ALL {
            patch.set_numeric(setting, Some(f64::from(setting.get(settings))));
        }
        for feature in Feature::ALL {
            patch.set_flag(feature, Some(feature.is_enabled(settings)));
        }
        patch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_match_the_documented_table() {
        let settings = Settings::default();
        assert_eq!(settings.zoom, 100);
        assert_eq!(settings.text_size, 100);
        assert_eq!(settings.line_height, 150);
        assert!(Feature::ALL.iter().all(|f| !f.is_enabled(&settings)));
        assert!(settings.is_normalized());
    }

    #[test]
    fn serializes_with_camel_case_field_names() {
        let value = serde_json::to_value(Settings::default()).expect("serialize");
        let object = value.as_object().expect("object");
        assert_eq!(object.len(), 12);
        assert_eq!(object["textSize"], json!(100));
        assert_eq!(object["lineHeight"], json!(150));
        assert_eq!(object["highlightLinks"], json!(false));
        assert_eq!(object["readAloud"], json!(false));
    }

    #[test]
    fn range_bounds_pass_through_unchanged() {
        let zoom = NumericSetting::Zoom.range();
        assert_eq!(zoom.normalize(100.0), Some(100));
        assert_eq!(zoom.normalize(300.0), Some(300));
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let zoom = NumericSetting::Zoom.range();
        assert_eq!(zoom.normalize(50.0), Some(100));
        assert_eq!(zoom.normalize(350.0), Some(300));
        assert_eq!(zoom.normalize(-20.0), Some(100));
        assert_eq!(NumericSetting::TextSize.range().normalize(10.0), Some(80));
    }

    #[test]
    fn off_grid_values_snap_to_nearest_step() {
        let zoom = NumericSetting::Zoom.range();
        assert_eq!(zoom.normalize(125.0), Some(130));
        assert_eq!(zoom.normalize(124.0), Some(120));
        assert_eq!(zoom.normalize(149.6), Some(150));
        assert_eq!(NumericSetting::LineHeight.range().normalize(246.0), Some(250));
    }

    #[test]
    fn non_finite_values_are_rejected() {
        assert_eq!(NumericSetting::Zoom.range().normalize(f64::NAN), None);
        assert_eq!(NumericSetting::Zoom.range().normalize(f64::INFINITY), None);
    }

    #[test]
    fn patch_from_json_skips_wrong_types_field_by_field() {
        let object = json!({
            "zoom": "200",
            "textSize": 150,
            "lineHeight": null,
            "grayscale": true,
            "invert": "yes",
            "unknownField": 42
        });
        let patch = SettingsPatch::from_json_object(object.as_object().expect("object"));
        assert_eq!(patch.zoom, None);
        assert_eq!(patch.text_size, Some(150.0));
        assert_eq!(patch.line_height, None);
        assert_eq!(patch.grayscale, Some(true));
        assert_eq!(patch.invert, None);
    }

    #[test]
    fn apply_patch_reports_changes_and_normalizes() {
        let mut settings = Settings::default();
        let patch = SettingsPatch {
            zoom: Some(125.0),
            read_aloud: Some(true),
            ..SettingsPatch::default()
        };
        assert!(settings.apply_patch(&patch));
        assert_eq!(settings.zoom, 130);
        assert!(settings.read_aloud);
        assert!(!settings.apply_patch(&patch));
    }

    #[test]
    fn full_patch_from_settings_reproduces_them() {
        let original = Settings {
            zoom: 220,
            text_size: 80,
            line_height: 250,
            invert: true,
            reading_guide: true,
            ..Settings::default()
        };
        let mut restored = Settings::default();
        restored.apply_patch(&SettingsPatch::from(&original));
        assert_eq!(restored, original);
    }

    #[test]
    fn empty_patch_serializes_to_empty_object() {
        let patch = SettingsPatch::default();
        assert!(patch.is_empty());
        assert_eq!(serde_json::to_string(&patch).expect("serialize"), "{}");
    }
}
