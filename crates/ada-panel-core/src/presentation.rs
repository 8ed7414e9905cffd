//! Deriving and applying the visual state of the page from [`Settings`].

use crate::config::WidgetConfig;
use crate::feature::Feature;
use crate::settings::{NumericSetting, Settings};
use tracing::trace;

/// Every element the widget touches on the host page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Node {
    /// The document element (`<html>`).
    Root,
    Body,
    Trigger,
    Panel,
    CloseButton,
    ResetButton,
    Slider(NumericSetting),
    ValueDisplay(NumericSetting),
    ReadStart,
    ReadPause,
    ReadStop,
    Guide,
    Toggle(Feature),
}

impl Node {
    /// Elements without which the widget cannot be operated.
    pub const REQUIRED: [Node; 4] = [Node::Trigger, Node::Panel, Node::CloseButton, Node::ResetButton];

    pub fn all() -> Vec<Node> {
        let mut nodes = vec![
            Node::Root,
            Node::Body,
            Node::Trigger,
            Node::Panel,
            Node::CloseButton,
            Node::ResetButton,
        ];
        nodes.extend(NumericSetting::ALL.map(Node::Slider));
        nodes.extend(NumericSetting::ALL.map(Node::ValueDisplay));
        nodes.extend([Node::ReadStart, Node::ReadPause, Node::ReadStop, Node::Guide]);
        nodes.extend(Feature::ALL.map(Node::Toggle));
        nodes
    }
}

/// The host page, seen through the operations the widget needs.
///
/// Implementations skip operations on nodes that are not present.
pub trait Document {
    fn contains(&self, node: Node) -> bool;
    fn set_style(&mut self, node: Node, property: &str, value: &str);
    fn set_class(&mut self, node: Node, class: &str, present: bool);
    fn set_attribute(&mut self, node: Node, name: &str, value: &str);
    fn set_disabled(&mut self, node: Node, disabled: bool);
    fn set_value(&mut self, node: Node, value: &str);
    fn set_text(&mut self, node: Node, text: &str);
    fn focus(&mut self, node: Node);
    /// Rendered text of the page body.
    fn visible_text(&self) -> String;
}

/// Presentation state fully determined by a settings snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    /// Body zoom factor, e.g. `"1.5"`.
    pub zoom: String,
    /// Root font size, e.g. `"120%"`.
    pub root_font_size: String,
    /// Body line height ratio, e.g. `"1.5"`.
    pub line_height: String,
    pub body_classes: Vec<(Feature, bool)>,
    pub guide_active: bool,
    pub read_controls_enabled: bool,
    pub toggles: Vec<(Feature, bool)>,
    pub sliders: Vec<(NumericSetting, u32)>,
}

impl Presentation {
    pub fn derive(settings: &Settings) -> Self {
        Presentation {
            zoom: percent_ratio(settings.zoom),
            root_font_size: format!("{}%", settings.text_size),
            line_height: percent_ratio(settings.line_height),
            body_classes: Feature::ALL
                .into_iter()
                .filter(|feature| feature.is_body_class())
                .map(|feature| (feature, feature.is_enabled(settings)))
                .collect(),
            guide_active: settings.reading_guide,
            read_controls_enabled: settings.read_aloud,
            toggles: Feature::ALL
                .into_iter()
                .map(|feature| (feature, feature.is_enabled(settings)))
                .collect(),
            sliders: NumericSetting::ALL
                .into_iter()
                .map(|setting| (setting, setting.get(settings)))
                .collect(),
        }
    }
}

/// Format `value / 100` without trailing zeros: 100 → "1", 150 → "1.5".
fn percent_ratio(value: u32) -> String {
    let whole = value / 100;
    let frac = value % 100;
    if frac == 0 {
        whole.to_string()
    } else if frac % 10 == 0 {
        format!("{whole}.{}", frac / 10)
    } else {
        format!("{whole}.{frac:02}")
    }
}

/// Writes a [`Presentation`] onto a [`Document`].
#[derive(Debug, Clone)]
pub struct StateApplier {
    class_prefix: String,
    active_class: String,
}

impl StateApplier {
    pub fn new(config: &WidgetConfig) -> Self {
        Self {
            class_prefix: config.class_prefix.clone(),
            active_class: config.active_class.clone(),
        }
    }

    pub fn active_class(&self) -> &str {
        &self.active_class
    }

    /// Body class for a feature, e.g. `ada-high-contrast`.
    pub fn body_class(&self, feature: Feature) -> String {
        format!("{}{}", self.class_prefix, feature.identifier())
    }

    /// Class of the transient notice element.
    pub fn notice_class(&self) -> String {
        format!("{}notice", self.class_prefix)
    }

    /// Re-derive and write every piece of presentation state.
    pub fn apply<D: Document + ?Sized>(&self, settings: &Settings, document: &mut D) -> Presentation {
        let presentation = Presentation::derive(settings);

        document.set_style(Node::Body, "zoom", &presentation.zoom);
        document.set_style(Node::Root, "font-size", &presentation.root_font_size);
        document.set_style(Node::Body, "line-height", &presentation.line_height);

        for (feature, enabled) in &presentation.body_classes {
            document.set_class(Node::Body, &self.body_class(*feature), *enabled);
        }

        document.set_class(Node::Guide, &self.active_class, presentation.guide_active);

        for node in [Node::ReadStart, Node::ReadPause, Node::ReadStop] {
            document.set_disabled(node, !presentation.read_controls_enabled);
        }

        for (feature, enabled) in &presentation.toggles {
            let node = Node::Toggle(*feature);
            document.set_class(node, &self.active_class, *enabled);
            document.set_attribute(node, "aria-checked", if *enabled { "true" } else { "false" });
        }

        for (setting, value) in &presentation.sliders {
            document.set_value(Node::Slider(*setting), &value.to_string());
            document.set_text(Node::ValueDisplay(*setting), &format!("{value}%"));
        }

        trace!(?presentation, "Applied presentation");
        presentation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingDocument;

    fn applier() -> StateApplier {
        StateApplier::new(&WidgetConfig::default())
    }

    #[test]
    fn ratios_drop_trailing_zeros() {
        assert_eq!(percent_ratio(100), "1");
        assert_eq!(percent_ratio(150), "1.5");
        assert_eq!(percent_ratio(300), "3");
        assert_eq!(percent_ratio(105), "1.05");
    }

    #[test]
    fn defaults_render_neutral_page() {
        let mut doc = RecordingDocument::complete();
        applier().apply(&Settings::default(), &mut doc);
        assert_eq!(doc.style(Node::Body, "zoom"), Some("1"));
        assert_eq!(doc.style(Node::Root, "font-size"), Some("100%"));
        assert_eq!(doc.style(Node::Body, "line-height"), Some("1.5"));
        assert!(doc.classes_of(Node::Body).is_empty());
        assert!(doc.is_disabled(Node::ReadStart));
        assert!(doc.is_disabled(Node::ReadPause));
        assert!(doc.is_disabled(Node::ReadStop));
        assert_eq!(
            doc.attribute(Node::Toggle(Feature::Invert), "aria-checked"),
            Some("false")
        );
        assert_eq!(doc.text(Node::ValueDisplay(NumericSetting::Zoom)), Some("100%"));
        assert_eq!(doc.value(Node::Slider(NumericSetting::LineHeight)), Some("150"));
    }

    #[test]
    fn flags_become_independent_body_classes() {
        let settings = Settings {
            high_contrast: true,
            hide_images: true,
            reading_guide: true,
            ..Settings::default()
        };
        let mut doc = RecordingDocument::complete();
        applier().apply(&settings, &mut doc);
        assert_eq!(
            doc.classes_of(Node::Body),
            vec!["ada-hide-images".to_string(), "ada-high-contrast".to_string()]
        );
        assert!(doc.has_class(Node::Guide, "active"));
        assert!(doc.has_class(Node::Toggle(Feature::HighContrast), "active"));
        assert_eq!(
            doc.attribute(Node::Toggle(Feature::HighContrast), "aria-checked"),
            Some("true")
        );
    }

    #[test]
    fn text_size_sets_root_font_size() {
        let settings = Settings {
            text_size: 150,
            ..Settings::default()
        };
        let mut doc = RecordingDocument::complete();
        applier().apply(&settings, &mut doc);
        assert_eq!(doc.style(Node::Root, "font-size"), Some("150%"));
        assert_eq!(doc.text(Node::ValueDisplay(NumericSetting::TextSize)), Some("150%"));
    }

    #[test]
    fn applying_twice_changes_nothing_more() {
        let settings = Settings {
            zoom: 200,
            grayscale: true,
            read_aloud: true,
            ..Settings::default()
        };
        let mut doc = RecordingDocument::complete();
        let first = applier().apply(&settings, &mut doc);
        let changes = doc.changes();
        assert!(changes > 0);
        let second = applier().apply(&settings, &mut doc);
        assert_eq!(doc.changes(), changes);
        assert_eq!(first, second);
    }

    #[test]
    fn missing_nodes_are_skipped() {
        let mut doc = RecordingDocument::with_nodes([Node::Root, Node::Body]);
        applier().apply(
            &Settings {
                reading_guide: true,
                ..Settings::default()
            },
            &mut doc,
        );
        assert!(!doc.has_class(Node::Guide, "active"));
        assert_eq!(doc.style(Node::Root, "font-size"), Some("100%"));
    }

    #[test]
    fn custom_prefix_and_active_class() {
        let config = WidgetConfig {
            class_prefix: "a11y-".to_string(),
            active_class: "is-on".to_string(),
            ..WidgetConfig::default()
        };
        let applier = StateApplier::new(&config);
        let mut doc = RecordingDocument::complete();
        applier.apply(
            &Settings {
                invert: true,
                ..Settings::default()
            },
            &mut doc,
        );
        assert!(doc.has_class(Node::Body, "a11y-invert"));
        assert!(doc.has_class(Node::Toggle(Feature::Invert), "is-on"));
        assert_eq!(applier.notice_class(), "a11y-notice");
    }
}
