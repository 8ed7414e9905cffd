//! Boolean features and the mapping from control identifiers to settings.

use crate::settings::Settings;

/// A toggleable feature, bound to one boolean field of [`Settings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feature {
    HighContrast,
    Grayscale,
    Invert,
    HighlightLinks,
    ReadableFont,
    TextSpacing,
    HideImages,
    ReadingGuide,
    ReadAloud,
}

impl Feature {
    pub const ALL: [Feature; 9] = [
        Feature::HighContrast,
        Feature::Grayscale,
        Feature::Invert,
        Feature::HighlightLinks,
        Feature::ReadableFont,
        Feature::TextSpacing,
        Feature::HideImages,
        Feature::ReadingGuide,
        Feature::ReadAloud,
    ];

    /// Hyphenated identifier carried by the toggle control.
    pub fn identifier(self) -> &'static str {
        match self {
            Feature::HighContrast => "high-contrast",
            Feature::Grayscale => "grayscale",
            Feature::Invert => "invert",
            Feature::HighlightLinks => "highlight-links",
            Feature::ReadableFont => "readable-font",
            Feature::TextSpacing => "text-spacing",
            Feature::HideImages => "hide-images",
            Feature::ReadingGuide => "reading-guide",
            Feature::ReadAloud => "read-aloud",
        }
    }

    /// Serialized settings field name.
    pub fn field_name(self) -> &'static str {
        match self {
            Feature::HighContrast => "highContrast",
            Feature::Grayscale => "grayscale",
            Feature::Invert => "invert",
            Feature::HighlightLinks => "highlightLinks",
            Feature::ReadableFont => "readableFont",
            Feature::TextSpacing => "textSpacing",
            Feature::HideImages => "hideImages",
            Feature::ReadingGuide => "readingGuide",
            Feature::ReadAloud => "readAloud",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Feature::HighContrast => "High Contrast",
            Feature::Grayscale => "Grayscale",
            Feature::Invert => "Invert Colors",
            Feature::HighlightLinks => "Highlight Links",
            Feature::ReadableFont => "Readable Font",
            Feature::TextSpacing => "Text Spacing",
            Feature::HideImages => "Hide Images",
            Feature::ReadingGuide => "Reading Guide",
            Feature::ReadAloud => "Read Aloud",
        }
    }

    pub fn from_identifier(identifier: &str) -> Option<Feature> {
        Feature::ALL
            .into_iter()
            .find(|feature| feature.identifier() == identifier)
    }

    pub fn from_field_name(name: &str) -> Option<Feature> {
        Feature::ALL
            .into_iter()
            .find(|feature| feature.field_name() == name)
    }

    /// Features rendered as a class on the document body. The reading
    /// guide and read-aloud drive their own elements instead.
    pub fn is_body_class(self) -> bool {
        !matches!(self, Feature::ReadingGuide | Feature::ReadAloud)
    }

    pub fn is_enabled(self, settings: &Settings) -> bool {
        match self {
            Feature::HighContrast => settings.high_contrast,
            Feature::Grayscale => settings.grayscale,
            Feature::Invert => settings.invert,
            Feature::HighlightLinks => settings.highlight_links,
            Feature::ReadableFont => settings.readable_font,
            Feature::TextSpacing => settings.text_spacing,
            Feature::HideImages => settings.hide_images,
            Feature::ReadingGuide => settings.reading_guide,
            Feature::ReadAloud => settings.read_aloud,
        }
    }

    pub fn set_enabled(self, settings: &mut Settings, enabled: bool) {
        let slot = match self {
            Feature::HighContrast => &mut settings.high_contrast,
            Feature::Grayscale => &mut settings.grayscale,
            Feature::Invert => &mut settings.invert,
            Feature::HighlightLinks => &mut settings.highlight_links,
            Feature::ReadableFont => &mut settings.readable_font,
            Feature::TextSpacing => &mut settings.text_spacing,
            Feature::HideImages => &mut settings.hide_images,
            Feature::ReadingGuide => &mut settings.reading_guide,
            Feature::ReadAloud => &mut settings.read_aloud,
        };
        *slot = enabled;
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Convert a hyphenated identifier to camelCase.
///
/// A hyphen directly followed by an ASCII lowercase letter is dropped and the
/// letter upper-cased. Every other hyphen is kept as written.
pub fn camel_case_key(identifier: &str) -> String {
    let mut out = String::with_capacity(identifier.len());
    let mut chars = identifier.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '-' {
            if let Some(next) = chars.peek().copied().filter(char::is_ascii_lowercase) {
                out.push(next.to_ascii_uppercase());
                chars.next();
                continue;
            }
        }
        out.push(ch);
    }
    out
}
