//! Keyboard shortcut parsing and matching.

use crate::config::WidgetConfig;

/// Modifier keys held during a key press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const CTRL_ALT: Modifiers = Modifiers {
        ctrl: true,
        alt: true,
        shift: false,
        meta: false,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    TogglePanel,
    Reset,
    ClosePanel,
}

impl Shortcut {
    /// Global chords swallow the browser's default action.
    pub fn prevents_default(self) -> bool {
        matches!(self, Shortcut::TogglePanel | Shortcut::Reset)
    }
}

#[derive(Debug, Clone)]
pub struct ShortcutMap {
    toggle_panel: String,
    reset: String,
    close_panel: String,
}

impl ShortcutMap {
    pub fn new(config: &WidgetConfig) -> Self {
        Self {
            toggle_panel: config.key_toggle_panel.clone(),
            reset: config.key_reset.clone(),
            close_panel: config.key_close_panel.clone(),
        }
    }

    /// Resolve a `KeyboardEvent.key` value plus modifiers to a shortcut.
    pub fn resolve(&self, key: &str, modifiers: Modifiers) -> Option<Shortcut> {
        let pressed = normalize_key(key)?;
        if shortcut_matches(&self.toggle_panel, "ctrl+alt+a", &pressed, modifiers) {
            Some(Shortcut::TogglePanel)
        } else if shortcut_matches(&self.reset, "ctrl+alt+r", &pressed, modifiers) {
            Some(Shortcut::Reset)
        } else if shortcut_matches(&self.close_panel, "escape", &pressed, modifiers) {
            Some(Shortcut::ClosePanel)
        } else {
            None
        }
    }
}

/// Lower-case a key name and fold the aliases browsers report.
pub fn normalize_key(key: &str) -> Option<String> {
    match key {
        "" => None,
        " " | "Spacebar" => Some("space".to_string()),
        "Esc" => Some("escape".to_string()),
        other => Some(other.to_ascii_lowercase()),
    }
}

/// Enter and Space activate focused toggle controls.
pub fn is_activation_key(key: &str) -> bool {
    matches!(normalize_key(key).as_deref(), Some("enter" | "space"))
}

pub fn shortcut_matches(raw: &str, fallback: &str, pressed: &str, modifiers: Modifiers) -> bool {
    let normalized = normalize_shortcut_token(raw, fallback);

    let mut required_ctrl = false;
    let mut required_alt = false;
    let mut required_meta = false;
    let mut required_shift = false;
    let mut required_key: Option<&str> = None;

    for token in normalized
        .split('+')
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        match token {
            "ctrl" | "control" => required_ctrl = true,
            "alt" | "option" => required_alt = true,
            "logo" | "meta" | "super" | "cmd" | "command" => required_meta = true,
            "shift" => required_shift = true,
            "esc" => required_key = Some("escape"),
            key => required_key = Some(key),
        }
    }

    let Some(required_key) = required_key else {
        return false;
    };
    if pressed != required_key {
        return false;
    }

    modifiers.ctrl == required_ctrl
        && modifiers.alt == required_alt
        && modifiers.meta == required_meta
        && modifiers.shift == required_shift
}

pub fn normalize_shortcut_token(raw: &str, fallback: &str) -> String {
    let normalized = raw.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        fallback.to_string()
    } else {
        normalized.replace("spacebar", "space")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> ShortcutMap {
        ShortcutMap::new(&WidgetConfig::default())
    }

    #[test]
    fn default_chords_resolve() {
        assert_eq!(map().resolve("a", Modifiers::CTRL_ALT), Some(Shortcut::TogglePanel));
        assert_eq!(map().resolve("R", Modifiers::CTRL_ALT), Some(Shortcut::Reset));
        assert_eq!(map().resolve("Escape", Modifiers::NONE), Some(Shortcut::ClosePanel));
        assert_eq!(map().resolve("Esc", Modifiers::NONE), Some(Shortcut::ClosePanel));
    }

    #[test]
    fn rejects_unexpected_extra_modifier() {
        let modifiers = Modifiers {
            shift: true,
            ..Modifiers::CTRL_ALT
        };
        assert_eq!(map().resolve("a", modifiers), None);
        assert_eq!(map().resolve("a", Modifiers::NONE), None);
    }

    #[test]
    fn empty_config_uses_fallback() {
        assert!(shortcut_matches("  ", "ctrl+alt+a", "a", Modifiers::CTRL_ALT));
    }

    #[test]
    fn modifier_only_chord_never_matches() {
        assert!(!shortcut_matches("ctrl+alt", "x", "x", Modifiers::CTRL_ALT));
    }

    #[test]
    fn normalizes_aliases() {
        assert_eq!(normalize_shortcut_token(" SpaceBar ", "x"), "space");
        assert!(shortcut_matches("Esc", "x", "escape", Modifiers::NONE));
        assert_eq!(normalize_key(" ").as_deref(), Some("space"));
        assert_eq!(normalize_key(""), None);
    }

    #[test]
    fn activation_keys() {
        assert!(is_activation_key("Enter"));
        assert!(is_activation_key(" "));
        assert!(!is_activation_key("Tab"));
    }

    #[test]
    fn only_global_chords_prevent_default() {
        assert!(Shortcut::TogglePanel.prevents_default());
        assert!(Shortcut::Reset.prevents_default());
        assert!(!Shortcut::ClosePanel.prevents_default());
    }
}
