pub(crate) fn default_storage_key() -> String {
    "adaWidgetSettings".to_string()
}

pub(crate) fn default_legacy_storage_keys() -> Vec<String> {
    vec!["adaWidget".to_string()]
}

pub(crate) fn default_welcome_key() -> String {
    "adaWidgetWelcome".to_string()
}

pub(crate) fn default_class_prefix() -> String {
    "ada-".to_string()
}

pub(crate) fn default_active_class() -> String {
    "active".to_string()
}

pub(crate) fn default_focus_delay_ms() -> u64 {
    100
}

pub(crate) fn default_notice_duration_ms() -> u64 {
    3000
}

pub(crate) fn default_notice_fade_ms() -> u64 {
    300
}

pub(crate) fn default_welcome_delay_ms() -> u64 {
    1000
}

pub(crate) fn default_speech_rate() -> f32 {
    0.9
}

pub(crate) fn default_speech_pitch() -> f32 {
    1.0
}

pub(crate) fn default_speech_volume() -> f32 {
    1.0
}

pub(crate) fn default_speech_max_chars() -> usize {
    5000
}

pub(crate) fn default_key_toggle_panel() -> String {
    "ctrl+alt+a".to_string()
}

pub(crate) fn default_key_reset() -> String {
    "ctrl+alt+r".to_string()
}

pub(crate) fn default_key_close_panel() -> String {
    "escape".to_string()
}

pub(crate) fn default_confirm_reset() -> bool {
    true
}

pub(crate) fn default_toggle_notices() -> bool {
    true
}

pub(crate) fn default_speech_notices() -> bool {
    true
}

pub(crate) fn default_welcome_notice() -> bool {
    true
}

pub(crate) fn default_log_level() -> crate::config::LogLevel {
    crate::config::LogLevel::Info
}
