use crate::feature::Feature;
use crate::panel::ClickTarget;
use crate::presentation::Node;
use crate::settings::{NumericSetting, SettingsPatch};
use crate::shortcuts::Modifiers;
use crate::speech::SpeechEvent;

/// Events fed to [`super::Widget::update`] by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    TriggerClicked,
    CloseClicked,
    ResetClicked,
    /// The user accepted the reset confirmation.
    ResetConfirmed,
    DocumentClicked(ClickTarget),
    KeyPressed {
        key: String,
        modifiers: Modifiers,
    },
    /// Raw `value` of a range input.
    SliderChanged {
        setting: NumericSetting,
        raw: String,
    },
    ToggleActivated(Feature),
    ToggleKeyDown {
        feature: Feature,
        key: String,
    },
    ReadStartClicked,
    ReadPauseClicked,
    ReadStopClicked,
    PointerMoved {
        y: f64,
    },
    Speech(SpeechEvent),
    PatchSettings(SettingsPatch),
    OpenRequested,
    CloseRequested,
    ToggleRequested,
    /// Programmatic reset; never asks for confirmation.
    ResetRequested,
}

/// Transient status message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub duration_ms: u64,
    pub fade_ms: u64,
}

/// Work the host performs on its event loop after an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Call [`super::Widget::focus`] with `node` after `delay_ms`.
    FocusLater { node: Node, delay_ms: u64 },
    ShowNotice(Notice),
    ScheduleNotice { notice: Notice, delay_ms: u64 },
    /// Ask the user; dispatch [`Message::ResetConfirmed`] if accepted.
    ConfirmReset { prompt: String },
}
