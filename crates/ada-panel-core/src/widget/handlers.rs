use super::{Effect, Widget};
use crate::error::SpeechError;
use crate::feature::Feature;
use crate::panel::PanelTransition;
use crate::presentation::{Document, Node};
use crate::settings::{NumericSetting, SettingsPatch};
use crate::speech::{EventOutcome, SpeechEvent, StartOutcome};
use crate::storage::Storage;
use tracing::{debug, info, warn};

const NOTICE_RESET: &str = "All settings have been reset";
const NOTICE_READING: &str = "Reading page content";
const NOTICE_RESUMING: &str = "Resuming speech";
const NOTICE_PAUSED: &str = "Speech paused";
const NOTICE_SPEECH_ERROR: &str = "Speech error occurred";
const NOTICE_NO_TEXT: &str = "No readable text found";
const NOTICE_UNSUPPORTED: &str = "Text-to-speech is not supported in this browser";

impl<D: Document, S: Storage> Widget<D, S> {
    pub(super) fn handle_toggle_panel(&mut self, effects: &mut Vec<Effect>) {
        if self.panel.is_open() {
            self.handle_close_panel();
        } else {
            self.handle_open_panel(effects);
        }
    }

    pub(super) fn handle_open_panel(&mut self, effects: &mut Vec<Effect>) {
        if self.panel.open(&mut self.document) == PanelTransition::Opened {
            effects.push(Effect::FocusLater(Node::CloseButton));
        }
    }

    pub(super) fn handle_close_panel(&mut self) {
        self.panel.close(&mut self.document);
    }

    pub(super) fn handle_reset_clicked(&mut self, effects: &mut Vec<Effect>) {
        if self.config.confirm_reset {
            effects.push(Effect::ConfirmReset);
        } else {
            self.handle_reset(effects);
        }
    }

    pub(super) fn handle_reset(&mut self, effects: &mut Vec<Effect>) {
        self.store.reset();
        info!("Accessibility settings reset to defaults");
        effects.push(Effect::ApplyPresentation);
        effects.push(Effect::SaveSettings);
        effects.push(Effect::StopSpeech);
        effects.push(Effect::Notify(NOTICE_RESET.to_string()));
    }

    pub(super) fn handle_slider_changed(
        &mut self,
        setting: NumericSetting,
        raw: &str,
        effects: &mut Vec<Effect>,
    ) {
        let parsed = raw.trim().parse::<f64>().ok();
        let Some(value) = parsed.and_then(|raw| setting.range().normalize(raw)) else {
            debug!(field = setting.field_name(), raw, "Ignoring unparsable slider value");
            effects.push(Effect::ApplyPresentation);
            return;
        };

        let settings = self.store.settings_mut();
        let changed = setting.get(settings) != value;
        setting.set(settings, value);
        effects.push(Effect::ApplyPresentation);
        if changed {
            debug!(field = setting.field_name(), value, "Slider changed");
            effects.push(Effect::SaveSettings);
        }
    }

    pub(super) fn handle_toggle_feature(&mut self, feature: Feature, effects: &mut Vec<Effect>) {
        let settings = self.store.settings_mut();
        let enabled = !feature.is_enabled(settings);
        feature.set_enabled(settings, enabled);
        info!(feature = %feature, enabled, "Toggled accessibility feature");

        if feature == Feature::ReadAloud && !enabled {
            effects.push(Effect::StopSpeech);
        }
        effects.push(Effect::ApplyPresentation);
        effects.push(Effect::SaveSettings);
        if self.config.toggle_notices {
            let state = if enabled { "ON" } else { "OFF" };
            effects.push(Effect::Notify(format!("{}: {state}", feature.label())));
        }
    }

    pub(super) fn handle_read_start(&mut self, effects: &mut Vec<Effect>) {
        let enabled = self.store.settings().read_aloud;
        let document = &self.document;
        match self.speech.start(enabled, || document.visible_text()) {
            Ok(StartOutcome::Started { .. }) => self.speech_notice(NOTICE_READING, effects),
            Ok(StartOutcome::Resumed) => self.speech_notice(NOTICE_RESUMING, effects),
            Ok(StartOutcome::NoReadableText) => {
                effects.push(Effect::Notify(NOTICE_NO_TEXT.to_string()));
            }
            Ok(StartOutcome::Disabled | StartOutcome::AlreadySpeaking) => {}
            Err(SpeechError::Unsupported) => {
                warn!("Speech synthesis unavailable; read-aloud cannot start");
                effects.push(Effect::Notify(NOTICE_UNSUPPORTED.to_string()));
            }
            Err(err) => {
                warn!("Failed to start speech: {err}");
                effects.push(Effect::Notify(NOTICE_SPEECH_ERROR.to_string()));
            }
        }
    }

    pub(super) fn handle_read_pause(&mut self, effects: &mut Vec<Effect>) {
        if self.speech.pause() {
            self.speech_notice(NOTICE_PAUSED, effects);
        }
    }

    pub(super) fn handle_read_stop(&mut self) {
        self.speech.stop();
    }

    pub(super) fn handle_speech_event(&mut self, event: SpeechEvent, effects: &mut Vec<Effect>) {
        if let EventOutcome::Failed(_) = self.speech.on_event(event) {
            self.speech_notice(NOTICE_SPEECH_ERROR, effects);
        }
    }

    pub(super) fn handle_pointer_moved(&mut self, y: f64) {
        if !self.store.settings().reading_guide || !y.is_finite() {
            return;
        }
        self.document.set_style(Node::Guide, "top", &format!("{y}px"));
    }

    pub(super) fn handle_patch_settings(
        &mut self,
        patch: &SettingsPatch,
        effects: &mut Vec<Effect>,
    ) {
        let changed = self.store.patch(patch);
        debug!(changed, "Applied settings patch");
        effects.push(Effect::ApplyPresentation);
        effects.push(Effect::SaveSettings);
    }

    fn speech_notice(&self, message: &str, effects: &mut Vec<Effect>) {
        if self.config.speech_notices {
            effects.push(Effect::Notify(message.to_string()));
        }
    }
}
