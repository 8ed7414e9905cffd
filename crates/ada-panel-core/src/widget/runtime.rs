use super::messages::{Command, Notice};
use super::{Effect, Widget};
use crate::presentation::Document;
use crate::storage::Storage;
use tracing::info;

pub(super) const RESET_PROMPT: &str = "Reset all accessibility settings to default?";

impl<D: Document, S: Storage> Widget<D, S> {
    pub(super) fn run_effect(&mut self, effect: Effect, commands: &mut Vec<Command>) {
        match effect {
            Effect::SaveSettings => {
                self.store.save();
            }
            Effect::ApplyPresentation => {
                let settings = self.store.snapshot();
                self.applier.apply(&settings, &mut self.document);
                if !settings.read_aloud && self.speech.is_active() {
                    info!("Read-aloud switched off; stopping speech");
                    self.speech.stop();
                }
            }
            Effect::StopSpeech => {
                self.speech.stop();
            }
            Effect::Notify(message) => commands.push(Command::ShowNotice(self.notice(message))),
            Effect::FocusLater(node) => commands.push(Command::FocusLater {
                node,
                delay_ms: self.config.focus_delay_ms,
            }),
            Effect::ConfirmReset => commands.push(Command::ConfirmReset {
                prompt: RESET_PROMPT.to_string(),
            }),
        }
    }

    pub(super) fn notice(&self, message: String) -> Notice {
        Notice {
            message,
            duration_ms: self.config.notice_duration_ms,
            fade_ms: self.config.notice_fade_ms,
        }
    }
}
