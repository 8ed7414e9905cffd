use super::messages::Message;
use super::{Effect, Widget};
use crate::presentation::Document;
use crate::shortcuts::{Shortcut, is_activation_key};
use crate::storage::Storage;
use tracing::trace;

impl<D: Document, S: Storage> Widget<D, S> {
    pub(super) fn reduce(&mut self, message: Message) -> Vec<Effect> {
        let mut effects = Vec::new();

        match message {
            Message::TriggerClicked | Message::ToggleRequested => {
                self.handle_toggle_panel(&mut effects);
            }
            Message::OpenRequested => self.handle_open_panel(&mut effects),
            Message::CloseClicked | Message::CloseRequested => self.handle_close_panel(),
            Message::DocumentClicked(target) => {
                if self.panel.closes_on_click(target) {
                    self.handle_close_panel();
                }
            }
            Message::ResetClicked => self.handle_reset_clicked(&mut effects),
            Message::ResetConfirmed | Message::ResetRequested => {
                self.handle_reset(&mut effects);
            }
            Message::KeyPressed { key, modifiers } => {
                match self.shortcuts.resolve(&key, modifiers) {
                    Some(Shortcut::TogglePanel) => self.handle_toggle_panel(&mut effects),
                    Some(Shortcut::Reset) => self.handle_reset_clicked(&mut effects),
                    Some(Shortcut::ClosePanel) => self.handle_close_panel(),
                    None => trace!(%key, "No shortcut bound"),
                }
            }
            Message::SliderChanged { setting, raw } => {
                self.handle_slider_changed(setting, &raw, &mut effects);
            }
            Message::ToggleActivated(feature) => {
                self.handle_toggle_feature(feature, &mut effects);
            }
            Message::ToggleKeyDown { feature, key } => {
                if is_activation_key(&key) {
                    self.handle_toggle_feature(feature, &mut effects);
                }
            }
            Message::ReadStartClicked => self.handle_read_start(&mut effects),
            Message::ReadPauseClicked => self.handle_read_pause(&mut effects),
            Message::ReadStopClicked => self.handle_read_stop(),
            Message::PointerMoved { y } => self.handle_pointer_moved(y),
            Message::Speech(event) => self.handle_speech_event(event, &mut effects),
            Message::PatchSettings(patch) => self.handle_patch_settings(&patch, &mut effects),
        }

        effects
    }
}
