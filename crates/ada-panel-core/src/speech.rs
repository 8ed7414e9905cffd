//! Read-aloud: a small state machine over a platform speech engine.

use crate::config::WidgetConfig;
use crate::error::SpeechError;
use crate::text_utils::speakable_text;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SpeechState {
    #[default]
    Idle,
    Speaking,
    Paused,
}

/// One request to the synthesizer. The id lets completion callbacks from a
/// cancelled utterance be told apart from the current one.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub id: u64,
    pub text: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
    pub lang: Option<String>,
}

/// Platform text-to-speech capability.
pub trait SpeechEngine {
    fn speak(&mut self, utterance: &Utterance) -> Result<(), SpeechError>;
    fn pause(&mut self);
    fn resume(&mut self);
    fn cancel(&mut self);
}

/// Callback from the engine about a specific utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    Finished { id: u64 },
    Failed { id: u64, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// Read-aloud is switched off in the settings.
    Disabled,
    Started { id: u64, chars: usize },
    Resumed,
    AlreadySpeaking,
    NoReadableText,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    Ignored,
    Finished,
    Failed(SpeechError),
}

pub struct SpeechController {
    engine: Option<Box<dyn SpeechEngine>>,
    state: SpeechState,
    current: Option<Utterance>,
    request_id: u64,
    rate: f32,
    pitch: f32,
    volume: f32,
    lang: Option<String>,
    max_chars: usize,
}

impl SpeechController {
    pub fn new(engine: Option<Box<dyn SpeechEngine>>, config: &WidgetConfig) -> Self {
        Self {
            engine,
            state: SpeechState::Idle,
            current: None,
            request_id: 0,
            rate: config.speech_rate,
            pitch: config.speech_pitch,
            volume: config.speech_volume,
            lang: config.speech_lang.clone(),
            max_chars: config.speech_max_chars,
        }
    }

    pub fn state(&self) -> SpeechState {
        self.state
    }

    pub fn is_supported(&self) -> bool {
        self.engine.is_some()
    }

    /// Speaking or paused.
    pub fn is_active(&self) -> bool {
        self.state != SpeechState::Idle
    }

    pub fn current(&self) -> Option<&Utterance> {
        self.current.as_ref()
    }

    /// Start reading, or resume when paused. `page_text` is only called when
    /// a new utterance is actually needed.
    pub fn start(
        &mut self,
        enabled: bool,
        page_text: impl FnOnce() -> String,
    ) -> Result<StartOutcome, SpeechError> {
        if !enabled {
            debug!("Read-aloud disabled; ignoring start");
            return Ok(StartOutcome::Disabled);
        }

        match self.state {
            SpeechState::Speaking => Ok(StartOutcome::AlreadySpeaking),
            SpeechState::Paused => {
                let engine = self.engine.as_mut().ok_or(SpeechError::Unsupported)?;
                engine.resume();
                self.state = SpeechState::Speaking;
                info!("Resumed speech");
                Ok(StartOutcome::Resumed)
            }
            SpeechState::Idle => {
                let Some(engine) = self.engine.as_mut() else {
                    return Err(SpeechError::Unsupported);
                };
                let text = speakable_text(&page_text(), self.max_chars);
                if text.is_empty() {
                    debug!("No speakable text on page");
                    return Ok(StartOutcome::NoReadableText);
                }

                self.request_id = self.request_id.wrapping_add(1);
                let utterance = Utterance {
                    id: self.request_id,
                    text,
                    rate: self.rate,
                    pitch: self.pitch,
                    volume: self.volume,
                    lang: self.lang.clone(),
                };
                let chars = utterance.text.chars().count();
                engine.speak(&utterance)?;

                info!(id = utterance.id, chars, "Started speech");
                self.current = Some(utterance);
                self.state = SpeechState::Speaking;
                Ok(StartOutcome::Started {
                    id: self.request_id,
                    chars,
                })
            }
        }
    }

    /// Pause from `Speaking`; returns whether anything changed.
    pub fn pause(&mut self) -> bool {
        if self.state != SpeechState::Speaking {
            return false;
        }
        if let Some(engine) = self.engine.as_mut() {
            engine.pause();
        }
        self.state = SpeechState::Paused;
        info!("Paused speech");
        true
    }

    /// Cancel unconditionally and drop the utterance. Returns whether speech
    /// was active beforehand.
    pub fn stop(&mut self) -> bool {
        let was_active = self.is_active();
        if let Some(engine) = self.engine.as_mut() {
            engine.cancel();
        }
        self.state = SpeechState::Idle;
        if let Some(utterance) = self.current.take() {
            debug!(id = utterance.id, "Stopped speech");
        }
        was_active
    }

    pub fn on_event(&mut self, event: SpeechEvent) -> EventOutcome {
        let current_id = self.current.as_ref().map(|utterance| utterance.id);
        match event {
            SpeechEvent::Finished { id } if Some(id) == current_id => {
                info!(id, "Speech finished");
                self.state = SpeechState::Idle;
                self.current = None;
                EventOutcome::Finished
            }
            SpeechEvent::Failed { id, reason } if Some(id) == current_id => {
                warn!(id, %reason, "Speech failed");
                self.state = SpeechState::Idle;
                self.current = None;
                EventOutcome::Failed(SpeechError::Engine(reason))
            }
            SpeechEvent::Finished { id } | SpeechEvent::Failed { id, .. } => {
                debug!(id, current = ?current_id, "Ignoring stale speech event");
                EventOutcome::Ignored
            }
        }
    }
}
