use crate::storage::js_error_text;
use ada_panel_core::{Message, SpeechEngine, SpeechError, SpeechEvent, Utterance};
use gloo::events::EventListener;
use std::rc::Rc;
use tracing::debug;
use wasm_bindgen::JsCast;
use web_sys::{Event, SpeechSynthesis, SpeechSynthesisErrorEvent, SpeechSynthesisUtterance};

pub(crate) type Dispatch = Rc<dyn Fn(Message)>;

/// `window.speechSynthesis`, reporting completion back as [`Message::Speech`].
pub(crate) struct WebSpeech {
    synth: SpeechSynthesis,
    dispatch: Dispatch,
    utterance: Option<SpeechSynthesisUtterance>,
    listeners: Vec<EventListener>,
}

impl WebSpeech {
    /// `None` when the browser has no speech synthesis.
    pub(crate) fn new(dispatch: Dispatch) -> Option<Self> {
        let synth = web_sys::window()?.speech_synthesis().ok()?;
        Some(Self {
            synth,
            dispatch,
            utterance: None,
            listeners: Vec::new(),
        })
    }
}

impl SpeechEngine for WebSpeech {
    fn speak(&mut self, utterance: &Utterance) -> Result<(), SpeechError> {
        let native = SpeechSynthesisUtterance::new_with_text(&utterance.text)
            .map_err(|err| SpeechError::Engine(js_error_text(&err)))?;
        native.set_rate(utterance.rate);
        native.set_pitch(utterance.pitch);
        native.set_volume(utterance.volume);
        if let Some(lang) = &utterance.lang {
            native.set_lang(lang);
        }

        let id = utterance.id;
        let dispatch = Rc::clone(&self.dispatch);
        let on_end = EventListener::new(&native, "end", move |_event: &Event| {
            dispatch(Message::Speech(SpeechEvent::Finished { id }));
        });
        let dispatch = Rc::clone(&self.dispatch);
        let on_error = EventListener::new(&native, "error", move |event: &Event| {
            let reason = event
                .dyn_ref::<SpeechSynthesisErrorEvent>()
                .map(|event| format!("{:?}", event.error()))
                .unwrap_or_else(|| "unknown".to_string());
            dispatch(Message::Speech(SpeechEvent::Failed { id, reason }));
        });

        self.cancel();
        self.listeners = vec![on_end, on_error];
        self.synth.speak(&native);
        self.utterance = Some(native);
        debug!(id, "Queued utterance");
        Ok(())
    }

    fn pause(&mut self) {
        self.synth.pause();
    }

    fn resume(&mut self) {
        self.synth.resume();
    }

    fn cancel(&mut self) {
        // Detach first so the cancelled utterance cannot report back.
        self.listeners.clear();
        self.utterance = None;
        self.synth.cancel();
    }
}
