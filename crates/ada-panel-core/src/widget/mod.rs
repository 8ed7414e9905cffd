//! The root widget: owns every component and turns host events into state
//! changes plus follow-up [`Command`]s.

mod handlers;
mod messages;
mod reducer;
mod runtime;
mod shared;

pub use messages::{Command, Message, Notice};
pub use shared::{Delivery, SharedWidget};

use crate::config::WidgetConfig;
use crate::panel::PanelController;
use crate::presentation::{Document, Node, Presentation, StateApplier};
use crate::settings::Settings;
use crate::shortcuts::{Modifiers, Shortcut, ShortcutMap};
use crate::speech::{SpeechController, SpeechEngine, SpeechState};
use crate::storage::Storage;
use crate::store::SettingsStore;
use tracing::{debug, info, warn};

const WELCOME_MESSAGE: &str =
    "Accessibility widget loaded - Click the accessibility button to customize";

/// Describes work that must be performed outside the pure reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Effect {
    SaveSettings,
    ApplyPresentation,
    StopSpeech,
    Notify(String),
    FocusLater(Node),
    ConfirmReset,
}

pub struct Widget<D: Document, S: Storage> {
    config: WidgetConfig,
    document: D,
    store: SettingsStore<S>,
    applier: StateApplier,
    speech: SpeechController,
    panel: PanelController,
    shortcuts: ShortcutMap,
    initialized: bool,
    disposed: bool,
}

impl<D: Document, S: Storage> Widget<D, S> {
    pub fn new(
        config: WidgetConfig,
        document: D,
        storage: S,
        engine: Option<Box<dyn SpeechEngine>>,
    ) -> Self {
        Self {
            store: SettingsStore::new(storage, &config),
            applier: StateApplier::new(&config),
            speech: SpeechController::new(engine, &config),
            panel: PanelController::new(&config.active_class),
            shortcuts: ShortcutMap::new(&config),
            document,
            config,
            initialized: false,
            disposed: false,
        }
    }

    /// Load persisted settings, render them, and wire the panel's initial
    /// ARIA state. `session` backs the once-per-session welcome notice.
    pub fn init(&mut self, session: &mut dyn Storage) -> Vec<Command> {
        if self.initialized {
            debug!("Widget already initialized");
            return Vec::new();
        }
        self.initialized = true;

        let outcome = self.store.load();
        debug!(?outcome, "Loaded accessibility settings");
        let mut commands = Vec::new();
        self.run_effect(Effect::ApplyPresentation, &mut commands);
        self.panel.sync(&mut self.document);

        let missing = self.missing_required();
        if !missing.is_empty() {
            warn!(?missing, "Accessibility widget elements missing from the page");
        }

        if self.config.welcome_notice && self.first_visit_this_session(session) {
            commands.push(Command::ScheduleNotice {
                notice: self.notice(WELCOME_MESSAGE.to_string()),
                delay_ms: self.config.welcome_delay_ms,
            });
        }

        info!(
            speech_supported = self.speech.is_supported(),
            "Accessibility widget initialized"
        );
        commands
    }

    pub fn update(&mut self, message: Message) -> Vec<Command> {
        if self.disposed {
            debug!(?message, "Ignoring message after dispose");
            return Vec::new();
        }
        let effects = self.reduce(message);
        let mut commands = Vec::new();
        for effect in effects {
            self.run_effect(effect, &mut commands);
        }
        commands
    }

    /// Stop speech and refuse further messages.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.speech.stop();
        self.disposed = true;
        info!("Accessibility widget disposed");
    }

    /// Deferred focus requested through [`Command::FocusLater`].
    pub fn focus(&mut self, node: Node) {
        if !self.disposed {
            self.document.focus(node);
        }
    }

    pub fn settings(&self) -> Settings {
        self.store.snapshot()
    }

    pub fn presentation(&self) -> Presentation {
        Presentation::derive(self.store.settings())
    }

    pub fn speech_state(&self) -> SpeechState {
        self.speech.state()
    }

    pub fn is_panel_open(&self) -> bool {
        self.panel.is_open()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn storage(&self) -> &S {
        self.store.storage()
    }

    /// Shortcut bound to a key press, so the host can suppress the
    /// browser default before dispatching.
    pub fn shortcut_for(&self, key: &str, modifiers: Modifiers) -> Option<Shortcut> {
        self.shortcuts.resolve(key, modifiers)
    }

    pub fn missing_required(&self) -> Vec<Node> {
        Node::REQUIRED
            .into_iter()
            .filter(|node| !self.document.contains(*node))
            .collect()
    }

    fn first_visit_this_session(&self, session: &mut dyn Storage) -> bool {
        let key = &self.config.welcome_key;
        match session.get(key) {
            Ok(Some(_)) => false,
            Ok(None) => {
                if let Err(err) = session.set(key, "true") {
                    warn!("Failed to record welcome notice: {err}");
                }
                true
            }
            Err(err) => {
                debug!("Session storage unavailable, skipping welcome notice: {err}");
                false
            }
        }
    }
}
