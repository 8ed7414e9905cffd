//! Wires a [`Widget`] to the page: event listeners in, [`Command`]s out.

use crate::dom::WebDocument;
use crate::speech::{Dispatch, WebSpeech};
use crate::storage::{WebStorage, js_error_text};
use ada_panel_core::presentation::StateApplier;
use ada_panel_core::shortcuts::is_activation_key;
use ada_panel_core::{
    Command, Delivery, FallbackStorage, Feature, Message, Modifiers, Node, Notice,
    NumericSetting, Settings, SettingsPatch, SharedWidget, SpeechEngine, SpeechState, Widget,
    WidgetConfig,
};
use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use js_sys::Reflect;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use tracing::{debug, info, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, Event, EventTarget, HtmlInputElement, KeyboardEvent, MouseEvent};

type PageStorage = FallbackStorage<WebStorage>;

pub(crate) struct Host {
    config: WidgetConfig,
    document: web_sys::Document,
    widget: SharedWidget<WebDocument, PageStorage>,
    /// Messages dispatched before the DOM was ready.
    pending: RefCell<Vec<Message>>,
    listeners: RefCell<Vec<EventListener>>,
    timers: RefCell<HashMap<u64, Timeout>>,
    finished_timers: RefCell<Vec<u64>>,
    next_timer: Cell<u64>,
    notice_class: String,
    disposed: Cell<bool>,
    this: Weak<Host>,
}

impl Host {
    /// Create the host and initialize now, or on `DOMContentLoaded` while the
    /// document is still loading.
    pub(crate) fn start(config: WidgetConfig) -> Result<Rc<Host>, JsValue> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| JsValue::from_str("no document available"))?;
        let notice_class = StateApplier::new(&config).notice_class();
        let host = Rc::new_cyclic(|this| Host {
            config,
            document,
            widget: SharedWidget::new(),
            pending: RefCell::new(Vec::new()),
            listeners: RefCell::new(Vec::new()),
            timers: RefCell::new(HashMap::new()),
            finished_timers: RefCell::new(Vec::new()),
            next_timer: Cell::new(0),
            notice_class,
            disposed: Cell::new(false),
            this: this.clone(),
        });

        if ready_state(&host.document).as_deref() == Some("loading") {
            debug!("Document still loading; deferring widget init");
            let weak = Rc::downgrade(&host);
            let listener = EventListener::once(&host.document, "DOMContentLoaded", move |_| {
                if let Some(host) = weak.upgrade() {
                    host.init();
                }
            });
            host.listeners.borrow_mut().push(listener);
        } else {
            host.init();
        }
        Ok(host)
    }

    fn init(self: &Rc<Self>) {
        if self.disposed.get() || self.widget.is_installed() {
            return;
        }
        let document = WebDocument::new(self.document.clone(), &self.config.selectors);
        let engine = WebSpeech::new(self.dispatcher())
            .map(|speech| Box::new(speech) as Box<dyn SpeechEngine>);
        if engine.is_none() {
            info!("Speech synthesis not available in this browser");
        }
        let storage = FallbackStorage::new(WebStorage::local());
        let mut widget = Widget::new(self.config.clone(), document, storage, engine);
        let commands = widget.init(&mut FallbackStorage::new(WebStorage::session()));
        if !self.widget.install(widget) {
            return;
        }

        self.install_listeners();
        self.run_commands(commands);

        let pending = std::mem::take(&mut *self.pending.borrow_mut());
        for message in pending {
            self.dispatch(message);
        }
    }

    fn dispatcher(&self) -> Dispatch {
        let weak = self.this.clone();
        Rc::new(move |message| {
            if let Some(host) = weak.upgrade() {
                host.dispatch(message);
            }
        })
    }

    /// Feed a message to the widget and run the resulting commands.
    pub(crate) fn dispatch(self: &Rc<Self>, message: Message) {
        if self.disposed.get() {
            return;
        }
        let delivery = self.widget.update(message);
        self.deliver(delivery);
    }

    /// Like [`Host::dispatch`], returning the normalized snapshot even when
    /// the patch has to wait.
    pub(crate) fn patch_settings(self: &Rc<Self>, patch: SettingsPatch) -> Settings {
        if self.disposed.get() {
            return self.widget.settings();
        }
        let (delivery, snapshot) = self.widget.patch_settings(patch);
        self.deliver(delivery);
        snapshot
    }

    fn deliver(self: &Rc<Self>, delivery: Delivery) {
        match delivery {
            Delivery::Handled(commands) => self.run_commands(commands),
            Delivery::Busy(message) => {
                // Raised from inside an update (a focus or speech callback);
                // retry once the current update has returned.
                let host = Rc::clone(self);
                self.schedule(0, move || host.dispatch(message));
            }
            Delivery::Uninstalled(message) => self.pending.borrow_mut().push(message),
        }
    }

    /// Safe to call from callbacks raised mid-update.
    pub(crate) fn settings(&self) -> Settings {
        self.widget.settings()
    }

    pub(crate) fn speech_state(&self) -> SpeechState {
        self.widget.speech_state()
    }

    /// Teardown waits for a running update to return first.
    pub(crate) fn dispose(self: &Rc<Self>) {
        if self.disposed.replace(true) {
            return;
        }
        self.pending.borrow_mut().clear();
        if self.widget.is_busy() {
            debug!("Widget busy; finishing dispose after the current update");
            let host = Rc::clone(self);
            let _ = Timeout::new(0, move || host.teardown()).forget();
        } else {
            self.teardown();
        }
    }

    fn teardown(&self) {
        self.listeners.borrow_mut().clear();
        self.timers.borrow_mut().clear();
        self.widget.with_mut(|widget| widget.dispose());
        self.remove_notices();
    }

    /// Their removal timers died with `dispose`.
    fn remove_notices(&self) {
        let Ok(notices) = self
            .document
            .query_selector_all(&format!(".{}", self.notice_class))
        else {
            return;
        };
        for idx in 0..notices.length() {
            if let Some(element) = notices.item(idx).and_then(|node| node.dyn_into::<Element>().ok()) {
                element.remove();
            }
        }
    }

    fn run_commands(self: &Rc<Self>, commands: Vec<Command>) {
        if self.disposed.get() {
            return;
        }
        for command in commands {
            match command {
                Command::FocusLater { node, delay_ms } => {
                    let weak = Rc::downgrade(self);
                    self.schedule(delay_ms, move || {
                        if let Some(host) = weak.upgrade() {
                            host.widget.with_mut(|widget| widget.focus(node));
                        }
                    });
                }
                Command::ShowNotice(notice) => self.show_notice(&notice),
                Command::ScheduleNotice { notice, delay_ms } => {
                    let weak = Rc::downgrade(self);
                    self.schedule(delay_ms, move || {
                        if let Some(host) = weak.upgrade() {
                            host.show_notice(&notice);
                        }
                    });
                }
                Command::ConfirmReset { prompt } => {
                    let confirmed = web_sys::window()
                        .map(|window| window.confirm_with_message(&prompt).unwrap_or(false))
                        .unwrap_or(false);
                    if confirmed {
                        self.dispatch(Message::ResetConfirmed);
                    } else {
                        debug!("Reset cancelled");
                    }
                }
            }
        }
    }

    fn show_notice(self: &Rc<Self>, notice: &Notice) {
        let Some(body) = self.document.body() else {
            return;
        };
        let element = match self.document.create_element("div") {
            Ok(element) => element,
            Err(err) => {
                warn!(reason = %js_error_text(&err), "Failed to create notice");
                return;
            }
        };
        element.set_class_name(&self.notice_class);
        let _ = element.set_attribute("role", "status");
        let _ = element.set_attribute("aria-live", "polite");
        element.set_text_content(Some(&notice.message));
        if let Err(err) = body.append_child(&element) {
            warn!(reason = %js_error_text(&err), "Failed to show notice");
            return;
        }
        debug!(message = %notice.message, "Showing notice");

        let leaving_class = format!("{}-leaving", self.notice_class);
        let fade_ms = notice.fade_ms;
        let weak = Rc::downgrade(self);
        self.schedule(notice.duration_ms, move || {
            let _ = element.class_list().add_1(&leaving_class);
            if let Some(host) = weak.upgrade() {
                host.schedule(fade_ms, move || element.remove());
            } else {
                element.remove();
            }
        });
    }

    /// Run `callback` after `delay_ms`. Pending timers are cancelled on
    /// dispose.
    fn schedule(&self, delay_ms: u64, callback: impl FnOnce() + 'static) {
        if self.disposed.get() {
            return;
        }
        for id in self.finished_timers.borrow_mut().drain(..) {
            self.timers.borrow_mut().remove(&id);
        }
        let id = self.next_timer.get();
        self.next_timer.set(id.wrapping_add(1));
        let weak = self.this.clone();
        let delay = u32::try_from(delay_ms).unwrap_or(u32::MAX);
        let timeout = Timeout::new(delay, move || {
            callback();
            // Reclaimed by the next `schedule`, never from inside its own callback.
            if let Some(host) = weak.upgrade() {
                host.finished_timers.borrow_mut().push(id);
            }
        });
        self.timers.borrow_mut().insert(id, timeout);
    }

    fn install_listeners(self: &Rc<Self>) {
        let Some(elements) = self.element_targets() else {
            return;
        };
        let mut listeners = Vec::new();

        for (node, message) in [
            (Node::Trigger, Message::TriggerClicked),
            (Node::CloseButton, Message::CloseClicked),
            (Node::ResetButton, Message::ResetClicked),
            (Node::ReadStart, Message::ReadStartClicked),
            (Node::ReadPause, Message::ReadPauseClicked),
            (Node::ReadStop, Message::ReadStopClicked),
        ] {
            if let Some(target) = elements.get(&node) {
                listeners.push(self.listen(target, "click", move |_| Some(message.clone())));
            }
        }

        for setting in NumericSetting::ALL {
            if let Some(target) = elements.get(&Node::Slider(setting)) {
                listeners.push(self.listen(target, "input", move |event| {
                    let input = event.target()?.dyn_into::<HtmlInputElement>().ok()?;
                    Some(Message::SliderChanged {
                        setting,
                        raw: input.value(),
                    })
                }));
            }
        }

        for feature in Feature::ALL {
            let Some(target) = elements.get(&Node::Toggle(feature)) else {
                continue;
            };
            listeners.push(self.listen(target, "click", move |_| {
                Some(Message::ToggleActivated(feature))
            }));
            listeners.push(self.listen(target, "keydown", move |event| {
                let event = event.dyn_ref::<KeyboardEvent>()?;
                let key = event.key();
                if !is_activation_key(&key) {
                    return None;
                }
                event.prevent_default();
                Some(Message::ToggleKeyDown { feature, key })
            }));
        }

        let document: &EventTarget = self.document.as_ref();
        listeners.push(self.listen(document, "mousemove", |event| {
            let event = event.dyn_ref::<MouseEvent>()?;
            Some(Message::PointerMoved {
                y: f64::from(event.client_y()),
            })
        }));

        let weak = Rc::downgrade(self);
        listeners.push(self.listen(document, "click", move |event| {
            let host = weak.upgrade()?;
            let target = event.target()?.dyn_into::<web_sys::Node>().ok()?;
            let click = host
                .widget
                .with(|widget| widget.document().classify_click(&target))?;
            Some(Message::DocumentClicked(click))
        }));

        let weak = Rc::downgrade(self);
        listeners.push(self.listen(document, "keydown", move |event| {
            let host = weak.upgrade()?;
            let event = event.dyn_ref::<KeyboardEvent>()?;
            let key = event.key();
            let modifiers = Modifiers {
                ctrl: event.ctrl_key(),
                alt: event.alt_key(),
                shift: event.shift_key(),
                meta: event.meta_key(),
            };
            let shortcut = host
                .widget
                .with(|widget| widget.shortcut_for(&key, modifiers))??;
            if shortcut.prevents_default() {
                event.prevent_default();
            }
            Some(Message::KeyPressed { key, modifiers })
        }));

        debug!(count = listeners.len(), "Installed widget listeners");
        self.listeners.borrow_mut().extend(listeners);
    }

    fn element_targets(&self) -> Option<HashMap<Node, EventTarget>> {
        self.widget.with(|widget| {
            let document = widget.document();
            Node::all()
                .into_iter()
                .filter_map(|node| {
                    document
                        .element(node)
                        .map(|element| (node, EventTarget::from(element.clone())))
                })
                .collect()
        })
    }

    fn listen(
        self: &Rc<Self>,
        target: &EventTarget,
        event_type: &'static str,
        to_message: impl Fn(&Event) -> Option<Message> + 'static,
    ) -> EventListener {
        let weak = Rc::downgrade(self);
        EventListener::new(target, event_type, move |event| {
            let Some(message) = to_message(event) else {
                return;
            };
            if let Some(host) = weak.upgrade() {
                host.dispatch(message);
            }
        })
    }
}

fn ready_state(document: &web_sys::Document) -> Option<String> {
    Reflect::get(document, &JsValue::from_str("readyState"))
        .ok()
        .and_then(|state| state.as_string())
}
