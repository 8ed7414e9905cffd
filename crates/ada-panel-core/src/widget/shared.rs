//! A [`Widget`] reachable from callbacks that can fire while it is updating.
//!
//! Moving focus dispatches DOM events synchronously, so page code can call
//! back in mid-update. Reads then see the last completed snapshot and writes
//! are handed back to the caller to retry.

use super::{Command, Message, Widget};
use crate::presentation::Document;
use crate::settings::{Settings, SettingsPatch};
use crate::speech::SpeechState;
use crate::storage::Storage;
use std::cell::{Cell, RefCell};
use tracing::trace;

/// What became of a message handed to [`SharedWidget::update`].
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    Handled(Vec<Command>),
    /// The widget is mid-update; retry after it returns.
    Busy(Message),
    /// No widget installed yet.
    Uninstalled(Message),
}

pub struct SharedWidget<D: Document, S: Storage> {
    widget: RefCell<Option<Widget<D, S>>>,
    settings: Cell<Settings>,
    speech_state: Cell<SpeechState>,
}

impl<D: Document, S: Storage> Default for SharedWidget<D, S> {
    fn default() -> Self {
        Self {
            widget: RefCell::new(None),
            settings: Cell::new(Settings::default()),
            speech_state: Cell::new(SpeechState::default()),
        }
    }
}

impl<D: Document, S: Storage> SharedWidget<D, S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` and drops `widget` when one is already installed.
    pub fn install(&self, widget: Widget<D, S>) -> bool {
        let Ok(mut slot) = self.widget.try_borrow_mut() else {
            return false;
        };
        if slot.is_some() {
            return false;
        }
        self.remember(&widget);
        *slot = Some(widget);
        true
    }

    pub fn is_installed(&self) -> bool {
        self.widget
            .try_borrow()
            .map_or(true, |slot| slot.is_some())
    }

    pub fn is_busy(&self) -> bool {
        self.widget.try_borrow_mut().is_err()
    }

    pub fn update(&self, message: Message) -> Delivery {
        let Ok(mut slot) = self.widget.try_borrow_mut() else {
            trace!(?message, "Widget busy");
            return Delivery::Busy(message);
        };
        let Some(widget) = slot.as_mut() else {
            return Delivery::Uninstalled(message);
        };
        let commands = widget.update(message);
        self.remember(widget);
        Delivery::Handled(commands)
    }

    /// Apply `patch` and return the normalized snapshot. A patch that has to
    /// wait reports the snapshot it would produce from the last known
    /// settings.
    pub fn patch_settings(&self, patch: SettingsPatch) -> (Delivery, Settings) {
        let mut expected = self.settings();
        expected.apply_patch(&patch);
        match self.update(Message::PatchSettings(patch)) {
            Delivery::Handled(commands) => (Delivery::Handled(commands), self.settings()),
            waiting => (waiting, expected),
        }
    }

    pub fn settings(&self) -> Settings {
        match self.widget.try_borrow() {
            Ok(slot) => slot
                .as_ref()
                .map_or_else(|| self.settings.get(), |widget| widget.settings()),
            Err(_) => self.settings.get(),
        }
    }

    pub fn speech_state(&self) -> SpeechState {
        match self.widget.try_borrow() {
            Ok(slot) => slot
                .as_ref()
                .map_or_else(|| self.speech_state.get(), |widget| widget.speech_state()),
            Err(_) => self.speech_state.get(),
        }
    }

    /// `None` while busy or before install.
    pub fn with<R>(&self, f: impl FnOnce(&Widget<D, S>) -> R) -> Option<R> {
        let slot = self.widget.try_borrow().ok()?;
        slot.as_ref().map(f)
    }

    /// `None` while busy or before install.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut Widget<D, S>) -> R) -> Option<R> {
        let mut slot = self.widget.try_borrow_mut().ok()?;
        let widget = slot.as_mut()?;
        let result = f(widget);
        self.remember(widget);
        Some(result)
    }

    fn remember(&self, widget: &Widget<D, S>) {
        self.settings.set(widget.settings());
        self.speech_state.set(widget.speech_state());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WidgetConfig;
    use crate::feature::Feature;
    use crate::presentation::Node;
    use crate::settings::NumericSetting;
    use crate::storage::MemoryStorage;
    use crate::testing::RecordingDocument;
    use std::rc::{Rc, Weak};

    type FocusHook = Rc<RefCell<Option<Box<dyn Fn(Node)>>>>;
    type Shared = SharedWidget<CallbackDocument, MemoryStorage>;

    /// Runs a hook from `focus`, the way the browser fires focus listeners
    /// before `focus()` returns.
    struct CallbackDocument {
        inner: RecordingDocument,
        on_focus: FocusHook,
    }

    impl Document for CallbackDocument {
        fn contains(&self, node: Node) -> bool {
            self.inner.contains(node)
        }

        fn set_style(&mut self, node: Node, property: &str, value: &str) {
            self.inner.set_style(node, property, value);
        }

        fn set_class(&mut self, node: Node, class: &str, present: bool) {
            self.inner.set_class(node, class, present);
        }

        fn set_attribute(&mut self, node: Node, name: &str, value: &str) {
            self.inner.set_attribute(node, name, value);
        }

        fn set_disabled(&mut self, node: Node, disabled: bool) {
            self.inner.set_disabled(node, disabled);
        }

        fn set_value(&mut self, node: Node, value: &str) {
            self.inner.set_value(node, value);
        }

        fn set_text(&mut self, node: Node, text: &str) {
            self.inner.set_text(node, text);
        }

        fn focus(&mut self, node: Node) {
            self.inner.focus(node);
            if let Some(hook) = self.on_focus.borrow().as_ref() {
                hook(node);
            }
        }

        fn visible_text(&self) -> String {
            self.inner.visible_text()
        }
    }

    fn shared() -> (Rc<Shared>, FocusHook) {
        let on_focus: FocusHook = Rc::new(RefCell::new(None));
        let document = CallbackDocument {
            inner: RecordingDocument::complete(),
            on_focus: Rc::clone(&on_focus),
        };
        let mut widget = Widget::new(WidgetConfig::default(), document, MemoryStorage::new(), None);
        widget.init(&mut MemoryStorage::new());
        let shared = Rc::new(SharedWidget::new());
        assert!(shared.install(widget));
        (shared, on_focus)
    }

    fn zoom_patch(zoom: f64) -> SettingsPatch {
        let mut patch = SettingsPatch::default();
        patch.set_numeric(NumericSetting::Zoom, Some(zoom));
        patch
    }

    #[derive(Debug)]
    struct Observed {
        settings: Settings,
        speech_state: SpeechState,
        busy: bool,
        close: Delivery,
        patched: (Delivery, Settings),
        disposed_now: Option<()>,
    }

    #[test]
    fn callbacks_during_focus_read_the_last_snapshot() {
        let (shared, on_focus) = shared();
        shared.update(Message::ToggleActivated(Feature::Invert));
        shared.update(Message::OpenRequested);

        let observed: Rc<RefCell<Vec<Observed>>> = Rc::default();
        let weak: Weak<Shared> = Rc::downgrade(&shared);
        let log = Rc::clone(&observed);
        *on_focus.borrow_mut() = Some(Box::new(move |node| {
            assert_eq!(node, Node::Trigger);
            let shared = weak.upgrade().expect("widget alive");
            log.borrow_mut().push(Observed {
                settings: shared.settings(),
                speech_state: shared.speech_state(),
                busy: shared.is_busy(),
                close: shared.update(Message::CloseRequested),
                patched: shared.patch_settings(zoom_patch(350.0)),
                disposed_now: shared.with_mut(|widget| widget.dispose()),
            });
        }));

        let delivery = shared.update(Message::CloseRequested);
        assert!(matches!(delivery, Delivery::Handled(_)));

        let observed = observed.borrow();
        assert_eq!(observed.len(), 1);
        let seen = &observed[0];
        assert!(seen.settings.invert);
        assert_eq!(seen.speech_state, SpeechState::Idle);
        assert!(seen.busy);
        assert_eq!(seen.close, Delivery::Busy(Message::CloseRequested));
        assert!(matches!(seen.patched.0, Delivery::Busy(Message::PatchSettings(_))));
        assert_eq!(seen.patched.1.zoom, 300);
        assert!(seen.patched.1.invert);
        assert_eq!(seen.disposed_now, None);

        // The deferred patch has not run; the widget itself is untouched.
        assert!(!shared.is_busy());
        assert_eq!(shared.settings().zoom, 100);
        assert!(shared.with(|widget| !widget.is_disposed()).expect("installed"));
    }

    #[test]
    fn patches_before_install_report_the_expected_snapshot() {
        let shared: Shared = SharedWidget::new();
        assert!(!shared.is_installed());
        let (delivery, snapshot) = shared.patch_settings(zoom_patch(125.0));
        assert!(matches!(delivery, Delivery::Uninstalled(Message::PatchSettings(_))));
        assert_eq!(snapshot.zoom, 130);
        assert_eq!(shared.settings(), Settings::default());
        assert_eq!(shared.with(|widget| widget.settings()), None);
    }

    #[test]
    fn handled_patches_return_the_live_snapshot() {
        let (shared, _on_focus) = shared();
        let (delivery, snapshot) = shared.patch_settings(zoom_patch(50.0));
        assert!(matches!(delivery, Delivery::Handled(_)));
        assert_eq!(snapshot.zoom, 100);
        assert_eq!(shared.settings(), snapshot);
    }

    #[test]
    fn second_install_is_refused() {
        let (shared, _on_focus) = shared();
        let spare = Widget::new(
            WidgetConfig::default(),
            CallbackDocument {
                inner: RecordingDocument::complete(),
                on_focus: Rc::new(RefCell::new(None)),
            },
            MemoryStorage::new(),
            None,
        );
        assert!(!shared.install(spare));
        assert!(shared.is_installed());
    }
}
