//! Recording fakes shared by the unit tests.

use crate::error::SpeechError;
use crate::presentation::{Document, Node};
use crate::speech::{SpeechEngine, Utterance};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

/// In-memory document that records state and counts effective changes.
#[derive(Debug, Default)]
pub(crate) struct RecordingDocument {
    present: BTreeSet<Node>,
    styles: BTreeMap<(Node, String), String>,
    classes: BTreeSet<(Node, String)>,
    attributes: BTreeMap<(Node, String), String>,
    disabled: BTreeSet<Node>,
    values: BTreeMap<Node, String>,
    texts: BTreeMap<Node, String>,
    focus_log: Vec<Node>,
    page_text: String,
    changes: usize,
}

impl RecordingDocument {
    pub(crate) fn complete() -> Self {
        Self::with_nodes(Node::all())
    }

    pub(crate) fn with_nodes(nodes: impl IntoIterator<Item = Node>) -> Self {
        Self {
            present: nodes.into_iter().collect(),
            ..Self::default()
        }
    }

    pub(crate) fn with_page_text(mut self, text: &str) -> Self {
        self.page_text = text.to_string();
        self
    }

    pub(crate) fn changes(&self) -> usize {
        self.changes
    }

    pub(crate) fn style(&self, node: Node, property: &str) -> Option<&str> {
        self.styles
            .get(&(node, property.to_string()))
            .map(String::as_str)
    }

    pub(crate) fn has_class(&self, node: Node, class: &str) -> bool {
        self.classes.contains(&(node, class.to_string()))
    }

    pub(crate) fn classes_of(&self, node: Node) -> Vec<String> {
        self.classes
            .iter()
            .filter(|(n, _)| *n == node)
            .map(|(_, class)| class.clone())
            .collect()
    }

    pub(crate) fn attribute(&self, node: Node, name: &str) -> Option<&str> {
        self.attributes
            .get(&(node, name.to_string()))
            .map(String::as_str)
    }

    pub(crate) fn is_disabled(&self, node: Node) -> bool {
        self.disabled.contains(&node)
    }

    pub(crate) fn value(&self, node: Node) -> Option<&str> {
        self.values.get(&node).map(String::as_str)
    }

    pub(crate) fn text(&self, node: Node) -> Option<&str> {
        self.texts.get(&node).map(String::as_str)
    }

    pub(crate) fn focus_log(&self) -> &[Node] {
        &self.focus_log
    }

    fn record(&mut self, changed: bool) {
        if changed {
            self.changes += 1;
        }
    }
}

impl Document for RecordingDocument {
    fn contains(&self, node: Node) -> bool {
        self.present.contains(&node)
    }

    fn set_style(&mut self, node: Node, property: &str, value: &str) {
        if !self.contains(node) {
            return;
        }
        let previous = self
            .styles
            .insert((node, property.to_string()), value.to_string());
        self.record(previous.as_deref() != Some(value));
    }

    fn set_class(&mut self, node: Node, class: &str, present: bool) {
        if !self.contains(node) {
            return;
        }
        let key = (node, class.to_string());
        let changed = if present {
            self.classes.insert(key)
        } else {
            self.classes.remove(&key)
        };
        self.record(changed);
    }

    fn set_attribute(&mut self, node: Node, name: &str, value: &str) {
        if !self.contains(node) {
            return;
        }
        let previous = self
            .attributes
            .insert((node, name.to_string()), value.to_string());
        self.record(previous.as_deref() != Some(value));
    }

    fn set_disabled(&mut self, node: Node, disabled: bool) {
        if !self.contains(node) {
            return;
        }
        let changed = if disabled {
            self.disabled.insert(node)
        } else {
            self.disabled.remove(&node)
        };
        self.record(changed);
    }

    fn set_value(&mut self, node: Node, value: &str) {
        if !self.contains(node) {
            return;
        }
        let previous = self.values.insert(node, value.to_string());
        self.record(previous.as_deref() != Some(value));
    }

    fn set_text(&mut self, node: Node, text: &str) {
        if !self.contains(node) {
            return;
        }
        let previous = self.texts.insert(node, text.to_string());
        self.record(previous.as_deref() != Some(text));
    }

    fn focus(&mut self, node: Node) {
        if self.contains(node) {
            self.focus_log.push(node);
        }
    }

    fn visible_text(&self) -> String {
        self.page_text.clone()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum EngineCall {
    Speak(Utterance),
    Pause,
    Resume,
    Cancel,
}

/// Speech engine that logs every call into a shared list.
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordingEngine {
    calls: Rc<RefCell<Vec<EngineCall>>>,
    failure: Option<String>,
}

impl RecordingEngine {
    pub(crate) fn failing(reason: &str) -> Self {
        Self {
            failure: Some(reason.to_string()),
            ..Self::default()
        }
    }

    pub(crate) fn calls(&self) -> Vec<EngineCall> {
        self.calls.borrow().clone()
    }
}

impl SpeechEngine for RecordingEngine {
    fn speak(&mut self, utterance: &Utterance) -> Result<(), SpeechError> {
        if let Some(reason) = &self.failure {
            return Err(SpeechError::Engine(reason.clone()));
        }
        self.calls
            .borrow_mut()
            .push(EngineCall::Speak(utterance.clone()));
        Ok(())
    }

    fn pause(&mut self) {
        self.calls.borrow_mut().push(EngineCall::Pause);
    }

    fn resume(&mut self) {
        self.calls.borrow_mut().push(EngineCall::Resume);
    }

    fn cancel(&mut self) {
        self.calls.borrow_mut().push(EngineCall::Cancel);
    }
}
