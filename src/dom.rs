//! [`Document`] over the live DOM.

use crate::storage::js_error_text;
use ada_panel_core::config::ElementSelectors;
use ada_panel_core::{ClickTarget, Document, Feature, Node};
use std::collections::HashMap;
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlButtonElement, HtmlElement, HtmlInputElement};

pub(crate) struct WebDocument {
    document: web_sys::Document,
    elements: HashMap<Node, Element>,
}

impl WebDocument {
    /// Resolve every widget element once. Call after the DOM is parsed.
    pub(crate) fn new(document: web_sys::Document, selectors: &ElementSelectors) -> Self {
        let mut elements = HashMap::new();
        for node in Node::all() {
            let element = match node {
                Node::Root => document.document_element(),
                Node::Body => document.body().map(Element::from),
                other => selectors
                    .selector_for(other)
                    .and_then(|selector| query(&document, &selector)),
            };
            if let Some(element) = element {
                elements.insert(node, element);
            }
        }
        report_unknown_toggles(&document, selectors);
        debug!(resolved = elements.len(), "Resolved widget elements");
        Self { document, elements }
    }

    pub(crate) fn element(&self, node: Node) -> Option<&Element> {
        self.elements.get(&node)
    }

    pub(crate) fn classify_click(&self, target: &web_sys::Node) -> ClickTarget {
        let within = |node: Node| {
            self.elements
                .get(&node)
                .is_some_and(|element| element.contains(Some(target)))
        };
        if within(Node::Panel) {
            ClickTarget::InsidePanel
        } else if within(Node::Trigger) {
            ClickTarget::Trigger
        } else {
            ClickTarget::Outside
        }
    }

    fn html(&self, node: Node) -> Option<&HtmlElement> {
        self.elements.get(&node)?.dyn_ref::<HtmlElement>()
    }
}

impl Document for WebDocument {
    fn contains(&self, node: Node) -> bool {
        self.elements.contains_key(&node)
    }

    fn set_style(&mut self, node: Node, property: &str, value: &str) {
        let Some(element) = self.html(node) else {
            return;
        };
        if let Err(err) = element.style().set_property(property, value) {
            debug!(?node, property, reason = %js_error_text(&err), "Failed to set style");
        }
    }

    fn set_class(&mut self, node: Node, class: &str, present: bool) {
        let Some(element) = self.elements.get(&node) else {
            return;
        };
        if let Err(err) = element.class_list().toggle_with_force(class, present) {
            debug!(?node, class, reason = %js_error_text(&err), "Failed to toggle class");
        }
    }

    fn set_attribute(&mut self, node: Node, name: &str, value: &str) {
        let Some(element) = self.elements.get(&node) else {
            return;
        };
        if let Err(err) = element.set_attribute(name, value) {
            debug!(?node, name, reason = %js_error_text(&err), "Failed to set attribute");
        }
    }

    fn set_disabled(&mut self, node: Node, disabled: bool) {
        let Some(element) = self.elements.get(&node) else {
            return;
        };
        if let Some(button) = element.dyn_ref::<HtmlButtonElement>() {
            button.set_disabled(disabled);
        } else if disabled {
            let _ = element.set_attribute("disabled", "");
        } else {
            let _ = element.remove_attribute("disabled");
        }
    }

    fn set_value(&mut self, node: Node, value: &str) {
        if let Some(input) = self
            .elements
            .get(&node)
            .and_then(|element| element.dyn_ref::<HtmlInputElement>())
        {
            input.set_value(value);
        }
    }

    fn set_text(&mut self, node: Node, text: &str) {
        if let Some(element) = self.elements.get(&node) {
            element.set_text_content(Some(text));
        }
    }

    fn focus(&mut self, node: Node) {
        if let Some(element) = self.html(node) {
            if let Err(err) = element.focus() {
                debug!(?node, reason = %js_error_text(&err), "Failed to focus");
            }
        }
    }

    fn visible_text(&self) -> String {
        self.document
            .body()
            .map(|body| body.inner_text())
            .unwrap_or_default()
    }
}

fn query(document: &web_sys::Document, selector: &str) -> Option<Element> {
    match document.query_selector(selector) {
        Ok(element) => element,
        Err(err) => {
            warn!(selector, reason = %js_error_text(&err), "Invalid selector");
            None
        }
    }
}

/// Toggles whose identifier is not a known feature are never bound.
fn report_unknown_toggles(document: &web_sys::Document, selectors: &ElementSelectors) {
    let Ok(toggles) = document.query_selector_all(&selectors.toggles) else {
        return;
    };
    for idx in 0..toggles.length() {
        let Some(element) = toggles.item(idx).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        match element.get_attribute(&selectors.feature_attribute) {
            Some(identifier) if Feature::from_identifier(&identifier).is_some() => {}
            Some(identifier) => warn!(%identifier, "Ignoring toggle with unknown feature"),
            None => warn!("Ignoring toggle without a feature identifier"),
        }
    }
}
