//! Panel visibility and its ARIA wiring.

use crate::presentation::{Document, Node};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelTransition {
    Opened,
    Closed,
    Unchanged,
}

/// Where a document-level click landed, classified by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    InsidePanel,
    Trigger,
    Outside,
}

#[derive(Debug, Clone)]
pub struct PanelController {
    open: bool,
    active_class: String,
}

impl PanelController {
    pub fn new(active_class: &str) -> Self {
        Self {
            open: false,
            active_class: active_class.to_string(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open<D: Document + ?Sized>(&mut self, document: &mut D) -> PanelTransition {
        if self.open {
            return PanelTransition::Unchanged;
        }
        if !document.contains(Node::Panel) {
            debug!("Panel element missing; cannot open");
            return PanelTransition::Unchanged;
        }
        self.open = true;
        self.sync(document);
        debug!("Panel opened");
        PanelTransition::Opened
    }

    /// Close and hand focus back to the trigger.
    pub fn close<D: Document + ?Sized>(&mut self, document: &mut D) -> PanelTransition {
        if !self.open {
            return PanelTransition::Unchanged;
        }
        self.open = false;
        self.sync(document);
        document.focus(Node::Trigger);
        debug!("Panel closed");
        PanelTransition::Closed
    }

    pub fn toggle<D: Document + ?Sized>(&mut self, document: &mut D) -> PanelTransition {
        if self.open {
            self.close(document)
        } else {
            self.open(document)
        }
    }

    /// A click outside both the panel and its trigger closes an open panel.
    pub fn closes_on_click(&self, target: ClickTarget) -> bool {
        self.open && target == ClickTarget::Outside
    }

    /// Write the current visibility to the panel class and `aria-expanded`.
    pub fn sync<D: Document + ?Sized>(&self, document: &mut D) {
        document.set_class(Node::Panel, &self.active_class, self.open);
        document.set_attribute(
            Node::Trigger,
            "aria-expanded",
            if self.open { "true" } else { "false" },
        );
    }
}
