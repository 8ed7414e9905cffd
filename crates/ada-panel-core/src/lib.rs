//! Host-agnostic core of the accessibility panel: settings, persistence,
//! presentation, read-aloud and the widget reducer.
//!
//! The browser specifics sit behind three traits ([`Document`],
//! [`Storage`], [`SpeechEngine`]) so everything here runs natively in tests.

pub mod config;
pub mod error;
pub mod feature;
pub mod panel;
pub mod presentation;
pub mod settings;
pub mod shortcuts;
pub mod speech;
pub mod storage;
pub mod store;
pub mod text_utils;
pub mod widget;

#[cfg(test)]
mod testing;

pub use config::{LogLevel, WidgetConfig, parse_config, try_parse_config};
pub use error::{SpeechError, StorageError};
pub use feature::{Feature, camel_case_key};
pub use panel::ClickTarget;
pub use presentation::{Document, Node, Presentation};
pub use settings::{NumericSetting, Settings, SettingsPatch};
pub use shortcuts::{Modifiers, Shortcut};
pub use speech::{SpeechEngine, SpeechEvent, SpeechState, Utterance};
pub use storage::{FallbackStorage, MemoryStorage, Storage};
pub use widget::{Command, Delivery, Message, Notice, SharedWidget, Widget};
