//! Configuration for the accessibility panel.
//!
//! Everything that differs between host pages (storage key, element
//! selectors, class names, timings, shortcuts) lives here and is read from a
//! TOML document. Missing or invalid entries fall back to defaults so the
//! widget can always start.

mod defaults;
mod io;
mod models;
mod tables;

pub use io::{
    AUTO_START_SELECTOR, embedded_config, parse_config, serialize_config, try_parse_config,
};
pub use models::{ElementSelectors, LogLevel, WidgetConfig};
