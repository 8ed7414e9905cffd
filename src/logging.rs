//! `tracing` output routed to the browser console.

use ada_panel_core::LogLevel;
use std::io;
use std::sync::OnceLock;
use tracing::{Level, Metadata, info, warn};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*, reload};
use wasm_bindgen::JsValue;
use web_sys::console;

type ReloadHandle = reload::Handle<EnvFilter, Registry>;

static RELOAD_HANDLE: OnceLock<ReloadHandle> = OnceLock::new();

/// Install the console subscriber once per page. Later calls are no-ops.
pub(crate) fn init_tracing() {
    if RELOAD_HANDLE.get().is_some() {
        return;
    }
    let (filter_layer, handle) = reload::Layer::new(EnvFilter::new("info"));
    let installed = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_ansi(false)
                .without_time()
                .with_target(true)
                .with_writer(ConsoleMakeWriter)
                .with_filter(filter_layer),
        )
        .try_init();
    if installed.is_ok() {
        let _ = RELOAD_HANDLE.set(handle);
    }
}

pub(crate) fn set_log_level(level: LogLevel) {
    let Some(handle) = RELOAD_HANDLE.get() else {
        return;
    };
    let parsed = EnvFilter::builder()
        .parse(level.as_filter_str())
        .unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(err) = handle.modify(|filter| *filter = parsed) {
        warn!(%level, "Failed to update log level from config: {err}");
    } else {
        info!(%level, "Applied log level from config");
    }
}

struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(*meta.level())
    }
}

/// Buffers one formatted event and hands it to the matching console method
/// when dropped.
struct ConsoleWriter {
    level: Level,
    buffer: Vec<u8>,
}

impl ConsoleWriter {
    fn new(level: Level) -> Self {
        Self {
            level,
            buffer: Vec::new(),
        }
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let text = String::from_utf8_lossy(&self.buffer);
        let line = JsValue::from_str(text.trim_end());
        if self.level == Level::ERROR {
            console::error_1(&line);
        } else if self.level == Level::WARN {
            console::warn_1(&line);
        } else if self.level == Level::INFO {
            console::info_1(&line);
        } else {
            console::debug_1(&line);
        }
    }
}
