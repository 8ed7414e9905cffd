//! Browser host for the accessibility panel.
//!
//! All behavior lives in `ada-panel-core`; this crate binds it to the live
//! DOM, Web Storage and `speechSynthesis`, and exposes the `AdaWidget` class
//! to JavaScript. Native builds only carry the TypeScript binding exporter.

#[cfg(target_arch = "wasm32")]
mod api;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod host;
#[cfg(target_arch = "wasm32")]
mod logging;
#[cfg(target_arch = "wasm32")]
mod speech;
#[cfg(target_arch = "wasm32")]
mod storage;

#[cfg(target_arch = "wasm32")]
pub use api::AdaWidget;

#[cfg(not(target_arch = "wasm32"))]
pub use bindings::export_ts_bindings;

#[cfg(not(target_arch = "wasm32"))]
mod bindings {
    use ada_panel_core::{Settings, SettingsPatch, SpeechState};
    use anyhow::{Context, Result};
    use std::fs;
    use std::path::Path;
    use tracing::debug;
    use ts_rs::TS;

    fn export_single_type<T: TS + 'static>(out_dir: &Path) -> Result<()> {
        T::export_all_to(out_dir)
            .with_context(|| format!("Failed to export {}", T::name()))
    }

    /// Write `.ts` declarations for the types crossing the JS boundary,
    /// replacing whatever `.ts` files `out_dir` already holds.
    pub fn export_ts_bindings(out_dir: &Path) -> Result<()> {
        fs::create_dir_all(out_dir)
            .with_context(|| format!("Failed to create {}", out_dir.display()))?;

        for entry in fs::read_dir(out_dir)
            .with_context(|| format!("Failed to list {}", out_dir.display()))?
        {
            let path = entry.context("Failed to read entry")?.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some("ts") {
                debug!(path = %path.display(), "Removing stale binding");
                fs::remove_file(&path)
                    .with_context(|| format!("Failed to remove {}", path.display()))?;
            }
        }

        export_single_type::<Settings>(out_dir)?;
        export_single_type::<SettingsPatch>(out_dir)?;
        export_single_type::<SpeechState>(out_dir)?;
        Ok(())
    }

}
