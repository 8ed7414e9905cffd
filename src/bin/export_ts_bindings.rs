#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::PathBuf;

    let out_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("bindings"));
    if let Err(err) = ada_panel::export_ts_bindings(&out_dir) {
        eprintln!("failed to export TS bindings: {err:?}");
        std::process::exit(1);
    }
    println!("exported TS bindings to {}", out_dir.display());
}

#[cfg(target_arch = "wasm32")]
fn main() {}
