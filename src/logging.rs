use std::panic;

use tracing_subscriber::EnvFilter;

/// Installs the stderr log subscriber (filtered by `RUST_LOG`) and a panic
/// hook that routes panics through it. Safe to call more than once.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
    set_panic_hook();
}

fn set_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        tracing::error!(
            message = "panic occurred",
            panic = %panic_info
        );
    }));
}
