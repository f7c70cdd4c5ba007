//! This crate houses common for me functions, because some things
//! are just boilerplate and aaAAAAAAAAA

use std::{ffi::OsString, fmt::Display, future::Future};

/// Tiny HTTP server that tells uptime probes we're still breathing.
pub mod keepalive;

/// Extension traits over serenity types.
pub mod useful_methods;

/// Initialize logging and run the `closure` in an async runtime.
/// Logging uses the `default_filter` directives (e.g. `"warn,my_bot=info"`)
/// unless overridden by environment variable `RUST_LOG`. This uses the crate
/// [pretty_env_logger][] internally, see its documentation for more details.
///
/// If the closure returns an error, it is logged and the process exits
/// with a non-zero status.
///
/// [pretty_env_logger]: https://docs.rs/pretty_env_logger
pub fn start_everything<E: Display>(
    default_filter: &str,
    closure: impl Future<Output = Result<(), E>>,
) {
    init_logger(default_filter);

    log::info!("hi");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to build the tokio runtime!");

    if let Err(e) = runtime.block_on(closure) {
        log::error!("Fatal error: {e}");
        // Don't wait on whatever is still spawned in there.
        runtime.shutdown_background();
        std::process::exit(1);
    }
}

/// `RUST_LOG` if it's set to something readable, `default_filter` otherwise.
fn log_filter(rust_log: Option<OsString>, default_filter: &str) -> String {
    rust_log
        .and_then(|x| x.into_string().ok())
        .filter(|x| !x.trim().is_empty())
        .unwrap_or_else(|| default_filter.to_string())
}

fn init_logger(default_filter: &str) {
    let log_level = log_filter(std::env::var_os("RUST_LOG"), default_filter);

    // Journald stamps lines by itself.
    let running_as_systemd_service = std::env::var_os("JOURNAL_STREAM").is_some();

    let mut builder = match running_as_systemd_service {
        true => pretty_env_logger::formatted_builder(),
        false => pretty_env_logger::formatted_timed_builder(),
    };

    builder.parse_filters(&log_level);

    if builder.try_init().is_err() {
        log::error!("Tried to init logger twice!");
    }
}
