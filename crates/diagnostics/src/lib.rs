//! Lightweight structured logging for the polyfs workspace.
//!
//! Usage:
//! - Set POLYFS_LOG=off (default) - no logs
//! - Set POLYFS_LOG=info - basic operation logs
//! - Set POLYFS_LOG=debug - detailed diagnostic logs

use std::sync::Once;

// Re-export emit so macros can use it
pub use emit;

static INIT: Once = Once::new();

/// Initialize diagnostics based on the POLYFS_LOG environment variable.
///
/// Call once at startup; subsequent calls are ignored.
pub fn init_diagnostics() {
    INIT.call_once(|| {
        let log_level = std::env::var("POLYFS_LOG").unwrap_or_else(|_| "off".to_string());

        let rt = match log_level.as_str() {
            "off" => return,
            "debug" => emit::setup()
                .emit_to(emit_term::stderr())
                .emit_when(emit::level::min_filter(emit::Level::Debug))
                .init(),
            "info" => emit::setup()
                .emit_to(emit_term::stderr())
                .emit_when(emit::level::min_filter(emit::Level::Info))
                .init(),
            "warn" => emit::setup()
                .emit_to(emit_term::stderr())
                .emit_when(emit::level::min_filter(emit::Level::Warn))
                .init(),
            "error" => emit::setup()
                .emit_to(emit_term::stderr())
                .emit_when(emit::level::min_filter(emit::Level::Error))
                .init(),
            _ => {
                let rt = emit::setup()
                    .emit_to(emit_term::stderr())
                    .emit_when(emit::level::min_filter(emit::Level::Info))
                    .init();
                eprintln!(
                    "Warning: Unknown POLYFS_LOG value '{}', using 'info'",
                    log_level
                );
                rt
            }
        };

        // The runtime must live for the rest of the process.
        std::mem::forget(rt);
    });
}

/// Log basic operations (mount registration, cache fills, cascades, etc.)
pub use emit::info as log_info;

/// Log detailed diagnostics (path walks, per-key cascade steps, probe bodies)
pub use emit::debug as log_debug;

/// Log recoverable issues (probe failures, endpoints demoted to DOWN)
pub use emit::warn as log_warn;

/// Log failures that abort an operation (cascade aborts, provider errors)
pub use emit::error as log_error;
