//! Shutdown state for watch mode.
//!
//! A single `SHUTDOWN` flag (set on Ctrl+C) plus an optional wake-up channel
//! so the watch loop can observe the flag without waiting out its timeout.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Wake-up channel for the watch loop
static SHUTDOWN_TX: OnceLock<crossbeam::channel::Sender<()>> = OnceLock::new();

/// Setup the global Ctrl+C handler. Call once at program start
///
/// The first Ctrl+C sets the `SHUTDOWN` flag and wakes the watch loop,
/// which lets any in-flight build finish before the process exits.
/// A second Ctrl+C exits immediately.
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        if SHUTDOWN.swap(true, Ordering::SeqCst) {
            std::process::exit(130);
        }
        if let Some(tx) = SHUTDOWN_TX.get() {
            let _ = tx.send(());
        }
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Register the watch loop's wake-up channel
///
/// Call this before entering the watch event loop.
pub fn register_shutdown_channel(tx: crossbeam::channel::Sender<()>) {
    let _ = SHUTDOWN_TX.set(tx);
}

/// Check if shutdown has been requested
///
/// Uses Relaxed ordering for performance - worst case is processing
/// one more batch before stopping, which is acceptable
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shutdown_flag_roundtrip() {
        SHUTDOWN.store(false, Ordering::SeqCst);
        assert!(!is_shutdown());

        SHUTDOWN.store(true, Ordering::SeqCst);
        assert!(is_shutdown());

        SHUTDOWN.store(false, Ordering::SeqCst);
    }
}
