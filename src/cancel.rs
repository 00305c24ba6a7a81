//! Ctrl+C handling: the flag is polled between file changes, so an
//! interrupted run never stops halfway through writing a file.

use std::sync::atomic::{AtomicBool, Ordering};

static CANCELLED: AtomicBool = AtomicBool::new(false);

/// Check if cancellation has been requested.
pub fn is_cancelled() -> bool {
    CANCELLED.load(Ordering::SeqCst)
}

/// Reset the cancellation flag (for testing or re-use).
pub fn reset() {
    CANCELLED.store(false, Ordering::SeqCst);
}

/// Request cancellation without a signal.
pub fn cancel() {
    CANCELLED.store(true, Ordering::SeqCst);
}

/// Register the Ctrl+C handler.
///
/// Only the first call in a process installs a handler; later calls log and
/// return.
pub fn register_handler() {
    if let Err(err) = ctrlc::set_handler(cancel) {
        log::debug!("Ctrl+C handler not installed: {}", err);
    }
}

