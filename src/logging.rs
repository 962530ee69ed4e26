//! # Simple logging hook for debugging and demos.
//!
//! [`LogHook`] prints status transitions to stdout in a human-readable
//! format. This is primarily useful for development, debugging, and the
//! bundled demos.
//!
//! ## Output format
//! ```text
//! [status] -> processing
//! [status] -> paused
//! [status] -> idle
//! ```

use std::sync::Arc;

use crate::config::StatusHook;

/// Simple stdout status hook.
///
/// Enabled via the `logging` feature. Not intended for production use -
/// supply a custom hook for structured logging or metrics collection.
///
/// ## Example
/// ```no_run
/// use taskline::{Queue, QueueConfig, LogHook};
///
/// let queue = Queue::new(QueueConfig {
///     pause_on_error: false,
///     on_status_change: Some(LogHook::arc()),
/// });
/// ```
pub struct LogHook;

impl LogHook {
    /// Returns the hook as a [`StatusHook`] ready for `QueueConfig`.
    pub fn arc() -> StatusHook {
        Arc::new(|status| println!("[status] -> {status}"))
    }
}
