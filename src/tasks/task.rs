//! # Task abstraction.
//!
//! A task is an opaque async callable supplied by the embedding application.
//! The queue treats it as a black box: it has no inputs, no return value
//! beyond success/failure, and its side effects are entirely the caller's
//! responsibility.
//!
//! A task receives a [`CancellationToken`] derived from the queue's live
//! token. Cancelling the queue never interrupts a task mid-execution; the
//! token only lets long-running tasks notice cancellation and wind down
//! early if they choose to.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::TaskError;

/// # Asynchronous unit of work.
///
/// A `Task` has a stable [`name`](Task::name) and an async [`run`](Task::run)
/// method that receives a [`CancellationToken`]. The queue executes tasks one
/// at a time, strictly in submission order.
///
/// # Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use async_trait::async_trait;
/// use taskline::{Task, TaskError};
///
/// struct Demo;
///
/// #[async_trait]
/// impl Task for Demo {
///     fn name(&self) -> &str { "demo" }
///
///     async fn run(&self, ctx: CancellationToken) -> Result<(), TaskError> {
///         if ctx.is_cancelled() {
///             return Err(TaskError::Canceled);
///         }
///         // do work...
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Task: Send + Sync + 'static {
    /// Returns a stable, human-readable task name.
    fn name(&self) -> &str;

    /// Executes the task until completion or failure.
    ///
    /// Implementations that run for a long time may check
    /// `ctx.is_cancelled()` to exit early after the queue is cancelled;
    /// the queue itself never aborts a running task.
    async fn run(&self, ctx: CancellationToken) -> Result<(), TaskError>;
}
