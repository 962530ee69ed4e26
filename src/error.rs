//! Error types produced by task execution.
//!
//! The queue recognizes exactly one class of error: a task-execution failure,
//! modeled by [`TaskError`]. Failures may originate as arbitrary values
//! (a `String`, a boxed error, a `&str`); the `From` impls normalize them
//! into [`TaskError::Fail`] carrying the original value's string form.
//!
//! Failures never propagate to the caller of a submit operation; they are
//! observable only through [`Queue::last_task_error`](crate::Queue::last_task_error)
//! and the `Paused` status transition when the pause-on-error policy is enabled.

use thiserror::Error;

/// # Errors produced by task execution.
///
/// Tasks return `Result<(), TaskError>`; the queue never interprets the
/// variant beyond "this attempt failed". [`TaskError::Canceled`] exists for
/// tasks that observe the cancellation token and exit early; the queue
/// treats it like any other failure under the pause-on-error policy.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Task execution failed.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Task observed queue cancellation and stopped cooperatively.
    #[error("context cancelled")]
    Canceled,
}

impl TaskError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use taskline::TaskError;
    ///
    /// let err = TaskError::from("boom");
    /// assert_eq!(err.as_label(), "task_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "task_failed",
            TaskError::Canceled => "task_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TaskError::Fail { error } => format!("error: {error}"),
            TaskError::Canceled => "context cancelled".to_string(),
        }
    }
}

impl From<String> for TaskError {
    fn from(error: String) -> Self {
        TaskError::Fail { error }
    }
}

impl From<&str> for TaskError {
    fn from(error: &str) -> Self {
        TaskError::Fail {
            error: error.to_string(),
        }
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for TaskError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        TaskError::Fail {
            error: err.to_string(),
        }
    }
}
