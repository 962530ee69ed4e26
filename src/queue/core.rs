//! # Public queue surface.
//!
//! [`Queue`] is a cheap-to-clone handle over shared state. All operations are
//! synchronous and return before any task runs; the execution loop itself is
//! spawned onto the ambient tokio runtime.
//!
//! ## Rules
//! - Every real status transition fires the `on_status_change` hook exactly
//!   once; no-op transitions fire nothing.
//! - The Idle→Processing transition is taken under the state lock, so at most
//!   one live execution loop exists per queue.
//! - Hooks are invoked after the lock is released; they may call back into
//!   the queue.
//!
//! Operations that can start the execution loop (`submit`, `submit_keyed`,
//! `submit_priority`, `resume`) must be called from within a tokio runtime.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use super::runner;
use super::state::{Entry, QueueState};
use super::status::QueueStatus;
use crate::config::{QueueConfig, StatusHook};
use crate::error::TaskError;
use crate::tasks::TaskRef;

/// State shared between queue handles and the execution loop.
pub(super) struct Shared {
    pub state: Mutex<QueueState>,
    /// Single-waiter resume signal; at most one loop blocks on it.
    pub resume: Notify,
    pub hook: Option<StatusHook>,
    pub pause_on_error: bool,
}

impl Shared {
    /// Locks the state, recovering from a poisoned mutex.
    ///
    /// A panic inside a critical section can only originate from this
    /// module; the state is left consistent between lock acquisitions, so
    /// continuing with the inner value is sound.
    pub fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fires the status hook for a real transition, if one occurred.
    ///
    /// Must be called without the state lock held.
    pub fn emit(&self, changed: Option<QueueStatus>) {
        if let (Some(hook), Some(status)) = (&self.hook, changed) {
            hook(status);
        }
    }
}

/// Single-consumer, in-order task queue.
///
/// Tasks execute one at a time, strictly in submission order, on a single
/// execution loop. Callers steer the queue through [`pause`](Queue::pause),
/// [`resume`](Queue::resume), [`cancel`](Queue::cancel) and observe it
/// through the status hook and read-only accessors.
///
/// Cloning yields another handle to the same queue.
///
/// ## Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use taskline::{Queue, TaskFn, TaskError};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
///
///     let queue = Queue::default();
///     queue.submit(TaskFn::arc("hello", move |_ctx: CancellationToken| {
///         let tx = tx.clone();
///         async move {
///             tx.send("hello from task").ok();
///             Ok::<_, TaskError>(())
///         }
///     }));
///
///     assert_eq!(rx.recv().await, Some("hello from task"));
/// }
/// ```
#[derive(Clone)]
pub struct Queue {
    shared: Arc<Shared>,
}

impl Queue {
    /// Creates a queue with the given configuration.
    ///
    /// Fires the status hook once with the initial `Idle` status.
    pub fn new(config: QueueConfig) -> Self {
        let shared = Arc::new(Shared {
            state: Mutex::new(QueueState::new()),
            resume: Notify::new(),
            hook: config.on_status_change,
            pause_on_error: config.pause_on_error,
        });
        if let Some(hook) = &shared.hook {
            hook(QueueStatus::Idle);
        }
        Self { shared }
    }

    // ---- Submission ----

    /// Appends a task to the back of the pending collection and starts the
    /// execution loop if the queue is idle.
    ///
    /// Submitting into a cancelled queue resurrects it first (the status
    /// observably passes `Cancelled → Idle → Processing`).
    pub fn submit(&self, task: TaskRef) {
        self.enqueue(task, None, false);
    }

    /// Like [`submit`](Queue::submit), with an adjacent-dedupe key.
    ///
    /// If `key` equals the key of the last pending entry (or, when nothing
    /// is pending, the key of the entry currently in flight), the submission
    /// is suppressed: the work is considered already represented. Only
    /// immediately-adjacent duplicates are suppressed; a repeat of the same
    /// key behind a different entry is enqueued normally.
    pub fn submit_keyed(&self, task: TaskRef, key: impl Into<String>) {
        self.enqueue(task, Some(key.into()), false);
    }

    /// Inserts a task at the front of the pending collection (no dedupe).
    ///
    /// The task runs before all previously pending entries but never
    /// preempts the entry currently executing.
    pub fn submit_priority(&self, task: TaskRef) {
        self.enqueue(task, None, true);
    }

    fn enqueue(&self, task: TaskRef, key: Option<String>, front: bool) {
        let mut changes: [Option<QueueStatus>; 2] = [None, None];
        let start = {
            let mut st = self.shared.lock();

            // Resurrect a cancelled queue before any insertion logic.
            if st.status == QueueStatus::Cancelled {
                st.generation += 1;
                st.token = CancellationToken::new();
                changes[0] = st.transition(QueueStatus::Idle);
            }

            let suppressed = !front
                && matches!(
                    (key.as_deref(), st.adjacent_key()),
                    (Some(k), Some(a)) if k == a
                );
            if !suppressed {
                let entry = Entry { task, key };
                if front {
                    st.pending.push_front(entry);
                } else {
                    st.pending.push_back(entry);
                }
            }

            // Even a suppressed submission must leave the loop running when
            // other work is pending.
            let start = start_if_idle(&mut st);
            changes[1] = start.0;
            start.1
        };

        for changed in changes {
            self.shared.emit(changed);
        }
        if let Some(generation) = start {
            runner::spawn(self.shared.clone(), generation);
        }
    }

    // ---- Flow control ----

    /// Pauses the queue. Effective only while `Processing`; otherwise a no-op.
    ///
    /// Pausing never interrupts the task in flight; it takes effect before
    /// the next entry is pulled.
    pub fn pause(&self) {
        let changed = {
            let mut st = self.shared.lock();
            if st.status == QueueStatus::Processing {
                st.transition(QueueStatus::Paused)
            } else {
                None
            }
        };
        self.shared.emit(changed);
    }

    /// Resumes a paused queue, clearing the last error and releasing the
    /// blocked execution loop.
    ///
    /// If the queue is idle with pending work (work was enqueued after the
    /// loop wound down), this starts the loop instead.
    pub fn resume(&self) {
        enum Action {
            None,
            Wake,
            Start(u64),
        }

        let (changed, action) = {
            let mut st = self.shared.lock();
            if st.status == QueueStatus::Paused {
                st.last_error = None;
                (st.transition(QueueStatus::Processing), Action::Wake)
            } else {
                let (changed, start) = start_if_idle(&mut st);
                match start {
                    Some(generation) => (changed, Action::Start(generation)),
                    None => (changed, Action::None),
                }
            }
        };

        self.shared.emit(changed);
        match action {
            Action::Wake => self.shared.resume.notify_one(),
            Action::Start(generation) => runner::spawn(self.shared.clone(), generation),
            Action::None => {}
        }
    }

    /// Cancels the queue: discards all pending work and advances the
    /// generation so the current execution loop becomes stale.
    ///
    /// Idempotent. The task in flight finishes undisturbed (it may observe
    /// cancellation through its token), but its loop can no longer mutate
    /// status. A paused loop is woken so it can observe cancellation and
    /// exit instead of blocking forever.
    pub fn cancel(&self) {
        let changed = {
            let mut st = self.shared.lock();
            if st.status == QueueStatus::Cancelled {
                None
            } else {
                st.pending.clear();
                st.current_key = None;
                st.generation += 1;
                st.token.cancel();
                st.transition(QueueStatus::Cancelled)
            }
        };
        self.shared.emit(changed);
        if changed.is_some() {
            self.shared.resume.notify_one();
        }
    }

    /// Empties the pending collection without touching an in-flight task or
    /// reversing pause/cancel state.
    ///
    /// While `Processing`, `Paused`, or `Cancelled`, the status is left
    /// untouched; while `Idle`, the current-task-key marker is cleared and
    /// `Idle` is reasserted (a no-op transition, no notification).
    pub fn clear(&self) {
        let mut st = self.shared.lock();
        st.pending.clear();
        if st.status == QueueStatus::Idle {
            st.current_key = None;
        }
    }

    /// Drops the captured last error without resuming.
    pub fn clear_last_error(&self) {
        self.shared.lock().last_error = None;
    }

    // ---- Read-only surface ----

    /// Current lifecycle status.
    pub fn status(&self) -> QueueStatus {
        self.shared.lock().status
    }

    /// `true` while the execution loop is running or about to run a task.
    pub fn is_processing(&self) -> bool {
        self.status() == QueueStatus::Processing
    }

    /// `true` while the queue is paused.
    pub fn is_paused(&self) -> bool {
        self.status() == QueueStatus::Paused
    }

    /// `true` after `cancel()`, until a new submission resurrects the queue.
    pub fn is_cancelled(&self) -> bool {
        self.status() == QueueStatus::Cancelled
    }

    /// `true` when no work is pending and no loop is running.
    pub fn is_idle(&self) -> bool {
        self.status() == QueueStatus::Idle
    }

    /// Number of pending entries (excludes the task in flight).
    pub fn len(&self) -> usize {
        self.shared.lock().pending.len()
    }

    /// `true` when no entries are pending.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The most recently captured task failure, if any.
    ///
    /// Populated only under the pause-on-error policy; cleared by
    /// [`resume`](Queue::resume) and [`clear_last_error`](Queue::clear_last_error).
    pub fn last_task_error(&self) -> Option<TaskError> {
        self.shared.lock().last_error.clone()
    }
}

impl Default for Queue {
    /// A queue with default configuration: errors absorbed, no status hook.
    fn default() -> Self {
        Self::new(QueueConfig::default())
    }
}

impl std::fmt::Debug for Queue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let st = self.shared.lock();
        f.debug_struct("Queue")
            .field("status", &st.status)
            .field("pending", &st.pending.len())
            .field("generation", &st.generation)
            .finish()
    }
}

/// Starts the execution loop when the queue is idle with pending work.
///
/// Takes the Idle→Processing transition under the caller's lock and returns
/// the captured generation to bind the new loop to. Returns `(None, None)`
/// when nothing needs starting.
fn start_if_idle(st: &mut QueueState) -> (Option<QueueStatus>, Option<u64>) {
    if st.status == QueueStatus::Idle && !st.pending.is_empty() {
        let changed = st.transition(QueueStatus::Processing);
        (changed, Some(st.generation))
    } else {
        (None, None)
    }
}
