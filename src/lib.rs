//! # taskline
//!
//! **Taskline** is a single-consumer, in-order async task queue for tokio.
//!
//! Callers submit asynchronous units of work; the queue executes them one at
//! a time, strictly in submission order, while exposing an observable
//! lifecycle (idle, processing, paused, cancelled) and deterministic error
//! handling. It targets callers who need ordering guarantees and explicit
//! flow control over a stream of async jobs without building their own state
//! machine.
//!
//! ## Architecture
//! ```text
//!  submit(task, key?)   submit_priority(task)   pause/resume/cancel/clear
//!          │                     │                        │
//!          ▼                     ▼                        ▼
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  Queue                                                           │
//! │  - pending: VecDeque<Entry>  (FIFO; priority inserts at front)   │
//! │  - status:  Idle / Processing / Paused / Cancelled               │
//! │  - generation: invalidates stale loops after cancel              │
//! │  - on_status_change hook (fires only on real transitions)        │
//! └──────────────────────────────┬───────────────────────────────────┘
//!                                ▼
//!                      execution loop (one live instance)
//!
//! loop {
//!   ├─► paused?     ──► await resume signal, re-check
//!   ├─► pop front   ──► none left: set Idle, exit
//!   ├─► run task
//!   │     ├─ Ok            ──► continue
//!   │     ├─ Err, policy off ──► absorb, continue
//!   │     └─ Err, policy on  ──► capture error, set Paused, await resume
//!   └─► stale (generation moved on)? ──► exit silently
//! }
//! ```
//!
//! ## Guarantees
//! - Tasks execute strictly in the order they reach the front of the queue;
//!   a priority submission runs before previously-pending entries but never
//!   preempts the task in flight.
//! - The status hook fires iff the status value actually changes.
//! - Cancellation is cooperative: pending work is discarded immediately, the
//!   in-flight task finishes undisturbed, and its loop can no longer mutate
//!   status (generation guard).
//! - Adjacent-duplicate suppression: a keyed submission matching the last
//!   pending entry's key (or the in-flight key when nothing is pending) is
//!   dropped. Non-adjacent repeats are kept.
//!
//! ## Features
//! | Area             | Description                                          | Key types               |
//! |------------------|------------------------------------------------------|-------------------------|
//! | **Queue**        | Submit, pause, resume, cancel, clear.                | [`Queue`]               |
//! | **Status**       | Observable lifecycle with change notifications.      | [`QueueStatus`], [`StatusHook`] |
//! | **Tasks**        | Define tasks as trait impls or closures.             | [`Task`], [`TaskFn`], [`TaskRef`] |
//! | **Errors**       | Typed task failures, pause-on-error capture.         | [`TaskError`]           |
//! | **Configuration**| Construction-time policy and hook.                   | [`QueueConfig`]         |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogHook`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use taskline::{Queue, QueueConfig, TaskFn, TaskError};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
//!
//!     let queue = Queue::new(QueueConfig::default());
//!
//!     for n in 1..=3u32 {
//!         let tx = tx.clone();
//!         queue.submit(TaskFn::arc("step", move |_ctx: CancellationToken| {
//!             let tx = tx.clone();
//!             async move {
//!                 tx.send(n).ok();
//!                 Ok::<_, TaskError>(())
//!             }
//!         }));
//!     }
//!
//!     // Tasks run one at a time, in submission order.
//!     assert_eq!(rx.recv().await, Some(1));
//!     assert_eq!(rx.recv().await, Some(2));
//!     assert_eq!(rx.recv().await, Some(3));
//! }
//! ```

mod config;
mod error;
mod queue;
mod tasks;

// ---- Public re-exports ----

pub use config::{QueueConfig, StatusHook};
pub use error::TaskError;
pub use queue::{Queue, QueueStatus};
pub use tasks::{Task, TaskFn, TaskRef};

// Optional: expose a simple built-in stdout status hook (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
mod logging;
#[cfg(feature = "logging")]
pub use logging::LogHook;
