//! # Single-consumer, in-order task queue.
//!
//! The queue owns an ordered collection of pending entries, a status value,
//! a generation counter, and at most one live execution loop:
//!
//! ```text
//! submit / submit_priority
//!        │
//!        ▼
//! ┌─────────────────────────────────────────────┐
//! │  Queue (shared state behind one Mutex)      │
//! │  - pending: VecDeque<Entry> (FIFO)          │
//! │  - status: Idle/Processing/Paused/Cancelled │
//! │  - generation: stale-loop guard             │
//! │  - current_key / last_error                 │
//! └──────────────┬──────────────────────────────┘
//!                ▼
//!        execution loop (one live instance)
//!        pop front → run task → react to
//!        pause / cancel / failure → repeat
//! ```
//!
//! ## Module layout
//! - `status`: the [`QueueStatus`] state machine values
//! - `state`: locked state and transition helper
//! - `core`: the public [`Queue`] surface
//! - `runner`: the generation-guarded execution loop

mod core;
mod runner;
mod state;
mod status;

pub use core::Queue;
pub use status::QueueStatus;
