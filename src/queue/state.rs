//! # Locked queue state.
//!
//! [`QueueState`] holds everything the queue mutates: the pending collection,
//! the status value, the generation counter, the current-task-key marker,
//! and the last-error slot. It lives behind a single `Mutex`; critical
//! sections are short and never held across an await point.
//!
//! ## Rules
//! - Entries leave `pending` strictly from the front, one at a time.
//! - [`QueueState::transition`] returns the new status only when the value
//!   actually changed; callers fire the notification hook from that return
//!   value, which makes duplicate notifications impossible by construction.
//! - `generation` advances exactly on cancellation and on resurrection of a
//!   cancelled queue. An execution loop captures the value at start and must
//!   treat any mismatch as "exit silently, touch nothing".

use std::collections::VecDeque;

use tokio_util::sync::CancellationToken;

use super::status::QueueStatus;
use crate::error::TaskError;
use crate::tasks::TaskRef;

/// A pending unit of work: the task plus its optional dedupe key.
pub(super) struct Entry {
    pub task: TaskRef,
    pub key: Option<String>,
}

/// Mutable queue state, guarded by the queue's mutex.
pub(super) struct QueueState {
    /// Pending entries, FIFO. `submit_priority` pushes front.
    pub pending: VecDeque<Entry>,

    /// Current lifecycle status.
    pub status: QueueStatus,

    /// Stale-loop guard. Bumped on cancel and on resurrection.
    pub generation: u64,

    /// Dedupe key of the entry presently executing, if any.
    pub current_key: Option<String>,

    /// Most recently captured failure (pause-on-error only).
    pub last_error: Option<TaskError>,

    /// Live cancellation token; tasks receive child tokens of this.
    /// Replaced with a fresh token on resurrection.
    pub token: CancellationToken,
}

impl QueueState {
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
            status: QueueStatus::Idle,
            generation: 0,
            current_key: None,
            last_error: None,
            token: CancellationToken::new(),
        }
    }

    /// Moves to `next`, returning the new status iff the value changed.
    ///
    /// A `None` return means the transition was a no-op and no notification
    /// must fire.
    pub fn transition(&mut self, next: QueueStatus) -> Option<QueueStatus> {
        if self.status == next {
            None
        } else {
            self.status = next;
            Some(next)
        }
    }

    /// Key the adjacent-dedupe rule compares a new back-insertion against:
    /// the last pending entry's key, or the in-flight entry's key when
    /// nothing is pending.
    pub fn adjacent_key(&self) -> Option<&str> {
        match self.pending.back() {
            Some(entry) => entry.key.as_deref(),
            None => self.current_key.as_deref(),
        }
    }
}
