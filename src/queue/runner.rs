//! # Generation-guarded execution loop.
//!
//! One live loop instance exists per queue. The loop is bound to the
//! generation captured when it started; a cancellation (or a resurrection
//! after one) advances the live generation, turning the old loop **stale**.
//! A stale loop exits silently and mutates nothing, leaving status exactly
//! as a newer operation has already set it.
//!
//! ## Loop iteration
//! ```text
//! lock state:
//!   stale or cancelled ──► exit (silent / leave Cancelled)
//!   paused ─────────────► await resume signal, re-check
//!   pending empty ──────► set Idle (live loop only), exit
//!   otherwise ──────────► pop front, record current key
//! unlock, run the task
//! failure + pause-on-error (live loop) ──► capture error, set Paused
//! continue
//! ```
//!
//! ## Rules
//! - The status check and the front-pop happen under one lock acquisition,
//!   so a cancellation can never slip between them.
//! - The resume signal carries a permit: a `resume()` landing between the
//!   paused check and the await still wakes the loop, and a stale permit
//!   only causes one spurious wake-up followed by a re-check.
//! - After the task completes, the loop re-validates its generation before
//!   touching the current-key marker or the error slot; a resurrected queue
//!   may already have a new loop writing there.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::core::Shared;
use super::state::Entry;
use super::status::QueueStatus;

/// What the loop decided to do for this iteration.
enum Step {
    /// Run the dequeued entry with a child of the live token.
    Run(Entry, CancellationToken),
    /// Paused: await the resume signal, then re-check.
    Wait,
    /// Done: fire the (possibly absent) final transition and return.
    Exit(Option<QueueStatus>),
}

/// Spawns a loop bound to `generation` onto the ambient tokio runtime.
///
/// The caller has already taken the Idle→Processing transition under the
/// state lock, which guarantees at most one live loop.
pub(super) fn spawn(shared: Arc<Shared>, generation: u64) {
    tokio::spawn(run(shared, generation));
}

async fn run(shared: Arc<Shared>, generation: u64) {
    loop {
        match next_step(&shared, generation) {
            Step::Exit(changed) => {
                shared.emit(changed);
                return;
            }
            Step::Wait => {
                shared.resume.notified().await;
            }
            Step::Run(entry, ctx) => {
                let result = entry.task.run(ctx).await;

                let changed = {
                    let mut st = shared.lock();
                    if st.generation != generation {
                        // Stale: a cancel raced in while the task ran. The
                        // queue has moved on; touch nothing.
                        return;
                    }
                    st.current_key = None;
                    match result {
                        Ok(()) => None,
                        Err(err) if shared.pause_on_error => {
                            st.last_error = Some(err);
                            st.transition(QueueStatus::Paused)
                        }
                        // Policy disabled: absorb the failure silently.
                        Err(_) => None,
                    }
                };
                shared.emit(changed);
            }
        }
    }
}

/// Decides the next iteration under a single lock acquisition.
fn next_step(shared: &Shared, generation: u64) -> Step {
    let mut st = shared.lock();
    if st.generation != generation {
        return Step::Exit(None);
    }
    match st.status {
        // cancel() already set the status; leave it as-is.
        QueueStatus::Cancelled => Step::Exit(None),
        QueueStatus::Paused => Step::Wait,
        _ => match st.pending.pop_front() {
            None => {
                st.current_key = None;
                Step::Exit(st.transition(QueueStatus::Idle))
            }
            Some(entry) => {
                st.current_key = entry.key.clone();
                let ctx = st.token.child_token();
                Step::Run(entry, ctx)
            }
        },
    }
}
