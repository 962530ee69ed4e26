//! End-to-end queue behavior: ordering, flow control, dedupe, error policy,
//! cancellation and resurrection.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use taskline::{Queue, QueueConfig, QueueStatus, StatusHook, TaskError, TaskFn, TaskRef};

type Log = Arc<Mutex<Vec<String>>>;

fn log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Status hook that records every notification it receives.
fn recorder() -> (StatusHook, Arc<Mutex<Vec<QueueStatus>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let hook: StatusHook = Arc::new(move |status| sink.lock().unwrap().push(status));
    (hook, seen)
}

fn recorded(seen: &Arc<Mutex<Vec<QueueStatus>>>) -> Vec<QueueStatus> {
    seen.lock().unwrap().clone()
}

/// Task that appends its name to `log` and completes.
fn step(log: &Log, name: &'static str) -> TaskRef {
    let log = log.clone();
    TaskFn::arc(name, move |_ctx: CancellationToken| {
        let log = log.clone();
        async move {
            log.lock().unwrap().push(name.to_string());
            Ok::<_, TaskError>(())
        }
    })
}

/// Task that logs `<name>:start`, blocks on `gate`, then logs `<name>:end`.
fn gated(log: &Log, name: &'static str, gate: &Arc<Notify>) -> TaskRef {
    let log = log.clone();
    let gate = gate.clone();
    TaskFn::arc(name, move |_ctx: CancellationToken| {
        let log = log.clone();
        let gate = gate.clone();
        async move {
            log.lock().unwrap().push(format!("{name}:start"));
            gate.notified().await;
            log.lock().unwrap().push(format!("{name}:end"));
            Ok::<_, TaskError>(())
        }
    })
}

/// Task that fails with the given message.
fn failing(name: &'static str, message: &'static str) -> TaskRef {
    TaskFn::arc(name, move |_ctx: CancellationToken| async move {
        Err::<(), _>(TaskError::from(message))
    })
}

/// Polls `cond` until it holds, panicking after ~2s.
async fn wait_until(what: &str, mut cond: impl FnMut() -> bool) {
    for _ in 0..1000 {
        if cond() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    panic!("timed out waiting for {what}");
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

// ---- FIFO ordering ----

#[tokio::test]
async fn fifo_order_and_drain_to_idle() {
    let (hook, seen) = recorder();
    let queue = Queue::new(QueueConfig {
        pause_on_error: false,
        on_status_change: Some(hook),
    });
    let log = log();

    queue.submit(step(&log, "a"));
    queue.submit(step(&log, "b"));
    queue.submit(step(&log, "c"));

    wait_until("queue drained", || queue.is_idle() && entries(&log).len() == 3).await;

    assert_eq!(entries(&log), vec!["a", "b", "c"]);
    assert_eq!(
        recorded(&seen),
        vec![
            QueueStatus::Idle,
            QueueStatus::Processing,
            QueueStatus::Idle
        ]
    );
}

#[tokio::test]
async fn priority_task_runs_before_pending_but_after_in_flight() {
    let queue = Queue::default();
    let log = log();
    let gate = Arc::new(Notify::new());

    queue.submit(gated(&log, "a", &gate));
    wait_until("a in flight", || entries(&log) == vec!["a:start"]).await;

    queue.submit(step(&log, "b"));
    queue.submit_priority(step(&log, "c"));
    assert_eq!(queue.len(), 2);

    gate.notify_one();
    wait_until("queue drained", || queue.is_idle()).await;

    assert_eq!(entries(&log), vec!["a:start", "a:end", "c", "b"]);
}

// ---- Adjacent dedupe ----

#[tokio::test]
async fn dedupe_suppresses_key_matching_in_flight_task() {
    let queue = Queue::default();
    let log = log();
    let gate = Arc::new(Notify::new());

    queue.submit_keyed(gated(&log, "a", &gate), "k");
    wait_until("a in flight", || entries(&log) == vec!["a:start"]).await;
    assert!(queue.is_empty());

    // Pending is empty, so the comparison falls back to the in-flight key.
    queue.submit_keyed(step(&log, "dup"), "k");
    assert!(queue.is_empty());
    assert!(queue.is_processing());

    gate.notify_one();
    wait_until("queue drained", || queue.is_idle()).await;
    assert_eq!(entries(&log), vec!["a:start", "a:end"]);
}

#[tokio::test]
async fn dedupe_is_adjacent_only() {
    let queue = Queue::default();
    let log = log();
    let gate = Arc::new(Notify::new());

    queue.submit_keyed(gated(&log, "a", &gate), "k");
    wait_until("a in flight", || entries(&log) == vec!["a:start"]).await;

    queue.submit_keyed(step(&log, "b"), "j");
    assert_eq!(queue.len(), 1);

    // Same key as the last pending entry: suppressed.
    queue.submit_keyed(step(&log, "b2"), "j");
    assert_eq!(queue.len(), 1);

    // "k" again, but behind "j" now: not adjacent, so it is kept.
    queue.submit_keyed(step(&log, "d"), "k");
    assert_eq!(queue.len(), 2);

    gate.notify_one();
    wait_until("queue drained", || queue.is_idle()).await;
    assert_eq!(entries(&log), vec!["a:start", "a:end", "b", "d"]);
}

#[tokio::test]
async fn unkeyed_submissions_are_never_deduped() {
    let queue = Queue::default();
    let log = log();
    let gate = Arc::new(Notify::new());

    queue.submit(gated(&log, "a", &gate));
    wait_until("a in flight", || entries(&log) == vec!["a:start"]).await;

    queue.submit(step(&log, "b"));
    queue.submit(step(&log, "c"));
    assert_eq!(queue.len(), 2);

    gate.notify_one();
    wait_until("queue drained", || queue.is_idle()).await;
    assert_eq!(entries(&log), vec!["a:start", "a:end", "b", "c"]);
}

// ---- Pause / resume ----

#[tokio::test]
async fn pause_blocks_next_task_until_resume() {
    let (hook, seen) = recorder();
    let queue = Queue::new(QueueConfig {
        pause_on_error: false,
        on_status_change: Some(hook),
    });
    let log = log();
    let gate = Arc::new(Notify::new());

    queue.submit(gated(&log, "a", &gate));
    queue.submit(step(&log, "b"));
    wait_until("a in flight", || entries(&log) == vec!["a:start"]).await;

    queue.pause();
    assert!(queue.is_paused());

    // Pausing never interrupts the in-flight task.
    gate.notify_one();
    wait_until("a finished", || entries(&log).len() == 2).await;

    // The next entry must not start while paused.
    settle().await;
    assert_eq!(entries(&log), vec!["a:start", "a:end"]);
    assert!(queue.is_paused());

    queue.resume();
    wait_until("queue drained", || queue.is_idle()).await;
    assert_eq!(entries(&log), vec!["a:start", "a:end", "b"]);
    assert_eq!(
        recorded(&seen),
        vec![
            QueueStatus::Idle,
            QueueStatus::Processing,
            QueueStatus::Paused,
            QueueStatus::Processing,
            QueueStatus::Idle
        ]
    );
}

#[tokio::test]
async fn pause_is_noop_outside_processing() {
    let (hook, seen) = recorder();
    let queue = Queue::new(QueueConfig {
        pause_on_error: false,
        on_status_change: Some(hook),
    });

    // Idle: no effect, no notification.
    queue.pause();
    assert!(queue.is_idle());

    // Cancelled: no effect.
    queue.cancel();
    queue.pause();
    assert!(queue.is_cancelled());

    assert_eq!(recorded(&seen), vec![QueueStatus::Idle, QueueStatus::Cancelled]);
}

#[tokio::test]
async fn resume_is_noop_when_idle_and_empty() {
    let (hook, seen) = recorder();
    let queue = Queue::new(QueueConfig {
        pause_on_error: false,
        on_status_change: Some(hook),
    });

    queue.resume();
    assert!(queue.is_idle());
    assert_eq!(recorded(&seen), vec![QueueStatus::Idle]);
}

// ---- Pause-on-error policy ----

#[tokio::test]
async fn pause_on_error_captures_failure_and_resume_clears_it() {
    let (hook, seen) = recorder();
    let queue = Queue::new(QueueConfig {
        pause_on_error: true,
        on_status_change: Some(hook),
    });
    let log = log();

    queue.submit(failing("bad", "boom"));
    queue.submit(step(&log, "b"));

    wait_until("queue paused on error", || queue.is_paused()).await;
    assert_eq!(
        queue.last_task_error(),
        Some(TaskError::from("boom"))
    );
    assert!(entries(&log).is_empty());

    queue.resume();
    wait_until("queue drained", || queue.is_idle()).await;
    assert_eq!(queue.last_task_error(), None);
    assert_eq!(entries(&log), vec!["b"]);
    assert_eq!(
        recorded(&seen),
        vec![
            QueueStatus::Idle,
            QueueStatus::Processing,
            QueueStatus::Paused,
            QueueStatus::Processing,
            QueueStatus::Idle
        ]
    );
}

#[tokio::test]
async fn disabled_policy_absorbs_failures_silently() {
    let queue = Queue::default();
    let log = log();

    queue.submit(failing("bad", "boom"));
    queue.submit(step(&log, "b"));

    wait_until("queue drained", || queue.is_idle() && !entries(&log).is_empty()).await;
    assert_eq!(queue.last_task_error(), None);
    assert_eq!(entries(&log), vec!["b"]);
}

#[tokio::test]
async fn clear_last_error_without_resuming() {
    let queue = Queue::new(QueueConfig {
        pause_on_error: true,
        on_status_change: None,
    });
    let log = log();

    queue.submit(failing("bad", "boom"));
    queue.submit(step(&log, "b"));
    wait_until("queue paused on error", || queue.is_paused()).await;

    queue.clear_last_error();
    assert_eq!(queue.last_task_error(), None);
    assert!(queue.is_paused());
    assert!(entries(&log).is_empty());

    queue.resume();
    wait_until("queue drained", || queue.is_idle()).await;
    assert_eq!(entries(&log), vec!["b"]);
}

// ---- Cancellation ----

#[tokio::test]
async fn cancel_discards_pending_and_submission_resurrects() {
    let (hook, seen) = recorder();
    let queue = Queue::new(QueueConfig {
        pause_on_error: false,
        on_status_change: Some(hook),
    });
    let log = log();
    let gate = Arc::new(Notify::new());

    queue.submit(gated(&log, "a", &gate));
    queue.submit(step(&log, "b"));
    wait_until("a in flight", || entries(&log) == vec!["a:start"]).await;

    queue.cancel();
    assert!(queue.is_cancelled());
    assert!(queue.is_empty());

    // The in-flight task finishes, but its loop is stale: the status stays
    // Cancelled and "b" never runs.
    gate.notify_one();
    wait_until("a finished", || entries(&log).len() == 2).await;
    settle().await;
    assert!(queue.is_cancelled());

    queue.submit(step(&log, "c"));
    wait_until("queue drained", || queue.is_idle()).await;

    assert_eq!(entries(&log), vec!["a:start", "a:end", "c"]);
    assert_eq!(
        recorded(&seen),
        vec![
            QueueStatus::Idle,
            QueueStatus::Processing,
            QueueStatus::Cancelled,
            QueueStatus::Idle,
            QueueStatus::Processing,
            QueueStatus::Idle
        ]
    );
}

#[tokio::test]
async fn cancel_is_idempotent() {
    let (hook, seen) = recorder();
    let queue = Queue::new(QueueConfig {
        pause_on_error: false,
        on_status_change: Some(hook),
    });

    queue.cancel();
    queue.cancel();

    assert!(queue.is_cancelled());
    assert_eq!(recorded(&seen), vec![QueueStatus::Idle, QueueStatus::Cancelled]);
}

#[tokio::test]
async fn cancel_wakes_a_paused_loop() {
    let queue = Queue::new(QueueConfig {
        pause_on_error: true,
        on_status_change: None,
    });
    let log = log();

    queue.submit(failing("bad", "boom"));
    queue.submit(step(&log, "b"));
    wait_until("queue paused on error", || queue.is_paused()).await;

    // The loop is blocked on the resume signal; cancel must release it so it
    // can observe cancellation and exit instead of blocking forever.
    queue.cancel();
    settle().await;
    assert!(queue.is_cancelled());
    assert!(entries(&log).is_empty());

    // A resurrected queue processes normally afterwards.
    queue.submit(step(&log, "c"));
    wait_until("queue drained", || queue.is_idle()).await;
    assert_eq!(entries(&log), vec!["c"]);
}

#[tokio::test]
async fn in_flight_task_observes_cancellation_token() {
    let queue = Queue::new(QueueConfig {
        pause_on_error: true,
        on_status_change: None,
    });
    let log = log();

    let observer = log.clone();
    queue.submit(TaskFn::arc("watcher", move |ctx: CancellationToken| {
        let log = observer.clone();
        async move {
            log.lock().unwrap().push("watcher:start".into());
            ctx.cancelled().await;
            log.lock().unwrap().push("watcher:cancelled".into());
            Err::<(), _>(TaskError::Canceled)
        }
    }));
    wait_until("watcher in flight", || {
        entries(&log) == vec!["watcher:start"]
    })
    .await;

    queue.cancel();
    wait_until("watcher observed token", || entries(&log).len() == 2).await;

    // The post-cancel failure comes from a stale loop: even with
    // pause_on_error enabled, nothing is captured and nothing pauses.
    settle().await;
    assert!(queue.is_cancelled());
    assert_eq!(queue.last_task_error(), None);
}

// ---- Clear ----

#[tokio::test]
async fn clear_drops_pending_without_touching_in_flight_or_status() {
    let queue = Queue::default();
    let log = log();
    let gate = Arc::new(Notify::new());

    queue.submit(gated(&log, "a", &gate));
    queue.submit(step(&log, "b"));
    queue.submit(step(&log, "c"));
    wait_until("a in flight", || entries(&log) == vec!["a:start"]).await;

    queue.clear();
    assert!(queue.is_empty());
    assert!(queue.is_processing());

    gate.notify_one();
    wait_until("queue drained", || queue.is_idle()).await;
    assert_eq!(entries(&log), vec!["a:start", "a:end"]);
}

#[tokio::test]
async fn clear_preserves_paused_and_cancelled_status() {
    let queue = Queue::new(QueueConfig {
        pause_on_error: true,
        on_status_change: None,
    });
    let log = log();

    queue.submit(failing("bad", "boom"));
    queue.submit(step(&log, "b"));
    wait_until("queue paused on error", || queue.is_paused()).await;

    queue.clear();
    assert!(queue.is_paused());
    assert!(queue.is_empty());

    queue.cancel();
    queue.clear();
    assert!(queue.is_cancelled());
}

// ---- Notification discipline ----

#[tokio::test]
async fn status_hook_never_fires_same_value_twice_in_a_row() {
    let (hook, seen) = recorder();
    let queue = Queue::new(QueueConfig {
        pause_on_error: false,
        on_status_change: Some(hook),
    });
    let log = log();

    queue.pause();
    queue.resume();
    queue.submit(step(&log, "a"));
    wait_until("first drain", || queue.is_idle() && entries(&log).len() == 1).await;
    queue.cancel();
    queue.cancel();
    queue.submit(step(&log, "b"));
    wait_until("second drain", || {
        queue.is_idle() && entries(&log).len() == 2
    })
    .await;

    let seen = recorded(&seen);
    assert!(!seen.is_empty());
    for pair in seen.windows(2) {
        assert_ne!(pair[0], pair[1], "duplicate notification in {seen:?}");
    }
}

// ---- Composite scenario ----

#[tokio::test]
async fn pause_then_throw_pauses_once_and_resume_recovers() {
    let (hook, seen) = recorder();
    let queue = Queue::new(QueueConfig {
        pause_on_error: true,
        on_status_change: Some(hook),
    });
    let log = log();

    // Task A pauses its own queue, then fails.
    let own = queue.clone();
    queue.submit(TaskFn::arc("a", move |_ctx: CancellationToken| {
        let own = own.clone();
        async move {
            own.pause();
            Err::<(), _>(TaskError::from("kaboom"))
        }
    }));
    queue.submit(step(&log, "b"));

    wait_until("queue paused", || queue.is_paused()).await;
    settle().await;
    assert_eq!(
        recorded(&seen),
        vec![
            QueueStatus::Idle,
            QueueStatus::Processing,
            QueueStatus::Paused
        ]
    );
    assert_eq!(
        queue.last_task_error(),
        Some(TaskError::from("kaboom"))
    );

    queue.resume();
    wait_until("queue drained", || queue.is_idle()).await;
    assert_eq!(entries(&log), vec!["b"]);
    assert_eq!(queue.last_task_error(), None);
}

#[tokio::test]
async fn tasks_can_submit_follow_up_work() {
    let queue = Queue::default();
    let log = log();

    let follow = step(&log, "follow");
    let own = queue.clone();
    let sink = log.clone();
    queue.submit(TaskFn::arc("seed", move |_ctx: CancellationToken| {
        let own = own.clone();
        let follow = follow.clone();
        let sink = sink.clone();
        async move {
            sink.lock().unwrap().push("seed".into());
            own.submit(follow);
            Ok::<_, TaskError>(())
        }
    }));

    wait_until("both ran", || entries(&log).len() == 2).await;
    wait_until("queue drained", || queue.is_idle()).await;
    assert_eq!(entries(&log), vec!["seed", "follow"]);
}
