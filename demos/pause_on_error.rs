//! # Example: pause_on_error
//!
//! Shows the pause-on-error policy: a failing task pauses the queue and
//! records the error; `resume()` clears it and continues with the next task.
//!
//! Uses the built-in [`LogHook`] from the `logging` feature.
//!
//! ## Run
//! ```bash
//! cargo run --example pause_on_error --features logging
//! ```

use std::time::Duration;

use taskline::{LogHook, Queue, QueueConfig, TaskError, TaskFn};
use tokio_util::sync::CancellationToken;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let queue = Queue::new(QueueConfig {
        pause_on_error: true,
        on_status_change: Some(LogHook::arc()),
    });

    queue.submit(TaskFn::arc("flaky", |_ctx: CancellationToken| async {
        println!("[flaky] attempting...");
        Err::<(), TaskError>("connection refused".into())
    }));
    queue.submit(TaskFn::arc("next", |_ctx: CancellationToken| async {
        println!("[next] running");
        Ok::<_, TaskError>(())
    }));

    // The failure pauses the queue instead of silently continuing.
    while !queue.is_paused() {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    if let Some(err) = queue.last_task_error() {
        println!("captured: {}", err.as_message());
    }

    // Resume clears the error and runs "next".
    queue.resume();
    while !queue.is_idle() {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    println!("error after resume: {:?}", queue.last_task_error());
}
