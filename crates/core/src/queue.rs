//! FIFO serializer for command execution.
//!
//! Commands arrive from many concurrent callers; a single worker task pulls
//! them off an unbounded channel and runs each thunk to completion before
//! starting the next. The channel is the pending sequence, the worker's
//! current await is the "currently executing" marker. Each caller gets its
//! outcome through a dedicated oneshot, so a failed command resolves its own
//! future and nothing else.

use std::future::Future;
use std::pin::Pin;

use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::error::{DriverError, Result};

/// Deferred, zero-argument unit of work representing one queued command.
pub type Thunk = Pin<Box<dyn Future<Output = Result<Value>> + Send>>;

struct QueuedCommand {
	name: String,
	thunk: Thunk,
	outcome: oneshot::Sender<Result<Value>>,
}

/// One-at-a-time, arrival-ordered executor of thunks.
pub struct CommandQueue {
	tx: mpsc::UnboundedSender<QueuedCommand>,
}

impl Default for CommandQueue {
	fn default() -> Self {
		Self::new()
	}
}

impl CommandQueue {
	/// Spawns the worker task; must be called from within a tokio runtime.
	pub fn new() -> Self {
		let (tx, rx) = mpsc::unbounded_channel();
		tokio::spawn(run_worker(rx));
		Self { tx }
	}

	/// Submits a thunk for execution in FIFO position.
	///
	/// The channel send happens before this returns, so submission order is
	/// call order even when the returned futures are polled later. The
	/// future resolves exactly once, after the thunk has run to completion
	/// behind every earlier entry.
	pub fn enqueue(&self, name: &str, thunk: Thunk) -> impl Future<Output = Result<Value>> + Send + use<> {
		let (outcome, rx) = oneshot::channel();
		let rejected = self
			.tx
			.send(QueuedCommand {
				name: name.to_string(),
				thunk,
				outcome,
			})
			.is_err();
		async move {
			if rejected {
				return Err(DriverError::QueueClosed);
			}
			// The worker never drops an entry without delivering its outcome,
			// so a closed oneshot means the worker itself is gone.
			rx.await.unwrap_or(Err(DriverError::QueueClosed))
		}
	}
}

async fn run_worker(mut rx: mpsc::UnboundedReceiver<QueuedCommand>) {
	while let Some(cmd) = rx.recv().await {
		debug!(target = "rd.queue", command = %cmd.name, "executing");
		let result = cmd.thunk.await;
		if let Err(err) = &result {
			debug!(target = "rd.queue", command = %cmd.name, error = %err, "command failed");
		}
		if cmd.outcome.send(result).is_err() {
			warn!(target = "rd.queue", command = %cmd.name, "caller went away before outcome delivery");
		}
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;
	use std::sync::atomic::{AtomicU32, Ordering};
	use std::time::Duration;

	use futures_util::future::join_all;
	use serde_json::json;

	use super::*;

	fn counting_thunk(counter: Arc<AtomicU32>) -> Thunk {
		Box::pin(async move {
			tokio::time::sleep(Duration::from_millis(5)).await;
			let position = counter.fetch_add(1, Ordering::SeqCst);
			Ok(json!(position))
		})
	}

	#[tokio::test]
	async fn thunks_run_in_submission_order() {
		let queue = CommandQueue::new();
		let counter = Arc::new(AtomicU32::new(0));

		let pending: Vec<_> = (0..10)
			.map(|_| queue.enqueue("probe", counting_thunk(Arc::clone(&counter))))
			.collect();

		let results = join_all(pending).await;
		for (i, result) in results.into_iter().enumerate() {
			assert_eq!(result.unwrap(), json!(i as u32));
		}
	}

	#[tokio::test]
	async fn failed_thunk_does_not_stall_the_queue() {
		let queue = CommandQueue::new();
		let counter = Arc::new(AtomicU32::new(0));

		let before = queue.enqueue("probe", counting_thunk(Arc::clone(&counter)));
		let failing = queue.enqueue(
			"probe",
			Box::pin(async { Err(DriverError::Handler("multipass".to_string())) }),
		);
		let after = queue.enqueue("probe", counting_thunk(Arc::clone(&counter)));

		assert_eq!(before.await.unwrap(), json!(0));
		assert!(failing.await.unwrap_err().to_string().contains("multipass"));
		assert_eq!(after.await.unwrap(), json!(1));
	}

	#[tokio::test]
	async fn queue_survives_consecutive_failures() {
		let queue = CommandQueue::new();

		let failures: Vec<_> = (0..5)
			.map(|i| {
				queue.enqueue(
					"probe",
					Box::pin(async move { Err(DriverError::Handler(format!("boom {i}"))) }),
				)
			})
			.collect();
		let survivor = queue.enqueue("probe", Box::pin(async { Ok(json!("alive")) }));

		for (i, failure) in join_all(failures).await.into_iter().enumerate() {
			assert_eq!(failure.unwrap_err().to_string(), format!("boom {i}"));
		}
		assert_eq!(survivor.await.unwrap(), json!("alive"));
	}

	#[tokio::test]
	async fn queue_re_arms_after_draining_empty() {
		let queue = CommandQueue::new();
		let counter = Arc::new(AtomicU32::new(0));

		let first: Vec<_> = (0..5)
			.map(|_| queue.enqueue("probe", counting_thunk(Arc::clone(&counter))))
			.collect();
		for result in join_all(first).await {
			result.unwrap();
		}

		// Queue is idle now; a second batch gets the same ordering guarantee.
		let second: Vec<_> = (0..5)
			.map(|_| queue.enqueue("probe", counting_thunk(Arc::clone(&counter))))
			.collect();
		let results = join_all(second).await;
		for (i, result) in results.into_iter().enumerate() {
			assert_eq!(result.unwrap(), json!(5 + i as u32));
		}
	}
}
