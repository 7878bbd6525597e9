//! Command resolution and serialized dispatch.
//!
//! The dispatcher is the single entry point for command execution: it
//! resolves a name to a handler, enforces the single-session invariant, and
//! funnels every call through the [`CommandQueue`] so handlers never overlap.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::error::{DriverError, Result};
use crate::handlers::{self, CREATE_SESSION, Handler, HandlerFuture};
use crate::queue::{CommandQueue, Thunk};
use crate::session::SessionStore;

/// Execution context captured by each queued thunk.
///
/// Handlers observe the session store through this handle rather than any
/// ambient global, so a thunk carries everything it needs by value.
#[derive(Clone)]
pub struct DriverContext {
	sessions: Arc<SessionStore>,
}

impl DriverContext {
	pub fn sessions(&self) -> &SessionStore {
		&self.sessions
	}
}

/// Single entry point for command execution.
pub struct Dispatcher {
	ctx: DriverContext,
	queue: CommandQueue,
	handlers: HashMap<String, Handler>,
}

impl Default for Dispatcher {
	fn default() -> Self {
		Self::new()
	}
}

impl Dispatcher {
	/// Builds a dispatcher with the built-in lifecycle and introspection
	/// handlers registered. Must be called from within a tokio runtime (the
	/// queue spawns its worker task here).
	pub fn new() -> Self {
		let mut dispatcher = Self {
			ctx: DriverContext {
				sessions: Arc::new(SessionStore::new()),
			},
			queue: CommandQueue::new(),
			handlers: HashMap::new(),
		};
		dispatcher.register(CREATE_SESSION, handlers::create_session);
		dispatcher.register("deleteSession", handlers::delete_session);
		dispatcher.register("getSession", handlers::get_session);
		dispatcher.register("getSessions", handlers::get_sessions);
		dispatcher.register("getStatus", handlers::get_status);
		dispatcher
	}

	/// Registers or replaces the handler for `name`.
	pub fn register<F>(&mut self, name: &str, handler: F)
	where
		F: Fn(DriverContext, Vec<Value>) -> HandlerFuture + Send + Sync + 'static,
	{
		self.handlers.insert(name.to_string(), Arc::new(handler));
	}

	/// Read-only view of the session store, for transport-level reporting.
	///
	/// Reads taken here race with queued mutations; treat the result as
	/// potentially stale and never mutate through it.
	pub fn sessions(&self) -> &SessionStore {
		self.ctx.sessions()
	}

	/// Submits a command for serialized execution.
	///
	/// Resolution and the fast session-existence check happen before this
	/// returns, as does the queue submission, so submission order across
	/// callers is the order of `execute` calls. The returned future resolves
	/// exactly once with the command's own outcome, unaffected by failures
	/// of other queued commands.
	pub fn execute(&self, name: &str, args: Vec<Value>) -> impl Future<Output = Result<Value>> + Send + use<> {
		let submitted = self.submit(name, args);
		async move {
			match submitted {
				Ok(outcome) => outcome.await,
				Err(err) => Err(err),
			}
		}
	}

	fn submit(&self, name: &str, args: Vec<Value>) -> Result<impl Future<Output = Result<Value>> + Send + use<>> {
		let Some(handler) = self.handlers.get(name) else {
			return Err(DriverError::UnknownCommand(name.to_string()));
		};

		// Reject obviously-invalid calls without occupying a queue slot.
		let requires_session = name != CREATE_SESSION;
		if requires_session && self.ctx.sessions().current_id().is_none() {
			return Err(DriverError::NoActiveSession);
		}

		debug!(target = "rd.dispatch", command = %name, "submitting");
		let handler = Arc::clone(handler);
		let ctx = self.ctx.clone();
		let thunk: Thunk = Box::pin(async move {
			// Re-check at execution time: an earlier queued command (e.g. a
			// slow deleteSession) may have removed the session since this
			// call was submitted.
			if requires_session && ctx.sessions().current_id().is_none() {
				return Err(DriverError::NoActiveSession);
			}
			handler(ctx, args).await
		});
		Ok(self.queue.enqueue(name, thunk))
	}
}
