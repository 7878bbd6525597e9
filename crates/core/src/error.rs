use thiserror::Error;

pub type Result<T> = std::result::Result<T, DriverError>;

#[derive(Debug, Error)]
pub enum DriverError {
	/// `createSession` was called while the slot is occupied.
	#[error("cannot create session: session {0} is still active")]
	SessionAlreadyActive(String),

	/// A command other than `createSession` was submitted or executed with
	/// no active session. Callers match on "session" in the message text.
	#[error("no active session; create a session before issuing commands")]
	NoActiveSession,

	#[error("unknown command: {0}")]
	UnknownCommand(String),

	/// A handler's own failure. The originating message passes through
	/// verbatim so callers can match on it.
	#[error("{0}")]
	Handler(String),

	/// The queue worker is gone; nothing can execute anymore.
	#[error("command queue is shut down")]
	QueueClosed,

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}
