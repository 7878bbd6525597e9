//! Single-slot session store.
//!
//! The slot is either empty or holds exactly one session. All mutation is
//! expected to happen inside the command queue's worker, which makes the
//! queue the single-writer serialization point for session state; readers
//! outside the queue (e.g. the transport echoing `sessionId`) must treat
//! what they see as potentially stale and must not mutate.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{DriverError, Result};

/// Sequence counter mixed into generated ids so two sessions created within
/// the same clock tick still get distinct ids.
static NEXT_SESSION_SEQ: AtomicU64 = AtomicU64::new(1);

/// The active session: an opaque id plus the capabilities supplied at
/// creation, echoed back verbatim on lookup.
#[derive(Debug, Clone, Serialize)]
pub struct SessionRecord {
	pub id: String,
	pub capabilities: Value,
}

/// Owner of the single session slot.
pub struct SessionStore {
	slot: Mutex<Option<SessionRecord>>,
}

impl Default for SessionStore {
	fn default() -> Self {
		Self::new()
	}
}

impl SessionStore {
	pub fn new() -> Self {
		Self {
			slot: Mutex::new(None),
		}
	}

	/// Stores a fresh session, failing if one is already active.
	pub fn create(&self, capabilities: Value) -> Result<SessionRecord> {
		let mut slot = self.slot.lock();
		if let Some(existing) = slot.as_ref() {
			return Err(DriverError::SessionAlreadyActive(existing.id.clone()));
		}
		let record = SessionRecord {
			id: generate_session_id(),
			capabilities,
		};
		debug!(target = "rd.session", id = %record.id, "session created");
		*slot = Some(record.clone());
		Ok(record)
	}

	/// Empties the slot. Clearing an already-empty slot is a no-op.
	pub fn clear(&self) {
		if let Some(record) = self.slot.lock().take() {
			debug!(target = "rd.session", id = %record.id, "session deleted");
		}
	}

	/// Capabilities of the active session.
	pub fn capabilities(&self) -> Result<Value> {
		self.slot
			.lock()
			.as_ref()
			.map(|record| record.capabilities.clone())
			.ok_or(DriverError::NoActiveSession)
	}

	/// Zero-or-one entries describing the active session.
	pub fn list(&self) -> Vec<SessionRecord> {
		self.slot.lock().iter().cloned().collect()
	}

	/// Id of the active session, if any.
	pub fn current_id(&self) -> Option<String> {
		self.slot.lock().as_ref().map(|record| record.id.clone())
	}
}

/// Ids are unique for the process lifetime: a wall-clock nanosecond seed
/// disambiguated by a monotonic sequence number.
fn generate_session_id() -> String {
	let seed = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("system time is after epoch")
		.as_nanos();
	let seq = NEXT_SESSION_SEQ.fetch_add(1, Ordering::SeqCst);
	format!("{seed:x}-{seq:x}")
}
