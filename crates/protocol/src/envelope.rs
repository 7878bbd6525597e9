//! JSON-wire-protocol request and response envelopes.
//!
//! Every HTTP response carries the same envelope: a numeric `status` (0 for
//! success), the active `sessionId` when one exists, and a command-specific
//! `value`. Protocol-level failure is signalled by a non-zero `status` in the
//! body, independent of the transport-level HTTP status.
//!
//! # Main Types
//!
//! - [`WireResponse`] - Response envelope returned for every route
//! - [`WireStatus`] - Protocol status codes
//! - [`NewSessionRequest`] - Body of `POST /session`

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Protocol-level status codes.
///
/// The numeric values are fixed by the JSON wire protocol and must not be
/// renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireStatus {
	/// The command executed successfully.
	Success,
	/// No session is active (or the session was already terminated).
	NoSuchDriver,
	/// The requested command is not mapped to any handler.
	UnknownCommand,
	/// A command failed for a reason not covered by a more specific code.
	UnknownError,
	/// A new session could not be created.
	SessionNotCreated,
}

impl WireStatus {
	/// Numeric code carried in the envelope's `status` field.
	pub fn code(self) -> u32 {
		match self {
			WireStatus::Success => 0,
			WireStatus::NoSuchDriver => 6,
			WireStatus::UnknownCommand => 9,
			WireStatus::UnknownError => 13,
			WireStatus::SessionNotCreated => 33,
		}
	}
}

/// Response envelope returned for every route.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireResponse {
	pub status: u32,
	/// Id of the active session, omitted when none exists.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub session_id: Option<String>,
	pub value: Value,
}

impl WireResponse {
	/// Success envelope wrapping a command's result value.
	pub fn success(session_id: Option<String>, value: Value) -> Self {
		Self {
			status: WireStatus::Success.code(),
			session_id,
			value,
		}
	}

	/// Error envelope. The message lands in `value.message` so callers can
	/// match on its text.
	pub fn error(status: WireStatus, message: &str) -> Self {
		Self {
			status: status.code(),
			session_id: None,
			value: json!({ "message": message }),
		}
	}
}

/// Body of `POST /session`.
///
/// Both capability objects are optional on the wire; absent fields
/// deserialize as JSON null and are treated as empty by the driver.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewSessionRequest {
	pub desired_capabilities: Value,
	pub required_capabilities: Value,
}
