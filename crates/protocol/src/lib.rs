//! Wire types for the rd driver protocol (internal).

mod envelope;

pub use envelope::{NewSessionRequest, WireResponse, WireStatus};
