//! Session management and serialized command dispatch for the rd driver.
//!
//! Commands arrive concurrently from the transport layer; the [`Dispatcher`]
//! resolves each name to a handler, enforces the single-session invariant,
//! and funnels execution through the [`CommandQueue`] so commands run one at
//! a time in strict arrival order. The [`SessionStore`] owns the single
//! session slot; handlers reach it through the [`DriverContext`] their thunk
//! captures at submission.

pub mod dispatcher;
pub mod error;
pub mod handlers;
pub mod queue;
pub mod session;

pub use dispatcher::{Dispatcher, DriverContext};
pub use error::{DriverError, Result};
pub use handlers::{CREATE_SESSION, Handler, HandlerFuture};
pub use queue::{CommandQueue, Thunk};
pub use session::{SessionRecord, SessionStore};
