//! Command handler infrastructure and the built-in lifecycle handlers.
//!
//! A handler is an async callable taking the driver context and the call
//! arguments. The built-ins cover session lifecycle (`createSession`,
//! `deleteSession`), introspection (`getSession`, `getSessions`) and server
//! status (`getStatus`); everything else is registered by the surrounding
//! system through [`Dispatcher::register`].
//!
//! [`Dispatcher::register`]: crate::dispatcher::Dispatcher::register

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::{Map, Value, json};

use crate::dispatcher::DriverContext;
use crate::error::Result;

/// Boxed async handler future.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<Value>> + Send>>;

/// Handler function: `(context, args)` → async `Result<Value>`.
pub type Handler = Arc<dyn Fn(DriverContext, Vec<Value>) -> HandlerFuture + Send + Sync>;

/// Name of the one command that may run without an active session.
pub const CREATE_SESSION: &str = "createSession";

/// Creates the session and returns the `[id, capabilities]` pair.
pub fn create_session(ctx: DriverContext, args: Vec<Value>) -> HandlerFuture {
	Box::pin(async move {
		let capabilities = merge_capabilities(&args);
		let record = ctx.sessions().create(capabilities)?;
		Ok(json!([record.id, record.capabilities]))
	})
}

/// Clears the session slot.
pub fn delete_session(ctx: DriverContext, _args: Vec<Value>) -> HandlerFuture {
	Box::pin(async move {
		ctx.sessions().clear();
		Ok(Value::Null)
	})
}

/// Returns the active session's capabilities.
pub fn get_session(ctx: DriverContext, _args: Vec<Value>) -> HandlerFuture {
	Box::pin(async move { ctx.sessions().capabilities() })
}

/// Returns the zero-or-one `{id, capabilities}` entries.
pub fn get_sessions(ctx: DriverContext, _args: Vec<Value>) -> HandlerFuture {
	Box::pin(async move {
		let sessions = ctx.sessions().list();
		Ok(serde_json::to_value(sessions)?)
	})
}

/// Reports build and host information.
pub fn get_status(_ctx: DriverContext, _args: Vec<Value>) -> HandlerFuture {
	Box::pin(async move {
		Ok(json!({
			"build": { "version": env!("CARGO_PKG_VERSION") },
			"os": { "name": std::env::consts::OS, "arch": std::env::consts::ARCH },
		}))
	})
}

/// Folds the wire protocol's two-object new-session request into one
/// capability set: required capabilities override desired ones. Non-object
/// arguments (including the JSON nulls a bare request deserializes to)
/// contribute nothing.
fn merge_capabilities(args: &[Value]) -> Value {
	let mut merged = match args.first() {
		Some(Value::Object(desired)) => desired.clone(),
		_ => Map::new(),
	};
	if let Some(Value::Object(required)) = args.get(1) {
		for (key, value) in required {
			merged.insert(key.clone(), value.clone());
		}
	}
	Value::Object(merged)
}
