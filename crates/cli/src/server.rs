//! HTTP transport adapter: JSON-wire-protocol routes over the driver.
//!
//! Each route translates the HTTP request into a [`Dispatcher::execute`]
//! call and wraps the outcome in the wire envelope. The transport holds no
//! command state of its own; ordering and session checks all live behind
//! `execute`.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use rd::{CREATE_SESSION, Dispatcher, DriverError};
use rd_protocol::{NewSessionRequest, WireResponse, WireStatus};
use serde_json::Value;
use tokio::net::TcpListener;
use tracing::info;

type SharedDispatcher = Arc<Dispatcher>;

/// Builds the wire-protocol router around a dispatcher.
pub fn router(dispatcher: SharedDispatcher) -> Router {
	Router::new()
		.route("/wd/hub/status", get(get_status))
		.route("/wd/hub/session", post(create_session))
		.route("/wd/hub/sessions", get(get_sessions))
		.route(
			"/wd/hub/session/{session_id}",
			get(get_session).delete(delete_session),
		)
		.with_state(dispatcher)
}

/// Serves the driver until the process is stopped.
pub async fn run(host: &str, port: u16) -> Result<()> {
	let dispatcher = Arc::new(Dispatcher::new());
	let app = router(dispatcher);

	let addr: SocketAddr = format!("{host}:{port}")
		.parse()
		.with_context(|| format!("Invalid host/port combination: {host}:{port}"))?;

	info!(target = "rd.server", host, port, "starting driver server");

	let listener = TcpListener::bind(addr)
		.await
		.with_context(|| format!("Failed to bind driver server to {addr}"))?;

	axum::serve(listener, app.into_make_service())
		.await
		.context("Driver server error")
}

async fn create_session(
	State(dispatcher): State<SharedDispatcher>,
	Json(request): Json<NewSessionRequest>,
) -> (StatusCode, Json<WireResponse>) {
	let args = vec![request.desired_capabilities, request.required_capabilities];
	match dispatcher.execute(CREATE_SESSION, args).await {
		Ok(pair) => {
			// createSession resolves to the [id, capabilities] pair.
			let session_id = pair.get(0).and_then(Value::as_str).map(str::to_string);
			let capabilities = pair.get(1).cloned().unwrap_or(Value::Null);
			success(session_id, capabilities)
		}
		Err(err) => failure(&err),
	}
}

async fn delete_session(
	State(dispatcher): State<SharedDispatcher>,
	Path(_session_id): Path<String>,
) -> (StatusCode, Json<WireResponse>) {
	// Single-slot driver: the path id is accepted but the active session is
	// the only addressable one.
	match dispatcher.execute("deleteSession", Vec::new()).await {
		Ok(value) => success(dispatcher.sessions().current_id(), value),
		Err(err) => failure(&err),
	}
}

async fn get_session(
	State(dispatcher): State<SharedDispatcher>,
	Path(_session_id): Path<String>,
) -> (StatusCode, Json<WireResponse>) {
	match dispatcher.execute("getSession", Vec::new()).await {
		Ok(value) => success(dispatcher.sessions().current_id(), value),
		Err(err) => failure(&err),
	}
}

async fn get_sessions(State(dispatcher): State<SharedDispatcher>) -> (StatusCode, Json<WireResponse>) {
	match dispatcher.execute("getSessions", Vec::new()).await {
		Ok(value) => success(dispatcher.sessions().current_id(), value),
		Err(err) => failure(&err),
	}
}

async fn get_status(State(dispatcher): State<SharedDispatcher>) -> (StatusCode, Json<WireResponse>) {
	match dispatcher.execute("getStatus", Vec::new()).await {
		Ok(value) => success(dispatcher.sessions().current_id(), value),
		Err(err) => failure(&err),
	}
}

fn success(session_id: Option<String>, value: Value) -> (StatusCode, Json<WireResponse>) {
	(StatusCode::OK, Json(WireResponse::success(session_id, value)))
}

fn failure(err: &DriverError) -> (StatusCode, Json<WireResponse>) {
	let (http, status) = match err {
		DriverError::UnknownCommand(_) => (StatusCode::NOT_FOUND, WireStatus::UnknownCommand),
		DriverError::NoActiveSession => (StatusCode::INTERNAL_SERVER_ERROR, WireStatus::NoSuchDriver),
		DriverError::SessionAlreadyActive(_) => {
			(StatusCode::INTERNAL_SERVER_ERROR, WireStatus::SessionNotCreated)
		}
		DriverError::Handler(_) | DriverError::QueueClosed | DriverError::Json(_) => {
			(StatusCode::INTERNAL_SERVER_ERROR, WireStatus::UnknownError)
		}
	};
	(http, Json(WireResponse::error(status, &err.to_string())))
}
