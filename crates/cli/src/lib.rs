//! Server binary plumbing for the rd driver: argument parsing, logging
//! bootstrap, and the HTTP transport adapter.

pub mod cli;
pub mod logging;
pub mod server;
