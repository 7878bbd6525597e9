//! Command-line arguments for the rd server binary.

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "rd", version, about = "Remote automation driver server")]
pub struct Cli {
	/// Interface to bind.
	#[arg(long, default_value = "127.0.0.1")]
	pub host: String,

	/// Port to listen on.
	#[arg(long, short, default_value_t = 4723)]
	pub port: u16,

	/// Increase log verbosity (-v, -vv).
	#[arg(long, short, action = clap::ArgAction::Count)]
	pub verbose: u8,
}
