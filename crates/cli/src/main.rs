use clap::Parser;
use rd_cli::{cli::Cli, logging, server};

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	if let Err(err) = server::run(&cli.host, cli.port).await {
		eprintln!("rd: {err:#}");
		std::process::exit(1);
	}
}
