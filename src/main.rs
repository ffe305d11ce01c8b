use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use goxver::{app, cli::Cli, telemetry};

#[tokio::main]
async fn main() -> ExitCode {
    // Optional .env next to the invocation, e.g. to pin GOPATH or RUST_LOG.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    telemetry::init(cli.verbose);

    match app::run(&cli).await {
        Ok(Some(flags)) => {
            print!("{flags}");
            let _ = io::stdout().flush();
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
