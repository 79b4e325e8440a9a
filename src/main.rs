use std::env;

use fi_planner::api::{ApiError, run_cli, run_http_server};
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const USAGE: &str = "Usage: fi-planner serve [port] | fi-planner plan [--help] [flags]";

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    let raw_args: Vec<String> = env::args().collect();
    match raw_args.get(1).map(|s| s.as_str()) {
        Some("serve") => {
            let port = raw_args
                .get(2)
                .and_then(|s| s.parse::<u16>().ok())
                .unwrap_or(8080);
            if let Err(e) = run_http_server(port).await {
                error!("Server error: {e}");
                std::process::exit(1);
            }
        }
        Some("plan") => match run_cli(&raw_args[2..]) {
            Ok(output) => print!("{output}"),
            Err(ApiError::Cli(e)) => e.exit(),
            Err(e) => {
                error!("{e}");
                std::process::exit(1);
            }
        },
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    }
}
