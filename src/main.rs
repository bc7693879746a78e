use std::env;
use std::process::ExitCode;

use siegeline::cli;

fn main() -> ExitCode {
    // Logs go to stderr; stdout carries reports.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("siegeline=info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let code = cli::run_with_args(&args);
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
