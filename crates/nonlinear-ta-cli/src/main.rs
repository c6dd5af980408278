//! nonlinear-ta command-line interface
//!
//! This binary computes sliding-window nonlinear indicators over a numeric
//! column of a CSV file and writes the aligned results as CSV.

use std::process::ExitCode;

use nonlinear_ta_cli::args::Args;
use nonlinear_ta_cli::run::run;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Args::parse_args();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "run failed");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout stays clean CSV.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
