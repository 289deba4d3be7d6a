use std::process::ExitCode;

use clap::Parser;
use journey_runner::cli::commands::{cmd_run, run_guarded};
use journey_runner::cli::config::{Cli, Commands, load_config};
use journey_runner::journey::result_model::JourneyTestResult;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Run(args) => match run_guarded(&args, || cmd_run(&args, &config)) {
            Ok(result) => {
                emit(&result);
                if result.passed() {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::from(1)
                }
            }
            Err(e) => {
                error!("{}", e);
                ExitCode::from(2)
            }
        },
    }
}

/// Logs go to stderr; stdout carries only the JSON result.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn emit(result: &JourneyTestResult) {
    match serde_json::to_string_pretty(result) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            error!(error = %e, "could not serialize result");
            println!("{{\"overallStatus\":\"fail\"}}");
        }
    }
}
