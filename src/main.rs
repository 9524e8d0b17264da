use std::process::ExitCode;

use clap::Parser;
use delivery_forecast::commands::base_commands::{CliArgs, Commands};
use delivery_forecast::commands::completions_cmd::completions_command;
use delivery_forecast::commands::forecast_cmd::forecast_command;
use delivery_forecast::commands::horizon_cmd::horizon_command;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.quiet, args.verbose);

    let result = match args.command {
        cmd @ Commands::Forecast { .. } => forecast_command(cmd),
        cmd @ Commands::Horizon { .. } => horizon_command(cmd),
        Commands::Completions { shell } => {
            completions_command(shell);
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Failed to run forecast: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(quiet: bool, verbose: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_env("DELIVERY_FORECAST_LOG").unwrap_or_else(|_| EnvFilter::new(level));

    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
    {
        eprintln!("Failed to initialize logging: {e}");
    }
}
