mod cli;
mod exchange;

use clap::Parser;
use cli::{Cli, Command};
use exchange::{run_end_to_end, run_exchange};
use std::process::ExitCode;

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let success = match &cli.command {
        Command::Exchange(args) => {
            let report = run_exchange(&args.to_config(cli.verbose))?;
            if !cli.verbose {
                println!("Do the keys match? {}", report.keys_match());
            }
            report.keys_match()
        }
        Command::EndToEnd { iterations, exchange } => {
            log::info!("Starting end to end run of {} exchanges", iterations);
            run_end_to_end(&exchange.to_config(cli.verbose), *iterations)?.all_passed()
        }
    };

    Ok(if success { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
