//! Stored routine lifecycle manager.

use clap::Parser;

use strata_cli::cli::Cli;
use strata_cli::{commands, logging};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let outcome = match (&cli.command, &cli.config) {
        (Some(command), None) => commands::run_command(command, cli.prune),
        (None, Some(config)) => commands::run_all(config, cli.prune),
        _ => {
            eprintln!("error: pass a configuration file or one subcommand (see --help)");
            std::process::exit(2);
        }
    };

    let exit_code = match outcome {
        Ok(0) => 0,
        Ok(_) => 1,
        Err(error) => {
            eprintln!("error: {error}");
            1
        }
    };
    std::process::exit(exit_code);
}
