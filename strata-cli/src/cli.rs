//! Command line definition.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "strata",
    version,
    about = "Stored routine lifecycle manager",
    long_about = "Loads annotated SQL routine files into the database, \
                  synchronizes the constants registry, and generates a \
                  wrapper module for calling the routines.\n\n\
                  Passing just a configuration file runs every phase; the \
                  subcommands run a single one."
)]
pub struct Cli {
    /// Project configuration file; runs routines, constants, and wrappers.
    #[arg(value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,

    /// Remove metadata of routines whose source file disappeared.
    #[arg(long, global = true)]
    pub prune: bool,

    /// Increase log verbosity (-v for debug, -vv for trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load annotated routine source files into the database.
    Routines(ConfigArgs),

    /// Synchronize the constants registry and generated module.
    Constants(ConfigArgs),

    /// Generate the wrapper module from stored routine metadata.
    Wrapper(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Project configuration file.
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,
}
