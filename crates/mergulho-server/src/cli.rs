//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::commands::convert::ConvertCommand;
use crate::commands::import::ImportCommand;
use crate::commands::serve::ServeArgs;

/// Mergulho Virtual wildlife API and data tools.
#[derive(Parser, Debug)]
#[command(name = "mergulho")]
#[command(author, version = env!("MERGULHO_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the HTTP API
    Serve(ServeArgs),

    /// Load CSV files into the store
    Import(ImportCommand),

    /// Convert tracking exports to CSV
    Convert(ConvertCommand),
}
