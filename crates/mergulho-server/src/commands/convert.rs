//! Convert command implementations.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};

use mergulho_server::convert;

use crate::output;

#[derive(Args, Debug)]
pub struct ConvertCommand {
    #[command(subcommand)]
    pub command: ConvertSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConvertSubcommand {
    /// Flatten a wildlife tracking JSON export into telemetry CSV
    Wildlife(WildlifeArgs),
}

#[derive(Args, Debug)]
pub struct WildlifeArgs {
    /// Path to the JSON export
    pub input: PathBuf,

    /// Output CSV path (defaults to the input path with a .csv extension)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn handle(cmd: ConvertCommand) -> Result<()> {
    match cmd.command {
        ConvertSubcommand::Wildlife(args) => {
            match convert::convert_wildlife_file(&args.input, args.output.as_deref())? {
                Some((path, rows)) => {
                    output::success(&format!("Wrote {} rows to {}", rows, path.display()))
                }
                None => output::note("No data found to write to CSV."),
            }
        }
    }
    Ok(())
}
