//! Import command implementations.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use mergulho_server::import;
use mergulho_server::store::StoreArgs;

use crate::output;

#[derive(Args, Debug)]
pub struct ImportCommand {
    #[command(subcommand)]
    pub command: ImportSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ImportSubcommand {
    /// Import sightings from a CSV file, keyed by registro
    Sightings(ImportArgs),

    /// Import telemetry from a CSV file (oid,title,date,latitude,longitude,notes)
    Telemetry(ImportArgs),
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Path to the CSV file
    pub csv: PathBuf,

    /// Import at most this many rows
    #[arg(short = 'n', long = "num-lines")]
    pub num_lines: Option<usize>,

    #[command(flatten)]
    pub store: StoreArgs,
}

impl ImportArgs {
    fn open_csv(&self) -> Result<BufReader<File>> {
        let file = File::open(&self.csv)
            .with_context(|| format!("Failed to open {}", self.csv.display()))?;
        Ok(BufReader::new(file))
    }
}

pub async fn handle(cmd: ImportCommand) -> Result<()> {
    match cmd.command {
        ImportSubcommand::Sightings(args) => {
            let store = args.store.open()?;
            let count =
                import::import_sightings(store.as_ref(), args.open_csv()?, args.num_lines).await?;
            output::success(&format!(
                "Imported {} sightings from {}",
                count,
                args.csv.display()
            ));
        }
        ImportSubcommand::Telemetry(args) => {
            let store = args.store.open()?;
            let count =
                import::import_telemetry(store.as_ref(), args.open_csv()?, args.num_lines).await?;
            output::success(&format!(
                "Imported {} telemetry records from {}",
                count,
                args.csv.display()
            ));
        }
    }
    Ok(())
}
