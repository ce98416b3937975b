//! Viatab: flatten VIA annotation exports into tables.
//!
//! VGG Image Annotator (VIA) stores annotations as a nested map of images to
//! regions, where each region carries a shape-attribute map and a
//! region-attribute map whose keys vary by shape type and labelling task.
//! Viatab turns that into one row per region over a unified column set,
//! ready to be written as CSV or JSON records.
//!
//! # Modules
//!
//! - [`via`]: VIA reading, flattening, and table writers
//! - [`inspect`]: Summary statistics over a flattened table
//! - [`error`]: Error types for viatab operations

pub mod error;
pub mod inspect;
pub mod via;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use log::info;

pub use error::ViatabError;

/// The viatab CLI application.
#[derive(Parser)]
#[command(name = "viatab")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Flatten a VIA project export into one row per region.
    Convert(ConvertArgs),
    /// Print summary statistics for a VIA project export.
    Inspect(InspectArgs),
}

/// Table output formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum TableFormat {
    Csv,
    Json,
}

/// Report output formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

/// Arguments for the convert subcommand.
#[derive(clap::Args)]
struct ConvertArgs {
    /// VIA project JSON file.
    input: PathBuf,

    /// Output file (defaults to stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output table format.
    #[arg(long, value_enum, default_value_t = TableFormat::Csv)]
    to: TableFormat,

    /// Treat missing 'regions' lists and attribute maps as empty.
    #[arg(long, env = "VIATAB_LENIENT")]
    lenient: bool,
}

/// Arguments for the inspect subcommand.
#[derive(clap::Args)]
struct InspectArgs {
    /// VIA project JSON file.
    input: PathBuf,

    /// Output format for the report.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    output: ReportFormat,

    /// Treat missing 'regions' lists and attribute maps as empty.
    #[arg(long, env = "VIATAB_LENIENT")]
    lenient: bool,
}

/// Run the viatab CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), ViatabError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Convert(args)) => run_convert(args),
        Some(Commands::Inspect(args)) => run_inspect(args),
        None => {
            println!("viatab {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Flatten VIA annotation exports into tables.");
            println!();
            println!("Run 'viatab --help' for usage information.");
            Ok(())
        }
    }
}

fn load_table(input: &Path, lenient: bool) -> Result<via::Table, ViatabError> {
    let opts = via::FlattenOptions { lenient };
    let table = via::read_via_json_with(input, &opts)?;
    info!(
        "flattened {} region(s) into {} column(s) from {}",
        table.len(),
        table.columns().len(),
        input.display()
    );
    Ok(table)
}

/// Execute the convert subcommand.
fn run_convert(args: ConvertArgs) -> Result<(), ViatabError> {
    let table = load_table(&args.input, args.lenient)?;

    match (&args.output, args.to) {
        (Some(path), TableFormat::Csv) => via::io_csv::write_table_csv(path, &table)?,
        (Some(path), TableFormat::Json) => via::io_json::write_table_json(path, &table)?,
        (None, TableFormat::Csv) => {
            let stdout = io::stdout().lock();
            via::io_csv::write_csv(stdout, &table, Path::new("<stdout>"))?
                .flush()
                .map_err(ViatabError::Io)?;
        }
        (None, TableFormat::Json) => {
            println!("{}", via::io_json::to_json_string(&table)?);
        }
    }

    if let Some(path) = &args.output {
        info!("wrote {} row(s) to {}", table.len(), path.display());
    }

    Ok(())
}

/// Execute the inspect subcommand.
fn run_inspect(args: InspectArgs) -> Result<(), ViatabError> {
    let table = load_table(&args.input, args.lenient)?;
    let report = inspect::inspect_table(&table, &inspect::InspectOptions::default());

    match args.output {
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(&report).map_err(|source| {
                ViatabError::JsonWrite {
                    path: PathBuf::from("<stdout>"),
                    source,
                }
            })?;
            println!("{json}");
        }
        ReportFormat::Text => print!("{report}"),
    }

    Ok(())
}
