use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use kuma::SourceKind;

/// Build a geocoded bear sighting dataset from prefectural PDF bulletins.
#[derive(Debug, Parser)]
#[command(name = "kuma", about, version)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the full pipeline and write the CSV dataset
    Run(RunArgs),

    /// Print the candidate lines (or parsed records) of one bulletin
    Lines {
        /// Which bulletin grammar and layout to use
        #[arg(value_enum)]
        source: SourceArg,

        /// Path to the bulletin PDF
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print parsed records as JSON lines instead of raw text lines
        #[arg(long)]
        records: bool,

        /// Pipeline configuration providing layout and text options
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

/// Options for the `run` subcommand. Flags override the configuration file.
#[derive(Debug, Default, clap::Args)]
pub struct RunArgs {
    /// YAML pipeline configuration
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the bulletins
    #[arg(long, value_name = "DIR")]
    pub input_dir: Option<PathBuf>,

    /// YAML geocode dictionary
    #[arg(long, value_name = "FILE")]
    pub geocode: Option<PathBuf>,

    /// Output CSV path
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Also write per-source JSON and the combined CSV into this directory
    #[arg(long, value_name = "DIR")]
    pub artifacts_dir: Option<PathBuf>,

    /// Year assumed for month-day dates
    #[arg(long)]
    pub year: Option<i32>,

    /// Summary format printed to stdout
    #[arg(long, value_enum, default_value_t = SummaryFormat::Text)]
    pub format: SummaryFormat,
}

/// Bulletin source selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceArg {
    Kanagawa,
    Yamanashi,
    Shizuoka,
}

impl From<SourceArg> for SourceKind {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Kanagawa => SourceKind::Kanagawa,
            SourceArg::Yamanashi => SourceKind::Yamanashi,
            SourceArg::Shizuoka => SourceKind::Shizuoka,
        }
    }
}

/// Format of the run summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SummaryFormat {
    #[default]
    Text,
    Json,
}
