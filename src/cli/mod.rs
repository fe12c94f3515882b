//! Command-line parsing for the sales dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the data/aggregation code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::ReportMode;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "salesdash", version, about = "Historical Automobile Sales Dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive TUI dashboard (default).
    Tui(DataArgs),
    /// Print the four report aggregations as text tables.
    ///
    /// This uses the same aggregation core as the TUI, but renders results as
    /// plain text (useful for scripting) and can export them to CSV.
    Report(ReportArgs),
}

/// Where the dataset comes from.
#[derive(Debug, Parser, Clone)]
pub struct DataArgs {
    /// Fetch the dataset CSV from this URL instead of the default hosted one.
    #[arg(long)]
    pub url: Option<String>,

    /// Read the dataset from a local CSV file instead of the network.
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

/// Options for the text report.
#[derive(Debug, Parser, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Which report to compute.
    #[arg(short = 'm', long, value_enum, default_value_t = ReportMode::Yearly)]
    pub mode: ReportMode,

    /// Year for the Yearly report (defaults to the most recent year).
    ///
    /// Ignored by the Recession report.
    #[arg(short = 'y', long)]
    pub year: Option<i32>,

    /// Export the aggregation results to a tidy CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,
}
