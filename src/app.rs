//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads and cleans the dataset
//! - computes the four report charts
//! - hands off to the TUI or prints text tables
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, ReportArgs};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `salesdash` binary.
pub fn run() -> Result<(), AppError> {
    // We want `salesdash` and `salesdash --csv data.csv` to behave like
    // `salesdash tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => crate::tui::run(args),
        Command::Report(args) => handle_report(args),
    }
}

fn handle_report(args: ReportArgs) -> Result<(), AppError> {
    let loaded = pipeline::load_data(&args.data)?;
    let selector = pipeline::selector_for_report(&loaded.dataset, args.mode, args.year)?;
    let slots = crate::report::build_charts(&loaded.dataset, &selector);

    print!(
        "{}",
        crate::report::format_run_summary(&loaded.dataset, &selector, &loaded.source)
    );
    print!("{}", crate::report::format_slots(&slots));

    if let Some(path) = &args.export {
        crate::io::export::write_slots_csv(path, &slots)?;
        println!("Exported results to {}", path.display());
    }

    Ok(())
}

/// Rewrite argv so `salesdash` defaults to `salesdash tui`.
///
/// Rules:
/// - `salesdash`                      -> `salesdash tui`
/// - `salesdash --csv data.csv ...`   -> `salesdash tui --csv data.csv ...`
/// - `salesdash --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "report");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
