//! Shared load-and-validate logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! source resolution -> fetch -> clean -> selector validation
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use crate::cli::DataArgs;
use crate::data::{DataSource, load_dataset};
use crate::domain::{Dataset, ReportMode, SelectorState};
use crate::error::AppError;

/// The dataset plus a description of where it came from.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub dataset: Dataset,
    pub source: String,
}

/// Resolve the data source, fetch it, and clean it into a `Dataset`.
///
/// This is the process's single load: any failure here is fatal and no
/// dashboard is shown.
pub fn load_data(args: &DataArgs) -> Result<LoadedData, AppError> {
    let source = DataSource::resolve(args.csv.as_deref(), args.url.as_deref());
    let bytes = source.fetch()?;
    let dataset = load_dataset(&bytes)?;
    Ok(LoadedData {
        dataset,
        source: source.describe(),
    })
}

/// Build the selector state for a one-shot report run.
///
/// An explicit `--year` must be one of the dataset's years; without one the
/// most recent year is used. The Recession report ignores the year entirely.
pub fn selector_for_report(
    dataset: &Dataset,
    mode: ReportMode,
    year: Option<i32>,
) -> Result<SelectorState, AppError> {
    let selected_year = match (mode, year) {
        (ReportMode::Yearly, Some(year)) => {
            if !dataset.years().contains(&year) {
                return Err(AppError::usage(format!(
                    "Year {year} is not present in the dataset (available: {}).",
                    summarize_years(dataset)
                )));
            }
            Some(year)
        }
        _ => dataset.max_year(),
    };

    Ok(SelectorState {
        mode,
        selected_year,
    })
}

fn summarize_years(dataset: &Dataset) -> String {
    let years = dataset.years();
    match (years.first(), years.last()) {
        (Some(first), Some(last)) => format!("{first}..{last}"),
        _ => "none".to_string(),
    }
}
