//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during aggregation
//! - exported to CSV
//! - reloaded later for comparisons

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One cleaned row of the historical automobile sales table.
///
/// The loader guarantees every record has a well-defined `vehicle_type` and
/// `recession` flag; `year` and `unemployment_rate` stay optional because the
/// source data genuinely has gaps there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub year: Option<i32>,
    pub month: String,
    pub recession: bool,
    pub sales: f64,
    pub vehicle_type: String,
    pub ad_expenditure: f64,
    pub unemployment_rate: Option<f64>,
}

/// The full sales table, loaded once at startup and immutable afterwards.
///
/// Aggregations take `&Dataset` explicitly; nothing reads it from ambient
/// scope, so the data flow stays visible at call sites.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<SalesRecord>,
}

impl Dataset {
    pub fn from_records(records: Vec<SalesRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct years present in the table, ascending.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.records.iter().filter_map(|r| r.year).collect();
        years.sort_unstable();
        years.dedup();
        years
    }

    /// The most recent year in the table, if any row has one.
    pub fn max_year(&self) -> Option<i32> {
        self.records.iter().filter_map(|r| r.year).max()
    }
}

/// Which report the dashboard shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportMode {
    /// Full-period yearly statistics, parameterized by a selected year.
    Yearly,
    /// Statistics restricted to recession-flagged rows; the year is ignored.
    Recession,
}

impl ReportMode {
    pub fn display_name(self) -> &'static str {
        match self {
            ReportMode::Yearly => "Yearly Statistics",
            ReportMode::Recession => "Recession Period Statistics",
        }
    }

    pub fn toggled(self) -> ReportMode {
        match self {
            ReportMode::Yearly => ReportMode::Recession,
            ReportMode::Recession => ReportMode::Yearly,
        }
    }
}

/// The two user-controlled parameters driving every recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorState {
    pub mode: ReportMode,
    pub selected_year: Option<i32>,
}

impl SelectorState {
    /// Initial state: Yearly report, most recent year preselected.
    pub fn initial(dataset: &Dataset) -> Self {
        Self {
            mode: ReportMode::Yearly,
            selected_year: dataset.max_year(),
        }
    }

    /// Year used by Yearly-mode aggregations.
    ///
    /// Falls back to the dataset's most recent year when no year has been
    /// picked yet (first render).
    pub fn effective_year(&self, dataset: &Dataset) -> Option<i32> {
        self.selected_year.or_else(|| dataset.max_year())
    }

    /// Whether the year selector is active; pure function of the mode.
    pub fn year_selector_enabled(&self) -> bool {
        self.mode == ReportMode::Yearly
    }

    /// Hint shown next to the year selector.
    pub fn year_selector_help(&self) -> &'static str {
        match self.mode {
            ReportMode::Yearly => "Year is enabled for Yearly Statistics.",
            ReportMode::Recession => "Year is disabled for Recession Period Statistics.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(year: Option<i32>) -> SalesRecord {
        SalesRecord {
            year,
            month: "1".to_string(),
            recession: false,
            sales: 0.0,
            vehicle_type: "Unknown".to_string(),
            ad_expenditure: 0.0,
            unemployment_rate: None,
        }
    }

    #[test]
    fn years_are_distinct_and_sorted() {
        let ds = Dataset::from_records(vec![
            record(Some(2021)),
            record(Some(2019)),
            record(Some(2021)),
            record(None),
            record(Some(2020)),
        ]);
        assert_eq!(ds.years(), vec![2019, 2020, 2021]);
        assert_eq!(ds.max_year(), Some(2021));
    }

    #[test]
    fn initial_selector_uses_max_year() {
        let ds = Dataset::from_records(vec![record(Some(2019)), record(Some(2023))]);
        let sel = SelectorState::initial(&ds);
        assert_eq!(sel.mode, ReportMode::Yearly);
        assert_eq!(sel.selected_year, Some(2023));
        assert_eq!(sel.effective_year(&ds), Some(2023));
    }

    #[test]
    fn effective_year_falls_back_to_max() {
        let ds = Dataset::from_records(vec![record(Some(2019)), record(Some(2020))]);
        let sel = SelectorState {
            mode: ReportMode::Yearly,
            selected_year: None,
        };
        assert_eq!(sel.effective_year(&ds), Some(2020));
    }

    #[test]
    fn year_selector_enablement_tracks_mode() {
        let mut sel = SelectorState {
            mode: ReportMode::Yearly,
            selected_year: Some(2020),
        };
        assert!(sel.year_selector_enabled());
        assert_eq!(sel.year_selector_help(), "Year is enabled for Yearly Statistics.");

        sel.mode = sel.mode.toggled();
        assert!(!sel.year_selector_enabled());
        assert_eq!(
            sel.year_selector_help(),
            "Year is disabled for Recession Period Statistics."
        );

        sel.mode = sel.mode.toggled();
        assert!(sel.year_selector_enabled());
    }
}
