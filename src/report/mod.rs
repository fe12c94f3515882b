//! Chart binding: map aggregation results to renderable chart descriptors.
//!
//! The binder is a pure function from `(&Dataset, &SelectorState)` to four
//! chart slots. Each slot carries the chart kind, axis/field names, a title,
//! and either the aggregated data or an explicit no-data placeholder. Front
//! ends (TUI, text report, CSV export) only consume slots; they never reach
//! back into the dataset.

use crate::agg::{self, ScatterPoint, Series};
use crate::domain::{Dataset, ReportMode, SelectorState};

pub mod format;

pub use format::*;

/// How a slot should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Bar,
    Pie,
    Scatter,
}

impl ChartKind {
    pub fn display_name(self) -> &'static str {
        match self {
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
            ChartKind::Pie => "pie",
            ChartKind::Scatter => "scatter",
        }
    }
}

/// Render-only description of one chart.
#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x_field: &'static str,
    pub y_field: &'static str,
    pub color_field: Option<&'static str>,
    pub size_field: Option<&'static str>,
    pub hover_fields: &'static [&'static str],
}

impl ChartSpec {
    fn new(kind: ChartKind, title: String, x_field: &'static str, y_field: &'static str) -> Self {
        Self {
            kind,
            title,
            x_field,
            y_field,
            color_field: None,
            size_field: None,
            hover_fields: &[],
        }
    }
}

/// Data attached to a slot.
///
/// `NoData` is the explicit placeholder for empty aggregations; front ends
/// render it as a message instead of an empty chart.
#[derive(Debug, Clone)]
pub enum ChartData {
    Series(Series),
    Points(Vec<ScatterPoint>),
    NoData,
}

impl ChartData {
    fn from_series(series: Series) -> Self {
        if series.is_empty() {
            ChartData::NoData
        } else {
            ChartData::Series(series)
        }
    }

    fn from_points(points: Vec<ScatterPoint>) -> Self {
        if points.is_empty() {
            ChartData::NoData
        } else {
            ChartData::Points(points)
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, ChartData::NoData)
    }
}

/// One of the four dashboard slots.
#[derive(Debug, Clone)]
pub struct ChartSlot {
    pub spec: ChartSpec,
    pub data: ChartData,
}

/// Compute all four charts for the current selector state.
pub fn build_charts(dataset: &Dataset, selector: &SelectorState) -> [ChartSlot; 4] {
    match selector.mode {
        ReportMode::Yearly => build_yearly(dataset, selector.effective_year(dataset)),
        ReportMode::Recession => build_recession(dataset),
    }
}

fn build_yearly(dataset: &Dataset, year: Option<i32>) -> [ChartSlot; 4] {
    let yearly = ChartSlot {
        spec: ChartSpec::new(
            ChartKind::Line,
            "Yearly Automobile Sales (Average over Months)".to_string(),
            "Year",
            "Automobile_Sales",
        ),
        data: ChartData::from_series(agg::yearly_average_sales(dataset)),
    };

    // No year in the dataset at all: the year-scoped slots have nothing to
    // show, but the full-period chart above still renders.
    let Some(year) = year else {
        let placeholder = |kind, title: String, x, y| ChartSlot {
            spec: ChartSpec::new(kind, title, x, y),
            data: ChartData::NoData,
        };
        return [
            yearly,
            placeholder(
                ChartKind::Line,
                "Total Monthly Automobile Sales".to_string(),
                "Month",
                "Automobile_Sales",
            ),
            placeholder(
                ChartKind::Bar,
                "Average Vehicles Sold by Vehicle Type".to_string(),
                "Vehicle_Type",
                "Automobile_Sales",
            ),
            placeholder(
                ChartKind::Pie,
                "Ad Expenditure Share by Vehicle Type".to_string(),
                "Vehicle_Type",
                "Advertising_Expenditure",
            ),
        ];
    };

    let monthly = ChartSlot {
        spec: ChartSpec::new(
            ChartKind::Line,
            format!("Total Monthly Automobile Sales - {year}"),
            "Month",
            "Automobile_Sales",
        ),
        data: ChartData::from_series(agg::monthly_total_sales(dataset, year)),
    };

    let by_type = ChartSlot {
        spec: ChartSpec::new(
            ChartKind::Bar,
            format!("Average Vehicles Sold by Vehicle Type - {year}"),
            "Vehicle_Type",
            "Automobile_Sales",
        ),
        data: ChartData::from_series(agg::average_sales_by_type(dataset, year)),
    };

    let ad_share = ChartSlot {
        spec: ChartSpec::new(
            ChartKind::Pie,
            format!("Ad Expenditure Share by Vehicle Type - {year}"),
            "Vehicle_Type",
            "Advertising_Expenditure",
        ),
        data: ChartData::from_series(agg::ad_expenditure_by_type(dataset, year)),
    };

    [yearly, monthly, by_type, ad_share]
}

fn build_recession(dataset: &Dataset) -> [ChartSlot; 4] {
    let yearly = ChartSlot {
        spec: ChartSpec::new(
            ChartKind::Line,
            "Avg Automobile Sales during Recession (Year-wise)".to_string(),
            "Year",
            "Automobile_Sales",
        ),
        data: ChartData::from_series(agg::recession_yearly_average_sales(dataset)),
    };

    let by_type = ChartSlot {
        spec: ChartSpec::new(
            ChartKind::Bar,
            "Avg Vehicles Sold by Vehicle Type (Recession)".to_string(),
            "Vehicle_Type",
            "Automobile_Sales",
        ),
        data: ChartData::from_series(agg::recession_average_sales_by_type(dataset)),
    };

    let ad_share = ChartSlot {
        spec: ChartSpec::new(
            ChartKind::Pie,
            "Ad Expenditure Share by Vehicle Type (Recession)".to_string(),
            "Vehicle_Type",
            "Advertising_Expenditure",
        ),
        data: ChartData::from_series(agg::recession_ad_expenditure_by_type(dataset)),
    };

    let mut scatter_spec = ChartSpec::new(
        ChartKind::Scatter,
        "Unemployment vs Automobile Sales by Vehicle Type (Recession)".to_string(),
        "unemployment_rate",
        "Automobile_Sales",
    );
    scatter_spec.color_field = Some("Vehicle_Type");
    scatter_spec.size_field = Some("Automobile_Sales");
    scatter_spec.hover_fields = &["Year", "Month"];

    let scatter = ChartSlot {
        spec: scatter_spec,
        data: ChartData::from_points(agg::recession_unemployment_points(dataset)),
    };

    [yearly, by_type, ad_share, scatter]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SalesRecord;

    fn row(year: i32, month: &str, recession: bool, sales: f64) -> SalesRecord {
        SalesRecord {
            year: Some(year),
            month: month.to_string(),
            recession,
            sales,
            vehicle_type: "Sports".to_string(),
            ad_expenditure: 1.0,
            unemployment_rate: Some(5.0),
        }
    }

    #[test]
    fn yearly_mode_slot_kinds() {
        let ds = Dataset::from_records(vec![row(2019, "1", false, 10.0)]);
        let selector = SelectorState {
            mode: ReportMode::Yearly,
            selected_year: Some(2019),
        };
        let slots = build_charts(&ds, &selector);
        let kinds: Vec<ChartKind> = slots.iter().map(|s| s.spec.kind).collect();
        assert_eq!(
            kinds,
            vec![ChartKind::Line, ChartKind::Line, ChartKind::Bar, ChartKind::Pie]
        );
        assert!(slots.iter().all(|s| !s.data.is_no_data()));
        assert!(slots[1].spec.title.contains("2019"));
    }

    #[test]
    fn recession_mode_slot_kinds() {
        let ds = Dataset::from_records(vec![row(2009, "1", true, 10.0)]);
        let selector = SelectorState {
            mode: ReportMode::Recession,
            selected_year: Some(2009),
        };
        let slots = build_charts(&ds, &selector);
        let kinds: Vec<ChartKind> = slots.iter().map(|s| s.spec.kind).collect();
        assert_eq!(
            kinds,
            vec![ChartKind::Line, ChartKind::Bar, ChartKind::Pie, ChartKind::Scatter]
        );
        assert_eq!(slots[3].spec.color_field, Some("Vehicle_Type"));
        assert_eq!(slots[3].spec.size_field, Some("Automobile_Sales"));
    }

    #[test]
    fn recession_mode_without_recession_rows_yields_placeholders() {
        let ds = Dataset::from_records(vec![row(2019, "1", false, 10.0)]);
        let selector = SelectorState {
            mode: ReportMode::Recession,
            selected_year: None,
        };
        let slots = build_charts(&ds, &selector);
        assert!(slots.iter().all(|s| s.data.is_no_data()));
    }

    #[test]
    fn selected_year_without_rows_yields_placeholders_for_year_slots() {
        let ds = Dataset::from_records(vec![row(2019, "1", false, 10.0)]);
        let selector = SelectorState {
            mode: ReportMode::Yearly,
            selected_year: Some(1999),
        };
        let slots = build_charts(&ds, &selector);
        // Full-period chart is unaffected by the bad year.
        assert!(!slots[0].data.is_no_data());
        assert!(slots[1].data.is_no_data());
        assert!(slots[2].data.is_no_data());
        assert!(slots[3].data.is_no_data());
    }

    #[test]
    fn yearly_mode_falls_back_to_max_year() {
        let ds = Dataset::from_records(vec![row(2019, "1", false, 10.0), row(2021, "1", false, 20.0)]);
        let selector = SelectorState {
            mode: ReportMode::Yearly,
            selected_year: None,
        };
        let slots = build_charts(&ds, &selector);
        assert!(slots[1].spec.title.contains("2021"));
    }
}
