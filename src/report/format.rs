//! Formatted terminal output for the `report` subcommand.
//!
//! We keep formatting code in one place so:
//! - the aggregation code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::domain::{Dataset, SelectorState};
use crate::report::{ChartData, ChartSlot};

const BAR_WIDTH: usize = 30;

/// Format the run header: dataset shape and active selectors.
pub fn format_run_summary(dataset: &Dataset, selector: &SelectorState, source: &str) -> String {
    let mut out = String::new();

    out.push_str("=== salesdash - Automobile Sales Report ===\n");
    out.push_str(&format!("Source: {source}\n"));
    out.push_str(&format!("Rows: {}\n", dataset.len()));

    let years = dataset.years();
    match (years.first(), years.last()) {
        (Some(first), Some(last)) => {
            out.push_str(&format!("Years: {first}..{last} ({} distinct)\n", years.len()));
        }
        _ => out.push_str("Years: none\n"),
    }

    out.push_str(&format!("Report: {}\n", selector.mode.display_name()));
    if selector.year_selector_enabled() {
        match selector.effective_year(dataset) {
            Some(year) => out.push_str(&format!("Year: {year}\n")),
            None => out.push_str("Year: -\n"),
        }
    } else {
        out.push_str(&format!("Year: - ({})\n", selector.year_selector_help()));
    }
    out.push('\n');

    out
}

/// Format all four chart slots as text tables.
pub fn format_slots(slots: &[ChartSlot]) -> String {
    let mut out = String::new();
    for (idx, slot) in slots.iter().enumerate() {
        out.push_str(&format!(
            "[{idx}] {} ({})\n",
            slot.spec.title,
            slot.spec.kind.display_name()
        ));
        out.push_str(&format_slot_body(slot));
        out.push('\n');
    }
    out
}

fn format_slot_body(slot: &ChartSlot) -> String {
    match &slot.data {
        ChartData::NoData => "  (no data available)\n".to_string(),
        ChartData::Series(series) => format_series_table(series, slot.spec.x_field),
        ChartData::Points(points) => {
            let mut out = String::new();
            out.push_str(&format!(
                "  {:<18} {:>10} {:<16} {:>6} {:<6}\n",
                "unemployment_rate", "sales", "vehicle_type", "year", "month"
            ));
            for p in points {
                out.push_str(&format!(
                    "  {:<18.2} {:>10.2} {:<16} {:>6} {:<6}\n",
                    p.unemployment_rate,
                    p.sales,
                    p.vehicle_type,
                    p.year.map(|y| y.to_string()).unwrap_or_else(|| "-".to_string()),
                    p.month,
                ));
            }
            out
        }
    }
}

fn format_series_table(series: &[(String, f64)], x_field: &str) -> String {
    let mut out = String::new();
    let max = series
        .iter()
        .map(|(_, v)| v.abs())
        .fold(0.0_f64, f64::max);

    out.push_str(&format!("  {:<18} {:>12}\n", x_field, "value"));
    for (label, value) in series {
        out.push_str(&format!(
            "  {:<18} {:>12.2} {}\n",
            label,
            value,
            inline_bar(*value, max)
        ));
    }
    out
}

/// A proportional run of `#` so tables double as quick bar charts.
fn inline_bar(value: f64, max: f64) -> String {
    if max <= 0.0 || !value.is_finite() {
        return String::new();
    }
    let n = ((value.abs() / max) * BAR_WIDTH as f64).round() as usize;
    "#".repeat(n.min(BAR_WIDTH))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ReportMode, SalesRecord};
    use crate::report::build_charts;

    fn dataset() -> Dataset {
        Dataset::from_records(vec![
            SalesRecord {
                year: Some(2019),
                month: "1".to_string(),
                recession: false,
                sales: 100.0,
                vehicle_type: "Sports".to_string(),
                ad_expenditure: 12.0,
                unemployment_rate: Some(4.0),
            },
            SalesRecord {
                year: Some(2019),
                month: "2".to_string(),
                recession: false,
                sales: 200.0,
                vehicle_type: "Executive".to_string(),
                ad_expenditure: 8.0,
                unemployment_rate: None,
            },
        ])
    }

    #[test]
    fn summary_names_report_and_year() {
        let ds = dataset();
        let selector = SelectorState::initial(&ds);
        let summary = format_run_summary(&ds, &selector, "test.csv");
        assert!(summary.contains("Yearly Statistics"));
        assert!(summary.contains("Year: 2019"));
        assert!(summary.contains("Rows: 2"));
    }

    #[test]
    fn slots_render_values_and_placeholders() {
        let ds = dataset();
        let selector = SelectorState {
            mode: ReportMode::Recession,
            selected_year: None,
        };
        let slots = build_charts(&ds, &selector);
        let text = format_slots(&slots);
        // No recession rows: every slot renders the placeholder.
        assert_eq!(text.matches("(no data available)").count(), 4);

        let selector = SelectorState::initial(&ds);
        let slots = build_charts(&ds, &selector);
        let text = format_slots(&slots);
        assert!(text.contains("Yearly Automobile Sales"));
        assert!(text.contains("100.00"));
        assert!(text.contains('#'));
    }

    #[test]
    fn inline_bar_scales_with_max() {
        assert_eq!(inline_bar(0.0, 100.0), "");
        assert_eq!(inline_bar(100.0, 100.0).len(), BAR_WIDTH);
        assert_eq!(inline_bar(50.0, 100.0).len(), BAR_WIDTH / 2);
        assert_eq!(inline_bar(10.0, 0.0), "");
    }
}
