//! Export aggregation results to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts: one tidy table covering all four slots, with scatter-only columns
//! left empty for grouped series.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::AppError;
use crate::report::{ChartData, ChartSlot};

/// Write all four chart slots to a CSV file.
pub fn write_slots_csv(path: &Path, slots: &[ChartSlot]) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::usage(format!("Failed to create export CSV '{}': {e}", path.display()))
    })?;

    write_slots(&mut file, slots)
        .map_err(|e| AppError::usage(format!("Failed to write export CSV: {e}")))
}

fn write_slots(out: &mut impl Write, slots: &[ChartSlot]) -> std::io::Result<()> {
    writeln!(out, "slot,kind,title,x,y,vehicle_type,year,month")?;

    for (idx, slot) in slots.iter().enumerate() {
        let kind = slot.spec.kind.display_name();
        let title = csv_quote(&slot.spec.title);
        match &slot.data {
            ChartData::NoData => {
                writeln!(out, "{idx},{kind},{title},,,,,")?;
            }
            ChartData::Series(series) => {
                for (label, value) in series {
                    writeln!(out, "{idx},{kind},{title},{},{value:.4},,,", csv_quote(label))?;
                }
            }
            ChartData::Points(points) => {
                for p in points {
                    writeln!(
                        out,
                        "{idx},{kind},{title},{:.4},{:.4},{},{},{}",
                        p.unemployment_rate,
                        p.sales,
                        csv_quote(&p.vehicle_type),
                        p.year.map(|y| y.to_string()).unwrap_or_default(),
                        csv_quote(&p.month),
                    )?;
                }
            }
        }
    }

    Ok(())
}

/// Quote a field if it contains CSV-significant characters.
fn csv_quote(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Dataset, ReportMode, SalesRecord, SelectorState};
    use crate::report::build_charts;

    #[test]
    fn export_covers_all_slots() {
        let ds = Dataset::from_records(vec![SalesRecord {
            year: Some(2009),
            month: "1".to_string(),
            recession: true,
            sales: 80.0,
            vehicle_type: "Sports".to_string(),
            ad_expenditure: 10.0,
            unemployment_rate: Some(9.5),
        }]);
        let selector = SelectorState {
            mode: ReportMode::Recession,
            selected_year: None,
        };
        let slots = build_charts(&ds, &selector);

        let mut buf = Vec::new();
        write_slots(&mut buf, &slots).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.starts_with("slot,kind,title,x,y,vehicle_type,year,month\n"));
        for idx in 0..4 {
            assert!(text.lines().any(|l| l.starts_with(&format!("{idx},"))));
        }
        assert!(text.contains("scatter"));
        assert!(text.contains("9.5000,80.0000,Sports,2009,1"));
    }

    #[test]
    fn fields_with_commas_are_quoted() {
        assert_eq!(csv_quote("plain"), "plain");
        assert_eq!(csv_quote("a,b"), "\"a,b\"");
        assert_eq!(csv_quote("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
