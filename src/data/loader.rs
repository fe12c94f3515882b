//! CSV decode, type coercion, and column defaulting.
//!
//! This module turns the raw sales CSV into a clean `Dataset`:
//!
//! - **Strict schema** for the three required columns (Year, Month, Recession)
//! - **Silent defaulting** for the optional ones (sales, vehicle type,
//!   advertising expenditure, unemployment rate)
//! - **Deterministic behavior**: row order is preserved, no hidden randomness
//! - **Separation of concerns**: no aggregation logic here

use std::collections::HashMap;

use csv::StringRecord;

use crate::domain::{Dataset, SalesRecord};
use crate::error::AppError;

const COL_YEAR: &str = "year";
const COL_MONTH: &str = "month";
const COL_RECESSION: &str = "recession";
const COL_SALES: &str = "automobile_sales";
const COL_VEHICLE_TYPE: &str = "vehicle_type";
const COL_AD_EXPENDITURE: &str = "advertising_expenditure";
const COL_UNEMPLOYMENT: &str = "unemployment_rate";

const DEFAULT_VEHICLE_TYPE: &str = "Unknown";

/// Decode and clean the CSV bytes into a `Dataset`.
///
/// Required columns missing from the header or an undecodable CSV are fatal;
/// individually bad cells are coerced to their defaults instead.
pub fn load_dataset(bytes: &[u8]) -> Result<Dataset, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| AppError::runtime(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map)?;

    let mut records = Vec::new();
    for result in reader.records() {
        let record =
            result.map_err(|e| AppError::runtime(format!("Failed to decode CSV row: {e}")))?;
        records.push(clean_row(&record, &header_map));
    }

    if records.is_empty() {
        return Err(AppError::empty_data("Dataset contains no rows."));
    }

    Ok(Dataset::from_records(records))
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header (e.g. "﻿Year"). If we don't strip it, schema validation
    // will incorrectly report missing columns.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    for col in [COL_YEAR, COL_MONTH, COL_RECESSION] {
        if !header_map.contains_key(col) {
            return Err(AppError::usage(format!("Missing required column: `{col}`")));
        }
    }
    Ok(())
}

/// Coerce one CSV row into a `SalesRecord`, applying column defaults.
fn clean_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> SalesRecord {
    let year = get_field(record, header_map, COL_YEAR).and_then(parse_opt_i32);
    let month = get_field(record, header_map, COL_MONTH)
        .unwrap_or_default()
        .to_string();

    // Recession is stored 0/1 in the source; anything unparsable counts as
    // "not a recession" rather than poisoning the row.
    let recession = get_field(record, header_map, COL_RECESSION)
        .and_then(parse_opt_f64)
        .map(|v| v as i64 == 1)
        .unwrap_or(false);

    let sales = get_field(record, header_map, COL_SALES)
        .and_then(parse_opt_f64)
        .unwrap_or(0.0);

    let vehicle_type = match get_field(record, header_map, COL_VEHICLE_TYPE) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => DEFAULT_VEHICLE_TYPE.to_string(),
    };

    let ad_expenditure = get_field(record, header_map, COL_AD_EXPENDITURE)
        .and_then(parse_opt_f64)
        .unwrap_or(0.0);

    let unemployment_rate = get_field(record, header_map, COL_UNEMPLOYMENT).and_then(parse_opt_f64);

    SalesRecord {
        year,
        month,
        recession,
        sales,
        vehicle_type,
        ad_expenditure,
        unemployment_rate,
    }
}

fn get_field<'r>(
    record: &'r StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Option<&'r str> {
    header_map
        .get(name)
        .and_then(|&idx| record.get(idx))
        .map(str::trim)
}

fn parse_opt_f64(raw: &str) -> Option<f64> {
    if raw.is_empty() {
        return None;
    }
    let v = raw.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

fn parse_opt_i32(raw: &str) -> Option<i32> {
    if raw.is_empty() {
        return None;
    }
    // Some exports write years as floats ("2019.0"); accept those too.
    if let Ok(v) = raw.parse::<i32>() {
        return Some(v);
    }
    let v = raw.parse::<f64>().ok()?;
    if v.is_finite() && v.fract() == 0.0 {
        Some(v as i32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_CSV: &str = "\
Year,Month,Recession,Automobile_Sales,Vehicle_Type,Advertising_Expenditure,unemployment_rate
2019,1,0,100.5,Supperminicar,12.0,4.5
2019,2,1,200.0,Mediumfamilycar,8.0,
bad,3,x,,,,
";

    #[test]
    fn loads_and_coerces_all_columns() {
        let ds = load_dataset(FULL_CSV.as_bytes()).unwrap();
        assert_eq!(ds.len(), 3);

        let r0 = &ds.records()[0];
        assert_eq!(r0.year, Some(2019));
        assert_eq!(r0.month, "1");
        assert!(!r0.recession);
        assert_eq!(r0.sales, 100.5);
        assert_eq!(r0.vehicle_type, "Supperminicar");
        assert_eq!(r0.ad_expenditure, 12.0);
        assert_eq!(r0.unemployment_rate, Some(4.5));

        let r1 = &ds.records()[1];
        assert!(r1.recession);
        assert_eq!(r1.unemployment_rate, None);

        // Bad cells coerce to defaults rather than failing the load.
        let r2 = &ds.records()[2];
        assert_eq!(r2.year, None);
        assert!(!r2.recession);
        assert_eq!(r2.sales, 0.0);
        assert_eq!(r2.vehicle_type, "Unknown");
        assert_eq!(r2.ad_expenditure, 0.0);
        assert_eq!(r2.unemployment_rate, None);
    }

    #[test]
    fn missing_optional_columns_are_synthesized() {
        let csv = "Year,Month,Recession\n2020,Jan,1\n2021,Feb,0\n";
        let ds = load_dataset(csv.as_bytes()).unwrap();
        for r in ds.records() {
            assert_eq!(r.sales, 0.0);
            assert_eq!(r.vehicle_type, "Unknown");
            assert_eq!(r.ad_expenditure, 0.0);
            assert_eq!(r.unemployment_rate, None);
        }
    }

    #[test]
    fn missing_required_column_is_fatal() {
        let csv = "Year,Automobile_Sales\n2020,10\n";
        let err = load_dataset(csv.as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn empty_table_is_rejected() {
        let csv = "Year,Month,Recession\n";
        let err = load_dataset(csv.as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn header_match_is_case_insensitive_and_bom_safe() {
        let csv = "\u{feff}YEAR,month,RECESSION\n2020,Jan,1\n";
        let ds = load_dataset(csv.as_bytes()).unwrap();
        assert_eq!(ds.records()[0].year, Some(2020));
        assert!(ds.records()[0].recession);
    }

    #[test]
    fn float_years_are_accepted() {
        let csv = "Year,Month,Recession\n2020.0,Jan,0\n";
        let ds = load_dataset(csv.as_bytes()).unwrap();
        assert_eq!(ds.records()[0].year, Some(2020));
    }
}
