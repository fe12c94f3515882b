//! Pure aggregation functions over the sales table.
//!
//! Everything here is a deterministic function of `(&Dataset, parameters)`:
//! no caching, no ambient state, so re-running an aggregation always yields
//! identical results. Grouping preserves encounter order unless a function
//! documents its own ordering.

use std::collections::HashMap;

use crate::domain::Dataset;

/// A grouped aggregation result: one `(label, value)` pair per group.
pub type Series = Vec<(String, f64)>;

/// One point of the unemployment-vs-sales cloud.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub unemployment_rate: f64,
    pub sales: f64,
    pub vehicle_type: String,
    pub year: Option<i32>,
    pub month: String,
}

/// Mean sales per year over the whole table, year ascending.
pub fn yearly_average_sales(dataset: &Dataset) -> Series {
    let mut series = group_mean(
        dataset
            .records()
            .iter()
            .filter_map(|r| r.year.map(|y| (y.to_string(), r.sales))),
    );
    sort_numeric(&mut series);
    series
}

/// Total sales per month for one year.
///
/// If every month label is a numeric string the series is sorted by that
/// number; otherwise the source's encounter order is kept. Non-chronological
/// output for non-numeric labels is existing behavior, preserved as-is.
pub fn monthly_total_sales(dataset: &Dataset, year: i32) -> Series {
    let mut series = group_sum(
        dataset
            .records()
            .iter()
            .filter(|r| r.year == Some(year))
            .map(|r| (r.month.clone(), r.sales)),
    );
    if series.iter().all(|(label, _)| label.parse::<i64>().is_ok()) {
        sort_numeric(&mut series);
    }
    series
}

/// Mean sales per vehicle type for one year.
pub fn average_sales_by_type(dataset: &Dataset, year: i32) -> Series {
    group_mean(
        dataset
            .records()
            .iter()
            .filter(|r| r.year == Some(year))
            .map(|r| (r.vehicle_type.clone(), r.sales)),
    )
}

/// Total advertising expenditure per vehicle type for one year.
pub fn ad_expenditure_by_type(dataset: &Dataset, year: i32) -> Series {
    group_sum(
        dataset
            .records()
            .iter()
            .filter(|r| r.year == Some(year))
            .map(|r| (r.vehicle_type.clone(), r.ad_expenditure)),
    )
}

/// Mean sales per year across recession-flagged rows, year ascending.
pub fn recession_yearly_average_sales(dataset: &Dataset) -> Series {
    let mut series = group_mean(
        dataset
            .records()
            .iter()
            .filter(|r| r.recession)
            .filter_map(|r| r.year.map(|y| (y.to_string(), r.sales))),
    );
    sort_numeric(&mut series);
    series
}

/// Mean sales per vehicle type across recession-flagged rows.
pub fn recession_average_sales_by_type(dataset: &Dataset) -> Series {
    group_mean(
        dataset
            .records()
            .iter()
            .filter(|r| r.recession)
            .map(|r| (r.vehicle_type.clone(), r.sales)),
    )
}

/// Total advertising expenditure per vehicle type across recession rows.
pub fn recession_ad_expenditure_by_type(dataset: &Dataset) -> Series {
    group_sum(
        dataset
            .records()
            .iter()
            .filter(|r| r.recession)
            .map(|r| (r.vehicle_type.clone(), r.ad_expenditure)),
    )
}

/// Per-record unemployment-vs-sales tuples for recession rows with a known
/// unemployment rate. No grouping; each row becomes one scatter point.
pub fn recession_unemployment_points(dataset: &Dataset) -> Vec<ScatterPoint> {
    dataset
        .records()
        .iter()
        .filter(|r| r.recession)
        .filter_map(|r| {
            r.unemployment_rate.map(|rate| ScatterPoint {
                unemployment_rate: rate,
                sales: r.sales,
                vehicle_type: r.vehicle_type.clone(),
                year: r.year,
                month: r.month.clone(),
            })
        })
        .collect()
}

/// Group `(label, value)` pairs and sum per label, encounter order.
fn group_sum(pairs: impl Iterator<Item = (String, f64)>) -> Series {
    let mut order: Vec<String> = Vec::new();
    let mut sums: HashMap<String, f64> = HashMap::new();
    for (label, value) in pairs {
        if !sums.contains_key(&label) {
            order.push(label.clone());
        }
        *sums.entry(label).or_insert(0.0) += value;
    }
    order
        .into_iter()
        .map(|label| {
            let total = sums[&label];
            (label, total)
        })
        .collect()
}

/// Group `(label, value)` pairs and average per label, encounter order.
fn group_mean(pairs: impl Iterator<Item = (String, f64)>) -> Series {
    let mut order: Vec<String> = Vec::new();
    let mut acc: HashMap<String, (f64, usize)> = HashMap::new();
    for (label, value) in pairs {
        if !acc.contains_key(&label) {
            order.push(label.clone());
        }
        let entry = acc.entry(label).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }
    order
        .into_iter()
        .map(|label| {
            let (sum, count) = acc[&label];
            (label, sum / count as f64)
        })
        .collect()
}

/// Sort a series by the numeric value of its labels. Callers only use this
/// when every label is known to parse.
fn sort_numeric(series: &mut Series) {
    series.sort_by_key(|(label, _)| label.parse::<i64>().unwrap_or(i64::MAX));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SalesRecord;

    fn row(
        year: Option<i32>,
        month: &str,
        recession: bool,
        sales: f64,
        vehicle_type: &str,
        ad: f64,
        unemployment: Option<f64>,
    ) -> SalesRecord {
        SalesRecord {
            year,
            month: month.to_string(),
            recession,
            sales,
            vehicle_type: vehicle_type.to_string(),
            ad_expenditure: ad,
            unemployment_rate: unemployment,
        }
    }

    #[test]
    fn yearly_average_is_mean_per_year_ascending() {
        let ds = Dataset::from_records(vec![
            row(Some(2020), "1", false, 300.0, "A", 0.0, None),
            row(Some(2019), "1", false, 100.0, "A", 0.0, None),
            row(Some(2019), "2", false, 200.0, "A", 0.0, None),
            row(None, "3", false, 999.0, "A", 0.0, None),
        ]);
        let series = yearly_average_sales(&ds);
        assert_eq!(
            series,
            vec![("2019".to_string(), 150.0), ("2020".to_string(), 300.0)]
        );
    }

    #[test]
    fn monthly_totals_sort_numerically() {
        let ds = Dataset::from_records(vec![
            row(Some(2019), "2", false, 200.0, "A", 0.0, None),
            row(Some(2019), "1", false, 100.0, "A", 0.0, None),
            row(Some(2018), "1", false, 999.0, "A", 0.0, None),
        ]);
        let series = monthly_total_sales(&ds, 2019);
        assert_eq!(
            series,
            vec![("1".to_string(), 100.0), ("2".to_string(), 200.0)]
        );
    }

    #[test]
    fn monthly_totals_keep_encounter_order_for_names() {
        let ds = Dataset::from_records(vec![
            row(Some(2019), "Mar", false, 30.0, "A", 0.0, None),
            row(Some(2019), "Jan", false, 10.0, "A", 0.0, None),
            row(Some(2019), "Mar", false, 5.0, "A", 0.0, None),
        ]);
        let series = monthly_total_sales(&ds, 2019);
        assert_eq!(
            series,
            vec![("Mar".to_string(), 35.0), ("Jan".to_string(), 10.0)]
        );
    }

    #[test]
    fn average_sales_by_type_means_each_subgroup() {
        let ds = Dataset::from_records(vec![
            row(Some(2019), "1", false, 100.0, "Sports", 0.0, None),
            row(Some(2019), "2", false, 300.0, "Sports", 0.0, None),
            row(Some(2019), "1", false, 50.0, "Executive", 0.0, None),
            row(Some(2020), "1", false, 999.0, "Sports", 0.0, None),
        ]);
        let series = average_sales_by_type(&ds, 2019);
        assert_eq!(
            series,
            vec![
                ("Sports".to_string(), 200.0),
                ("Executive".to_string(), 50.0)
            ]
        );
    }

    #[test]
    fn recession_ad_expenditure_sums_per_type() {
        let ds = Dataset::from_records(vec![
            row(Some(2020), "1", true, 50.0, "B", 10.0, None),
            row(Some(2020), "1", true, 150.0, "C", 30.0, None),
        ]);
        let series = recession_ad_expenditure_by_type(&ds);
        assert_eq!(
            series,
            vec![("B".to_string(), 10.0), ("C".to_string(), 30.0)]
        );
    }

    #[test]
    fn recession_aggregations_are_empty_without_recession_rows() {
        let ds = Dataset::from_records(vec![
            row(Some(2019), "1", false, 100.0, "A", 5.0, Some(4.0)),
            row(Some(2020), "2", false, 200.0, "B", 6.0, Some(5.0)),
        ]);
        assert!(recession_yearly_average_sales(&ds).is_empty());
        assert!(recession_average_sales_by_type(&ds).is_empty());
        assert!(recession_ad_expenditure_by_type(&ds).is_empty());
        assert!(recession_unemployment_points(&ds).is_empty());
    }

    #[test]
    fn unemployment_points_skip_null_rates() {
        let ds = Dataset::from_records(vec![
            row(Some(2009), "1", true, 80.0, "Sports", 0.0, Some(9.5)),
            row(Some(2009), "2", true, 70.0, "Sports", 0.0, None),
        ]);
        let points = recession_unemployment_points(&ds);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].unemployment_rate, 9.5);
        assert_eq!(points[0].sales, 80.0);
        assert_eq!(points[0].year, Some(2009));
        assert_eq!(points[0].month, "1");
    }

    #[test]
    fn aggregation_is_deterministic() {
        let ds = Dataset::from_records(vec![
            row(Some(2019), "1", true, 100.0, "A", 5.0, Some(4.0)),
            row(Some(2019), "2", false, 200.0, "B", 6.0, Some(5.0)),
            row(Some(2020), "1", true, 300.0, "A", 7.0, None),
        ]);
        assert_eq!(yearly_average_sales(&ds), yearly_average_sales(&ds));
        assert_eq!(monthly_total_sales(&ds, 2019), monthly_total_sales(&ds, 2019));
        assert_eq!(
            recession_unemployment_points(&ds),
            recession_unemployment_points(&ds)
        );
    }
}
