// src/pipeline/filter.rs
use crate::fmp::models::IncomeRecord;
use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// User-chosen inclusive bounds narrowing the visible record set.
///
/// A `None` bound means "no limit" on that side. `min <= max` is not
/// enforced; out-of-order bounds simply match nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub start_year: i32,
    pub end_year: i32,
    pub revenue_min: Option<f64>,
    pub revenue_max: Option<f64>,
    pub net_income_min: Option<f64>,
    pub net_income_max: Option<f64>,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            start_year: 2010,
            end_year: chrono::Utc::now().year(),
            revenue_min: Some(0.0),
            revenue_max: None,
            net_income_min: None,
            net_income_max: None,
        }
    }
}

fn within(value: f64, min: Option<f64>, max: Option<f64>) -> bool {
    min.map_or(true, |m| value >= m) && max.map_or(true, |m| value <= m)
}

/// Retains the records whose year, revenue and net income all fall
/// within the spec's inclusive bounds. Order-preserving. Records whose
/// date fails to parse are excluded, matching the upstream behavior of
/// a NaN year comparison.
pub fn filter(records: &[IncomeRecord], spec: &FilterSpec) -> Vec<IncomeRecord> {
    records
        .iter()
        .filter(|record| {
            let year = match record.year() {
                Some(year) => year,
                None => return false,
            };
            year >= spec.start_year
                && year <= spec.end_year
                && within(record.revenue, spec.revenue_min, spec.revenue_max)
                && within(record.net_income, spec.net_income_min, spec.net_income_max)
        })
        .cloned()
        .collect()
}
