// src/pipeline/sort.rs
use crate::fmp::models::IncomeRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// The columns a user can order by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortField {
    Date,
    Revenue,
    NetIncome,
    OperatingIncome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Active ordering. `None` at the call sites means insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: Direction,
}

/// Toggle rule for a header click: the same field flips direction,
/// a new field always starts ascending.
pub fn toggle(current: Option<SortSpec>, field: SortField) -> SortSpec {
    match current {
        Some(spec) if spec.field == field && spec.direction == Direction::Ascending => SortSpec {
            field,
            direction: Direction::Descending,
        },
        _ => SortSpec {
            field,
            direction: Direction::Ascending,
        },
    }
}

fn compare(a: &IncomeRecord, b: &IncomeRecord, field: SortField) -> Ordering {
    match field {
        // ISO 8601 dates sort lexicographically equal to chronologically.
        SortField::Date => a.date.cmp(&b.date),
        SortField::Revenue => a.revenue.total_cmp(&b.revenue),
        SortField::NetIncome => a.net_income.total_cmp(&b.net_income),
        SortField::OperatingIncome => a.operating_income.total_cmp(&b.operating_income),
    }
}

/// Returns a new sequence ordered by the spec, or the input order when
/// spec is `None`. The sort is stable, and descending inverts the
/// comparator rather than reversing the result, so ties keep their
/// original relative position in both directions.
pub fn sort(records: &[IncomeRecord], spec: Option<&SortSpec>) -> Vec<IncomeRecord> {
    let mut sorted = records.to_vec();
    if let Some(spec) = spec {
        sorted.sort_by(|a, b| match spec.direction {
            Direction::Ascending => compare(a, b, spec.field),
            Direction::Descending => compare(b, a, spec.field),
        });
    }
    sorted
}
