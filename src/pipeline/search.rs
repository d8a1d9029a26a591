// src/pipeline/search.rs
use crate::fmp::models::IncomeRecord;

/// Fixed number of rows per displayed page.
pub const PAGE_SIZE: usize = 10;

/// Substring search across every displayed field. An empty query passes
/// the input through unchanged; otherwise a record is retained when any
/// field's string form contains the query, case-insensitively.
pub fn search(records: &[IncomeRecord], query: &str) -> Vec<IncomeRecord> {
    if query.is_empty() {
        return records.to_vec();
    }
    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|record| record.matches(&needle))
        .cloned()
        .collect()
}

/// Number of pages needed for `count` records; always at least 1 so an
/// empty result still renders page 1 of 1.
pub fn total_pages(count: usize) -> usize {
    std::cmp::max(1, count.div_ceil(PAGE_SIZE))
}

/// The contiguous slice for a 1-based page number. Pages past the end
/// come back empty rather than panicking; callers reject out-of-range
/// navigation before getting here.
pub fn page_slice(records: &[IncomeRecord], page: usize) -> &[IncomeRecord] {
    let start = page.saturating_sub(1) * PAGE_SIZE;
    if start >= records.len() {
        return &[];
    }
    let end = (start + PAGE_SIZE).min(records.len());
    &records[start..end]
}
