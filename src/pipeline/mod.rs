// src/pipeline/mod.rs
//
// Pure transforms over the fetched record set. Each stage takes a
// slice and returns a new vector; nothing here errors or touches I/O.
pub mod filter;
pub mod search;
pub mod sort;

pub use filter::FilterSpec;
pub use sort::{SortField, SortSpec};
