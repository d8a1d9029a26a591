// src/fmp/mod.rs
pub mod client;
pub mod models;
