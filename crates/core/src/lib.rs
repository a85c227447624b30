//! Functional core for greetsheet.
//!
//! Holds the data model for spreadsheet rows, the row to entry transform, code
//! lookups and the entry cache. Nothing in here performs I/O: row sources and
//! the HTTP server live in the `greetsheet` crate.

pub mod cache;
pub mod entries;
pub mod storage;
