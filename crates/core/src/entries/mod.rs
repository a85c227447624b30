//! Spreadsheet entries: the keyed records built from sheet rows.

mod error;
mod lookup;
mod transform;
mod types;

pub use error::QueryError;
pub use lookup::{find_by_code, normalize_code};
pub use transform::rows_to_entries;
pub use types::{Entry, EntryList, Row, CODE_FIELD, GREETING_FIELD, TIMESTAMP_FIELD};
