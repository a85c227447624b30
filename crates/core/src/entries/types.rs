use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

/// Column holding the lookup code.
pub const CODE_FIELD: &str = "code";

/// Column that gets filled in once a code has been redeemed.
pub const TIMESTAMP_FIELD: &str = "Timestamp";

/// Column holding the greeting shown for a code.
pub const GREETING_FIELD: &str = "begruessung";

/// A single spreadsheet row, cells in column order.
pub type Row = Vec<String>;

/// Entries built from one fetch, last sheet row first.
///
/// Shared behind an `Arc` so the cache and every caller see the same list.
pub type EntryList = Arc<Vec<Entry>>;

/// One data row keyed by the (trimmed) header names.
///
/// Every header gets a key. Cells missing from a short row are stored as
/// `None` so an absent value is explicit rather than an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Entry {
    fields: BTreeMap<String, Option<String>>,
}

impl Entry {
    /// Builds an entry by pairing each header with the cell at the same index.
    ///
    /// When two headers share a name the later column wins.
    pub fn from_row(headers: &[&str], row: &[String]) -> Self {
        let fields = headers
            .iter()
            .enumerate()
            .map(|(i, header)| ((*header).to_string(), row.get(i).cloned()))
            .collect();

        Self { fields }
    }

    /// Sets a field, replacing any previous value.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(field.into(), Some(value.into()));
        self
    }

    /// Returns the value of a field, `None` when the column or the cell is absent.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(|value| value.as_deref())
    }

    pub fn code(&self) -> Option<&str> {
        self.get(CODE_FIELD)
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.get(TIMESTAMP_FIELD)
    }

    pub fn greeting(&self) -> Option<&str> {
        self.get(GREETING_FIELD)
    }

    /// A code counts as redeemed once its timestamp cell holds any text.
    pub fn is_redeemed(&self) -> bool {
        self.timestamp().is_some_and(|timestamp| !timestamp.is_empty())
    }
}
