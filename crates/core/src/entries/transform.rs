use crate::storage::{Result, SourceError};

use super::lookup::trim_text;
use super::{Entry, Row};

/// Converts raw sheet rows into entries.
///
/// Row 0 is the header; its cells are trimmed and used as field names. The
/// remaining rows become entries in reverse order, so the last sheet row is
/// the first entry. A header-only sheet yields an empty list.
///
/// # Errors
///
/// Returns [`SourceError::EmptySheet`] when there is no header row.
pub fn rows_to_entries(rows: &[Row]) -> Result<Vec<Entry>> {
    let Some((header, data)) = rows.split_first() else {
        return Err(SourceError::EmptySheet);
    };

    let headers: Vec<&str> = header.iter().map(|cell| trim_text(cell)).collect();

    Ok(data
        .iter()
        .rev()
        .map(|row| Entry::from_row(&headers, row))
        .collect())
}
