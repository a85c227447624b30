//! Query implementations behind the GraphQL fields.
//!
//! Each function reads the current entry list from the repository and runs a
//! lookup on it. A code without a matching entry is a normal answer, never an
//! error.

use greetsheet_core::entries::{find_by_code, QueryError};
use greetsheet_core::storage::EntryRepository;

fn require_code(code: Option<&str>) -> Result<&str, QueryError> {
    code.ok_or_else(|| QueryError::InvalidInput("Argument \"code\" is required".to_string()))
}

/// Returns true if `code` belongs to an entry that has not been redeemed.
pub async fn is_valid_code(
    repo: &dyn EntryRepository,
    code: Option<&str>,
) -> Result<bool, QueryError> {
    let code = require_code(code)?;
    let entries = repo.get_entries(false).await?;

    let valid = find_by_code(&entries, code).is_some_and(|entry| !entry.is_redeemed());
    tracing::debug!(code, valid, "Checked code");
    Ok(valid)
}

/// Returns the greeting stored for `code`.
///
/// An unknown code yields an empty string. A known code whose row has no
/// greeting cell yields `None`.
pub async fn greeting(
    repo: &dyn EntryRepository,
    code: Option<&str>,
) -> Result<Option<String>, QueryError> {
    let code = require_code(code)?;
    let entries = repo.get_entries(false).await?;

    Ok(match find_by_code(&entries, code) {
        Some(entry) => entry.greeting().map(str::to_string),
        None => Some(String::new()),
    })
}
