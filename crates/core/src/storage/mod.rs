mod error;
mod traits;

pub use error::{Result, SourceError};
pub use traits::{EntryRepository, RowSource};
