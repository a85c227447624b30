//! Row sources and the cached entry repository.
//!
//! - `sheets`: Google Sheets v4 source authenticated with an OAuth2 refresh token
//! - `inmemory`: fixed rows, used for demo mode and tests
//! - `cached`: `EntryRepository` that keeps the last fetch for a fixed TTL

pub mod cached;
pub mod inmemory;
pub mod sheets;

pub use cached::CachedEntryRepository;
pub use inmemory::InMemoryRowSource;
pub use sheets::SheetsRowSource;
