//! Google Sheets row source.
//!
//! Reads one A1 range through the Sheets v4 `values.get` endpoint. Requests
//! carry a bearer token that is refreshed through Google's OAuth2 token
//! endpoint whenever it is missing, about to expire or rejected.

mod client;
mod error;
mod token;

#[cfg(test)]
mod test_server;

pub use client::SheetsRowSource;
