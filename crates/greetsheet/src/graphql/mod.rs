//! GraphQL schema over the sheet entries.

mod resolvers;
mod schema;

pub use schema::{create_schema, Context, Schema};
