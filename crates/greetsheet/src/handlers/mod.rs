pub mod error;
pub mod graphql;
pub mod health;

pub use error::AppError;
