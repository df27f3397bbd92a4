pub mod config;
pub mod error;
pub mod executor;
pub mod instructions;
pub mod schema;

pub use error::MigrationError;
