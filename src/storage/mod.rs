//! SQLite storage module for the selection database
//!
//! Provides persistent storage for candidates and the Fibonacci test
//! records generated for them, plus the reporting and cleanup queries.

pub mod error;
pub mod repository;
pub mod schema;

pub use error::{Result, StorageError};
pub use repository::{Candidate, ParityCounts, SelectionRepository};
pub use schema::create_tables;
