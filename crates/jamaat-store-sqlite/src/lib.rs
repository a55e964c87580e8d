//! SQLite backend for the Jamaat genealogy store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Each store call runs one engine
//! operation inside one SQLite transaction.

mod encode;
mod repository;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use repository::SqliteRepository;
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
