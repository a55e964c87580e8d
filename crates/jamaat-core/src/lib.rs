//! Core types and trait definitions for the Jamaat genealogy service.
//!
//! This crate is free of HTTP and database dependencies. The engine, the
//! storage backends and the API all depend on it.

pub mod error;
pub mod genealogy;
pub mod graph;
pub mod household;
pub mod person;
pub mod relationship;
pub mod repository;
pub mod stats;
pub mod store;

pub use error::{Error, ErrorKind, Result, StoreError};
