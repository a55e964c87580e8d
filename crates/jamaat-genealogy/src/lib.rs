//! The genealogy engine.
//!
//! Every operation here is synchronous and written against
//! [`GenealogyRepository`](jamaat_core::repository::GenealogyRepository).
//! Backends run each call inside one transaction; the engine itself holds no
//! state between calls.
//!
//! - [`identity`] maps CRM persons onto genealogy individuals.
//! - [`mutation`] adds, removes and lists typed relationships.
//! - [`graph`] renders the Individual/Family structure as a node/edge graph.
//! - [`inference`] derives family structure from import households.
//! - [`stats`] computes dashboard aggregates.

pub mod graph;
pub mod identity;
pub mod inference;
pub mod memory;
pub mod mutation;
pub mod stats;

pub use memory::MemoryRepository;

#[cfg(test)]
mod testing;
