//! Error types for `jamaat-core`.
//!
//! Every failure maps onto one of four [`ErrorKind`]s so that transport layers
//! can pick a status code without knowing which backend produced it.

use thiserror::Error;
use uuid::Uuid;

use crate::{
  genealogy::{FamilyChildId, FamilyId, IndividualId},
  relationship::RelationshipHandle,
};

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// A person, individual, family or relationship id did not resolve.
  NotFound,
  /// The caller supplied something malformed or underspecified.
  InvalidArgument,
  /// The request is well-formed but would break a graph invariant.
  Conflict,
  /// Storage or other backend failure.
  Internal,
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("person not found: {0}")]
  PersonNotFound(Uuid),

  #[error("individual not found: {0}")]
  IndividualNotFound(IndividualId),

  #[error("family not found: {0}")]
  FamilyNotFound(FamilyId),

  #[error("relationship not found: {0}")]
  RelationshipNotFound(RelationshipHandle),

  #[error("unknown relationship type: {0:?}")]
  UnknownRelationshipKind(String),

  #[error("person {0} cannot be related to themselves")]
  SelfRelationship(Uuid),

  #[error("invalid identifier: {0:?}")]
  InvalidIdentifier(String),

  #[error("individual {parent} belongs to several unions ({}); pass a family id", join_ids(.candidates))]
  AmbiguousUnion {
    parent:     IndividualId,
    candidates: Vec<FamilyId>,
  },

  #[error("individual {individual} is not a spouse in family {family}")]
  NotASpouse {
    individual: IndividualId,
    family:     FamilyId,
  },

  #[error("child {child} is already linked to family {family} (edge {edge})")]
  DuplicateChild {
    family: FamilyId,
    child:  IndividualId,
    edge:   FamilyChildId,
  },

  #[error("family {0} has children; remove them first")]
  FamilyHasChildren(FamilyId),

  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::PersonNotFound(_)
      | Self::IndividualNotFound(_)
      | Self::FamilyNotFound(_)
      | Self::RelationshipNotFound(_) => ErrorKind::NotFound,
      Self::UnknownRelationshipKind(_)
      | Self::InvalidIdentifier(_)
      | Self::SelfRelationship(_)
      | Self::AmbiguousUnion { .. }
      | Self::NotASpouse { .. } => ErrorKind::InvalidArgument,
      Self::DuplicateChild { .. } | Self::FamilyHasChildren(_) => {
        ErrorKind::Conflict
      }
      Self::Storage(_) => ErrorKind::Internal,
    }
  }

  /// Wrap an arbitrary backend error.
  pub fn storage(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Storage(Box::new(e))
  }
}

fn join_ids(ids: &[FamilyId]) -> String {
  ids.iter().map(FamilyId::as_str).collect::<Vec<_>>().join(", ")
}

/// Implemented by every [`GenealogyStore`](crate::store::GenealogyStore)
/// error type so callers can classify failures generically.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn kind(&self) -> ErrorKind;
}

impl StoreError for Error {
  fn kind(&self) -> ErrorKind { Error::kind(self) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
