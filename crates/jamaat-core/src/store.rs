//! The `GenealogyStore` trait: the surface exposed to the REST layer and the
//! bulk-import service.
//!
//! Implemented by storage backends (e.g. `jamaat-store-sqlite`). Every write
//! method runs in one transaction; every read method sees one consistent
//! snapshot.

use std::future::Future;

use uuid::Uuid;

use crate::{
  error::StoreError,
  genealogy::FamilyId,
  graph::GenealogyGraph,
  household::{HouseholdOutcome, ImportReport, ImportRow},
  person::{NewPerson, Person},
  relationship::{Relationship, RelationshipHandle, RelationshipKind},
  stats::GenealogyStats,
};

/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait GenealogyStore: Send + Sync {
  type Error: StoreError;

  // ── Persons ───────────────────────────────────────────────────────────

  fn add_person(
    &self,
    input: NewPerson,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  fn get_person(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  fn list_persons(
    &self,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  // ── Relationships ─────────────────────────────────────────────────────

  /// Record that `related_id` is the `kind` of `person_id`, e.g. with
  /// [`RelationshipKind::Father`], `related_id` becomes the father.
  ///
  /// `family` disambiguates which union receives a child when the parent
  /// has several; it is ignored for other kinds.
  fn add_relationship(
    &self,
    person_id: Uuid,
    related_id: Uuid,
    kind: RelationshipKind,
    family: Option<FamilyId>,
  ) -> impl Future<Output = Result<Relationship, Self::Error>> + Send + '_;

  /// Delete a parent/child edge, or a childless spouse family.
  fn remove_relationship(
    &self,
    handle: RelationshipHandle,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn list_relationships(
    &self,
    person_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Relationship>, Self::Error>> + Send + '_;

  // ── Graphs ────────────────────────────────────────────────────────────

  /// Everything reachable from one person: ancestors, descendants, spouses
  /// and siblings.
  fn ego_graph(
    &self,
    person_id: Uuid,
  ) -> impl Future<Output = Result<GenealogyGraph, Self::Error>> + Send + '_;

  /// Every stored individual and family.
  fn complete_graph(
    &self,
  ) -> impl Future<Output = Result<GenealogyGraph, Self::Error>> + Send + '_;

  // ── Import ────────────────────────────────────────────────────────────

  /// Infer and commit the family structure of one household.
  fn infer_household(
    &self,
    household_key: String,
    rows: Vec<ImportRow>,
  ) -> impl Future<Output = Result<HouseholdOutcome, Self::Error>> + Send + '_;

  /// Group `rows` by household key and infer each group independently. A
  /// failing household never aborts the batch.
  fn import_households(
    &self,
    rows: Vec<ImportRow>,
  ) -> impl Future<Output = Result<ImportReport, Self::Error>> + Send + '_;

  // ── Statistics ────────────────────────────────────────────────────────

  fn statistics(
    &self,
  ) -> impl Future<Output = Result<GenealogyStats, Self::Error>> + Send + '_;
}
