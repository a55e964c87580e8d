//! The `GenealogyRepository` trait: row-level persistence for the engine.
//!
//! Engine operations in `jamaat-genealogy` are written against this trait and
//! run synchronously. A backend hands the engine a repository bound to one
//! open transaction, so every operation commits or rolls back as a whole.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
  Result,
  genealogy::{
    Family, FamilyChild, FamilyChildId, FamilyId, Individual, IndividualId,
    NewFamilyChild, PersonIndividualLink, Sequence,
  },
  person::Person,
};

pub trait GenealogyRepository {
  // ── Persons (read-only) ───────────────────────────────────────────────

  fn person(&self, id: Uuid) -> Result<Option<Person>>;

  /// Exact, case-sensitive email match.
  fn person_by_email(&self, email: &str) -> Result<Option<Person>>;

  /// Exact first name, last name and date of birth match. `None` fields
  /// match only stored `NULL`s.
  fn person_by_name_and_birth_date(
    &self,
    first_name: &str,
    last_name: Option<&str>,
    date_of_birth: Option<NaiveDate>,
  ) -> Result<Option<Person>>;

  fn persons(&self) -> Result<Vec<Person>>;

  // ── Person ↔ individual links ─────────────────────────────────────────

  fn link_for_person(&self, person_id: Uuid) -> Result<Option<PersonIndividualLink>>;

  fn link_for_individual(
    &self,
    individual_id: &IndividualId,
  ) -> Result<Option<PersonIndividualLink>>;

  fn insert_link(&mut self, link: &PersonIndividualLink) -> Result<()>;

  // ── Individuals ───────────────────────────────────────────────────────

  fn individual(&self, id: &IndividualId) -> Result<Option<Individual>>;

  fn individuals(&self) -> Result<Vec<Individual>>;

  fn insert_individual(&mut self, individual: &Individual) -> Result<()>;

  // ── Families ──────────────────────────────────────────────────────────

  fn family(&self, id: &FamilyId) -> Result<Option<Family>>;

  fn families(&self) -> Result<Vec<Family>>;

  /// Families in which `id` occupies either spouse slot, ordered by id.
  fn families_by_spouse(&self, id: &IndividualId) -> Result<Vec<Family>>;

  /// Families whose spouse pair is exactly `{a, b}` in either order.
  fn families_by_spouses(
    &self,
    a: &IndividualId,
    b: &IndividualId,
  ) -> Result<Vec<Family>>;

  /// Insert or overwrite a family.
  fn save_family(&mut self, family: &Family) -> Result<()>;

  fn delete_family(&mut self, id: &FamilyId) -> Result<()>;

  // ── Family children ───────────────────────────────────────────────────

  fn family_child(&self, id: FamilyChildId) -> Result<Option<FamilyChild>>;

  /// Edges of one family, ordered by edge id.
  fn children_of_family(&self, id: &FamilyId) -> Result<Vec<FamilyChild>>;

  /// Edges pointing at one child, ordered by edge id.
  fn families_of_child(&self, id: &IndividualId) -> Result<Vec<FamilyChild>>;

  fn family_child_by_pair(
    &self,
    family_id: &FamilyId,
    child_id: &IndividualId,
  ) -> Result<Option<FamilyChild>>;

  fn family_children(&self) -> Result<Vec<FamilyChild>>;

  fn insert_family_child(&mut self, edge: NewFamilyChild) -> Result<FamilyChild>;

  fn delete_family_child(&mut self, id: FamilyChildId) -> Result<()>;

  // ── Id allocation ─────────────────────────────────────────────────────

  /// Atomically advance a named counter and return its new value.
  fn next_in_sequence(&mut self, sequence: Sequence) -> Result<u64>;
}
