//! [`MemoryRepository`]: an in-process [`GenealogyRepository`].
//!
//! Enforces the same uniqueness rules as the SQL schema. Useful for tests and
//! for callers that want the engine without a database.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use jamaat_core::{
  Error, Result,
  genealogy::{
    Family, FamilyChild, FamilyChildId, FamilyId, Individual, IndividualId,
    NewFamilyChild, PersonIndividualLink, Sequence,
  },
  person::Person,
  repository::GenealogyRepository,
};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum MemoryError {
  #[error("unique constraint violated: {0}")]
  Unique(&'static str),
}

#[derive(Debug, Default, Clone)]
pub struct MemoryRepository {
  persons:         BTreeMap<Uuid, Person>,
  links:           Vec<PersonIndividualLink>,
  individuals:     BTreeMap<IndividualId, Individual>,
  families:        BTreeMap<FamilyId, Family>,
  family_children: BTreeMap<FamilyChildId, FamilyChild>,
  sequences:       HashMap<&'static str, u64>,
  last_edge_id:    i64,
}

impl MemoryRepository {
  pub fn new() -> Self { Self::default() }

  /// Add or replace a CRM person.
  pub fn insert_person(&mut self, person: Person) {
    self.persons.insert(person.person_id, person);
  }
}

fn unique(what: &'static str) -> Error { Error::storage(MemoryError::Unique(what)) }

impl GenealogyRepository for MemoryRepository {
  fn person(&self, id: Uuid) -> Result<Option<Person>> {
    Ok(self.persons.get(&id).cloned())
  }

  fn person_by_email(&self, email: &str) -> Result<Option<Person>> {
    Ok(
      self
        .persons
        .values()
        .find(|p| p.email.as_deref() == Some(email))
        .cloned(),
    )
  }

  fn person_by_name_and_birth_date(
    &self,
    first_name: &str,
    last_name: Option<&str>,
    date_of_birth: Option<NaiveDate>,
  ) -> Result<Option<Person>> {
    Ok(
      self
        .persons
        .values()
        .find(|p| {
          p.first_name == first_name
            && p.last_name.as_deref() == last_name
            && p.date_of_birth == date_of_birth
        })
        .cloned(),
    )
  }

  fn persons(&self) -> Result<Vec<Person>> {
    Ok(self.persons.values().cloned().collect())
  }

  fn link_for_person(&self, person_id: Uuid) -> Result<Option<PersonIndividualLink>> {
    Ok(self.links.iter().find(|l| l.person_id == person_id).cloned())
  }

  fn link_for_individual(
    &self,
    individual_id: &IndividualId,
  ) -> Result<Option<PersonIndividualLink>> {
    Ok(
      self
        .links
        .iter()
        .find(|l| &l.individual_id == individual_id)
        .cloned(),
    )
  }

  fn insert_link(&mut self, link: &PersonIndividualLink) -> Result<()> {
    if self.links.iter().any(|l| l.person_id == link.person_id) {
      return Err(unique("person_individual_links.person_id"));
    }
    if self.links.iter().any(|l| l.individual_id == link.individual_id) {
      return Err(unique("person_individual_links.individual_id"));
    }
    self.links.push(link.clone());
    Ok(())
  }

  fn individual(&self, id: &IndividualId) -> Result<Option<Individual>> {
    Ok(self.individuals.get(id).cloned())
  }

  fn individuals(&self) -> Result<Vec<Individual>> {
    Ok(self.individuals.values().cloned().collect())
  }

  fn insert_individual(&mut self, individual: &Individual) -> Result<()> {
    if self.individuals.contains_key(&individual.individual_id) {
      return Err(unique("individuals.individual_id"));
    }
    self
      .individuals
      .insert(individual.individual_id.clone(), individual.clone());
    Ok(())
  }

  fn family(&self, id: &FamilyId) -> Result<Option<Family>> {
    Ok(self.families.get(id).cloned())
  }

  fn families(&self) -> Result<Vec<Family>> {
    Ok(self.families.values().cloned().collect())
  }

  fn families_by_spouse(&self, id: &IndividualId) -> Result<Vec<Family>> {
    Ok(
      self
        .families
        .values()
        .filter(|f| f.slot_of(id).is_some())
        .cloned()
        .collect(),
    )
  }

  fn families_by_spouses(
    &self,
    a: &IndividualId,
    b: &IndividualId,
  ) -> Result<Vec<Family>> {
    Ok(
      self
        .families
        .values()
        .filter(|f| {
          let (h, w) = (f.husband_id.as_ref(), f.wife_id.as_ref());
          (h == Some(a) && w == Some(b)) || (h == Some(b) && w == Some(a))
        })
        .cloned()
        .collect(),
    )
  }

  fn save_family(&mut self, family: &Family) -> Result<()> {
    self.families.insert(family.family_id.clone(), family.clone());
    Ok(())
  }

  fn delete_family(&mut self, id: &FamilyId) -> Result<()> {
    self.families.remove(id);
    Ok(())
  }

  fn family_child(&self, id: FamilyChildId) -> Result<Option<FamilyChild>> {
    Ok(self.family_children.get(&id).cloned())
  }

  fn children_of_family(&self, id: &FamilyId) -> Result<Vec<FamilyChild>> {
    Ok(
      self
        .family_children
        .values()
        .filter(|e| &e.family_id == id)
        .cloned()
        .collect(),
    )
  }

  fn families_of_child(&self, id: &IndividualId) -> Result<Vec<FamilyChild>> {
    Ok(
      self
        .family_children
        .values()
        .filter(|e| &e.child_id == id)
        .cloned()
        .collect(),
    )
  }

  fn family_child_by_pair(
    &self,
    family_id: &FamilyId,
    child_id: &IndividualId,
  ) -> Result<Option<FamilyChild>> {
    Ok(
      self
        .family_children
        .values()
        .find(|e| &e.family_id == family_id && &e.child_id == child_id)
        .cloned(),
    )
  }

  fn family_children(&self) -> Result<Vec<FamilyChild>> {
    Ok(self.family_children.values().cloned().collect())
  }

  fn insert_family_child(&mut self, edge: NewFamilyChild) -> Result<FamilyChild> {
    if self.family_child_by_pair(&edge.family_id, &edge.child_id)?.is_some() {
      return Err(unique("family_children(family_id, child_id)"));
    }
    self.last_edge_id += 1;
    let row = FamilyChild {
      family_child_id: FamilyChildId(self.last_edge_id),
      family_id:       edge.family_id,
      child_id:        edge.child_id,
      relation:        edge.relation,
    };
    self.family_children.insert(row.family_child_id, row.clone());
    Ok(row)
  }

  fn delete_family_child(&mut self, id: FamilyChildId) -> Result<()> {
    self.family_children.remove(&id);
    Ok(())
  }

  fn next_in_sequence(&mut self, sequence: Sequence) -> Result<u64> {
    let value = self.sequences.entry(sequence.name()).or_insert(0);
    *value += 1;
    Ok(*value)
  }
}
