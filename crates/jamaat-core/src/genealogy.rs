//! Genealogy records: the bipartite Individual/Family graph.
//!
//! An [`Individual`] never references its parents or spouses directly. A
//! [`Family`] holds up to two spouse slots, and children hang off a family
//! through [`FamilyChild`] edges. A CRM [`Person`](crate::person::Person) is
//! attached to at most one individual through a [`PersonIndividualLink`].

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Identifiers ─────────────────────────────────────────────────────────────

/// Cross-reference key of an individual, `@I<n>@`.
#[derive(
  Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct IndividualId(String);

impl IndividualId {
  pub fn numbered(n: u64) -> Self { Self(format!("@I{n}@")) }

  pub fn parse(s: &str) -> Result<Self> {
    match s.strip_prefix("@I").and_then(|r| r.strip_suffix('@')) {
      Some(body) if !body.is_empty() && !body.contains('@') => {
        Ok(Self(s.to_owned()))
      }
      _ => Err(Error::InvalidIdentifier(s.to_owned())),
    }
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

/// Cross-reference key of a family: `@F<n>@` when allocated, or
/// `@F<household key>@` when created by household inference.
#[derive(
  Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct FamilyId(String);

impl FamilyId {
  pub fn numbered(n: u64) -> Self { Self(format!("@F{n}@")) }

  /// The deterministic family id for an import household.
  pub fn for_household(key: &str) -> Result<Self> {
    Self::parse(&format!("@F{}@", key.trim()))
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s.strip_prefix("@F").and_then(|r| r.strip_suffix('@')) {
      Some(body)
        if !body.is_empty()
          && !body.contains('@')
          && !body.chars().any(char::is_whitespace) =>
      {
        Ok(Self(s.to_owned()))
      }
      _ => Err(Error::InvalidIdentifier(s.to_owned())),
    }
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

macro_rules! xref_conversions {
  ($ty:ident) => {
    impl TryFrom<String> for $ty {
      type Error = Error;

      fn try_from(s: String) -> Result<Self> { Self::parse(&s) }
    }

    impl From<$ty> for String {
      fn from(id: $ty) -> String { id.0 }
    }

    impl fmt::Display for $ty {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
      }
    }
  };
}

xref_conversions!(IndividualId);
xref_conversions!(FamilyId);

/// Row id of a [`FamilyChild`] edge, assigned by the store.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
  Deserialize,
)]
#[serde(transparent)]
pub struct FamilyChildId(pub i64);

impl fmt::Display for FamilyChildId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Named counters used to allocate [`IndividualId`]s and [`FamilyId`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sequence {
  Individual,
  Family,
}

impl Sequence {
  pub fn name(self) -> &'static str {
    match self {
      Self::Individual => "individual",
      Self::Family => "family",
    }
  }
}

// ─── Sex ─────────────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
  EnumString,
)]
pub enum Sex {
  M,
  F,
}

impl Sex {
  /// Classify a free-text CRM gender value. `male`/`m` and `female`/`f` are
  /// recognised case-insensitively; anything else is unresolved.
  pub fn from_gender(gender: &str) -> Option<Self> {
    match gender.trim().to_ascii_lowercase().as_str() {
      "male" | "m" => Some(Self::M),
      "female" | "f" => Some(Self::F),
      _ => None,
    }
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// A genealogy record, independent of CRM membership state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Individual {
  pub individual_id: IndividualId,
  pub given_name:    String,
  pub surname:       Option<String>,
  pub sex:           Option<Sex>,
  pub birth_date:    Option<NaiveDate>,
  pub death_date:    Option<NaiveDate>,
  pub living:        bool,
}

impl Individual {
  /// `given surname`, or just the given name when there is no surname.
  pub fn full_name(&self) -> String {
    match self.surname.as_deref().filter(|s| !s.is_empty()) {
      Some(surname) => format!("{} {surname}", self.given_name),
      None => self.given_name.clone(),
    }
  }
}

/// Which spouse slot of a [`Family`] an individual occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpouseSlot {
  Husband,
  Wife,
}

impl SpouseSlot {
  /// The slot a parent of the given sex fills; unknown sex defaults to
  /// husband.
  pub fn for_sex(sex: Option<Sex>) -> Self {
    match sex {
      Some(Sex::F) => Self::Wife,
      _ => Self::Husband,
    }
  }

  pub fn other(self) -> Self {
    match self {
      Self::Husband => Self::Wife,
      Self::Wife => Self::Husband,
    }
  }
}

/// A union/household record with up to two spouse slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Family {
  pub family_id:  FamilyId,
  pub husband_id: Option<IndividualId>,
  pub wife_id:    Option<IndividualId>,
}

impl Family {
  pub fn new(family_id: FamilyId) -> Self {
    Self { family_id, husband_id: None, wife_id: None }
  }

  pub fn set_slot(&mut self, slot: SpouseSlot, individual: IndividualId) {
    match slot {
      SpouseSlot::Husband => self.husband_id = Some(individual),
      SpouseSlot::Wife => self.wife_id = Some(individual),
    }
  }

  /// The slot `individual` occupies, if any. Husband wins when an
  /// individual somehow fills both.
  pub fn slot_of(&self, individual: &IndividualId) -> Option<SpouseSlot> {
    if self.husband_id.as_ref() == Some(individual) {
      Some(SpouseSlot::Husband)
    } else if self.wife_id.as_ref() == Some(individual) {
      Some(SpouseSlot::Wife)
    } else {
      None
    }
  }

  /// The spouse opposite `individual`, if both slots are filled.
  pub fn partner_of(&self, individual: &IndividualId) -> Option<&IndividualId> {
    match self.slot_of(individual)? {
      SpouseSlot::Husband => self.wife_id.as_ref(),
      SpouseSlot::Wife => self.husband_id.as_ref(),
    }
  }

  /// Filled spouse slots, husband first.
  pub fn spouses(&self) -> impl Iterator<Item = &IndividualId> {
    self.husband_id.iter().chain(self.wife_id.iter())
  }
}

/// How a child belongs to a family.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display,
  EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum ChildRelation {
  #[default]
  Biological,
  Adopted,
  Foster,
}

/// An edge from a [`Family`] to one of its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyChild {
  pub family_child_id: FamilyChildId,
  pub family_id:       FamilyId,
  pub child_id:        IndividualId,
  pub relation:        ChildRelation,
}

/// Input to
/// [`GenealogyRepository::insert_family_child`](crate::repository::GenealogyRepository::insert_family_child).
#[derive(Debug, Clone)]
pub struct NewFamilyChild {
  pub family_id: FamilyId,
  pub child_id:  IndividualId,
  pub relation:  ChildRelation,
}

/// Optional one-to-one association between a CRM person and an individual.
///
/// Deleting either side removes the link but never the other side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonIndividualLink {
  pub person_id:     Uuid,
  pub individual_id: IndividualId,
  pub linked_by:     String,
  pub link_reason:   Option<String>,
  pub linked_at:     DateTime<Utc>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn numbered_ids_have_xref_form() {
    assert_eq!(IndividualId::numbered(7).as_str(), "@I7@");
    assert_eq!(FamilyId::numbered(12).as_str(), "@F12@");
  }

  #[test]
  fn parse_rejects_malformed_ids() {
    assert!(IndividualId::parse("@I@").is_err());
    assert!(IndividualId::parse("I5").is_err());
    assert!(IndividualId::parse("@F5@").is_err());
    assert!(FamilyId::parse("@F 5@").is_err());
    assert!(FamilyId::parse("@F5@").is_ok());
  }

  #[test]
  fn household_family_id_wraps_key() {
    let id = FamilyId::for_household(" 1042 ").unwrap();
    assert_eq!(id.as_str(), "@F1042@");
    assert!(FamilyId::for_household("").is_err());
    assert!(FamilyId::for_household("a@b").is_err());
  }

  #[test]
  fn sex_from_gender_is_case_insensitive() {
    assert_eq!(Sex::from_gender("Male"), Some(Sex::M));
    assert_eq!(Sex::from_gender("m"), Some(Sex::M));
    assert_eq!(Sex::from_gender("FEMALE"), Some(Sex::F));
    assert_eq!(Sex::from_gender(" f "), Some(Sex::F));
    assert_eq!(Sex::from_gender("other"), None);
    assert_eq!(Sex::from_gender(""), None);
  }

  #[test]
  fn partner_of_returns_opposite_slot() {
    let mut family = Family::new(FamilyId::numbered(1));
    family.set_slot(SpouseSlot::Husband, IndividualId::numbered(1));
    family.set_slot(SpouseSlot::Wife, IndividualId::numbered(2));

    assert_eq!(
      family.partner_of(&IndividualId::numbered(1)),
      Some(&IndividualId::numbered(2))
    );
    assert_eq!(family.partner_of(&IndividualId::numbered(3)), None);
  }
}
