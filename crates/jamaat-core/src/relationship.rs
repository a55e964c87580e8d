//! The typed relationship vocabulary exposed to callers.
//!
//! FATHER, MOTHER, SPOUSE and CHILD are a logical view only; underneath,
//! every relationship is a [`Family`](crate::genealogy::Family) slot or a
//! [`FamilyChild`](crate::genealogy::FamilyChild) edge.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::{
  Error, Result,
  genealogy::{FamilyChildId, FamilyId, IndividualId},
};

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
  EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum RelationshipKind {
  Father,
  Mother,
  Spouse,
  Child,
}

impl RelationshipKind {
  /// Parse a caller-supplied type string, e.g. `"father"` or `"SPOUSE"`.
  pub fn parse(s: &str) -> Result<Self> {
    Self::from_str(s.trim())
      .map_err(|_| Error::UnknownRelationshipKind(s.to_owned()))
  }
}

// ─── Handle ──────────────────────────────────────────────────────────────────

/// Addressable handle for one relationship instance.
///
/// Parent and child relationships are [`FamilyChild`] edges; spouse
/// relationships are whole families. The text form is `edge:<n>` or
/// `family:<id>`.
///
/// [`FamilyChild`]: crate::genealogy::FamilyChild
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum RelationshipHandle {
  Edge(FamilyChildId),
  Family(FamilyId),
}

impl fmt::Display for RelationshipHandle {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Edge(id) => write!(f, "edge:{id}"),
      Self::Family(id) => write!(f, "family:{id}"),
    }
  }
}

impl FromStr for RelationshipHandle {
  type Err = Error;

  /// Accepts the tagged forms as well as a bare numeric edge id or a bare
  /// `@F..@` family id.
  fn from_str(s: &str) -> Result<Self> {
    let s = s.trim();
    let invalid = || Error::InvalidIdentifier(s.to_owned());

    if let Some(rest) = s.strip_prefix("edge:") {
      return rest
        .parse()
        .map(|n| Self::Edge(FamilyChildId(n)))
        .map_err(|_| invalid());
    }
    if let Some(rest) = s.strip_prefix("family:") {
      return FamilyId::parse(rest).map(Self::Family);
    }
    if let Ok(n) = s.parse::<i64>() {
      return Ok(Self::Edge(FamilyChildId(n)));
    }
    if s.starts_with("@F") {
      return FamilyId::parse(s).map(Self::Family);
    }
    Err(invalid())
  }
}

// ─── Listing entry ───────────────────────────────────────────────────────────

/// One relationship as seen from a particular person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
  pub relationship_id:       RelationshipHandle,
  pub related_individual_id: IndividualId,
  /// Absent when the related individual has no linked CRM person.
  pub related_person_id:     Option<Uuid>,
  pub related_person_name:   Option<String>,
  #[serde(rename = "type")]
  pub kind:                  RelationshipKind,
}
