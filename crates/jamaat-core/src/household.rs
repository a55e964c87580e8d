//! Bulk-import household types.
//!
//! Spreadsheet parsing happens upstream; by the time rows arrive here they are
//! plain records carrying a household key that clusters members of one
//! family.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::genealogy::{FamilyId, IndividualId};

/// One parsed import row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportRow {
  /// Position in the source sheet, for diagnostics only.
  pub row_number:    Option<usize>,
  pub household_key: Option<String>,
  pub first_name:    Option<String>,
  pub last_name:     Option<String>,
  pub email:         Option<String>,
  pub date_of_birth: Option<NaiveDate>,
}

impl ImportRow {
  /// The trimmed household key, or `None` when blank.
  pub fn household(&self) -> Option<&str> {
    self
      .household_key
      .as_deref()
      .map(str::trim)
      .filter(|k| !k.is_empty())
  }
}

/// Tunables for household inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferencePolicy {
  /// Minimum age difference, in whole years, between the younger parent and
  /// a household member for that member to count as a child.
  #[serde(default = "default_generation_gap")]
  pub min_generation_gap: u32,
}

fn default_generation_gap() -> u32 { 16 }

impl Default for InferencePolicy {
  fn default() -> Self {
    Self { min_generation_gap: default_generation_gap() }
  }
}

/// Why a household was left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
  /// Fewer than two rows resolved to a person.
  TooFewPersons { resolved: usize },
  /// No eldest-male/eldest-female pair could be elected.
  NoParentPair,
  /// The key cannot be embedded in a family id.
  InvalidHouseholdKey,
  /// `@F<key>@` already names a family whose spouses differ from the elected
  /// parents.
  FamilyIdTaken { family_id: FamilyId },
}

impl fmt::Display for SkipReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::TooFewPersons { resolved } => {
        write!(f, "only {resolved} row(s) resolved to a person")
      }
      Self::NoParentPair => f.write_str("no valid male-female parent pair"),
      Self::InvalidHouseholdKey => f.write_str("household key is not usable as a family id"),
      Self::FamilyIdTaken { family_id } => {
        write!(f, "family {family_id} already belongs to other spouses")
      }
    }
  }
}

/// Result of inferring one household.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HouseholdOutcome {
  Linked {
    family_id:    FamilyId,
    father:       IndividualId,
    mother:       IndividualId,
    children:     Vec<IndividualId>,
    /// Persons classified neither as parent nor child. Observed only; no
    /// relationship is stored for them.
    other_adults: Vec<Uuid>,
  },
  Skipped {
    reason: SkipReason,
  },
  /// A storage failure confined to this household.
  Failed {
    reason: String,
  },
}

impl HouseholdOutcome {
  pub fn is_linked(&self) -> bool { matches!(self, Self::Linked { .. }) }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HouseholdReport {
  pub household_key: String,
  pub outcome:       HouseholdOutcome,
}

/// Summary of a batch import, one entry per distinct household key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportReport {
  pub households: Vec<HouseholdReport>,
}

impl ImportReport {
  pub fn linked(&self) -> usize {
    self.households.iter().filter(|h| h.outcome.is_linked()).count()
  }
}
