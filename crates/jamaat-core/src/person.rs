//! Person: the CRM identity that genealogy records hang off.
//!
//! Persons are owned by the membership side of the system. The genealogy
//! engine only reads them; it never deletes or rewrites one.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display,
  EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum PersonStatus {
  #[default]
  Active,
  Inactive,
  Deceased,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  pub person_id:     Uuid,
  pub first_name:    String,
  pub last_name:     Option<String>,
  /// Free text as entered in the CRM, e.g. `"male"` or `"F"`.
  pub gender:        Option<String>,
  pub date_of_birth: Option<NaiveDate>,
  pub date_of_death: Option<NaiveDate>,
  pub email:         Option<String>,
  pub phone:         Option<String>,
  pub status:        PersonStatus,
  pub created_at:    DateTime<Utc>,
}

impl Person {
  /// `first last`, or just the first name when there is no last name.
  pub fn full_name(&self) -> String {
    match self.last_name.as_deref().filter(|s| !s.is_empty()) {
      Some(last) => format!("{} {last}", self.first_name),
      None => self.first_name.clone(),
    }
  }
}

/// Input to [`GenealogyStore::add_person`](crate::store::GenealogyStore::add_person).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPerson {
  pub first_name:    String,
  pub last_name:     Option<String>,
  pub gender:        Option<String>,
  pub date_of_birth: Option<NaiveDate>,
  pub date_of_death: Option<NaiveDate>,
  pub email:         Option<String>,
  pub phone:         Option<String>,
  #[serde(default)]
  pub status:        PersonStatus,
}

impl NewPerson {
  /// Convenience constructor with every optional field unset.
  pub fn named(first_name: impl Into<String>, last_name: Option<&str>) -> Self {
    Self {
      first_name: first_name.into(),
      last_name: last_name.map(str::to_owned),
      ..Self::default()
    }
  }

  pub fn into_person(self, person_id: Uuid, created_at: DateTime<Utc>) -> Person {
    Person {
      person_id,
      first_name: self.first_name,
      last_name: self.last_name,
      gender: self.gender,
      date_of_birth: self.date_of_birth,
      date_of_death: self.date_of_death,
      email: self.email,
      phone: self.phone,
      status: self.status,
      created_at,
    }
  }
}
