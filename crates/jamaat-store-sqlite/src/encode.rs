//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, calendar dates are `YYYY-MM-DD`, UUIDs
//! are hyphenated lowercase strings and enums use their uppercase names.

use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use jamaat_core::{
  Error, Result,
  genealogy::{
    Family, FamilyChild, FamilyChildId, FamilyId, Individual, IndividualId,
    PersonIndividualLink,
  },
  person::Person,
};
use uuid::Uuid;

// ─── Storage errors ──────────────────────────────────────────────────────────

/// Lift `rusqlite` results into the engine's error type.
pub trait StorageExt<T> {
  fn storage(self) -> Result<T>;
}

impl<T> StorageExt<T> for rusqlite::Result<T> {
  fn storage(self) -> Result<T> { self.map_err(Error::storage) }
}

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> {
  Uuid::parse_str(s).map_err(Error::storage)
}

// ─── Dates ───────────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(Error::storage)
}

pub fn encode_date(d: Option<NaiveDate>) -> Option<String> {
  d.map(|d| d.format("%Y-%m-%d").to_string())
}

pub fn decode_date(s: Option<&str>) -> Result<Option<NaiveDate>> {
  s.map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(Error::storage))
    .transpose()
}

// ─── Enums ───────────────────────────────────────────────────────────────────

pub fn encode_enum(v: impl Display) -> String { v.to_string() }

pub fn decode_enum<T>(s: &str) -> Result<T>
where
  T: FromStr,
  T::Err: std::error::Error + Send + Sync + 'static,
{
  s.parse().map_err(Error::storage)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawPerson::from_row`].
pub const PERSON_COLUMNS: &str = "person_id, first_name, last_name, gender, \
  date_of_birth, date_of_death, email, phone, status, created_at";

/// Raw strings read directly from a `persons` row.
pub struct RawPerson {
  pub person_id:     String,
  pub first_name:    String,
  pub last_name:     Option<String>,
  pub gender:        Option<String>,
  pub date_of_birth: Option<String>,
  pub date_of_death: Option<String>,
  pub email:         Option<String>,
  pub phone:         Option<String>,
  pub status:        String,
  pub created_at:    String,
}

impl RawPerson {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      person_id:     row.get(0)?,
      first_name:    row.get(1)?,
      last_name:     row.get(2)?,
      gender:        row.get(3)?,
      date_of_birth: row.get(4)?,
      date_of_death: row.get(5)?,
      email:         row.get(6)?,
      phone:         row.get(7)?,
      status:        row.get(8)?,
      created_at:    row.get(9)?,
    })
  }

  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      person_id:     decode_uuid(&self.person_id)?,
      first_name:    self.first_name,
      last_name:     self.last_name,
      gender:        self.gender,
      date_of_birth: decode_date(self.date_of_birth.as_deref())?,
      date_of_death: decode_date(self.date_of_death.as_deref())?,
      email:         self.email,
      phone:         self.phone,
      status:        decode_enum(&self.status)?,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

pub const LINK_COLUMNS: &str =
  "person_id, individual_id, linked_by, link_reason, linked_at";

pub struct RawLink {
  pub person_id:     String,
  pub individual_id: String,
  pub linked_by:     String,
  pub link_reason:   Option<String>,
  pub linked_at:     String,
}

impl RawLink {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      person_id:     row.get(0)?,
      individual_id: row.get(1)?,
      linked_by:     row.get(2)?,
      link_reason:   row.get(3)?,
      linked_at:     row.get(4)?,
    })
  }

  pub fn into_link(self) -> Result<PersonIndividualLink> {
    Ok(PersonIndividualLink {
      person_id:     decode_uuid(&self.person_id)?,
      individual_id: IndividualId::parse(&self.individual_id)?,
      linked_by:     self.linked_by,
      link_reason:   self.link_reason,
      linked_at:     decode_dt(&self.linked_at)?,
    })
  }
}

pub const INDIVIDUAL_COLUMNS: &str =
  "individual_id, given_name, surname, sex, birth_date, death_date, living";

pub struct RawIndividual {
  pub individual_id: String,
  pub given_name:    String,
  pub surname:       Option<String>,
  pub sex:           Option<String>,
  pub birth_date:    Option<String>,
  pub death_date:    Option<String>,
  pub living:        bool,
}

impl RawIndividual {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      individual_id: row.get(0)?,
      given_name:    row.get(1)?,
      surname:       row.get(2)?,
      sex:           row.get(3)?,
      birth_date:    row.get(4)?,
      death_date:    row.get(5)?,
      living:        row.get(6)?,
    })
  }

  pub fn into_individual(self) -> Result<Individual> {
    Ok(Individual {
      individual_id: IndividualId::parse(&self.individual_id)?,
      given_name:    self.given_name,
      surname:       self.surname,
      sex:           self.sex.as_deref().map(decode_enum).transpose()?,
      birth_date:    decode_date(self.birth_date.as_deref())?,
      death_date:    decode_date(self.death_date.as_deref())?,
      living:        self.living,
    })
  }
}

pub const FAMILY_COLUMNS: &str = "family_id, husband_id, wife_id";

pub struct RawFamily {
  pub family_id:  String,
  pub husband_id: Option<String>,
  pub wife_id:    Option<String>,
}

impl RawFamily {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      family_id:  row.get(0)?,
      husband_id: row.get(1)?,
      wife_id:    row.get(2)?,
    })
  }

  pub fn into_family(self) -> Result<Family> {
    Ok(Family {
      family_id:  FamilyId::parse(&self.family_id)?,
      husband_id: self.husband_id.as_deref().map(IndividualId::parse).transpose()?,
      wife_id:    self.wife_id.as_deref().map(IndividualId::parse).transpose()?,
    })
  }
}

pub const FAMILY_CHILD_COLUMNS: &str =
  "family_child_id, family_id, child_id, relation";

pub struct RawFamilyChild {
  pub family_child_id: i64,
  pub family_id:       String,
  pub child_id:        String,
  pub relation:        String,
}

impl RawFamilyChild {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      family_child_id: row.get(0)?,
      family_id:       row.get(1)?,
      child_id:        row.get(2)?,
      relation:        row.get(3)?,
    })
  }

  pub fn into_family_child(self) -> Result<FamilyChild> {
    Ok(FamilyChild {
      family_child_id: FamilyChildId(self.family_child_id),
      family_id:       FamilyId::parse(&self.family_id)?,
      child_id:        IndividualId::parse(&self.child_id)?,
      relation:        decode_enum(&self.relation)?,
    })
  }
}
