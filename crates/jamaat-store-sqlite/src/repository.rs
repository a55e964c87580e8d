//! [`SqliteRepository`]: [`GenealogyRepository`] over one open SQLite
//! connection or transaction.

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
use rusqlite::{OptionalExtension as _, Params, Row, params};
use uuid::Uuid;

use crate::encode::{
  FAMILY_CHILD_COLUMNS, FAMILY_COLUMNS, INDIVIDUAL_COLUMNS, LINK_COLUMNS,
  PERSON_COLUMNS, RawFamily, RawFamilyChild, RawIndividual, RawLink, RawPerson,
  StorageExt as _, encode_date, encode_dt, encode_enum, encode_uuid,
};

/// Row-level access bound to a borrowed connection. The store hands the
/// engine one of these per transaction; see
/// [`SqliteStore`](crate::SqliteStore).
pub struct SqliteRepository<'c> {
  conn: &'c rusqlite::Connection,
}

impl<'c> SqliteRepository<'c> {
  pub fn new(conn: &'c rusqlite::Connection) -> Self { Self { conn } }

  /// Persons are owned by the CRM; this is the only write path for them.
  pub fn insert_person(&self, person: &Person) -> Result<()> {
    self
      .conn
      .execute(
        "INSERT INTO persons (
           person_id, first_name, last_name, gender, date_of_birth,
           date_of_death, email, phone, status, created_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
          encode_uuid(person.person_id),
          person.first_name,
          person.last_name,
          person.gender,
          encode_date(person.date_of_birth),
          encode_date(person.date_of_death),
          person.email,
          person.phone,
          encode_enum(person.status),
          encode_dt(person.created_at),
        ],
      )
      .storage()?;
    Ok(())
  }

  fn query_one<R, T>(
    &self,
    sql: &str,
    params: impl Params,
    read: fn(&Row<'_>) -> rusqlite::Result<R>,
    convert: fn(R) -> Result<T>,
  ) -> Result<Option<T>> {
    self
      .conn
      .query_row(sql, params, read)
      .optional()
      .storage()?
      .map(convert)
      .transpose()
  }

  fn query_all<R, T>(
    &self,
    sql: &str,
    params: impl Params,
    read: fn(&Row<'_>) -> rusqlite::Result<R>,
    convert: fn(R) -> Result<T>,
  ) -> Result<Vec<T>> {
    let mut stmt = self.conn.prepare(sql).storage()?;
    let raws = stmt
      .query_map(params, read)
      .storage()?
      .collect::<rusqlite::Result<Vec<R>>>()
      .storage()?;
    raws.into_iter().map(convert).collect()
  }
}

impl GenealogyRepository for SqliteRepository<'_> {
  // ── Persons ───────────────────────────────────────────────────────────

  fn person(&self, id: Uuid) -> Result<Option<Person>> {
    self.query_one(
      &format!("SELECT {PERSON_COLUMNS} FROM persons WHERE person_id = ?1"),
      params![encode_uuid(id)],
      RawPerson::from_row,
      RawPerson::into_person,
    )
  }

  fn person_by_email(&self, email: &str) -> Result<Option<Person>> {
    self.query_one(
      &format!(
        "SELECT {PERSON_COLUMNS} FROM persons WHERE email = ?1
         ORDER BY created_at LIMIT 1"
      ),
      params![email],
      RawPerson::from_row,
      RawPerson::into_person,
    )
  }

  fn person_by_name_and_birth_date(
    &self,
    first_name: &str,
    last_name: Option<&str>,
    date_of_birth: Option<NaiveDate>,
  ) -> Result<Option<Person>> {
    // `IS` so that NULL matches NULL.
    self.query_one(
      &format!(
        "SELECT {PERSON_COLUMNS} FROM persons
         WHERE first_name = ?1 AND last_name IS ?2 AND date_of_birth IS ?3
         ORDER BY created_at LIMIT 1"
      ),
      params![first_name, last_name, encode_date(date_of_birth)],
      RawPerson::from_row,
      RawPerson::into_person,
    )
  }

  fn persons(&self) -> Result<Vec<Person>> {
    self.query_all(
      &format!("SELECT {PERSON_COLUMNS} FROM persons ORDER BY created_at, person_id"),
      [],
      RawPerson::from_row,
      RawPerson::into_person,
    )
  }

  // ── Links ─────────────────────────────────────────────────────────────

  fn link_for_person(&self, person_id: Uuid) -> Result<Option<PersonIndividualLink>> {
    self.query_one(
      &format!("SELECT {LINK_COLUMNS} FROM person_individual_links WHERE person_id = ?1"),
      params![encode_uuid(person_id)],
      RawLink::from_row,
      RawLink::into_link,
    )
  }

  fn link_for_individual(
    &self,
    individual_id: &IndividualId,
  ) -> Result<Option<PersonIndividualLink>> {
    self.query_one(
      &format!(
        "SELECT {LINK_COLUMNS} FROM person_individual_links WHERE individual_id = ?1"
      ),
      params![individual_id.as_str()],
      RawLink::from_row,
      RawLink::into_link,
    )
  }

  fn insert_link(&mut self, link: &PersonIndividualLink) -> Result<()> {
    self
      .conn
      .execute(
        "INSERT INTO person_individual_links (
           person_id, individual_id, linked_by, link_reason, linked_at
         ) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
          encode_uuid(link.person_id),
          link.individual_id.as_str(),
          link.linked_by,
          link.link_reason,
          encode_dt(link.linked_at),
        ],
      )
      .storage()?;
    Ok(())
  }

  // ── Individuals ───────────────────────────────────────────────────────

  fn individual(&self, id: &IndividualId) -> Result<Option<Individual>> {
    self.query_one(
      &format!("SELECT {INDIVIDUAL_COLUMNS} FROM individuals WHERE individual_id = ?1"),
      params![id.as_str()],
      RawIndividual::from_row,
      RawIndividual::into_individual,
    )
  }

  fn individuals(&self) -> Result<Vec<Individual>> {
    self.query_all(
      &format!("SELECT {INDIVIDUAL_COLUMNS} FROM individuals ORDER BY rowid"),
      [],
      RawIndividual::from_row,
      RawIndividual::into_individual,
    )
  }

  fn insert_individual(&mut self, individual: &Individual) -> Result<()> {
    self
      .conn
      .execute(
        "INSERT INTO individuals (
           individual_id, given_name, surname, sex, birth_date, death_date, living
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
          individual.individual_id.as_str(),
          individual.given_name,
          individual.surname,
          individual.sex.map(encode_enum),
          encode_date(individual.birth_date),
          encode_date(individual.death_date),
          individual.living,
        ],
      )
      .storage()?;
    Ok(())
  }

  // ── Families ──────────────────────────────────────────────────────────

  fn family(&self, id: &FamilyId) -> Result<Option<Family>> {
    self.query_one(
      &format!("SELECT {FAMILY_COLUMNS} FROM families WHERE family_id = ?1"),
      params![id.as_str()],
      RawFamily::from_row,
      RawFamily::into_family,
    )
  }

  fn families(&self) -> Result<Vec<Family>> {
    self.query_all(
      &format!("SELECT {FAMILY_COLUMNS} FROM families ORDER BY family_id"),
      [],
      RawFamily::from_row,
      RawFamily::into_family,
    )
  }

  fn families_by_spouse(&self, id: &IndividualId) -> Result<Vec<Family>> {
    self.query_all(
      &format!(
        "SELECT {FAMILY_COLUMNS} FROM families
         WHERE husband_id = ?1 OR wife_id = ?1
         ORDER BY family_id"
      ),
      params![id.as_str()],
      RawFamily::from_row,
      RawFamily::into_family,
    )
  }

  fn families_by_spouses(
    &self,
    a: &IndividualId,
    b: &IndividualId,
  ) -> Result<Vec<Family>> {
    self.query_all(
      &format!(
        "SELECT {FAMILY_COLUMNS} FROM families
         WHERE (husband_id = ?1 AND wife_id = ?2)
            OR (husband_id = ?2 AND wife_id = ?1)
         ORDER BY family_id"
      ),
      params![a.as_str(), b.as_str()],
      RawFamily::from_row,
      RawFamily::into_family,
    )
  }

  fn save_family(&mut self, family: &Family) -> Result<()> {
    self
      .conn
      .execute(
        "INSERT INTO families (family_id, husband_id, wife_id) VALUES (?1, ?2, ?3)
         ON CONFLICT (family_id) DO UPDATE
           SET husband_id = excluded.husband_id, wife_id = excluded.wife_id",
        params![
          family.family_id.as_str(),
          family.husband_id.as_ref().map(IndividualId::as_str),
          family.wife_id.as_ref().map(IndividualId::as_str),
        ],
      )
      .storage()?;
    Ok(())
  }

  fn delete_family(&mut self, id: &FamilyId) -> Result<()> {
    self
      .conn
      .execute("DELETE FROM families WHERE family_id = ?1", params![id.as_str()])
      .storage()?;
    Ok(())
  }

  // ── Family children ───────────────────────────────────────────────────

  fn family_child(&self, id: FamilyChildId) -> Result<Option<FamilyChild>> {
    self.query_one(
      &format!(
        "SELECT {FAMILY_CHILD_COLUMNS} FROM family_children WHERE family_child_id = ?1"
      ),
      params![id.0],
      RawFamilyChild::from_row,
      RawFamilyChild::into_family_child,
    )
  }

  fn children_of_family(&self, id: &FamilyId) -> Result<Vec<FamilyChild>> {
    self.query_all(
      &format!(
        "SELECT {FAMILY_CHILD_COLUMNS} FROM family_children
         WHERE family_id = ?1 ORDER BY family_child_id"
      ),
      params![id.as_str()],
      RawFamilyChild::from_row,
      RawFamilyChild::into_family_child,
    )
  }

  fn families_of_child(&self, id: &IndividualId) -> Result<Vec<FamilyChild>> {
    self.query_all(
      &format!(
        "SELECT {FAMILY_CHILD_COLUMNS} FROM family_children
         WHERE child_id = ?1 ORDER BY family_child_id"
      ),
      params![id.as_str()],
      RawFamilyChild::from_row,
      RawFamilyChild::into_family_child,
    )
  }

  fn family_child_by_pair(
    &self,
    family_id: &FamilyId,
    child_id: &IndividualId,
  ) -> Result<Option<FamilyChild>> {
    self.query_one(
      &format!(
        "SELECT {FAMILY_CHILD_COLUMNS} FROM family_children
         WHERE family_id = ?1 AND child_id = ?2"
      ),
      params![family_id.as_str(), child_id.as_str()],
      RawFamilyChild::from_row,
      RawFamilyChild::into_family_child,
    )
  }

  fn family_children(&self) -> Result<Vec<FamilyChild>> {
    self.query_all(
      &format!("SELECT {FAMILY_CHILD_COLUMNS} FROM family_children ORDER BY family_child_id"),
      [],
      RawFamilyChild::from_row,
      RawFamilyChild::into_family_child,
    )
  }

  fn insert_family_child(&mut self, edge: NewFamilyChild) -> Result<FamilyChild> {
    self
      .conn
      .execute(
        "INSERT INTO family_children (family_id, child_id, relation) VALUES (?1, ?2, ?3)",
        params![
          edge.family_id.as_str(),
          edge.child_id.as_str(),
          encode_enum(edge.relation),
        ],
      )
      .storage()?;
    Ok(FamilyChild {
      family_child_id: FamilyChildId(self.conn.last_insert_rowid()),
      family_id:       edge.family_id,
      child_id:        edge.child_id,
      relation:        edge.relation,
    })
  }

  fn delete_family_child(&mut self, id: FamilyChildId) -> Result<()> {
    self
      .conn
      .execute(
        "DELETE FROM family_children WHERE family_child_id = ?1",
        params![id.0],
      )
      .storage()?;
    Ok(())
  }

  // ── Id allocation ─────────────────────────────────────────────────────

  fn next_in_sequence(&mut self, sequence: Sequence) -> Result<u64> {
    let value: i64 = self
      .conn
      .query_row(
        "UPDATE sequences SET value = value + 1 WHERE name = ?1 RETURNING value",
        params![sequence.name()],
        |r| r.get(0),
      )
      .storage()?;
    u64::try_from(value).map_err(Error::storage)
  }
}
