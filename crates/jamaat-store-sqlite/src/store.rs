//! [`SqliteStore`]: the SQLite implementation of [`GenealogyStore`].

use std::path::Path;

use chrono::{NaiveDate, Utc};
use jamaat_core::{
  genealogy::FamilyId,
  graph::GenealogyGraph,
  household::{
    HouseholdOutcome, HouseholdReport, ImportReport, ImportRow, InferencePolicy,
  },
  person::{NewPerson, Person},
  relationship::{Relationship, RelationshipHandle, RelationshipKind},
  repository::GenealogyRepository,
  stats::GenealogyStats,
  store::GenealogyStore,
};
use jamaat_genealogy::{graph, inference, mutation, stats};
use rusqlite::TransactionBehavior;
use uuid::Uuid;

use crate::{Result, SqliteRepository, schema::SCHEMA};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A genealogy store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn:   tokio_rusqlite::Connection,
  policy: InferencePolicy,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn).await
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn).await
  }

  async fn init(conn: tokio_rusqlite::Connection) -> Result<Self> {
    conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(Self { conn, policy: InferencePolicy::default() })
  }

  /// Replace the household inference tunables.
  pub fn with_inference_policy(mut self, policy: InferencePolicy) -> Self {
    self.policy = policy;
    self
  }

  pub fn inference_policy(&self) -> InferencePolicy { self.policy }

  /// Run `op` in an immediate (write-locking) transaction, committing only if
  /// it succeeds.
  async fn write<T, F>(&self, op: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&mut SqliteRepository<'_>) -> jamaat_core::Result<T> + Send + 'static,
  {
    let result = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let result = op(&mut SqliteRepository::new(&tx));
        if result.is_ok() {
          tx.commit()?;
        }
        Ok(result)
      })
      .await?;
    Ok(result?)
  }

  /// Run `op` against one consistent snapshot.
  async fn read<T, F>(&self, op: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&SqliteRepository<'_>) -> jamaat_core::Result<T> + Send + 'static,
  {
    let result = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Deferred)?;
        Ok(op(&SqliteRepository::new(&tx)))
      })
      .await?;
    Ok(result?)
  }
}

fn today() -> NaiveDate { Utc::now().date_naive() }

// ─── GenealogyStore impl ─────────────────────────────────────────────────────

impl GenealogyStore for SqliteStore {
  type Error = crate::Error;

  // ── Persons ───────────────────────────────────────────────────────────

  async fn add_person(&self, input: NewPerson) -> Result<Person> {
    let person = input.into_person(Uuid::new_v4(), Utc::now());
    let stored = person.clone();
    self.write(move |repo| repo.insert_person(&stored)).await?;
    tracing::info!("added person {} ({})", person.person_id, person.full_name());
    Ok(person)
  }

  async fn get_person(&self, id: Uuid) -> Result<Option<Person>> {
    self.read(move |repo| repo.person(id)).await
  }

  async fn list_persons(&self) -> Result<Vec<Person>> {
    self.read(|repo| repo.persons()).await
  }

  // ── Relationships ─────────────────────────────────────────────────────

  async fn add_relationship(
    &self,
    person_id: Uuid,
    related_id: Uuid,
    kind: RelationshipKind,
    family: Option<FamilyId>,
  ) -> Result<Relationship> {
    self
      .write(move |repo| {
        mutation::add_relationship(repo, person_id, related_id, kind, family)
      })
      .await
  }

  async fn remove_relationship(&self, handle: RelationshipHandle) -> Result<()> {
    self
      .write(move |repo| mutation::remove_relationship(repo, &handle))
      .await
  }

  async fn list_relationships(&self, person_id: Uuid) -> Result<Vec<Relationship>> {
    self
      .read(move |repo| mutation::list_relationships(repo, person_id))
      .await
  }

  // ── Graphs ────────────────────────────────────────────────────────────

  async fn ego_graph(&self, person_id: Uuid) -> Result<GenealogyGraph> {
    self.read(move |repo| graph::ego_graph(repo, person_id)).await
  }

  async fn complete_graph(&self) -> Result<GenealogyGraph> {
    self.read(|repo| graph::complete_graph(repo)).await
  }

  // ── Import ────────────────────────────────────────────────────────────

  async fn infer_household(
    &self,
    household_key: String,
    rows: Vec<ImportRow>,
  ) -> Result<HouseholdOutcome> {
    let policy = self.policy;
    let today = today();
    self
      .write(move |repo| {
        inference::infer_household(repo, &household_key, &rows, &policy, today)
      })
      .await
  }

  async fn import_households(&self, rows: Vec<ImportRow>) -> Result<ImportReport> {
    let mut report = ImportReport::default();

    for (household_key, rows) in inference::group_households(rows) {
      let outcome = match self.infer_household(household_key.clone(), rows).await {
        Ok(outcome) => outcome,
        Err(e) => {
          tracing::error!("household {household_key} failed: {e}");
          HouseholdOutcome::Failed { reason: e.to_string() }
        }
      };
      report.households.push(HouseholdReport { household_key, outcome });
    }

    tracing::info!(
      "imported {} household(s), {} linked",
      report.households.len(),
      report.linked()
    );
    Ok(report)
  }

  // ── Statistics ────────────────────────────────────────────────────────

  async fn statistics(&self) -> Result<GenealogyStats> {
    let today = today();
    self.read(move |repo| stats::statistics(repo, today)).await
  }
}
