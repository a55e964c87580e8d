//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use jamaat_core::{
  ErrorKind, StoreError as _,
  genealogy::{FamilyId, IndividualId},
  household::{HouseholdOutcome, ImportRow, InferencePolicy, SkipReason},
  person::{NewPerson, Person, PersonStatus},
  relationship::{RelationshipHandle, RelationshipKind},
  store::GenealogyStore,
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn add(s: &SqliteStore, first: &str, last: &str, gender: &str, dob: Option<&str>) -> Person {
  s.add_person(NewPerson {
    gender: Some(gender.into()),
    date_of_birth: dob.map(|d| d.parse().unwrap()),
    ..NewPerson::named(first, Some(last))
  })
  .await
  .unwrap()
}

// ─── Persons ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_person() {
  let s = store().await;
  let added = s
    .add_person(NewPerson {
      email: Some("amina@example.org".into()),
      date_of_birth: NaiveDate::from_ymd_opt(1980, 2, 29),
      status: PersonStatus::Inactive,
      ..NewPerson::named("Amina", Some("Yusuf"))
    })
    .await
    .unwrap();

  let fetched = s.get_person(added.person_id).await.unwrap().unwrap();
  assert_eq!(fetched.first_name, "Amina");
  assert_eq!(fetched.email.as_deref(), Some("amina@example.org"));
  assert_eq!(fetched.date_of_birth, NaiveDate::from_ymd_opt(1980, 2, 29));
  assert_eq!(fetched.status, PersonStatus::Inactive);
  assert_eq!(fetched.created_at.timestamp(), added.created_at.timestamp());
}

#[tokio::test]
async fn get_person_missing_returns_none() {
  let s = store().await;
  assert!(s.get_person(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn list_persons_all() {
  let s = store().await;
  add(&s, "Ali", "Hassan", "M", None).await;
  add(&s, "Maryam", "Hassan", "F", None).await;
  assert_eq!(s.list_persons().await.unwrap().len(), 2);
}

// ─── Relationships ───────────────────────────────────────────────────────────

#[tokio::test]
async fn spouse_then_child_then_listing() {
  let s = store().await;
  let ali = add(&s, "Ali", "Hassan", "M", None).await;
  let maryam = add(&s, "Maryam", "Hassan", "F", None).await;
  let yusuf = add(&s, "Yusuf", "Hassan", "M", None).await;

  let spouse = s
    .add_relationship(ali.person_id, maryam.person_id, RelationshipKind::Spouse, None)
    .await
    .unwrap();
  assert_eq!(spouse.relationship_id, RelationshipHandle::Family(FamilyId::numbered(1)));
  assert_eq!(spouse.related_person_name.as_deref(), Some("Maryam Hassan"));

  let again = s
    .add_relationship(maryam.person_id, ali.person_id, RelationshipKind::Spouse, None)
    .await
    .unwrap();
  assert_eq!(again.relationship_id, spouse.relationship_id);

  let child = s
    .add_relationship(ali.person_id, yusuf.person_id, RelationshipKind::Child, None)
    .await
    .unwrap();
  assert!(matches!(child.relationship_id, RelationshipHandle::Edge(_)));

  let from_child = s.list_relationships(yusuf.person_id).await.unwrap();
  let seen: Vec<_> = from_child.iter().map(|r| (r.kind, r.related_person_id)).collect();
  assert_eq!(seen, vec![
    (RelationshipKind::Father, Some(ali.person_id)),
    (RelationshipKind::Mother, Some(maryam.person_id)),
  ]);

  let from_father = s.list_relationships(ali.person_id).await.unwrap();
  assert_eq!(from_father.len(), 2);
}

#[tokio::test]
async fn individual_ids_come_from_the_sequence() {
  let s = store().await;
  let a = add(&s, "A", "X", "M", None).await;
  let b = add(&s, "B", "X", "F", None).await;

  let rel = s
    .add_relationship(a.person_id, b.person_id, RelationshipKind::Spouse, None)
    .await
    .unwrap();
  assert_eq!(rel.related_individual_id, IndividualId::numbered(2));
}

#[tokio::test]
async fn duplicate_child_is_conflict_and_rolls_back() {
  let s = store().await;
  let ali = add(&s, "Ali", "Hassan", "M", None).await;
  let yusuf = add(&s, "Yusuf", "Hassan", "M", None).await;

  s.add_relationship(ali.person_id, yusuf.person_id, RelationshipKind::Child, None)
    .await
    .unwrap();
  let err = s
    .add_relationship(ali.person_id, yusuf.person_id, RelationshipKind::Child, None)
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Conflict);

  let graph = s.complete_graph().await.unwrap();
  assert_eq!(graph.family_count(), 1);
  assert_eq!(graph.edges.len(), 2);
}

#[tokio::test]
async fn failed_operation_leaves_no_partial_writes() {
  let s = store().await;
  let ali = add(&s, "Ali", "Hassan", "M", None).await;
  let khadija = add(&s, "Khadija", "Hassan", "F", None).await;
  let maryam = add(&s, "Maryam", "Hassan", "F", None).await;
  let yusuf = add(&s, "Yusuf", "Hassan", "M", None).await;

  for wife in [&khadija, &maryam] {
    s.add_relationship(ali.person_id, wife.person_id, RelationshipKind::Spouse, None)
      .await
      .unwrap();
  }

  // Yusuf has no individual yet; the ambiguous call must not create one.
  let err = s
    .add_relationship(ali.person_id, yusuf.person_id, RelationshipKind::Child, None)
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::InvalidArgument);
  assert_eq!(s.complete_graph().await.unwrap().person_count(), 3);

  s.add_relationship(
    ali.person_id,
    yusuf.person_id,
    RelationshipKind::Child,
    Some(FamilyId::numbered(2)),
  )
  .await
  .unwrap();
  assert_eq!(s.complete_graph().await.unwrap().person_count(), 4);
}

#[tokio::test]
async fn remove_relationships() {
  let s = store().await;
  let ali = add(&s, "Ali", "Hassan", "M", None).await;
  let maryam = add(&s, "Maryam", "Hassan", "F", None).await;
  let yusuf = add(&s, "Yusuf", "Hassan", "M", None).await;

  let spouse = s
    .add_relationship(ali.person_id, maryam.person_id, RelationshipKind::Spouse, None)
    .await
    .unwrap();
  let child = s
    .add_relationship(maryam.person_id, yusuf.person_id, RelationshipKind::Child, None)
    .await
    .unwrap();

  let err = s.remove_relationship(spouse.relationship_id.clone()).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Conflict);

  s.remove_relationship(child.relationship_id.clone()).await.unwrap();
  s.remove_relationship(spouse.relationship_id).await.unwrap();

  let err = s.remove_relationship(child.relationship_id).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);
  assert!(s.list_relationships(ali.person_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_person_is_not_found() {
  let s = store().await;
  let ali = add(&s, "Ali", "Hassan", "M", None).await;
  let err = s
    .add_relationship(ali.person_id, Uuid::new_v4(), RelationshipKind::Father, None)
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);

  let err = s.ego_graph(Uuid::new_v4()).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);
}

// ─── Graphs ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn ego_graph_spans_generations() {
  let s = store().await;
  let grandpa = add(&s, "Hassan", "Ali", "M", Some("1940-01-01")).await;
  let ali = add(&s, "Ali", "Hassan", "M", Some("1970-01-01")).await;
  let maryam = add(&s, "Maryam", "Hassan", "F", None).await;
  let yusuf = add(&s, "Yusuf", "Ali", "M", Some("2000-01-01")).await;
  let loner = add(&s, "Umar", "Said", "M", None).await;

  s.add_relationship(ali.person_id, grandpa.person_id, RelationshipKind::Father, None)
    .await
    .unwrap();
  s.add_relationship(ali.person_id, maryam.person_id, RelationshipKind::Spouse, None)
    .await
    .unwrap();
  s.add_relationship(maryam.person_id, yusuf.person_id, RelationshipKind::Child, None)
    .await
    .unwrap();

  let ego = s.ego_graph(grandpa.person_id).await.unwrap();
  assert_eq!(ego.person_count(), 4);
  assert_eq!(ego.family_count(), 2);
  assert_eq!(ego.edges.len(), 5);

  let json = serde_json::to_string(&ego).unwrap();
  assert!(json.contains("\"type\":\"PERSON\""));
  assert!(json.contains("\"birthDate\":\"1940-01-01\""));

  assert!(s.ego_graph(loner.person_id).await.unwrap().nodes.is_empty());
}

// ─── Import ──────────────────────────────────────────────────────────────────

fn row(key: &str, first: &str, last: &str, dob: &str) -> ImportRow {
  ImportRow {
    household_key: Some(key.into()),
    first_name: Some(first.into()),
    last_name: Some(last.into()),
    date_of_birth: Some(dob.parse().unwrap()),
    ..Default::default()
  }
}

#[tokio::test]
async fn import_households_reports_each_household() {
  let s = store().await;
  add(&s, "Ahmed", "Bakr", "M", Some("1960-01-01")).await;
  add(&s, "Samira", "Bakr", "F", Some("1962-01-01")).await;
  add(&s, "Omar", "Bakr", "M", Some("1990-01-01")).await;
  add(&s, "Karim", "Said", "M", Some("1975-01-01")).await;
  add(&s, "Tariq", "Said", "M", Some("1977-01-01")).await;

  let rows = vec![
    row("100", "Ahmed", "Bakr", "1960-01-01"),
    row("200", "Karim", "Said", "1975-01-01"),
    row("100", "Samira", "Bakr", "1962-01-01"),
    row("200", "Tariq", "Said", "1977-01-01"),
    row("100", "Omar", "Bakr", "1990-01-01"),
    row("  ", "Nobody", "Here", "2000-01-01"),
    row("300", "Ghost", "Row", "1999-01-01"),
  ];
  let report = s.import_households(rows).await.unwrap();

  let keys: Vec<_> = report.households.iter().map(|h| h.household_key.as_str()).collect();
  assert_eq!(keys, vec!["100", "200", "300"]);
  assert_eq!(report.linked(), 1);

  let HouseholdOutcome::Linked { family_id, children, .. } = &report.households[0].outcome else {
    panic!("household 100 should link");
  };
  assert_eq!(family_id.as_str(), "@F100@");
  assert_eq!(children.len(), 1);

  assert_eq!(report.households[1].outcome, HouseholdOutcome::Skipped {
    reason: SkipReason::NoParentPair,
  });
  assert_eq!(report.households[2].outcome, HouseholdOutcome::Skipped {
    reason: SkipReason::TooFewPersons { resolved: 0 },
  });

  let graph = s.complete_graph().await.unwrap();
  assert_eq!(graph.family_count(), 1);
  assert_eq!(graph.person_count(), 3);
}

#[tokio::test]
async fn inference_policy_is_applied() {
  let s = store()
    .await
    .with_inference_policy(InferencePolicy { min_generation_gap: 40 });
  add(&s, "Ahmed", "Bakr", "M", Some("1960-01-01")).await;
  add(&s, "Samira", "Bakr", "F", Some("1962-01-01")).await;
  add(&s, "Omar", "Bakr", "M", Some("1990-01-01")).await;

  let outcome = s
    .infer_household("9".into(), vec![
      row("9", "Ahmed", "Bakr", "1960-01-01"),
      row("9", "Samira", "Bakr", "1962-01-01"),
      row("9", "Omar", "Bakr", "1990-01-01"),
    ])
    .await
    .unwrap();
  let HouseholdOutcome::Linked { children, other_adults, .. } = outcome else {
    panic!("household should link");
  };
  assert!(children.is_empty());
  assert_eq!(other_adults.len(), 1);
}

// ─── Statistics ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn statistics_count_families_and_people() {
  let s = store().await;
  let ali = add(&s, "Ali", "Hassan", "M", Some("1970-01-01")).await;
  let maryam = add(&s, "Maryam", "Hassan", "F", None).await;
  s.add_relationship(ali.person_id, maryam.person_id, RelationshipKind::Spouse, None)
    .await
    .unwrap();

  let stats = s.statistics().await.unwrap();
  assert_eq!(stats.family_count, 1);
  assert_eq!(stats.family_size_distribution[0].size, 0);
  assert_eq!(stats.gender_breakdown.len(), 2);
  assert!(stats.age_distribution.iter().any(|b| b.bucket == "Unknown" && b.count == 1));
}
