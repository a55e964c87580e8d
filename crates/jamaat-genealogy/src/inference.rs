//! Household inference: deriving a family from rows that share a household
//! key, using age and gender alone.
//!
//! The heuristic is best-effort. Households that cannot be interpreted are
//! reported as [`HouseholdOutcome::Skipped`]; only storage failures surface
//! as errors.

use chrono::NaiveDate;
use indexmap::IndexMap;
use jamaat_core::{
  Result,
  genealogy::{
    ChildRelation, Family, FamilyId, IndividualId, NewFamilyChild, Sex, SpouseSlot,
  },
  household::{HouseholdOutcome, ImportRow, InferencePolicy, SkipReason},
  person::Person,
  repository::GenealogyRepository,
};

use crate::identity;

/// Whole years between `date_of_birth` and `today`; `None` for births in the
/// future.
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> Option<u32> {
  today.years_since(date_of_birth)
}

/// Cluster rows by trimmed household key, preserving first-seen order. Rows
/// with a blank key are dropped.
pub fn group_households(rows: Vec<ImportRow>) -> IndexMap<String, Vec<ImportRow>> {
  let mut groups: IndexMap<String, Vec<ImportRow>> = IndexMap::new();
  for row in rows {
    let Some(key) = row.household().map(str::to_owned) else {
      tracing::debug!("ignoring row {:?} without household key", row.row_number);
      continue;
    };
    groups.entry(key).or_default().push(row);
  }
  groups
}

/// Find the CRM person an import row refers to: exact email first, then
/// exact first name, last name and date of birth.
pub fn resolve_row<R: GenealogyRepository>(
  repo: &R,
  row: &ImportRow,
) -> Result<Option<Person>> {
  if let Some(email) = non_blank(row.email.as_deref()) {
    if let Some(person) = repo.person_by_email(email)? {
      return Ok(Some(person));
    }
  }
  if let Some(first_name) = non_blank(row.first_name.as_deref()) {
    return repo.person_by_name_and_birth_date(
      first_name,
      row.last_name.as_deref(),
      row.date_of_birth,
    );
  }
  Ok(None)
}

fn non_blank(s: Option<&str>) -> Option<&str> { s.filter(|s| !s.trim().is_empty()) }

struct Member {
  person: Person,
  age:    Option<u32>,
  sex:    Option<Sex>,
}

/// Elect parents and children among the rows of one household and record the
/// result as a family keyed `@F<household_key>@`.
pub fn infer_household<R: GenealogyRepository>(
  repo: &mut R,
  household_key: &str,
  rows: &[ImportRow],
  policy: &InferencePolicy,
  today: NaiveDate,
) -> Result<HouseholdOutcome> {
  let Ok(family_id) = FamilyId::for_household(household_key) else {
    tracing::warn!("skipping household {household_key:?}: key is not a valid family id");
    return Ok(skipped(SkipReason::InvalidHouseholdKey));
  };

  // 1. Resolve rows to persons, once per person.
  let mut members: Vec<Member> = Vec::new();
  for row in rows {
    let Some(person) = resolve_row(repo, row)? else {
      tracing::debug!(
        "household {household_key}: row {:?} matches no person",
        row.row_number
      );
      continue;
    };
    if members.iter().any(|m| m.person.person_id == person.person_id) {
      continue;
    }
    members.push(Member {
      age: person.date_of_birth.and_then(|dob| age_on(dob, today)),
      sex: person.gender.as_deref().and_then(Sex::from_gender),
      person,
    });
  }

  if members.len() < 2 {
    tracing::warn!(
      "skipping household {household_key}: {} person(s) resolved",
      members.len()
    );
    return Ok(skipped(SkipReason::TooFewPersons { resolved: members.len() }));
  }

  // 2. Eldest first, unknown ages last.
  members.sort_by_key(|m| std::cmp::Reverse(m.age.map_or(-1, i64::from)));

  // 3. Parent election.
  let Some((father, mother)) = elect_parents(&members) else {
    tracing::warn!("skipping household {household_key}: no valid male-female parent pair");
    return Ok(skipped(SkipReason::NoParentPair));
  };

  // 4. Classification.
  let youngest_parent =
    members[father].age.unwrap_or(u32::MAX).min(members[mother].age.unwrap_or(u32::MAX));
  let mut children = Vec::new();
  let mut other_adults = Vec::new();
  for (i, member) in members.iter().enumerate() {
    if i == father || i == mother {
      continue;
    }
    let is_child = member
      .age
      .and_then(|age| youngest_parent.checked_sub(age))
      .is_some_and(|gap| gap >= policy.min_generation_gap);
    if is_child {
      children.push(i);
    } else {
      other_adults.push(i);
    }
  }

  // 5. Family, keyed by household. An existing family is only reused when
  // its spouse slots are empty or already hold the elected parents.
  let existing = repo.family(&family_id)?;
  if let Some(family) = &existing {
    let fits = slot_fits(repo, family.husband_id.as_ref(), &members[father].person)?
      && slot_fits(repo, family.wife_id.as_ref(), &members[mother].person)?;
    if !fits {
      tracing::warn!(
        "skipping household {household_key}: family {family_id} already belongs to other spouses"
      );
      return Ok(skipped(SkipReason::FamilyIdTaken { family_id }));
    }
  }

  let father_individual = identity::resolve(repo, &members[father].person)?;
  let mother_individual = identity::resolve(repo, &members[mother].person)?;

  let mut family = match existing {
    Some(existing) => existing,
    None => {
      tracing::info!("creating family {family_id} for household {household_key}");
      Family::new(family_id.clone())
    }
  };
  family.set_slot(SpouseSlot::Husband, father_individual.individual_id.clone());
  family.set_slot(SpouseSlot::Wife, mother_individual.individual_id.clone());
  repo.save_family(&family)?;

  // 6. Child edges.
  let mut child_ids = Vec::with_capacity(children.len());
  for &i in &children {
    let child = identity::resolve(repo, &members[i].person)?;
    if repo.family_child_by_pair(&family_id, &child.individual_id)?.is_none() {
      repo.insert_family_child(NewFamilyChild {
        family_id: family_id.clone(),
        child_id:  child.individual_id.clone(),
        relation:  ChildRelation::Biological,
      })?;
    }
    child_ids.push(child.individual_id);
  }

  for &i in &other_adults {
    let adult = &members[i].person;
    let anchor = if same_surname(adult, &members[mother].person) {
      &members[mother].person
    } else {
      &members[father].person
    };
    tracing::info!(
      "household {household_key}: {} observed as in-law of {}",
      adult.first_name,
      anchor.first_name
    );
  }

  tracing::info!(
    "household {household_key}: linked family {family_id} with {} child(ren)",
    child_ids.len()
  );
  Ok(HouseholdOutcome::Linked {
    family_id,
    father: father_individual.individual_id,
    mother: mother_individual.individual_id,
    children: child_ids,
    other_adults: other_adults.iter().map(|&i| members[i].person.person_id).collect(),
  })
}

/// Indices of `(father, mother)` in `members`, which must be sorted eldest
/// first.
fn elect_parents(members: &[Member]) -> Option<(usize, usize)> {
  match (members[0].sex, members[1].sex) {
    (Some(Sex::M), Some(Sex::F)) => return Some((0, 1)),
    (Some(Sex::F), Some(Sex::M)) => return Some((1, 0)),
    _ => {}
  }
  let father = members.iter().position(|m| m.sex == Some(Sex::M))?;
  let mother = members.iter().position(|m| m.sex == Some(Sex::F))?;
  Some((father, mother))
}

/// Whether a spouse slot is empty or already holds `person`'s individual.
fn slot_fits<R: GenealogyRepository>(
  repo: &R,
  slot: Option<&IndividualId>,
  person: &Person,
) -> Result<bool> {
  let Some(occupant) = slot else {
    return Ok(true);
  };
  Ok(
    repo
      .link_for_person(person.person_id)?
      .is_some_and(|link| &link.individual_id == occupant),
  )
}

fn same_surname(a: &Person, b: &Person) -> bool {
  match (&a.last_name, &b.last_name) {
    (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
    _ => false,
  }
}

fn skipped(reason: SkipReason) -> HouseholdOutcome { HouseholdOutcome::Skipped { reason } }
