//! Identity resolution: mapping CRM persons onto genealogy individuals.
//!
//! Individuals are created lazily: the first relationship operation or
//! inference pass touching a person creates its individual and the link.

use chrono::Utc;
use jamaat_core::{
  Error, Result,
  genealogy::{FamilyId, Individual, IndividualId, PersonIndividualLink, Sequence, Sex},
  person::Person,
  repository::GenealogyRepository,
};
use uuid::Uuid;

/// Recorded as `linked_by` on links the engine creates itself.
pub const SYSTEM_ACTOR: &str = "SYSTEM";

/// Recorded as `link_reason` on links the engine creates itself.
pub const AUTO_LINK_REASON: &str = "auto-created for relationship management";

/// Load a person or fail with [`Error::PersonNotFound`].
pub fn require_person<R: GenealogyRepository>(repo: &R, id: Uuid) -> Result<Person> {
  repo.person(id)?.ok_or(Error::PersonNotFound(id))
}

/// The individual linked to `person`, if any. Never creates anything.
pub fn linked_individual<R: GenealogyRepository>(
  repo: &R,
  person_id: Uuid,
) -> Result<Option<Individual>> {
  let Some(link) = repo.link_for_person(person_id)? else {
    return Ok(None);
  };
  repo
    .individual(&link.individual_id)?
    .map(Some)
    .ok_or(Error::IndividualNotFound(link.individual_id))
}

/// The CRM person linked to an individual, if any.
pub fn linked_person<R: GenealogyRepository>(
  repo: &R,
  individual_id: &IndividualId,
) -> Result<Option<Person>> {
  match repo.link_for_individual(individual_id)? {
    Some(link) => repo.person(link.person_id),
    None => Ok(None),
  }
}

/// Return the individual linked to `person`, creating and linking one first
/// if none exists.
pub fn resolve<R: GenealogyRepository>(repo: &mut R, person: &Person) -> Result<Individual> {
  if let Some(individual) = linked_individual(repo, person.person_id)? {
    return Ok(individual);
  }

  let individual = Individual {
    individual_id: allocate_individual_id(repo)?,
    given_name:    person.first_name.clone(),
    surname:       person.last_name.clone(),
    sex:           person.gender.as_deref().and_then(Sex::from_gender),
    birth_date:    person.date_of_birth,
    death_date:    person.date_of_death,
    living:        person.date_of_death.is_none(),
  };
  repo.insert_individual(&individual)?;

  repo.insert_link(&PersonIndividualLink {
    person_id:     person.person_id,
    individual_id: individual.individual_id.clone(),
    linked_by:     SYSTEM_ACTOR.to_owned(),
    link_reason:   Some(AUTO_LINK_REASON.to_owned()),
    linked_at:     Utc::now(),
  })?;

  tracing::info!(
    "created individual {} for person {}",
    individual.individual_id,
    person.person_id
  );
  Ok(individual)
}

/// Draw the next free `@I<n>@` from the individual sequence.
///
/// Candidates that are already taken (e.g. rows imported with explicit ids)
/// are skipped.
pub fn allocate_individual_id<R: GenealogyRepository>(repo: &mut R) -> Result<IndividualId> {
  loop {
    let id = IndividualId::numbered(repo.next_in_sequence(Sequence::Individual)?);
    if repo.individual(&id)?.is_none() {
      return Ok(id);
    }
  }
}

/// Draw the next free `@F<n>@` from the family sequence.
pub fn allocate_family_id<R: GenealogyRepository>(repo: &mut R) -> Result<FamilyId> {
  loop {
    let id = FamilyId::numbered(repo.next_in_sequence(Sequence::Family)?);
    if repo.family(&id)?.is_none() {
      return Ok(id);
    }
  }
}
