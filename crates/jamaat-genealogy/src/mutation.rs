//! Relationship mutation: typed father/mother/spouse/child operations over
//! the Family/FamilyChild structure.

use jamaat_core::{
  Error, Result,
  genealogy::{
    ChildRelation, Family, FamilyId, Individual, IndividualId, NewFamilyChild,
    SpouseSlot,
  },
  relationship::{Relationship, RelationshipHandle, RelationshipKind},
  repository::GenealogyRepository,
};
use uuid::Uuid;

use crate::identity::{self, allocate_family_id, linked_person, require_person};

/// Record that `related_id` is the `kind` of `person_id`, resolving (and if
/// needed creating) both individuals first.
///
/// The returned [`Relationship`] describes the related person as seen from
/// `person_id`.
pub fn add_relationship<R: GenealogyRepository>(
  repo: &mut R,
  person_id: Uuid,
  related_id: Uuid,
  kind: RelationshipKind,
  family: Option<FamilyId>,
) -> Result<Relationship> {
  if person_id == related_id {
    return Err(Error::SelfRelationship(person_id));
  }
  let person = require_person(repo, person_id)?;
  let related = require_person(repo, related_id)?;

  let individual = identity::resolve(repo, &person)?;
  let related_individual = identity::resolve(repo, &related)?;

  match kind {
    RelationshipKind::Father => {
      add_parent(repo, &individual, &related_individual, SpouseSlot::Husband)
    }
    RelationshipKind::Mother => {
      add_parent(repo, &individual, &related_individual, SpouseSlot::Wife)
    }
    RelationshipKind::Spouse => add_spouse(repo, &individual, &related_individual),
    RelationshipKind::Child => {
      add_child(repo, &individual, &related_individual, family)
    }
  }
}

/// Put `parent` into `slot` of the family `child` belongs to, creating that
/// family (and the child edge) when the child has none yet. Any previous
/// occupant of the slot is replaced.
pub fn add_parent<R: GenealogyRepository>(
  repo: &mut R,
  child: &Individual,
  parent: &Individual,
  slot: SpouseSlot,
) -> Result<Relationship> {
  let existing = repo.families_of_child(&child.individual_id)?.into_iter().next();

  let edge = match existing {
    Some(edge) => {
      let mut family = repo
        .family(&edge.family_id)?
        .ok_or_else(|| Error::FamilyNotFound(edge.family_id.clone()))?;
      family.set_slot(slot, parent.individual_id.clone());
      repo.save_family(&family)?;
      tracing::info!(
        "set parent {} in existing family {}",
        parent.individual_id,
        family.family_id
      );
      edge
    }
    None => {
      let mut family = Family::new(allocate_family_id(repo)?);
      family.set_slot(slot, parent.individual_id.clone());
      repo.save_family(&family)?;
      let edge = repo.insert_family_child(NewFamilyChild {
        family_id: family.family_id.clone(),
        child_id:  child.individual_id.clone(),
        relation:  ChildRelation::Biological,
      })?;
      tracing::info!(
        "created family {} with parent {} and child {}",
        family.family_id,
        parent.individual_id,
        child.individual_id
      );
      edge
    }
  };

  let kind = match slot {
    SpouseSlot::Husband => RelationshipKind::Father,
    SpouseSlot::Wife => RelationshipKind::Mother,
  };
  describe(
    repo,
    RelationshipHandle::Edge(edge.family_child_id),
    &parent.individual_id,
    kind,
  )
}

/// Join `a` and `b` in a family. Idempotent: an existing family with exactly
/// this spouse pair is reused.
///
/// Slots follow `a`'s sex when known; otherwise `a` takes the husband slot.
pub fn add_spouse<R: GenealogyRepository>(
  repo: &mut R,
  a: &Individual,
  b: &Individual,
) -> Result<Relationship> {
  let existing = repo
    .families_by_spouses(&a.individual_id, &b.individual_id)?
    .into_iter()
    .next();

  let family = match existing {
    Some(family) => {
      tracing::debug!("spouse pair already joined in family {}", family.family_id);
      family
    }
    None => {
      let mut family = Family::new(allocate_family_id(repo)?);
      let slot = SpouseSlot::for_sex(a.sex);
      family.set_slot(slot, a.individual_id.clone());
      family.set_slot(slot.other(), b.individual_id.clone());
      repo.save_family(&family)?;
      tracing::info!(
        "created family {} for spouses {} and {}",
        family.family_id,
        a.individual_id,
        b.individual_id
      );
      family
    }
  };

  describe(
    repo,
    RelationshipHandle::Family(family.family_id),
    &b.individual_id,
    RelationshipKind::Spouse,
  )
}

/// Add `child` to one of `parent`'s unions.
///
/// With `family` given, `parent` must be a spouse in it. Without it, a parent
/// with no union gets a new single-parent family, a parent with exactly one
/// union uses it, and a parent with several is rejected with
/// [`Error::AmbiguousUnion`].
pub fn add_child<R: GenealogyRepository>(
  repo: &mut R,
  parent: &Individual,
  child: &Individual,
  family: Option<FamilyId>,
) -> Result<Relationship> {
  let family = match family {
    Some(id) => {
      let family = repo.family(&id)?.ok_or(Error::FamilyNotFound(id))?;
      if family.slot_of(&parent.individual_id).is_none() {
        return Err(Error::NotASpouse {
          individual: parent.individual_id.clone(),
          family:     family.family_id,
        });
      }
      family
    }
    None => {
      let mut unions = repo.families_by_spouse(&parent.individual_id)?;
      match unions.len() {
        0 => {
          let mut family = Family::new(allocate_family_id(repo)?);
          family.set_slot(SpouseSlot::for_sex(parent.sex), parent.individual_id.clone());
          repo.save_family(&family)?;
          tracing::info!(
            "created single-parent family {} for {}",
            family.family_id,
            parent.individual_id
          );
          family
        }
        1 => unions.remove(0),
        _ => {
          return Err(Error::AmbiguousUnion {
            parent:     parent.individual_id.clone(),
            candidates: unions.into_iter().map(|f| f.family_id).collect(),
          });
        }
      }
    }
  };

  if let Some(edge) =
    repo.family_child_by_pair(&family.family_id, &child.individual_id)?
  {
    return Err(Error::DuplicateChild {
      family: family.family_id,
      child:  child.individual_id.clone(),
      edge:   edge.family_child_id,
    });
  }

  let edge = repo.insert_family_child(NewFamilyChild {
    family_id: family.family_id.clone(),
    child_id:  child.individual_id.clone(),
    relation:  ChildRelation::Biological,
  })?;
  tracing::info!("added child {} to family {}", child.individual_id, family.family_id);

  describe(
    repo,
    RelationshipHandle::Edge(edge.family_child_id),
    &child.individual_id,
    RelationshipKind::Child,
  )
}

/// Delete the relationship behind `handle`.
///
/// An edge handle removes one parent/child edge. A family handle removes a
/// spouse family, but only while it has no children.
pub fn remove_relationship<R: GenealogyRepository>(
  repo: &mut R,
  handle: &RelationshipHandle,
) -> Result<()> {
  let not_found = || Error::RelationshipNotFound(handle.clone());

  match handle {
    RelationshipHandle::Edge(id) => {
      repo.family_child(*id)?.ok_or_else(not_found)?;
      repo.delete_family_child(*id)?;
      tracing::info!("removed family-child edge {id}");
    }
    RelationshipHandle::Family(id) => {
      repo.family(id)?.ok_or_else(not_found)?;
      if !repo.children_of_family(id)?.is_empty() {
        return Err(Error::FamilyHasChildren(id.clone()));
      }
      repo.delete_family(id)?;
      tracing::info!("removed family {id}");
    }
  }
  Ok(())
}

/// Every parent, spouse and child relationship of a person.
///
/// A person without a linked individual has no relationships; nothing is
/// created on their behalf.
pub fn list_relationships<R: GenealogyRepository>(
  repo: &R,
  person_id: Uuid,
) -> Result<Vec<Relationship>> {
  require_person(repo, person_id)?;
  let Some(individual) = identity::linked_individual(repo, person_id)? else {
    return Ok(Vec::new());
  };
  let me = &individual.individual_id;
  let mut out = Vec::new();

  // Parents, through the families this person is a child of.
  for edge in repo.families_of_child(me)? {
    let Some(family) = repo.family(&edge.family_id)? else {
      continue;
    };
    let handle = RelationshipHandle::Edge(edge.family_child_id);
    if let Some(father) = &family.husband_id {
      out.push(describe(repo, handle.clone(), father, RelationshipKind::Father)?);
    }
    if let Some(mother) = &family.wife_id {
      out.push(describe(repo, handle, mother, RelationshipKind::Mother)?);
    }
  }

  let unions = repo.families_by_spouse(me)?;

  for family in &unions {
    if let Some(partner) = family.partner_of(me) {
      let handle = RelationshipHandle::Family(family.family_id.clone());
      out.push(describe(repo, handle, partner, RelationshipKind::Spouse)?);
    }
  }

  for family in &unions {
    for edge in repo.children_of_family(&family.family_id)? {
      let handle = RelationshipHandle::Edge(edge.family_child_id);
      out.push(describe(repo, handle, &edge.child_id, RelationshipKind::Child)?);
    }
  }

  Ok(out)
}

fn describe<R: GenealogyRepository>(
  repo: &R,
  handle: RelationshipHandle,
  related: &IndividualId,
  kind: RelationshipKind,
) -> Result<Relationship> {
  let person = linked_person(repo, related)?;
  Ok(Relationship {
    relationship_id:       handle,
    related_individual_id: related.clone(),
    related_person_id:     person.as_ref().map(|p| p.person_id),
    related_person_name:   person.as_ref().map(|p| p.full_name()),
    kind,
  })
}
