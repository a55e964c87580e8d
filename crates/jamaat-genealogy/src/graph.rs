//! Graph rendering: ego graphs by breadth-first traversal, and the complete
//! graph of every stored individual and family.

use std::collections::{HashSet, VecDeque};

use jamaat_core::{
  Result,
  genealogy::{Family, FamilyId, Individual, IndividualId},
  graph::{GenealogyGraph, GraphEdge, GraphNode},
  repository::GenealogyRepository,
};
use uuid::Uuid;

use crate::identity::{self, linked_person, require_person};

/// Label used for individuals with no linked CRM person.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Everything reachable from `person_id` through spouse and parent/child
/// edges, in both directions.
///
/// A person that has never been linked to an individual yields an empty
/// graph.
pub fn ego_graph<R: GenealogyRepository>(
  repo: &R,
  person_id: Uuid,
) -> Result<GenealogyGraph> {
  require_person(repo, person_id)?;
  let mut graph = GenealogyGraph::default();
  let Some(root) = identity::linked_individual(repo, person_id)? else {
    return Ok(graph);
  };

  let mut seen_individuals: HashSet<IndividualId> = HashSet::new();
  let mut seen_families: HashSet<FamilyId> = HashSet::new();
  let mut queue = VecDeque::new();

  seen_individuals.insert(root.individual_id.clone());
  queue.push_back(root.individual_id);

  while let Some(current) = queue.pop_front() {
    let Some(individual) = repo.individual(&current)? else {
      tracing::warn!("skipping dangling individual {current} during traversal");
      continue;
    };
    graph.add_node(ego_node(repo, &individual)?);

    let mut touching = repo.families_by_spouse(&current)?;
    for edge in repo.families_of_child(&current)? {
      if let Some(family) = repo.family(&edge.family_id)? {
        touching.push(family);
      }
    }

    for family in touching {
      if !seen_families.insert(family.family_id.clone()) {
        continue;
      }
      expand_family(repo, &mut graph, &family, |id| {
        if seen_individuals.insert(id.clone()) {
          queue.push_back(id.clone());
        }
      })?;
    }
  }

  tracing::debug!(
    "ego graph for {person_id}: {} nodes, {} edges",
    graph.nodes.len(),
    graph.edges.len()
  );
  Ok(graph)
}

/// Emit a family node with its spouse and child edges, handing every member
/// to `visit`.
fn expand_family<R: GenealogyRepository>(
  repo: &R,
  graph: &mut GenealogyGraph,
  family: &Family,
  mut visit: impl FnMut(&IndividualId),
) -> Result<()> {
  graph.add_node(GraphNode::Family { id: family.family_id.clone() });

  for spouse in family.spouses() {
    graph.add_edge(GraphEdge::spouse(spouse, &family.family_id));
    visit(spouse);
  }
  for edge in repo.children_of_family(&family.family_id)? {
    graph.add_edge(GraphEdge::child(&family.family_id, &edge.child_id));
    visit(&edge.child_id);
  }
  Ok(())
}

fn ego_node<R: GenealogyRepository>(repo: &R, individual: &Individual) -> Result<GraphNode> {
  let label = linked_person(repo, &individual.individual_id)?
    .map(|p| p.full_name())
    .unwrap_or_else(|| UNKNOWN_LABEL.to_owned());
  Ok(person_node(individual, label))
}

fn person_node(individual: &Individual, label: String) -> GraphNode {
  GraphNode::Person {
    id: individual.individual_id.clone(),
    label,
    gender: individual.sex,
    birth_date: individual.birth_date,
  }
}

/// One node per stored individual and family, with every spouse and child
/// edge. Person nodes are labelled from the individual record itself.
pub fn complete_graph<R: GenealogyRepository>(repo: &R) -> Result<GenealogyGraph> {
  let mut graph = GenealogyGraph::default();

  for individual in repo.individuals()? {
    let label = individual.full_name();
    graph.add_node(person_node(&individual, label));
  }

  for family in repo.families()? {
    graph.add_node(GraphNode::Family { id: family.family_id.clone() });
    for spouse in family.spouses() {
      graph.add_edge(GraphEdge::spouse(spouse, &family.family_id));
    }
  }

  for edge in repo.family_children()? {
    graph.add_edge(GraphEdge::child(&edge.family_id, &edge.child_id));
  }

  tracing::debug!(
    "complete graph: {} persons, {} families, {} edges",
    graph.person_count(),
    graph.family_count(),
    graph.edges.len()
  );
  Ok(graph)
}

#[cfg(test)]
mod tests {
  use jamaat_core::{
    genealogy::{ChildRelation, NewFamilyChild, Sex, SpouseSlot},
    relationship::RelationshipKind,
  };

  use super::*;
  use crate::{MemoryRepository, mutation::add_relationship, testing::person};

  /// Grandfather + grandmother → father; father + mother → two children.
  /// Returns the repo and (grandfather, child, stranger) person ids.
  fn three_generations() -> (MemoryRepository, Uuid, Uuid, Uuid) {
    let mut repo = MemoryRepository::new();
    let grandfather = person(&mut repo, "Hassan", Some("Ali"), Some("m"), None);
    let grandmother = person(&mut repo, "Fatima", Some("Ali"), Some("f"), None);
    let father = person(&mut repo, "Ali", Some("Hassan"), Some("m"), None);
    let mother = person(&mut repo, "Maryam", Some("Hassan"), Some("f"), None);
    let son = person(&mut repo, "Yusuf", Some("Ali"), Some("m"), Some((2010, 1, 1)));
    let daughter = person(&mut repo, "Aisha", Some("Ali"), Some("f"), None);
    let stranger = person(&mut repo, "Umar", None, None, None);
    let other = person(&mut repo, "Khalid", None, None, None);

    let links = [
      (father.person_id, grandfather.person_id, RelationshipKind::Father),
      (father.person_id, grandmother.person_id, RelationshipKind::Mother),
      (father.person_id, mother.person_id, RelationshipKind::Spouse),
      (father.person_id, son.person_id, RelationshipKind::Child),
      (father.person_id, daughter.person_id, RelationshipKind::Child),
      (stranger.person_id, other.person_id, RelationshipKind::Spouse),
    ];
    for (a, b, kind) in links {
      add_relationship(&mut repo, a, b, kind, None).unwrap();
    }
    (repo, grandfather.person_id, son.person_id, stranger.person_id)
  }

  #[test]
  fn ego_graph_reaches_ancestors_descendants_and_siblings() {
    let (repo, grandfather, son, _) = three_generations();

    let from_son = ego_graph(&repo, son).unwrap();
    assert_eq!(from_son.person_count(), 6);
    assert_eq!(from_son.family_count(), 2);
    // Two spouse edges and one or two child edges per family.
    assert_eq!(from_son.edges.len(), 7);

    let from_grandfather = ego_graph(&repo, grandfather).unwrap();
    assert_eq!(from_grandfather.nodes, from_son.nodes);
    assert_eq!(from_grandfather.edges.len(), from_son.edges.len());
  }

  #[test]
  fn ego_graph_labels_and_attributes_come_from_links() {
    let (repo, _, son, _) = three_generations();
    let graph = ego_graph(&repo, son).unwrap();

    let son_id = repo.link_for_person(son).unwrap().unwrap().individual_id;
    let node = graph.nodes.iter().find(|n| n.id() == son_id.as_str()).unwrap();
    let GraphNode::Person { label, gender, birth_date, .. } = node else {
      panic!("expected a person node");
    };
    assert_eq!(label, "Yusuf Ali");
    assert_eq!(*gender, Some(Sex::M));
    assert_eq!(*birth_date, chrono::NaiveDate::from_ymd_opt(2010, 1, 1));
  }

  #[test]
  fn ego_graph_is_subset_of_complete_graph() {
    let (repo, _, son, stranger) = three_generations();
    let ego = ego_graph(&repo, son).unwrap();
    let complete = complete_graph(&repo).unwrap();

    assert!(ego.nodes.iter().all(|n| complete.contains_node(n.id())));
    assert!(ego.edges.iter().all(|e| complete.edges.contains(e)));

    let stranger_id = repo.link_for_person(stranger).unwrap().unwrap().individual_id;
    assert!(!ego.contains_node(stranger_id.as_str()));
    assert!(complete.contains_node(stranger_id.as_str()));
  }

  #[test]
  fn ego_graph_terminates_on_cycles() {
    let mut repo = MemoryRepository::new();
    let a = person(&mut repo, "A", None, Some("m"), None);
    let b = person(&mut repo, "B", None, Some("f"), None);
    add_relationship(&mut repo, a.person_id, b.person_id, RelationshipKind::Spouse, None)
      .unwrap();

    // Corrupt data: A is recorded as a child of his own union.
    let a_id = repo.link_for_person(a.person_id).unwrap().unwrap().individual_id;
    let family = repo.families_by_spouse(&a_id).unwrap().remove(0);
    repo
      .insert_family_child(NewFamilyChild {
        family_id: family.family_id.clone(),
        child_id:  a_id.clone(),
        relation:  ChildRelation::Biological,
      })
      .unwrap();

    let graph = ego_graph(&repo, a.person_id).unwrap();
    assert_eq!(graph.person_count(), 2);
    assert_eq!(graph.family_count(), 1);
    assert_eq!(graph.edges.len(), 3);
  }

  #[test]
  fn unlinked_person_has_empty_ego_graph() {
    let mut repo = MemoryRepository::new();
    let loner = person(&mut repo, "Ali", None, None, None);

    let graph = ego_graph(&repo, loner.person_id).unwrap();
    assert!(graph.nodes.is_empty());
    assert!(graph.edges.is_empty());
    assert!(repo.individuals().unwrap().is_empty());
  }

  #[test]
  fn ego_graph_labels_unlinked_individuals_unknown() {
    let mut repo = MemoryRepository::new();
    let me = person(&mut repo, "Ali", None, Some("m"), None);
    let wife = person(&mut repo, "Maryam", None, Some("f"), None);
    add_relationship(&mut repo, me.person_id, wife.person_id, RelationshipKind::Spouse, None)
      .unwrap();

    // A GEDCOM-style individual with no CRM person, attached as a child.
    let me_id = repo.link_for_person(me.person_id).unwrap().unwrap().individual_id;
    let orphan = Individual {
      individual_id: IndividualId::numbered(100),
      given_name:    "Imported".into(),
      surname:       None,
      sex:           None,
      birth_date:    None,
      death_date:    None,
      living:        true,
    };
    repo.insert_individual(&orphan).unwrap();
    let family = repo.families_by_spouse(&me_id).unwrap().remove(0);
    assert_eq!(family.slot_of(&me_id), Some(SpouseSlot::Husband));
    repo
      .insert_family_child(NewFamilyChild {
        family_id: family.family_id,
        child_id:  orphan.individual_id.clone(),
        relation:  ChildRelation::Adopted,
      })
      .unwrap();

    let graph = ego_graph(&repo, me.person_id).unwrap();
    let node = graph
      .nodes
      .iter()
      .find(|n| n.id() == orphan.individual_id.as_str())
      .unwrap();
    assert!(matches!(node, GraphNode::Person { label, .. } if label == UNKNOWN_LABEL));
  }

  #[test]
  fn complete_graph_counts_every_record() {
    let (mut repo, ..) = three_generations();
    // An individual in no family and a family with no spouses or children.
    let isolated = Individual {
      individual_id: IndividualId::numbered(100),
      given_name:    "Isolated".into(),
      surname:       None,
      sex:           None,
      birth_date:    None,
      death_date:    None,
      living:        true,
    };
    repo.insert_individual(&isolated).unwrap();
    let empty = Family::new(FamilyId::numbered(100));
    repo.save_family(&empty).unwrap();

    let graph = complete_graph(&repo).unwrap();

    assert_eq!(graph.person_count(), 9);
    assert_eq!(graph.family_count(), 4);
    assert!(graph.contains_node(isolated.individual_id.as_str()));
    assert!(graph.contains_node(empty.family_id.as_str()));
    assert_eq!(graph.person_count(), repo.individuals().unwrap().len());
    assert_eq!(graph.family_count(), repo.families().unwrap().len());

    let spouse_edges: usize =
      repo.families().unwrap().iter().map(|f| f.spouses().count()).sum();
    let child_edges = repo.family_children().unwrap().len();
    assert_eq!(graph.edges.len(), spouse_edges + child_edges);
  }
}
