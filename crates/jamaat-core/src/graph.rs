//! Visualisation-ready genealogy graph.
//!
//! Individuals and families both become nodes. Edges are directed pairs with
//! no type field: `spouse → family` means "is a parent in this union" and
//! `family → child` means "is a child of this union".

use std::hash::{Hash, Hasher};

use chrono::NaiveDate;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::genealogy::{FamilyId, IndividualId, Sex};

/// A node in a [`GenealogyGraph`]. Equality and hashing consider only the id
/// and the node type, so re-inserting a node with a different label is a
/// no-op.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE", rename_all_fields = "camelCase")]
pub enum GraphNode {
  Person {
    id:         IndividualId,
    label:      String,
    gender:     Option<Sex>,
    birth_date: Option<NaiveDate>,
  },
  Family {
    id: FamilyId,
  },
}

#[derive(PartialEq, Eq, Hash)]
enum NodeKey<'a> {
  Person(&'a IndividualId),
  Family(&'a FamilyId),
}

impl GraphNode {
  fn key(&self) -> NodeKey<'_> {
    match self {
      Self::Person { id, .. } => NodeKey::Person(id),
      Self::Family { id } => NodeKey::Family(id),
    }
  }

  pub fn id(&self) -> &str {
    match self {
      Self::Person { id, .. } => id.as_str(),
      Self::Family { id } => id.as_str(),
    }
  }

  pub fn is_person(&self) -> bool { matches!(self, Self::Person { .. }) }
}

impl PartialEq for GraphNode {
  fn eq(&self, other: &Self) -> bool { self.key() == other.key() }
}

impl Eq for GraphNode {}

impl Hash for GraphNode {
  fn hash<H: Hasher>(&self, state: &mut H) { self.key().hash(state) }
}

/// A directed edge between two node ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphEdge {
  pub from: String,
  pub to:   String,
}

impl GraphEdge {
  /// `spouse → family`
  pub fn spouse(spouse: &IndividualId, family: &FamilyId) -> Self {
    Self { from: spouse.to_string(), to: family.to_string() }
  }

  /// `family → child`
  pub fn child(family: &FamilyId, child: &IndividualId) -> Self {
    Self { from: family.to_string(), to: child.to_string() }
  }
}

/// Node and edge sets in first-insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenealogyGraph {
  pub nodes: IndexSet<GraphNode>,
  pub edges: IndexSet<GraphEdge>,
}

impl GenealogyGraph {
  pub fn add_node(&mut self, node: GraphNode) -> bool { self.nodes.insert(node) }

  pub fn add_edge(&mut self, edge: GraphEdge) -> bool { self.edges.insert(edge) }

  pub fn person_count(&self) -> usize {
    self.nodes.iter().filter(|n| n.is_person()).count()
  }

  pub fn family_count(&self) -> usize {
    self.nodes.len() - self.person_count()
  }

  pub fn contains_node(&self, id: &str) -> bool {
    self.nodes.iter().any(|n| n.id() == id)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn nodes_deduplicate_by_id_and_type() {
    let mut graph = GenealogyGraph::default();
    let id = IndividualId::numbered(1);

    assert!(graph.add_node(GraphNode::Person {
      id:         id.clone(),
      label:      "Amina Yusuf".into(),
      gender:     Some(Sex::F),
      birth_date: None,
    }));
    assert!(!graph.add_node(GraphNode::Person {
      id,
      label:      "Unknown".into(),
      gender:     None,
      birth_date: None,
    }));
    assert!(graph.add_node(GraphNode::Family { id: FamilyId::numbered(1) }));

    assert_eq!(graph.person_count(), 1);
    assert_eq!(graph.family_count(), 1);
  }

  #[test]
  fn edges_deduplicate_by_endpoints() {
    let mut graph = GenealogyGraph::default();
    let family = FamilyId::numbered(1);
    let child = IndividualId::numbered(3);

    assert!(graph.add_edge(GraphEdge::child(&family, &child)));
    assert!(!graph.add_edge(GraphEdge::child(&family, &child)));
    assert_eq!(graph.edges.len(), 1);
  }

  #[test]
  fn node_wire_format() {
    let person = GraphNode::Person {
      id:         IndividualId::numbered(4),
      label:      "Omar Yusuf".into(),
      gender:     Some(Sex::M),
      birth_date: NaiveDate::from_ymd_opt(1960, 3, 1),
    };
    assert_eq!(
      serde_json::to_value(&person).unwrap(),
      serde_json::json!({
        "type": "PERSON",
        "id": "@I4@",
        "label": "Omar Yusuf",
        "gender": "M",
        "birthDate": "1960-03-01",
      })
    );

    let family = GraphNode::Family { id: FamilyId::numbered(2) };
    assert_eq!(
      serde_json::to_value(&family).unwrap(),
      serde_json::json!({ "type": "FAMILY", "id": "@F2@" })
    );
  }
}
