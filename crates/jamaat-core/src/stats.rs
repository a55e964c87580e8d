//! Dashboard aggregates over the genealogy data.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilySizeCount {
  /// Number of children in the family.
  pub size:  usize,
  pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeBucketCount {
  pub bucket: String,
  pub count:  usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenderCount {
  pub gender: String,
  pub count:  usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeGenderCount {
  pub bucket: String,
  pub gender: String,
  pub count:  usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenealogyStats {
  pub family_count:             usize,
  /// Sorted by `size`, including childless families.
  pub family_size_distribution: Vec<FamilySizeCount>,
  pub gender_breakdown:         Vec<GenderCount>,
  pub age_distribution:         Vec<AgeBucketCount>,
  /// Bucket order first, then gender.
  pub age_gender_distribution:  Vec<AgeGenderCount>,
}
