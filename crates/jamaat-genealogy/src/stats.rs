//! Dashboard aggregates.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use jamaat_core::{
  Result,
  repository::GenealogyRepository,
  stats::{AgeBucketCount, AgeGenderCount, FamilySizeCount, GenderCount, GenealogyStats},
};

use crate::inference::age_on;

/// Label for persons with no recorded gender or birth date.
pub const UNKNOWN: &str = "Unknown";

/// Age buckets in display order, as `(label, inclusive upper bound)`.
const AGE_BUCKETS: &[(&str, u32)] =
  &[("0-12", 12), ("13-18", 18), ("19-35", 35), ("36-60", 60), ("60+", u32::MAX)];

pub fn age_bucket(age: Option<u32>) -> &'static str {
  let Some(age) = age else {
    return UNKNOWN;
  };
  AGE_BUCKETS
    .iter()
    .find(|(_, upper)| age <= *upper)
    .map_or(UNKNOWN, |(label, _)| *label)
}

/// Display position of a bucket label; `Unknown` sorts last.
fn bucket_rank(bucket: &str) -> usize {
  AGE_BUCKETS
    .iter()
    .position(|(label, _)| *label == bucket)
    .unwrap_or(AGE_BUCKETS.len())
}

pub fn statistics<R: GenealogyRepository>(repo: &R, today: NaiveDate) -> Result<GenealogyStats> {
  let families = repo.families()?;

  let mut children_per_family: BTreeMap<_, usize> =
    families.iter().map(|f| (f.family_id.clone(), 0)).collect();
  for edge in repo.family_children()? {
    if let Some(count) = children_per_family.get_mut(&edge.family_id) {
      *count += 1;
    }
  }
  let mut sizes: BTreeMap<usize, usize> = BTreeMap::new();
  for count in children_per_family.into_values() {
    *sizes.entry(count).or_default() += 1;
  }

  let persons = repo.persons()?;

  let mut genders: BTreeMap<String, usize> = BTreeMap::new();
  let mut ages: BTreeMap<&'static str, usize> = BTreeMap::new();
  let mut ages_by_gender: BTreeMap<(usize, &'static str, String), usize> = BTreeMap::new();
  for person in &persons {
    let gender = person
      .gender
      .as_deref()
      .map(str::trim)
      .filter(|g| !g.is_empty())
      .unwrap_or(UNKNOWN);
    *genders.entry(gender.to_owned()).or_default() += 1;

    let age = person.date_of_birth.and_then(|dob| age_on(dob, today));
    let bucket = age_bucket(age);
    *ages.entry(bucket).or_default() += 1;
    *ages_by_gender
      .entry((bucket_rank(bucket), bucket, gender.to_owned()))
      .or_default() += 1;
  }

  let age_distribution = AGE_BUCKETS
    .iter()
    .map(|(label, _)| *label)
    .chain([UNKNOWN])
    .filter_map(|bucket| {
      ages.get(bucket).map(|&count| AgeBucketCount { bucket: bucket.to_owned(), count })
    })
    .collect();

  Ok(GenealogyStats {
    family_count: families.len(),
    family_size_distribution: sizes
      .into_iter()
      .map(|(size, count)| FamilySizeCount { size, count })
      .collect(),
    gender_breakdown: genders
      .into_iter()
      .map(|(gender, count)| GenderCount { gender, count })
      .collect(),
    age_distribution,
    age_gender_distribution: ages_by_gender
      .into_iter()
      .map(|((_, bucket, gender), count)| AgeGenderCount {
        bucket: bucket.to_owned(),
        gender,
        count,
      })
      .collect(),
  })
}

#[cfg(test)]
mod tests {
  use jamaat_core::relationship::RelationshipKind;

  use super::*;
  use crate::{MemoryRepository, mutation::add_relationship, testing::person};

  #[test]
  fn buckets_have_inclusive_upper_bounds() {
    assert_eq!(age_bucket(Some(0)), "0-12");
    assert_eq!(age_bucket(Some(12)), "0-12");
    assert_eq!(age_bucket(Some(13)), "13-18");
    assert_eq!(age_bucket(Some(60)), "36-60");
    assert_eq!(age_bucket(Some(61)), "60+");
    assert_eq!(age_bucket(None), UNKNOWN);
  }

  #[test]
  fn statistics_cover_families_genders_and_ages() {
    let mut repo = MemoryRepository::new();
    let dad = person(&mut repo, "Ali", None, Some("M"), Some((1970, 3, 1)));
    let mum = person(&mut repo, "Maryam", None, Some("F"), Some((1975, 3, 1)));
    let kid = person(&mut repo, "Yusuf", None, Some("M"), Some((2015, 3, 1)));
    let a = person(&mut repo, "Umar", None, None, None);
    let b = person(&mut repo, "Khadija", None, Some("F"), Some((2007, 3, 1)));

    add_relationship(&mut repo, dad.person_id, mum.person_id, RelationshipKind::Spouse, None)
      .unwrap();
    add_relationship(&mut repo, dad.person_id, kid.person_id, RelationshipKind::Child, None)
      .unwrap();
    add_relationship(&mut repo, a.person_id, b.person_id, RelationshipKind::Spouse, None)
      .unwrap();

    let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let stats = statistics(&repo, today).unwrap();

    assert_eq!(stats.family_count, 2);
    assert_eq!(stats.family_size_distribution, vec![
      FamilySizeCount { size: 0, count: 1 },
      FamilySizeCount { size: 1, count: 1 },
    ]);
    assert_eq!(stats.gender_breakdown, vec![
      GenderCount { gender: "F".into(), count: 2 },
      GenderCount { gender: "M".into(), count: 2 },
      GenderCount { gender: UNKNOWN.into(), count: 1 },
    ]);
    assert_eq!(stats.age_distribution, vec![
      AgeBucketCount { bucket: "0-12".into(), count: 1 },
      AgeBucketCount { bucket: "13-18".into(), count: 1 },
      AgeBucketCount { bucket: "36-60".into(), count: 2 },
      AgeBucketCount { bucket: UNKNOWN.into(), count: 1 },
    ]);
    let age_gender = |bucket: &str, gender: &str, count| AgeGenderCount {
      bucket: bucket.into(),
      gender: gender.into(),
      count,
    };
    assert_eq!(stats.age_gender_distribution, vec![
      age_gender("0-12", "M", 1),
      age_gender("13-18", "F", 1),
      age_gender("36-60", "F", 1),
      age_gender("36-60", "M", 1),
      age_gender(UNKNOWN, UNKNOWN, 1),
    ]);
  }

  #[test]
  fn empty_repository_has_empty_statistics() {
    let repo = MemoryRepository::new();
    let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    assert_eq!(statistics(&repo, today).unwrap(), GenealogyStats::default());
  }
}
