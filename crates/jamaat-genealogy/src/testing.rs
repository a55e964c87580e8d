//! Fixtures shared by the engine's unit tests.

use chrono::{NaiveDate, Utc};
use jamaat_core::person::{Person, PersonStatus};
use uuid::Uuid;

use crate::MemoryRepository;

/// Insert a person into `repo` and return it. `dob` is `(year, month, day)`.
pub fn person(
  repo: &mut MemoryRepository,
  first: &str,
  last: Option<&str>,
  gender: Option<&str>,
  dob: Option<(i32, u32, u32)>,
) -> Person {
  let person = Person {
    person_id:     Uuid::new_v4(),
    first_name:    first.to_owned(),
    last_name:     last.map(str::to_owned),
    gender:        gender.map(str::to_owned),
    date_of_birth: dob.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
    date_of_death: None,
    email:         None,
    phone:         None,
    status:        PersonStatus::Active,
    created_at:    Utc::now(),
  };
  repo.insert_person(person.clone());
  person
}
