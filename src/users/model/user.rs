use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};

use crate::roles::model::Role;
use crate::shared::merge::Merge;
use crate::shared::validation::{FieldSet, FieldValue};
use crate::users::dto::user_dto::UserDto;

/// Users are equal when their ids are.
#[derive(Debug, Clone)]
pub struct User {
  pub id: i64,
  pub name: String,
  pub email: String,
  pub age: i32,
  pub created_at: DateTime<Utc>,
  pub role: Role,
}

impl PartialEq for User {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
  }
}

impl Eq for User {}

impl Hash for User {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.id.hash(state);
  }
}

/// Transient user built from a [`UserDto`] and its resolved [`Role`], before
/// it is validated and either stored or merged onto a stored [`User`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
  pub id: Option<i64>,
  pub name: Option<String>,
  pub email: Option<String>,
  pub age: i32,
  pub created_at: DateTime<Utc>,
  pub role: Role,
}

impl NewUser {
  pub fn new(dto: UserDto, role: Role) -> Self {
    Self {
      id: dto.id,
      name: dto.name,
      email: dto.email,
      age: dto.age,
      created_at: Utc::now(),
      role,
    }
  }
}

impl FieldSet for NewUser {
  fn fields(&self) -> Vec<(&'static str, FieldValue<'_>)> {
    vec![
      ("id", self.id.into()),
      ("name", self.name.as_deref().into()),
      ("email", self.email.as_deref().into()),
      ("age", self.age.into()),
      ("created_at", FieldValue::Timestamp(&self.created_at)),
      ("role", FieldValue::Reference(self.role.id)),
    ]
  }
}

impl Merge<NewUser> for User {
  const FIELDS: &'static [&'static str] =
    &["id", "name", "email", "age", "created_at", "role"];

  fn copy_field(&mut self, source: &NewUser, field: &str) -> bool {
    match field {
      "id" => source.id.map(|id| self.id = id).is_some(),
      "name" => copy_text(&mut self.name, &source.name),
      "email" => copy_text(&mut self.email, &source.email),
      "age" => {
        self.age = source.age;
        true
      }
      "created_at" => {
        self.created_at = source.created_at;
        true
      }
      "role" => {
        self.role = source.role.clone();
        true
      }
      _ => false,
    }
  }
}

fn copy_text(target: &mut String, source: &Option<String>) -> bool {
  match source {
    Some(value) => {
      target.clone_from(value);
      true
    }
    None => false,
  }
}
