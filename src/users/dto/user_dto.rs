use std::fmt;

use serde::{Deserialize, Serialize};

/// Missing `name`/`email` stay null and missing `age`/`role_id` become zero,
/// so both are reported by field validation rather than by the JSON layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDto {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<i64>,
  #[serde(default)]
  pub name: Option<String>,
  #[serde(default)]
  pub email: Option<String>,
  #[serde(default)]
  pub age: i32,
  #[serde(default)]
  pub role_id: i64,
}

impl fmt::Display for UserDto {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if let Some(id) = self.id {
      write!(f, "#{} ", id)?;
    }
    write!(
      f,
      "name: {}, email: {}, age: {}, role: {}",
      self.name.as_deref().unwrap_or("-"),
      self.email.as_deref().unwrap_or("-"),
      self.age,
      self.role_id
    )
  }
}
