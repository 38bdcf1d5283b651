use std::hash::{Hash, Hasher};

/// Roles are equal when their ids are.
#[derive(Debug, Clone)]
pub struct Role {
  pub id: i64,
  pub name: String,
}

impl PartialEq for Role {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
  }
}

impl Eq for Role {}

impl Hash for Role {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.id.hash(state);
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRole {
  pub name: String,
}
