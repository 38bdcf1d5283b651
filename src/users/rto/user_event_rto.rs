use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::roles::dto::role_dto::RoleDto;
use crate::shared::event::EventType;

/// Payload published on user lifecycle topics, keyed by email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserEventRto {
  pub id: i64,
  pub name: String,
  pub email: String,
  pub age: i32,
  pub created_at: DateTime<Utc>,
  pub role: RoleDto,
  pub event_type: EventType,
}
