use serde::Deserialize;
use validator_derive::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct GetRoleDto {
  #[validate(range(min = 1))]
  pub id: i64,
}
