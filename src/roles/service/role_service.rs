use std::sync::Arc;

use log::error;

use crate::roles::dto::role_dto::RoleDto;
use crate::roles::model::{CreateRole, Role};
use crate::roles::repository::role_repository::{
  RoleRepository, RoleRepositoryError,
};
use crate::shared::error::ServiceError;

pub struct RoleService<RR: RoleRepository> {
  role_repository: Arc<RR>,
}

impl<RR: RoleRepository> RoleService<RR> {
  pub fn new(role_repository: Arc<RR>) -> Self {
    Self { role_repository }
  }

  pub async fn create(&self, dto: RoleDto) -> Result<RoleDto, ServiceError> {
    let role = self
      .role_repository
      .create(CreateRole { name: dto.name })
      .await
      .inspect_err(|error| log_failure("create role", error))?;
    Ok(RoleDto::from(role))
  }

  pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
    let role = self.find_entity_by_id(id).await?;
    self
      .role_repository
      .delete(&role)
      .await
      .inspect_err(|error| log_failure("delete role", error))?;
    Ok(())
  }

  /// An empty store yields an empty list.
  pub async fn find_all(&self) -> Result<Vec<RoleDto>, ServiceError> {
    let roles = self
      .role_repository
      .find_all()
      .await
      .inspect_err(|error| log_failure("list roles", error))?;
    Ok(roles.into_iter().map(RoleDto::from).collect())
  }

  pub async fn find_by_id(&self, id: i64) -> Result<RoleDto, ServiceError> {
    self.find_entity_by_id(id).await.map(RoleDto::from)
  }

  pub async fn find_entity_by_id(&self, id: i64) -> Result<Role, ServiceError> {
    self
      .role_repository
      .find_one(id)
      .await
      .inspect_err(|error| log_failure("find role", error))?
      .ok_or(ServiceError::RoleNotFound(id))
  }
}

fn log_failure(operation: &str, error: &RoleRepositoryError) {
  error!("Failed to {}: {}", operation, error);
}
