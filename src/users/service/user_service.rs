use std::sync::Arc;

use log::{debug, error};

use crate::roles::repository::role_repository::RoleRepository;
use crate::roles::service::role_service::RoleService;
use crate::shared::error::ServiceError;
use crate::shared::event::{EventPublisher, EventTopics, EventType};
use crate::shared::merge::merge;
use crate::shared::validation::validate;
use crate::users::dto::user_dto::UserDto;
use crate::users::model::user::{NewUser, User};
use crate::users::repository::user_repository::{
  UserRepository, UserRepositoryError,
};
use crate::users::rto::user_event_rto::UserEventRto;

pub struct UserService<UR, RR, EP>
where
  UR: UserRepository,
  RR: RoleRepository,
  EP: EventPublisher,
{
  user_repository: Arc<UR>,
  role_service: RoleService<RR>,
  publisher: EP,
  topics: EventTopics,
}

impl<UR, RR, EP> UserService<UR, RR, EP>
where
  UR: UserRepository,
  RR: RoleRepository,
  EP: EventPublisher,
{
  pub fn new(
    user_repository: Arc<UR>,
    role_service: RoleService<RR>,
    publisher: EP,
    topics: EventTopics,
  ) -> Self {
    Self {
      user_repository,
      role_service,
      publisher,
      topics,
    }
  }

  pub async fn create(&self, dto: UserDto) -> Result<UserDto, ServiceError> {
    let role = self.role_service.find_entity_by_id(dto.role_id).await?;
    let new_user = NewUser::new(dto, role);
    validate(&new_user)?;

    let user = self
      .user_repository
      .create(&new_user)
      .await
      .inspect_err(|error| log_failure("save user", error))?;
    self.publish(&user, EventType::Created);
    Ok(UserDto::from(user))
  }

  pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
    let user = self.find_entity_by_id(id).await?;
    self
      .user_repository
      .delete(&user)
      .await
      .inspect_err(|error| log_failure("delete user", error))?;
    self.publish(&user, EventType::Deleted);
    Ok(())
  }

  /// An empty store yields an empty list.
  pub async fn find_all(&self) -> Result<Vec<UserDto>, ServiceError> {
    let users = self
      .user_repository
      .find_all()
      .await
      .inspect_err(|error| log_failure("list users", error))?;
    Ok(users.into_iter().map(UserDto::from).collect())
  }

  pub async fn find_by_id(&self, id: i64) -> Result<UserDto, ServiceError> {
    self.find_entity_by_id(id).await.map(UserDto::from)
  }

  /// Full update: the DTO must pass the same validation as on create. Fields
  /// left null in it keep their stored value.
  pub async fn update(
    &self,
    id: i64,
    dto: UserDto,
  ) -> Result<UserDto, ServiceError> {
    let mut existing = self.find_entity_by_id(id).await?;
    let role = self.role_service.find_entity_by_id(dto.role_id).await?;
    let new_user = NewUser::new(dto, role);
    validate(&new_user)?;

    let copied = merge(&new_user, &mut existing, &["id"]);
    debug!("Merged {:?} onto user {}", copied, id);

    let user = self
      .user_repository
      .update(&existing)
      .await
      .inspect_err(|error| log_failure("update user", error))?;
    Ok(UserDto::from(user))
  }

  async fn find_entity_by_id(&self, id: i64) -> Result<User, ServiceError> {
    self
      .user_repository
      .find_one(id)
      .await
      .inspect_err(|error| log_failure("find user", error))?
      .ok_or(ServiceError::UserNotFound(id))
  }

  fn publish(&self, user: &User, event_type: EventType) {
    let event = UserEventRto::from_user(user, event_type);
    self
      .publisher
      .publish(self.topics.topic(event_type), &user.email, &event);
  }
}

fn log_failure(operation: &str, error: &UserRepositoryError) {
  error!("Failed to {}: {}", operation, error);
}
