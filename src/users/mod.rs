pub mod dto;
pub mod model;
pub mod repository;
pub mod rto;
pub mod service;

use actix_web::http::header;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use dto::get_user_dto::GetUserDto;
use dto::user_dto::UserDto;
use model::user::User;
use repository::user_repository::UserRepository;
use rto::user_event_rto::UserEventRto;
use service::user_service::UserService;
use validator::Validate;

use crate::roles::dto::role_dto::RoleDto;
use crate::roles::repository::role_repository::RoleRepository;
use crate::shared::event::{EventPublisher, EventType};

pub async fn get_users<UR, RR, EP>(
  user_service: web::Data<UserService<UR, RR, EP>>,
) -> impl Responder
where
  UR: UserRepository + 'static,
  RR: RoleRepository + 'static,
  EP: EventPublisher + 'static,
{
  user_service
    .find_all()
    .await
    .map(|users| {
      HttpResponse::Ok()
        .content_type("application/json")
        .json(users)
    })
    .unwrap_or_else(|error| error.error_response())
}

pub async fn get_user<UR, RR, EP>(
  user_service: web::Data<UserService<UR, RR, EP>>,
  path: web::Path<GetUserDto>,
) -> impl Responder
where
  UR: UserRepository + 'static,
  RR: RoleRepository + 'static,
  EP: EventPublisher + 'static,
{
  // Perform validation
  if let Err(validation_errors) = path.validate() {
    // If validation fails, return a 400 error with details
    return HttpResponse::BadRequest().json(validation_errors);
  }
  user_service
    .find_by_id(path.id)
    .await
    .map(|user| {
      HttpResponse::Ok()
        .content_type("application/json")
        .json(user)
    })
    .unwrap_or_else(|error| error.error_response())
}

pub async fn create_user<UR, RR, EP>(
  user_service: web::Data<UserService<UR, RR, EP>>,
  payload: web::Json<UserDto>,
) -> impl Responder
where
  UR: UserRepository + 'static,
  RR: RoleRepository + 'static,
  EP: EventPublisher + 'static,
{
  user_service
    .create(payload.into_inner())
    .await
    .map(user_created)
    .unwrap_or_else(|error| error.error_response())
}

pub async fn update_user<UR, RR, EP>(
  user_service: web::Data<UserService<UR, RR, EP>>,
  path: web::Path<GetUserDto>,
  payload: web::Json<UserDto>,
) -> impl Responder
where
  UR: UserRepository + 'static,
  RR: RoleRepository + 'static,
  EP: EventPublisher + 'static,
{
  if let Err(validation_errors) = path.validate() {
    return HttpResponse::BadRequest().json(validation_errors);
  }
  user_service
    .update(path.id, payload.into_inner())
    .await
    .map(|user| {
      HttpResponse::Ok()
        .content_type("application/json")
        .json(user)
    })
    .unwrap_or_else(|error| error.error_response())
}

pub async fn delete_user<UR, RR, EP>(
  user_service: web::Data<UserService<UR, RR, EP>>,
  path: web::Path<GetUserDto>,
) -> impl Responder
where
  UR: UserRepository + 'static,
  RR: RoleRepository + 'static,
  EP: EventPublisher + 'static,
{
  if let Err(validation_errors) = path.validate() {
    return HttpResponse::BadRequest().json(validation_errors);
  }
  user_service
    .delete(path.id)
    .await
    .map(|_| HttpResponse::NoContent().finish())
    .unwrap_or_else(|error| error.error_response())
}

fn user_created(user: UserDto) -> HttpResponse {
  let mut response = HttpResponse::Created();
  if let Some(id) = user.id {
    response.append_header((header::LOCATION, format!("/api/users/{}", id)));
  }
  response.content_type("application/json").json(user)
}

// Transform User domain to DTO
impl From<User> for UserDto {
  fn from(user: User) -> Self {
    Self {
      id: Some(user.id),
      name: Some(user.name),
      email: Some(user.email),
      age: user.age,
      role_id: user.role.id,
    }
  }
}

impl UserEventRto {
  pub fn from_user(user: &User, event_type: EventType) -> Self {
    Self {
      id: user.id,
      name: user.name.clone(),
      email: user.email.clone(),
      age: user.age,
      created_at: user.created_at,
      role: RoleDto::from(user.role.clone()),
      event_type,
    }
  }
}
