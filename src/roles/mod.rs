pub mod dto;
pub mod model;
pub mod repository;
pub mod service;

use actix_web::http::header;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use dto::get_role_dto::GetRoleDto;
use dto::role_dto::RoleDto;
use model::Role;
use repository::role_repository::RoleRepository;
use service::role_service::RoleService;
use validator::Validate;

pub async fn get_roles<RR: RoleRepository + 'static>(
  role_service: web::Data<RoleService<RR>>,
) -> impl Responder {
  role_service
    .find_all()
    .await
    .map(|roles| {
      HttpResponse::Ok()
        .content_type("application/json")
        .json(roles)
    })
    .unwrap_or_else(|error| error.error_response())
}

pub async fn get_role<RR: RoleRepository + 'static>(
  role_service: web::Data<RoleService<RR>>,
  path: web::Path<GetRoleDto>,
) -> impl Responder {
  // Perform validation
  if let Err(validation_errors) = path.validate() {
    return HttpResponse::BadRequest().json(validation_errors);
  }
  role_service
    .find_by_id(path.id)
    .await
    .map(|role| {
      HttpResponse::Ok()
        .content_type("application/json")
        .json(role)
    })
    .unwrap_or_else(|error| error.error_response())
}

pub async fn create_role<RR: RoleRepository + 'static>(
  role_service: web::Data<RoleService<RR>>,
  payload: web::Json<RoleDto>,
) -> impl Responder {
  role_service
    .create(payload.into_inner())
    .await
    .map(role_created)
    .unwrap_or_else(|error| error.error_response())
}

pub async fn delete_role<RR: RoleRepository + 'static>(
  role_service: web::Data<RoleService<RR>>,
  path: web::Path<GetRoleDto>,
) -> impl Responder {
  if let Err(validation_errors) = path.validate() {
    return HttpResponse::BadRequest().json(validation_errors);
  }
  role_service
    .delete(path.id)
    .await
    .map(|_| HttpResponse::NoContent().finish())
    .unwrap_or_else(|error| error.error_response())
}

fn role_created(role: RoleDto) -> HttpResponse {
  let mut response = HttpResponse::Created();
  if let Some(id) = role.id {
    response.append_header((header::LOCATION, format!("/api/role/{}", id)));
  }
  response.content_type("application/json").json(role)
}

// Transform Role domain to DTO
impl From<Role> for RoleDto {
  fn from(role: Role) -> Self {
    Self {
      id: Some(role.id),
      name: role.name,
    }
  }
}
