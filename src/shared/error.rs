use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::roles::repository::role_repository::RoleRepositoryError;
use crate::shared::http_error::HttpError;
use crate::users::repository::user_repository::UserRepositoryError;

#[derive(Debug, Error)]
pub enum ServiceError {
  #[error("Field {0} is empty")]
  EmptyField(String),

  #[error("User with id {0} not found")]
  UserNotFound(i64),

  #[error("Role with id {0} not found")]
  RoleNotFound(i64),

  #[error(transparent)]
  UserRepository(#[from] UserRepositoryError),

  #[error(transparent)]
  RoleRepository(#[from] RoleRepositoryError),
}

impl ServiceError {
  pub fn empty_field(field: &str) -> Self {
    Self::EmptyField(String::from(field))
  }

  /// Lookup misses and validation failures are the caller's to fix.
  pub fn is_client_error(&self) -> bool {
    matches!(
      self,
      Self::EmptyField(_) | Self::UserNotFound(_) | Self::RoleNotFound(_)
    )
  }
}

impl ResponseError for ServiceError {
  fn status_code(&self) -> StatusCode {
    if self.is_client_error() {
      StatusCode::BAD_REQUEST
    } else {
      StatusCode::INTERNAL_SERVER_ERROR
    }
  }

  fn error_response(&self) -> HttpResponse {
    // Storage details stay in the logs.
    let body = if self.is_client_error() {
      HttpError {
        message: self.to_string(),
      }
    } else {
      HttpError::from("Internal server error")
    };
    HttpResponse::build(self.status_code())
      .content_type("application/json")
      .json(body)
  }
}
