use std::fmt;

use actix_web::error::InternalError;
use actix_web::{HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpError {
  pub message: String,
}

impl From<&str> for HttpError {
  fn from(message: &str) -> Self {
    Self {
      message: String::from(message),
    }
  }
}

/// Extractor error handler: malformed paths and bodies answer 400 with the
/// same JSON body as service errors.
pub fn bad_request<E>(error: E, _request: &HttpRequest) -> actix_web::Error
where
  E: fmt::Debug + fmt::Display + 'static,
{
  let response = HttpResponse::BadRequest().json(HttpError {
    message: error.to_string(),
  });
  InternalError::from_response(error, response).into()
}
