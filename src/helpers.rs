#[cfg(test)]
pub mod tests {
  use actix_web::{http::StatusCode, HttpRequest, Responder};
  use fake::faker::internet::en::SafeEmail;
  use fake::faker::name::en::Name;
  use fake::Fake;
  use serde::de::DeserializeOwned;

  use crate::roles::model::Role;
  use crate::shared::config::Config;
  use crate::users::dto::user_dto::UserDto;

  /// Explicit values, independent of the process environment.
  pub fn test_config() -> Config {
    Config {
      database_url: String::from("postgres://localhost/unused"),
      database_max_connections: 1,
      run_migrations: false,
      server_address: String::from("127.0.0.1:0"),
      kafka_hosts: Vec::new(),
      user_created_topic: String::from("user.created"),
      user_deleted_topic: String::from("user.deleted"),
      rate_limit_per_second: 100,
      rate_limit_burst: 100,
    }
  }

  pub fn role(id: i64, name: &str) -> Role {
    Role {
      id,
      name: String::from(name),
    }
  }

  pub fn fake_user_dto(role_id: i64) -> UserDto {
    UserDto {
      id: None,
      name: Some(Name().fake()),
      email: Some(SafeEmail().fake()),
      age: (18..90).fake::<i32>(),
      role_id,
    }
  }

  pub async fn parse_http_response<T: DeserializeOwned>(
    responder: impl Responder,
    request: &HttpRequest,
    status_code: StatusCode,
  ) -> T {
    // Convert the `Responder` into an HttpResponse
    let http_response = responder.respond_to(request);

    // Wrap the HttpResponse in a ServiceResponse so that test utilities can work with it
    let service_response =
      actix_web::test::TestRequest::default().to_srv_response(http_response);

    let service_status_code = service_response.status();
    let body_bytes = actix_web::test::read_body(service_response).await;
    let body_string = String::from_utf8(body_bytes.to_vec())
      .expect("Response body contains invalid UTF-8");

    assert_eq!(service_status_code, status_code, "body: {}", body_string);

    serde_json::from_str(&body_string)
      .expect("Failed to deserialize response body")
  }

  pub fn response_status(
    responder: impl Responder,
    request: &HttpRequest,
  ) -> StatusCode {
    responder.respond_to(request).status()
  }
}
