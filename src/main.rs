mod console;
mod helpers;
mod roles;
mod shared;
mod users;

use std::fmt::Display;
use std::io;
use std::sync::Arc;

use actix_governor::governor::middleware::NoOpMiddleware;
use actix_governor::{
  Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
};
use actix_web::error::{JsonPayloadError, PathError};
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use clap::Parser;
use console::Console;
use log::info;
use roles::repository::role_repository::{RoleRepository, RoleRepositoryImpl};
use roles::service::role_service::RoleService;
use roles::{create_role, delete_role, get_role, get_roles};
use shared::config::Config;
use shared::database::Database;
use shared::event::{EventPublisher, EventTopics, Publisher};
use shared::http_error::bad_request;
use users::repository::user_repository::{UserRepository, UserRepositoryImpl};
use users::service::user_service::UserService;
use users::{create_user, delete_user, get_user, get_users, update_user};

/// Users and roles over REST, or over an interactive console.
#[derive(Parser, Debug)]
#[command(name = "user-service", version)]
struct Cli {
  /// Run the interactive console instead of the HTTP server
  #[arg(long)]
  console: bool,
}

#[actix_web::main]
async fn main() -> io::Result<()> {
  dotenvy::dotenv().ok();
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
    .init();

  let cli = Cli::parse();
  let settings = Config::default();

  let database = Database::new(&settings).await.map_err(startup_error)?;
  if settings.run_migrations {
    database.migrate().await.map_err(startup_error)?;
    info!("Database migrations applied");
  }
  let database = Arc::new(database);
  let publisher = Publisher::from_config(&settings);

  if cli.console {
    let (user_service, role_service) = services(&database, publisher, &settings);
    return Console::new(
      &user_service,
      &role_service,
      io::stdin().lock(),
      io::stdout(),
    )
    .run()
    .await;
  }

  let server_address = settings.server_address.clone();
  let governor_config = rate_limit(&settings);
  info!("Listening on http://{}", server_address);

  HttpServer::new(move || {
    let (user_service, role_service) =
      services(&database, publisher.clone(), &settings);
    App::new()
      .wrap(Logger::default())
      .configure(|cfg| config(cfg, user_service, role_service, &governor_config))
  })
  .bind(server_address)?
  .run()
  .await
}

type PgUserService = UserService<UserRepositoryImpl, RoleRepositoryImpl, Publisher>;

fn services(
  database: &Arc<Database>,
  publisher: Publisher,
  settings: &Config,
) -> (PgUserService, RoleService<RoleRepositoryImpl>) {
  let role_repository = Arc::new(RoleRepositoryImpl::new(database.clone()));
  let user_service = UserService::new(
    Arc::new(UserRepositoryImpl::new(database.clone())),
    RoleService::new(role_repository.clone()),
    publisher,
    EventTopics::from(settings),
  );
  (user_service, RoleService::new(role_repository))
}

fn startup_error(error: impl Display) -> io::Error {
  io::Error::new(io::ErrorKind::Other, error.to_string())
}

type RateLimit = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>;

/// Built once and shared by every worker, so the limit holds per peer IP
/// across the whole server.
fn rate_limit(settings: &Config) -> RateLimit {
  // Both values are clamped to at least one by `Config`, so the builder
  // always yields a config.
  GovernorConfigBuilder::default()
    .requests_per_second(settings.rate_limit_per_second)
    .burst_size(settings.rate_limit_burst)
    .finish()
    .unwrap()
}

// Function to initialize the App
fn config<UR, RR, EP>(
  config: &mut web::ServiceConfig,
  user_service: UserService<UR, RR, EP>,
  role_service: RoleService<RR>,
  governor_config: &RateLimit,
) where
  UR: UserRepository + 'static,
  RR: RoleRepository + 'static,
  EP: EventPublisher + 'static,
{
  config
    .app_data(web::Data::new(user_service))
    .app_data(web::Data::new(role_service))
    .app_data(web::PathConfig::default().error_handler(bad_request::<PathError>))
    .app_data(web::JsonConfig::default().error_handler(bad_request::<JsonPayloadError>))
    .service(
      web::scope("/api")
        .wrap(Governor::new(governor_config))
        .service(
          web::scope("/users")
            .route("", web::get().to(get_users::<UR, RR, EP>))
            .route("", web::post().to(create_user::<UR, RR, EP>))
            .route("/{id}", web::get().to(get_user::<UR, RR, EP>))
            .route("/{id}", web::put().to(update_user::<UR, RR, EP>))
            .route("/{id}", web::delete().to(delete_user::<UR, RR, EP>)),
        )
        .service(
          web::scope("/role")
            .route("", web::get().to(get_roles::<RR>))
            .route("", web::post().to(create_role::<RR>))
            .route("/{id}", web::get().to(get_role::<RR>))
            .route("/{id}", web::delete().to(delete_role::<RR>)),
        ),
    );
}
