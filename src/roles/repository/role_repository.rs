use std::sync::Arc;

use sqlx::Row;
use sqlx::{postgres::PgRow, Pool, Postgres};
use thiserror::Error;

use crate::roles::model::{CreateRole, Role};
use crate::shared::database::Database;

#[derive(Debug, Error)]
pub enum RoleRepositoryError {
  #[error("Database error: {0}")]
  DatabaseError(#[from] sqlx::Error),

  #[error("Other error: {0}")]
  Other(String),
}

pub trait RoleRepository {
  async fn find_one(&self, id: i64) -> Result<Option<Role>, RoleRepositoryError>;
  async fn find_all(&self) -> Result<Vec<Role>, RoleRepositoryError>;
  async fn create(
    &self,
    create_role: CreateRole,
  ) -> Result<Role, RoleRepositoryError>;
  async fn delete(&self, role: &Role) -> Result<(), RoleRepositoryError>;
}

pub struct RoleRepositoryImpl {
  pool: Arc<Pool<Postgres>>,
}

impl RoleRepositoryImpl {
  pub fn new(database: Arc<Database>) -> Self {
    Self {
      pool: database.pool.clone(),
    }
  }
}

impl RoleRepository for RoleRepositoryImpl {
  async fn find_one(&self, id: i64) -> Result<Option<Role>, RoleRepositoryError> {
    sqlx::query("SELECT id, name FROM role WHERE id = $1")
      .bind(id)
      .try_map(|row: PgRow| Role::try_from(row))
      .fetch_optional(&*self.pool)
      .await
      .map_err(RoleRepositoryError::from)
  }

  async fn find_all(&self) -> Result<Vec<Role>, RoleRepositoryError> {
    sqlx::query("SELECT id, name FROM role ORDER BY id")
      .try_map(|row: PgRow| Role::try_from(row))
      .fetch_all(&*self.pool)
      .await
      .map_err(RoleRepositoryError::from)
  }

  async fn create(
    &self,
    create_role: CreateRole,
  ) -> Result<Role, RoleRepositoryError> {
    let query = r#"
      INSERT INTO role (name)
      VALUES ($1)
      RETURNING id, name
    "#;
    sqlx::query(query)
      .bind(&create_role.name)
      .try_map(|row: PgRow| Role::try_from(row))
      .fetch_one(&*self.pool)
      .await
      .map_err(RoleRepositoryError::from)
  }

  async fn delete(&self, role: &Role) -> Result<(), RoleRepositoryError> {
    let result = sqlx::query("DELETE FROM role WHERE id = $1")
      .bind(role.id)
      .execute(&*self.pool)
      .await?;
    if result.rows_affected() == 0 {
      return Err(RoleRepositoryError::Other(format!(
        "role {} vanished before delete",
        role.id
      )));
    }
    Ok(())
  }
}

impl TryFrom<PgRow> for Role {
  type Error = sqlx::Error;

  fn try_from(row: PgRow) -> Result<Self, Self::Error> {
    Ok(Self {
      id: row.try_get("id")?,
      name: row.try_get("name")?,
    })
  }
}
