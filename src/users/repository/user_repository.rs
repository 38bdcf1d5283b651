use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::{postgres::PgRow, Pool, Postgres};
use thiserror::Error;

use crate::roles::model::Role;
use crate::shared::database::Database;
use crate::users::model::user::{NewUser, User};

#[derive(Debug, Error)]
pub enum UserRepositoryError {
  #[error("Database error: {0}")]
  DatabaseError(#[from] sqlx::Error),

  #[error("Other error: {0}")]
  Other(String),
}

pub trait UserRepository {
  async fn find_one(&self, id: i64) -> Result<Option<User>, UserRepositoryError>;
  async fn find_all(&self) -> Result<Vec<User>, UserRepositoryError>;
  async fn create(&self, new_user: &NewUser) -> Result<User, UserRepositoryError>;
  async fn update(&self, user: &User) -> Result<User, UserRepositoryError>;
  async fn delete(&self, user: &User) -> Result<(), UserRepositoryError>;
}

pub struct UserRepositoryImpl {
  pool: Arc<Pool<Postgres>>,
}

impl UserRepositoryImpl {
  pub fn new(database: Arc<Database>) -> Self {
    Self {
      pool: database.pool.clone(),
    }
  }
}

const SELECT_USERS: &str = r#"
  SELECT u.id, u.name, u.email, u.age, u.created_at,
         r.id AS role_id, r.name AS role_name
  FROM users u
  JOIN role r ON r.id = u.role_id
"#;

impl UserRepository for UserRepositoryImpl {
  async fn find_one(&self, id: i64) -> Result<Option<User>, UserRepositoryError> {
    sqlx::query(&format!("{} WHERE u.id = $1", SELECT_USERS))
      .bind(id)
      .try_map(|row: PgRow| User::try_from(row))
      .fetch_optional(&*self.pool)
      .await
      .map_err(UserRepositoryError::from)
  }

  async fn find_all(&self) -> Result<Vec<User>, UserRepositoryError> {
    sqlx::query(&format!("{} ORDER BY u.id", SELECT_USERS))
      .try_map(|row: PgRow| User::try_from(row))
      .fetch_all(&*self.pool)
      .await
      .map_err(UserRepositoryError::from)
  }

  async fn create(&self, new_user: &NewUser) -> Result<User, UserRepositoryError> {
    let query = r#"
      WITH saved AS (
        INSERT INTO users (name, email, age, created_at, role_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, email, age, created_at, role_id
      )
      SELECT saved.id, saved.name, saved.email, saved.age, saved.created_at,
             r.id AS role_id, r.name AS role_name
      FROM saved
      JOIN role r ON r.id = saved.role_id
    "#;
    sqlx::query(query)
      .bind(&new_user.name)
      .bind(&new_user.email)
      .bind(new_user.age)
      .bind(new_user.created_at)
      .bind(new_user.role.id)
      .try_map(|row: PgRow| User::try_from(row))
      .fetch_one(&*self.pool)
      .await
      .map_err(UserRepositoryError::from)
  }

  async fn update(&self, user: &User) -> Result<User, UserRepositoryError> {
    let query = r#"
      WITH saved AS (
        UPDATE users
        SET name = $2, email = $3, age = $4, created_at = $5, role_id = $6
        WHERE id = $1
        RETURNING id, name, email, age, created_at, role_id
      )
      SELECT saved.id, saved.name, saved.email, saved.age, saved.created_at,
             r.id AS role_id, r.name AS role_name
      FROM saved
      JOIN role r ON r.id = saved.role_id
    "#;
    sqlx::query(query)
      .bind(user.id)
      .bind(&user.name)
      .bind(&user.email)
      .bind(user.age)
      .bind(user.created_at)
      .bind(user.role.id)
      .try_map(|row: PgRow| User::try_from(row))
      .fetch_optional(&*self.pool)
      .await?
      .ok_or_else(|| {
        UserRepositoryError::Other(format!("user {} vanished before update", user.id))
      })
  }

  async fn delete(&self, user: &User) -> Result<(), UserRepositoryError> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
      .bind(user.id)
      .execute(&*self.pool)
      .await?;
    if result.rows_affected() == 0 {
      return Err(UserRepositoryError::Other(format!(
        "user {} vanished before delete",
        user.id
      )));
    }
    Ok(())
  }
}

impl TryFrom<PgRow> for User {
  type Error = sqlx::Error;

  fn try_from(row: PgRow) -> Result<Self, Self::Error> {
    Ok(Self {
      id: row.try_get("id")?,
      name: row.try_get("name")?,
      email: row.try_get("email")?,
      age: row.try_get("age")?,
      created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
      role: Role {
        id: row.try_get("role_id")?,
        name: row.try_get("role_name")?,
      },
    })
  }
}


#[cfg(test)]
mod postgres_tests {
  use std::sync::Arc;

  use chrono::Utc;
  use sqlx::{Pool, Postgres};

  use super::*;
  use crate::roles::model::CreateRole;
  use crate::roles::repository::role_repository::{
    RoleRepository, RoleRepositoryImpl,
  };

  fn database(pool: Pool<Postgres>) -> Arc<Database> {
    Arc::new(Database {
      pool: Arc::new(pool),
    })
  }

  fn new_user(name: &str, role: &Role) -> NewUser {
    NewUser {
      id: None,
      name: Some(name.to_string()),
      email: Some(format!("{}@mail.com", name.to_lowercase())),
      age: 25,
      created_at: Utc::now(),
      role: role.clone(),
    }
  }

  #[sqlx::test]
  #[ignore = "needs DATABASE_URL pointing at a Postgres server"]
  async fn test_create_update_and_list_with_role(pool: Pool<Postgres>) {
    let database = database(pool);
    let roles = RoleRepositoryImpl::new(database.clone());
    let users = UserRepositoryImpl::new(database);
    let admin = roles
      .create(CreateRole {
        name: String::from("ADMIN"),
      })
      .await
      .unwrap();
    let member = roles
      .create(CreateRole {
        name: String::from("USER"),
      })
      .await
      .unwrap();

    let alice = users.create(&new_user("Alice", &admin)).await.unwrap();
    let bob = users.create(&new_user("Bob", &member)).await.unwrap();
    assert_eq!(alice.role.name, "ADMIN");
    assert_eq!(bob.email, "bob@mail.com");

    let renamed = users
      .update(&User {
        name: String::from("Alice2"),
        role: member.clone(),
        ..alice.clone()
      })
      .await
      .unwrap();
    assert_eq!(renamed.name, "Alice2");
    assert_eq!(renamed.role.name, "USER");

    let listed: Vec<i64> = users
      .find_all()
      .await
      .unwrap()
      .into_iter()
      .map(|user| user.id)
      .collect();
    assert_eq!(listed, vec![alice.id, bob.id]);

    let found = users.find_one(alice.id).await.unwrap().unwrap();
    assert_eq!(found.name, "Alice2");
  }

  #[sqlx::test]
  #[ignore = "needs DATABASE_URL pointing at a Postgres server"]
  async fn test_delete_removes_user(pool: Pool<Postgres>) {
    let database = database(pool);
    let roles = RoleRepositoryImpl::new(database.clone());
    let users = UserRepositoryImpl::new(database);
    let admin = roles
      .create(CreateRole {
        name: String::from("ADMIN"),
      })
      .await
      .unwrap();
    let alice = users.create(&new_user("Alice", &admin)).await.unwrap();

    users.delete(&alice).await.unwrap();

    assert!(users.find_one(alice.id).await.unwrap().is_none());
    assert!(matches!(
      users.delete(&alice).await,
      Err(UserRepositoryError::Other(_))
    ));
  }
}
