use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use crate::roles::dto::role_dto::RoleDto;
use crate::roles::repository::role_repository::RoleRepository;
use crate::roles::service::role_service::RoleService;
use crate::shared::event::EventPublisher;
use crate::users::dto::user_dto::UserDto;
use crate::users::repository::user_repository::UserRepository;
use crate::users::service::user_service::UserService;

const HELP: &str = "\
Commands:

  Current user:
    /create      create a user draft
    /view        show the current user draft
    /clear       discard the current user draft

  Database:
    /save        save the draft as a new user
    /update      overwrite a stored user with the draft
    /delete      delete a stored user
    /find_all    list all users
    /find_by_id  show one user

  /help          show this list
  /exit          quit
";

/// Line-oriented menu over the user and role services. The draft built by
/// `/create` is what `/save` and `/update` send.
pub struct Console<'a, UR, RR, EP, R, W>
where
  UR: UserRepository,
  RR: RoleRepository,
  EP: EventPublisher,
{
  user_service: &'a UserService<UR, RR, EP>,
  role_service: &'a RoleService<RR>,
  input: R,
  output: W,
  user: Option<UserDto>,
}

impl<'a, UR, RR, EP, R, W> Console<'a, UR, RR, EP, R, W>
where
  UR: UserRepository,
  RR: RoleRepository,
  EP: EventPublisher,
  R: BufRead,
  W: Write,
{
  pub fn new(
    user_service: &'a UserService<UR, RR, EP>,
    role_service: &'a RoleService<RR>,
    input: R,
    output: W,
  ) -> Self {
    Self {
      user_service,
      role_service,
      input,
      output,
      user: None,
    }
  }

  /// Runs until `/exit` or end of input.
  pub async fn run(mut self) -> io::Result<()> {
    writeln!(self.output, "user-service console")?;
    writeln!(self.output, "{}", HELP)?;
    loop {
      match self.step().await {
        Ok(true) => continue,
        Ok(false) => return Ok(()),
        Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => return Ok(()),
        Err(error) => return Err(error),
      }
    }
  }

  /// Handles one command; `false` ends the session.
  async fn step(&mut self) -> io::Result<bool> {
    self.handle_view()?;
    let command = self.prompt("> ")?;
    match command.trim().to_lowercase().as_str() {
      "/create" => self.handle_create().await?,
      "/clear" => self.handle_clear()?,
      "/view" => self.handle_view()?,
      "/save" => self.handle_save().await?,
      "/update" => self.handle_update().await?,
      "/delete" => self.handle_delete().await?,
      "/find_all" => self.handle_find_all().await?,
      "/find_by_id" => self.handle_find_by_id().await?,
      "/help" => writeln!(self.output, "{}", HELP)?,
      "/exit" => return Ok(false),
      "" => {}
      other => writeln!(self.output, "Unknown command {}, try /help", other)?,
    }
    Ok(true)
  }

  async fn handle_create(&mut self) -> io::Result<()> {
    let name = self.read_non_blank("Name: ")?;
    let email = self.read_non_blank("Email: ")?;
    let age = self.read_positive::<i32>("Age: ")?;
    let roles = self.role_service.find_all().await;
    let role_id = match roles {
      Ok(roles) => self.read_role_id(&roles)?,
      Err(error) => return self.report(error),
    };

    writeln!(self.output, "User {} created, use /save to store it", name)?;
    self.user = Some(UserDto {
      id: None,
      name: Some(name),
      email: Some(email),
      age,
      role_id,
    });
    Ok(())
  }

  fn handle_clear(&mut self) -> io::Result<()> {
    self.user = None;
    writeln!(self.output, "User draft cleared")
  }

  fn handle_view(&mut self) -> io::Result<()> {
    match &self.user {
      Some(user) => writeln!(self.output, "Current user: {}", user),
      None => writeln!(self.output, "Current user: none, use /create"),
    }
  }

  async fn handle_save(&mut self) -> io::Result<()> {
    let Some(user) = self.user.clone() else {
      return writeln!(self.output, "No user draft, use /create first");
    };
    let saved = self.user_service.create(user).await;
    match saved {
      Ok(saved) => {
        writeln!(self.output, "Saved user {}", saved)?;
        self.user = None;
        Ok(())
      }
      Err(error) => self.report(error),
    }
  }

  async fn handle_update(&mut self) -> io::Result<()> {
    let Some(user) = self.user.clone() else {
      return writeln!(self.output, "No user draft, use /create first");
    };
    let id = self.read_positive::<i64>("User id: ")?;
    let updated = self.user_service.update(id, user).await;
    match updated {
      Ok(updated) => {
        writeln!(self.output, "Updated user {}", updated)?;
        self.user = None;
        Ok(())
      }
      Err(error) => self.report(error),
    }
  }

  async fn handle_delete(&mut self) -> io::Result<()> {
    let id = self.read_positive::<i64>("User id: ")?;
    let deleted = self.user_service.delete(id).await;
    match deleted {
      Ok(()) => writeln!(self.output, "Deleted user {}", id),
      Err(error) => self.report(error),
    }
  }

  async fn handle_find_all(&mut self) -> io::Result<()> {
    let users = self.user_service.find_all().await;
    match users {
      Ok(users) if users.is_empty() => {
        writeln!(self.output, "No users in the database")
      }
      Ok(users) => {
        for user in users {
          writeln!(self.output, "User {}", user)?;
        }
        Ok(())
      }
      Err(error) => self.report(error),
    }
  }

  async fn handle_find_by_id(&mut self) -> io::Result<()> {
    let id = self.read_positive::<i64>("User id: ")?;
    let found = self.user_service.find_by_id(id).await;
    match found {
      Ok(user) => writeln!(self.output, "User {}", user),
      Err(error) => self.report(error),
    }
  }

  fn report(&mut self, error: impl Display) -> io::Result<()> {
    writeln!(self.output, "Error: {}", error)
  }

  fn prompt(&mut self, prompt: &str) -> io::Result<String> {
    write!(self.output, "{}", prompt)?;
    self.output.flush()?;
    let mut line = String::new();
    if self.input.read_line(&mut line)? == 0 {
      return Err(io::Error::from(io::ErrorKind::UnexpectedEof));
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
  }

  fn read_non_blank(&mut self, prompt: &str) -> io::Result<String> {
    loop {
      let line = self.prompt(prompt)?;
      if !line.trim().is_empty() {
        return Ok(line);
      }
      writeln!(self.output, "Value must not be blank")?;
    }
  }

  fn read_positive<T>(&mut self, prompt: &str) -> io::Result<T>
  where
    T: FromStr + PartialOrd + Default,
  {
    loop {
      match self.prompt(prompt)?.trim().parse::<T>() {
        Ok(number) if number > T::default() => return Ok(number),
        Ok(_) => writeln!(self.output, "Number must be positive")?,
        Err(_) => writeln!(self.output, "Enter a valid number")?,
      }
    }
  }

  /// With no roles stored the draft gets role 0, which `/save` rejects.
  fn read_role_id(&mut self, roles: &[RoleDto]) -> io::Result<i64> {
    if roles.is_empty() {
      writeln!(self.output, "No roles in the database")?;
      return Ok(0);
    }
    loop {
      writeln!(self.output, "Roles:")?;
      for role in roles {
        writeln!(self.output, "  {} - {}", role.id.unwrap_or_default(), role.name)?;
      }
      let id = self.read_positive::<i64>("Role id: ")?;
      if roles.iter().any(|role| role.id == Some(id)) {
        return Ok(id);
      }
      writeln!(self.output, "No role with id {}", id)?;
    }
  }
}

#[cfg(test)]
mod tests {
  use std::io::Cursor;
  use std::sync::Arc;

  use super::*;
  use crate::helpers::tests::role;
  use crate::roles::repository::role_repository::tests::InMemoryRoleRepository;
  use crate::shared::event::tests::RecordingPublisher;
  use crate::shared::event::EventTopics;
  use crate::users::repository::user_repository::tests::InMemoryUserRepository;

  struct Fixture {
    users: Arc<InMemoryUserRepository>,
    user_service:
      UserService<InMemoryUserRepository, InMemoryRoleRepository, RecordingPublisher>,
    role_service: RoleService<InMemoryRoleRepository>,
  }

  fn fixture(roles: Vec<crate::roles::model::Role>) -> Fixture {
    let users = Arc::new(InMemoryUserRepository::new());
    let roles = Arc::new(InMemoryRoleRepository::with_roles(roles));
    Fixture {
      users: users.clone(),
      user_service: UserService::new(
        users,
        RoleService::new(roles.clone()),
        RecordingPublisher::new(),
        EventTopics {
          created: "user.created".to_string(),
          deleted: "user.deleted".to_string(),
        },
      ),
      role_service: RoleService::new(roles),
    }
  }

  async fn run(fixture: &Fixture, script: &str) -> String {
    let mut output = Vec::new();
    Console::new(
      &fixture.user_service,
      &fixture.role_service,
      Cursor::new(script.as_bytes()),
      &mut output,
    )
    .run()
    .await
    .unwrap();
    String::from_utf8(output).unwrap()
  }

  #[actix_rt::test]
  async fn test_create_and_save_user() {
    let fixture = fixture(vec![role(1, "ADMIN")]);

    let output = run(
      &fixture,
      "/create\nAlice\nalice@mail.com\n25\n1\n/save\n/exit\n",
    )
    .await;

    assert!(output.contains("User Alice created"));
    assert!(output.contains("Saved user #1 name: Alice"));
    let stored = fixture.users.stored(1).unwrap();
    assert_eq!(stored.email, "alice@mail.com");
    assert_eq!(stored.role.id, 1);
  }

  #[actix_rt::test]
  async fn test_invalid_input_is_prompted_again() {
    let fixture = fixture(vec![role(1, "ADMIN")]);

    let output = run(
      &fixture,
      "/create\n\nAlice\nalice@mail.com\nabc\n-3\n25\n7\n1\n/view\n/exit\n",
    )
    .await;

    assert!(output.contains("Value must not be blank"));
    assert!(output.contains("Enter a valid number"));
    assert!(output.contains("Number must be positive"));
    assert!(output.contains("No role with id 7"));
    assert!(output.contains("Current user: name: Alice, email: alice@mail.com, age: 25, role: 1"));
  }

  #[actix_rt::test]
  async fn test_save_without_draft() {
    let fixture = fixture(Vec::new());

    let output = run(&fixture, "/save\n/exit\n").await;

    assert!(output.contains("No user draft"));
  }

  #[actix_rt::test]
  async fn test_save_without_roles_reports_error() {
    let fixture = fixture(Vec::new());

    let output = run(
      &fixture,
      "/create\nAlice\nalice@mail.com\n25\n/save\n/exit\n",
    )
    .await;

    assert!(output.contains("No roles in the database"));
    assert!(output.contains("Error: Role with id 0 not found"));
    assert!(fixture.users.stored(1).is_none());
  }

  #[actix_rt::test]
  async fn test_update_delete_and_lookups() {
    let fixture = fixture(vec![role(1, "ADMIN")]);

    let output = run(
      &fixture,
      concat!(
        "/find_all\n",
        "/create\nAlice\nalice@mail.com\n25\n1\n/save\n",
        "/create\nAlice2\nalice@mail.com\n26\n1\n/update\n1\n",
        "/find_by_id\n1\n",
        "/delete\n1\n",
        "/find_by_id\n1\n",
        "/exit\n",
      ),
    )
    .await;

    assert!(output.contains("No users in the database"));
    assert!(output.contains("Updated user #1 name: Alice2"));
    assert!(output.contains("User #1 name: Alice2, email: alice@mail.com, age: 26"));
    assert!(output.contains("Deleted user 1"));
    assert!(output.contains("Error: User with id 1 not found"));
  }

  #[actix_rt::test]
  async fn test_clear_unknown_command_and_end_of_input() {
    let fixture = fixture(vec![role(1, "ADMIN")]);

    let output = run(
      &fixture,
      "/CREATE\nAlice\nalice@mail.com\n25\n1\n/clear\n/bogus\n",
    )
    .await;

    assert!(output.contains("User draft cleared"));
    assert!(output.contains("Unknown command /bogus"));
    assert!(output.ends_with("> "));
  }
}
