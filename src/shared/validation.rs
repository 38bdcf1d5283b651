use chrono::{DateTime, Utc};

use crate::shared::error::ServiceError;

/// A field value as inspected by [`validate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
  Null,
  Text(&'a str),
  Number(i64),
  Timestamp(&'a DateTime<Utc>),
  /// Identity of a referenced entity.
  Reference(i64),
}

impl FieldValue<'_> {
  pub fn is_empty(&self) -> bool {
    match self {
      FieldValue::Null => true,
      FieldValue::Text(text) => text.is_empty(),
      FieldValue::Number(number) => *number == 0,
      FieldValue::Timestamp(_) | FieldValue::Reference(_) => false,
    }
  }
}

impl<'a> From<Option<&'a str>> for FieldValue<'a> {
  fn from(value: Option<&'a str>) -> Self {
    value.map_or(FieldValue::Null, FieldValue::Text)
  }
}

impl<'a> From<&'a str> for FieldValue<'a> {
  fn from(value: &'a str) -> Self {
    FieldValue::Text(value)
  }
}

impl From<i32> for FieldValue<'_> {
  fn from(value: i32) -> Self {
    FieldValue::Number(i64::from(value))
  }
}

impl From<Option<i64>> for FieldValue<'_> {
  fn from(value: Option<i64>) -> Self {
    value.map_or(FieldValue::Null, FieldValue::Number)
  }
}

/// Entities expose their fields in declared order so that the first empty
/// one is always the one reported.
pub trait FieldSet {
  const IDENTITY: &'static str = "id";

  fn fields(&self) -> Vec<(&'static str, FieldValue<'_>)>;
}

/// Fails with [`ServiceError::EmptyField`] on the first field, identity
/// excluded, that is null, an empty string or zero.
pub fn validate<E: FieldSet>(entity: &E) -> Result<(), ServiceError> {
  entity
    .fields()
    .into_iter()
    .filter(|(name, _)| *name != E::IDENTITY)
    .find(|(_, value)| value.is_empty())
    .map_or(Ok(()), |(name, _)| Err(ServiceError::empty_field(name)))
}
