/// Partial copy of one entity onto another, field by field.
pub trait Merge<Source> {
  const IDENTITY: &'static str = "id";

  /// Field names in declared order.
  const FIELDS: &'static [&'static str];

  /// Copies `field` from `source` when it is set there. Returns whether the
  /// field was copied.
  fn copy_field(&mut self, source: &Source, field: &str) -> bool;
}

/// Copies every field of `source` that is not null and not listed in
/// `excluded` onto `target`. The identity field is always excluded.
///
/// Returns the names of the copied fields.
pub fn merge<S, T: Merge<S>>(
  source: &S,
  target: &mut T,
  excluded: &[&str],
) -> Vec<&'static str> {
  T::FIELDS
    .iter()
    .copied()
    .filter(|field| *field != T::IDENTITY && !excluded.contains(field))
    .filter(|field| target.copy_field(source, field))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Debug, Clone, PartialEq)]
  struct Stored {
    id: i64,
    title: String,
    count: i32,
  }

  struct Candidate {
    id: Option<i64>,
    title: Option<String>,
    count: i32,
  }

  impl Merge<Candidate> for Stored {
    const FIELDS: &'static [&'static str] = &["id", "title", "count"];

    fn copy_field(&mut self, source: &Candidate, field: &str) -> bool {
      match field {
        "id" => source.id.map(|id| self.id = id).is_some(),
        "title" => source
          .title
          .as_ref()
          .map(|title| self.title = title.clone())
          .is_some(),
        "count" => {
          self.count = source.count;
          true
        }
        _ => false,
      }
    }
  }

  fn stored() -> Stored {
    Stored {
      id: 10,
      title: "old".to_string(),
      count: 1,
    }
  }

  #[test]
  fn test_non_null_fields_are_copied() {
    let mut target = stored();
    let copied = merge(
      &Candidate {
        id: None,
        title: Some("new".to_string()),
        count: 5,
      },
      &mut target,
      &["id"],
    );

    assert_eq!(copied, vec!["title", "count"]);
    assert_eq!(target.title, "new");
    assert_eq!(target.count, 5);
    assert_eq!(target.id, 10);
  }

  #[test]
  fn test_null_fields_keep_target_value() {
    let mut target = stored();
    let copied = merge(
      &Candidate {
        id: None,
        title: None,
        count: 2,
      },
      &mut target,
      &["id"],
    );

    assert_eq!(copied, vec!["count"]);
    assert_eq!(target.title, "old");
  }

  #[test]
  fn test_identity_is_kept_even_when_not_excluded() {
    let mut target = stored();
    merge(
      &Candidate {
        id: Some(99),
        title: None,
        count: 1,
      },
      &mut target,
      &[],
    );

    assert_eq!(target.id, 10);
  }

  #[test]
  fn test_excluded_fields_are_skipped() {
    let mut target = stored();
    let copied = merge(
      &Candidate {
        id: Some(99),
        title: Some("new".to_string()),
        count: 7,
      },
      &mut target,
      &["id", "count"],
    );

    assert_eq!(copied, vec!["title"]);
    assert_eq!(target.count, 1);
  }
}
