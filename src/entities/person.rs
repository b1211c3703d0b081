// 🧑 Person Record - A member of an expense-sharing group
// Identity comes from the upstream identity source and never changes

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// A person who pays expenses and carries a share of category splits.
///
/// Immutable once constructed; `email` is the unique human-facing key,
/// `id` the stable foreign key used by expenses and splits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub first_name: String,
    pub last_name: String,

    /// Display name (defaults to "first last" when not supplied)
    pub name: String,

    pub email: String,
}

impl Person {
    /// Validate and construct a person record
    pub fn new(
        id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self> {
        let id = id.into();
        let first_name = first_name.into();
        let last_name = last_name.into();
        let email = email.into();

        if id.is_empty() {
            return Err(EngineError::validation("Person", "id", "required field is empty"));
        }
        if first_name.is_empty() {
            return Err(EngineError::validation(
                "Person",
                "first_name",
                "required field is empty",
            ));
        }
        if email.is_empty() {
            return Err(EngineError::validation("Person", "email", "required field is empty"));
        }
        if !email.contains('@') {
            return Err(EngineError::validation(
                "Person",
                "email",
                format!("not an email address: {email}"),
            ));
        }

        let name = format!("{} {}", first_name, last_name).trim().to_string();

        Ok(Person {
            id,
            first_name,
            last_name,
            name,
            email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_display_name() {
        let person = Person::new("p-1", "Jason", "Lengstorf", "jason@example.com").unwrap();
        assert_eq!(person.name, "Jason Lengstorf");
    }

    #[test]
    fn test_person_requires_email() {
        let err = Person::new("p-1", "Jason", "Lengstorf", "").unwrap_err();
        assert!(matches!(
            err,
            EngineError::Validation { record: "Person", field: "email", .. }
        ));

        let err = Person::new("p-1", "Jason", "Lengstorf", "not-an-email").unwrap_err();
        assert!(matches!(err, EngineError::Validation { field: "email", .. }));
    }

    #[test]
    fn test_person_requires_id() {
        let err = Person::new("", "Jason", "Lengstorf", "jason@example.com").unwrap_err();
        assert!(matches!(err, EngineError::Validation { field: "id", .. }));
    }
}
