// 👥 Group Record - A set of people sharing expenses
// The slug is derived from the name and used for display/routing keys

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,

    /// URL-safe version of the name, derived at construction
    pub slug: String,

    /// Person who owns the group
    pub owner: String,

    /// Person ids of all members (including the owner)
    pub members: Vec<String>,
}

impl Group {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        owner: impl Into<String>,
        members: Vec<String>,
    ) -> Result<Self> {
        let id = id.into();
        let name = name.into();
        let owner = owner.into();

        if id.is_empty() {
            return Err(EngineError::validation("Group", "id", "required field is empty"));
        }
        if name.is_empty() {
            return Err(EngineError::validation("Group", "name", "required field is empty"));
        }
        if owner.is_empty() {
            return Err(EngineError::validation("Group", "owner", "required field is empty"));
        }

        let slug = slugify(&name);

        Ok(Group {
            id,
            name,
            slug,
            owner,
            members,
        })
    }

    pub fn is_member(&self, person_id: &str) -> bool {
        self.members.iter().any(|m| m == person_id)
    }
}

/// Lowercase the name and collapse non-alphanumeric runs into single dashes
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_dash = true; // suppress a leading dash

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash {
            slug.push('-');
            last_was_dash = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    slug
}
