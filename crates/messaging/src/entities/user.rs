use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// Represents a user of the messaging system.
///
/// Two users with the same name (or even the same mobile number) are
/// different users unless they share an [`UserId`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Identity handle
    pub id: UserId,
    /// Display name
    pub name: String,
    /// Mobile number, the registration key
    pub mobile: String,
}

impl User {
    /// Create a new user with a fresh identity
    pub fn new(name: impl Into<String>, mobile: impl Into<String>) -> Self {
        Self {
            id: UserId::generate(),
            name: name.into(),
            mobile: mobile.into(),
        }
    }

    /// Check whether both values refer to the same user
    pub fn is_same(&self, other: &User) -> bool {
        self.id == other.id
    }
}
