use serde::{Deserialize, Serialize};

use crate::types::GroupId;

/// Represents a group conversation.
///
/// Membership, messages and the admin are tracked by the repository, keyed by
/// the group id; the group value itself only carries its name and the number
/// of participants it was created with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Identity handle
    pub id: GroupId,
    /// Display name ("Group N" or the peer's name for personal chats)
    pub name: String,
    /// Number of participants at creation time
    pub participants: usize,
    /// How the group was created
    pub kind: GroupKind,
}

/// Group kind enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GroupKind {
    /// Two participants, named after the non-admin member
    Personal,
    /// Three or more participants, named from the group counter
    Named,
}

impl Group {
    /// Create a new group instance with a fresh identity
    pub fn new(name: impl Into<String>, participants: usize, kind: GroupKind) -> Self {
        Self {
            id: GroupId::generate(),
            name: name.into(),
            participants,
            kind,
        }
    }

    /// Check if this is a personal chat
    pub fn is_personal(&self) -> bool {
        matches!(self.kind, GroupKind::Personal)
    }
}
