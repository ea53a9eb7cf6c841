//! Domain entities for the messaging system.
//!
//! These are plain values; relationships between them (membership, senders,
//! admins) live in the repository.

pub mod group;
pub mod message;
pub mod user;

// Re-export all entity types
pub use group::{Group, GroupKind};
pub use message::Message;
pub use user::User;
