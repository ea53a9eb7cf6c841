//! Shared types and interfaces for the messaging system.
//!
//! This module contains the identifier types and error definitions that are
//! used across the entities, the repository and the service.

pub mod errors;
pub mod ids;

// Re-export common types
pub use errors::{MessagingError, MessagingResult};
pub use ids::{GroupId, MessageId, UserId};
