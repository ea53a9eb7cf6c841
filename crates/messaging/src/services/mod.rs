//! Service layer for the messaging system.
//!
//! The service exposes the repository contract to applications without adding
//! rules of its own.

pub mod messaging_service;

pub use messaging_service::{MessagingRepo, MessagingService};
