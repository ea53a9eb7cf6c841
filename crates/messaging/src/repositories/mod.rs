//! Data access layer for the messaging system.
//!
//! The repository owns all state and implements every business rule; nothing
//! is persisted beyond the lifetime of the process.

pub mod messaging_repository;

pub use messaging_repository::InMemoryMessagingRepository;
