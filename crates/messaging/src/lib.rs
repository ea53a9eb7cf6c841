//! # Parley Messaging Crate
//!
//! This crate provides the core business logic for Parley: user registration,
//! personal chats and numbered groups, message delivery, admin transfer, user
//! removal and time-windowed message search. All state lives in memory.
//!
//! ## Architecture
//!
//! - **Entities**: Domain values (User, Group, Message)
//! - **Repositories**: State and business rules
//! - **Services**: Pass-through layer used by applications
//! - **Types**: Identity handles and errors
//!
//! ## Usage
//!
//! ```rust
//! use parley_messaging::{Message, MessagingService};
//!
//! let mut service = MessagingService::default();
//! let alice = service.create_user("Alice", "555-0100").unwrap();
//! let bob = service.create_user("Bob", "555-0101").unwrap();
//! let chat = service.create_group(&[alice.clone(), bob]).unwrap();
//! assert_eq!(chat.name, "Bob");
//!
//! let id = service.create_message("hello");
//! let count = service.send_message(&Message::new(id, "hello"), &alice, &chat).unwrap();
//! assert_eq!(count, 1);
//! ```

pub mod entities;
pub mod repositories;
pub mod services;
pub mod types;

// Re-export main types for convenience
pub use entities::{Group, GroupKind, Message, User};
pub use repositories::InMemoryMessagingRepository;
pub use services::{MessagingRepo, MessagingService};
pub use types::{GroupId, MessageId, MessagingError, MessagingResult, UserId};
