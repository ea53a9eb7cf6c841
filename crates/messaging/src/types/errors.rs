//! Error types for the messaging system.

use thiserror::Error;

/// Result type alias for messaging operations
pub type MessagingResult<T> = Result<T, MessagingError>;

/// Main error type for the messaging system.
///
/// Every variant renders as the exact message callers see; there are no
/// separate error codes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagingError {
    #[error("User already exists")]
    UserAlreadyExists,

    #[error("Group does not exist")]
    GroupNotFound,

    #[error("You are not allowed to send message")]
    NotAllowedToSend,

    #[error("Approver does not have rights")]
    ApproverWithoutRights,

    #[error("User is not a participant")]
    NotAParticipant,

    #[error("User not found")]
    UserNotFound,

    #[error("Cannot remove admin")]
    CannotRemoveAdmin,

    #[error("K is greater than the number of messages")]
    NotEnoughMessages,

    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl MessagingError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Whether the error was raised by an input check rather than a business rule
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}
