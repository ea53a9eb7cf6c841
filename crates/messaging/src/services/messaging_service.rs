//! Messaging service, the entry point used by applications.

use chrono::{DateTime, Utc};
use parley_config::MessagingConfig;

use crate::entities::{Group, Message, User};
use crate::repositories::InMemoryMessagingRepository;
use crate::types::{MessageId, MessagingResult};

/// Service for messaging operations.
///
/// Every call is forwarded to the repository unchanged.
pub struct MessagingService<R = InMemoryMessagingRepository> {
    repository: R,
}

impl MessagingService<InMemoryMessagingRepository> {
    /// Create a new service backed by a fresh in-memory repository
    pub fn new(config: &MessagingConfig) -> Self {
        Self {
            repository: InMemoryMessagingRepository::new(config),
        }
    }
}

impl Default for MessagingService<InMemoryMessagingRepository> {
    fn default() -> Self {
        Self::new(&MessagingConfig::default())
    }
}

impl<R> MessagingService<R>
where
    R: MessagingRepo,
{
    /// Create a service over an existing repository
    pub fn with_repository(repository: R) -> Self {
        Self { repository }
    }

    /// Register a user by mobile number
    pub fn create_user(&mut self, name: &str, mobile: &str) -> MessagingResult<User> {
        self.repository.create_user(name, mobile)
    }

    /// Create a personal chat or a named group, first member is the admin
    pub fn create_group(&mut self, members: &[User]) -> MessagingResult<Group> {
        self.repository.create_group(members)
    }

    /// Issue the next message id
    pub fn create_message(&mut self, content: &str) -> MessageId {
        self.repository.create_message(content)
    }

    /// Send a message to a group, returning the group's message count
    pub fn send_message(
        &mut self,
        message: &Message,
        sender: &User,
        group: &Group,
    ) -> MessagingResult<usize> {
        self.repository.send_message(message, sender, group)
    }

    /// Hand the admin role of a group to another member
    pub fn change_admin(
        &mut self,
        approver: &User,
        user: &User,
        group: &Group,
    ) -> MessagingResult<()> {
        self.repository.change_admin(approver, user, group)
    }

    /// Remove a user and every message they sent
    pub fn remove_user(&mut self, user: &User) -> MessagingResult<usize> {
        self.repository.remove_user(user)
    }

    /// Content of the k-th latest message strictly inside `(start, end)`
    pub fn find_message(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        k: usize,
    ) -> MessagingResult<String> {
        self.repository.find_message(start, end, k)
    }

    /// Current members of a group
    pub fn group_members(&self, group: &Group) -> MessagingResult<Vec<User>> {
        self.repository.group_members(group)
    }

    /// Messages of a group in send order
    pub fn group_messages(&self, group: &Group) -> MessagingResult<Vec<Message>> {
        self.repository.group_messages(group)
    }

    /// Current admin of a group
    pub fn group_admin(&self, group: &Group) -> MessagingResult<User> {
        self.repository.group_admin(group)
    }

    /// All groups in creation order
    pub fn groups(&self) -> Vec<Group> {
        self.repository.groups()
    }

    /// Number of named groups created so far
    pub fn named_group_count(&self) -> u64 {
        self.repository.named_group_count()
    }

    /// Last message id issued
    pub fn last_message_id(&self) -> MessageId {
        self.repository.last_message_id()
    }

    /// Check whether a mobile number is registered
    pub fn is_registered(&self, mobile: &str) -> bool {
        self.repository.is_registered(mobile)
    }
}

/// Trait for messaging repositories to allow generic usage
#[cfg_attr(test, mockall::automock)]
pub trait MessagingRepo {
    fn create_user(&mut self, name: &str, mobile: &str) -> MessagingResult<User>;
    fn create_group(&mut self, members: &[User]) -> MessagingResult<Group>;
    fn create_message(&mut self, content: &str) -> MessageId;
    fn send_message(
        &mut self,
        message: &Message,
        sender: &User,
        group: &Group,
    ) -> MessagingResult<usize>;
    fn change_admin(
        &mut self,
        approver: &User,
        user: &User,
        group: &Group,
    ) -> MessagingResult<()>;
    fn remove_user(&mut self, user: &User) -> MessagingResult<usize>;
    fn find_message(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        k: usize,
    ) -> MessagingResult<String>;
    fn group_members(&self, group: &Group) -> MessagingResult<Vec<User>>;
    fn group_messages(&self, group: &Group) -> MessagingResult<Vec<Message>>;
    fn group_admin(&self, group: &Group) -> MessagingResult<User>;
    fn groups(&self) -> Vec<Group>;
    fn named_group_count(&self) -> u64;
    fn last_message_id(&self) -> MessageId;
    fn is_registered(&self, mobile: &str) -> bool;
}

impl MessagingRepo for InMemoryMessagingRepository {
    fn create_user(&mut self, name: &str, mobile: &str) -> MessagingResult<User> {
        self.create_user(name, mobile)
    }

    fn create_group(&mut self, members: &[User]) -> MessagingResult<Group> {
        self.create_group(members)
    }

    fn create_message(&mut self, content: &str) -> MessageId {
        self.create_message(content)
    }

    fn send_message(
        &mut self,
        message: &Message,
        sender: &User,
        group: &Group,
    ) -> MessagingResult<usize> {
        self.send_message(message, sender, group)
    }

    fn change_admin(
        &mut self,
        approver: &User,
        user: &User,
        group: &Group,
    ) -> MessagingResult<()> {
        self.change_admin(approver, user, group)
    }

    fn remove_user(&mut self, user: &User) -> MessagingResult<usize> {
        self.remove_user(user)
    }

    fn find_message(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        k: usize,
    ) -> MessagingResult<String> {
        self.find_message(start, end, k)
    }

    fn group_members(&self, group: &Group) -> MessagingResult<Vec<User>> {
        self.group_members(group)
    }

    fn group_messages(&self, group: &Group) -> MessagingResult<Vec<Message>> {
        self.group_messages(group)
    }

    fn group_admin(&self, group: &Group) -> MessagingResult<User> {
        self.group_admin(group)
    }

    fn groups(&self) -> Vec<Group> {
        self.groups()
    }

    fn named_group_count(&self) -> u64 {
        self.named_group_count()
    }

    fn last_message_id(&self) -> MessageId {
        self.last_message_id()
    }

    fn is_registered(&self, mobile: &str) -> bool {
        self.is_registered(mobile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::GroupKind;
    use crate::types::MessagingError;
    use mockall::predicate::eq;

    #[test]
    fn test_create_user_is_forwarded() {
        let mut repo = MockMessagingRepo::new();
        repo.expect_create_user()
            .with(eq("Alice"), eq("555-0100"))
            .times(1)
            .returning(|name, mobile| Ok(User::new(name, mobile)));

        let mut service = MessagingService::with_repository(repo);
        let user = service.create_user("Alice", "555-0100").unwrap();

        assert_eq!(user.name, "Alice");
    }

    #[test]
    fn test_errors_pass_through_unchanged() {
        let mut repo = MockMessagingRepo::new();
        repo.expect_remove_user()
            .times(1)
            .returning(|_| Err(MessagingError::CannotRemoveAdmin));
        repo.expect_find_message()
            .withf(|_, _, k| *k == 3)
            .times(1)
            .returning(|_, _, _| Err(MessagingError::NotEnoughMessages));

        let mut service = MessagingService::with_repository(repo);
        let now = Utc::now();

        assert_eq!(
            service.remove_user(&User::new("Bob", "1")).unwrap_err(),
            MessagingError::CannotRemoveAdmin
        );
        assert_eq!(
            service.find_message(now, now, 3).unwrap_err(),
            MessagingError::NotEnoughMessages
        );
    }

    #[test]
    fn test_send_message_is_forwarded_with_same_arguments() {
        let sender = User::new("Carol", "2");
        let group = Group::new("Group 1", 3, GroupKind::Named);
        let message = Message::new(MessageId(1), "hello");

        let expected_sender = sender.id.clone();
        let expected_group = group.id.clone();

        let mut repo = MockMessagingRepo::new();
        repo.expect_send_message()
            .withf(move |message, sender, group| {
                message.id == MessageId(1)
                    && sender.id == expected_sender
                    && group.id == expected_group
            })
            .times(1)
            .returning(|_, _, _| Ok(7));

        let mut service = MessagingService::with_repository(repo);
        assert_eq!(service.send_message(&message, &sender, &group).unwrap(), 7);
    }

    #[test]
    fn test_create_message_returns_repository_id() {
        let mut repo = MockMessagingRepo::new();
        repo.expect_create_message()
            .with(eq("hi"))
            .times(1)
            .returning(|_| MessageId(42));

        let mut service = MessagingService::with_repository(repo);
        assert_eq!(service.create_message("hi"), MessageId(42));
    }
}
