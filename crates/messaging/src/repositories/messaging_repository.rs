//! In-memory repository holding every user, group and message.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use parley_config::MessagingConfig;
use tracing::{debug, info, warn};

use crate::entities::{Group, GroupKind, Message, User};
use crate::types::{GroupId, MessageId, MessagingError, MessagingResult, UserId};

/// Repository for all messaging state.
///
/// Relationships are kept as separate maps keyed by identity rather than
/// embedded in the entities. A user is expected to belong to at most one group;
/// that is not enforced here.
#[derive(Debug)]
pub struct InMemoryMessagingRepository {
    group_name_prefix: String,
    registered_mobiles: HashSet<String>,
    /// Groups in creation order
    groups: Vec<Group>,
    group_members: HashMap<GroupId, Vec<User>>,
    group_messages: HashMap<GroupId, Vec<Message>>,
    senders: HashMap<MessageId, UserId>,
    admins: HashMap<GroupId, User>,
    named_group_count: u64,
    last_message_id: u64,
}

impl Default for InMemoryMessagingRepository {
    fn default() -> Self {
        Self::new(&MessagingConfig::default())
    }
}

impl InMemoryMessagingRepository {
    pub fn new(config: &MessagingConfig) -> Self {
        Self {
            group_name_prefix: config.group_name_prefix.clone(),
            registered_mobiles: HashSet::new(),
            groups: Vec::new(),
            group_members: HashMap::new(),
            group_messages: HashMap::new(),
            senders: HashMap::new(),
            admins: HashMap::new(),
            named_group_count: 0,
            last_message_id: 0,
        }
    }

    /// Register a user by mobile number.
    ///
    /// Only the mobile number is recorded; the name travels on the returned
    /// [`User`].
    pub fn create_user(&mut self, name: &str, mobile: &str) -> MessagingResult<User> {
        if self.registered_mobiles.contains(mobile) {
            warn!(mobile, "rejected duplicate registration");
            return Err(MessagingError::UserAlreadyExists);
        }

        self.registered_mobiles.insert(mobile.to_string());
        let user = User::new(name, mobile);
        info!(user_id = %user.id, mobile, "registered user");
        Ok(user)
    }

    /// Create a group whose first member is the admin.
    ///
    /// Two members make a personal chat named after the second member; three or
    /// more make a named group that advances the group counter.
    pub fn create_group(&mut self, members: &[User]) -> MessagingResult<Group> {
        let (admin, peer) = match members {
            [admin, peer, ..] => (admin, peer),
            _ => return Err(MessagingError::validation("a group needs at least 2 participants")),
        };

        let group = if members.len() == 2 {
            Group::new(peer.name.clone(), 2, GroupKind::Personal)
        } else {
            self.named_group_count += 1;
            Group::new(
                format!("{} {}", self.group_name_prefix, self.named_group_count),
                members.len(),
                GroupKind::Named,
            )
        };

        self.group_members.insert(group.id.clone(), members.to_vec());
        self.group_messages.insert(group.id.clone(), Vec::new());
        self.admins.insert(group.id.clone(), admin.clone());
        self.groups.push(group.clone());

        info!(
            group_id = %group.id,
            name = %group.name,
            participants = group.participants,
            kind = ?group.kind,
            "created group"
        );
        Ok(group)
    }

    /// Issue the next message id. The message itself is stored on send.
    pub fn create_message(&mut self, content: &str) -> MessageId {
        self.last_message_id += 1;
        let id = MessageId(self.last_message_id);
        debug!(message_id = %id, length = content.len(), "issued message id");
        id
    }

    /// Append a message to a group and return the group's message count
    pub fn send_message(
        &mut self,
        message: &Message,
        sender: &User,
        group: &Group,
    ) -> MessagingResult<usize> {
        let members = self
            .group_members
            .get(&group.id)
            .ok_or(MessagingError::GroupNotFound)?;

        if !contains_user(members, sender) {
            warn!(group_id = %group.id, user_id = %sender.id, "non-member tried to send");
            return Err(MessagingError::NotAllowedToSend);
        }

        let messages = self.group_messages.entry(group.id.clone()).or_default();
        messages.push(message.clone());
        let count = messages.len();
        self.senders.insert(message.id, sender.id.clone());

        debug!(group_id = %group.id, message_id = %message.id, count, "sent message");
        Ok(count)
    }

    /// Transfer admin rights from `approver` to `user`
    pub fn change_admin(
        &mut self,
        approver: &User,
        user: &User,
        group: &Group,
    ) -> MessagingResult<()> {
        let members = self
            .group_members
            .get(&group.id)
            .ok_or(MessagingError::GroupNotFound)?;

        let is_admin = self
            .admins
            .get(&group.id)
            .is_some_and(|admin| admin.is_same(approver));
        if !is_admin {
            return Err(MessagingError::ApproverWithoutRights);
        }

        if !contains_user(members, user) {
            return Err(MessagingError::NotAParticipant);
        }

        self.admins.insert(group.id.clone(), user.clone());
        info!(group_id = %group.id, from = %approver.id, to = %user.id, "changed admin");
        Ok(())
    }

    /// Remove a non-admin user and every message they sent.
    ///
    /// Returns the group's remaining member count plus the number of senders
    /// still on record plus the group's remaining message count.
    pub fn remove_user(&mut self, user: &User) -> MessagingResult<usize> {
        let group_id = self
            .groups
            .iter()
            .map(|group| &group.id)
            .find(|id| {
                self.group_members
                    .get(*id)
                    .is_some_and(|members| contains_user(members, user))
            })
            .cloned()
            .ok_or(MessagingError::UserNotFound)?;

        if self
            .admins
            .get(&group_id)
            .is_some_and(|admin| admin.is_same(user))
        {
            warn!(group_id = %group_id, user_id = %user.id, "refused to remove admin");
            return Err(MessagingError::CannotRemoveAdmin);
        }

        let removed: HashSet<MessageId> = self
            .senders
            .iter()
            .filter(|(_, sender)| **sender == user.id)
            .map(|(message_id, _)| *message_id)
            .collect();

        let members = self.group_members.entry(group_id.clone()).or_default();
        members.retain(|member| !member.is_same(user));
        let member_count = members.len();

        let messages = self.group_messages.entry(group_id.clone()).or_default();
        messages.retain(|message| !removed.contains(&message.id));
        let message_count = messages.len();

        self.senders = std::mem::take(&mut self.senders)
            .into_iter()
            .filter(|(_, sender)| *sender != user.id)
            .collect();

        info!(
            group_id = %group_id,
            user_id = %user.id,
            removed_messages = removed.len(),
            "removed user"
        );
        Ok(member_count + self.senders.len() + message_count)
    }

    /// Return the content of the k-th most recent message strictly inside `(start, end)`.
    ///
    /// Messages with equal timestamps are ordered by id, higher ids first.
    pub fn find_message(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        k: usize,
    ) -> MessagingResult<String> {
        if k == 0 {
            return Err(MessagingError::validation("k must be at least 1"));
        }

        let mut window: Vec<&Message> = self
            .groups
            .iter()
            .filter_map(|group| self.group_messages.get(&group.id))
            .flatten()
            .filter(|message| message.is_within(start, end))
            .collect();

        debug!(%start, %end, k, matches = window.len(), "searching messages");

        if window.len() < k {
            return Err(MessagingError::NotEnoughMessages);
        }

        window.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(window[k - 1].content.clone())
    }

    pub fn group_members(&self, group: &Group) -> MessagingResult<Vec<User>> {
        self.group_members
            .get(&group.id)
            .cloned()
            .ok_or(MessagingError::GroupNotFound)
    }

    pub fn group_messages(&self, group: &Group) -> MessagingResult<Vec<Message>> {
        self.group_messages
            .get(&group.id)
            .cloned()
            .ok_or(MessagingError::GroupNotFound)
    }

    pub fn group_admin(&self, group: &Group) -> MessagingResult<User> {
        self.admins
            .get(&group.id)
            .cloned()
            .ok_or(MessagingError::GroupNotFound)
    }

    /// All groups in creation order
    pub fn groups(&self) -> Vec<Group> {
        self.groups.clone()
    }

    pub fn named_group_count(&self) -> u64 {
        self.named_group_count
    }

    /// The most recently issued message id, `0` before any message
    pub fn last_message_id(&self) -> MessageId {
        MessageId(self.last_message_id)
    }

    pub fn is_registered(&self, mobile: &str) -> bool {
        self.registered_mobiles.contains(mobile)
    }

    /// Number of messages with a recorded sender, across all groups
    pub fn sender_count(&self) -> usize {
        self.senders.len()
    }
}

fn contains_user(members: &[User], user: &User) -> bool {
    members.iter().any(|member| member.is_same(user))
}
