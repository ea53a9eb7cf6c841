//! Integration tests for the messaging crate, driven through the service.

use chrono::{DateTime, Duration, TimeZone, Utc};
use parley_messaging::{
    Group, GroupKind, Message, MessageId, MessagingError, MessagingService, User,
};

fn service() -> MessagingService {
    MessagingService::default()
}

fn register(service: &mut MessagingService, names: &[&str]) -> Vec<User> {
    names
        .iter()
        .map(|name| {
            service
                .create_user(name, &format!("mobile-{name}"))
                .expect("fresh mobile should register")
        })
        .collect()
}

fn at(minute: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap() + Duration::minutes(minute)
}

fn send(service: &mut MessagingService, sender: &User, group: &Group, content: &str) -> usize {
    let id = service.create_message(content);
    service
        .send_message(&Message::new(id, content), sender, group)
        .expect("member should be able to send")
}

fn send_at(
    service: &mut MessagingService,
    sender: &User,
    group: &Group,
    content: &str,
    minute: i64,
) -> usize {
    let id = service.create_message(content);
    service
        .send_message(&Message::with_timestamp(id, content, at(minute)), sender, group)
        .expect("member should be able to send")
}

#[test]
fn test_registration_is_keyed_by_mobile() {
    let mut service = service();

    let user = service.create_user("Alice", "555-0100").unwrap();
    assert_eq!(user.name, "Alice");
    assert_eq!(user.mobile, "555-0100");

    let duplicate = service.create_user("Someone Else", "555-0100").unwrap_err();
    assert_eq!(duplicate, MessagingError::UserAlreadyExists);
    assert_eq!(duplicate.to_string(), "User already exists");

    assert!(service.create_user("Alice", "555-0200").is_ok());
}

#[test]
fn test_group_names_follow_the_walkthrough() {
    let mut service = service();
    let first = register(&mut service, &["Alice", "Bob", "Carol"]);
    let pair = register(&mut service, &["Dan", "Evan"]);
    let second = register(&mut service, &["Felix", "Graham", "Hugh"]);

    let group_one = service.create_group(&first).unwrap();
    assert_eq!(group_one.name, "Group 1");
    assert_eq!(service.named_group_count(), 1);

    let personal = service.create_group(&pair).unwrap();
    assert_eq!(personal.name, "Evan");
    assert_eq!(personal.participants, 2);
    assert_eq!(personal.kind, GroupKind::Personal);
    assert_eq!(service.named_group_count(), 1);

    let group_two = service.create_group(&second).unwrap();
    assert_eq!(group_two.name, "Group 2");
    assert_eq!(group_two.participants, 3);

    assert_eq!(service.group_admin(&group_one).unwrap().name, "Alice");
    assert_eq!(service.group_admin(&personal).unwrap().name, "Dan");
    assert_eq!(service.groups().len(), 3);
}

#[test]
fn test_personal_chat_is_named_after_second_member_even_with_shared_names() {
    let mut service = service();
    let admin = service.create_user("Sam", "1").unwrap();
    let peer = service.create_user("Sam", "2").unwrap();

    let chat = service.create_group(&[admin.clone(), peer.clone()]).unwrap();
    assert_eq!(chat.name, "Sam");

    // Same name, different identity: only the admin is the admin.
    assert!(service.group_admin(&chat).unwrap().is_same(&admin));
    assert!(!service.group_admin(&chat).unwrap().is_same(&peer));
}

#[test]
fn test_message_ids_are_shared_across_groups() {
    let mut service = service();
    let first = register(&mut service, &["A", "B", "C"]);
    let second = register(&mut service, &["D", "E"]);
    let group = service.create_group(&first).unwrap();
    let chat = service.create_group(&second).unwrap();

    assert_eq!(service.create_message("one"), MessageId(1));
    send(&mut service, &first[0], &group, "two");
    send(&mut service, &second[0], &chat, "three");
    assert_eq!(service.create_message("four"), MessageId(4));
    assert_eq!(service.last_message_id(), MessageId(4));
}

#[test]
fn test_send_message_rules() {
    let mut service = service();
    let members = register(&mut service, &["Alice", "Bob", "Carol"]);
    let outsider = service.create_user("Mallory", "666").unwrap();
    let group = service.create_group(&members).unwrap();

    assert_eq!(send(&mut service, &members[0], &group, "hi"), 1);
    assert_eq!(send(&mut service, &members[2], &group, "hello"), 2);

    let id = service.create_message("let me in");
    let refused = service
        .send_message(&Message::new(id, "let me in"), &outsider, &group)
        .unwrap_err();
    assert_eq!(refused, MessagingError::NotAllowedToSend);
    assert_eq!(refused.to_string(), "You are not allowed to send message");

    let ghost = Group::new("Group 99", 3, GroupKind::Named);
    let missing = service
        .send_message(&Message::new(id, "anyone?"), &members[0], &ghost)
        .unwrap_err();
    assert_eq!(missing, MessagingError::GroupNotFound);

    assert_eq!(service.group_messages(&group).unwrap().len(), 2);
}

#[test]
fn test_sender_identity_is_not_matched_by_name() {
    let mut service = service();
    let members = register(&mut service, &["Alice", "Bob", "Carol"]);
    let group = service.create_group(&members).unwrap();
    let impostor = User::new("Alice", "mobile-Alice");

    let id = service.create_message("hi");
    assert_eq!(
        service
            .send_message(&Message::new(id, "hi"), &impostor, &group)
            .unwrap_err(),
        MessagingError::NotAllowedToSend
    );
}

#[test]
fn test_change_admin_rules() {
    let mut service = service();
    let members = register(&mut service, &["Alice", "Bob", "Carol"]);
    let outsider = service.create_user("Zed", "999").unwrap();
    let group = service.create_group(&members).unwrap();
    let ghost = Group::new("Nowhere", 3, GroupKind::Named);

    assert_eq!(
        service.change_admin(&members[0], &members[1], &ghost).unwrap_err(),
        MessagingError::GroupNotFound
    );
    assert_eq!(
        service.change_admin(&members[1], &members[2], &group).unwrap_err(),
        MessagingError::ApproverWithoutRights
    );
    assert_eq!(
        service.change_admin(&members[0], &outsider, &group).unwrap_err(),
        MessagingError::NotAParticipant
    );

    service.change_admin(&members[0], &members[1], &group).unwrap();
    assert!(service.group_admin(&group).unwrap().is_same(&members[1]));

    // The previous admin lost their rights, the new one can hand them on.
    assert_eq!(
        service.change_admin(&members[0], &members[2], &group).unwrap_err(),
        MessagingError::ApproverWithoutRights
    );
    service.change_admin(&members[1], &members[2], &group).unwrap();
    assert!(service.group_admin(&group).unwrap().is_same(&members[2]));
}

#[test]
fn test_remove_user_rules() {
    let mut service = service();
    let members = register(&mut service, &["Alice", "Bob", "Carol", "Dave"]);
    let pair = register(&mut service, &["Erin", "Frank"]);
    let stranger = service.create_user("Grace", "000").unwrap();
    let group = service.create_group(&members).unwrap();
    let chat = service.create_group(&pair).unwrap();

    send(&mut service, &members[0], &group, "a");
    send(&mut service, &members[1], &group, "b1");
    send(&mut service, &members[2], &group, "c");
    send(&mut service, &members[1], &group, "b2");
    send(&mut service, &pair[1], &chat, "f");

    assert_eq!(
        service.remove_user(&stranger).unwrap_err(),
        MessagingError::UserNotFound
    );
    assert_eq!(
        service.remove_user(&members[0]).unwrap_err(),
        MessagingError::CannotRemoveAdmin
    );
    assert_eq!(
        service.remove_user(&pair[0]).unwrap_err(),
        MessagingError::CannotRemoveAdmin
    );

    let total = service.remove_user(&members[1]).unwrap();

    let remaining_members = service.group_members(&group).unwrap();
    let remaining_messages = service.group_messages(&group).unwrap();
    assert_eq!(remaining_members.len(), 3);
    assert!(remaining_members.iter().all(|member| !member.is_same(&members[1])));
    assert_eq!(
        remaining_messages
            .iter()
            .map(|message| message.content.as_str())
            .collect::<Vec<_>>(),
        vec!["a", "c"]
    );
    // 3 members + 3 senders on record (a, c, f) + 2 group messages
    assert_eq!(total, 3 + 3 + 2);

    assert_eq!(
        service.remove_user(&members[1]).unwrap_err(),
        MessagingError::UserNotFound
    );
}

#[test]
fn test_failed_removal_mutates_nothing() {
    let mut service = service();
    let members = register(&mut service, &["Alice", "Bob", "Carol"]);
    let group = service.create_group(&members).unwrap();
    send(&mut service, &members[0], &group, "mine");

    assert!(service.remove_user(&members[0]).is_err());

    assert_eq!(service.group_members(&group).unwrap().len(), 3);
    assert_eq!(service.group_messages(&group).unwrap().len(), 1);
}

#[test]
fn test_find_message_window() {
    let mut service = service();
    let members = register(&mut service, &["Alice", "Bob", "Carol"]);
    let pair = register(&mut service, &["Dan", "Evan"]);
    let group = service.create_group(&members).unwrap();
    let chat = service.create_group(&pair).unwrap();

    send_at(&mut service, &members[0], &group, "at zero", 0);
    send_at(&mut service, &members[1], &group, "at ten", 10);
    send_at(&mut service, &pair[0], &chat, "at twenty", 20);
    send_at(&mut service, &members[2], &group, "at thirty", 30);
    send_at(&mut service, &pair[1], &chat, "at forty", 40);

    // Both bounds are exclusive: the messages at 0 and 40 fall outside.
    assert_eq!(service.find_message(at(0), at(40), 1).unwrap(), "at thirty");
    assert_eq!(service.find_message(at(0), at(40), 2).unwrap(), "at twenty");
    assert_eq!(service.find_message(at(0), at(40), 3).unwrap(), "at ten");

    let error = service.find_message(at(0), at(40), 4).unwrap_err();
    assert_eq!(error, MessagingError::NotEnoughMessages);
    assert_eq!(error.to_string(), "K is greater than the number of messages");

    assert_eq!(service.find_message(at(-1), at(41), 5).unwrap(), "at zero");
}

#[test]
fn test_find_message_on_empty_window() {
    let service = service();
    let now = Utc::now();

    assert_eq!(
        service.find_message(now, now + Duration::hours(1), 1).unwrap_err(),
        MessagingError::NotEnoughMessages
    );
    assert!(service
        .find_message(now, now + Duration::hours(1), 0)
        .unwrap_err()
        .is_validation());
}

#[test]
fn test_group_serializes_to_json() {
    let mut service = service();
    let members = register(&mut service, &["Alice", "Bob", "Carol"]);
    let group = service.create_group(&members).unwrap();

    let json = serde_json::to_value(&group).unwrap();
    assert_eq!(json["name"], "Group 1");
    assert_eq!(json["participants"], 3);
    assert_eq!(json["kind"], "named");
}
