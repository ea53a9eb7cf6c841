//! Console session state: the service plus lookup tables for what the user
//! created during this run.

use std::collections::HashMap;

use anyhow::{anyhow, Result};
use chrono::{Duration, Utc};
use parley_messaging::{Group, Message, MessagingService, User};

use crate::commands::ConsoleCommand;

pub struct Session {
    service: MessagingService,
    users: HashMap<String, User>,
    json: bool,
}

impl Session {
    pub fn new(service: MessagingService, json: bool) -> Self {
        Self {
            service,
            users: HashMap::new(),
            json,
        }
    }

    /// Run one command and return the text to print
    pub fn execute(&mut self, command: ConsoleCommand) -> Result<String> {
        match command {
            ConsoleCommand::Help => Ok(crate::commands::HELP.to_string()),
            ConsoleCommand::Quit => Ok("Goodbye!".to_string()),
            ConsoleCommand::Groups => Ok(self.describe_groups()),
            ConsoleCommand::User { name, mobile } => {
                let user = self.service.create_user(&name, &mobile)?;
                self.users.insert(mobile.clone(), user);
                Ok(format!("SUCCESS: registered {name} ({mobile})"))
            }
            ConsoleCommand::Group { mobiles } => {
                let members = mobiles
                    .iter()
                    .map(|mobile| self.user(mobile).cloned())
                    .collect::<Result<Vec<_>>>()?;
                let group = self.service.create_group(&members)?;
                if self.json {
                    Ok(serde_json::to_string_pretty(&group)?)
                } else {
                    Ok(format!(
                        "created \"{}\" with {} participants",
                        group.name, group.participants
                    ))
                }
            }
            ConsoleCommand::Send {
                mobile,
                group,
                content,
            } => {
                let sender = self.user(&mobile)?.clone();
                let group = self.group(group)?;
                let id = self.service.create_message(&content);
                let count = self
                    .service
                    .send_message(&Message::new(id, content), &sender, &group)?;
                Ok(format!(
                    "message {id} sent to \"{}\" ({count} messages)",
                    group.name
                ))
            }
            ConsoleCommand::Admin {
                approver,
                user,
                group,
            } => {
                let approver = self.user(&approver)?.clone();
                let user = self.user(&user)?.clone();
                let group = self.group(group)?;
                self.service.change_admin(&approver, &user, &group)?;
                Ok(format!("SUCCESS: {} now administers \"{}\"", user.name, group.name))
            }
            ConsoleCommand::Remove { mobile } => {
                let user = self.user(&mobile)?.clone();
                let total = self.service.remove_user(&user)?;
                Ok(format!("removed {} ({total})", user.name))
            }
            ConsoleCommand::Find { k, minutes } => {
                let end = Utc::now();
                let start = Duration::try_minutes(minutes)
                    .and_then(|window| end.checked_sub_signed(window))
                    .ok_or_else(|| anyhow!("search window of {minutes} minutes is out of range"))?;
                let content = self.service.find_message(start, end, k)?;
                Ok(content)
            }
        }
    }

    fn user(&self, mobile: &str) -> Result<&User> {
        self.users
            .get(mobile)
            .ok_or_else(|| anyhow!("no user with mobile {mobile} in this session"))
    }

    fn group(&self, position: usize) -> Result<Group> {
        self.service
            .groups()
            .into_iter()
            .nth(position.saturating_sub(1))
            .ok_or_else(|| anyhow!("no group #{position} (see /groups)"))
    }

    fn describe_groups(&self) -> String {
        let groups = self.service.groups();
        if groups.is_empty() {
            return "No groups yet".to_string();
        }

        let mut lines = vec![format!(
            "{:<4} {:<20} {:<10} {:<10} {:<20}",
            "#", "Name", "Members", "Messages", "Admin"
        )];
        for (index, group) in groups.iter().enumerate() {
            let members = self.service.group_members(group).map(|m| m.len()).unwrap_or(0);
            let messages = self.service.group_messages(group).map(|m| m.len()).unwrap_or(0);
            let admin = self
                .service
                .group_admin(group)
                .map(|admin| admin.name)
                .unwrap_or_else(|_| "-".to_string());
            lines.push(format!(
                "{:<4} {:<20} {:<10} {:<10} {:<20}",
                index + 1,
                group.name,
                members,
                messages,
                admin
            ));
        }
        lines.join("\n")
    }
}
