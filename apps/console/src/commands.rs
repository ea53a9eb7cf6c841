//! Slash-command parsing for the interactive console.

/// A parsed console command.
///
/// Users are addressed by mobile number and groups by their position in the
/// `/groups` listing, since generated group names contain spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Help,
    Quit,
    Groups,
    User { name: String, mobile: String },
    Group { mobiles: Vec<String> },
    Send { mobile: String, group: usize, content: String },
    Admin { approver: String, user: String, group: usize },
    Remove { mobile: String },
    Find { k: usize, minutes: i64 },
}

const DEFAULT_FIND_MINUTES: i64 = 60;

pub const HELP: &str = "\
Available commands:
  /user <name> <mobile>                      - Register a user
  /group <mobile> <mobile> [<mobile>...]     - Create a group, first user is admin
  /send <mobile> <group#> <content...>       - Send a message to a group
  /admin <approver> <mobile> <group#>        - Transfer admin rights
  /remove <mobile>                           - Remove a user and their messages
  /find <k> [minutes]                        - k-th latest message of the last N minutes
  /groups, /g                                - List groups
  /help, /h                                  - Show this help
  /quit, /exit, /q                           - Exit console";

pub fn parse(line: &str) -> Result<ConsoleCommand, String> {
    let mut parts = line.split_whitespace();
    let head = parts.next().ok_or_else(|| "empty command".to_string())?;
    let args: Vec<&str> = parts.collect();

    match head {
        "/help" | "/h" => Ok(ConsoleCommand::Help),
        "/quit" | "/exit" | "/q" => Ok(ConsoleCommand::Quit),
        "/groups" | "/g" => Ok(ConsoleCommand::Groups),
        "/user" => match args.as_slice() {
            [name, mobile] => Ok(ConsoleCommand::User {
                name: name.to_string(),
                mobile: mobile.to_string(),
            }),
            _ => Err("usage: /user <name> <mobile>".to_string()),
        },
        "/group" => {
            if args.len() < 2 {
                return Err("usage: /group <mobile> <mobile> [<mobile>...]".to_string());
            }
            Ok(ConsoleCommand::Group {
                mobiles: args.iter().map(|mobile| mobile.to_string()).collect(),
            })
        }
        "/send" => match args.as_slice() {
            [mobile, group, content @ ..] if !content.is_empty() => Ok(ConsoleCommand::Send {
                mobile: mobile.to_string(),
                group: group_index(group)?,
                content: content.join(" "),
            }),
            _ => Err("usage: /send <mobile> <group#> <content...>".to_string()),
        },
        "/admin" => match args.as_slice() {
            [approver, user, group] => Ok(ConsoleCommand::Admin {
                approver: approver.to_string(),
                user: user.to_string(),
                group: group_index(group)?,
            }),
            _ => Err("usage: /admin <approver> <mobile> <group#>".to_string()),
        },
        "/remove" => match args.as_slice() {
            [mobile] => Ok(ConsoleCommand::Remove {
                mobile: mobile.to_string(),
            }),
            _ => Err("usage: /remove <mobile>".to_string()),
        },
        "/find" => match args.as_slice() {
            [k] => Ok(ConsoleCommand::Find {
                k: number(k)?,
                minutes: DEFAULT_FIND_MINUTES,
            }),
            [k, minutes] => Ok(ConsoleCommand::Find {
                k: number(k)?,
                minutes: window_minutes(minutes)?,
            }),
            _ => Err("usage: /find <k> [minutes]".to_string()),
        },
        other => Err(format!("unknown command: {other} (try /help)")),
    }
}

fn number(raw: &str) -> Result<usize, String> {
    raw.parse().map_err(|_| format!("invalid number: {raw}"))
}

fn window_minutes(raw: &str) -> Result<i64, String> {
    match raw.parse::<i64>() {
        Ok(minutes) if minutes > 0 => Ok(minutes),
        _ => Err(format!("invalid number of minutes: {raw} (must be a positive number)")),
    }
}

fn group_index(raw: &str) -> Result<usize, String> {
    match number(raw)? {
        0 => Err("group numbers start at 1".to_string()),
        index => Ok(index),
    }
}
