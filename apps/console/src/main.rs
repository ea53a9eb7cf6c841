use std::io::{BufRead, Write};

use anyhow::Context;
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use parley_config::load as load_config;
use parley_messaging::{Message, MessagingService};
use parley_runtime::{telemetry, MessagingRuntime};
use tracing::{info, warn};

mod commands;
mod session;

use commands::ConsoleCommand;
use session::Session;

#[derive(Parser)]
#[command(name = "parley-console")]
#[command(about = "Parley messaging core (console by default)")]
struct Cli {
    /// Print created groups as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scripted walkthrough
    Demo,
    /// Start interactive console (default)
    Console,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config().context("failed to load configuration")?;
    telemetry::init_tracing(&config.telemetry.filter).context("failed to initialise tracing")?;

    let runtime = MessagingRuntime::initialise(&config);

    match cli.command.unwrap_or(Commands::Console) {
        Commands::Demo => run_demo(runtime.service, cli.json),
        Commands::Console => run_console(runtime.service, cli.json),
    }
}

fn run_demo(mut service: MessagingService, json: bool) -> anyhow::Result<()> {
    info!("running walkthrough");

    let mut register = |name: &str, mobile: &str| {
        service
            .create_user(name, mobile)
            .with_context(|| format!("failed to register {name}"))
    };
    let alice = register("Alice", "555-0100")?;
    let bob = register("Bob", "555-0101")?;
    let carol = register("Carol", "555-0102")?;
    let dan = register("Dan", "555-0103")?;
    let evan = register("Evan", "555-0104")?;
    let felix = register("Felix", "555-0105")?;
    let graham = register("Graham", "555-0106")?;
    let hugh = register("Hugh", "555-0107")?;

    match service.create_user("Alice again", "555-0100") {
        Ok(_) => warn!("duplicate registration unexpectedly succeeded"),
        Err(error) => println!("duplicate mobile: {error}"),
    }

    println!("=== GROUPS ===");
    let team = service.create_group(&[alice.clone(), bob.clone(), carol.clone()])?;
    let chat = service.create_group(&[dan.clone(), evan.clone()])?;
    let crew = service.create_group(&[felix.clone(), graham, hugh])?;
    for group in [&team, &chat, &crew] {
        if json {
            println!("{}", serde_json::to_string(group)?);
        } else {
            println!("{:<10} {} participants", group.name, group.participants);
        }
    }

    println!("\n=== MESSAGES ===");
    let start = Utc::now() - Duration::seconds(1);
    for (sender, group, content) in [
        (&alice, &team, "Welcome to the team"),
        (&bob, &team, "Thanks!"),
        (&dan, &chat, "Lunch?"),
        (&carol, &team, "Hello from Carol"),
        (&bob, &team, "Bob again"),
    ] {
        let id = service.create_message(content);
        let count = service.send_message(&Message::new(id, content), sender, group)?;
        println!("#{id} {:<8} -> {:<8} ({count} in group)", sender.name, group.name);
    }

    let intruder = Message::new(service.create_message("hi"), "hi");
    if let Err(error) = service.send_message(&intruder, &felix, &team) {
        println!("felix in {}: {error}", team.name);
    }

    println!("\n=== ADMIN ===");
    if let Err(error) = service.change_admin(&bob, &carol, &team) {
        println!("bob approving: {error}");
    }
    service.change_admin(&alice, &bob, &team)?;
    println!("{} is now admin of {}", bob.name, team.name);

    println!("\n=== REMOVAL ===");
    if let Err(error) = service.remove_user(&bob) {
        println!("removing bob: {error}");
    }
    let total = service.remove_user(&carol)?;
    println!("removed carol: {total}");

    println!("\n=== SEARCH ===");
    let end = Utc::now() + Duration::seconds(1);
    let latest = service.find_message(start, end, 1)?;
    println!("most recent: {latest}");
    if let Err(error) = service.find_message(start, end, 10) {
        println!("10th most recent: {error}");
    }

    Ok(())
}

fn run_console(service: MessagingService, json: bool) -> anyhow::Result<()> {
    info!("starting interactive console");

    let mut session = Session::new(service, json);

    println!("Parley Interactive Console");
    println!("Type commands like '/help', '/user', '/group', '/send', '/quit'");
    println!("---");

    let stdin = std::io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        line.clear();
        let bytes_read = reader.read_line(&mut line)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let command = match commands::parse(input) {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };
        let quit = command == ConsoleCommand::Quit;

        match session.execute(command) {
            Ok(output) => println!("{output}"),
            Err(error) => println!("error: {error}"),
        }

        if quit {
            break;
        }
    }

    Ok(())
}
