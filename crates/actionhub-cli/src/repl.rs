//! Subcommand: `actionhub repl` -- interactive action loop.
//!
//! Each line names an action followed either by `key=value` pairs or by free
//! text, which fills the action's first parameter:
//!
//! ```text
//! > get_weather city=Paris units=imperial
//! > get_movie_info The Matrix
//! ```

use std::io::{self, Write as _};

use actionhub_adapters::{ActionRegistry, AgentProfile};
use anyhow::Result;
use serde_json::{Map, Value};
use tracing::info;

/// What one input line asks for.
#[derive(Debug, PartialEq)]
pub enum ReplCommand {
    Empty,
    Exit,
    Help,
    List,
    Invoke { action: String, params: Value },
}

/// Interpret one input line against the registry's declared actions.
pub fn parse_line(line: &str, registry: &ActionRegistry) -> ReplCommand {
    let trimmed = line.trim();
    let (head, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (trimmed, ""),
    };

    match head.to_ascii_lowercase().as_str() {
        "" => return ReplCommand::Empty,
        "exit" | "quit" | "bye" if rest.is_empty() => return ReplCommand::Exit,
        "help" | "?" if rest.is_empty() => return ReplCommand::Help,
        "list" if rest.is_empty() => return ReplCommand::List,
        _ => {}
    }

    let params = if rest.is_empty() {
        Map::new()
    } else if let Some(pairs) = key_value_pairs(rest) {
        pairs
    } else {
        let field = registry
            .definition(head)
            .and_then(|def| def.first_param())
            .unwrap_or("query");
        let mut params = Map::new();
        params.insert(field.to_owned(), Value::String(rest.to_owned()));
        params
    };

    ReplCommand::Invoke {
        action: head.to_owned(),
        params: Value::Object(params),
    }
}

/// Parse `key=value` pairs; words without `=` continue the previous value,
/// so `city=New York units=metric` keeps the space.  `None` when the text
/// does not start with a pair.
fn key_value_pairs(text: &str) -> Option<Map<String, Value>> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    for token in text.split_whitespace() {
        match token.split_once('=').filter(|(k, _)| !k.is_empty()) {
            Some((key, value)) => pairs.push((key.to_owned(), value.to_owned())),
            None => {
                let (_, value) = pairs.last_mut()?;
                value.push(' ');
                value.push_str(token);
            }
        }
    }
    Some(
        pairs
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect(),
    )
}

/// Print every action with its parameters.
pub fn print_actions(registry: &ActionRegistry) {
    for def in registry.definitions() {
        let required = def.required_params();
        let health = registry
            .health_of(&def.name)
            .map(|h| h.to_string())
            .unwrap_or_default();
        println!("  {:<26} [{}] {}", def.name, health, required.join(", "));
    }
}

fn print_help() {
    println!("  <action> key=value ...   run an action with named parameters");
    println!("  <action> free text       free text fills the action's first parameter");
    println!("  list                     show available actions");
    println!("  help                     show this message");
    println!("  exit | quit | bye        leave");
}

/// Run the interactive loop until EOF or an exit command.
pub async fn run(registry: ActionRegistry, profile: Option<AgentProfile>) -> Result<()> {
    info!(actions = registry.len(), "starting action REPL");

    println!();
    println!("  ActionHub v{}", env!("CARGO_PKG_VERSION"));
    if let Some(ref profile) = profile {
        println!("  Profile: {}", profile.name);
        if let Some(ref persona) = profile.persona {
            println!("  Persona: {persona}");
        }
    }
    println!("  Actions: {}", registry.len());
    println!("  Type 'help' for usage, or 'exit' to quit.");
    println!();

    let stdin = io::stdin();
    let mut line_buf = String::new();

    loop {
        print!("> ");
        io::stdout().flush().ok();

        line_buf.clear();
        match stdin.read_line(&mut line_buf) {
            Ok(0) => {
                println!();
                info!("EOF received, exiting");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("  Error reading input: {e}");
                continue;
            }
        }

        match parse_line(&line_buf, &registry) {
            ReplCommand::Empty => continue,
            ReplCommand::Exit => {
                info!("user requested exit");
                println!("  Goodbye!");
                break;
            }
            ReplCommand::Help => print_help(),
            ReplCommand::List => print_actions(&registry),
            ReplCommand::Invoke { action, params } => {
                let output = registry.invoke(&action, &params).await;
                println!("{output}");
                println!();
            }
        }
    }

    Ok(())
}
