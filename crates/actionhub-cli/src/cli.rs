//! CLI argument definitions for ActionHub.
//!
//! All `clap` structures live here so that `main.rs` stays focused on
//! dispatching subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// ActionHub -- agent actions backed by public REST APIs.
#[derive(Parser)]
#[command(
    name = "actionhub",
    version,
    about = "ActionHub -- weather, news, movie, nutrition and temperature actions for agents",
    long_about = "Lists, inspects and runs the actions an LLM agent can call. API keys are \
                  read from the environment (or a .env file in the working directory)."
)]
pub struct Cli {
    /// TOML settings file with timeout and endpoint overrides.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Agent profile (YAML) limiting which actions are available.
    #[arg(long, global = true, value_name = "PATH")]
    pub profile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List every available action and its parameters.
    List,

    /// Show each adapter's health and the key it needs.
    Status,

    /// Run one action and print its result.
    Invoke {
        /// The action name, e.g. `get_weather`.
        action: String,

        /// A parameter as `key=value`; repeatable.
        #[arg(long = "arg", short = 'a', value_name = "KEY=VALUE", value_parser = parse_key_value)]
        args: Vec<(String, String)>,

        /// Parameters as a JSON object; `--arg` values take precedence.
        #[arg(long, value_name = "JSON")]
        json: Option<String>,
    },

    /// Show an agent profile and the health of the actions it enables.
    Profile {
        /// Path to the profile YAML file.
        path: PathBuf,
    },

    /// Start an interactive loop for trying actions by hand.
    Repl,
}

/// Parse a `key=value` pair; the value may itself contain `=`.
pub fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in `{raw}`"));
    }
    Ok((key.to_owned(), value.trim().to_owned()))
}
