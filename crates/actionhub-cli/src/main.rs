//! CLI entry point for ActionHub.
//!
//! This binary provides the `actionhub` command with subcommands for listing,
//! inspecting and running agent actions.

mod cli;
mod helpers;
mod repl;

use actionhub_adapters::{AgentProfile, HealthStatus};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use crate::cli::{Cli, Commands};
use crate::helpers::{build_params, build_registry, init_tracing, load_config};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; real environment variables still apply.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(match cli.command {
        Commands::Repl => "info",
        _ => "warn",
    });

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::List => {
            let (registry, profile) = build_registry(config, cli.profile.as_deref())?;
            if let Some(profile) = profile {
                println!("  Profile: {}", profile.name);
            }
            for def in registry.definitions() {
                println!("  {:<26} {}", def.name, def.description);
                let required = def.required_params();
                if !required.is_empty() {
                    println!("  {:<26} requires: {}", "", required.join(", "));
                }
            }
            Ok(())
        }

        Commands::Status => {
            let (registry, _) = build_registry(config, cli.profile.as_deref())?;
            for status in registry.status() {
                let needs = status.env_var.unwrap_or("no key needed");
                println!(
                    "  {:<12} {:<13} {:<26} {} action(s)",
                    status.adapter_id,
                    status.health,
                    needs,
                    status.actions.len()
                );
            }
            Ok(())
        }

        Commands::Invoke { action, args, json } => {
            let (registry, _) = build_registry(config, cli.profile.as_deref())?;
            let params = build_params(&args, json.as_deref())?;
            info!(action = %action, "invoking from command line");
            println!("{}", registry.invoke(&action, &params).await);
            Ok(())
        }

        Commands::Profile { path } => {
            let profile = AgentProfile::load(&path)
                .with_context(|| format!("failed to load profile {}", path.display()))?;
            let (registry, _) = build_registry(config, None)?;
            let registry = registry
                .restrict(&profile)
                .with_context(|| format!("profile `{}` is not usable", profile.name))?;

            println!("  Name:    {}", profile.name);
            println!(
                "  Persona: {}",
                profile.persona.as_deref().unwrap_or("(none)")
            );
            if profile.actions.is_empty() {
                println!("  Actions: all registered actions");
            }
            for def in registry.definitions() {
                let health = registry
                    .health_of(&def.name)
                    .unwrap_or(HealthStatus::Unconfigured);
                println!("    {:<26} {health}", def.name);
            }
            Ok(())
        }

        Commands::Repl => {
            let (registry, profile) = build_registry(config, cli.profile.as_deref())?;
            repl::run(registry, profile).await
        }
    }
}
