//! Shared helper functions used across CLI subcommands.
//!
//! Includes tracing initialization, configuration and registry setup, and
//! parameter assembly for `invoke`.

use std::path::Path;

use actionhub_adapters::{ActionConfig, ActionRegistry, AgentProfile};
use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};
use tracing::info;
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Tracing
// ---------------------------------------------------------------------------

/// Initialize the tracing subscriber with the given default log level.
///
/// `RUST_LOG` takes precedence when set.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

// ---------------------------------------------------------------------------
// Setup
// ---------------------------------------------------------------------------

/// Load keys from the environment and settings from `config_path`.
pub fn load_config(config_path: Option<&Path>) -> Result<ActionConfig> {
    let config = ActionConfig::load(config_path).context("failed to load configuration")?;
    info!(
        timeout_secs = config.request_timeout().as_secs(),
        credentials = ?config.credentials(),
        "configuration loaded"
    );
    Ok(config)
}

/// Build the registry, restricted to `profile_path` when one is given.
pub fn build_registry(
    config: ActionConfig,
    profile_path: Option<&Path>,
) -> Result<(ActionRegistry, Option<AgentProfile>)> {
    let registry =
        ActionRegistry::from_config(config).context("failed to register actions")?;

    match profile_path {
        Some(path) => {
            let profile = AgentProfile::load(path)
                .with_context(|| format!("failed to load profile {}", path.display()))?;
            let view = registry
                .restrict(&profile)
                .with_context(|| format!("profile `{}` is not usable", profile.name))?;
            info!(profile = %profile.name, actions = view.len(), "profile applied");
            Ok((view, Some(profile)))
        }
        None => Ok((registry, None)),
    }
}

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Merge a JSON object and `key=value` pairs into one parameter object.
pub fn build_params(pairs: &[(String, String)], json: Option<&str>) -> Result<Value> {
    let mut params = match json {
        Some(raw) => match serde_json::from_str::<Value>(raw).context("--json is not valid JSON")? {
            Value::Object(map) => map,
            other => bail!("--json must be a JSON object, got {other}"),
        },
        None => Map::new(),
    };
    for (key, value) in pairs {
        params.insert(key.clone(), Value::String(value.clone()));
    }
    Ok(Value::Object(params))
}
