//! Agent profiles.
//!
//! A profile names an agent, gives it an optional persona prompt, and lists
//! the actions it may call:
//!
//! ```text
//! name: WeatherBot
//! persona: You are a helpful assistant that reports the weather.
//! actions: [get_weather, celsius_to_fahrenheit]
//! ```
//!
//! An empty or absent `actions` list enables every registered action.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentProfile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona: Option<String>,
    #[serde(default)]
    pub actions: Vec<String>,
}

impl AgentProfile {
    /// Parse a profile from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let mut profile: Self = serde_yaml::from_str(text)?;

        profile.name = profile.name.trim().to_owned();
        if profile.name.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "name".into(),
                reason: "profile name must not be empty".into(),
            });
        }
        profile.persona = profile
            .persona
            .map(|p| p.trim().to_owned())
            .filter(|p| !p.is_empty());

        let mut actions: Vec<String> = Vec::with_capacity(profile.actions.len());
        for action in profile.actions {
            let action = action.trim().to_owned();
            if action.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "actions".into(),
                    reason: "action names must not be empty".into(),
                });
            }
            if !actions.contains(&action) {
                actions.push(action);
            }
        }
        profile.actions = actions;

        Ok(profile)
    }

    /// Read and parse a profile file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let profile = Self::from_yaml(&text)?;
        tracing::debug!(
            path = %path.display(),
            profile = %profile.name,
            actions = profile.actions.len(),
            "agent profile loaded"
        );
        Ok(profile)
    }

    /// Whether this profile allows `action`.
    pub fn allows(&self, action: &str) -> bool {
        self.actions.is_empty() || self.actions.iter().any(|a| a == action)
    }
}
