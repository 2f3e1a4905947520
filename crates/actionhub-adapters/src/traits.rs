//! Core adapter trait and supporting types.
//!
//! Every vendor integration (weather, news, movies, nutrition) and the local
//! temperature converter implements the [`Adapter`] trait.  The registry
//! discovers tools via [`Adapter::tools`] and runs them via
//! [`Adapter::execute_tool`]; hosts that want a plain string call
//! [`Adapter::invoke`], which never fails.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::config::Vendor;
use crate::error::Result;

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

/// Whether an adapter can currently serve requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    /// Every credential the adapter needs is present.
    Healthy,
    /// The adapter's credential is missing; its tools answer with the
    /// missing-credential message.
    Unconfigured,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            Self::Healthy => "healthy",
            Self::Unconfigured => "unconfigured",
        })
    }
}

/// A tool exposed by an adapter that the agent can invoke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Machine-readable tool name (e.g. `get_weather`, `search_news`).
    pub name: String,
    /// Human-readable description the LLM uses to pick the tool.
    pub description: String,
    /// JSON Schema describing the tool's input parameters.
    pub parameters: Value,
}

impl ToolDefinition {
    /// Names of the parameters listed under `required`, in declared order.
    pub fn required_params(&self) -> Vec<&str> {
        self.parameters
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Name of the first declared property, required or not.
    pub fn first_param(&self) -> Option<&str> {
        self.required_params().first().copied().or_else(|| {
            self.parameters
                .get("properties")
                .and_then(Value::as_object)
                .and_then(|props| props.keys().next())
                .map(String::as_str)
        })
    }
}

/// Authentication requirements for an adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthRequirement {
    /// The vendor whose key is needed.
    pub vendor: Vendor,
    /// The environment variable the key is read from.
    pub env_var: &'static str,
}

impl AuthRequirement {
    pub fn for_vendor(vendor: Vendor) -> Self {
        Self {
            vendor,
            env_var: vendor.env_var(),
        }
    }
}

// ---------------------------------------------------------------------------
// Core trait
// ---------------------------------------------------------------------------

/// The universal action adapter interface.
#[async_trait]
pub trait Adapter: Send + Sync {
    /// Return the unique identifier for this adapter instance.
    fn id(&self) -> &str;

    /// Return the list of tools this adapter exposes.
    fn tools(&self) -> Vec<ToolDefinition>;

    /// Return the credential this adapter needs, if any.
    fn required_auth(&self) -> Option<AuthRequirement>;

    /// Report whether the adapter's credential is configured.
    fn status(&self) -> HealthStatus;

    /// Execute a named tool with the given JSON parameters.
    async fn execute_tool(&self, name: &str, params: &Value) -> Result<String>;

    /// Execute a tool and downgrade any failure to its user-facing message.
    async fn invoke(&self, name: &str, params: &Value) -> String {
        match self.execute_tool(name, params).await {
            Ok(text) => text,
            Err(e) => {
                warn!(adapter = self.id(), tool = name, error = %e, "action failed");
                e.user_message()
            }
        }
    }
}

/// Build a `{"type":"object"}` JSON Schema from `(name, type, description)`
/// triples; `required` lists the mandatory names.
pub(crate) fn object_schema(props: &[(&str, &str, &str)], required: &[&str]) -> Value {
    let properties: serde_json::Map<String, Value> = props
        .iter()
        .map(|(name, ty, description)| {
            (
                (*name).to_owned(),
                serde_json::json!({ "type": ty, "description": description }),
            )
        })
        .collect();
    serde_json::json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}
