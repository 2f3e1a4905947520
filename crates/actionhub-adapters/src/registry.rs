//! Action registry.
//!
//! Maps every action name to the adapter that serves it, together with the
//! declared [`ToolDefinition`].  The registry is built once at process start
//! and handed to whatever integrates with the LLM host: the host reads
//! [`ActionRegistry::definitions`] to declare functions and calls
//! [`ActionRegistry::invoke`] when the model selects one.
//!
//! ```text
//! ActionConfig ──► ActionRegistry::with_defaults ──► restrict(profile)
//!                          │
//!            definitions() ┤ invoke(name, params) ──► String
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::ActionConfig;
use crate::error::{ActionError, ConfigError, Result};
use crate::http::{HttpClient, ReqwestClient};
use crate::movie::MovieAdapter;
use crate::news::NewsAdapter;
use crate::nutrition::NutritionAdapter;
use crate::profile::AgentProfile;
use crate::temperature::TemperatureAdapter;
use crate::traits::{Adapter, HealthStatus, ToolDefinition};
use crate::weather::WeatherAdapter;

/// Health snapshot of one registered adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct AdapterStatus {
    pub adapter_id: String,
    pub health: HealthStatus,
    /// Environment variable the adapter's key comes from, if it needs one.
    pub env_var: Option<&'static str>,
    /// Actions this adapter serves in this registry.
    pub actions: Vec<String>,
}

/// Registry of action name → adapter.
///
/// Cheaply cloneable: adapters are shared behind `Arc`.
#[derive(Clone, Default)]
pub struct ActionRegistry {
    adapters: Vec<Arc<dyn Adapter>>,
    /// Declared tools in registration order.
    definitions: Vec<ToolDefinition>,
    /// Action name → index into `adapters`.
    index: HashMap<String, usize>,
}

impl ActionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in adapter, sharing `config` and `http`.
    pub fn with_defaults(
        config: Arc<ActionConfig>,
        http: Arc<dyn HttpClient>,
    ) -> std::result::Result<Self, ConfigError> {
        let mut registry = Self::new();
        registry.register(Arc::new(WeatherAdapter::new(
            "weather",
            Arc::clone(&config),
            Arc::clone(&http),
        )))?;
        registry.register(Arc::new(NewsAdapter::new(
            "news",
            Arc::clone(&config),
            Arc::clone(&http),
        )))?;
        registry.register(Arc::new(MovieAdapter::new(
            "movies",
            Arc::clone(&config),
            Arc::clone(&http),
        )))?;
        registry.register(Arc::new(NutritionAdapter::new(
            "nutrition",
            Arc::clone(&config),
            http,
        )))?;
        registry.register(Arc::new(TemperatureAdapter::new("temperature")))?;
        Ok(registry)
    }

    /// Registry with every built-in adapter talking to the real vendors.
    pub fn from_config(config: ActionConfig) -> std::result::Result<Self, ConfigError> {
        let http: Arc<dyn HttpClient> = Arc::new(ReqwestClient::new(&config));
        Self::with_defaults(Arc::new(config), http)
    }

    /// Register an adapter under every tool name it declares.
    ///
    /// Fails without registering anything if one of those names is taken.
    pub fn register(&mut self, adapter: Arc<dyn Adapter>) -> std::result::Result<(), ConfigError> {
        let tools = adapter.tools();
        let mut seen = HashSet::with_capacity(tools.len());
        for tool in &tools {
            if let Some(&existing) = self.index.get(&tool.name) {
                return Err(ConfigError::DuplicateAction {
                    name: tool.name.clone(),
                    existing: self.adapters[existing].id().to_owned(),
                });
            }
            if !seen.insert(tool.name.as_str()) {
                return Err(ConfigError::DuplicateAction {
                    name: tool.name.clone(),
                    existing: adapter.id().to_owned(),
                });
            }
        }

        let slot = self.adapters.len();
        info!(
            adapter_id = adapter.id(),
            actions = tools.len(),
            health = %adapter.status(),
            "adapter registered"
        );
        for tool in tools {
            self.index.insert(tool.name.clone(), slot);
            self.definitions.push(tool);
        }
        self.adapters.push(adapter);
        Ok(())
    }

    /// Declared tools, in registration order.
    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    pub fn definition(&self, name: &str) -> Option<&ToolDefinition> {
        self.definitions.iter().find(|d| d.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Run an action and return its typed result.
    pub async fn execute(&self, name: &str, params: &Value) -> Result<String> {
        let slot = *self
            .index
            .get(name)
            .ok_or_else(|| ActionError::UnknownAction {
                name: name.to_owned(),
            })?;
        let adapter = &self.adapters[slot];

        debug!(adapter_id = adapter.id(), action = name, "invoking action");
        let start = Instant::now();
        let result = adapter.execute_tool(name, params).await;
        debug!(
            action = name,
            ok = result.is_ok(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "action finished"
        );
        result
    }

    /// Run an action; any failure becomes its user-facing message.
    pub async fn invoke(&self, name: &str, params: &Value) -> String {
        match self.execute(name, params).await {
            Ok(text) => text,
            Err(e) => {
                warn!(action = name, upstream = e.is_upstream(), error = %e, "action failed");
                e.user_message()
            }
        }
    }

    /// Health of every adapter that still serves at least one action.
    pub fn status(&self) -> Vec<AdapterStatus> {
        self.adapters
            .iter()
            .enumerate()
            .filter_map(|(slot, adapter)| {
                let actions: Vec<String> = self
                    .definitions
                    .iter()
                    .filter(|d| self.index.get(&d.name) == Some(&slot))
                    .map(|d| d.name.clone())
                    .collect();
                if actions.is_empty() {
                    return None;
                }
                Some(AdapterStatus {
                    adapter_id: adapter.id().to_owned(),
                    health: adapter.status(),
                    env_var: adapter.required_auth().map(|auth| auth.env_var),
                    actions,
                })
            })
            .collect()
    }

    /// Health of the adapter serving `name`.
    pub fn health_of(&self, name: &str) -> Option<HealthStatus> {
        self.index.get(name).map(|&slot| self.adapters[slot].status())
    }

    /// A view limited to the actions a profile enables.
    ///
    /// A profile with no actions listed keeps everything.
    pub fn restrict(&self, profile: &AgentProfile) -> std::result::Result<Self, ConfigError> {
        if profile.actions.is_empty() {
            return Ok(self.clone());
        }
        if let Some(unknown) = profile.actions.iter().find(|a| !self.contains(a)) {
            return Err(ConfigError::UnknownProfileAction {
                profile: profile.name.clone(),
                action: unknown.clone(),
            });
        }

        let definitions: Vec<ToolDefinition> = self
            .definitions
            .iter()
            .filter(|d| profile.actions.contains(&d.name))
            .cloned()
            .collect();
        let index = definitions
            .iter()
            .map(|d| (d.name.clone(), self.index[&d.name]))
            .collect();

        debug!(profile = %profile.name, actions = definitions.len(), "registry restricted");
        Ok(Self {
            adapters: self.adapters.clone(),
            definitions,
            index,
        })
    }
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionRegistry")
            .field(
                "actions",
                &self.definitions.iter().map(|d| &d.name).collect::<Vec<_>>(),
            )
            .finish()
    }
}
