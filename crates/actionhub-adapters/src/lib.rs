//! Agent actions for ActionHub: weather, news, movies, nutrition and
//! temperature conversion.
//!
//! Each adapter implements the [`Adapter`] trait defined in [`traits`],
//! providing a uniform interface for tool discovery and execution.  The
//! [`ActionRegistry`] collects them behind one name → action table whose
//! [`invoke`](ActionRegistry::invoke) always returns a string.

pub mod config;
pub mod error;
pub mod fields;
pub mod http;
pub mod movie;
pub mod news;
pub mod nutrition;
pub mod params;
pub mod profile;
pub mod registry;
pub mod temperature;
pub mod traits;
pub mod weather;

pub use config::{ActionConfig, Credentials, Vendor};
pub use error::{ActionError, ConfigError, Result};
pub use http::{HttpClient, HttpRequest, HttpResponse, ReqwestClient, TransportError};
pub use movie::MovieAdapter;
pub use news::NewsAdapter;
pub use nutrition::NutritionAdapter;
pub use profile::AgentProfile;
pub use registry::{ActionRegistry, AdapterStatus};
pub use temperature::TemperatureAdapter;
pub use traits::{Adapter, AuthRequirement, HealthStatus, ToolDefinition};
pub use weather::WeatherAdapter;
