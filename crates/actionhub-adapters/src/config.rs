//! Credentials and per-process action configuration.
//!
//! API keys are read once, when the configuration is built, and are shared
//! read-only by every adapter.  Tests build a [`Credentials`] from a lookup
//! closure instead of touching the process environment.
//!
//! An optional TOML settings file can override the request timeout, the
//! user agent, and each vendor's base URL:
//!
//! ```toml
//! [http]
//! timeout_secs = 10
//!
//! [endpoints]
//! openweathermap = "http://localhost:8080/data/2.5"
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{ActionError, ConfigError};

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default `User-Agent` sent with every vendor request.
pub const DEFAULT_USER_AGENT: &str = concat!("ActionHub/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Vendor
// ---------------------------------------------------------------------------

/// The external API providers actions can call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vendor {
    OpenWeatherMap,
    NewsApi,
    Tmdb,
    UsdaFoodData,
}

impl Vendor {
    /// All vendors, in a stable order.
    pub const ALL: [Vendor; 4] = [
        Vendor::OpenWeatherMap,
        Vendor::NewsApi,
        Vendor::Tmdb,
        Vendor::UsdaFoodData,
    ];

    /// Environment variable holding this vendor's API key.
    pub fn env_var(self) -> &'static str {
        match self {
            Self::OpenWeatherMap => "OPEN_WEATHER_MAP_API_KEY",
            Self::NewsApi => "NEWS_API_KEY",
            Self::Tmdb => "TMDB_API_KEY",
            Self::UsdaFoodData => "USDA_API_KEY",
        }
    }

    /// Base URL used when no override is configured.
    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::OpenWeatherMap => "https://api.openweathermap.org/data/2.5",
            Self::NewsApi => "https://newsapi.org/v2",
            Self::Tmdb => "https://api.themoviedb.org/3",
            Self::UsdaFoodData => "https://api.nal.usda.gov/fdc/v1",
        }
    }
}

impl std::fmt::Display for Vendor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenWeatherMap => write!(f, "OpenWeatherMap"),
            Self::NewsApi => write!(f, "NewsAPI"),
            Self::Tmdb => write!(f, "TMDb"),
            Self::UsdaFoodData => write!(f, "USDA FoodData Central"),
        }
    }
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Resolved API keys, one per vendor at most.
///
/// `Debug` prints which vendors are configured, never the keys themselves.
#[derive(Clone, Default)]
pub struct Credentials {
    keys: HashMap<Vendor, String>,
}

impl Credentials {
    /// An empty credential set: every vendor is unconfigured.
    pub fn none() -> Self {
        Self::default()
    }

    /// Read every vendor's key from the process environment.
    ///
    /// Empty values count as absent.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve keys through an arbitrary lookup, keyed by environment
    /// variable name.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut keys = HashMap::new();
        for vendor in Vendor::ALL {
            if let Some(key) = lookup(vendor.env_var())
                .map(|k| k.trim().to_owned())
                .filter(|k| !k.is_empty())
            {
                keys.insert(vendor, key);
            }
        }
        Self { keys }
    }

    /// Builder-style insertion of a single key.
    pub fn with(mut self, vendor: Vendor, key: impl Into<String>) -> Self {
        self.keys.insert(vendor, key.into());
        self
    }

    /// The key for `vendor`, if configured.
    pub fn get(&self, vendor: Vendor) -> Option<&str> {
        self.keys.get(&vendor).map(String::as_str)
    }

    pub fn has(&self, vendor: Vendor) -> bool {
        self.keys.contains_key(&vendor)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let configured: Vec<String> = Vendor::ALL
            .iter()
            .filter(|v| self.has(**v))
            .map(ToString::to_string)
            .collect();
        f.debug_struct("Credentials")
            .field("configured", &configured)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Settings file
// ---------------------------------------------------------------------------

/// Raw shape of the optional TOML settings file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SettingsFile {
    http: HttpSection,
    endpoints: EndpointSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct HttpSection {
    timeout_secs: Option<u64>,
    user_agent: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct EndpointSection {
    openweathermap: Option<String>,
    newsapi: Option<String>,
    tmdb: Option<String>,
    usda: Option<String>,
}

impl EndpointSection {
    fn entries(self) -> [(Vendor, &'static str, Option<String>); 4] {
        [
            (Vendor::OpenWeatherMap, "openweathermap", self.openweathermap),
            (Vendor::NewsApi, "newsapi", self.newsapi),
            (Vendor::Tmdb, "tmdb", self.tmdb),
            (Vendor::UsdaFoodData, "usda", self.usda),
        ]
    }
}

// ---------------------------------------------------------------------------
// ActionConfig
// ---------------------------------------------------------------------------

/// Everything an adapter needs besides its HTTP client.
#[derive(Debug, Clone)]
pub struct ActionConfig {
    credentials: Credentials,
    request_timeout: Duration,
    user_agent: String,
    endpoints: HashMap<Vendor, String>,
}

impl ActionConfig {
    /// Configuration with the given credentials and default settings.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            endpoints: HashMap::new(),
        }
    }

    /// Credentials from the environment plus default settings.
    pub fn from_env() -> Self {
        Self::new(Credentials::from_env())
    }

    /// Credentials from the environment, settings from `path` when given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = Self::from_env();
        match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                let config = config.apply_settings(&text)?;
                info!(path = %path.display(), "settings file loaded");
                Ok(config)
            }
            None => Ok(config),
        }
    }

    /// Overlay a TOML settings document onto this configuration.
    pub fn apply_settings(mut self, toml_text: &str) -> Result<Self, ConfigError> {
        let settings: SettingsFile = toml::from_str(toml_text)?;

        if let Some(secs) = settings.http.timeout_secs {
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "http.timeout_secs".into(),
                    reason: "must be greater than zero".into(),
                });
            }
            self.request_timeout = Duration::from_secs(secs);
        }
        if let Some(agent) = settings.http.user_agent.filter(|a| !a.trim().is_empty()) {
            self.user_agent = agent;
        }

        for (vendor, field, value) in settings.endpoints.entries() {
            if let Some(raw) = value {
                self = self.with_endpoint(vendor, &raw).map_err(|reason| {
                    ConfigError::InvalidValue {
                        field: format!("endpoints.{field}"),
                        reason,
                    }
                })?;
            }
        }

        debug!(
            timeout_secs = self.request_timeout.as_secs(),
            overrides = self.endpoints.len(),
            "settings applied"
        );
        Ok(self)
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Override a vendor's base URL.  The URL must be absolute http(s).
    pub fn with_endpoint(mut self, vendor: Vendor, base_url: &str) -> Result<Self, String> {
        let parsed = url::Url::parse(base_url).map_err(|e| format!("`{base_url}`: {e}"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(format!("`{base_url}` must use http or https"));
        }
        self.endpoints
            .insert(vendor, base_url.trim_end_matches('/').to_owned());
        Ok(self)
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn api_key(&self, vendor: Vendor) -> Option<&str> {
        self.credentials.get(vendor)
    }

    /// The key for `vendor`, or the missing-credential error.
    pub fn require_key(&self, vendor: Vendor) -> Result<&str, ActionError> {
        self.api_key(vendor)
            .ok_or(ActionError::MissingCredential { vendor })
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// The base URL for `vendor`, without a trailing slash.
    pub fn base_url(&self, vendor: Vendor) -> &str {
        self.endpoints
            .get(&vendor)
            .map(String::as_str)
            .unwrap_or_else(|| vendor.default_base_url())
    }
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self::new(Credentials::none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_blank_values() {
        let creds = Credentials::from_lookup(|name| match name {
            "NEWS_API_KEY" => Some("  ".into()),
            "TMDB_API_KEY" => Some("tmdb-key".into()),
            _ => None,
        });
        assert!(!creds.has(Vendor::NewsApi));
        assert_eq!(creds.get(Vendor::Tmdb), Some("tmdb-key"));
        assert!(!creds.has(Vendor::OpenWeatherMap));
    }

    #[test]
    fn debug_never_prints_keys() {
        let creds = Credentials::none().with(Vendor::Tmdb, "super-secret");
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("TMDb"));
        assert!(!rendered.contains("super-secret"));
    }

    #[test]
    fn defaults_use_vendor_base_urls() {
        let config = ActionConfig::default();
        assert_eq!(config.request_timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(
            config.base_url(Vendor::NewsApi),
            "https://newsapi.org/v2"
        );
    }

    #[test]
    fn settings_override_timeout_and_endpoints() {
        let config = ActionConfig::default()
            .apply_settings(
                r#"
                [http]
                timeout_secs = 3
                user_agent = "test-agent"

                [endpoints]
                tmdb = "http://localhost:9000/3/"
                "#,
            )
            .unwrap();
        assert_eq!(config.request_timeout(), Duration::from_secs(3));
        assert_eq!(config.user_agent(), "test-agent");
        assert_eq!(config.base_url(Vendor::Tmdb), "http://localhost:9000/3");
        assert_eq!(
            config.base_url(Vendor::OpenWeatherMap),
            Vendor::OpenWeatherMap.default_base_url()
        );
    }

    #[test]
    fn settings_reject_zero_timeout() {
        let err = ActionConfig::default()
            .apply_settings("[http]\ntimeout_secs = 0\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn settings_reject_bad_endpoint() {
        let err = ActionConfig::default()
            .apply_settings("[endpoints]\nnewsapi = \"ftp://example.com\"\n")
            .unwrap_err();
        assert!(err.to_string().contains("endpoints.newsapi"));
    }

    #[test]
    fn settings_reject_unknown_keys() {
        let err = ActionConfig::default()
            .apply_settings("[http]\nretries = 3\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Settings(_)));
    }

    #[test]
    fn load_reads_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("actionhub.toml");
        std::fs::write(&path, "[http]\ntimeout_secs = 7\n").unwrap();
        let config = ActionConfig::load(Some(&path)).unwrap();
        assert_eq!(config.request_timeout(), Duration::from_secs(7));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = ActionConfig::load(Some(Path::new("/nonexistent/actionhub.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
