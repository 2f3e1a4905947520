//! Action error types.
//!
//! Every failure an action can hit is one [`ActionError`] variant.  The
//! variants form a closed taxonomy so that each class renders to exactly one
//! user-facing sentence via [`ActionError::user_message`]; the registry hands
//! that sentence to the host instead of propagating the error.
//!
//! Setup-time problems (settings file, agent profile, duplicate registration)
//! are a separate concern and surface through [`ConfigError`].

use std::path::PathBuf;

use crate::config::Vendor;

/// Unified error type for a single action invocation.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// The vendor API key is not configured.
    #[error("missing credential for {vendor}: set {}", .vendor.env_var())]
    MissingCredential { vendor: Vendor },

    /// The request did not complete within the configured timeout.
    #[error("{vendor} request timed out after {seconds}s")]
    Timeout { vendor: Vendor, seconds: u64 },

    /// The vendor had nothing for the requested subject (404 or empty result set).
    #[error("{vendor} found nothing for `{subject}`")]
    NotFound { vendor: Vendor, subject: String },

    /// The vendor refused the request because of rate limiting (HTTP 429).
    #[error("{vendor} rate limit exceeded")]
    RateLimited { vendor: Vendor },

    /// Any other upstream failure: a non-success status, a vendor-reported
    /// error body, or a connection that could not be established.
    #[error("{vendor} request failed: {detail}")]
    Upstream { vendor: Vendor, detail: String },

    /// The vendor answered with a body that is not the JSON we expect.
    #[error("{vendor} returned a malformed response: {reason}")]
    MalformedResponse { vendor: Vendor, reason: String },

    /// The parameters supplied to a tool are missing or unusable.
    #[error("invalid parameters for tool `{tool_name}`: {reason}")]
    InvalidParams { tool_name: String, reason: String },

    /// No registered adapter exposes the requested tool.
    #[error("unknown action `{name}`")]
    UnknownAction { name: String },
}

impl ActionError {
    /// The single human-readable sentence the host reads back to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingCredential { vendor } => format!(
                "❌ Error: {} not found in environment variables. \
                 Add it to your environment or .env file to enable {vendor} lookups.",
                vendor.env_var()
            ),
            Self::Timeout { vendor, seconds } => format!(
                "⏱️ The {vendor} service did not respond within {seconds} seconds. \
                 Please try again in a moment."
            ),
            Self::NotFound { vendor, subject } => {
                format!("🔍 No results found for '{subject}' on {vendor}.")
            }
            Self::RateLimited { vendor } => format!(
                "🚦 The {vendor} rate limit has been reached. \
                 Please wait a little before asking again."
            ),
            Self::Upstream { vendor, detail } => {
                format!("❌ Error fetching data from {vendor}: {detail}")
            }
            Self::MalformedResponse { vendor, .. } => format!(
                "❌ Error: {vendor} returned a response that could not be understood."
            ),
            Self::InvalidParams { reason, .. } => format!("❌ Error: {reason}"),
            Self::UnknownAction { name } => {
                format!("❌ Error: no action named '{name}' is available.")
            }
        }
    }

    /// Whether the failure came from the vendor side rather than from the
    /// caller or local configuration.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. }
                | Self::NotFound { .. }
                | Self::RateLimited { .. }
                | Self::Upstream { .. }
                | Self::MalformedResponse { .. }
        )
    }
}

/// Convenience alias used throughout the adapters crate.
pub type Result<T> = std::result::Result<T, ActionError>;

/// Errors raised while assembling configuration, profiles, or the registry.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A settings or profile file could not be read.
    #[error("failed to read `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML settings file is not valid.
    #[error("invalid settings file: {0}")]
    Settings(#[from] toml::de::Error),

    /// The YAML agent profile is not valid.
    #[error("invalid agent profile: {0}")]
    ProfileFormat(#[from] serde_yaml::Error),

    /// A value inside otherwise well-formed configuration is unusable.
    #[error("invalid configuration value for `{field}`: {reason}")]
    InvalidValue { field: String, reason: String },

    /// A profile names an action the registry does not know.
    #[error("profile `{profile}` enables unknown action `{action}`")]
    UnknownProfileAction { profile: String, action: String },

    /// Two adapters tried to register the same tool name.
    #[error("action `{name}` is already registered by adapter `{existing}`")]
    DuplicateAction { name: String, existing: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credential_names_the_variable() {
        let err = ActionError::MissingCredential {
            vendor: Vendor::OpenWeatherMap,
        };
        assert!(err.user_message().contains("OPEN_WEATHER_MAP_API_KEY"));
        assert!(!err.is_upstream());
    }

    #[test]
    fn each_class_renders_a_distinct_message() {
        let vendor = Vendor::Tmdb;
        let messages = [
            ActionError::MissingCredential { vendor },
            ActionError::Timeout { vendor, seconds: 10 },
            ActionError::NotFound {
                vendor,
                subject: "x".into(),
            },
            ActionError::RateLimited { vendor },
            ActionError::Upstream {
                vendor,
                detail: "HTTP 500".into(),
            },
            ActionError::MalformedResponse {
                vendor,
                reason: "not json".into(),
            },
        ]
        .iter()
        .map(ActionError::user_message)
        .collect::<Vec<_>>();

        for (i, a) in messages.iter().enumerate() {
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn upstream_classification() {
        assert!(ActionError::RateLimited { vendor: Vendor::NewsApi }.is_upstream());
        assert!(
            !ActionError::UnknownAction {
                name: "nope".into()
            }
            .is_upstream()
        );
    }
}
