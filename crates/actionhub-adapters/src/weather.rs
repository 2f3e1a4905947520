//! Weather adapter -- current conditions from OpenWeatherMap.
//!
//! Exposes a single `get_weather` tool backed by the `/weather` endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::config::{ActionConfig, Vendor};
use crate::error::{ActionError, Result};
use crate::fields::{self, UNKNOWN};
use crate::http::{HttpClient, HttpRequest, fetch_json};
use crate::params;
use crate::traits::{Adapter, AuthRequirement, HealthStatus, ToolDefinition, object_schema};

const VENDOR: Vendor = Vendor::OpenWeatherMap;

/// Temperature units for OpenWeatherMap.
///
/// Values we do not recognise are forwarded untouched and left for the
/// vendor to accept or reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Units<'a> {
    Metric,
    Imperial,
    Standard,
    Other(&'a str),
}

impl<'a> Units<'a> {
    fn parse(raw: Option<&'a str>) -> Self {
        let Some(raw) = raw else {
            return Self::Metric;
        };
        match raw.to_ascii_lowercase().as_str() {
            "metric" | "celsius" | "c" => Self::Metric,
            "imperial" | "fahrenheit" | "f" => Self::Imperial,
            "standard" | "kelvin" | "k" => Self::Standard,
            _ => Self::Other(raw),
        }
    }

    fn as_param(self) -> &'a str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
            Self::Standard => "standard",
            Self::Other(raw) => raw,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Self::Metric => "°C",
            Self::Imperial => "°F",
            Self::Standard => " K",
            Self::Other(_) => "",
        }
    }
}

/// OpenWeatherMap current-weather adapter.
pub struct WeatherAdapter {
    id: String,
    config: Arc<ActionConfig>,
    http: Arc<dyn HttpClient>,
}

impl WeatherAdapter {
    pub fn new(id: impl Into<String>, config: Arc<ActionConfig>, http: Arc<dyn HttpClient>) -> Self {
        Self {
            id: id.into(),
            config,
            http,
        }
    }

    async fn tool_get_weather(&self, params: &Value) -> Result<String> {
        let api_key = self.config.require_key(VENDOR)?;
        let city = params::required_str(params, "get_weather", "city")?;
        let units = Units::parse(params::optional_str(params, "units"));

        debug!(city, units = units.as_param(), "fetching current weather");

        let request = HttpRequest::get(
            format!("{}/weather", self.config.base_url(VENDOR)),
            self.config.request_timeout(),
        )
        .param("q", city)
        .param("appid", api_key)
        .param("units", units.as_param());

        let body = fetch_json(self.http.as_ref(), VENDOR, city, &request).await?;
        Ok(render_weather(city, units, &body))
    }
}

/// Render the current-weather template; missing fields show as `unknown`.
fn render_weather(requested_city: &str, units: Units, body: &Value) -> String {
    let name = fields::text(body, "/name").unwrap_or(requested_city);
    let location = match fields::text(body, "/sys/country") {
        Some(country) => format!("{name}, {country}"),
        None => name.to_owned(),
    };
    let symbol = units.symbol();
    let with_unit = |v: Option<String>, unit: &str| match v {
        Some(v) => format!("{v}{unit}"),
        None => UNKNOWN.to_owned(),
    };

    let temperature = with_unit(fields::number(body, "/main/temp"), symbol);
    let feels_like = with_unit(fields::number(body, "/main/feels_like"), symbol);
    let humidity = with_unit(fields::number(body, "/main/humidity"), "%");
    let conditions = fields::text(body, "/weather/0/description").unwrap_or(UNKNOWN);

    format!(
        "🌤️ Weather in {location}:\n\
         Temperature: {temperature} (feels like {feels_like})\n\
         Conditions: {conditions}\n\
         Humidity: {humidity}"
    )
}

#[async_trait]
impl Adapter for WeatherAdapter {
    fn id(&self) -> &str {
        &self.id
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        vec![ToolDefinition {
            name: "get_weather".into(),
            description: "Get current weather information for a specified city: \
                          temperature, feels-like temperature, conditions, and humidity."
                .into(),
            parameters: object_schema(
                &[
                    ("city", "string", "City name, optionally with country code (e.g. 'Paris,FR')"),
                    (
                        "units",
                        "string",
                        "'metric' (default, °C), 'imperial' (°F) or 'standard' (K)",
                    ),
                ],
                &["city"],
            ),
        }]
    }

    fn required_auth(&self) -> Option<AuthRequirement> {
        Some(AuthRequirement::for_vendor(VENDOR))
    }

    fn status(&self) -> HealthStatus {
        if self.config.credentials().has(VENDOR) {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unconfigured
        }
    }

    async fn execute_tool(&self, name: &str, params: &Value) -> Result<String> {
        match name {
            "get_weather" => self.tool_get_weather(params).await,
            _ => Err(ActionError::UnknownAction {
                name: name.to_owned(),
            }),
        }
    }
}
