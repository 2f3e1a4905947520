//! Temperature conversion adapter -- local arithmetic, no vendor behind it.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{ActionError, Result};
use crate::params;
use crate::traits::{Adapter, AuthRequirement, HealthStatus, ToolDefinition, object_schema};

const SCALE_INFO: &str = "Temperature Scale Information:
- Celsius (°C): Water freezes at 0°C and boils at 100°C
- Fahrenheit (°F): Water freezes at 32°F and boils at 212°F
- Conversion formulas:
  * C to F: (C × 9/5) + 32
  * F to C: (F - 32) × 5/9";

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

/// Celsius/Fahrenheit converter.
pub struct TemperatureAdapter {
    id: String,
}

impl TemperatureAdapter {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    fn convert(
        tool: &str,
        params: &Value,
        field: &str,
        convert: fn(f64) -> f64,
        (from, to): (&str, &str),
    ) -> Result<String> {
        let (value, shown) =
            params::numeric(params, field).ok_or_else(|| ActionError::InvalidParams {
                tool_name: tool.to_owned(),
                reason: "Invalid temperature value provided".into(),
            })?;
        Ok(format!("{shown}{from} = {:.1}{to}", convert(value)))
    }
}

impl Default for TemperatureAdapter {
    fn default() -> Self {
        Self::new("temperature")
    }
}

#[async_trait]
impl Adapter for TemperatureAdapter {
    fn id(&self) -> &str {
        &self.id
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition {
                name: "celsius_to_fahrenheit".into(),
                description: "Converts temperature from Celsius to Fahrenheit.".into(),
                parameters: object_schema(
                    &[("celsius", "number", "Temperature in degrees Celsius")],
                    &["celsius"],
                ),
            },
            ToolDefinition {
                name: "fahrenheit_to_celsius".into(),
                description: "Converts temperature from Fahrenheit to Celsius.".into(),
                parameters: object_schema(
                    &[("fahrenheit", "number", "Temperature in degrees Fahrenheit")],
                    &["fahrenheit"],
                ),
            },
            ToolDefinition {
                name: "get_temperature_info".into(),
                description: "Gets information about temperature scales.".into(),
                parameters: object_schema(&[], &[]),
            },
        ]
    }

    fn required_auth(&self) -> Option<AuthRequirement> {
        None
    }

    fn status(&self) -> HealthStatus {
        HealthStatus::Healthy
    }

    async fn execute_tool(&self, name: &str, params: &Value) -> Result<String> {
        match name {
            "celsius_to_fahrenheit" => Self::convert(
                name,
                params,
                "celsius",
                celsius_to_fahrenheit,
                ("°C", "°F"),
            ),
            "fahrenheit_to_celsius" => Self::convert(
                name,
                params,
                "fahrenheit",
                fahrenheit_to_celsius,
                ("°F", "°C"),
            ),
            "get_temperature_info" => Ok(SCALE_INFO.to_owned()),
            _ => Err(ActionError::UnknownAction {
                name: name.to_owned(),
            }),
        }
    }
}
