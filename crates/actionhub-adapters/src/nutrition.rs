//! Nutrition adapter -- food nutrient data from USDA FoodData Central.
//!
//! `get_nutrition_info` reports the key nutrients of the best match for a
//! food; `calculate_total_calories` sums energy across a comma-separated
//! list, falling back to a small table of per-100 g estimates for items the
//! API cannot resolve.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{ActionConfig, Vendor};
use crate::error::{ActionError, Result};
use crate::fields;
use crate::http::{HttpClient, HttpRequest, fetch_json};
use crate::params;
use crate::traits::{Adapter, AuthRequirement, HealthStatus, ToolDefinition, object_schema};

const VENDOR: Vendor = Vendor::UsdaFoodData;

/// Nutrient name fragments worth reporting.
const KEY_NUTRIENTS: &[&str] = &[
    "energy",
    "protein",
    "fat",
    "carbohydrate",
    "fiber",
    "sugar",
    "sodium",
    "vitamin",
    "calcium",
    "iron",
];

/// Nutrient lines rendered per food.
const MAX_NUTRIENT_LINES: usize = 12;

/// Approximate kcal per 100 g for common foods.
const CALORIE_ESTIMATES: &[(&str, f64)] = &[
    ("chicken breast", 165.0),
    ("salmon", 208.0),
    ("rice", 130.0),
    ("broccoli", 34.0),
    ("apple", 52.0),
    ("banana", 89.0),
    ("oats", 389.0),
    ("egg", 155.0),
    ("milk", 42.0),
    ("bread", 265.0),
];

/// USDA FoodData Central adapter.
pub struct NutritionAdapter {
    id: String,
    config: Arc<ActionConfig>,
    http: Arc<dyn HttpClient>,
}

impl NutritionAdapter {
    pub fn new(id: impl Into<String>, config: Arc<ActionConfig>, http: Arc<dyn HttpClient>) -> Self {
        Self {
            id: id.into(),
            config,
            http,
        }
    }

    /// Best-matching food record for `food_item`.
    async fn lookup(&self, api_key: &str, food_item: &str) -> Result<Value> {
        let request = HttpRequest::get(
            format!("{}/foods/search", self.config.base_url(VENDOR)),
            self.config.request_timeout(),
        )
        .param("query", food_item)
        .param("api_key", api_key)
        .param("pageSize", "1");

        let mut body = fetch_json(self.http.as_ref(), VENDOR, food_item, &request).await?;
        match body.pointer_mut("/foods/0") {
            Some(food) => Ok(food.take()),
            None => Err(ActionError::NotFound {
                vendor: VENDOR,
                subject: food_item.to_owned(),
            }),
        }
    }

    async fn tool_get_nutrition_info(&self, params: &Value) -> Result<String> {
        let api_key = self.config.require_key(VENDOR)?;
        let food_item = params::required_str(params, "get_nutrition_info", "food_item")?;
        debug!(food_item, "looking up nutrition");

        let food = self.lookup(api_key, food_item).await?;
        Ok(render_food(food_item, &food))
    }

    async fn tool_calculate_total_calories(&self, params: &Value) -> Result<String> {
        let api_key = self.config.require_key(VENDOR)?;
        let food_list = params::required_str(params, "calculate_total_calories", "food_list")?;
        let foods: Vec<&str> = food_list
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .collect();
        if foods.is_empty() {
            return Err(ActionError::InvalidParams {
                tool_name: "calculate_total_calories".into(),
                reason: "`food_list` must name at least one food".into(),
            });
        }
        debug!(count = foods.len(), "calculating total calories");

        let mut total = 0.0;
        let mut any_estimated = false;
        let mut lines = Vec::with_capacity(foods.len());

        for food in foods {
            let looked_up = match self.lookup(api_key, food).await {
                Ok(record) => kilocalories(&record),
                Err(e) => {
                    warn!(food, error = %e, "nutrition lookup failed, trying estimate");
                    None
                }
            };

            let resolved = looked_up
                .map(|kcal| (kcal, false))
                .or_else(|| estimate(food).map(|kcal| (kcal, true)));
            match resolved {
                Some((kcal, estimated)) => {
                    total += kcal;
                    any_estimated |= estimated;
                    let marker = if estimated { " (estimated)" } else { "" };
                    lines.push(format!("- {food}: {:.0} calories{marker}", kcal));
                }
                None => lines.push(format!("- {food}: calories unknown")),
            }
        }

        let mut out = format!("🔥 Total calories: {total:.0}\n{}", lines.join("\n"));
        if any_estimated {
            out.push_str("\n\nEstimated values are per 100 g.");
        }
        Ok(out)
    }
}

/// Energy in kcal from a food record's nutrient list.
fn kilocalories(food: &Value) -> Option<f64> {
    fields::array(food, "/foodNutrients")
        .iter()
        .filter(|n| {
            fields::text(n, "/nutrientName")
                .is_some_and(|name| name.to_ascii_lowercase().contains("energy"))
        })
        .find(|n| {
            fields::text(n, "/unitName").is_some_and(|unit| unit.eq_ignore_ascii_case("kcal"))
        })
        .and_then(|n| fields::float(n, "/value"))
}

/// Table estimate for foods whose name overlaps a known entry.
fn estimate(food: &str) -> Option<f64> {
    let food = food.to_lowercase();
    CALORIE_ESTIMATES
        .iter()
        .find(|(name, _)| food.contains(name) || name.contains(food.as_str()))
        .map(|(_, kcal)| *kcal)
}

fn render_food(requested: &str, food: &Value) -> String {
    let name = fields::text(food, "/description").unwrap_or(requested);
    let brand = fields::text(food, "/brandOwner").unwrap_or("Generic");

    let lines: Vec<String> = fields::array(food, "/foodNutrients")
        .iter()
        .filter_map(|n| {
            let nutrient = fields::text(n, "/nutrientName")?;
            let lower = nutrient.to_ascii_lowercase();
            if !KEY_NUTRIENTS.iter().any(|key| lower.contains(key)) {
                return None;
            }
            let value = fields::number(n, "/value").unwrap_or_else(|| fields::UNKNOWN.into());
            let unit = fields::text(n, "/unitName").unwrap_or("");
            Some(format!("- {nutrient}: {value} {unit}").trim_end().to_owned())
        })
        .take(MAX_NUTRIENT_LINES)
        .collect();

    let body = if lines.is_empty() {
        "- No key nutrient data available".to_owned()
    } else {
        lines.join("\n")
    };
    format!("🥗 Nutrition facts for {name} ({brand}):\n{body}")
}

#[async_trait]
impl Adapter for NutritionAdapter {
    fn id(&self) -> &str {
        &self.id
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition {
                name: "get_nutrition_info".into(),
                description: "Gets nutritional information for a specific food item.".into(),
                parameters: object_schema(
                    &[("food_item", "string", "Food to look up (e.g. 'apple', 'chicken breast')")],
                    &["food_item"],
                ),
            },
            ToolDefinition {
                name: "calculate_total_calories".into(),
                description: "Calculates total calories for a list of food items.".into(),
                parameters: object_schema(
                    &[(
                        "food_list",
                        "string",
                        "Comma-separated foods (e.g. 'apple, banana, oats')",
                    )],
                    &["food_list"],
                ),
            },
        ]
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
            "get_nutrition_info" => self.tool_get_nutrition_info(params).await,
            "calculate_total_calories" => self.tool_calculate_total_calories(params).await,
            _ => Err(ActionError::UnknownAction {
                name: name.to_owned(),
            }),
        }
    }
}
