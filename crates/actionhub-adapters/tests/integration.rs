//! Integration tests for the actionhub-adapters crate.
//!
//! These drive the public registry end-to-end with a fake HTTP client,
//! checking that every failure mode comes back as a string and that the
//! network is only touched when it should be.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use actionhub_adapters::{
    ActionConfig, ActionError, ActionRegistry, AgentProfile, Credentials, HealthStatus,
    HttpClient, HttpRequest, HttpResponse, TransportError, Vendor,
};
use async_trait::async_trait;
use serde_json::json;

/// Replays queued responses and remembers every URL it was asked for.
#[derive(Default)]
struct FakeHttp {
    replies: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    seen: Mutex<Vec<HttpRequest>>,
}

impl FakeHttp {
    fn with(replies: Vec<Result<HttpResponse, TransportError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            seen: Mutex::default(),
        })
    }

    fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    fn last(&self) -> HttpRequest {
        self.seen.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl HttpClient for FakeHttp {
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.seen.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Connect("no reply queued".into())))
    }
}

fn all_keys() -> Credentials {
    Credentials::from_lookup(|var| Some(format!("key-for-{var}")))
}

fn registry(creds: Credentials, http: Arc<FakeHttp>) -> ActionRegistry {
    ActionRegistry::with_defaults(Arc::new(ActionConfig::new(creds)), http).unwrap()
}

fn ok(body: &str) -> Result<HttpResponse, TransportError> {
    Ok(HttpResponse::new(200, body))
}

// ═══════════════════════════════════════════════════════════════════════
//  Success paths
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn weather_for_paris() {
    let http = FakeHttp::with(vec![ok(
        r#"{"name":"Paris","main":{"temp":15,"feels_like":14,"humidity":60},
            "weather":[{"description":"clear sky"}]}"#,
    )]);
    let out = registry(all_keys(), http.clone())
        .invoke("get_weather", &json!({"city": "Paris"}))
        .await;

    assert!(out.contains("Paris"), "{out}");
    assert!(out.contains("15"), "{out}");
    assert!(out.contains("clear sky"), "{out}");

    let req = http.last();
    assert!(req.url.starts_with("https://api.openweathermap.org/data/2.5"));
    assert_eq!(req.query_value("q"), Some("Paris"));
    assert_eq!(req.query_value("appid"), Some("key-for-OPEN_WEATHER_MAP_API_KEY"));
}

#[tokio::test]
async fn partial_weather_body_degrades_to_unknown() {
    let http = FakeHttp::with(vec![ok(r#"{"name":"Oslo","main":{"temp":-3}}"#)]);
    let out = registry(all_keys(), http)
        .invoke("get_weather", &json!({"city": "Oslo"}))
        .await;
    assert!(out.contains("Oslo"));
    assert!(out.contains("-3"));
    assert!(out.contains("unknown"));
    assert!(!out.starts_with("❌"));
}

#[tokio::test]
async fn temperature_needs_no_network_or_keys() {
    let http = FakeHttp::with(vec![]);
    let registry = registry(Credentials::none(), http.clone());
    assert_eq!(
        registry
            .invoke("celsius_to_fahrenheit", &json!({"celsius": 37}))
            .await,
        "37°C = 98.6°F"
    );
    assert_eq!(http.calls(), 0);
}

// ═══════════════════════════════════════════════════════════════════════
//  Failure taxonomy
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn missing_key_never_reaches_the_network() {
    let http = FakeHttp::with(vec![]);
    let registry = registry(Credentials::none(), http.clone());

    for (action, params) in [
        ("get_weather", json!({"city": "Paris"})),
        ("get_news", json!({"query": "rust"})),
        ("get_movie_info", json!({"movie_title": "Inception"})),
        ("get_nutrition_info", json!({"food_item": "apple"})),
    ] {
        let out = registry.invoke(action, &params).await;
        assert!(out.contains("not found in environment variables"), "{action}: {out}");
    }
    assert_eq!(http.calls(), 0);
}

#[tokio::test]
async fn missing_key_names_the_variable() {
    let http = FakeHttp::with(vec![]);
    let out = registry(Credentials::none(), http)
        .invoke("get_weather", &json!({"city": "Paris"}))
        .await;
    assert_eq!(
        out,
        ActionError::MissingCredential {
            vendor: Vendor::OpenWeatherMap
        }
        .user_message()
    );
    assert!(out.contains("OPEN_WEATHER_MAP_API_KEY"));
}

#[tokio::test]
async fn empty_movie_results_are_not_found() {
    let http = FakeHttp::with(vec![ok(r#"{"page":1,"results":[],"total_results":0}"#)]);
    let out = registry(all_keys(), http)
        .invoke("get_movie_info", &json!({"movie_title": "Inception"}))
        .await;
    assert_eq!(
        out,
        ActionError::NotFound {
            vendor: Vendor::Tmdb,
            subject: "Inception".into()
        }
        .user_message()
    );
}

#[tokio::test]
async fn timeout_is_reported_not_raised() {
    let http = FakeHttp::with(vec![Err(TransportError::Timeout)]);
    let out = registry(all_keys(), http)
        .invoke("search_news", &json!({"topic": "rust"}))
        .await;
    assert!(out.contains("did not respond within 10 seconds"), "{out}");
}

#[tokio::test]
async fn rate_limit_has_its_own_message() {
    let http = FakeHttp::with(vec![Ok(HttpResponse::new(
        429,
        r#"{"status":"error","code":"rateLimited","message":"Too many requests"}"#,
    ))]);
    let out = registry(all_keys(), http)
        .invoke("get_top_headlines", &json!({}))
        .await;
    assert!(out.contains("rate limit"), "{out}");
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let http = FakeHttp::with(vec![ok("<html>maintenance</html>")]);
    let out = registry(all_keys(), http)
        .invoke("get_nutrition_info", &json!({"food_item": "apple"}))
        .await;
    assert_eq!(
        out,
        "❌ Error: USDA FoodData Central returned a response that could not be understood."
    );
}

#[tokio::test]
async fn connection_failure_is_upstream_error() {
    let http = FakeHttp::with(vec![Err(TransportError::Connect("dns failure".into()))]);
    let out = registry(all_keys(), http)
        .invoke("get_weather", &json!({"city": "Paris"}))
        .await;
    assert!(out.starts_with("❌ Error fetching data from OpenWeatherMap"), "{out}");
}

#[tokio::test]
async fn empty_required_param_is_rejected_locally() {
    let http = FakeHttp::with(vec![]);
    let out = registry(all_keys(), http.clone())
        .invoke("get_weather", &json!({"city": "   "}))
        .await;
    assert!(out.starts_with("❌ Error:"), "{out}");
    assert_eq!(http.calls(), 0);
}

// ═══════════════════════════════════════════════════════════════════════
//  Registry, profiles and health
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn profile_restricts_what_the_agent_can_call() {
    let profile = AgentProfile::from_yaml(
        "name: TempBot\npersona: You convert temperatures.\n\
         actions: [celsius_to_fahrenheit, fahrenheit_to_celsius]\n",
    )
    .unwrap();
    let view = registry(all_keys(), FakeHttp::with(vec![]))
        .restrict(&profile)
        .unwrap();

    let names: Vec<&str> = view.definitions().iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["celsius_to_fahrenheit", "fahrenheit_to_celsius"]);

    let out = view.invoke("get_weather", &json!({"city": "Paris"})).await;
    assert!(out.contains("no action named 'get_weather'"));
}

#[test]
fn profile_with_unknown_action_is_a_config_error() {
    let profile = AgentProfile::from_yaml("name: Bot\nactions: [get_horoscope]\n").unwrap();
    let err = registry(all_keys(), FakeHttp::with(vec![]))
        .restrict(&profile)
        .unwrap_err();
    assert!(err.to_string().contains("get_horoscope"));
}

#[test]
fn one_missing_key_disables_one_adapter() {
    let creds = Credentials::from_lookup(|var| {
        (var != "NEWS_API_KEY").then(|| "k".to_owned())
    });
    let status = registry(creds, FakeHttp::with(vec![])).status();

    let unconfigured: Vec<&str> = status
        .iter()
        .filter(|s| s.health == HealthStatus::Unconfigured)
        .map(|s| s.adapter_id.as_str())
        .collect();
    assert_eq!(unconfigured, vec!["news"]);
    assert_eq!(status.len(), 5);
}

#[test]
fn every_definition_declares_an_object_schema() {
    let registry = registry(all_keys(), FakeHttp::with(vec![]));
    for def in registry.definitions() {
        assert_eq!(def.parameters["type"], "object", "{}", def.name);
        assert!(!def.description.is_empty(), "{}", def.name);
        for required in def.required_params() {
            assert!(
                def.parameters["properties"].get(required).is_some(),
                "{} requires undeclared `{required}`",
                def.name
            );
        }
    }
}

#[tokio::test]
async fn endpoint_overrides_are_used() {
    let config = ActionConfig::new(all_keys())
        .with_endpoint(Vendor::Tmdb, "http://localhost:8080/tmdb/")
        .unwrap();
    let http = FakeHttp::with(vec![ok(r#"{"results":[{"title":"Inception"}]}"#)]);
    let registry = ActionRegistry::with_defaults(Arc::new(config), http.clone()).unwrap();

    registry
        .invoke("get_movie_info", &json!({"movie_title": "Inception"}))
        .await;
    assert_eq!(http.last().url, "http://localhost:8080/tmdb/search/movie");
}

// ═══════════════════════════════════════════════════════════════════════
//  Real HTTP client
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn refused_connection_does_not_leak_the_key() {
    let key = "SUPERSECRET123";
    let config = ActionConfig::new(Credentials::none().with(Vendor::OpenWeatherMap, key))
        .with_endpoint(Vendor::OpenWeatherMap, "http://127.0.0.1:1/data/2.5")
        .unwrap()
        .with_timeout(std::time::Duration::from_secs(5));
    let registry = ActionRegistry::from_config(config).unwrap();

    let out = registry
        .invoke("get_weather", &json!({"city": "Paris"}))
        .await;
    assert!(!out.contains(key), "{out}");
    assert!(out.starts_with("❌ Error fetching data from OpenWeatherMap"), "{out}");

    let err = registry
        .execute("get_weather", &json!({"city": "Paris"}))
        .await
        .unwrap_err();
    assert!(!err.to_string().contains(key), "{err}");
}
