//! Movie adapter -- search and details from The Movie Database (TMDb).

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

const VENDOR: Vendor = Vendor::Tmdb;

/// TMDb movie adapter.
pub struct MovieAdapter {
    id: String,
    config: Arc<ActionConfig>,
    http: Arc<dyn HttpClient>,
}

impl MovieAdapter {
    pub fn new(id: impl Into<String>, config: Arc<ActionConfig>, http: Arc<dyn HttpClient>) -> Self {
        Self {
            id: id.into(),
            config,
            http,
        }
    }

    async fn tool_get_movie_info(&self, params: &Value) -> Result<String> {
        let api_key = self.config.require_key(VENDOR)?;
        let title = params::required_str(params, "get_movie_info", "movie_title")?;
        debug!(title, "searching movies");

        let request = HttpRequest::get(
            format!("{}/search/movie", self.config.base_url(VENDOR)),
            self.config.request_timeout(),
        )
        .param("api_key", api_key)
        .param("query", title);

        let body = fetch_json(self.http.as_ref(), VENDOR, title, &request).await?;
        let movie = fields::array(&body, "/results")
            .first()
            .ok_or_else(|| ActionError::NotFound {
                vendor: VENDOR,
                subject: title.to_owned(),
            })?;

        Ok(render_summary(title, movie))
    }

    async fn tool_get_movie_details(&self, params: &Value) -> Result<String> {
        let api_key = self.config.require_key(VENDOR)?;
        let movie_id = params::required_id(params, "get_movie_details", "movie_id")?;
        if !movie_id.chars().all(|c| c.is_ascii_digit()) {
            return Err(ActionError::InvalidParams {
                tool_name: "get_movie_details".into(),
                reason: format!("`movie_id` must be a numeric TMDb id, got '{movie_id}'"),
            });
        }
        debug!(movie_id = %movie_id, "fetching movie details");

        let request = HttpRequest::get(
            format!("{}/movie/{movie_id}", self.config.base_url(VENDOR)),
            self.config.request_timeout(),
        )
        .param("api_key", api_key);

        let body = fetch_json(self.http.as_ref(), VENDOR, &movie_id, &request).await?;
        Ok(render_details(&movie_id, &body))
    }
}

/// Release year from a `YYYY-MM-DD` date.
fn release_year(movie: &Value) -> &str {
    fields::text(movie, "/release_date")
        .and_then(|d| d.get(..4))
        .filter(|y| y.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(UNKNOWN)
}

fn rating_line(movie: &Value) -> String {
    let rating = fields::number(movie, "/vote_average").unwrap_or_else(|| UNKNOWN.into());
    let votes = fields::number(movie, "/vote_count").unwrap_or_else(|| "0".into());
    format!("Rating: ⭐ {rating}/10 ({votes} votes)")
}

fn render_summary(requested: &str, movie: &Value) -> String {
    let title = fields::text(movie, "/title").unwrap_or(requested);
    let overview = fields::text(movie, "/overview").unwrap_or("No overview available");
    let mut out = format!(
        "🎬 Movie Information:\n**{title}** ({year})\n\n{rating}\n\nOverview: {overview}",
        year = release_year(movie),
        rating = rating_line(movie),
    );
    if let Some(id) = fields::number(movie, "/id") {
        out.push_str(&format!("\n\nTMDb id: {id}"));
    }
    out
}

fn render_details(movie_id: &str, movie: &Value) -> String {
    let title = fields::text(movie, "/title").unwrap_or(movie_id);
    let mut out = format!(
        "🎬 **{title}** ({year})\n",
        year = release_year(movie)
    );
    if let Some(tagline) = fields::text(movie, "/tagline") {
        out.push_str(&format!("_{tagline}_\n"));
    }

    let runtime = fields::number(movie, "/runtime")
        .filter(|r| r != "0")
        .map(|r| format!("{r} min"))
        .unwrap_or_else(|| UNKNOWN.into());
    let genres: Vec<&str> = fields::array(movie, "/genres")
        .iter()
        .filter_map(|g| fields::text(g, "/name"))
        .collect();
    let genres = if genres.is_empty() {
        UNKNOWN.to_owned()
    } else {
        genres.join(", ")
    };

    out.push_str(&format!(
        "\nRuntime: {runtime}\nGenres: {genres}\n{rating}\n\nOverview: {overview}",
        rating = rating_line(movie),
        overview = fields::text(movie, "/overview").unwrap_or("No overview available"),
    ));
    if let Some(homepage) = fields::text(movie, "/homepage") {
        out.push_str(&format!("\nHomepage: {homepage}"));
    }
    out
}

#[async_trait]
impl Adapter for MovieAdapter {
    fn id(&self) -> &str {
        &self.id
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition {
                name: "get_movie_info".into(),
                description: "Get movie information from The Movie Database (TMDb): \
                              title, release year, rating, and overview of the best match."
                    .into(),
                parameters: object_schema(
                    &[("movie_title", "string", "Title of the movie to look up")],
                    &["movie_title"],
                ),
            },
            ToolDefinition {
                name: "get_movie_details".into(),
                description: "Get detailed information (runtime, genres, tagline) for a \
                              movie by its TMDb id."
                    .into(),
                parameters: object_schema(
                    &[("movie_id", "integer", "Numeric TMDb movie id")],
                    &["movie_id"],
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
            "get_movie_info" => self.tool_get_movie_info(params).await,
            "get_movie_details" => self.tool_get_movie_details(params).await,
            _ => Err(ActionError::UnknownAction {
                name: name.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Credentials;
    use crate::http::testing::ScriptedClient;
    use serde_json::json;

    fn adapter(client: Arc<ScriptedClient>) -> MovieAdapter {
        let config = ActionConfig::new(Credentials::none().with(VENDOR, "tmdb-key"));
        MovieAdapter::new("movies", Arc::new(config), client)
    }

    #[tokio::test]
    async fn renders_first_search_result() {
        let client = Arc::new(ScriptedClient::new().reply(
            200,
            r#"{"results":[
                {"id":27205,"title":"Inception","release_date":"2010-07-15",
                 "overview":"A thief who steals corporate secrets.","vote_average":8.4,"vote_count":35000},
                {"id":1,"title":"Other"}
            ]}"#,
        ));
        let out = adapter(client.clone())
            .invoke("get_movie_info", &json!({"movie_title": "Inception"}))
            .await;

        assert!(out.starts_with("🎬 Movie Information:\n**Inception** (2010)"), "{out}");
        assert!(out.contains("Rating: ⭐ 8.4/10 (35000 votes)"));
        assert!(out.contains("Overview: A thief who steals corporate secrets."));
        assert!(out.contains("TMDb id: 27205"));
        assert!(!out.contains("Other"));

        let req = client.request(0);
        assert!(req.url.ends_with("/3/search/movie"));
        assert_eq!(req.query_value("query"), Some("Inception"));
        assert_eq!(req.query_value("api_key"), Some("tmdb-key"));
    }

    #[tokio::test]
    async fn empty_results_is_not_found() {
        let client = Arc::new(ScriptedClient::new().reply(200, r#"{"page":1,"results":[]}"#));
        let out = adapter(client)
            .invoke("get_movie_info", &json!({"movie_title": "Inception"}))
            .await;
        assert_eq!(
            out,
            ActionError::NotFound {
                vendor: VENDOR,
                subject: "Inception".into()
            }
            .user_message()
        );
    }

    #[tokio::test]
    async fn partial_result_degrades() {
        let client = Arc::new(ScriptedClient::new().reply(200, r#"{"results":[{"title":"Obscure"}]}"#));
        let out = adapter(client)
            .invoke("get_movie_info", &json!({"movie_title": "obscure"}))
            .await;
        assert!(out.contains("**Obscure** (unknown)"), "{out}");
        assert!(out.contains("Rating: ⭐ unknown/10 (0 votes)"), "{out}");
        assert!(out.contains("Overview: No overview available"));
    }

    #[tokio::test]
    async fn details_render_runtime_and_genres() {
        let client = Arc::new(ScriptedClient::new().reply(
            200,
            r#"{"id":27205,"title":"Inception","release_date":"2010-07-15","runtime":148,
                "tagline":"Your mind is the scene of the crime.",
                "genres":[{"id":28,"name":"Action"},{"id":878,"name":"Science Fiction"}],
                "vote_average":8.4,"vote_count":35000,"overview":"Dreams.",
                "homepage":"https://www.warnerbros.com/movies/inception"}"#,
        ));
        let out = adapter(client.clone())
            .invoke("get_movie_details", &json!({"movie_id": 27205}))
            .await;

        assert!(out.starts_with("🎬 **Inception** (2010)\n_Your mind is the scene of the crime._"));
        assert!(out.contains("Runtime: 148 min"));
        assert!(out.contains("Genres: Action, Science Fiction"));
        assert!(out.contains("Homepage: https://www.warnerbros.com/movies/inception"));
        assert!(client.request(0).url.ends_with("/3/movie/27205"));
    }

    #[tokio::test]
    async fn details_reject_non_numeric_id() {
        let client = Arc::new(ScriptedClient::new());
        let err = adapter(client.clone())
            .execute_tool("get_movie_details", &json!({"movie_id": "../search"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::InvalidParams { .. }));
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn details_404_is_not_found() {
        let client = Arc::new(ScriptedClient::new().reply(
            404,
            r#"{"status_code":34,"status_message":"The resource you requested could not be found."}"#,
        ));
        let err = adapter(client)
            .execute_tool("get_movie_details", &json!({"movie_id": "999999999"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::NotFound { .. }));
    }
}
