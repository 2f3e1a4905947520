//! News adapter -- headlines, topic search, and source listings from NewsAPI.
//!
//! Tools:
//!   - `get_news`            top US headlines, optionally filtered by a query
//!   - `get_top_headlines`   top headlines for a country
//!   - `search_news`         full-archive search sorted by publish date
//!   - `get_news_by_source`  headlines from named outlets (`bbc`, `cnn`, ...)
//!   - `get_news_sources`    outlets NewsAPI knows, optionally by category
//!   - `get_news_help`       static usage text (no network)

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;

use crate::config::{ActionConfig, Vendor};
use crate::error::{ActionError, Result};
use crate::fields;
use crate::http::{HttpClient, HttpRequest, fetch_json};
use crate::params;
use crate::traits::{Adapter, AuthRequirement, HealthStatus, ToolDefinition, object_schema};

const VENDOR: Vendor = Vendor::NewsApi;

/// Articles rendered per response.
const MAX_ARTICLES: usize = 5;

/// Sources rendered by `get_news_sources`.
const MAX_SOURCES: usize = 10;

/// Description length limits (characters).
const ARTICLE_DESCRIPTION_CHARS: usize = 150;
const SOURCE_DESCRIPTION_CHARS: usize = 100;

/// Friendly outlet names mapped to NewsAPI source ids.
const SOURCE_ALIASES: &[(&str, &str)] = &[
    ("bbc", "bbc-news"),
    ("cnn", "cnn"),
    ("reuters", "reuters"),
    ("bloomberg", "bloomberg"),
    ("techcrunch", "techcrunch"),
    ("wsj", "the-wall-street-journal"),
];

const HELP_TEXT: &str = "News Bot Commands:

Headlines:
- \"latest news\" or \"top headlines\" - Get current top headlines
- \"news from [country]\" - Get headlines from a specific country (us, gb, ca, ...)

Search:
- \"news about [topic]\" - Search for articles about a topic
- \"search [keyword]\" - Find articles containing keywords

Sources:
- \"news sources\" - List available news sources
- \"sources for [category]\" - Sources by category (business, technology, ...)
- \"news from [source]\" - Articles from a specific outlet (bbc, cnn, wsj, ...)

Note: requires a free API key from NewsAPI.org in NEWS_API_KEY.";

/// NewsAPI adapter.
pub struct NewsAdapter {
    id: String,
    config: Arc<ActionConfig>,
    http: Arc<dyn HttpClient>,
}

impl NewsAdapter {
    pub fn new(id: impl Into<String>, config: Arc<ActionConfig>, http: Arc<dyn HttpClient>) -> Self {
        Self {
            id: id.into(),
            config,
            http,
        }
    }

    fn endpoint(&self, path: &str) -> HttpRequest {
        HttpRequest::get(
            format!("{}/{path}", self.config.base_url(VENDOR)),
            self.config.request_timeout(),
        )
    }

    /// Perform a request and reject bodies NewsAPI marks as errors.
    async fn fetch(&self, subject: &str, request: HttpRequest) -> Result<Value> {
        let body = fetch_json(self.http.as_ref(), VENDOR, subject, &request).await?;
        if fields::text(&body, "/status") == Some("error") {
            let detail = fields::text(&body, "/message")
                .or_else(|| fields::text(&body, "/code"))
                .unwrap_or("unknown error")
                .to_owned();
            return Err(ActionError::Upstream {
                vendor: VENDOR,
                detail,
            });
        }
        Ok(body)
    }

    async fn tool_get_news(&self, params: &Value) -> Result<String> {
        let api_key = self.config.require_key(VENDOR)?;
        let query = params::optional_str(params, "query").unwrap_or("latest");
        debug!(query, "fetching news");

        let mut request = self
            .endpoint("top-headlines")
            .param("apiKey", api_key)
            .param("country", "us")
            .param("pageSize", MAX_ARTICLES.to_string());
        if !query.eq_ignore_ascii_case("latest") {
            request = request.param("q", query);
        }

        let body = self.fetch(query, request).await?;
        let header = if query.eq_ignore_ascii_case("latest") {
            "📰 Latest News Headlines:".to_owned()
        } else {
            format!("📰 Headlines about '{query}':")
        };
        render_articles(&header, query, &body)
    }

    async fn tool_get_top_headlines(&self, params: &Value) -> Result<String> {
        let api_key = self.config.require_key(VENDOR)?;
        let country = params::optional_str(params, "country")
            .unwrap_or("us")
            .to_ascii_lowercase();
        debug!(country = %country, "fetching top headlines");

        let request = self
            .endpoint("top-headlines")
            .param("apiKey", api_key)
            .param("country", country.as_str())
            .param("pageSize", "10");

        let body = self.fetch(&country, request).await?;
        let header = found_header(&body);
        render_articles(&header, &country, &body)
    }

    async fn tool_search_news(&self, params: &Value) -> Result<String> {
        let api_key = self.config.require_key(VENDOR)?;
        let topic = params::required_str(params, "search_news", "topic")?;
        debug!(topic, "searching news");

        let request = self
            .endpoint("everything")
            .param("apiKey", api_key)
            .param("q", topic)
            .param("sortBy", "publishedAt")
            .param("pageSize", MAX_ARTICLES.to_string())
            .param("language", "en");

        let body = self.fetch(topic, request).await?;
        let header = found_header(&body);
        render_articles(&header, topic, &body)
    }

    async fn tool_get_news_by_source(&self, params: &Value) -> Result<String> {
        let api_key = self.config.require_key(VENDOR)?;
        let sources = params::required_str(params, "get_news_by_source", "sources")?;
        let ids = resolve_source_ids(sources);
        debug!(sources, ids = %ids, "fetching news by source");

        let request = self
            .endpoint("top-headlines")
            .param("apiKey", api_key)
            .param("sources", ids.as_str())
            .param("pageSize", MAX_ARTICLES.to_string());

        let body = self.fetch(sources, request).await?;
        let header = found_header(&body);
        render_articles(&header, sources, &body)
    }

    async fn tool_get_news_sources(&self, params: &Value) -> Result<String> {
        let api_key = self.config.require_key(VENDOR)?;
        let category = params::optional_str(params, "category").map(str::to_ascii_lowercase);
        debug!(category = ?category, "listing news sources");

        let mut request = self
            .endpoint("sources")
            .param("apiKey", api_key)
            .param("language", "en");
        if let Some(ref category) = category {
            request = request.param("category", category.as_str());
        }

        let subject = category.as_deref().unwrap_or("news sources");
        let body = self.fetch(subject, request).await?;
        render_sources(subject, &body)
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn found_header(body: &Value) -> String {
    let shown = fields::array(body, "/articles").len().min(MAX_ARTICLES);
    let total = fields::number(body, "/totalResults").unwrap_or_else(|| shown.to_string());
    format!("📰 Found {total} articles:")
}

fn render_articles(header: &str, subject: &str, body: &Value) -> Result<String> {
    let articles = fields::array(body, "/articles");
    if articles.is_empty() {
        return Err(ActionError::NotFound {
            vendor: VENDOR,
            subject: subject.to_owned(),
        });
    }

    let mut out = format!("{header}\n\n");
    for (i, article) in articles.iter().take(MAX_ARTICLES).enumerate() {
        let title = fields::text(article, "/title").unwrap_or("No title");
        let source = fields::text(article, "/source/name").unwrap_or("Unknown");
        out.push_str(&format!("{}. **{title}**\n   Source: {source}\n", i + 1));
        if let Some(description) = fields::text(article, "/description") {
            out.push_str(&format!(
                "   {}\n",
                fields::truncate(description, ARTICLE_DESCRIPTION_CHARS)
            ));
        }
        if let Some(published) = fields::text(article, "/publishedAt") {
            out.push_str(&format!("   Published: {}\n", format_published(published)));
        }
        out.push('\n');
    }
    Ok(out.trim_end().to_owned())
}

fn render_sources(subject: &str, body: &Value) -> Result<String> {
    let sources = fields::array(body, "/sources");
    if sources.is_empty() {
        return Err(ActionError::NotFound {
            vendor: VENDOR,
            subject: subject.to_owned(),
        });
    }

    let shown = &sources[..sources.len().min(MAX_SOURCES)];
    let mut out = format!("📡 Available News Sources ({}):\n\n", shown.len());
    for (i, source) in shown.iter().enumerate() {
        let name = fields::text(source, "/name").unwrap_or("Unknown");
        let id = fields::text(source, "/id").unwrap_or("unknown");
        let category = capitalize(fields::text(source, "/category").unwrap_or("unknown"));
        let country = fields::text(source, "/country")
            .unwrap_or("unknown")
            .to_uppercase();
        out.push_str(&format!(
            "{}. **{name}** ({id})\n   Category: {category}, Country: {country}\n",
            i + 1
        ));
        if let Some(description) = fields::text(source, "/description") {
            out.push_str(&format!(
                "   {}\n",
                fields::truncate(description, SOURCE_DESCRIPTION_CHARS)
            ));
        }
        out.push('\n');
    }
    Ok(out.trim_end().to_owned())
}

/// `2024-05-01T12:30:00Z` → `2024-05-01 12:30 UTC`; anything else verbatim.
fn format_published(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => ts
            .with_timezone(&Utc)
            .format("%Y-%m-%d %H:%M UTC")
            .to_string(),
        Err(_) => raw.to_owned(),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Map friendly outlet names to NewsAPI ids: `"BBC, Wall Street"` →
/// `"bbc-news,wall-street"`.
fn resolve_source_ids(sources: &str) -> String {
    sources
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .map(|s| {
            SOURCE_ALIASES
                .iter()
                .find(|(alias, _)| *alias == s)
                .map(|(_, id)| (*id).to_owned())
                .unwrap_or_else(|| s.split_whitespace().collect::<Vec<_>>().join("-"))
        })
        .collect::<Vec<_>>()
        .join(",")
}

// ---------------------------------------------------------------------------
// Adapter trait implementation
// ---------------------------------------------------------------------------

#[async_trait]
impl Adapter for NewsAdapter {
    fn id(&self) -> &str {
        &self.id
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition {
                name: "get_news".into(),
                description: "Get latest news headlines or search headlines for a specific topic."
                    .into(),
                parameters: object_schema(
                    &[(
                        "query",
                        "string",
                        "Topic to filter headlines by, or 'latest' (default) for top stories",
                    )],
                    &[],
                ),
            },
            ToolDefinition {
                name: "get_top_headlines".into(),
                description: "Gets latest news headlines for a country.".into(),
                parameters: object_schema(
                    &[(
                        "country",
                        "string",
                        "Two-letter country code (default 'us')",
                    )],
                    &[],
                ),
            },
            ToolDefinition {
                name: "search_news".into(),
                description: "Searches for news articles about a specific topic.".into(),
                parameters: object_schema(
                    &[("topic", "string", "Topic or keywords to search for")],
                    &["topic"],
                ),
            },
            ToolDefinition {
                name: "get_news_by_source".into(),
                description: "Gets news from specific sources.".into(),
                parameters: object_schema(
                    &[(
                        "sources",
                        "string",
                        "Comma-separated outlet names or NewsAPI ids (e.g. 'bbc, cnn')",
                    )],
                    &["sources"],
                ),
            },
            ToolDefinition {
                name: "get_news_sources".into(),
                description: "Gets available news sources, optionally filtered by category."
                    .into(),
                parameters: object_schema(
                    &[(
                        "category",
                        "string",
                        "business, entertainment, general, health, science, sports or technology",
                    )],
                    &[],
                ),
            },
            ToolDefinition {
                name: "get_news_help".into(),
                description: "Gets news help and available commands.".into(),
                parameters: object_schema(&[], &[]),
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
            "get_news" => self.tool_get_news(params).await,
            "get_top_headlines" => self.tool_get_top_headlines(params).await,
            "search_news" => self.tool_search_news(params).await,
            "get_news_by_source" => self.tool_get_news_by_source(params).await,
            "get_news_sources" => self.tool_get_news_sources(params).await,
            "get_news_help" => Ok(HELP_TEXT.to_owned()),
            _ => Err(ActionError::UnknownAction {
                name: name.to_owned(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
