//! Serper (Google search) API client

use crate::config::{SERPER_API_KEY_VAR, ValidatorConfig};
use crate::error::{Result, ValidatorError};
use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// One organic search hit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganicResult {
    /// Page title
    #[serde(default)]
    pub title: String,
    /// Text excerpt shown under the title
    #[serde(default)]
    pub snippet: String,
    /// Page URL
    #[serde(default)]
    pub link: String,
}

impl OrganicResult {
    /// Convenience constructor, mostly for fixtures
    pub fn new(title: impl Into<String>, snippet: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            snippet: snippet.into(),
            link: link.into(),
        }
    }
}

/// Featured answer shown above the organic results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerBox {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
}

/// Search response, reduced to the fields the stages read
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub organic: Vec<OrganicResult>,
    #[serde(default, rename = "answerBox", skip_serializing_if = "Option::is_none")]
    pub answer_box: Option<AnswerBox>,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    q: &'a str,
    num: usize,
}

/// Web search backend used by the research stages
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Run `query`, asking for at most `num` organic results
    async fn search(&self, query: &str, num: usize) -> Result<SearchResponse>;
}

/// Serper client with client-side rate limiting and retries
pub struct SerperClient {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
    rate_limiter: SharedRateLimiter,
    config: ValidatorConfig,
}

impl SerperClient {
    /// Create a client from the validator configuration
    ///
    /// A missing API key is not an error here; searches fail with
    /// [`ValidatorError::MissingApiKey`] and the stages fall back.
    pub fn new(config: &ValidatorConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        let quota = Quota::per_minute(
            NonZeroU32::new(config.rate_limit_per_minute).unwrap_or(NonZeroU32::MIN),
        );

        Ok(Self {
            client,
            api_key: config
                .serper_api_key
                .clone()
                .filter(|key| !key.trim().is_empty()),
            endpoint: config.search_endpoint.clone(),
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
            config: config.clone(),
        })
    }

    /// Whether searches can reach the API at all
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    async fn send_once(&self, api_key: &str, query: &str, num: usize) -> Result<SearchResponse> {
        self.rate_limiter.until_ready().await;

        let response = self
            .client
            .post(&self.endpoint)
            .header("X-API-KEY", api_key)
            .json(&SearchRequest { q: query, num })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!("Serper returned {status}: {body}");
            return Err(ValidatorError::SearchFailed {
                status: status.as_u16(),
            });
        }

        Ok(response.json::<SearchResponse>().await?)
    }
}

#[async_trait]
impl SearchProvider for SerperClient {
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn search(&self, query: &str, num: usize) -> Result<SearchResponse> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ValidatorError::MissingApiKey(SERPER_API_KEY_VAR))?;

        let mut attempt = 0;
        loop {
            match self.send_once(api_key, query, num).await {
                Ok(response) => {
                    debug!("Search returned {} organic results", response.organic.len());
                    return Ok(response);
                }
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let backoff = self.config.retry_backoff(attempt);
                    warn!(
                        "Search attempt {} failed: {}. Retrying in {:?}",
                        attempt + 1,
                        e,
                        backoff
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_without_key() {
        let client = SerperClient::new(&ValidatorConfig::default()).unwrap();
        assert!(!client.has_api_key());
    }

    #[tokio::test]
    async fn test_search_without_key_fails_fast() {
        let client = SerperClient::new(&ValidatorConfig::default()).unwrap();
        let err = client.search("meal kits", 10).await.unwrap_err();
        assert!(matches!(err, ValidatorError::MissingApiKey(SERPER_API_KEY_VAR)));
    }

    #[tokio::test]
    async fn test_retries_back_off_before_giving_up() {
        let config = ValidatorConfig::builder()
            .serper_api_key("test-key")
            .search_endpoint("http://127.0.0.1:1/search")
            .max_retries(2)
            .retry_backoff_base(std::time::Duration::from_millis(20))
            .build()
            .unwrap();
        let client = SerperClient::new(&config).unwrap();

        let started = std::time::Instant::now();
        let err = client.search("meal kits", 10).await.unwrap_err();

        assert!(matches!(err, ValidatorError::NetworkError(_)));
        // 20ms then 40ms
        assert!(started.elapsed() >= config.retry_backoff(0) + config.retry_backoff(1));
    }

    #[test]
    fn test_response_deserialization() {
        let body = serde_json::json!({
            "searchParameters": { "q": "saas market size" },
            "answerBox": { "answer": "$195 billion" },
            "organic": [
                { "title": "SaaS Market Report", "snippet": "valued at USD 195.2 billion", "link": "https://example.com/saas", "position": 1 },
                { "title": "No snippet" }
            ]
        });

        let response: SearchResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.organic.len(), 2);
        assert_eq!(response.organic[1].snippet, "");
        assert_eq!(
            response.answer_box.unwrap().answer.as_deref(),
            Some("$195 billion")
        );
    }

    #[test]
    fn test_request_serialization() {
        let body = serde_json::to_value(SearchRequest { q: "edtech", num: 5 }).unwrap();
        assert_eq!(body, serde_json::json!({ "q": "edtech", "num": 5 }));
    }
}
