//! In-memory search fixtures for tests

use super::{OrganicResult, SearchProvider, SearchResponse};
use crate::config::SERPER_API_KEY_VAR;
use crate::error::{Result, ValidatorError};
use async_trait::async_trait;
use std::sync::Mutex;

/// Answers queries from canned responses, matched by substring
#[derive(Default)]
pub(crate) struct StaticSearch {
    routes: Vec<(String, SearchResponse)>,
    unavailable: bool,
    queries: Mutex<Vec<String>>,
}

impl StaticSearch {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Behaves like a client without an API key
    pub(crate) fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Serve `results` for any query containing `needle`
    pub(crate) fn route(mut self, needle: &str, results: Vec<OrganicResult>) -> Self {
        self.routes.push((
            needle.to_string(),
            SearchResponse {
                organic: results,
                answer_box: None,
            },
        ));
        self
    }

    /// Serve a full response for any query containing `needle`
    pub(crate) fn route_response(mut self, needle: &str, response: SearchResponse) -> Self {
        self.routes.push((needle.to_string(), response));
        self
    }

    pub(crate) fn queries(&self) -> Vec<String> {
        self.queries
            .lock()
            .map(|q| q.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SearchProvider for StaticSearch {
    async fn search(&self, query: &str, _num: usize) -> Result<SearchResponse> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.to_string());
        }

        if self.unavailable {
            return Err(ValidatorError::MissingApiKey(SERPER_API_KEY_VAR));
        }

        Ok(self
            .routes
            .iter()
            .find(|(needle, _)| query.contains(needle.as_str()))
            .map(|(_, response)| response.clone())
            .unwrap_or_default())
    }
}

/// Shorthand for an organic result
pub(crate) fn hit(title: &str, snippet: &str, link: &str) -> OrganicResult {
    OrganicResult::new(title, snippet, link)
}
