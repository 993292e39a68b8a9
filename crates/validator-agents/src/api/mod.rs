//! Web search clients

pub mod serper;

#[cfg(test)]
pub(crate) mod testing;

#[cfg(test)]
pub use serper::MockSearchProvider;
pub use serper::{AnswerBox, OrganicResult, SearchProvider, SearchResponse, SerperClient};

use crate::cache::CachingSearch;
use crate::config::ValidatorConfig;
use crate::error::Result;
use std::sync::Arc;

/// Build the search provider described by `config`
///
/// The Serper client is wrapped in a timed cache unless caching is disabled.
pub fn search_provider(config: &ValidatorConfig) -> Result<Arc<dyn SearchProvider>> {
    let client: Arc<dyn SearchProvider> = Arc::new(SerperClient::new(config)?);
    if config.cache_enabled {
        Ok(Arc::new(CachingSearch::new(client, config.cache_ttl)))
    } else {
        Ok(client)
    }
}
