//! Token rate aggregation service.
//!
//! Cache-aside over the provider: parse the requested token ids, serve a
//! cached collection when one exists, otherwise fan out one provider fetch
//! per id, cache the normalized result, and return it. Any single fetch
//! failure fails the whole batch and caches nothing.

use std::sync::Arc;
use std::time::Duration;

use futures::future::try_join_all;
use tracing::debug;

use crate::cache::RateCache;
use crate::errors::MarketDataError;
use crate::models::TokenRate;
use crate::provider::TokenRateProvider;

/// How long an aggregated collection stays servable from the cache.
pub const RATES_CACHE_TTL: Duration = Duration::from_secs(10 * 60);

const CACHE_KEY_PREFIX: &str = "token-rates:";

/// Fan-out aggregation over a token rate provider with cache-aside semantics.
///
/// Constructed once at process start; the provider and cache are shared by
/// reference across request handlers.
pub struct TokenRateService {
    provider: Arc<dyn TokenRateProvider>,
    cache: Arc<dyn RateCache>,
    ttl: Duration,
}

impl TokenRateService {
    /// Create a service with the fixed production TTL.
    pub fn new(provider: Arc<dyn TokenRateProvider>, cache: Arc<dyn RateCache>) -> Self {
        Self::with_ttl(provider, cache, RATES_CACHE_TTL)
    }

    /// Same as [`new`](Self::new) with an explicit cache TTL.
    pub fn with_ttl(
        provider: Arc<dyn TokenRateProvider>,
        cache: Arc<dyn RateCache>,
        ttl: Duration,
    ) -> Self {
        Self {
            provider,
            cache,
            ttl,
        }
    }

    /// Resolve a raw comma-separated token id list to normalized rates.
    ///
    /// An absent or empty parameter yields an empty collection without any
    /// upstream calls. Otherwise the result has exactly one element per
    /// parsed id, in request order; duplicates are fetched per occurrence.
    /// The first failing fetch fails the call; in that case nothing is
    /// cached and the next identical request fans out again.
    pub async fn get_rates(
        &self,
        raw_token_ids: Option<&str>,
    ) -> Result<Vec<TokenRate>, MarketDataError> {
        let token_ids = parse_token_ids(raw_token_ids);
        if token_ids.is_empty() {
            return Ok(Vec::new());
        }

        let key = cache_key(&token_ids);
        if let Some(cached) = self.cache.get(&key) {
            debug!("Serving {} token rates from cache", cached.len());
            return Ok(cached);
        }

        let rates = try_join_all(
            token_ids
                .iter()
                .map(|id| self.provider.get_token_rate(id)),
        )
        .await?;

        self.cache.put(&key, rates.clone(), self.ttl);
        debug!(
            "Fetched {} token rates from {}",
            rates.len(),
            self.provider.id()
        );
        Ok(rates)
    }
}

/// Split a raw `tokenIds` parameter into an ordered id list.
///
/// Tokens are trimmed and empty segments dropped, so incidental formatting
/// (whitespace, trailing comma) does not change the result. Order and
/// repetition are preserved.
fn parse_token_ids(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Cache key for a parsed id list: fixed prefix + comma-joined ids.
///
/// Keyed on the parsed list rather than the raw parameter so equivalent
/// inputs share one entry.
fn cache_key(token_ids: &[String]) -> String {
    format!("{}{}", CACHE_KEY_PREFIX, token_ids.join(","))
}
