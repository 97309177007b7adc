//! Token rate provider trait definition.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::TokenRate;

/// Trait for token rate providers.
///
/// Implement this trait to add support for a new pricing source, or to stand
/// in a mock for tests. The aggregation service holds the trait object and
/// never touches a concrete provider.
#[async_trait]
pub trait TokenRateProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "COINGECKO". Used for logging.
    fn id(&self) -> &'static str;

    /// Fetch normalized market-cap figures for one token id.
    ///
    /// # Arguments
    ///
    /// * `token_id` - The token id in the provider's namespace (e.g. "notcoin")
    ///
    /// # Returns
    ///
    /// The normalized rate on success, or a `MarketDataError` on failure.
    /// A response that merely lacks fields is a success with defaults, not
    /// an error.
    async fn get_token_rate(&self, token_id: &str) -> Result<TokenRate, MarketDataError>;
}
