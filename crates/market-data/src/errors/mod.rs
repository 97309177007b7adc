//! Error types for the market data crate.

use thiserror::Error;

/// Errors that can occur while fetching token rates from a provider.
///
/// The aggregation service treats every variant the same way: any failure
/// inside a batch fails the whole batch, and the HTTP layer collapses the
/// cause into a single generic response. The variants exist so logs can say
/// what actually went wrong.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The requested token id is unknown to the provider.
    #[error("Token not found: {0}")]
    TokenNotFound(String),

    /// The provider rate limited the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// A provider-specific error occurred (bad status, unparseable body).
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}
