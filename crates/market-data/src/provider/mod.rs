//! Token rate provider abstractions and implementations.
//!
//! This module contains:
//! - The `TokenRateProvider` trait the aggregation service fetches through
//! - Concrete provider implementations (CoinGecko)
//!
//! Providers receive one token id per call and return a fully normalized
//! [`TokenRate`](crate::models::TokenRate); defaulting of missing fields
//! happens here, not in the aggregation service.

mod traits;

// Provider implementations
pub mod coingecko;

// Re-exports
pub use coingecko::CoinGeckoProvider;
pub use traits::TokenRateProvider;
