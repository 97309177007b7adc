//! CoinGecko token rate provider implementation.
//!
//! This module fetches per-token market data from the CoinGecko API via the
//! /coins/{id} detail endpoint. The demo API key travels in a request header;
//! without a key CoinGecko still answers on its public tier, just at a lower
//! rate. API documentation: https://docs.coingecko.com/reference/introduction

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::errors::MarketDataError;
use crate::models::TokenRate;
use crate::provider::TokenRateProvider;

const BASE_URL: &str = "https://api.coingecko.com/api/v3";
const PROVIDER_ID: &str = "COINGECKO";
const API_KEY_HEADER: &str = "x-cg-demo-api-key";

// ============================================================================
// API Response Structures
// ============================================================================

/// Response from /coins/{id}; only the consumed fields are modeled.
#[derive(Debug, Deserialize)]
struct CoinResponse {
    /// Token display name
    name: Option<String>,
    /// Token ticker symbol
    symbol: Option<String>,
    /// Market data section; absent for delisted or preview coins
    market_data: Option<MarketDataSection>,
}

#[derive(Debug, Deserialize)]
struct MarketDataSection {
    /// Market capitalization keyed by currency
    market_cap: Option<MarketCapSection>,
}

#[derive(Debug, Deserialize)]
struct MarketCapSection {
    usd: Option<f64>,
    idr: Option<f64>,
}

/// Error response from CoinGecko
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
}

// ============================================================================
// CoinGeckoProvider
// ============================================================================

/// CoinGecko token rate provider.
///
/// One request per token id against the coin detail endpoint. The demo tier
/// is limited to 30 calls per minute.
pub struct CoinGeckoProvider {
    client: Client,
    api_key: String,
}

impl CoinGeckoProvider {
    /// Create a new CoinGecko provider with the given API key.
    ///
    /// An empty key is allowed; the key header is simply not sent.
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, api_key }
    }

    /// Make a GET request to the CoinGecko API.
    async fn fetch(&self, endpoint: &str) -> Result<String, MarketDataError> {
        let url = format!("{}{}", BASE_URL, endpoint);

        let mut request = self.client.get(&url).header("accept", "application/json");
        if !self.api_key.is_empty() {
            request = request.header(API_KEY_HEADER, &self.api_key);
        }

        debug!("CoinGecko request: {}", endpoint);

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                MarketDataError::Timeout {
                    provider: PROVIDER_ID.to_string(),
                }
            } else {
                MarketDataError::Network(e)
            }
        })?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: "Invalid or missing API key".to_string(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            // CoinGecko reports unknown coin ids as 404 {"error":"coin not found"}
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(MarketDataError::TokenNotFound(
                    endpoint.trim_start_matches("/coins/").to_string(),
                ));
            }

            if let Ok(error_resp) = serde_json::from_str::<ErrorResponse>(&body) {
                if let Some(error_msg) = error_resp.error {
                    return Err(MarketDataError::ProviderError {
                        provider: PROVIDER_ID.to_string(),
                        message: error_msg,
                    });
                }
            }

            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP {} - {}", status, body),
            });
        }

        response
            .text()
            .await
            .map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to read response: {}", e),
            })
    }

    /// Fetch and normalize one coin detail record.
    async fn fetch_coin(&self, token_id: &str) -> Result<TokenRate, MarketDataError> {
        let endpoint = format!("/coins/{}", urlencoding::encode(token_id));
        let text = self.fetch(&endpoint).await?;

        let response: CoinResponse =
            serde_json::from_str(&text).map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to parse coin response: {}", e),
            })?;

        Ok(normalize(response))
    }
}

#[async_trait]
impl TokenRateProvider for CoinGeckoProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn get_token_rate(&self, token_id: &str) -> Result<TokenRate, MarketDataError> {
        debug!("Fetching token rate for {} from CoinGecko", token_id);
        self.fetch_coin(token_id).await
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Map a raw coin record to the normalized wire shape.
///
/// Missing market-cap figures become 0; name and symbol pass through as
/// received, absent included.
fn normalize(coin: CoinResponse) -> TokenRate {
    let market_cap = coin.market_data.and_then(|md| md.market_cap);
    let (usd, idr) = match market_cap {
        Some(mc) => (mc.usd.unwrap_or(0.0), mc.idr.unwrap_or(0.0)),
        None => (0.0, 0.0),
    };

    TokenRate {
        name: coin.name,
        symbol: coin.symbol,
        market_cap_usd: usd,
        market_cap_idr: idr,
    }
}

// ============================================================================
// Tests
// ============================================================================
