use serde::{Deserialize, Serialize};

/// Normalized market-capitalization figures for one token.
///
/// This is the wire shape the service returns, one element per requested
/// token id, in request order. Providers that omit a field produce `None`
/// for the pass-through strings and `0` for the numeric fields; callers are
/// expected to handle both.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRate {
    /// Token display name as received from the provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Token ticker symbol as received from the provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,

    /// Market capitalization in USD; `0` when the provider omits it
    #[serde(default)]
    pub market_cap_usd: f64,

    /// Market capitalization in IDR; `0` when the provider omits it
    #[serde(default)]
    pub market_cap_idr: f64,
}
