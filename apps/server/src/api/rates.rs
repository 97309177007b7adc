use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use coinrates_market_data::TokenRate;

#[derive(serde::Deserialize)]
struct RatesQuery {
    #[serde(rename = "tokenIds")]
    token_ids: Option<String>,
}

/// Aggregated market caps for the requested token ids, in request order.
///
/// An absent or empty `tokenIds` parameter yields an empty array, not an
/// error.
async fn get_token_rates(
    State(state): State<Arc<AppState>>,
    Query(q): Query<RatesQuery>,
) -> ApiResult<Json<Vec<TokenRate>>> {
    let rates = state.rate_service.get_rates(q.token_ids.as_deref()).await?;
    Ok(Json(rates))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/tokenRates", get(get_token_rates))
}
