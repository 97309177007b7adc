use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use coinrates_market_data::MarketDataError;
use serde::Serialize;
use thiserror::Error;

#[allow(dead_code)]
#[derive(Error, Debug)]
pub enum ApiError {
    // Every aggregation failure collapses to this one message; the caller
    // never learns which token id or cause was at fault.
    #[error("Error fetching token rates")]
    TokenRates(#[from] MarketDataError),
    #[error("Not Found")]
    NotFound,
    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match &self {
            ApiError::TokenRates(cause) => {
                tracing::error!("Token rate aggregation failed: {}", cause);
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            ApiError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Internal(reason) => (StatusCode::INTERNAL_SERVER_ERROR, reason.clone()),
        };
        let body = Json(ErrorBody { error: msg });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
