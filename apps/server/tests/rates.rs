use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::Request,
};
use coinrates_market_data::{
    MarketDataError, RateCache, TokenRate, TokenRateProvider, TokenRateService, TtlCache,
};
use coinrates_server::{api::app_router, config::Config, AppState};
use serde_json::json;
use tower::ServiceExt;

/// Provider stub serving canned records, counting fetches, optionally
/// failing one token id.
struct StubProvider {
    calls: Arc<AtomicUsize>,
    fail_on: Option<&'static str>,
}

#[async_trait]
impl TokenRateProvider for StubProvider {
    fn id(&self) -> &'static str {
        "STUB"
    }

    async fn get_token_rate(&self, token_id: &str) -> Result<TokenRate, MarketDataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_on == Some(token_id) {
            return Err(MarketDataError::TokenNotFound(token_id.to_string()));
        }
        match token_id {
            "notcoin" => Ok(TokenRate {
                name: Some("Notcoin".to_string()),
                symbol: Some("NOT".to_string()),
                market_cap_usd: 500_000_000.0,
                market_cap_idr: 7_500_000_000_000.0,
            }),
            "dogs-2" => Ok(TokenRate {
                name: Some("Dogs".to_string()),
                symbol: Some("DOGS".to_string()),
                market_cap_usd: 300_000_000.0,
                market_cap_idr: 4_500_000_000_000.0,
            }),
            other => Ok(TokenRate {
                name: Some(other.to_string()),
                symbol: None,
                market_cap_usd: 0.0,
                market_cap_idr: 0.0,
            }),
        }
    }
}

fn build_test_router(fail_on: Option<&'static str>) -> (axum::Router, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let provider = StubProvider {
        calls: calls.clone(),
        fail_on,
    };
    let cache: Arc<dyn RateCache> = Arc::new(TtlCache::<Vec<TokenRate>>::new());
    let rate_service = Arc::new(TokenRateService::new(Arc::new(provider), cache));
    let state = Arc::new(AppState { rate_service });
    let config = Config::from_env();
    (app_router(state, &config), calls)
}

async fn get_json(app: &axum::Router, uri: &str) -> (u16, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status().as_u16();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

#[tokio::test]
async fn healthz_works() {
    let (app, _) = build_test_router(None);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn token_rates_are_normalized_and_ordered() {
    let (app, calls) = build_test_router(None);

    let (status, body) = get_json(&app, "/tokenRates?tokenIds=notcoin,dogs-2").await;
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!([
            {
                "name": "Notcoin",
                "symbol": "NOT",
                "marketCapUsd": 500_000_000.0,
                "marketCapIdr": 7_500_000_000_000.0
            },
            {
                "name": "Dogs",
                "symbol": "DOGS",
                "marketCapUsd": 300_000_000.0,
                "marketCapIdr": 4_500_000_000_000.0
            }
        ])
    );
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn missing_token_ids_yield_empty_array() {
    let (app, calls) = build_test_router(None);

    let (status, body) = get_json(&app, "/tokenRates").await;
    assert_eq!(status, 200);
    assert_eq!(body, json!([]));

    let (status, body) = get_json(&app, "/tokenRates?tokenIds=").await;
    assert_eq!(status, 200);
    assert_eq!(body, json!([]));

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn repeat_request_is_served_from_cache() {
    let (app, calls) = build_test_router(None);

    let (_, first) = get_json(&app, "/tokenRates?tokenIds=notcoin,dogs-2").await;
    let (_, second) = get_json(&app, "/tokenRates?tokenIds=notcoin,dogs-2").await;
    assert_eq!(first, second);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn upstream_failure_collapses_to_generic_500() {
    let (app, calls) = build_test_router(Some("dogs-2"));

    let (status, body) = get_json(&app, "/tokenRates?tokenIds=notcoin,dogs-2").await;
    assert_eq!(status, 500);
    assert_eq!(body, json!({"error": "Error fetching token rates"}));

    // Nothing was cached: the identical retry reaches the provider again.
    let calls_after_first = calls.load(Ordering::SeqCst);
    let (status, _) = get_json(&app, "/tokenRates?tokenIds=notcoin,dogs-2").await;
    assert_eq!(status, 500);
    assert!(calls.load(Ordering::SeqCst) > calls_after_first);
}
