use std::sync::Arc;

use crate::config::Config;
use coinrates_market_data::{
    CoinGeckoProvider, RateCache, TokenRate, TokenRateProvider, TokenRateService, TtlCache,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub rate_service: Arc<TokenRateService>,
}

pub fn init_tracing() {
    let log_format = std::env::var("CR_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub fn build_state(config: &Config) -> Arc<AppState> {
    if config.coingecko_api_key.is_empty() {
        tracing::warn!("COINGECKO_API_KEY is not set; provider requests go out unauthenticated");
    }

    let provider: Arc<dyn TokenRateProvider> =
        Arc::new(CoinGeckoProvider::new(config.coingecko_api_key.clone()));
    let cache: Arc<dyn RateCache> = Arc::new(TtlCache::<Vec<TokenRate>>::new());
    let rate_service = Arc::new(TokenRateService::new(provider, cache));

    Arc::new(AppState { rate_service })
}
