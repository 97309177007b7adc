//! Market data models
//!
//! This module contains the data types for token rate operations:
//! - `rate` - Normalized market-cap figures (TokenRate)

mod rate;

pub use rate::TokenRate;
