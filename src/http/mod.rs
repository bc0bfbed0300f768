//! HTTP transport module
//!
//! The pagination engine talks to the API only through the [`Transport`]
//! trait. [`HttpClient`] is the production implementation with retry,
//! backoff and rate limiting; tests substitute stub transports.
//!
//! # Features
//!
//! - **Automatic Retries**: 429 and 5xx responses are retried with backoff
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Backoff Strategies**: Constant, linear, and exponential backoff

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use rate_limit::{RateLimiter, RateLimiterConfig};

use crate::error::Result;
use crate::types::JsonValue;
use async_trait::async_trait;
use std::sync::Arc;

/// Issues GET requests and returns decoded JSON bodies
///
/// Implementations must turn any non-success response into an error; the
/// pagination engine treats every returned value as a successful page.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `url` and parse the body as JSON
    async fn get_json(&self, url: &str) -> Result<JsonValue>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn get_json(&self, url: &str) -> Result<JsonValue> {
        (**self).get_json(url).await
    }
}

#[cfg(test)]
mod tests;
