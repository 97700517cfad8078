//! Upstream text-generation provider abstraction.
//!
//! A trait seam over the Gemini backend so the handler can be exercised
//! against a mock without touching the network.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use axum::http::StatusCode;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Upstream API error {status}")]
    Api { status: StatusCode, body: String },

    #[error("Network error: {0}")]
    Network(String),
}

/// Trait for prompt-forwarding text providers.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Forward a prompt upstream and resolve to the response body exactly as
    /// received. Callers relay it without re-serializing.
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;

    /// Configuration check backing the readiness probe. Does not touch the
    /// network.
    async fn health_check(&self) -> Result<(), ProviderError>;
}
