//! genai-proxy-service: credential-injecting proxy for the Gemini
//! generative-language API.
//!
//! Accepts `{ "prompt": ... }` over HTTP, forwards it upstream with the
//! server-held API key, and relays the upstream response verbatim.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod services;
pub mod startup;
