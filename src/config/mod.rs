use anyhow::Result;
use dotenvy::dotenv;
use secrecy::Secret;
use serde::Deserialize;
use std::env;

/// Default model segment of the upstream URL.
const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Default base URL of the generative-language API. Overridable so tests can
/// point the provider at a local mock server.
const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub gemini: GeminiSettings,
    pub service_name: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Clone, Debug)]
pub struct GeminiSettings {
    /// The server-held API key. Never logged, never serialized into any
    /// response; an empty value means proxy requests are rejected with 500.
    pub api_key: Secret<String>,
    pub model: String,
    pub api_base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let host = env::var("PROXY_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PROXY_SERVICE_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()?;

        let api_key = env::var("GEMINI_API_KEY").unwrap_or_default();
        let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let api_base_url =
            env::var("GEMINI_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());

        Ok(Self {
            server: ServerConfig { host, port },
            gemini: GeminiSettings {
                api_key: Secret::new(api_key),
                model,
                api_base_url,
            },
            service_name: "genai-proxy-service".to_string(),
        })
    }
}
