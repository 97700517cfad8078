use genai_proxy_service::config::{Config, GeminiSettings, ServerConfig};
use genai_proxy_service::startup::Application;
use secrecy::Secret;

pub const TEST_API_KEY: &str = "test-gemini-api-key";

pub struct TestApp {
    pub address: String,
    pub port: u16,
}

impl TestApp {
    /// Spawn the service with the default test credential, pointed at the
    /// given upstream base URL.
    pub async fn spawn(upstream_base_url: &str) -> Self {
        Self::spawn_with_key(upstream_base_url, TEST_API_KEY).await
    }

    pub async fn spawn_with_key(upstream_base_url: &str, api_key: &str) -> Self {
        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // random port for testing
            },
            gemini: GeminiSettings {
                api_key: Secret::new(api_key.to_string()),
                model: "gemini-1.5-flash".to_string(),
                api_base_url: upstream_base_url.to_string(),
            },
            service_name: "genai-proxy-service".to_string(),
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the HTTP server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp { address, port }
    }
}
