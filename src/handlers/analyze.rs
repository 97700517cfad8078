use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use validator::Validate;

use crate::error::AppError;
use crate::services::metrics;
use crate::services::providers::ProviderError;
use crate::startup::AppState;

/// Inbound proxy request body.
#[derive(Debug, Deserialize, Validate)]
pub struct AnalyzeRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Missing prompt field"))]
    pub prompt: String,
}

/// Proxy a prompt to the Gemini API and relay the result.
///
/// The upstream body is passed through verbatim on success; the front end
/// parses `candidates[]` itself.
#[tracing::instrument(skip(state, body))]
pub async fn analyze_ingredient(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    let request: AnalyzeRequest = serde_json::from_slice(&body)
        .map_err(|_| AppError::BadRequest(anyhow::anyhow!("Invalid JSON body")))?;
    request.validate()?;

    let model = state.config.gemini.model.as_str();
    let started = std::time::Instant::now();

    match state.text_provider.generate(&request.prompt).await {
        Ok(raw) => {
            metrics::record_upstream_latency(model, started.elapsed().as_secs_f64());
            metrics::record_proxy_request("ok");

            tracing::info!(prompt_len = request.prompt.len(), "Relayed Gemini response");

            Ok((
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                raw,
            )
                .into_response())
        }
        Err(err) => {
            let error_type = match &err {
                ProviderError::NotConfigured(_) => "not_configured",
                ProviderError::Api { .. } => "api",
                ProviderError::Network(_) => "network",
            };
            metrics::record_upstream_error(error_type);
            metrics::record_proxy_request(error_type);

            tracing::error!(error = %err, "Gemini request failed");

            Err(err.into())
        }
    }
}

/// Fallback for non-POST methods on the proxy route.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

#[cfg(test)]
mod tests {
    use crate::config::{Config, GeminiSettings, ServerConfig};
    use crate::services::providers::mock::MockTextProvider;
    use crate::startup::{build_router, AppState};
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use secrecy::Secret;
    use std::sync::Arc;
    use tower::util::ServiceExt;

    fn test_state(provider_enabled: bool) -> AppState {
        AppState {
            config: Config {
                server: ServerConfig {
                    host: "127.0.0.1".to_string(),
                    port: 0,
                },
                gemini: GeminiSettings {
                    api_key: Secret::new("test-key".to_string()),
                    model: "gemini-1.5-flash".to_string(),
                    api_base_url: "http://127.0.0.1:0".to_string(),
                },
                service_name: "genai-proxy-service".to_string(),
            },
            text_provider: Arc::new(MockTextProvider::new(provider_enabled)),
        }
    }

    async fn send(
        state: AppState,
        method: Method,
        body: &str,
    ) -> (StatusCode, serde_json::Value) {
        let router = build_router(state);
        let request = Request::builder()
            .method(method)
            .uri("/analyze-ingredient")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap();

        (status, value)
    }

    #[tokio::test]
    async fn rejects_non_post_methods() {
        let (status, body) = send(test_state(true), Method::GET, "").await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["error"], "Method not allowed");
    }

    #[tokio::test]
    async fn rejects_malformed_json() {
        let (status, body) = send(test_state(true), Method::POST, "{not json").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid JSON body");
    }

    #[tokio::test]
    async fn rejects_missing_prompt() {
        let (status, body) = send(test_state(true), Method::POST, "{}").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("Missing prompt field"));
    }

    #[tokio::test]
    async fn rejects_empty_prompt() {
        let (status, _) = send(test_state(true), Method::POST, r#"{"prompt":""}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unconfigured_provider_maps_to_500() {
        let (status, body) =
            send(test_state(false), Method::POST, r#"{"prompt":"miso"}"#).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("not enabled"));
    }

    #[tokio::test]
    async fn relays_provider_body_as_json() {
        let router = build_router(test_state(true));
        let request = Request::builder()
            .method(Method::POST)
            .uri("/analyze-ingredient")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"prompt":"miso"}"#))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body["candidates"][0]["content"]["parts"][0]["text"],
            "Mock response for: miso"
        );
    }
}
