//! Mock provider implementation for handler tests.

use super::{ProviderError, TextProvider};
use async_trait::async_trait;

/// Mock text provider. Returns a canned upstream-shaped body so tests can
/// verify the pass-through path without a network.
pub struct MockTextProvider {
    enabled: bool,
}

impl MockTextProvider {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        if !self.enabled {
            return Err(ProviderError::NotConfigured(
                "Mock text provider not enabled".to_string(),
            ));
        }

        Ok(format!(
            r#"{{"candidates":[{{"content":{{"parts":[{{"text":"Mock response for: {}"}}]}}}}]}}"#,
            prompt
        ))
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.enabled {
            Ok(())
        } else {
            Err(ProviderError::NotConfigured(
                "Mock text provider not enabled".to_string(),
            ))
        }
    }
}
