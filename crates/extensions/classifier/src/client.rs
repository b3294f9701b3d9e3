//! OpenAI-compatible chat completion client.

use std::time::Duration;

use feedpilot_config::ClassifierConfig;
use tracing::{debug, warn};

use crate::api::{ApiMessage, ApiRequest, ApiResponse};
use crate::error::ClassifierError;
use crate::prompt::{SYSTEM_PROMPT, user_message};

/// Sends one post per request to the classification endpoint.
#[derive(Debug, Clone)]
pub struct ChatClient {
    api_url: String,
    model: String,
    temperature: f32,
    client: reqwest::Client,
}

impl ChatClient {
    pub fn new(config: &ClassifierConfig) -> Result<Self, ClassifierError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            api_url: config.api_url.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            client,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn build_request(&self, post_text: &str) -> ApiRequest {
        ApiRequest {
            model: self.model.clone(),
            messages: vec![
                ApiMessage::system(SYSTEM_PROMPT),
                ApiMessage::user(user_message(post_text)),
            ],
            temperature: self.temperature,
        }
    }

    /// Classify `post_text`, returning the model's raw answer.
    pub async fn complete(&self, api_key: &str, post_text: &str) -> Result<String, ClassifierError> {
        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&self.build_request(post_text))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            warn!("Classifier API returned {}", status);
            return Err(ClassifierError::ApiError { status, message });
        }

        let body: ApiResponse = response
            .json()
            .await
            .map_err(|e| ClassifierError::InvalidResponse(e.to_string()))?;
        let content = body.first_content().ok_or_else(|| {
            ClassifierError::InvalidResponse("missing choices[0].message.content".to_string())
        })?;

        debug!("Classifier answered: {}", content);
        Ok(content.to_string())
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
