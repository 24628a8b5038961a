//! OpenAI-compatible chat completion adapter

use crate::config::FileOpenAiConfig;
use agora_application::{GatewayError, GenerationConfig, LanguageModel};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat completions over HTTP
#[derive(Debug, Clone)]
pub struct OpenAiLanguageModel {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiLanguageModel {
    pub fn new(client: reqwest::Client, api_key: impl Into<String>, base_url: &str) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build from the `[providers.openai]` section
    pub fn from_config(config: &FileOpenAiConfig) -> Result<Self, GatewayError> {
        let api_key = config.resolve_api_key().ok_or_else(|| {
            GatewayError::Unauthorized(format!(
                "no API key: set {} or providers.openai.api_key",
                config.api_key_env
            ))
        })?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| GatewayError::Other(e.to_string()))?;
        Ok(Self::new(client, api_key, &config.base_url))
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }
}

fn request_body<'a>(
    system_prompt: &'a str,
    user_prompt: &'a str,
    config: &'a GenerationConfig,
) -> ChatRequest<'a> {
    ChatRequest {
        model: &config.model,
        messages: vec![
            ChatMessage {
                role: "system",
                content: system_prompt,
            },
            ChatMessage {
                role: "user",
                content: user_prompt,
            },
        ],
        temperature: config.temperature,
        max_tokens: config.max_tokens,
    }
}

fn status_error(status: StatusCode, body: String, model: &str) -> GatewayError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GatewayError::Unauthorized(body),
        StatusCode::NOT_FOUND => GatewayError::ModelNotAvailable(model.to_string()),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => GatewayError::Timeout,
        _ => GatewayError::RequestFailed(format!("Status: {}, Body: {}", status, body)),
    }
}

fn first_content(response: ChatResponse) -> Result<String, GatewayError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| GatewayError::RequestFailed("response has no content".to_string()))
}

#[async_trait]
impl LanguageModel for OpenAiLanguageModel {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        config: &GenerationConfig,
    ) -> Result<String, GatewayError> {
        debug!(model = %config.model, "Sending chat completion");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request_body(system_prompt, user_prompt, config))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout
                } else {
                    GatewayError::ConnectionError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, body, &config.model));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::RequestFailed(format!("invalid response: {}", e)))?;
        first_content(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let config = GenerationConfig::default();
        let body = serde_json::to_value(request_body("sys", "usr", &config)).unwrap();
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "usr");
        assert_eq!(body["max_tokens"], 600);
    }

    #[test]
    fn test_first_content() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"role": "assistant", "content": "Duty first."}}]}"#,
        )
        .unwrap();
        assert_eq!(first_content(response).unwrap(), "Duty first.");

        let empty: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(first_content(empty).is_err());
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, String::new(), "m"),
            GatewayError::Unauthorized(_)
        ));
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, String::new(), "m"),
            GatewayError::ModelNotAvailable(_)
        ));
        assert!(matches!(
            status_error(StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string(), "m"),
            GatewayError::RequestFailed(_)
        ));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let model = OpenAiLanguageModel::new(reqwest::Client::new(), "k", "http://localhost:8080/");
        assert_eq!(model.endpoint(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_missing_key_is_unauthorized() {
        let config = FileOpenAiConfig {
            api_key: None,
            api_key_env: "AGORA_TEST_UNSET_KEY".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            OpenAiLanguageModel::from_config(&config),
            Err(GatewayError::Unauthorized(_))
        ));
    }
}
