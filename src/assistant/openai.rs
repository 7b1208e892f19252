//! Chat completions client

use super::{ChatBackend, ChatMessage};
use crate::config::ServiceConfig;
use crate::error::{Result, ToolsError};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct OpenAiBackend {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    temperature: f64,
    api_key: String,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f64,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: Option<u64>,
    completion_tokens: Option<u64>,
    total_tokens: Option<u64>,
}

impl OpenAiBackend {
    pub fn new(client: reqwest::Client, config: &ServiceConfig, api_key: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: config.chat_endpoint.clone(),
            model: config.chat_model.clone(),
            temperature: config.chat_temperature,
            api_key: api_key.into(),
        }
    }

    /// Build with the key from `OPENAI_API_KEY`
    pub fn from_env(client: reqwest::Client, config: &ServiceConfig) -> Result<Self> {
        let key = ServiceConfig::api_key().ok_or(ToolsError::MissingApiKey)?;
        Ok(Self::new(client, config, key))
    }
}

fn status_error(status: StatusCode, body: &str) -> ToolsError {
    match status {
        StatusCode::UNAUTHORIZED => {
            ToolsError::Upstream("OpenAI API authentication failed. Please check your API key.".to_string())
        }
        StatusCode::TOO_MANY_REQUESTS => {
            ToolsError::Upstream("OpenAI API rate limit exceeded. Please try again later.".to_string())
        }
        other => ToolsError::Upstream(format!("OpenAI API returned {}: {}", other, body.trim())),
    }
}

#[async_trait]
impl ChatBackend for OpenAiBackend {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        log::debug!("Calling {} with {} messages", self.model, messages.len());

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&CompletionRequest {
                model: &self.model,
                messages,
                temperature: self.temperature,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let completion: CompletionResponse = response.json().await?;
        if let Some(usage) = &completion.usage {
            log::debug!(
                "Token usage: prompt={:?} completion={:?} total={:?}",
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens
            );
        }

        let reply = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();
        if reply.is_empty() {
            log::warn!("Empty reply received from {}", self.model);
        }
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_error(StatusCode::UNAUTHORIZED, "").to_string(),
            "Upstream error: OpenAI API authentication failed. Please check your API key."
        );
        assert!(status_error(StatusCode::TOO_MANY_REQUESTS, "")
            .to_string()
            .contains("rate limit exceeded"));
        assert!(status_error(StatusCode::BAD_GATEWAY, " oops ").to_string().ends_with(": oops"));
    }

    #[test]
    fn test_request_shape() {
        let messages = [ChatMessage::system("s"), ChatMessage::user("u")];
        let body = serde_json::to_value(CompletionRequest {
            model: "gpt-4o-mini",
            messages: &messages,
            temperature: 0.7,
        })
        .unwrap();
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "u");
    }

    #[test]
    fn test_response_parsing() {
        let parsed: CompletionResponse = serde_json::from_str(
            r#"{ "choices": [ { "message": { "role": "assistant", "content": "Hi" } } ],
                 "usage": { "prompt_tokens": 3, "completion_tokens": 1, "total_tokens": 4 } }"#,
        )
        .unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("Hi"));
        assert_eq!(parsed.usage.unwrap().total_tokens, Some(4));
    }
}
