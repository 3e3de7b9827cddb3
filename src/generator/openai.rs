use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{GenerationError, TextGenerator};
use crate::config::GenerationSettings;

pub struct OpenAiClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiClient {
    pub fn new(
        api_key: String,
        settings: &GenerationSettings,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(api_key, settings, client))
    }

    fn with_client(api_key: String, settings: &GenerationSettings, client: reqwest::Client) -> Self {
        Self {
            client,
            endpoint: settings.endpoint.clone(),
            api_key,
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        }
    }

    fn request<'a>(&'a self, system_prompt: &'a str, user_prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
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
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl ChatResponse {
    fn into_text(self) -> Result<String, GenerationError> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(GenerationError::EmptyResponse)
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, GenerationError> {
        debug!(
            model = %self.model,
            max_tokens = self.max_tokens,
            temperature = self.temperature,
            prompt_chars = user_prompt.len(),
            "Invoking chat completion"
        );

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request(system_prompt, user_prompt))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GenerationError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let body: ChatResponse = resp.json().await?;
        body.into_text()
    }
}
