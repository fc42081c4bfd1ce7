//! OpenAI-compatible chat completions client.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{GenerationPrompt, TextGenerator};
use crate::provider::{GenerationVariant, Probe, ProviderConfig, ProviderError, ProviderFuture};

/// Default API base URL.
pub const DEFAULT_OPENAI_BASE: &str = "https://api.openai.com";

/// Model used for probing when the configuration names none.
const DEFAULT_PROBE_MODEL: &str = "gpt-4o-mini";

/// Tokens requested by the probe call.
const PROBE_MAX_TOKENS: u32 = 5;

/// Sampling temperature for generation.
const TEMPERATURE: f32 = 0.7;

/// API key for the text service.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextCredentials {
    /// Secret API key.
    pub api_key: String,
}

/// Chat completions request message.
#[derive(Serialize, Debug)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

/// Chat completions request body.
#[derive(Serialize, Debug)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    max_tokens: u32,
    temperature: f32,
    stream: bool,
}

/// Chat completions response choice.
#[derive(Deserialize, Debug)]
struct Choice {
    message: ResponseMessage,
}

/// Chat completions response message.
#[derive(Deserialize, Debug)]
struct ResponseMessage {
    content: Option<String>,
}

/// Chat completions response.
#[derive(Deserialize, Debug)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    model: Option<String>,
}

/// Text generation client for OpenAI-compatible endpoints.
pub struct OpenAiTextClient {
    /// HTTP client for API requests.
    client: Client,
    /// API key for authentication.
    api_key: String,
    /// Base URL for the API.
    base_url: String,
    /// Model used by the probe.
    probe_model: String,
}

impl OpenAiTextClient {
    /// Builds a client for one bring-up configuration.
    pub fn connect(
        credentials: TextCredentials,
        base_url: impl Into<String>,
        config: &ProviderConfig,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ProviderError::Construction(e.to_string()))?;

        Ok(Self {
            client,
            api_key: credentials.api_key,
            base_url: base_url.into(),
            probe_model: config
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_PROBE_MODEL.to_string()),
        })
    }

    /// Builds the full API URL.
    fn api_url(&self) -> String {
        let url = format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'));
        debug!(base_url = %self.base_url, full_url = %url, "Constructed chat completions URL");
        url
    }

    /// Sends exactly one completion request.
    async fn complete(
        &self,
        model: &str,
        prompt: &GenerationPrompt,
        max_tokens: u32,
    ) -> Result<String, ProviderError> {
        let mut messages = Vec::with_capacity(2);
        if !prompt.system.is_empty() {
            messages.push(Message {
                role: "system",
                content: &prompt.system,
            });
        }
        messages.push(Message {
            role: "user",
            content: &prompt.user,
        });

        let request = CompletionRequest {
            model,
            messages,
            max_tokens,
            temperature: TEMPERATURE,
            stream: false,
        };

        let api_url = self.api_url();
        info!(url = %api_url, model = %model, max_tokens, "Sending chat completions request");

        let response = self
            .client
            .post(&api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_status(status.as_u16(), &error_text));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        debug!(
            choice_count = completion.choices.len(),
            model = ?completion.model,
            "Received chat completions response"
        );

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| ProviderError::MalformedResponse("no content in response".to_string()))
    }
}

impl Probe for OpenAiTextClient {
    fn probe(&self) -> ProviderFuture<'_, ()> {
        Box::pin(async move {
            let prompt = GenerationPrompt {
                system: String::new(),
                user: "test".to_string(),
            };
            self.complete(&self.probe_model, &prompt, PROBE_MAX_TOKENS)
                .await
                .map(|_| ())
        })
    }
}

impl TextGenerator for OpenAiTextClient {
    fn generate<'a>(
        &'a self,
        prompt: &'a GenerationPrompt,
        variant: &'a GenerationVariant,
    ) -> ProviderFuture<'a, String> {
        Box::pin(self.complete(&variant.model, prompt, variant.max_tokens))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn client(base_url: &str, model: Option<&str>) -> OpenAiTextClient {
        let mut config = ProviderConfig::new("test", 5, 0);
        config.model = model.map(str::to_string);
        OpenAiTextClient::connect(
            TextCredentials {
                api_key: "sk-test".to_string(),
            },
            base_url,
            &config,
        )
        .unwrap()
    }

    #[test]
    fn api_url_strips_trailing_slash() {
        assert_eq!(
            client("http://localhost:8080/", None).api_url(),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn probe_model_defaults() {
        assert_eq!(client(DEFAULT_OPENAI_BASE, None).probe_model, DEFAULT_PROBE_MODEL);
        assert_eq!(
            client(DEFAULT_OPENAI_BASE, Some("gpt-4o")).probe_model,
            "gpt-4o"
        );
    }

    #[test]
    fn request_omits_empty_system_prompt() {
        let request = CompletionRequest {
            model: "m",
            messages: vec![Message {
                role: "user",
                content: "hi",
            }],
            max_tokens: 5,
            temperature: TEMPERATURE,
            stream: false,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"].as_array().unwrap().len(), 1);
        assert_eq!(json["max_tokens"], 5);
    }
}
