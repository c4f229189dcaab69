use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{Summarizer, SummarizerError};
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::config::AiSettings;

/// Summarizer backed by an OpenAI-compatible chat-completions endpoint.
/// Sends the full composed prompt as a single user message with bearer-token
/// auth and returns the first choice's message content.
pub struct ChatCompletionsClient {
    client: Client,
    endpoint: Option<String>,
    api_token: Option<String>,
    model: String,
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

// Response-side structs default every level so a malformed body degrades to
// an empty summary instead of an error. Preserved behavior, not an accident.
#[derive(Deserialize, Default)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Default)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ResponseMessage>,
}

#[derive(Deserialize, Default)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
}

impl ChatCompletionsClient {
    pub fn new(settings: &AiSettings) -> Self {
        let client = Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            endpoint: settings.endpoint.clone(),
            api_token: settings.api_token.clone(),
            model: settings.model.clone(),
        }
    }

    fn credentials(&self) -> Result<(&str, &str), SummarizerError> {
        let endpoint = self
            .endpoint
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                SummarizerError::MissingCredentials("AI_MODEL_ENDPOINT is not set".to_string())
            })?;
        let token = self
            .api_token
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                SummarizerError::MissingCredentials("AI_API_TOKEN is not set".to_string())
            })?;
        Ok((endpoint, token))
    }
}

#[async_trait]
impl Summarizer for ChatCompletionsClient {
    #[tracing::instrument(skip(self, prompt), fields(prompt_chars = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String, SummarizerError> {
        let (endpoint, token) = self.credentials()?;

        let request_body = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        tracing::info!("Calling summarization endpoint");
        tracing::debug!(prompt = %sanitize_prompt(prompt), "Outgoing prompt");

        let response = self
            .client
            .post(endpoint)
            .header("Authorization", format!("Bearer {}", token))
            .json(&request_body)
            .send()
            .await
            .map_err(|e| SummarizerError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizerError::UpstreamFailure { status, body });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| SummarizerError::InvalidResponse(e.to_string()))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .map(|message| message.content)
            .unwrap_or_default();

        Ok(content)
    }
}
