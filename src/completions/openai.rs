//! OpenAI chat-completions provider.
//!
//! Sends `{model, messages}` to `{base_url}/chat/completions` with a
//! bearer key. The system message is rendered from the shipped prompt
//! template; the user message is the member's personal statement.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::TokenUsage;
use crate::error::BackendError;

use super::{CompletionProvider, CompletionRequest, CompletionResponse};

const SYSTEM_PROMPT_TEMPLATE: &str =
    include_str!("../text_templates/prompts/openai_system_prompt.txt");

/// Provider for OpenAI's chat-completions API (or any compatible endpoint).
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    model: String,
    created: i64,
    choices: Vec<ChatChoice>,
    usage: ChatUsage,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

impl OpenAiProvider {
    /// Creates a provider for the endpoint at `base_url`.
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: String, api_key: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }

    /// Renders the system message from the shipped template.
    fn system_message(request: &CompletionRequest) -> Result<String, BackendError> {
        let env = minijinja::Environment::new();
        env.render_str(
            SYSTEM_PROMPT_TEMPLATE,
            minijinja::context! {
                about_statement => request.about_statement,
                proposal_statement => request.proposal_statement,
            },
        )
        .map_err(|e| BackendError::Completion(format!("prompt template render failed: {e}")))
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, BackendError> {
        let body = ChatCompletionRequest {
            model: request.model.as_str().to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: Self::system_message(request)?,
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: request.personal_statement.clone(),
                },
            ],
        };

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        debug!(model = request.model.as_str(), %url, "requesting completion");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::Completion(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(BackendError::Completion(format!(
                "provider returned HTTP {status}: {text}"
            )));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Completion(format!("undecodable response: {e}")))?;

        let completion = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| BackendError::Completion("response carried no choices".to_string()))?;

        Ok(CompletionResponse {
            model: parsed.model,
            created: parsed.created,
            completion,
            usage: TokenUsage {
                prompt_tokens: parsed.usage.prompt_tokens,
                completion_tokens: parsed.usage.completion_tokens,
                total_tokens: parsed.usage.total_tokens,
            },
        })
    }
}
