//! Language-model completion providers and the model router.
//!
//! A [`CompletionRequest`] carries the three prompt statements plus the
//! member's chosen model; a [`CompletionProvider`] turns it into a
//! normalized [`CompletionResponse`]. The [`CompletionRouter`] dispatches
//! exhaustively over [`LanguageModel`], so a model with no wired provider
//! fails loudly instead of being silently ignored.

pub mod openai;

use async_trait::async_trait;

use crate::domain::{LanguageModel, TokenUsage};
use crate::error::BackendError;

pub use openai::OpenAiProvider;

/// Everything a provider needs to build its prompt for one member.
///
/// The statements are pre-built by [`crate::prompt`]; providers only
/// assemble them into their own message format.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// The member's chosen model.
    pub model: LanguageModel,

    /// Organization description statement (may be empty).
    pub about_statement: String,

    /// Proposal title and body statement.
    pub proposal_statement: String,

    /// Statement describing the member (name and bio).
    pub personal_statement: String,
}

/// Normalized completion result, independent of provider wire formats.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Model name as reported by the provider.
    pub model: String,

    /// Provider-reported creation timestamp (Unix seconds).
    pub created: i64,

    /// The generated recommendation text.
    pub completion: String,

    /// Token accounting for this request.
    pub usage: TokenUsage,
}

/// A language-model backend capable of serving completion requests.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Short provider identifier used in logs.
    fn name(&self) -> &'static str;

    /// Generates a completion for the given request.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Completion`] if the provider cannot be
    /// reached or returns an undecodable or empty response.
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, BackendError>;
}

/// Routes a completion request to the provider wired for its model.
///
/// The `match` below is exhaustive over [`LanguageModel`], so adding a
/// model variant without deciding its routing is a compile error.
#[derive(Debug)]
pub struct CompletionRouter {
    openai: OpenAiProvider,
}

impl CompletionRouter {
    /// Creates a router over the wired providers.
    #[must_use]
    pub fn new(openai: OpenAiProvider) -> Self {
        Self { openai }
    }

    /// Dispatches the request to the provider for `request.model`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::ProviderUnimplemented`] for models with no
    /// wired provider, or whatever the chosen provider fails with.
    pub async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, BackendError> {
        match request.model {
            LanguageModel::Gpt4 => self.openai.complete(request).await,
            LanguageModel::Llama2 => Err(BackendError::ProviderUnimplemented("llama2")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn request_for(model: LanguageModel) -> CompletionRequest {
        CompletionRequest {
            model,
            about_statement: String::new(),
            proposal_statement: "Title\n\nBody".to_string(),
            personal_statement: "Here is their bio: test".to_string(),
        }
    }

    #[tokio::test]
    async fn router_rejects_unwired_model() {
        let router = CompletionRouter::new(OpenAiProvider::new(
            reqwest::Client::new(),
            "http://localhost:9".to_string(),
            "test-key".to_string(),
        ));
        let result = router.complete(&request_for(LanguageModel::Llama2)).await;
        assert!(matches!(
            result,
            Err(BackendError::ProviderUnimplemented("llama2"))
        ));
    }
}
