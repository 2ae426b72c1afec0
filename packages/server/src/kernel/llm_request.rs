// Chat completion adapter for the BaseAI trait
//
// One adapter per use: the interpreter and the summariser run different
// models with different sampling settings against the same client.

use std::sync::Arc;

use async_trait::async_trait;
use openai_client::{ChatRequest, Message, OpenAIClient};

use super::BaseAI;

/// Per-adapter request settings.
#[derive(Debug, Clone)]
pub struct CompletionOptions {
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl CompletionOptions {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    fn request(&self, system: &str, user: &str) -> ChatRequest {
        let mut request = ChatRequest::new(self.model.clone())
            .message(Message::system(system))
            .message(Message::user(user));
        if let Some(t) = self.temperature {
            request = request.temperature(t);
        }
        if let Some(m) = self.max_tokens {
            request = request.max_tokens(m);
        }
        request
    }
}

/// BaseAI backed by a chat completion endpoint.
#[derive(Debug, Clone)]
pub struct OpenAICompleter {
    client: Arc<OpenAIClient>,
    options: CompletionOptions,
}

impl OpenAICompleter {
    pub fn new(client: Arc<OpenAIClient>, options: CompletionOptions) -> Self {
        Self { client, options }
    }

    pub fn model(&self) -> &str {
        &self.options.model
    }
}

#[async_trait]
impl BaseAI for OpenAICompleter {
    async fn complete(&self, system: &str, user: &str) -> openai_client::Result<String> {
        let response = self
            .client
            .chat_completion(self.options.request(system, user))
            .await?;

        if let Some(usage) = &response.usage {
            tracing::debug!(
                model = %self.options.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Completion usage"
            );
        }

        Ok(response.content)
    }
}
