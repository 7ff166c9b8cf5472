//! This module provides an implementation of the `SimplePrompt` trait for the `OpenAI` struct.
//! A prompt becomes a single chat completion request: an optional system message followed by the
//! rendered prompt as the user message.

use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use retablo_core::{SimplePrompt, errors::RequestError, prompt::Prompt, util::debug_long_utf8};

use super::{GenericOpenAI, openai_error_to_request_error};

#[async_trait]
impl<
    C: async_openai::config::Config
        + std::default::Default
        + Sync
        + Send
        + std::fmt::Debug
        + Clone
        + 'static,
> SimplePrompt for GenericOpenAI<C>
{
    /// Sends a prompt to the `OpenAI` API and returns the trimmed response content.
    ///
    /// # Errors
    /// - The model is not set in the default options.
    /// - The prompt fails to render.
    /// - The request to the `OpenAI` API fails.
    /// - The response does not contain any content.
    #[tracing::instrument(skip_all, err)]
    async fn prompt(&self, prompt: Prompt) -> Result<String, RequestError> {
        let model = self
            .default_options
            .prompt_model
            .as_ref()
            .ok_or_else(|| RequestError::msg("Model not set"))?;

        let mut messages: Vec<ChatCompletionRequestMessage> = Vec::with_capacity(2);

        if let Some(system) = prompt.system() {
            messages.push(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system)
                    .build()
                    .map_err(RequestError::new)?
                    .into(),
            );
        }

        messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt.render()?)
                .build()
                .map_err(RequestError::new)?
                .into(),
        );

        let mut request = CreateChatCompletionRequestArgs::default();
        request.model(model).messages(messages);

        if let Some(max_completion_tokens) = self.default_options.max_completion_tokens {
            request.max_completion_tokens(max_completion_tokens);
        }

        if let Some(temperature) = self.default_options.temperature {
            request.temperature(temperature);
        }

        let request = request.build().map_err(RequestError::new)?;

        tracing::trace!(
            model = &model,
            messages = debug_long_utf8(
                serde_json::to_string_pretty(&request.messages.last())
                    .map_err(RequestError::new)?,
                100
            ),
            "[SimplePrompt] Request to openai"
        );

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(openai_error_to_request_error)?;

        tracing::debug!(
            usage = ?response.usage,
            "[SimplePrompt] Response from openai"
        );

        let message = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .ok_or_else(|| RequestError::msg("Expected content in response"))?;

        Ok(message.trim().to_string())
    }
}
