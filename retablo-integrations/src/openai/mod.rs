//! This module provides integration with `OpenAI`'s chat completions API. It includes the
//! `OpenAI` struct for managing the API client and the default options used for every prompt.

use async_openai::error::OpenAIError;
use derive_builder::Builder;
use retablo_core::errors::RequestError;
use std::sync::Arc;

mod simple_prompt;

// expose type aliases to simplify downstream use of the open ai builder invocations
pub use async_openai::config::OpenAIConfig;

/// The `OpenAI` struct encapsulates an `OpenAI` client and default options for prompting.
///
/// # Example
///
/// ```no_run
/// # use retablo_integrations::openai::OpenAI;
///
/// // Create an OpenAI client with default options. The client will use the OPENAI_API_KEY environment variable.
/// let openai = OpenAI::builder()
///     .default_prompt_model("gpt-4-turbo")
///     .max_completion_tokens(300)
///     .temperature(0.2)
///     .build().unwrap();
///
/// // Create an OpenAI client with a custom api key.
/// let openai = OpenAI::builder()
///     .default_prompt_model("gpt-4-turbo")
///     .client(async_openai::Client::with_config(async_openai::config::OpenAIConfig::default().with_api_key("my-api-key")))
///     .build().unwrap();
///
/// // Create an OpenAI client that does not retry rate limited requests.
/// let openai = OpenAI::builder()
///     .default_prompt_model("gpt-4-turbo")
///     .client(retablo_integrations::openai::client_without_retries(
///         async_openai::config::OpenAIConfig::default(),
///     ))
///     .build().unwrap();
/// ```
pub type OpenAI = GenericOpenAI<OpenAIConfig>;
pub type OpenAIBuilder = GenericOpenAIBuilder<OpenAIConfig>;

#[derive(Debug, Builder, Clone)]
#[builder(setter(into, strip_option))]
/// Generic client for `OpenAI` compatible APIs.
pub struct GenericOpenAI<
    C: async_openai::config::Config + Default = async_openai::config::OpenAIConfig,
> {
    /// The `OpenAI` client, wrapped in an `Arc` for thread-safe reference counting.
    /// Defaults to a new instance of `async_openai::Client`.
    #[builder(
        default = "Arc::new(async_openai::Client::<C>::default())",
        setter(custom)
    )]
    client: Arc<async_openai::Client<C>>,

    /// Default options for prompts.
    #[builder(default)]
    pub(crate) default_options: Options,
}

/// The `Options` struct holds configuration options for the `OpenAI` client.
///
/// Anything left unset is left to the API's defaults.
#[derive(Debug, Clone, Default, Builder)]
#[builder(setter(into, strip_option))]
pub struct Options {
    /// The default prompt model to use, if specified.
    #[builder(default)]
    pub prompt_model: Option<String>,

    /// Upper bound on the length of a completion, in tokens.
    ///
    /// Sent as `max_completion_tokens`, which replaced `max_tokens` in the `OpenAI` api. Compatible
    /// backends that predate it may ignore the limit.
    #[builder(default)]
    pub max_completion_tokens: Option<u32>,

    /// Sampling temperature; lower is more deterministic.
    #[builder(default)]
    pub temperature: Option<f32>,
}

impl Options {
    /// Creates a new `OptionsBuilder` for constructing `Options` instances.
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::default()
    }
}

impl OpenAI {
    /// Creates a new `OpenAIBuilder` for constructing `OpenAI` instances.
    pub fn builder() -> OpenAIBuilder {
        OpenAIBuilder::default()
    }
}

impl<C: async_openai::config::Config + Default> GenericOpenAI<C> {
    pub fn options(&self) -> &Options {
        &self.default_options
    }
}

impl<C: async_openai::config::Config + Default + Sync + Send + std::fmt::Debug>
    GenericOpenAIBuilder<C>
{
    /// Sets the `OpenAI` client for the `OpenAI` instance.
    pub fn client(&mut self, client: async_openai::Client<C>) -> &mut Self {
        self.client = Some(Arc::new(client));
        self
    }

    /// Sets the default prompt model for the `OpenAI` instance.
    pub fn default_prompt_model(&mut self, model: impl Into<String>) -> &mut Self {
        self.options_mut().prompt_model = Some(model.into());
        self
    }

    /// Bounds the length of every completion.
    pub fn max_completion_tokens(&mut self, max_completion_tokens: u32) -> &mut Self {
        self.options_mut().max_completion_tokens = Some(max_completion_tokens);
        self
    }

    /// Sets the sampling temperature for every completion.
    pub fn temperature(&mut self, temperature: f32) -> &mut Self {
        self.options_mut().temperature = Some(temperature);
        self
    }

    fn options_mut(&mut self) -> &mut Options {
        self.default_options.get_or_insert_with(Options::default)
    }
}

/// Builds an `async_openai` client that gives up on the first failure
///
/// By default `async_openai` retries rate limited requests with an exponential backoff.
pub fn client_without_retries<C: async_openai::config::Config>(
    config: C,
) -> async_openai::Client<C> {
    let backoff = backoff::ExponentialBackoff {
        max_elapsed_time: Some(std::time::Duration::ZERO),
        ..Default::default()
    };

    async_openai::Client::with_config(config).with_backoff(backoff)
}

/// Collapses any `OpenAI` failure into a [`RequestError`]
///
/// The kind of failure is only reflected in the logs.
pub fn openai_error_to_request_error(e: OpenAIError) -> RequestError {
    match &e {
        OpenAIError::ApiError(api_error) => {
            tracing::warn!(?api_error, "OpenAI API Error");
        }
        OpenAIError::Reqwest(error) => match error.status() {
            Some(status) if status.as_u16() == 429 => {
                tracing::warn!(%status, "OpenAI rate limited or out of quota: {error}");
            }
            Some(status) if status.is_client_error() => {
                tracing::warn!(%status, "OpenAI API Client Error: {error}");
            }
            Some(status) => {
                tracing::warn!(%status, "OpenAI API Server Error: {error}");
            }
            None => {
                tracing::warn!("Unexpected OpenAI Reqwest Error: {error}");
            }
        },
        OpenAIError::JSONDeserialize(error) => {
            tracing::warn!("OpenAI response could not be deserialized: {error}");
        }
        other => {
            tracing::warn!("OpenAI request failed: {other}");
        }
    }

    RequestError::new(e)
}
