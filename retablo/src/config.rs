//! Command line and environment configuration
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::Parser;
use secrecy::{ExposeSecret as _, SecretString};

use retablo_integrations::{
    csv::CsvStore,
    openai::{OpenAI, OpenAIConfig, client_without_retries},
};

use crate::describer::{DEFAULT_DIRECTIVE, Describer};

pub const DEFAULT_HISTORY_FILE: &str = "imagenes/nuevas_descripciones.csv";
pub const DEFAULT_MODEL: &str = "gpt-4-turbo";
pub const MAX_COMPLETION_TOKENS: u32 = 300;
pub const TEMPERATURE: f32 = 0.2;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Where generated descriptions are saved and read back as examples
    #[arg(long, env = "RETABLO_HISTORY_FILE", default_value = DEFAULT_HISTORY_FILE)]
    pub history_file: PathBuf,

    #[arg(long, env = "RETABLO_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Replaces the built-in directive with the contents of this file
    #[arg(long, env = "RETABLO_DIRECTIVE_FILE")]
    pub directive_file: Option<PathBuf>,

    /// Base url of an `OpenAI` compatible api
    ///
    /// The length limit is sent as `max_completion_tokens`; backends that only know `max_tokens`
    /// may ignore it.
    #[arg(long, env = "OPENAI_API_BASE")]
    pub api_base: Option<String>,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,
}

impl Args {
    /// Resolves the arguments into a validated [`Config`]
    ///
    /// # Errors
    ///
    /// Errors if the api key is missing, the directive file cannot be read, or the result does
    /// not validate
    pub fn into_config(self) -> Result<Config> {
        let api_key = self
            .openai_api_key
            .filter(|key| !key.trim().is_empty())
            .context("OPENAI_API_KEY is not set")?;

        let directive = match &self.directive_file {
            Some(path) => fs_err::read_to_string(path)?.trim().to_string(),
            None => DEFAULT_DIRECTIVE.to_string(),
        };

        let config = Config {
            history_file: self.history_file,
            model: self.model,
            directive,
            api_base: self.api_base,
            api_key: SecretString::from(api_key),
        };
        config.validate()?;

        Ok(config)
    }
}

#[derive(Debug)]
pub struct Config {
    history_file: PathBuf,
    model: String,
    directive: String,
    api_base: Option<String>,
    api_key: SecretString,
}

impl Config {
    /// # Errors
    ///
    /// Errors on an empty model or directive, or a history path that is a directory
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(!self.model.trim().is_empty(), "Model must not be empty");
        anyhow::ensure!(
            !self.directive.is_empty(),
            "Directive must not be empty"
        );
        anyhow::ensure!(
            !self.history_file.is_dir(),
            "History file {} is a directory",
            self.history_file.display()
        );

        Ok(())
    }

    pub fn history_file(&self) -> &Path {
        &self.history_file
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn directive(&self) -> &str {
        &self.directive
    }

    pub fn record_store(&self) -> CsvStore {
        CsvStore::new(&self.history_file)
    }

    /// An `OpenAI` client that sends every prompt with the configured model and does not retry
    ///
    /// # Errors
    ///
    /// Errors if the client cannot be built
    pub fn openai(&self) -> Result<OpenAI> {
        let mut openai_config = OpenAIConfig::new().with_api_key(self.api_key.expose_secret());
        if let Some(api_base) = &self.api_base {
            openai_config = openai_config.with_api_base(api_base);
        }

        OpenAI::builder()
            .client(client_without_retries(openai_config))
            .default_prompt_model(&self.model)
            .max_completion_tokens(MAX_COMPLETION_TOKENS)
            .temperature(TEMPERATURE)
            .build()
            .context("Failed to build OpenAI client")
    }

    /// # Errors
    ///
    /// Errors if the `OpenAI` client or the describer cannot be built
    pub fn describer(&self) -> Result<Describer> {
        Describer::builder()
            .client(self.openai()?)
            .directive(self.directive.as_str())
            .build()
            .context("Failed to build describer")
    }
}
