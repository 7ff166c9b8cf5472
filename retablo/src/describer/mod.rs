//! Composes the description prompt and asks a language model for the description
//!
//! A prompt is the directive, followed by every usable example from the history, followed by the
//! title of the image to describe. Nothing is truncated; the prompt grows with the history.
use std::sync::Arc;

use anyhow::Result;
use derive_builder::Builder;
use retablo_core::{
    Record, SimplePrompt, errors::RequestError, prompt::Prompt, template::Template,
};

/// Directive sent as the system message and at the top of every prompt
pub const DEFAULT_DIRECTIVE: &str = "Eres un sistema especializado en generar descripciones breves y precisas para escenas culturales y eventos andinos, especialmente de la festividad de la Mamacha Carmen en Paucartambo. Describe de manera clara y objetiva la escena principal, destacando solo los elementos visibles y relevantes sin adornos adicionales. Mantente directo y conciso.";

/// Rendered in place of the examples when the history has no descriptions at all
pub const NO_EXAMPLES: &str = "No hay descripciones generadas previas.";

const EXAMPLES_HEADER: &str = "Ejemplos de descripciones previas:\n\n";

/// Renders every record with both a title and a description as an example block
///
/// A history without a description column renders [`NO_EXAMPLES`] instead. An empty history
/// renders the header only.
pub fn combined_examples(records: &[Record], has_descriptions: bool) -> String {
    if !has_descriptions {
        return NO_EXAMPLES.to_string();
    }

    records
        .iter()
        .filter(|record| record.is_example())
        .fold(EXAMPLES_HEADER.to_string(), |mut combined, record| {
            combined.push_str(&example_block(record));
            combined
        })
}

fn example_block(record: &Record) -> String {
    format!(
        "Título: {}\nDescripción: {}\n\n",
        record.title, record.description
    )
}

/// Composes a prompt with the default template
///
/// # Errors
///
/// Errors if the template fails to render
pub fn compose(directive: &str, examples: &str, title: &str) -> Result<String> {
    build_prompt(&default_prompt(), directive, examples, title).render()
}

fn default_prompt() -> Template {
    include_str!("prompts/describe_image.prompt.md").into()
}

fn build_prompt(template: &Template, directive: &str, examples: &str, title: &str) -> Prompt {
    template
        .to_prompt()
        .with_context_value("directive", directive)
        .with_context_value("examples", examples)
        .with_context_value("title", title)
        .with_system(directive)
}

/// Generates descriptions for titles using a [`SimplePrompt`] client
#[derive(Clone, Builder)]
#[builder(setter(into))]
pub struct Describer {
    #[builder(setter(custom))]
    client: Arc<dyn SimplePrompt>,

    #[builder(default = "DEFAULT_DIRECTIVE.to_string()")]
    directive: String,

    #[builder(default = "default_prompt()")]
    prompt_template: Template,
}

impl std::fmt::Debug for Describer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Describer")
            .field("directive", &self.directive)
            .field("prompt_template", &self.prompt_template)
            .finish_non_exhaustive()
    }
}

impl Describer {
    pub fn builder() -> DescriberBuilder {
        DescriberBuilder::default()
    }

    /// Creates a `Describer` with the default directive and template
    pub fn new(client: impl SimplePrompt + 'static) -> Self {
        Self {
            client: Arc::new(client),
            directive: DEFAULT_DIRECTIVE.to_string(),
            prompt_template: default_prompt(),
        }
    }

    pub fn directive(&self) -> &str {
        &self.directive
    }

    /// The prompt that [`Describer::describe`] would send
    pub fn prompt(&self, examples: &str, title: &str) -> Prompt {
        build_prompt(&self.prompt_template, &self.directive, examples, title)
    }

    /// Composes the prompt for `title` and returns the model's description
    ///
    /// # Errors
    ///
    /// Any failure of the client, including rendering the prompt, is a [`RequestError`]
    #[tracing::instrument(skip_all, fields(title = title), err)]
    pub async fn describe(&self, examples: &str, title: &str) -> Result<String, RequestError> {
        let prompt = self.prompt(examples, title);

        self.client.prompt(prompt).await
    }
}

impl DescriberBuilder {
    pub fn client(&mut self, client: impl SimplePrompt + 'static) -> &mut Self {
        self.client = Some(Arc::new(client));
        self
    }
}
