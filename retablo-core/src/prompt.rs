//! Prompts templating
//!
//! Prompts use [tera] under the hood. A [Prompt] is what you send to a
//! [`SimplePrompt`][crate::SimplePrompt]: a [`Template`] plus the context it is rendered with,
//! and optionally a system message that is sent along with it.
//!
//! # Example
//!
//! ```
//! # use retablo_core::template::Template;
//! let template = Template::from("Título: {{title}}");
//! let prompt = template.to_prompt().with_context_value("title", "Saqras");
//!
//! assert_eq!(prompt.render().unwrap(), "Título: Saqras");
//! ```
use anyhow::Result;

use crate::template::Template;

/// A Prompt can be used with large language models to prompt.
#[derive(Clone, Debug)]
pub struct Prompt {
    template: Template,
    context: Option<tera::Context>,
    system: Option<String>,
}

impl Prompt {
    /// Adds a key-value pair to the context of the Prompt
    #[must_use]
    pub fn with_context_value(mut self, key: &str, value: impl Into<tera::Value>) -> Self {
        let context = self.context.get_or_insert_with(tera::Context::default);
        context.insert(key, &value.into());
        self
    }

    /// Sets the system message that accompanies the prompt. It is sent verbatim, not rendered.
    #[must_use]
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn system(&self) -> Option<&str> {
        self.system.as_deref()
    }

    /// Renders a prompt
    ///
    /// If no context is provided, the prompt will be rendered as is.
    ///
    /// # Errors
    ///
    /// See `Template::render`
    pub fn render(&self) -> Result<String> {
        match &self.context {
            Some(context) => self.template.render(context),
            None => Ok(self.template.as_str().to_string()),
        }
    }
}

impl From<&'static str> for Prompt {
    fn from(prompt: &'static str) -> Self {
        Prompt {
            template: Template::from(prompt),
            context: None,
            system: None,
        }
    }
}

impl From<String> for Prompt {
    fn from(prompt: String) -> Self {
        Prompt {
            template: Template::from(prompt),
            context: None,
            system: None,
        }
    }
}

impl From<&Template> for Prompt {
    fn from(template: &Template) -> Self {
        Prompt {
            template: template.clone(),
            context: None,
            system: None,
        }
    }
}
