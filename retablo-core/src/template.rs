use anyhow::{Context as _, Result};
use tera::Tera;

use crate::prompt::Prompt;

/// A `Template` defines a template for a prompt
///
/// Templates are rendered one off with [`tera`]. Autoescaping is always off, prompts are plain
/// text.
#[derive(Clone, Debug)]
pub enum Template {
    String(String),
    Static(&'static str),
}

impl Template {
    pub fn from_string(template: impl Into<String>) -> Template {
        Template::String(template.into())
    }

    /// The template source, unrendered
    pub fn as_str(&self) -> &str {
        match self {
            Template::String(template) => template.as_str(),
            Template::Static(template) => template,
        }
    }

    /// Renders a template with a `tera::Context`
    ///
    /// # Errors
    ///
    /// - The template has syntax errors
    /// - Context is missing that is required by the template
    pub fn render(&self, context: &tera::Context) -> Result<String> {
        Tera::one_off(self.as_str(), context, false).context("Failed to render template")
    }

    /// Builds a Prompt from a template with an empty context
    pub fn to_prompt(&self) -> Prompt {
        self.into()
    }
}

impl From<&'static str> for Template {
    fn from(template: &'static str) -> Self {
        Template::Static(template)
    }
}

impl From<String> for Template {
    fn from(template: String) -> Self {
        Template::String(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tera::Context;

    #[test]
    fn test_render_from_string() {
        let template = Template::from_string("Título: {{ title }}");
        let mut context = Context::new();
        context.insert("title", "Qhapaq Qolla");

        assert_eq!(template.render(&context).unwrap(), "Título: Qhapaq Qolla");
    }

    #[test]
    fn test_does_not_escape_html() {
        let template = Template::from("{{ text }}");
        let mut context = Context::new();
        context.insert("text", "<b>'Mamacha'</b> & \"Carmen\"");

        assert_eq!(
            template.render(&context).unwrap(),
            "<b>'Mamacha'</b> & \"Carmen\""
        );
    }

    #[test]
    fn test_missing_context_errors() {
        let template = Template::from("Título: {{ title }}");

        assert!(template.render(&Context::new()).is_err());
    }
}
