//! Follow-up questions offered after a description was generated
//!
//! Questions are fixed templates and their answers are placeholders; nothing here talks to the
//! model.
use retablo_core::util::safe_truncate_utf8;

/// How much of the description is quoted in the first question
pub const EXCERPT_CHARS: usize = 50;

/// Three follow-up questions about `description`, in display order
pub fn follow_up_questions(description: &str) -> Vec<String> {
    vec![
        format!(
            "¿Qué elementos destacan en '{}...'?",
            safe_truncate_utf8(description, EXCERPT_CHARS)
        ),
        "¿Cuál es el contexto cultural de esta escena?".to_string(),
        "¿Qué simbolismo tiene esta imagen?".to_string(),
    ]
}

pub fn placeholder_answer(question: &str) -> String {
    format!("Respuesta a: {question}")
}
