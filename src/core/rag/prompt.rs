//! Prompt assembly for grounded answers.
//!
//! Grounding is enforced only through the system instruction: the model is
//! told to answer from the supplied context and to admit when the context
//! does not cover the question. Nothing checks the answer afterwards.

use super::models::{ChatMessage, MatchResult};

/// Placed between retrieved passages in the context block.
pub const CONTEXT_SEPARATOR: &str = "\n---\n";

/// Context used when the store returned no matches.
pub const NO_CONTEXT_PLACEHOLDER: &str = "No hay información específica.";

const PERSONA: &str = "Eres el Entrenador Principal de Turf.";

const GROUNDING_RULES: &str = "Usa SOLO el siguiente contexto para responder al usuario. \
Si la respuesta no está en el contexto, di que no tienes esa información, no inventes.";

const CONTEXT_HEADING: &str = "CONTEXTO DE ENTRENAMIENTO:";

/// Joins the content of every match, in order, into one context block.
pub fn compose_context(matches: &[MatchResult]) -> String {
    if matches.is_empty() {
        return NO_CONTEXT_PLACEHOLDER.to_string();
    }

    matches
        .iter()
        .map(|m| m.content.as_str())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

/// Builds the system instruction around an already composed context.
pub fn system_instruction(context: &str) -> String {
    format!(
        "{}\n{}\n\n{}\n{}",
        PERSONA, GROUNDING_RULES, CONTEXT_HEADING, context
    )
}

/// The single-turn conversation sent to the completion provider.
pub fn build_messages(context: &str, question: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(system_instruction(context)),
        ChatMessage::user(question),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rag::models::RecordMetadata;

    fn match_with(content: &str) -> MatchResult {
        MatchResult {
            content: content.to_string(),
            metadata: RecordMetadata::default(),
            similarity: 0.9,
        }
    }

    #[test]
    fn test_empty_matches_use_placeholder() {
        assert_eq!(compose_context(&[]), NO_CONTEXT_PLACEHOLDER);
    }

    #[test]
    fn test_context_preserves_order_and_separator() {
        let context = compose_context(&[match_with("uno"), match_with("dos"), match_with("tres")]);
        assert_eq!(context, "uno\n---\ndos\n---\ntres");
    }

    #[test]
    fn test_single_match_has_no_separator() {
        assert_eq!(compose_context(&[match_with("solo")]), "solo");
    }

    #[test]
    fn test_system_instruction_contains_rules_and_context() {
        let instruction = system_instruction("beber agua");

        assert!(instruction.starts_with(PERSONA));
        assert!(instruction.contains("SOLO"));
        assert!(instruction.contains("no inventes"));
        assert!(instruction.ends_with("CONTEXTO DE ENTRENAMIENTO:\nbeber agua"));
    }

    #[test]
    fn test_build_messages_is_system_then_user() {
        let messages = build_messages("ctx", "¿pregunta?");

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert!(messages[0].content.contains("ctx"));
        assert_eq!(messages[1].role, "user");
        assert_eq!(messages[1].content, "¿pregunta?");
    }
}
