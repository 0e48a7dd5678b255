//! Prompt assembly for the generation step.

use crate::document::RetrievedChunk;

/// Assembles a generation prompt from a question and retrieved snippets.
///
/// The template is deterministic: a fixed preamble, the literal question, a
/// context section with 1-based numbered snippets joined by blank lines, and
/// a fixed instruction line. Retrieval order is preserved as-is.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    preamble: String,
    instructions: String,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self {
            preamble: "You are an analyst assistant summarizing product feedback.".to_string(),
            instructions: "Answer the question based on the above context. Be specific and \
                           mention examples when available."
                .to_string(),
        }
    }
}

impl PromptBuilder {
    /// Create a builder with the default preamble and instructions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the preamble line.
    pub fn with_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = preamble.into();
        self
    }

    /// Replace the instruction line.
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    /// Build the prompt.
    ///
    /// With no retrieved chunks the context section is empty but the
    /// preamble, question, and instructions remain, so the generator can
    /// still attempt an answer.
    pub fn build(&self, query: &str, retrieved: &[RetrievedChunk]) -> String {
        let context = retrieved
            .iter()
            .enumerate()
            .map(|(i, chunk)| format!("{}. {}", i + 1, chunk.snippet))
            .collect::<Vec<_>>()
            .join("\n\n");

        format!(
            "{preamble}\n\nQuestion: {query}\n\nContext:\n{context}\n\nInstructions: {instructions}",
            preamble = self.preamble,
            instructions = self.instructions,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn retrieved(snippet: &str) -> RetrievedChunk {
        RetrievedChunk { title: "t".to_string(), snippet: snippet.to_string(), distance: 0.0 }
    }

    #[test]
    fn snippets_are_numbered_from_one_and_blank_line_separated() {
        let prompt = PromptBuilder::new()
            .build("What changed?", &[retrieved("first snippet"), retrieved("second snippet")]);
        assert!(prompt.contains("Question: What changed?"));
        assert!(prompt.contains("Context:\n1. first snippet\n\n2. second snippet\n\n"));
    }

    #[test]
    fn retrieval_order_is_preserved() {
        let prompt = PromptBuilder::new().build("q", &[retrieved("zz"), retrieved("aa")]);
        assert!(prompt.find("1. zz").unwrap() < prompt.find("2. aa").unwrap());
    }

    #[test]
    fn empty_context_keeps_instructions_and_question() {
        let prompt = PromptBuilder::new().build("Anything?", &[]);
        assert!(prompt.contains("Question: Anything?"));
        assert!(prompt.contains("Context:\n\n"));
        assert!(prompt.contains("Instructions: Answer the question"));
    }

    #[test]
    fn custom_preamble_and_instructions_are_used() {
        let prompt = PromptBuilder::new()
            .with_preamble("You are terse.")
            .with_instructions("One sentence only.")
            .build("q", &[]);
        assert!(prompt.starts_with("You are terse.\n\n"));
        assert!(prompt.ends_with("Instructions: One sentence only."));
    }
}
