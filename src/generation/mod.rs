//! Answer generation: prompt assembly and local model inference

mod prompt;
mod t5;

pub use prompt::PromptBuilder;
pub use t5::FlanT5Generator;

use crate::error::Result;
use crate::retrieval::SearchResult;

/// Generates text from a prompt.
///
/// Decoding must be deterministic: repeated calls with an identical prompt
/// return identical text within one process.
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for the prompt.
    fn generate(&self, prompt: &str) -> Result<String>;

    /// Provider name for logging.
    fn name(&self) -> &str;
}

/// Produces a natural-language answer conditioned on retrieved context.
pub struct AnswerSynthesizer {
    generator: Box<dyn TextGenerator>,
}

impl AnswerSynthesizer {
    /// Create a synthesizer around a generator
    pub fn new(generator: Box<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Build the prompt from the question and the retrieved chunks (in retrieval
    /// order) and run the generator.
    ///
    /// An empty context still reaches the model as a question-only prompt; this
    /// layer never refuses outright.
    pub fn answer(&self, question: &str, context: &[SearchResult]) -> Result<String> {
        let prompt = if context.is_empty() {
            PromptBuilder::build_question_prompt(question)
        } else {
            let context = PromptBuilder::build_context(context);
            PromptBuilder::build_qa_prompt(question, &context)
        };

        tracing::debug!(
            "generating with '{}' ({} prompt chars)",
            self.generator.name(),
            prompt.chars().count()
        );
        self.generator.generate(&prompt)
    }
}
