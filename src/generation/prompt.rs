//! Prompt templates for answer generation

use crate::retrieval::SearchResult;

/// Renders retrieved chunks and the question into a single generation prompt
pub struct PromptBuilder;

impl PromptBuilder {
    /// Concatenate retrieved chunks, in retrieval order, into a context block
    pub fn build_context(results: &[SearchResult]) -> String {
        results
            .iter()
            .map(|r| r.chunk.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Build a question-answering prompt over retrieved context
    pub fn build_qa_prompt(question: &str, context: &str) -> String {
        format!(
            r#"Based on the following context, answer the question. Only use information from the context.

Context:
{context}

Question: {question}

Answer:"#
        )
    }

    /// Fallback prompt when retrieval produced nothing; the model still sees the
    /// question and answers best-effort
    pub fn build_question_prompt(question: &str) -> String {
        format!("Question: {question}\n\nAnswer:")
    }
}
