//! Answer generator trait.

use async_trait::async_trait;

use crate::error::Result;

/// A language model that answers a question under a system instruction.
///
/// The query pipeline sends exactly two turns: the grounding instruction as
/// the system message and the user's question verbatim.
///
/// # Example
///
/// ```rust,ignore
/// use docqa_rag::{AnswerGenerator, grounding_instruction};
///
/// let instruction = grounding_instruction(&context);
/// let answer = generator.generate(&instruction, "What is the payment term?").await?;
/// ```
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    /// Return the model's text answer.
    ///
    /// A response without text content is a
    /// [`RagError::GenerationError`](crate::RagError::GenerationError).
    async fn generate(&self, system_instruction: &str, question: &str) -> Result<String>;
}
