//! Grounded answer generation.
//!
//! An [`AnswerGenerator`] receives the user's question together with the context assembled by the
//! retrieval pipeline and produces the final answer. What the system prompt says is the
//! generator's business; [`GroundedPrompt`] offers a strict "context only" template that most
//! chat-completion backed implementations can reuse verbatim.

use alloc::{format, string::String};
use core::future::Future;

/// Produces an answer to a question using retrieved context.
///
/// ```rust
/// use sift_core::{AnswerGenerator, GroundedPrompt};
///
/// struct EchoGenerator;
///
/// impl AnswerGenerator for EchoGenerator {
///     async fn generate(&self, query: &str, context: &str) -> sift_core::Result {
///         let prompt = GroundedPrompt::new(query, context);
///         Ok(prompt.user())
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let answer = EchoGenerator.generate("Who?", "Chunk 1:\nNobody.").await.unwrap();
/// assert!(answer.contains("Nobody."));
/// # });
/// ```
pub trait AnswerGenerator: Send + Sync {
    /// Generates an answer for `query` grounded in `context`.
    ///
    /// # Errors
    ///
    /// Returns the provider's failure as-is.
    fn generate(&self, query: &str, context: &str) -> impl Future<Output = crate::Result> + Send;
}

impl<T: AnswerGenerator> AnswerGenerator for &T {
    fn generate(&self, query: &str, context: &str) -> impl Future<Output = crate::Result> + Send {
        (**self).generate(query, context)
    }
}

/// Reply the model is told to give when the context does not contain the answer.
pub const UNKNOWN_ANSWER: &str = "I don't know based on the provided information.";

/// System and user prompts that confine a chat model to the retrieved context.
#[derive(Debug, Clone, Copy)]
pub struct GroundedPrompt<'a> {
    query: &'a str,
    context: &'a str,
}

impl<'a> GroundedPrompt<'a> {
    /// Creates a prompt for `query` over `context`.
    #[must_use]
    pub const fn new(query: &'a str, context: &'a str) -> Self {
        Self { query, context }
    }

    /// The system prompt.
    #[must_use]
    pub fn system(&self) -> String {
        format!(
            "You are a highly accurate assistant. Use ONLY the context below to answer the user's question.\n\
             If the answer cannot be found in the context, respond with: \"{UNKNOWN_ANSWER}\"\n\
             Do not make up or guess information. Be precise and factual."
        )
    }

    /// The user prompt carrying the context and the question.
    #[must_use]
    pub fn user(&self) -> String {
        format!(
            "Context information is below.\n\
             ---------------------\n\
             {context}\n\
             ---------------------\n\
             Given ONLY the context information above and no prior knowledge, answer the question: {query}",
            context = self.context,
            query = self.query,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FirstLine;

    impl AnswerGenerator for FirstLine {
        async fn generate(&self, _query: &str, context: &str) -> crate::Result {
            Ok(context.lines().next().unwrap_or_default().into())
        }
    }

    #[test]
    fn user_prompt_wraps_context_and_question() {
        let prompt = GroundedPrompt::new("Who runs it?", "Chunk 1:\nAlice runs it.");
        let user = prompt.user();

        assert!(user.starts_with("Context information is below."));
        assert!(
            user.contains("---------------------\nChunk 1:\nAlice runs it.\n---------------------")
        );
        assert!(user.ends_with("answer the question: Who runs it?"));
    }

    #[test]
    fn system_prompt_names_fallback_answer() {
        let system = GroundedPrompt::new("q", "c").system();
        assert!(system.contains(UNKNOWN_ANSWER));
        assert!(system.contains("ONLY the context"));
    }

    async fn generate_with<G: AnswerGenerator>(generator: G, context: &str) -> String {
        generator.generate("q", context).await.unwrap()
    }

    #[tokio::test]
    async fn generator_through_reference() {
        let generator = FirstLine;
        let answer = generate_with(&generator, "Chunk 1:\nbody").await;
        assert_eq!(answer, "Chunk 1:");
    }
}
