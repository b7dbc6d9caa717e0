//! Prompt templates for the two flows.

use crate::document::RetrievedChunk;

const QA_INSTRUCTION: &str = "Use the following pieces of context to answer the question \
at the end. If you don't know the answer, just say that you don't know, don't try to make up \
an answer.";

const SUMMARY_INSTRUCTION: &str = "You are a concise technical summarizer. Summarize the following \
document in 6-10 bullet points, preserving key facts, numbers, and definitions. Text:";

/// Build the question-answering prompt: instruction, retrieved context, question.
///
/// Context chunks appear in rank order separated by blank lines.
pub fn qa_prompt(question: &str, context: &[RetrievedChunk]) -> String {
    let context =
        context.iter().map(|r| r.chunk.text.trim()).collect::<Vec<_>>().join("\n\n");
    format!("{QA_INSTRUCTION}\n\n{context}\n\nQuestion: {question}\nHelpful Answer:")
}

/// Build the summarization prompt around the full document text.
pub fn summary_prompt(text: &str) -> String {
    format!("{SUMMARY_INSTRUCTION}\n\n{text}")
}
