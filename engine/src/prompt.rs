//! Prompt templates for the two dispatch channels.
//!
//! The templates are fixed; only the source listing and the user's question
//! are interpolated. What the model does with them is its business.

const EXPLAIN_INSTRUCTIONS: &str = "Explain the given code in simple words. \
    Also explain how each function works in brief. \
    Give sample input and output for the program.";

const FORMAT_HINT: &str = "Please provide a well-formatted response using \
    Markdown syntax for headings, lists, and code blocks where appropriate.";

/// Explanation prompt: the source listing followed by the fixed
/// instructional preamble.
#[must_use]
pub fn explain_prompt(source: &str) -> String {
    format!("{source}\n\n{EXPLAIN_INSTRUCTIONS} {FORMAT_HINT}")
}

/// Free-form query prompt: embeds both the source listing and the user's
/// question.
#[must_use]
pub fn query_prompt(source: &str, question: &str) -> String {
    format!("Given this code:\n\n{source}\n\nUser's question: {question}\n\n{FORMAT_HINT}")
}
