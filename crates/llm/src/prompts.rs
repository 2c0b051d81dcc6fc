//! Prompt templates for document summaries and legal questions.
//!
//! Each template is a static string with exactly one placeholder. The
//! jurisdiction phrase appears exactly once per prompt pair.

use crate::provider::{Message, Role};

pub const JURISDICTION: &str = "Indian law";

/// Placeholder in the summary template replaced by the document text.
pub const DOCUMENT_PLACEHOLDER: &str = "<<<document>>>";

/// Placeholder in the question template replaced by the user's question.
pub const QUESTION_PLACEHOLDER: &str = "<<<question>>>";

/// Shown next to every answer and summary; appended by us, never by the model.
pub const LEGAL_DISCLAIMER: &str = "Disclaimer: This tool provides general information for educational \
purposes only. It does not constitute legal advice and should not be relied upon for legal decisions. \
Always consult a qualified legal professional for your specific situation.";

const SUMMARY_SYSTEM_PROMPT: &str = "You are a legal assistant specialising in Indian law. \
Your task is to summarise legal documents in plain English for readers who are not lawyers. Focus on:

1. Key terms and conditions
2. Rights and obligations of each party
3. Important clauses such as termination, payment, liability, indemnity, arbitration and confidentiality
4. Notable risks, obligations or concerns for the reader
5. Next steps or deadlines

Refer to the relevant Indian statutes (for example the Indian Contract Act, 1872) where applicable. \
Keep the summary clear, concise and accessible.";

const SUMMARY_USER_TEMPLATE: &str = "Please provide a plain-English summary of this legal document:\n\n<<<document>>>";

const QUESTION_SYSTEM_PROMPT: &str = "You are a legal assistant specialising in Indian law. \
Provide accurate, helpful information about legal matters in India, including:

- Contract law under the Indian Contract Act, 1872
- Employment and labour rights
- Property and tenancy
- Consumer protection
- Company and business regulation
- Constitutional rights and civil liberties

Always:
1. Answer strictly with reference to the statutes and regulations of India
2. Cite the relevant Indian acts or provisions where applicable
3. Give practical, actionable guidance
4. If the question is ambiguous or missing key facts, ask for clarification instead of guessing
5. Avoid US, UK or other foreign legal systems unless needed for comparison

End every answer with a clear statement that it is general information and not a substitute for professional legal advice.";

const QUESTION_USER_TEMPLATE: &str = "<<<question>>>";

pub const EXAMPLE_QUESTIONS: &[&str] = &[
    "Can my landlord evict me without notice in India?",
    "What happens if I break a contract under Indian law?",
    "What are employee rights during termination in India?",
    "What is the notice period for resignation under Indian labor law?",
    "Can a company change my salary without my consent?",
    "What are the basic rights of consumers in India?",
    "How long is the limitation period for filing a civil suit in India?",
    "What constitutes unfair trade practices under Indian law?",
];

/// A fully rendered prompt ready for the completion service.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptRequest {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
}

impl PromptRequest {
    pub fn messages(&self) -> Vec<Message> {
        vec![
            Message {
                role: Role::System,
                content: self.system.clone(),
            },
            Message {
                role: Role::User,
                content: self.user.clone(),
            },
        ]
    }

    /// System and user text as one string.
    pub fn rendered(&self) -> String {
        format!("{}\n\n{}", self.system, self.user)
    }
}

/// Summary prompt for extracted document text.
///
/// Text longer than `max_chars` characters is cut at a char boundary; the
/// returned flag says whether that happened.
pub fn summary_prompt(document_text: &str, max_chars: usize, max_tokens: u32) -> (PromptRequest, bool) {
    let (text, truncated) = truncate_chars(document_text, max_chars);
    let prompt = PromptRequest {
        system: SUMMARY_SYSTEM_PROMPT.to_string(),
        user: SUMMARY_USER_TEMPLATE.replacen(DOCUMENT_PLACEHOLDER, text, 1),
        max_tokens,
    };
    (prompt, truncated)
}

/// Question-answering prompt; the question is inserted verbatim.
pub fn question_prompt(question: &str, max_tokens: u32) -> PromptRequest {
    PromptRequest {
        system: QUESTION_SYSTEM_PROMPT.to_string(),
        user: QUESTION_USER_TEMPLATE.replacen(QUESTION_PLACEHOLDER, question, 1),
        max_tokens,
    }
}

/// First `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => (&text[..byte_idx], true),
        None => (text, false),
    }
}
