//! ledgerlift-extract: statement input, prompts, and the LLM extraction pipeline.

pub mod statement;
pub mod prompt;
pub mod llm;
pub mod extractor;

pub use statement::{Statement, StatementBody, StatementKind, DEFAULT_MAX_CSV_CHARS};
pub use llm::{LlmConfig, Provider};
pub use extractor::extract_transactions;
