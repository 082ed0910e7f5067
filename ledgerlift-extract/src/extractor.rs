//! The extraction pipeline: statement -> prompt -> model call -> transactions.

use anyhow::{Context, Result};
use ledgerlift_core::sanitize::parse_model_reply;
use ledgerlift_core::Transaction;
use tracing::debug;

use crate::llm::{self, LlmConfig};
use crate::prompt;
use crate::statement::{Statement, StatementBody};

/// Run one statement through the model and sanitize the reply.
///
/// Single fallible pass: the one outbound call either yields parseable
/// transactions or the whole extraction fails with context.
pub async fn extract_transactions(
    statement: &Statement,
    cfg: &LlmConfig,
    api_key: &str,
) -> Result<Vec<Transaction>> {
    let reply = match &statement.body {
        StatementBody::CsvText(text) => llm::extract_text(cfg, api_key, &prompt::csv_prompt(text))
            .await
            .with_context(|| format!("extracting {}", statement.path.display()))?,
        StatementBody::PdfBase64(data) => llm::extract_pdf(cfg, api_key, data, prompt::PDF_PROMPT)
            .await
            .with_context(|| format!("extracting {}", statement.path.display()))?,
    };

    debug!(reply_chars = reply.len(), "model reply received");
    parse_model_reply(&reply).context("post-processing model reply")
}
