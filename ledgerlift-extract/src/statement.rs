//! Statement input handling: file kind detection, CSV truncation, PDF encoding.

use anyhow::{bail, Context, Result};
use base64::Engine as _;
use std::path::{Path, PathBuf};

/// Default cap on CSV text sent inline to the model.
pub const DEFAULT_MAX_CSV_CHARS: usize = 15_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Csv,
    Pdf,
}

/// Payload ready for the model call.
#[derive(Debug, Clone, PartialEq)]
pub enum StatementBody {
    /// CSV text, already truncated to the configured character cap.
    CsvText(String),
    /// Base64-encoded PDF bytes, ready for a document content block.
    PdfBase64(String),
}

#[derive(Debug, Clone)]
pub struct Statement {
    pub path: PathBuf,
    pub kind: StatementKind,
    pub body: StatementBody,
}

impl Statement {
    /// Read a statement file from disk. CSVs are read as text and capped at
    /// `max_csv_chars`; PDFs are read raw and base64-encoded.
    pub fn load(path: impl AsRef<Path>, max_csv_chars: usize) -> Result<Self> {
        let path = path.as_ref();
        let kind = detect_kind(path)?;

        let body = match kind {
            StatementKind::Csv => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("read {}", path.display()))?;
                StatementBody::CsvText(truncate_chars(&text, max_csv_chars))
            }
            StatementKind::Pdf => {
                let bytes = std::fs::read(path)
                    .with_context(|| format!("read {}", path.display()))?;
                StatementBody::PdfBase64(
                    base64::engine::general_purpose::STANDARD.encode(bytes),
                )
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            kind,
            body,
        })
    }
}

fn detect_kind(path: &Path) -> Result<StatementKind> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "csv" => Ok(StatementKind::Csv),
        "pdf" => Ok(StatementKind::Pdf),
        _ => bail!(
            "unsupported statement {} (expected a .csv or .pdf file)",
            path.display()
        ),
    }
}

/// Truncate to at most `max` characters without splitting a UTF-8 character.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_kind_case_insensitive() {
        assert_eq!(detect_kind(Path::new("stmt.CSV")).unwrap(), StatementKind::Csv);
        assert_eq!(detect_kind(Path::new("stmt.Pdf")).unwrap(), StatementKind::Pdf);
    }

    #[test]
    fn test_detect_kind_rejects_other_extensions() {
        let err = detect_kind(Path::new("stmt.xlsx")).unwrap_err();
        assert!(err.to_string().contains(".csv or .pdf"), "{err}");
        assert!(detect_kind(Path::new("statement")).is_err());
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("abcdef", 4), "abcd");
        assert_eq!(truncate_chars("abc", 10), "abc");
        // multi-byte characters count as one
        assert_eq!(truncate_chars("héllo", 2), "hé");
    }
}
