//! Extraction prompts.
//!
//! The format contract is load-bearing: sanitization downstream expects a
//! bare JSON array with exactly these five fields.

/// Instruction block sent alongside a PDF document block.
pub const PDF_PROMPT: &str = r#"Extract ALL transactions from this bank statement. Return ONLY a JSON array.

Format:
[
  {
    "date": "YYYY-MM-DD",
    "description": "transaction description",
    "amount": -123.45,
    "balance": 1000.00,
    "type": "debit"
  }
]

Rules:
- Negative for money OUT
- Positive for money IN
- Return ONLY JSON array"#;

/// Prompt for a CSV statement, with the (already truncated) CSV text inlined.
pub fn csv_prompt(csv_text: &str) -> String {
    format!(
        r#"Parse this CSV bank statement. Return ONLY a JSON array.

CSV Data:
{csv_text}

Format:
[
  {{
    "date": "YYYY-MM-DD",
    "description": "merchant",
    "amount": -123.45,
    "balance": 1000.00,
    "type": "debit"
  }}
]

Return ONLY JSON array"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_prompt_embeds_data() {
        let p = csv_prompt("Date,Amount\n2026-01-01,-5.00");
        assert!(p.contains("CSV Data:\nDate,Amount\n2026-01-01,-5.00"));
        assert!(p.contains("Return ONLY JSON array"));
        assert!(p.contains("\"date\": \"YYYY-MM-DD\""));
    }

    #[test]
    fn test_pdf_prompt_contract() {
        assert!(PDF_PROMPT.contains("Extract ALL transactions"));
        assert!(PDF_PROMPT.contains("Negative for money OUT"));
        assert!(PDF_PROMPT.contains("Return ONLY JSON array"));
    }
}
