//! Post-processing of model replies into typed transactions.
//!
//! The extraction prompt demands a bare JSON array, but models routinely wrap
//! it in Markdown fences or surround it with prose. Recovery order: strip
//! fences, regex out the first array of objects, parse JSON, then default
//! each field.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use regex::Regex;
use serde_json::Value;

use crate::transaction::{Transaction, TxnKind};

/// Parse the raw text of a model reply into transactions.
pub fn parse_model_reply(reply: &str) -> Result<Vec<Transaction>> {
    let cleaned = strip_code_fences(reply)?;
    let payload = match extract_json_array(&cleaned)? {
        Some(arr) => arr,
        None => cleaned,
    };

    let value: Value =
        serde_json::from_str(&payload).context("model reply is not valid JSON")?;
    let items = match value.as_array() {
        Some(items) => items,
        None => bail!(
            "expected a JSON array of transactions, got {}",
            value_kind(&value)
        ),
    };

    items.iter().map(transaction_from_value).collect()
}

/// Remove Markdown code fences: every ```json opener (case-insensitive,
/// optional trailing newline), then any remaining bare fence.
pub fn strip_code_fences(text: &str) -> Result<String> {
    let json_fence = Regex::new(r"(?i)```json\n?")?;
    let bare_fence = Regex::new(r"```\n?")?;

    let s = json_fence.replace_all(text.trim(), "");
    let s = bare_fence.replace_all(&s, "");
    Ok(s.trim().to_string())
}

/// Pull the first JSON array of objects out of surrounding prose.
///
/// Greedy on purpose: `[ { ... } ]` with anything between grabs through the
/// last closing brace, so one array split across paragraphs still comes out
/// whole.
pub fn extract_json_array(text: &str) -> Result<Option<String>> {
    let array_re = Regex::new(r"\[\s*\{[\s\S]*\}\s*\]")?;
    Ok(array_re.find(text).map(|m| m.as_str().to_string()))
}

fn transaction_from_value(v: &Value) -> Result<Transaction> {
    if !v.is_object() {
        bail!("expected a transaction object, got {}", value_kind(v));
    }

    let date = v
        .get("date")
        .and_then(Value::as_str)
        .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok());

    let description = v
        .get("description")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("No description")
        .to_string();

    let amount = number_field(v, "amount").unwrap_or(0.0);
    let balance = number_field(v, "balance");

    // An explicit debit/credit from the model wins; anything else falls back
    // to the sign of the (already defaulted) amount.
    let kind = v
        .get("type")
        .and_then(Value::as_str)
        .and_then(|s| match s.trim().to_ascii_lowercase().as_str() {
            "debit" => Some(TxnKind::Debit),
            "credit" => Some(TxnKind::Credit),
            _ => None,
        })
        .unwrap_or_else(|| TxnKind::from_amount(amount));

    Ok(Transaction {
        date,
        description,
        amount,
        balance,
        kind,
    })
}

/// Numeric field that tolerates numbers-as-strings ("-123.45").
fn number_field(v: &Value, key: &str) -> Option<f64> {
    match v.get(key) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_bare_array() {
        let reply = r#"[
            {"date": "2026-01-05", "description": "PAYROLL ACME INC", "amount": 2500.00, "balance": 3100.50, "type": "credit"},
            {"date": "2026-01-06", "description": "GROCERY MART", "amount": -82.17, "type": "debit"}
        ]"#;

        let txns = parse_model_reply(reply).unwrap();
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[0].description, "PAYROLL ACME INC");
        assert_eq!(txns[0].balance, Some(3100.50));
        assert_eq!(txns[1].amount, -82.17);
        assert_eq!(txns[1].balance, None);
        assert_eq!(txns[1].kind, TxnKind::Debit);
    }

    #[test]
    fn test_strips_json_fences() {
        let reply = "```json\n[{\"date\": \"2026-02-01\", \"description\": \"RENT\", \"amount\": -1200.0}]\n```";
        let txns = parse_model_reply(reply).unwrap();
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].kind, TxnKind::Debit);
    }

    #[test]
    fn test_fence_case_insensitive() {
        let cleaned = strip_code_fences("```JSON\n[]\n```").unwrap();
        assert_eq!(cleaned, "[]");
    }

    #[test]
    fn test_recovers_array_from_prose() {
        let reply = "Here are the transactions I found:\n\n[ {\"date\": \"2026-03-01\", \"description\": \"ATM WITHDRAWAL\", \"amount\": -60} ]\n\nLet me know if you need anything else.";
        let txns = parse_model_reply(reply).unwrap();
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].description, "ATM WITHDRAWAL");
    }

    #[test]
    fn test_defaults_missing_fields() {
        let reply = r#"[{}]"#;
        let txns = parse_model_reply(reply).unwrap();
        assert_eq!(txns[0].date, None);
        assert_eq!(txns[0].date_label(), "Unknown");
        assert_eq!(txns[0].description, "No description");
        assert_eq!(txns[0].amount, 0.0);
        assert_eq!(txns[0].balance, None);
        // amount defaulted to 0.0, which is not < 0
        assert_eq!(txns[0].kind, TxnKind::Credit);
    }

    #[test]
    fn test_amount_as_string() {
        let reply = r#"[{"description": "FEE", "amount": "-12.50", "balance": "987.50"}]"#;
        let txns = parse_model_reply(reply).unwrap();
        assert_eq!(txns[0].amount, -12.50);
        assert_eq!(txns[0].balance, Some(987.50));
        assert_eq!(txns[0].kind, TxnKind::Debit);
    }

    #[test]
    fn test_unparseable_date_becomes_unknown() {
        let reply = r#"[{"date": "01/05/2026", "description": "X", "amount": -1}]"#;
        let txns = parse_model_reply(reply).unwrap();
        assert_eq!(txns[0].date, None);
    }

    #[test]
    fn test_explicit_type_wins_over_sign() {
        // Model says credit on a negative amount; we trust the model's label.
        let reply = r#"[{"description": "REFUND REVERSAL", "amount": -10.0, "type": "credit"}]"#;
        let txns = parse_model_reply(reply).unwrap();
        assert_eq!(txns[0].kind, TxnKind::Credit);
    }

    #[test]
    fn test_unknown_type_falls_back_to_sign() {
        let reply = r#"[{"description": "WIRE", "amount": -10.0, "type": "withdrawal"}]"#;
        let txns = parse_model_reply(reply).unwrap();
        assert_eq!(txns[0].kind, TxnKind::Debit);
    }

    #[test]
    fn test_empty_array_is_ok() {
        assert_eq!(parse_model_reply("[]").unwrap().len(), 0);
    }

    #[test]
    fn test_non_array_is_an_error() {
        let err = parse_model_reply(r#"{"date": "2026-01-01"}"#).unwrap_err();
        assert!(err.to_string().contains("an object"), "{err}");
    }

    #[test]
    fn test_non_object_element_is_an_error() {
        // The array regex requires an object, so this parses the raw text.
        let err = parse_model_reply("[1, 2, 3]").unwrap_err();
        assert!(err.to_string().contains("a number"), "{err}");
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(parse_model_reply("I could not find any transactions.").is_err());
    }
}
