//! Shared export surface: column order, row rendering, CSV output.

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::transaction::Transaction;

/// Export column order. Shared by the CSV download and the Sheets export.
pub const HEADER: [&str; 5] = ["Date", "Description", "Amount", "Balance", "Type"];

/// One CSV row, in HEADER order. Absent balance renders as an empty cell.
pub fn to_row(txn: &Transaction) -> [String; 5] {
    [
        txn.date_label(),
        txn.description.clone(),
        format!("{}", txn.amount),
        txn.balance.map(|b| format!("{b}")).unwrap_or_default(),
        txn.kind.as_str().to_string(),
    ]
}

/// Render transactions as CSV text (header row first). Quoting is handled by
/// the csv crate.
pub fn render_csv(txns: &[Transaction]) -> Result<String> {
    let mut w = csv::Writer::from_writer(Vec::new());
    w.write_record(HEADER).context("write csv header")?;
    for t in txns {
        w.write_record(to_row(t))
            .with_context(|| format!("write csv row for '{}'", t.description))?;
    }
    let bytes = w
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flush csv writer: {e}"))?;
    String::from_utf8(bytes).context("csv output was not utf-8")
}

/// Download-style default filename: transactions_YYYY-MM-DD.csv
pub fn default_csv_filename(today: NaiveDate) -> String {
    format!("transactions_{}.csv", today.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::TxnKind;

    fn txn(description: &str, amount: f64, balance: Option<f64>) -> Transaction {
        Transaction {
            date: NaiveDate::from_ymd_opt(2026, 4, 2),
            description: description.to_string(),
            amount,
            balance,
            kind: TxnKind::from_amount(amount),
        }
    }

    #[test]
    fn test_csv_header_and_rows() {
        let txns = vec![
            txn("PAYROLL", 2500.0, Some(3100.5)),
            txn("GROCERY MART", -82.17, None),
        ];
        let out = render_csv(&txns).unwrap();
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("Date,Description,Amount,Balance,Type"));
        assert_eq!(lines.next(), Some("2026-04-02,PAYROLL,2500,3100.5,credit"));
        assert_eq!(lines.next(), Some("2026-04-02,GROCERY MART,-82.17,,debit"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_csv_quotes_descriptions() {
        let txns = vec![txn("ACME, INC \"STORE\"", -1.0, None)];
        let out = render_csv(&txns).unwrap();
        // RFC 4180: embedded quotes doubled, field wrapped in quotes
        assert!(out.contains("\"ACME, INC \"\"STORE\"\"\""), "{out}");
    }

    #[test]
    fn test_unknown_date_in_row() {
        let mut t = txn("X", -1.0, None);
        t.date = None;
        assert_eq!(to_row(&t)[0], "Unknown");
    }

    #[test]
    fn test_default_filename() {
        let today = NaiveDate::from_ymd_opt(2026, 4, 2).unwrap();
        assert_eq!(default_csv_filename(today), "transactions_2026-04-02.csv");
    }
}
