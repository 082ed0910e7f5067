use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Direction of a statement line: `debit` is money out, `credit` is money in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxnKind {
    Debit,
    Credit,
}

impl TxnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxnKind::Debit => "debit",
            TxnKind::Credit => "credit",
        }
    }

    /// Infer direction from a signed amount.
    ///
    /// Strictly `< 0`, so a zero (including a defaulted-to-zero) amount
    /// counts as credit.
    pub fn from_amount(amount: f64) -> Self {
        if amount < 0.0 {
            TxnKind::Debit
        } else {
            TxnKind::Credit
        }
    }
}

/// Normalized transaction extracted from a statement (bank-agnostic).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Statement date; `None` when the model omitted it or it didn't parse.
    pub date: Option<NaiveDate>,
    pub description: String,
    /// Negative means money out; positive means money in.
    pub amount: f64,
    /// Optional running balance (debit/checking statements often include this)
    pub balance: Option<f64>,
    #[serde(rename = "type")]
    pub kind: TxnKind,
}

impl Transaction {
    /// Date column label: ISO date, or "Unknown" when the model gave none.
    pub fn date_label(&self) -> String {
        match self.date {
            Some(d) => d.format("%Y-%m-%d").to_string(),
            None => "Unknown".to_string(),
        }
    }
}

/// Aggregate money-in / money-out sums for a batch of transactions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Totals {
    pub money_in: f64,
    pub money_out: f64,
}

pub fn totals(txns: &[Transaction]) -> Totals {
    let mut out = Totals::default();
    for t in txns {
        if t.amount < 0.0 {
            out.money_out += -t.amount;
        } else {
            out.money_in += t.amount;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn txn(amount: f64) -> Transaction {
        Transaction {
            date: NaiveDate::from_ymd_opt(2026, 3, 14),
            description: "COFFEE SHOP".to_string(),
            amount,
            balance: None,
            kind: TxnKind::from_amount(amount),
        }
    }

    #[test]
    fn test_kind_from_amount() {
        assert_eq!(TxnKind::from_amount(-0.01), TxnKind::Debit);
        assert_eq!(TxnKind::from_amount(0.0), TxnKind::Credit);
        assert_eq!(TxnKind::from_amount(12.5), TxnKind::Credit);
    }

    #[test]
    fn test_date_label() {
        assert_eq!(txn(-5.0).date_label(), "2026-03-14");

        let mut t = txn(-5.0);
        t.date = None;
        assert_eq!(t.date_label(), "Unknown");
    }

    #[test]
    fn test_totals_split_by_sign() {
        let txns = vec![txn(-20.0), txn(-5.5), txn(100.0)];
        let sums = totals(&txns);
        assert_eq!(sums.money_out, 25.5);
        assert_eq!(sums.money_in, 100.0);
    }

    #[test]
    fn test_kind_serde_lowercase() {
        let json = serde_json::to_string(&TxnKind::Debit).unwrap();
        assert_eq!(json, "\"debit\"");
        let back: TxnKind = serde_json::from_str("\"credit\"").unwrap();
        assert_eq!(back, TxnKind::Credit);
    }
}
