//! Terminal preview of extracted transactions.

use ledgerlift_core::{totals, Transaction};

/// Signed dollar amount: -15.5 -> "-$15.50", 100.0 -> "$100.00".
fn fmt_money(v: f64) -> String {
    if v < 0.0 {
        format!("-${:.2}", -v)
    } else {
        format!("${:.2}", v)
    }
}

pub fn print_preview(txns: &[Transaction], limit: usize) {
    if txns.is_empty() {
        println!("The model returned no transactions.");
        println!("Check that the statement actually contains transaction rows.");
        return;
    }

    println!("Found {} transactions\n", txns.len());
    println!(
        "{:<10}  {:<6}  {:>12}  {:>12}  {}",
        "DATE", "TYPE", "AMOUNT", "BALANCE", "DESCRIPTION"
    );

    for t in txns.iter().take(limit) {
        let balance = t
            .balance
            .map(fmt_money)
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<10}  {:<6}  {:>12}  {:>12}  {}",
            t.date_label(),
            t.kind.as_str(),
            fmt_money(t.amount),
            balance,
            t.description
        );
    }
    if txns.len() > limit {
        println!("… and {} more", txns.len() - limit);
    }

    let sums = totals(txns);
    println!(
        "\nMoney in: {} | Money out: {}",
        fmt_money(sums.money_in),
        fmt_money(sums.money_out)
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_money_sign_placement() {
        assert_eq!(fmt_money(-15.5), "-$15.50");
        assert_eq!(fmt_money(100.0), "$100.00");
        assert_eq!(fmt_money(0.0), "$0.00");
    }
}
