//! Month coverage for a batch of transactions.

use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;

use crate::finance::Transaction;

const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%d %b %Y", "%d-%b-%Y"];

/// Parse a transaction date in any of the formats banks commonly export.
pub fn parse_txn_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Distinct months (as the first day of each month) covered by the
/// transactions, oldest first. Unparseable dates are ignored.
pub fn covered_months(transactions: &[Transaction]) -> Vec<NaiveDate> {
    transactions
        .iter()
        .filter_map(|t| parse_txn_date(&t.date))
        .filter_map(|d| d.with_day(1))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// "Mar 2024" style label
pub fn month_label(month: NaiveDate) -> String {
    month.format("%b %Y").to_string()
}
