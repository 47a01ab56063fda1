//! Transaction input types and per-description aggregate entries

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amount::parse_amount;
use crate::error::Result;

/// Direction of money movement as reported by the bank
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TxnType {
    #[serde(rename = "credit")]
    Credit,
    #[serde(rename = "debit")]
    Debit,
}

/// A raw bank transaction, exactly as the host supplies it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Raw description, often a UPI reference string
    pub description: String,
    /// Decimal text; parsed strictly, never coerced
    pub amount: String,
    #[serde(rename = "type")]
    pub txn_type: TxnType,
    #[serde(default)]
    pub date: String,
    /// Source table the host filed this transaction under, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
}

impl Transaction {
    pub fn new(
        description: impl Into<String>,
        amount: impl Into<String>,
        txn_type: TxnType,
    ) -> Self {
        Self {
            description: description.into(),
            amount: amount.into(),
            txn_type,
            date: String::new(),
            table_name: None,
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = Some(table_name.into());
        self
    }

    pub fn parsed_amount(&self) -> Result<Decimal> {
        parse_amount(&self.amount)
    }

    /// Declared table label, ignoring blank values
    pub fn declared_table(&self) -> Option<&str> {
        self.table_name
            .as_deref()
            .map(str::trim)
            .filter(|label| !label.is_empty())
    }

    pub fn is_credit(&self) -> bool {
        self.txn_type == TxnType::Credit
    }

    pub fn is_debit(&self) -> bool {
        self.txn_type == TxnType::Debit
    }
}

/// Everything the transaction source hands over for one run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TransactionSource {
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub months: Option<Vec<String>>,
}

/// Accumulated total and occurrence count for one (category, description) pair
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AggregateEntry {
    pub total_amount: Decimal,
    /// Always >= 1 once the entry exists
    pub count: u32,
    /// Occurrences whose amount failed to parse (counted, summed as zero)
    #[serde(default, skip_serializing_if = "is_zero")]
    pub invalid_amounts: u32,
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

impl AggregateEntry {
    /// Entry for the first occurrence. `None` marks an unparseable amount.
    pub fn first(amount: Option<Decimal>) -> Self {
        let mut entry = Self {
            total_amount: Decimal::ZERO,
            count: 0,
            invalid_amounts: 0,
        };
        entry.add(amount);
        entry
    }

    /// Count one more occurrence. An amount that would overflow the total
    /// is treated like an unparseable one.
    pub fn add(&mut self, amount: Option<Decimal>) {
        match amount.and_then(|amount| self.total_amount.checked_add(amount)) {
            Some(total) => self.total_amount = total,
            None => self.invalid_amounts += 1,
        }
        self.count += 1;
    }

    pub fn fits(&self, amount: Decimal) -> bool {
        self.total_amount.checked_add(amount).is_some()
    }

    /// Occurrences that contributed to `total_amount`
    pub fn valid_count(&self) -> u32 {
        self.count - self.invalid_amounts
    }
}
