//! spendlens-core: transaction, category and amount types shared by the engine

pub mod amount;
pub mod category;
pub mod error;
pub mod finance;
pub mod time;

pub use amount::parse_amount;
pub use category::{Category, CategorySet};
pub use error::{EngineError, Result};
pub use finance::{AggregateEntry, Transaction, TransactionSource, TxnType};
pub use time::{covered_months, month_label, parse_txn_date};

pub use rust_decimal::Decimal;
