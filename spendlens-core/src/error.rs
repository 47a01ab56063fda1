//! Error taxonomy shared by the engine crates.
//!
//! None of these are fatal to a pass: the aggregator records them as
//! diagnostics and keeps going.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Amount text is not a plain decimal number
    #[error("invalid amount: {raw:?}")]
    InvalidAmount { raw: String },

    /// Declared table label is not part of the configured category set
    #[error("unknown category: {label:?}")]
    UnknownCategory { label: String },

    /// Amount parsed but does not fit the running total it belongs to
    #[error("amount overflow: {raw:?} does not fit the running total")]
    AmountOverflow { raw: String },

    #[error("division by zero: nothing was credited")]
    DivisionByZero,

    /// A derived ratio exceeds the decimal range
    #[error("ratio out of range")]
    RatioOutOfRange,

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
