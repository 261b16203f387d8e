//! Errors raised while reading a finance snapshot

use thiserror::Error;

/// A snapshot payload that could not be turned into a [`crate::FinanceSnapshot`]
#[derive(Error, Debug)]
pub enum ParseError {
    /// Not well-formed JSON, or a field of the wrong shape
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    /// Well-formed, but a mandatory value is blank
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// Totals or allocations that do not fit in a `Decimal`
    #[error("amounts are too large to total")]
    OutOfRange,
}

pub type ParseResult<T> = Result<T, ParseError>;
