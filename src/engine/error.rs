//! Per-record failure taxonomy for parsing and recalculation.

use serde::Serialize;
use thiserror::Error;

/// A failure that belongs to exactly one record.
///
/// These never abort the batch: the runner folds them into that record's
/// result as a `Failed` status, clearly distinguished from a record that
/// evaluated fine but missed a tolerance check.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum EngineError {
    #[error("missing field '{field}' on transaction '{transaction_id}'")]
    MissingField { field: String, transaction_id: String },

    #[error("unparseable value '{raw}' in field '{field}' on transaction '{transaction_id}'")]
    UnparseableValue {
        field: String,
        transaction_id: String,
        raw: String,
    },

    #[error("division by zero while computing '{formula}' on transaction '{transaction_id}'")]
    DivisionByZero { formula: String, transaction_id: String },

    #[error("non-finite result while computing '{formula}' on transaction '{transaction_id}'")]
    NonFinite { formula: String, transaction_id: String },
}
