//! Structured validation outcomes, one per record.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::engine::EngineError;

/// Overall outcome for one record.
///
/// `Invalid` means the record evaluated fine but failed a check;
/// `Failed` means it could not be evaluated at all (missing column,
/// unparseable cell, arithmetic error). The two must never be conflated:
/// a failed record has no trustworthy recomputed values to display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RecordStatus {
    Valid,
    Invalid { reason: String },
    Failed { error: EngineError },
}

impl RecordStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, RecordStatus::Valid)
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordStatus::Valid => write!(f, "Valid"),
            RecordStatus::Invalid { reason } => write!(f, "Invalid - {reason}"),
            RecordStatus::Failed { error } => write!(f, "Error - {error}"),
        }
    }
}

/// One failed tolerance check: the reported field, what the engine
/// recomputed (expected) and what the input reported (actual).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Discrepancy {
    pub field: String,
    pub expected: f64,
    pub actual: f64,
}

/// The reported/derived value pair for one configured field, carried on
/// every result for downstream display whether or not it tripped a check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldComparison {
    pub reported_field: String,
    pub derived_field: String,
    pub recomputed: f64,
    pub reported: f64,
}

/// The complete outcome for one input record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub transaction_id: String,
    pub status: RecordStatus,
    pub discrepancies: Vec<Discrepancy>,
    /// One entry per tolerance-configured field, in validation order.
    pub values: Vec<FieldComparison>,
    /// Caller-requested input columns, preserved verbatim.
    pub passthrough: BTreeMap<String, String>,
}

impl ValidationResult {
    /// A result for a record that could not be evaluated.
    pub fn failed(transaction_id: String, error: EngineError) -> Self {
        Self {
            transaction_id,
            status: RecordStatus::Failed { error },
            discrepancies: Vec::new(),
            values: Vec::new(),
            passthrough: BTreeMap::new(),
        }
    }
}
