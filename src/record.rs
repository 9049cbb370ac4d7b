//! One transaction record: its reported fields and, after recalculation,
//! its derived fields.

use std::collections::HashMap;

use serde::Serialize;

use crate::engine::EngineError;
use crate::schema;
use crate::table::Table;

/// A single transaction under reconciliation.
///
/// Reported fields are parsed from one input row; derived fields are
/// inserted under their `RC_`-marked names during recalculation. Both
/// resolve through [`Record::get`], which is what lets a formula read a
/// previously-derived value and a reported one through the same lookup.
/// A record is never mutated after its result has been produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    transaction_id: String,
    values: HashMap<String, f64>,
}

impl Record {
    /// Builds a record from one table row.
    ///
    /// The `Transaction ID` cell is required; without it the record is
    /// identified by its row position in the error. Every cell whose
    /// column is in the numeric schema must parse as a finite `f64`;
    /// non-finite inputs are rejected here so a NaN can never slide
    /// through a tolerance comparison unnoticed. Empty cells read as
    /// missing, not unparseable.
    pub fn from_row(table: &Table, row: &[String], row_index: usize) -> Result<Self, EngineError> {
        let transaction_id = match table.cell(row, schema::TRANSACTION_ID) {
            Some(id) if !id.trim().is_empty() => id.trim().to_string(),
            _ => {
                return Err(EngineError::MissingField {
                    field: schema::TRANSACTION_ID.to_string(),
                    transaction_id: format!("row {row_index}"),
                })
            }
        };

        let mut values = HashMap::new();
        for (idx, column) in table.columns().iter().enumerate() {
            if !schema::is_numeric_field(column) {
                continue;
            }
            let Some(cell) = row.get(idx) else { continue };
            if cell.trim().is_empty() {
                continue;
            }
            match cell.trim().parse::<f64>() {
                Ok(value) if value.is_finite() => {
                    values.insert(column.clone(), value);
                }
                _ => {
                    return Err(EngineError::UnparseableValue {
                        field: column.clone(),
                        transaction_id,
                        raw: cell.clone(),
                    })
                }
            }
        }

        Ok(Self { transaction_id, values })
    }

    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    /// Resolves a field by exact name, reported or derived alike.
    pub fn get(&self, field: &str) -> Option<f64> {
        self.values.get(field).copied()
    }

    /// Like [`Record::get`] but produces the engine's resolution failure.
    pub fn require(&self, field: &str) -> Result<f64, EngineError> {
        self.get(field).ok_or_else(|| EngineError::MissingField {
            field: field.to_string(),
            transaction_id: self.transaction_id.clone(),
        })
    }

    /// Stores one recomputed value under its derived name.
    pub fn insert_derived(&mut self, field: &str, value: f64) {
        self.values.insert(field.to_string(), value);
    }

    #[cfg(test)]
    pub fn set(&mut self, field: &str, value: f64) {
        self.values.insert(field.to_string(), value);
    }

    #[cfg(test)]
    pub fn from_pairs(transaction_id: &str, pairs: &[(&str, f64)]) -> Self {
        Self {
            transaction_id: transaction_id.to_string(),
            values: pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }
}
