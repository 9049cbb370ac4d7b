//! Batch runner: one table in, one result set out.
//!
//! Records are independent, so the fan-out is a plain parallel map with
//! no shared mutable state. The indexed map keeps results in input-row
//! order for reproducible comparisons downstream.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::Serialize;

use crate::config::{ConfigError, ToleranceConfig};
use crate::engine::RecalcEngine;
use crate::formula::registry;
use crate::record::Record;
use crate::schema;
use crate::table::Table;
use crate::validation::{ValidationResult, Validator};

/// The outcome of one reconciliation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub results: Vec<ValidationResult>,
}

impl RunReport {
    /// Records whose status is anything other than `Valid`, failed
    /// evaluations included. The collaborator-side summary statistic.
    pub fn invalid_count(&self) -> usize {
        self.results.iter().filter(|r| !r.status.is_valid()).count()
    }
}

/// Reconciles every row of `table` against the formula registry.
///
/// Configuration problems fail the whole run before any record is
/// touched; everything after that is per-record. Each result carries the
/// raw cells of every requested `passthrough` column present in the
/// table, verbatim and uninterpreted.
pub fn validate_table(
    table: &Table,
    config: &ToleranceConfig,
    passthrough: &[String],
) -> Result<RunReport, ConfigError> {
    config.validate()?;

    let engine = RecalcEngine::new(registry());
    let validator = Validator::new(config);

    let results = table
        .rows()
        .par_iter()
        .enumerate()
        .map(|(row_index, row)| {
            let mut result = reconcile_row(table, row, row_index, &engine, &validator);
            result.passthrough = collect_passthrough(table, row, passthrough);
            result
        })
        .collect();

    Ok(RunReport { results })
}

fn reconcile_row(
    table: &Table,
    row: &[String],
    row_index: usize,
    engine: &RecalcEngine<'_>,
    validator: &Validator<'_>,
) -> ValidationResult {
    let mut record = match Record::from_row(table, row, row_index) {
        Ok(record) => record,
        Err(error) => return ValidationResult::failed(row_id(table, row, row_index), error),
    };
    let transaction_id = record.transaction_id().to_string();

    if let Err(error) = engine.recalculate(&mut record) {
        return ValidationResult::failed(transaction_id, error);
    }
    match validator.validate(&record) {
        Ok(result) => result,
        Err(error) => ValidationResult::failed(transaction_id, error),
    }
}

/// Best-effort identifier for a row whose record never got built.
fn row_id(table: &Table, row: &[String], row_index: usize) -> String {
    match table.cell(row, schema::TRANSACTION_ID) {
        Some(id) if !id.trim().is_empty() => id.trim().to_string(),
        _ => format!("row {row_index}"),
    }
}

fn collect_passthrough(
    table: &Table,
    row: &[String],
    passthrough: &[String],
) -> BTreeMap<String, String> {
    passthrough
        .iter()
        .filter_map(|column| {
            table.cell(row, column).map(|cell| (column.clone(), cell.to_string()))
        })
        .collect()
}
