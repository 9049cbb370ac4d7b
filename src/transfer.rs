//! Transfer-transaction checking: the second, simpler reconciliation.
//!
//! Transfer tables are a separate upload with their own schema. One
//! derived field is recomputed (the original-currency transaction fee,
//! `Transaction Fee - Rate * Transfer Amount DC`) and compared under a
//! mixed relative/absolute tolerance; the transfer and destination
//! amounts must match exactly, as must the two currency codes. The
//! report carries per-check mismatch counts alongside the usual
//! fully-matching summary.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::Serialize;

use crate::engine::EngineError;
use crate::numeric::is_close;
use crate::schema;
use crate::table::Table;

/// Default fee tolerances: relative slack scaling with the recomputed
/// fee, plus an absolute floor for near-zero fees.
pub const FEE_RTOL: f64 = 1e-5;
pub const FEE_ATOL: f64 = 1e-8;

/// The three per-record checks, evaluated independently; none
/// short-circuits the others.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferChecks {
    pub reported_fee: f64,
    pub recalculated_fee: f64,
    /// `reported - recalculated`, carried for display even when matching.
    pub fee_difference: f64,
    pub fee_matching: bool,
    pub amount_matching: bool,
    pub currency_matching: bool,
}

impl TransferChecks {
    pub fn all_matching(&self) -> bool {
        self.fee_matching && self.amount_matching && self.currency_matching
    }
}

/// Outcome for one transfer row. `Failed` is a record that could not be
/// evaluated (missing column, unparseable cell), never conflated with a
/// record whose checks ran and mismatched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TransferOutcome {
    Checked(TransferChecks),
    Failed { error: EngineError },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferResult {
    pub record_id: String,
    pub outcome: TransferOutcome,
    /// Caller-requested input columns, preserved verbatim.
    pub passthrough: BTreeMap<String, String>,
}

/// Per-check mismatch counts for the run summary. Failed records are
/// not attributed to individual checks; they could not be evaluated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MismatchBreakdown {
    pub fee: usize,
    pub amount: usize,
    pub currency: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferReport {
    pub results: Vec<TransferResult>,
}

impl TransferReport {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Records where every check ran and matched.
    pub fn fully_matching(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(&r.outcome, TransferOutcome::Checked(c) if c.all_matching()))
            .count()
    }

    /// Everything else: mismatching and failed records alike.
    pub fn non_matching(&self) -> usize {
        self.total() - self.fully_matching()
    }

    pub fn mismatch_breakdown(&self) -> MismatchBreakdown {
        let mut breakdown = MismatchBreakdown::default();
        for result in &self.results {
            if let TransferOutcome::Checked(checks) = &result.outcome {
                breakdown.fee += usize::from(!checks.fee_matching);
                breakdown.amount += usize::from(!checks.amount_matching);
                breakdown.currency += usize::from(!checks.currency_matching);
            }
        }
        breakdown
    }
}

/// Checks transfer rows: fee recomputation under `rtol`/`atol`, exact
/// amount equality, and currency equality.
pub struct TransferCheck {
    rtol: f64,
    atol: f64,
}

impl Default for TransferCheck {
    fn default() -> Self {
        Self { rtol: FEE_RTOL, atol: FEE_ATOL }
    }
}

impl TransferCheck {
    pub fn with_fee_tolerance(rtol: f64, atol: f64) -> Self {
        Self { rtol, atol }
    }

    /// Checks every row of `table`. Rows are independent; failures stay
    /// per-record. Results preserve input-row order.
    pub fn check_table(&self, table: &Table, passthrough: &[String]) -> TransferReport {
        let results = table
            .rows()
            .par_iter()
            .enumerate()
            .map(|(row_index, row)| {
                let record_id = row_id(table, row, row_index);
                let outcome = match self.check_row(table, row, &record_id) {
                    Ok(checks) => TransferOutcome::Checked(checks),
                    Err(error) => TransferOutcome::Failed { error },
                };
                TransferResult {
                    record_id,
                    outcome,
                    passthrough: collect_passthrough(table, row, passthrough),
                }
            })
            .collect();
        TransferReport { results }
    }

    fn check_row(
        &self,
        table: &Table,
        row: &[String],
        record_id: &str,
    ) -> Result<TransferChecks, EngineError> {
        let fee_rate = numeric_cell(table, row, schema::TRANSACTION_FEE_RATE, record_id)?;
        let transfer_amount = numeric_cell(table, row, schema::TRANSFER_AMOUNT_DC, record_id)?;
        let destination_amount =
            numeric_cell(table, row, schema::DESTINATION_AMOUNT_DC, record_id)?;
        let reported_fee = numeric_cell(table, row, schema::TRANSACTION_FEE_OC, record_id)?;
        let original_currency = text_cell(table, row, schema::ORIGINAL_CURRENCY_OC, record_id)?;
        let destination_currency =
            text_cell(table, row, schema::DESTINATION_CURRENCY_DC, record_id)?;

        let recalculated_fee = fee_rate * transfer_amount;

        Ok(TransferChecks {
            reported_fee,
            recalculated_fee,
            fee_difference: reported_fee - recalculated_fee,
            fee_matching: is_close(reported_fee, recalculated_fee, self.rtol, self.atol),
            amount_matching: transfer_amount == destination_amount,
            currency_matching: original_currency == destination_currency,
        })
    }
}

/// Best-effort identifier for a row, `row <n>` when the id cell is absent.
fn row_id(table: &Table, row: &[String], row_index: usize) -> String {
    match table.cell(row, schema::RECORD_ID) {
        Some(id) if !id.trim().is_empty() => id.trim().to_string(),
        _ => format!("row {row_index}"),
    }
}

fn numeric_cell(
    table: &Table,
    row: &[String],
    field: &str,
    record_id: &str,
) -> Result<f64, EngineError> {
    let cell = text_cell(table, row, field, record_id)?;
    match cell.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(EngineError::UnparseableValue {
            field: field.to_string(),
            transaction_id: record_id.to_string(),
            raw: cell.to_string(),
        }),
    }
}

fn text_cell<'a>(
    table: &'a Table,
    row: &'a [String],
    field: &str,
    record_id: &str,
) -> Result<&'a str, EngineError> {
    match table.cell(row, field).map(str::trim) {
        Some(cell) if !cell.is_empty() => Ok(cell),
        _ => Err(EngineError::MissingField {
            field: field.to_string(),
            transaction_id: record_id.to_string(),
        }),
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
