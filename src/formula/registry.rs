//! The fixed, ordered registry of derived-field formulas.
//!
//! Each entry declares its inputs by name and carries an explicit
//! reported/derived field pairing, so both the evaluation order and the
//! reconciliation lookup are data, not naming-convention string games.
//! The sequence below is a valid topological order over the declared
//! inputs; `topology::verify` checks that rather than trusting it.

use crate::numeric::{checked_div, ArithmeticError};
use crate::schema as s;

/// The bidirectional association between a reported field and the derived
/// field recomputed for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPair {
    pub reported: &'static str,
    pub derived: &'static str,
}

/// One named, pure derived-field formula.
///
/// `inputs` lists, in argument order, the field names the formula reads:
/// reported fields or derived fields produced earlier in the registry.
/// The asymmetry in which steps read a derived value and which read the
/// reported one (e.g. `RC_COGs` reads reported `Client_Receive`, not
/// `RC_Client_Receive`) is deliberate and must stay exactly as declared.
#[derive(Debug, Clone, Copy)]
pub struct FormulaDef {
    pub fields: FieldPair,
    pub inputs: &'static [&'static str],
    pub eval: fn(&[f64]) -> Result<f64, ArithmeticError>,
}

fn reference_sell_rate(a: &[f64]) -> Result<f64, ArithmeticError> {
    Ok(a[0] * (100.0 + a[1]) / 100.0)
}

fn deposit_amount_usd(a: &[f64]) -> Result<f64, ArithmeticError> {
    Ok(a[0] * a[1])
}

fn client_receive(a: &[f64]) -> Result<f64, ArithmeticError> {
    checked_div(a[0], a[1])
}

fn product(a: &[f64]) -> Result<f64, ArithmeticError> {
    Ok(a[0] * a[1])
}

/// Shared shape of the five markup-component formulas:
/// `rate / total_markup * (revenue - cogs)`.
fn markup_value(a: &[f64]) -> Result<f64, ArithmeticError> {
    Ok(checked_div(a[0], a[1])? * (a[2] - a[3]))
}

static REGISTRY: [FormulaDef; 10] = [
    FormulaDef {
        fields: FieldPair { reported: s::REFERENCE_SELL_RATE, derived: s::RC_REFERENCE_SELL_RATE },
        inputs: &[s::REFERENCE_BUY_RATE, s::TOTAL_MARKUP],
        eval: reference_sell_rate,
    },
    FormulaDef {
        fields: FieldPair { reported: s::DEPOSIT_AMOUNT_USD, derived: s::RC_DEPOSIT_AMOUNT_USD },
        inputs: &[s::DEPOSIT_AMOUNT_OC, s::BUY_TOKEN_USD_RATE],
        eval: deposit_amount_usd,
    },
    FormulaDef {
        fields: FieldPair { reported: s::CLIENT_RECEIVE, derived: s::RC_CLIENT_RECEIVE },
        inputs: &[s::RC_DEPOSIT_AMOUNT_USD, s::RC_REFERENCE_SELL_RATE],
        eval: client_receive,
    },
    FormulaDef {
        fields: FieldPair { reported: s::COGS, derived: s::RC_COGS },
        inputs: &[s::CLIENT_RECEIVE, s::REFERENCE_BUY_RATE],
        eval: product,
    },
    FormulaDef {
        fields: FieldPair { reported: s::REVENUE, derived: s::RC_REVENUE },
        inputs: &[s::CLIENT_RECEIVE, s::RC_REFERENCE_SELL_RATE],
        eval: product,
    },
    FormulaDef {
        fields: FieldPair { reported: s::MARKUP_1_VALUE, derived: s::RC_MARKUP_1_VALUE },
        inputs: &[s::MARKUP_RATE_1, s::TOTAL_MARKUP, s::REVENUE, s::COGS],
        eval: markup_value,
    },
    FormulaDef {
        fields: FieldPair { reported: s::MARKUP_2_VALUE, derived: s::RC_MARKUP_2_VALUE },
        inputs: &[s::MARKUP_RATE_2, s::TOTAL_MARKUP, s::REVENUE, s::COGS],
        eval: markup_value,
    },
    FormulaDef {
        fields: FieldPair { reported: s::MARKUP_3_VALUE, derived: s::RC_MARKUP_3_VALUE },
        inputs: &[s::MARKUP_RATE_3, s::TOTAL_MARKUP, s::REVENUE, s::COGS],
        eval: markup_value,
    },
    FormulaDef {
        fields: FieldPair { reported: s::MARKUP_4_VALUE, derived: s::RC_MARKUP_4_VALUE },
        inputs: &[s::MARKUP_RATE_4, s::TOTAL_MARKUP, s::REVENUE, s::COGS],
        eval: markup_value,
    },
    FormulaDef {
        fields: FieldPair { reported: s::MARKUP_5_VALUE, derived: s::RC_MARKUP_5_VALUE },
        inputs: &[s::MARKUP_RATE_5, s::TOTAL_MARKUP, s::REVENUE, s::COGS],
        eval: markup_value,
    },
];

/// The formula table in evaluation order.
pub fn registry() -> &'static [FormulaDef] {
    debug_assert!(super::topology::verify(&REGISTRY).is_ok());
    &REGISTRY
}

/// Looks up the field pairing for a derived-field name. `None` for names
/// the registry does not produce (those fields are not validated).
pub fn pair_for_derived(derived: &str) -> Option<FieldPair> {
    REGISTRY.iter().find(|def| def.fields.derived == derived).map(|def| def.fields)
}
