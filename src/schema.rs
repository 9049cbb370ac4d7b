//! Canonical field names for deposit transaction records.
//!
//! Field resolution is by exact column name (case- and punctuation-
//! sensitive), so every name lives here once and the rest of the crate
//! imports it. Derived fields carry the `RC_` recalculation marker; the
//! authoritative pairing between a derived field and its reported
//! counterpart is the `FieldPair` on each formula definition, never
//! string manipulation on these constants.

/// Unique identifier column, required on every row.
pub const TRANSACTION_ID: &str = "Transaction ID";

/// Deposit amount in the deposit currency; the positivity-gated field.
pub const AMOUNT_DC: &str = "Amount_DC";

// --- Reported fields read by formulas ---
pub const REFERENCE_BUY_RATE: &str = "Reference_Buy_Rate";
pub const TOTAL_MARKUP: &str = "Total_Markup";
pub const DEPOSIT_AMOUNT_OC: &str = "Deposit_Amount_OC";
pub const BUY_TOKEN_USD_RATE: &str = "Buy_Token_USD_Rate";
pub const MARKUP_RATE_1: &str = "Markup_Rate_1";
pub const MARKUP_RATE_2: &str = "Markup_Rate_2";
pub const MARKUP_RATE_3: &str = "Markup_Rate_3";
pub const MARKUP_RATE_4: &str = "Markup_Rate_4";
pub const MARKUP_RATE_5: &str = "Markup_Rate_5";

// --- Reported fields reconciled against a recomputed counterpart ---
pub const REFERENCE_SELL_RATE: &str = "Reference_Sell_Rate";
pub const DEPOSIT_AMOUNT_USD: &str = "Deposit_Amount_USD";
pub const CLIENT_RECEIVE: &str = "Client_Receive";
pub const COGS: &str = "COGs";
pub const REVENUE: &str = "Revenue";
pub const MARKUP_1_VALUE: &str = "Markup_1_Value";
pub const MARKUP_2_VALUE: &str = "Markup_2_Value";
pub const MARKUP_3_VALUE: &str = "Markup_3_Value";
pub const MARKUP_4_VALUE: &str = "Markup_4_Value";
pub const MARKUP_5_VALUE: &str = "Markup_5_Value";

// --- Derived fields produced by the registry ---
pub const RC_REFERENCE_SELL_RATE: &str = "RC_Reference_Sell_Rate";
pub const RC_DEPOSIT_AMOUNT_USD: &str = "RC_Deposit_Amount_USD";
pub const RC_CLIENT_RECEIVE: &str = "RC_Client_Receive";
pub const RC_COGS: &str = "RC_COGs";
pub const RC_REVENUE: &str = "RC_Revenue";
pub const RC_MARKUP_1_VALUE: &str = "RC_Markup_1_Value";
pub const RC_MARKUP_2_VALUE: &str = "RC_Markup_2_Value";
pub const RC_MARKUP_3_VALUE: &str = "RC_Markup_3_Value";
pub const RC_MARKUP_4_VALUE: &str = "RC_Markup_4_Value";
pub const RC_MARKUP_5_VALUE: &str = "RC_Markup_5_Value";

// --- Transfer-check fields ---
// Transfer tables are a separate upload with their own id column and
// naming style; the names are preserved verbatim, punctuation included.
pub const RECORD_ID: &str = "Record ID";
pub const TRANSACTION_FEE_OC: &str = "Transaction Fee Oc";
pub const TRANSACTION_FEE_RATE: &str = "Transaction Fee - Rate";
pub const TRANSFER_AMOUNT_DC: &str = "Transfer Amount DC";
pub const DESTINATION_AMOUNT_DC: &str = "Destination Amount DC";
pub const ORIGINAL_CURRENCY_OC: &str = "Original Currency - OC";
pub const DESTINATION_CURRENCY_DC: &str = "Destination Currency - DC";

/// Every reported column that must parse as a number when present.
/// Columns outside this set (and the id column) are passthrough data the
/// engine preserves verbatim but never interprets.
pub const NUMERIC_FIELDS: &[&str] = &[
    AMOUNT_DC,
    REFERENCE_BUY_RATE,
    TOTAL_MARKUP,
    DEPOSIT_AMOUNT_OC,
    BUY_TOKEN_USD_RATE,
    CLIENT_RECEIVE,
    DEPOSIT_AMOUNT_USD,
    REFERENCE_SELL_RATE,
    COGS,
    REVENUE,
    MARKUP_RATE_1,
    MARKUP_RATE_2,
    MARKUP_RATE_3,
    MARKUP_RATE_4,
    MARKUP_RATE_5,
    MARKUP_1_VALUE,
    MARKUP_2_VALUE,
    MARKUP_3_VALUE,
    MARKUP_4_VALUE,
    MARKUP_5_VALUE,
];

/// True when `name` is a reported column the record parser must interpret
/// numerically.
pub fn is_numeric_field(name: &str) -> bool {
    NUMERIC_FIELDS.contains(&name)
}
