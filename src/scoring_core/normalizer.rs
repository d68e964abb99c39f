//! Transaction normalization from raw ledger records to USD-valued events

use super::tokens::decimals_for;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One of the five actions that get a dedicated per-wallet bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RecognizedAction {
    #[serde(rename = "deposit")]
    Deposit,
    #[serde(rename = "borrow")]
    Borrow,
    #[serde(rename = "repay")]
    Repay,
    #[serde(rename = "redeemunderlying")]
    RedeemUnderlying,
    #[serde(rename = "liquidationcall")]
    LiquidationCall,
}

impl RecognizedAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecognizedAction::Deposit => "deposit",
            RecognizedAction::Borrow => "borrow",
            RecognizedAction::Repay => "repay",
            RecognizedAction::RedeemUnderlying => "redeemunderlying",
            RecognizedAction::LiquidationCall => "liquidationcall",
        }
    }

    /// Exact, case-sensitive match against the ledger's action names
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "deposit" => Some(RecognizedAction::Deposit),
            "borrow" => Some(RecognizedAction::Borrow),
            "repay" => Some(RecognizedAction::Repay),
            "redeemunderlying" => Some(RecognizedAction::RedeemUnderlying),
            "liquidationcall" => Some(RecognizedAction::LiquidationCall),
            _ => None,
        }
    }

    pub fn all() -> [RecognizedAction; 5] {
        [
            RecognizedAction::Deposit,
            RecognizedAction::Borrow,
            RecognizedAction::Repay,
            RecognizedAction::RedeemUnderlying,
            RecognizedAction::LiquidationCall,
        ]
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// Canonical action: a recognized bucket or free text passed through as-is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Recognized(RecognizedAction),
    Other(String),
}

impl Action {
    pub fn parse(s: &str) -> Self {
        match RecognizedAction::from_str(s) {
            Some(action) => Action::Recognized(action),
            None => Action::Other(s.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Action::Recognized(action) => action.as_str(),
            Action::Other(s) => s,
        }
    }

    pub fn recognized(&self) -> Option<RecognizedAction> {
        match self {
            Action::Recognized(action) => Some(*action),
            Action::Other(_) => None,
        }
    }
}

/// Why a record never reached the aggregator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Record is not a JSON object or has mistyped top-level fields
    MalformedRecord,
    /// No wallet identifier under either naming convention
    MissingWallet,
    /// Action data is not an object, or amount/price is not numeric
    MalformedPayload,
    /// Amount and price parsed but the product is NaN or infinite
    NonFiniteValue,
    UnparsableTimestamp,
}

impl DropReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DropReason::MalformedRecord => "malformed_record",
            DropReason::MissingWallet => "missing_wallet",
            DropReason::MalformedPayload => "malformed_payload",
            DropReason::NonFiniteValue => "non_finite_value",
            DropReason::UnparsableTimestamp => "unparsable_timestamp",
        }
    }
}

/// A loosely typed scalar as it appears in the ledger.
///
/// Amounts, prices and timestamps show up either as JSON numbers or as
/// string-encoded decimals; anything else (null, objects, arrays) lands in
/// `Other` and is treated as unparsable.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    #[default]
    #[serde(skip)]
    Absent,
    Number(f64),
    Text(String),
    Other(Value),
}

impl Scalar {
    /// Numeric reading of the field. `None` means present but unparsable.
    pub fn as_number(&self, absent: f64) -> Option<f64> {
        match self {
            Scalar::Absent => Some(absent),
            Scalar::Number(n) => Some(*n),
            Scalar::Text(s) => s.trim().parse::<f64>().ok(),
            Scalar::Other(_) => None,
        }
    }
}

/// Nested `actionData` payload
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ActionData {
    #[serde(rename = "assetSymbol", default)]
    pub asset_symbol: Option<Value>,
    #[serde(default)]
    pub amount: Scalar,
    #[serde(rename = "assetPriceUSD", default)]
    pub asset_price_usd: Scalar,
}

impl ActionData {
    /// Parse a payload; only JSON objects are structurally valid
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }

    pub fn symbol(&self) -> Option<&str> {
        self.asset_symbol.as_ref().and_then(Value::as_str)
    }
}

/// One ledger record after the typed parse step
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawTransaction {
    #[serde(rename = "userWallet", alias = "wallet", default)]
    pub wallet: Option<String>,
    #[serde(rename = "_id", alias = "id", default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub timestamp: Scalar,
    #[serde(rename = "actionData", default)]
    pub action_data: Option<Value>,
}

impl RawTransaction {
    /// Typed parse of a single ledger entry
    pub fn from_value(value: Value) -> Result<Self, DropReason> {
        if !value.is_object() {
            return Err(DropReason::MalformedRecord);
        }

        let raw: RawTransaction =
            serde_json::from_value(value).map_err(|_| DropReason::MalformedRecord)?;

        if raw.wallet.is_none() {
            return Err(DropReason::MissingWallet);
        }

        Ok(raw)
    }

    /// Record id rendered as text; Mongo-style `{"$oid": ..}` ids are unwrapped
    pub fn record_id(&self) -> Option<String> {
        match self.id.as_ref()? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Object(map) => map.get("$oid").and_then(Value::as_str).map(str::to_string),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTransaction {
    pub wallet: String,
    pub id: Option<String>,
    pub action: Action,
    pub timestamp: Option<i64>,
    /// USD value (never negative), or the reason it is unavailable
    pub value_usd: Result<f64, DropReason>,
}

impl NormalizedTransaction {
    /// Why this transaction is excluded downstream, if it is
    pub fn drop_reason(&self) -> Option<DropReason> {
        if let Err(reason) = self.value_usd {
            return Some(reason);
        }
        if self.timestamp.is_none() {
            return Some(DropReason::UnparsableTimestamp);
        }
        None
    }

    pub fn is_valid(&self) -> bool {
        self.drop_reason().is_none()
    }
}

/// Convert a raw amount in the asset's smallest unit into USD.
///
/// Zero or negative prices give an explicit 0.0. A malformed payload or a
/// negative amount gives `Err(MalformedPayload)`.
pub fn compute_usd_value(action_data: Option<&Value>) -> Result<f64, DropReason> {
    let data = action_data
        .and_then(ActionData::from_value)
        .ok_or(DropReason::MalformedPayload)?;

    let decimals = decimals_for(data.symbol());
    let amount = data
        .amount
        .as_number(0.0)
        .filter(|amount| amount.is_nan() || *amount >= 0.0)
        .ok_or(DropReason::MalformedPayload)?;
    let price = data
        .asset_price_usd
        .as_number(0.0)
        .ok_or(DropReason::MalformedPayload)?;

    if price.is_nan() || price <= 0.0 {
        return Ok(0.0);
    }

    let value = (amount / 10f64.powi(decimals as i32)) * price;
    if !value.is_finite() {
        return Err(DropReason::NonFiniteValue);
    }

    Ok(value)
}

/// Timestamp in whole seconds; fractional seconds are truncated
pub fn parse_timestamp(timestamp: &Scalar) -> Option<i64> {
    match timestamp {
        Scalar::Text(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc() as i64)
            })
        }
        Scalar::Number(n) if n.is_finite() => Some(n.trunc() as i64),
        _ => None,
    }
}

pub fn normalize(raw: RawTransaction) -> NormalizedTransaction {
    let value_usd = compute_usd_value(raw.action_data.as_ref());
    let timestamp = parse_timestamp(&raw.timestamp);
    let id = raw.record_id();

    NormalizedTransaction {
        wallet: raw.wallet.unwrap_or_default(),
        id,
        action: Action::parse(raw.action.as_deref().unwrap_or_default()),
        timestamp,
        value_usd,
    }
}

/// Per-reason tally of dropped records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DropTally {
    pub malformed_record: usize,
    pub missing_wallet: usize,
    pub malformed_payload: usize,
    pub non_finite_value: usize,
    pub unparsable_timestamp: usize,
}

impl DropTally {
    pub fn record(&mut self, reason: DropReason) {
        match reason {
            DropReason::MalformedRecord => self.malformed_record += 1,
            DropReason::MissingWallet => self.missing_wallet += 1,
            DropReason::MalformedPayload => self.malformed_payload += 1,
            DropReason::NonFiniteValue => self.non_finite_value += 1,
            DropReason::UnparsableTimestamp => self.unparsable_timestamp += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.malformed_record
            + self.missing_wallet
            + self.malformed_payload
            + self.non_finite_value
            + self.unparsable_timestamp
    }

    /// Records that never got a USD value
    pub fn missing_value(&self) -> usize {
        self.malformed_payload + self.non_finite_value
    }
}

#[derive(Debug, Clone)]
pub struct NormalizationReport {
    /// Surviving transactions only
    pub transactions: Vec<NormalizedTransaction>,
    pub input_count: usize,
    pub dropped: DropTally,
}

/// Parse and normalize a whole batch, keeping only usable transactions
pub fn normalize_all(records: Vec<Value>) -> NormalizationReport {
    let input_count = records.len();
    let mut dropped = DropTally::default();
    let mut transactions = Vec::with_capacity(input_count);

    for record in records {
        let normalized = match RawTransaction::from_value(record) {
            Ok(raw) => normalize(raw),
            Err(reason) => {
                log::debug!("Dropping record: {}", reason.as_str());
                dropped.record(reason);
                continue;
            }
        };

        match normalized.drop_reason() {
            Some(reason) => {
                log::debug!(
                    "Dropping transaction {:?} for {}: {}",
                    normalized.id,
                    normalized.wallet,
                    reason.as_str()
                );
                dropped.record(reason);
            }
            None => transactions.push(normalized),
        }
    }

    NormalizationReport {
        transactions,
        input_count,
        dropped,
    }
}
