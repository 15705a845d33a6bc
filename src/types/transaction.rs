use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Kind of a points ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PointsType {
    Earned,
    Redeemed,
    Bonus,
    Expired,
    Adjusted,
}

/// An immutable points ledger entry. The signed `points` delta is negative
/// for redemptions; appending one through the store also updates the owning
/// customer's accumulators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointsTransaction {
    pub id: String,
    pub customer_id: String,
    pub customer_name: String,
    pub points: i64,
    #[serde(rename = "type")]
    pub kind: PointsType,
    pub reason: String,
    pub created_at: DateTime<Utc>,
    pub bill_amount: Option<i64>,
}

/// Caller-supplied fields for appending a points transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointsDraft {
    pub customer_id: String,
    pub points: i64,
    #[serde(rename = "type")]
    pub kind: PointsType,
    pub reason: String,
    #[serde(default)]
    pub bill_amount: Option<i64>,
}

/// Direction of a wallet ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WalletDirection {
    Credit,
    Debit,
}

/// A wallet ledger entry. `amount` is negative for debits; `bonus_amount`
/// only accompanies credits. Appending one through the store bumps the
/// owning customer's balance by `amount + bonus_amount`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletTransaction {
    pub id: String,
    pub customer_id: String,
    pub customer_name: String,
    pub amount: i64,
    #[serde(rename = "type")]
    pub kind: WalletDirection,
    pub reason: String,
    pub created_at: DateTime<Utc>,
    pub bonus_amount: Option<i64>,
}

/// Caller-supplied fields for appending a wallet transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletDraft {
    pub customer_id: String,
    pub amount: i64,
    #[serde(rename = "type")]
    pub kind: WalletDirection,
    pub reason: String,
    #[serde(default)]
    pub bonus_amount: Option<i64>,
}
