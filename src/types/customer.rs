use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Ordered loyalty classification, driven by cumulative spend.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumString,
)]
pub enum Tier {
    /// Total spend below 5 000
    Bronze,
    /// Total spend below 15 000
    Silver,
    /// Total spend below 30 000
    Gold,
    /// Total spend of 30 000 and above
    Platinum,
}

impl Tier {
    /// Tier assigned for a given cumulative spend at creation time.
    /// Later accumulator mutations do not re-derive the tier.
    pub fn for_spend(total_spent: i64) -> Self {
        if total_spent < 5_000 {
            Tier::Bronze
        } else if total_spent < 15_000 {
            Tier::Silver
        } else if total_spent < 30_000 {
            Tier::Gold
        } else {
            Tier::Platinum
        }
    }
}

/// Billing classification of a customer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CustomerType {
    /// Individual walk-in customer
    #[default]
    Normal,
    /// Corporate account with GST details
    Corporate,
}

/// A loyalty-program member as stored in the session dataset.
///
/// Accumulators (`total_points`, `total_spent`, `visits`, `wallet_balance`)
/// are updated by the store's composite transaction operations.
/// `wallet_balance` is signed: debits are applied without clamping, so it
/// may go negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub country_code: String,
    pub email: Option<String>,
    pub total_points: i64,
    pub total_spent: i64,
    pub visits: u32,
    pub tier: Tier,
    pub last_visit: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub customer_type: CustomerType,
    pub gst_name: Option<String>,
    pub gst_number: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub pincode: Option<String>,
    pub dob: Option<NaiveDate>,
    pub anniversary: Option<NaiveDate>,
    pub allergies: Option<Vec<String>>,
    pub notes: Option<String>,
    pub wallet_balance: i64,
    pub custom_field_1: Option<String>,
    pub custom_field_2: Option<String>,
    pub custom_field_3: Option<String>,
}

/// Caller-supplied fields for creating a customer through the mock API.
/// Accumulators start at zero and the tier starts at Bronze.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerDraft {
    pub name: String,
    pub phone: String,
    #[serde(default = "default_country_code")]
    pub country_code: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub customer_type: CustomerType,
    #[serde(default)]
    pub gst_name: Option<String>,
    #[serde(default)]
    pub gst_number: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub pincode: Option<String>,
    #[serde(default)]
    pub dob: Option<NaiveDate>,
    #[serde(default)]
    pub anniversary: Option<NaiveDate>,
    #[serde(default)]
    pub allergies: Option<Vec<String>>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub custom_field_1: Option<String>,
    #[serde(default)]
    pub custom_field_2: Option<String>,
    #[serde(default)]
    pub custom_field_3: Option<String>,
}

fn default_country_code() -> String {
    "+91".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_thresholds() {
        assert_eq!(Tier::for_spend(0), Tier::Bronze);
        assert_eq!(Tier::for_spend(4_999), Tier::Bronze);
        assert_eq!(Tier::for_spend(5_000), Tier::Silver);
        assert_eq!(Tier::for_spend(14_999), Tier::Silver);
        assert_eq!(Tier::for_spend(15_000), Tier::Gold);
        assert_eq!(Tier::for_spend(29_999), Tier::Gold);
        assert_eq!(Tier::for_spend(30_000), Tier::Platinum);
    }

    #[test]
    fn tier_parses_from_query_value() {
        assert_eq!("Gold".parse::<Tier>().unwrap(), Tier::Gold);
        assert!("gold".parse::<Tier>().is_err());
    }
}
