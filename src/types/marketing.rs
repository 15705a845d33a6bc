use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{Display, EnumString};

use super::customer::{CustomerType, Tier};

/// How a coupon's discount is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DiscountType {
    Percentage,
    Fixed,
}

/// A discount coupon. `used_count` is incremented by redemption flows
/// outside this layer; the store only carries it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coupon {
    pub id: String,
    pub code: String,
    pub description: String,
    pub discount_type: DiscountType,
    pub discount_value: i64,
    pub min_order_value: Option<i64>,
    pub max_discount: Option<i64>,
    pub usage_limit: Option<i64>,
    pub used_count: i64,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub channels: Vec<String>,
    #[serde(default)]
    pub tier_restriction: Option<Tier>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied fields for creating a coupon. `used_count` starts at 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponDraft {
    pub code: String,
    #[serde(default)]
    pub description: String,
    pub discount_type: DiscountType,
    pub discount_value: i64,
    #[serde(default)]
    pub min_order_value: Option<i64>,
    #[serde(default)]
    pub max_discount: Option<i64>,
    #[serde(default)]
    pub usage_limit: Option<i64>,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    #[serde(default)]
    pub channels: Vec<String>,
    #[serde(default)]
    pub tier_restriction: Option<Tier>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Structured filter predicate of a [Segment]. Evaluation applies
/// single-field precedence: the first present key wins, checked in the
/// order tier, customer_type, last_visit_days, city.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SegmentFilters {
    #[serde(default)]
    pub tier: Option<Tier>,
    #[serde(default)]
    pub customer_type: Option<CustomerType>,
    /// Inactivity threshold in days. The web form submits this as a string,
    /// so both `"30"` and `30` must deserialize.
    #[serde(default, deserialize_with = "de_lenient_days")]
    pub last_visit_days: Option<i64>,
    #[serde(default)]
    pub city: Option<String>,
}

/// A named, live-evaluated filter over the customer collection. The
/// matching customer count is never stored; it is recomputed on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub id: String,
    pub name: String,
    pub filters: SegmentFilters,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied fields for creating a segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentDraft {
    pub name: String,
    #[serde(default)]
    pub filters: SegmentFilters,
}

/// A customer feedback entry (rating 1-5 plus free text).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub id: String,
    pub customer_id: String,
    pub customer_name: String,
    pub rating: u8,
    pub comments: String,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied fields for recording feedback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackDraft {
    pub customer_id: String,
    #[serde(default)]
    pub customer_name: String,
    pub rating: u8,
    #[serde(default)]
    pub comments: String,
}

/// A WhatsApp message template. `variables` is derived from the
/// `{{placeholder}}` occurrences in `content`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhatsAppTemplate {
    pub id: String,
    pub name: String,
    pub content: String,
    pub variables: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied fields for creating a template. The variable list is
/// derived server-side from the content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateDraft {
    pub name: String,
    pub content: String,
}

/// A binding from a business event to a message template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationRule {
    pub id: String,
    pub event: String,
    pub template_id: String,
    #[serde(default)]
    pub template_name: Option<String>,
    pub is_enabled: bool,
    pub delay_minutes: i64,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied fields for creating an automation rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleDraft {
    pub event: String,
    pub template_id: String,
    #[serde(default)]
    pub template_name: Option<String>,
    #[serde(default = "default_true")]
    pub is_enabled: bool,
    #[serde(default)]
    pub delay_minutes: i64,
}

/// One entry of the fixed automation event vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationEvent {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// Extract distinct `{{variable}}` placeholders from template content, in
/// order of first appearance. Malformed openers without a closer are
/// ignored.
pub fn extract_template_variables(content: &str) -> Vec<String> {
    let mut variables: Vec<String> = Vec::new();
    let mut rest = content;
    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let name = after[..end].trim();
                if !name.is_empty() && !variables.iter().any(|v| v == name) {
                    variables.push(name.to_string());
                }
                rest = &after[end + 2..];
            }
            None => break,
        }
    }
    variables
}

fn de_lenient_days<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Days {
        Num(i64),
        Text(String),
    }

    match Option::<Days>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Days::Num(n)) => Ok(Some(n)),
        Some(Days::Text(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
