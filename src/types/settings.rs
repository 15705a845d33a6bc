use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Singleton loyalty-program configuration. Updates arrive as partial
/// patches and are shallow-merged by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoyaltySettings {
    pub points_per_rupee: i64,
    pub redemption_rate: i64,
    pub min_points_to_redeem: i64,
    pub points_expiry_days: i64,
    pub birthday_bonus_points: i64,
    pub anniversary_bonus_points: i64,
    pub first_visit_bonus: i64,
    pub bronze_earning_percentage: i64,
    pub silver_earning_percentage: i64,
    pub gold_earning_percentage: i64,
    pub platinum_earning_percentage: i64,
    pub bronze_threshold: i64,
    pub silver_threshold: i64,
    pub gold_threshold: i64,
    pub platinum_threshold: i64,
    pub off_peak_hours_start: String,
    pub off_peak_hours_end: String,
    pub off_peak_bonus_percentage: i64,
}

impl Default for LoyaltySettings {
    fn default() -> Self {
        Self {
            points_per_rupee: 1,
            redemption_rate: 1,
            min_points_to_redeem: 100,
            points_expiry_days: 365,
            birthday_bonus_points: 100,
            anniversary_bonus_points: 150,
            first_visit_bonus: 50,
            bronze_earning_percentage: 100,
            silver_earning_percentage: 110,
            gold_earning_percentage: 125,
            platinum_earning_percentage: 150,
            bronze_threshold: 0,
            silver_threshold: 5_000,
            gold_threshold: 15_000,
            platinum_threshold: 30_000,
            off_peak_hours_start: "14:00".to_string(),
            off_peak_hours_end: "17:00".to_string(),
            off_peak_bonus_percentage: 20,
        }
    }
}

/// The fixed account returned by the mock auth endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoUser {
    pub id: String,
    pub email: String,
    pub restaurant_name: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

impl Default for DemoUser {
    fn default() -> Self {
        Self {
            id: "demo-user-1".to_string(),
            email: "demo@restaurant.com".to_string(),
            restaurant_name: "Demo Restaurant".to_string(),
            phone: "+919876543210".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }
}

/// Dashboard aggregates, recomputed from live data on every read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analytics {
    pub total_customers: usize,
    pub new_customers_7d: usize,
    pub active_customers_30d: usize,
    pub total_points_issued: i64,
    pub total_points_redeemed: i64,
    /// Mean feedback rating to one decimal place; `None` without feedback.
    pub avg_rating: Option<f64>,
}

/// Customer count per tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierBreakdown {
    pub bronze: usize,
    pub silver: usize,
    pub gold: usize,
    pub platinum: usize,
}

/// Customer count per billing classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeBreakdown {
    pub normal: usize,
    pub corporate: usize,
}

/// Tier/type/inactivity breakdown served by `/customers/segments/stats`,
/// recomputed from live data on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentStats {
    pub total: usize,
    pub by_tier: TierBreakdown,
    pub by_type: TypeBreakdown,
    pub inactive_30_days: usize,
}
