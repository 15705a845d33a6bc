//! Derived aggregates recomputed from live collections.
//!
//! Nothing in this module is ever persisted; every read reflects the
//! dataset at the moment of the call.

use chrono::{DateTime, Duration, Utc};

use crate::types::{
    Analytics, Customer, CustomerType, Feedback, PointsTransaction, PointsType, SegmentFilters,
    SegmentStats, Tier, TierBreakdown, TypeBreakdown,
};

/// Dashboard aggregates over the live collections.
pub fn compute_analytics(
    customers: &[Customer],
    points_transactions: &[PointsTransaction],
    feedback: &[Feedback],
    now: DateTime<Utc>,
) -> Analytics {
    let new_customers_7d = customers
        .iter()
        .filter(|c| now - c.created_at <= Duration::days(7))
        .count();
    let active_customers_30d = customers
        .iter()
        .filter(|c| now - c.last_visit <= Duration::days(30))
        .count();

    let total_points_issued = points_transactions
        .iter()
        .filter(|t| matches!(t.kind, PointsType::Earned | PointsType::Bonus))
        .map(|t| t.points.abs())
        .sum();
    let total_points_redeemed = points_transactions
        .iter()
        .filter(|t| t.kind == PointsType::Redeemed)
        .map(|t| t.points.abs())
        .sum();

    let avg_rating = if feedback.is_empty() {
        None
    } else {
        let sum: u32 = feedback.iter().map(|f| u32::from(f.rating)).sum();
        let mean = f64::from(sum) / feedback.len() as f64;
        Some((mean * 10.0).round() / 10.0)
    };

    Analytics {
        total_customers: customers.len(),
        new_customers_7d,
        active_customers_30d,
        total_points_issued,
        total_points_redeemed,
        avg_rating,
    }
}

/// Tier/type/inactivity breakdown over the live customer collection.
pub fn compute_segment_stats(customers: &[Customer], now: DateTime<Utc>) -> SegmentStats {
    let tier_count = |tier: Tier| customers.iter().filter(|c| c.tier == tier).count();
    let type_count =
        |kind: CustomerType| customers.iter().filter(|c| c.customer_type == kind).count();

    SegmentStats {
        total: customers.len(),
        by_tier: TierBreakdown {
            bronze: tier_count(Tier::Bronze),
            silver: tier_count(Tier::Silver),
            gold: tier_count(Tier::Gold),
            platinum: tier_count(Tier::Platinum),
        },
        by_type: TypeBreakdown {
            normal: type_count(CustomerType::Normal),
            corporate: type_count(CustomerType::Corporate),
        },
        inactive_30_days: customers
            .iter()
            .filter(|c| now - c.last_visit >= Duration::days(30))
            .count(),
    }
}

/// Number of live customers matching a segment's filter predicate.
///
/// Single-field precedence: the first present key wins, checked in the
/// order tier, customer_type, last_visit_days, city. A segment with no
/// filter keys matches everyone.
pub fn segment_customer_count(
    customers: &[Customer],
    filters: &SegmentFilters,
    now: DateTime<Utc>,
) -> usize {
    if let Some(tier) = filters.tier {
        return customers.iter().filter(|c| c.tier == tier).count();
    }
    if let Some(kind) = filters.customer_type {
        return customers.iter().filter(|c| c.customer_type == kind).count();
    }
    if let Some(days) = filters.last_visit_days {
        let cutoff = now - Duration::days(days);
        return customers.iter().filter(|c| c.last_visit < cutoff).count();
    }
    if let Some(city) = &filters.city {
        return customers
            .iter()
            .filter(|c| c.city.as_deref() == Some(city.as_str()))
            .count();
    }
    customers.len()
}
