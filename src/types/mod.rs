//! Core type definitions for the demo-mode dataset

mod customer;
mod dataset;
mod marketing;
mod settings;
mod transaction;

pub use customer::{Customer, CustomerDraft, CustomerType, Tier};
pub use dataset::Dataset;
pub use marketing::{
    extract_template_variables, AutomationEvent, AutomationRule, Coupon, CouponDraft,
    DiscountType, Feedback, FeedbackDraft, RuleDraft, Segment, SegmentDraft, SegmentFilters,
    TemplateDraft, WhatsAppTemplate,
};
pub use settings::{Analytics, DemoUser, LoyaltySettings, SegmentStats, TierBreakdown, TypeBreakdown};
pub use transaction::{
    PointsDraft, PointsTransaction, PointsType, WalletDirection, WalletDraft, WalletTransaction,
};

use uuid::Uuid;

/// Mint a session-unique id with an entity-kind prefix (`customer-…`,
/// `points-…`, `coupon-…`). Ids are never reused within a session.
pub fn fresh_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4())
}
