use serde::{Deserialize, Serialize};

use super::customer::Customer;
use super::marketing::{AutomationEvent, AutomationRule, Coupon, Feedback, Segment, WhatsAppTemplate};
use super::settings::{DemoUser, LoyaltySettings};
use super::transaction::{PointsTransaction, WalletTransaction};

/// The complete demo session dataset. Owned by the session store for the
/// lifetime of demo mode and discarded on disable; transaction-like
/// collections are kept newest-first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub user: DemoUser,
    pub customers: Vec<Customer>,
    pub points_transactions: Vec<PointsTransaction>,
    pub wallet_transactions: Vec<WalletTransaction>,
    pub coupons: Vec<Coupon>,
    pub segments: Vec<Segment>,
    pub feedback: Vec<Feedback>,
    pub whatsapp_templates: Vec<WhatsAppTemplate>,
    pub automation_rules: Vec<AutomationRule>,
    pub loyalty_settings: LoyaltySettings,
    pub automation_events: Vec<AutomationEvent>,
}

impl Dataset {
    /// An empty dataset with default user and settings. Test scaffolding
    /// and a base for injecting deterministic fixtures.
    pub fn empty() -> Self {
        Self {
            user: DemoUser::default(),
            customers: Vec::new(),
            points_transactions: Vec::new(),
            wallet_transactions: Vec::new(),
            coupons: Vec::new(),
            segments: Vec::new(),
            feedback: Vec::new(),
            whatsapp_templates: Vec::new(),
            automation_rules: Vec::new(),
            loyalty_settings: LoyaltySettings::default(),
            automation_events: Vec::new(),
        }
    }
}
