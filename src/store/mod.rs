//! The mutable session store backing demo mode.
//!
//! Holds exactly one [`Dataset`] for the lifetime of a demo session and
//! exposes typed per-entity operations. Mutations run to completion
//! synchronously within one call, so composite updates (a transaction plus
//! its customer accumulator bump) are never observable half-applied.
//!
//! Update/delete against a missing id return an explicit
//! [`DemoError::NotFound`]; callers decide whether to surface or swallow it.

pub mod derived;

use chrono::Utc;
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{DemoError, DemoResult};
use crate::types::{
    extract_template_variables, fresh_id, Analytics, AutomationEvent, AutomationRule, Coupon,
    CouponDraft, Customer, CustomerDraft, Dataset, DemoUser, Feedback, FeedbackDraft,
    LoyaltySettings, PointsDraft, PointsTransaction, RuleDraft, Segment, SegmentDraft,
    SegmentStats, TemplateDraft, Tier, WalletDraft, WalletTransaction, WhatsAppTemplate,
};

/// Owns the demo dataset and applies all mutations against it.
#[derive(Debug)]
pub struct SessionStore {
    dataset: Dataset,
}

impl SessionStore {
    /// Wrap a generated (or injected) dataset.
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }

    /// Read-only view of the whole dataset.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// The fixed demo account.
    pub fn user(&self) -> &DemoUser {
        &self.dataset.user
    }

    // --- Customers -------------------------------------------------------

    pub fn customers(&self) -> &[Customer] {
        &self.dataset.customers
    }

    pub fn customer(&self, id: &str) -> Option<&Customer> {
        self.dataset.customers.iter().find(|c| c.id == id)
    }

    /// Create a customer from a draft. Accumulators start at zero and the
    /// tier starts at Bronze; both visit timestamps are set to now.
    pub fn add_customer(&mut self, draft: CustomerDraft) -> Customer {
        let now = Utc::now();
        let customer = Customer {
            id: fresh_id("customer"),
            name: draft.name,
            phone: draft.phone,
            country_code: draft.country_code,
            email: draft.email,
            total_points: 0,
            total_spent: 0,
            visits: 0,
            tier: Tier::Bronze,
            last_visit: now,
            created_at: now,
            customer_type: draft.customer_type,
            gst_name: draft.gst_name,
            gst_number: draft.gst_number,
            city: draft.city,
            address: draft.address,
            pincode: draft.pincode,
            dob: draft.dob,
            anniversary: draft.anniversary,
            allergies: draft.allergies,
            notes: draft.notes,
            wallet_balance: 0,
            custom_field_1: draft.custom_field_1,
            custom_field_2: draft.custom_field_2,
            custom_field_3: draft.custom_field_3,
        };
        self.dataset.customers.push(customer.clone());
        customer
    }

    pub fn update_customer(&mut self, id: &str, patch: &Value) -> DemoResult<()> {
        let customer = self
            .dataset
            .customers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| DemoError::not_found(format!("customer {}", id)))?;
        merge_patch(customer, patch)
    }

    pub fn delete_customer(&mut self, id: &str) -> DemoResult<()> {
        remove_by_id(&mut self.dataset.customers, id, |c| &c.id, "customer")
    }

    // --- Points ledger ---------------------------------------------------

    /// Points transactions, optionally scoped to one customer.
    pub fn points_transactions(&self, customer_id: Option<&str>) -> Vec<PointsTransaction> {
        match customer_id {
            Some(id) => self
                .dataset
                .points_transactions
                .iter()
                .filter(|t| t.customer_id == id)
                .cloned()
                .collect(),
            None => self.dataset.points_transactions.clone(),
        }
    }

    /// Append a points transaction (newest-first) and update the owning
    /// customer in the same call: total_points by the signed delta, visits
    /// by one, last_visit to the transaction timestamp.
    pub fn add_points_transaction(&mut self, draft: PointsDraft) -> PointsTransaction {
        let now = Utc::now();
        let customer_name = match self
            .dataset
            .customers
            .iter_mut()
            .find(|c| c.id == draft.customer_id)
        {
            Some(customer) => {
                customer.total_points += draft.points;
                customer.visits += 1;
                customer.last_visit = now;
                customer.name.clone()
            }
            None => {
                warn!(
                    "points transaction references unknown customer {}; accumulators not updated",
                    draft.customer_id
                );
                String::new()
            }
        };
        let transaction = PointsTransaction {
            id: fresh_id("points"),
            customer_id: draft.customer_id,
            customer_name,
            points: draft.points,
            kind: draft.kind,
            reason: draft.reason,
            created_at: now,
            bill_amount: draft.bill_amount,
        };
        self.dataset.points_transactions.insert(0, transaction.clone());
        transaction
    }

    // --- Wallet ledger ---------------------------------------------------

    /// Wallet transactions, optionally scoped to one customer.
    pub fn wallet_transactions(&self, customer_id: Option<&str>) -> Vec<WalletTransaction> {
        match customer_id {
            Some(id) => self
                .dataset
                .wallet_transactions
                .iter()
                .filter(|t| t.customer_id == id)
                .cloned()
                .collect(),
            None => self.dataset.wallet_transactions.clone(),
        }
    }

    /// Append a wallet transaction (newest-first) and bump the owning
    /// customer's balance by `amount + bonus_amount` in the same call.
    /// The balance is not clamped; debits may drive it negative.
    pub fn add_wallet_transaction(&mut self, draft: WalletDraft) -> WalletTransaction {
        let now = Utc::now();
        let customer_name = match self
            .dataset
            .customers
            .iter_mut()
            .find(|c| c.id == draft.customer_id)
        {
            Some(customer) => {
                customer.wallet_balance += draft.amount + draft.bonus_amount.unwrap_or(0);
                customer.name.clone()
            }
            None => {
                warn!(
                    "wallet transaction references unknown customer {}; balance not updated",
                    draft.customer_id
                );
                String::new()
            }
        };
        let transaction = WalletTransaction {
            id: fresh_id("wallet"),
            customer_id: draft.customer_id,
            customer_name,
            amount: draft.amount,
            kind: draft.kind,
            reason: draft.reason,
            created_at: now,
            bonus_amount: draft.bonus_amount,
        };
        self.dataset.wallet_transactions.insert(0, transaction.clone());
        transaction
    }

    // --- Coupons ---------------------------------------------------------

    pub fn coupons(&self) -> &[Coupon] {
        &self.dataset.coupons
    }

    pub fn add_coupon(&mut self, draft: CouponDraft) -> Coupon {
        let coupon = Coupon {
            id: fresh_id("coupon"),
            code: draft.code,
            description: draft.description,
            discount_type: draft.discount_type,
            discount_value: draft.discount_value,
            min_order_value: draft.min_order_value,
            max_discount: draft.max_discount,
            usage_limit: draft.usage_limit,
            used_count: 0,
            valid_from: draft.valid_from,
            valid_until: draft.valid_until,
            channels: draft.channels,
            tier_restriction: draft.tier_restriction,
            is_active: draft.is_active,
            created_at: Utc::now(),
        };
        self.dataset.coupons.push(coupon.clone());
        coupon
    }

    pub fn update_coupon(&mut self, id: &str, patch: &Value) -> DemoResult<()> {
        let coupon = self
            .dataset
            .coupons
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| DemoError::not_found(format!("coupon {}", id)))?;
        merge_patch(coupon, patch)
    }

    pub fn delete_coupon(&mut self, id: &str) -> DemoResult<()> {
        remove_by_id(&mut self.dataset.coupons, id, |c| &c.id, "coupon")
    }

    // --- Segments --------------------------------------------------------

    pub fn segments(&self) -> &[Segment] {
        &self.dataset.segments
    }

    pub fn add_segment(&mut self, draft: SegmentDraft) -> Segment {
        let segment = Segment {
            id: fresh_id("segment"),
            name: draft.name,
            filters: draft.filters,
            created_at: Utc::now(),
        };
        self.dataset.segments.push(segment.clone());
        segment
    }

    pub fn delete_segment(&mut self, id: &str) -> DemoResult<()> {
        remove_by_id(&mut self.dataset.segments, id, |s| &s.id, "segment")
    }

    // --- Feedback --------------------------------------------------------

    pub fn feedback(&self) -> &[Feedback] {
        &self.dataset.feedback
    }

    pub fn add_feedback(&mut self, draft: FeedbackDraft) -> Feedback {
        let customer_name = if draft.customer_name.is_empty() {
            self.customer(&draft.customer_id)
                .map(|c| c.name.clone())
                .unwrap_or_default()
        } else {
            draft.customer_name
        };
        let feedback = Feedback {
            id: fresh_id("feedback"),
            customer_id: draft.customer_id,
            customer_name,
            rating: draft.rating,
            comments: draft.comments,
            created_at: Utc::now(),
        };
        self.dataset.feedback.insert(0, feedback.clone());
        feedback
    }

    // --- WhatsApp templates ------------------------------------------------

    pub fn templates(&self) -> &[WhatsAppTemplate] {
        &self.dataset.whatsapp_templates
    }

    pub fn add_template(&mut self, draft: TemplateDraft) -> WhatsAppTemplate {
        let template = WhatsAppTemplate {
            id: fresh_id("template"),
            variables: extract_template_variables(&draft.content),
            name: draft.name,
            content: draft.content,
            created_at: Utc::now(),
        };
        self.dataset.whatsapp_templates.push(template.clone());
        template
    }

    /// Patch a template. The variable list is re-derived whenever the
    /// content changes, so it can never go stale.
    pub fn update_template(&mut self, id: &str, patch: &Value) -> DemoResult<()> {
        let template = self
            .dataset
            .whatsapp_templates
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| DemoError::not_found(format!("template {}", id)))?;
        merge_patch(template, patch)?;
        template.variables = extract_template_variables(&template.content);
        Ok(())
    }

    pub fn delete_template(&mut self, id: &str) -> DemoResult<()> {
        remove_by_id(
            &mut self.dataset.whatsapp_templates,
            id,
            |t| &t.id,
            "template",
        )
    }

    // --- Automation rules --------------------------------------------------

    pub fn automation_rules(&self) -> &[AutomationRule] {
        &self.dataset.automation_rules
    }

    pub fn automation_events(&self) -> &[AutomationEvent] {
        &self.dataset.automation_events
    }

    pub fn add_rule(&mut self, draft: RuleDraft) -> AutomationRule {
        let template_name = draft.template_name.or_else(|| {
            self.dataset
                .whatsapp_templates
                .iter()
                .find(|t| t.id == draft.template_id)
                .map(|t| t.name.clone())
        });
        let rule = AutomationRule {
            id: fresh_id("rule"),
            event: draft.event,
            template_id: draft.template_id,
            template_name,
            is_enabled: draft.is_enabled,
            delay_minutes: draft.delay_minutes,
            created_at: Utc::now(),
        };
        self.dataset.automation_rules.push(rule.clone());
        rule
    }

    pub fn update_rule(&mut self, id: &str, patch: &Value) -> DemoResult<()> {
        let rule = self
            .dataset
            .automation_rules
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| DemoError::not_found(format!("rule {}", id)))?;
        merge_patch(rule, patch)
    }

    /// Flip a rule's enabled flag, returning the updated rule.
    pub fn toggle_rule(&mut self, id: &str) -> DemoResult<AutomationRule> {
        let rule = self
            .dataset
            .automation_rules
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| DemoError::not_found(format!("rule {}", id)))?;
        rule.is_enabled = !rule.is_enabled;
        Ok(rule.clone())
    }

    pub fn delete_rule(&mut self, id: &str) -> DemoResult<()> {
        remove_by_id(&mut self.dataset.automation_rules, id, |r| &r.id, "rule")
    }

    // --- Settings ----------------------------------------------------------

    pub fn loyalty_settings(&self) -> &LoyaltySettings {
        &self.dataset.loyalty_settings
    }

    /// Shallow-merge a patch into the settings singleton.
    pub fn update_loyalty_settings(&mut self, patch: &Value) -> DemoResult<()> {
        merge_patch(&mut self.dataset.loyalty_settings, patch)
    }

    // --- Derived reads -----------------------------------------------------

    /// Dashboard aggregates against live data.
    pub fn analytics(&self) -> Analytics {
        derived::compute_analytics(
            &self.dataset.customers,
            &self.dataset.points_transactions,
            &self.dataset.feedback,
            Utc::now(),
        )
    }

    /// Tier/type/inactivity breakdown against live data.
    pub fn segment_stats(&self) -> SegmentStats {
        derived::compute_segment_stats(&self.dataset.customers, Utc::now())
    }

    /// Live matching-customer count for one segment.
    pub fn segment_customer_count(&self, segment: &Segment) -> usize {
        derived::segment_customer_count(&self.dataset.customers, &segment.filters, Utc::now())
    }
}

/// Shallow-merge the fields of a JSON object patch into a typed record.
/// Non-object patches are rejected; unknown fields are dropped on the way
/// back into the typed representation.
fn merge_patch<T>(record: &mut T, patch: &Value) -> DemoResult<()>
where
    T: Serialize + DeserializeOwned,
{
    let fields = patch
        .as_object()
        .ok_or_else(|| DemoError::invalid_input("patch must be a JSON object"))?;
    let mut value = serde_json::to_value(&*record)?;
    match value.as_object_mut() {
        Some(base) => {
            for (key, field) in fields {
                base.insert(key.clone(), field.clone());
            }
        }
        None => return Err(DemoError::invalid_input("record is not a JSON object")),
    }
    *record = serde_json::from_value(value)?;
    Ok(())
}

fn remove_by_id<T>(
    collection: &mut Vec<T>,
    id: &str,
    key: impl Fn(&T) -> &String,
    what: &str,
) -> DemoResult<()> {
    match collection.iter().position(|item| key(item) == id) {
        Some(index) => {
            collection.remove(index);
            Ok(())
        }
        None => Err(DemoError::not_found(format!("{} {}", what, id))),
    }
}
