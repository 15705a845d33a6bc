//! The mock API dispatcher.
//!
//! Translates REST-shaped calls (verb, path, query string, JSON body) into
//! session-store operations, mirroring the real backend's route table so
//! the client can swap it in for the network transport. Every call first
//! awaits an artificial latency delay to preserve the UI's loading-state
//! behavior; the delay is cancellable through a [`CancellationToken`].
//!
//! Routing policy: single-resource GETs (and the rule toggle) raise
//! [`DemoError::NotFound`] for a missing id; update/delete of a missing id
//! degrade to a permissive empty success; unmatched routes return an empty
//! payload instead of an error.

mod filter;

pub use filter::{parse_query, CustomerQuery, SortOrder};

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use rand::Rng;
use serde_json::{json, Value};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::error::{DemoError, DemoResult};
use crate::store::SessionStore;
use crate::types::{
    CouponDraft, CustomerDraft, FeedbackDraft, PointsDraft, RuleDraft, SegmentDraft,
    TemplateDraft, WalletDraft,
};

/// The verb surface of a generic HTTP client. The real network transport
/// and [`MockApiClient`] both implement it, so demo mode substitutes
/// transparently.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// GET a path (query string included in `url`).
    async fn get(&self, url: &str) -> DemoResult<Value>;
    /// POST a JSON body to a path.
    async fn post(&self, url: &str, body: Value) -> DemoResult<Value>;
    /// PUT a JSON body to a path.
    async fn put(&self, url: &str, body: Value) -> DemoResult<Value>;
    /// DELETE a path.
    async fn delete(&self, url: &str) -> DemoResult<Value>;
}

/// Artificial latency range applied before each dispatched call.
#[derive(Debug, Clone, Copy)]
pub struct Latency {
    min: Duration,
    max: Duration,
}

impl Latency {
    /// A uniform delay range in milliseconds. `min` and `max` may be equal.
    pub fn from_millis(min: u64, max: u64) -> Self {
        Self {
            min: Duration::from_millis(min.min(max)),
            max: Duration::from_millis(min.max(max)),
        }
    }

    /// No delay; for tests.
    pub fn none() -> Self {
        Self::from_millis(0, 0)
    }

    fn sample(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        rand::thread_rng().gen_range(self.min..=self.max)
    }
}

impl Default for Latency {
    fn default() -> Self {
        Self::from_millis(200, 400)
    }
}

/// In-memory stand-in for the HTTP client, bound to a shared session
/// store.
#[derive(Clone)]
pub struct MockApiClient {
    store: Arc<Mutex<SessionStore>>,
    latency: Latency,
    cancel: CancellationToken,
}

impl MockApiClient {
    /// Bind a client to a shared store with the default latency.
    pub fn new(store: Arc<Mutex<SessionStore>>) -> Self {
        Self::with_latency(store, Latency::default())
    }

    /// Bind a client with an explicit latency range.
    pub fn with_latency(store: Arc<Mutex<SessionStore>>, latency: Latency) -> Self {
        Self {
            store,
            latency,
            cancel: CancellationToken::new(),
        }
    }

    /// Token that aborts in-flight calls while they await their delay. A
    /// cancelled call returns [`DemoError::Cancelled`] without touching
    /// the store.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Await the artificial latency, honoring cancellation.
    async fn pause(&self) -> DemoResult<()> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(DemoError::cancelled("mock api call")),
            _ = sleep(self.latency.sample()) => Ok(()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SessionStore> {
        // The store mutex cannot be poisoned: no store operation panics.
        self.store.lock().unwrap()
    }
}

#[async_trait]
impl ApiTransport for MockApiClient {
    async fn get(&self, url: &str) -> DemoResult<Value> {
        self.pause().await?;
        let (path, query) = split_url(url);
        let params = parse_query(query);
        debug!("mock GET {}", path);
        let store = self.lock();

        match path {
            "/auth/me" => to_value(store.user()),
            "/customers" => {
                let query = CustomerQuery::from_params(&params);
                Ok(Value::Array(query.apply(store.customers(), Utc::now())?))
            }
            // Must match ahead of the /customers/{id} wildcard.
            "/customers/segments/stats" => to_value(&store.segment_stats()),
            p if p.starts_with("/customers/") => {
                let id = path_segment(p, 2);
                match store.customer(id) {
                    Some(customer) => to_value(customer),
                    None => Err(DemoError::not_found(format!("customer {}", id))),
                }
            }
            "/segments" => {
                let segments = store
                    .segments()
                    .iter()
                    .map(|segment| {
                        let mut value = serde_json::to_value(segment)?;
                        if let Some(fields) = value.as_object_mut() {
                            fields.insert(
                                "customer_count".to_string(),
                                json!(store.segment_customer_count(segment)),
                            );
                        }
                        Ok(value)
                    })
                    .collect::<DemoResult<Vec<_>>>()?;
                Ok(Value::Array(segments))
            }
            "/points" => to_value(
                &store.points_transactions(params.get("customer_id").map(String::as_str)),
            ),
            "/wallet" => to_value(
                &store.wallet_transactions(params.get("customer_id").map(String::as_str)),
            ),
            "/coupons" => to_value(&store.coupons()),
            p if p.starts_with("/coupons/") => {
                let id = path_segment(p, 2);
                match store.coupons().iter().find(|c| c.id == id) {
                    Some(coupon) => to_value(coupon),
                    None => Err(DemoError::not_found(format!("coupon {}", id))),
                }
            }
            "/feedback" => to_value(&store.feedback()),
            "/whatsapp/templates" => to_value(&store.templates()),
            p if p.starts_with("/whatsapp/templates/") => {
                let id = path_segment(p, 3);
                match store.templates().iter().find(|t| t.id == id) {
                    Some(template) => to_value(template),
                    None => Err(DemoError::not_found(format!("template {}", id))),
                }
            }
            "/whatsapp/automation" => to_value(&store.automation_rules()),
            "/whatsapp/automation/events" => to_value(&store.automation_events()),
            p if p.starts_with("/whatsapp/automation/") => {
                let id = path_segment(p, 3);
                match store.automation_rules().iter().find(|r| r.id == id) {
                    Some(rule) => to_value(rule),
                    None => Err(DemoError::not_found(format!("rule {}", id))),
                }
            }
            "/loyalty/settings" => to_value(store.loyalty_settings()),
            "/analytics/dashboard" => to_value(&store.analytics()),
            "/qr/generate" => {
                let url = format!(
                    "https://demo.restaurant.com/register?ref={}",
                    store.user().id
                );
                Ok(json!({ "qr_data": url, "url": url }))
            }
            _ => {
                debug!("unmatched GET {}; serving empty list", path);
                Ok(Value::Array(Vec::new()))
            }
        }
    }

    async fn post(&self, url: &str, body: Value) -> DemoResult<Value> {
        self.pause().await?;
        let (path, _) = split_url(url);
        debug!("mock POST {}", path);
        let mut store = self.lock();

        match path {
            "/auth/login" => Ok(json!({
                "access_token": "demo-token",
                "user": serde_json::to_value(store.user())?,
            })),
            "/customers" => {
                let draft: CustomerDraft = serde_json::from_value(body)?;
                to_value(&store.add_customer(draft))
            }
            "/segments" => {
                let draft: SegmentDraft = serde_json::from_value(body)?;
                to_value(&store.add_segment(draft))
            }
            "/points" => {
                let draft: PointsDraft = serde_json::from_value(body)?;
                to_value(&store.add_points_transaction(draft))
            }
            "/wallet" => {
                let draft: WalletDraft = serde_json::from_value(body)?;
                to_value(&store.add_wallet_transaction(draft))
            }
            "/coupons" => {
                let draft: CouponDraft = serde_json::from_value(body)?;
                to_value(&store.add_coupon(draft))
            }
            "/feedback" => {
                let draft: FeedbackDraft = serde_json::from_value(body)?;
                to_value(&store.add_feedback(draft))
            }
            "/whatsapp/templates" => {
                let draft: TemplateDraft = serde_json::from_value(body)?;
                to_value(&store.add_template(draft))
            }
            "/whatsapp/automation" => {
                let draft: RuleDraft = serde_json::from_value(body)?;
                to_value(&store.add_rule(draft))
            }
            p if p.starts_with("/whatsapp/automation/") && p.ends_with("/toggle") => {
                let id = path_segment(p, 3);
                to_value(&store.toggle_rule(id)?)
            }
            _ => {
                debug!("unmatched POST {}; serving empty object", path);
                Ok(json!({}))
            }
        }
    }

    async fn put(&self, url: &str, body: Value) -> DemoResult<Value> {
        self.pause().await?;
        let (path, _) = split_url(url);
        debug!("mock PUT {}", path);
        let mut store = self.lock();

        match path {
            p if p.starts_with("/customers/") => {
                let id = path_segment(p, 2);
                permissive(store.update_customer(id, &body))?;
                match store.customer(id) {
                    Some(customer) => to_value(customer),
                    None => Ok(json!({})),
                }
            }
            p if p.starts_with("/coupons/") => {
                let id = path_segment(p, 2);
                permissive(store.update_coupon(id, &body))?;
                match store.coupons().iter().find(|c| c.id == id) {
                    Some(coupon) => to_value(coupon),
                    None => Ok(json!({})),
                }
            }
            p if p.starts_with("/whatsapp/templates/") => {
                let id = path_segment(p, 3);
                permissive(store.update_template(id, &body))?;
                match store.templates().iter().find(|t| t.id == id) {
                    Some(template) => to_value(template),
                    None => Ok(json!({})),
                }
            }
            p if p.starts_with("/whatsapp/automation/") => {
                let id = path_segment(p, 3);
                permissive(store.update_rule(id, &body))?;
                match store.automation_rules().iter().find(|r| r.id == id) {
                    Some(rule) => to_value(rule),
                    None => Ok(json!({})),
                }
            }
            "/loyalty/settings" => {
                store.update_loyalty_settings(&body)?;
                to_value(store.loyalty_settings())
            }
            _ => {
                debug!("unmatched PUT {}; serving empty object", path);
                Ok(json!({}))
            }
        }
    }

    async fn delete(&self, url: &str) -> DemoResult<Value> {
        self.pause().await?;
        let (path, _) = split_url(url);
        debug!("mock DELETE {}", path);
        let mut store = self.lock();

        match path {
            p if p.starts_with("/customers/") => {
                permissive(store.delete_customer(path_segment(p, 2)))?;
                Ok(json!({ "message": "Customer deleted" }))
            }
            p if p.starts_with("/segments/") => {
                permissive(store.delete_segment(path_segment(p, 2)))?;
                Ok(json!({ "message": "Segment deleted" }))
            }
            p if p.starts_with("/coupons/") => {
                permissive(store.delete_coupon(path_segment(p, 2)))?;
                Ok(json!({ "message": "Coupon deleted" }))
            }
            p if p.starts_with("/whatsapp/templates/") => {
                permissive(store.delete_template(path_segment(p, 3)))?;
                Ok(json!({ "message": "Template deleted" }))
            }
            p if p.starts_with("/whatsapp/automation/") => {
                permissive(store.delete_rule(path_segment(p, 3)))?;
                Ok(json!({ "message": "Rule deleted" }))
            }
            _ => {
                debug!("unmatched DELETE {}; serving empty object", path);
                Ok(json!({}))
            }
        }
    }
}

/// Split an url into path and query string at the first `?`.
fn split_url(url: &str) -> (&str, &str) {
    match url.split_once('?') {
        Some((path, query)) => (path, query),
        None => (url, ""),
    }
}

/// Nth `/`-separated segment of a path (`/customers/{id}` → segment 2).
fn path_segment(path: &str, index: usize) -> &str {
    path.split('/').nth(index).unwrap_or("")
}

/// Downgrade a missing-id result to a permissive no-op; other errors
/// propagate.
fn permissive(result: DemoResult<()>) -> DemoResult<()> {
    match result {
        Err(DemoError::NotFound(what)) => {
            debug!("permissive no-op for missing {}", what);
            Ok(())
        }
        other => other,
    }
}

fn to_value<T: serde::Serialize>(record: T) -> DemoResult<Value> {
    Ok(serde_json::to_value(record)?)
}
