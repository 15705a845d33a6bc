use std::sync::{Arc, Mutex};

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use serde_json::{json, Value};

use loyalty_demo::types::{fresh_id, Customer, CustomerType, Dataset, Tier};
use loyalty_demo::{ApiTransport, DemoError, Latency, MockApiClient, SessionStore};

fn test_customer(
    name: &str,
    phone: &str,
    tier: Tier,
    created_days_ago: i64,
    visit_days_ago: i64,
) -> Customer {
    let now = Utc::now();
    Customer {
        id: fresh_id("customer"),
        name: name.to_string(),
        phone: phone.to_string(),
        country_code: "+91".to_string(),
        email: Some(format!("{}@email.com", name.to_lowercase().replace(' ', "."))),
        total_points: 100,
        total_spent: 1_000,
        visits: 2,
        tier,
        last_visit: now - Duration::days(visit_days_ago),
        created_at: now - Duration::days(created_days_ago),
        customer_type: CustomerType::Normal,
        gst_name: None,
        gst_number: None,
        city: Some("Mumbai".to_string()),
        address: None,
        pincode: None,
        dob: None,
        anniversary: None,
        allergies: None,
        notes: None,
        wallet_balance: 200,
        custom_field_1: None,
        custom_field_2: None,
        custom_field_3: None,
    }
}

/// Store with a known customer population and a zero-latency client.
fn fixture() -> (Arc<Mutex<SessionStore>>, MockApiClient) {
    let mut dataset = Dataset::empty();
    dataset.customers = vec![
        test_customer("Rajesh Sharma", "9811111111", Tier::Gold, 1, 2),
        test_customer("Priya Patel", "9822222222", Tier::Gold, 5, 10),
        test_customer("Amit Kumar", "9833333333", Tier::Gold, 9, 35),
        test_customer("Sneha Iyer", "9844444444", Tier::Gold, 13, 50),
        test_customer("Vikram Rao", "9855555555", Tier::Bronze, 17, 70),
    ];
    let store = Arc::new(Mutex::new(SessionStore::new(dataset)));
    let client = MockApiClient::with_latency(store.clone(), Latency::none());
    (store, client)
}

fn names(list: &Value) -> Vec<&str> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn search_matches_name_phone_and_email_case_insensitively() {
    let (_store, client) = fixture();

    let by_name = client.get("/customers?search=rajesh").await.unwrap();
    assert_eq!(names(&by_name), vec!["Rajesh Sharma"]);

    let by_phone = client.get("/customers?search=982222").await.unwrap();
    assert_eq!(names(&by_phone), vec!["Priya Patel"]);

    let by_email = client.get("/customers?search=AMIT.KUMAR%40email").await.unwrap();
    assert_eq!(names(&by_email), vec!["Amit Kumar"]);

    let none = client.get("/customers?search=nobody").await.unwrap();
    assert!(none.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn tier_filter_with_limit_sorts_newest_first() {
    let (_store, client) = fixture();
    let result = client.get("/customers?tier=Gold&limit=3").await.unwrap();
    let list = result.as_array().unwrap();
    assert_eq!(list.len(), 3);
    for customer in list {
        assert_eq!(customer["tier"], "Gold");
    }
    // Default sort is created_at descending; the limit truncates the head.
    assert_eq!(
        names(&result),
        vec!["Rajesh Sharma", "Priya Patel", "Amit Kumar"]
    );
}

#[tokio::test]
async fn sorting_honors_caller_field_and_direction() {
    let (_store, client) = fixture();
    let result = client
        .get("/customers?sort_by=name&sort_order=asc")
        .await
        .unwrap();
    assert_eq!(
        names(&result),
        vec![
            "Amit Kumar",
            "Priya Patel",
            "Rajesh Sharma",
            "Sneha Iyer",
            "Vikram Rao"
        ]
    );
}

#[tokio::test]
async fn inactivity_filter_is_strictly_older_than() {
    let (_store, client) = fixture();
    let result = client.get("/customers?last_visit_days=30").await.unwrap();
    assert_eq!(
        names(&result),
        vec!["Amit Kumar", "Sneha Iyer", "Vikram Rao"]
    );
}

#[tokio::test]
async fn customer_lookup_and_delete_roundtrip() {
    let (store, client) = fixture();
    let id = store.lock().unwrap().customers()[0].id.clone();

    let found = client.get(&format!("/customers/{}", id)).await.unwrap();
    assert_eq!(found["name"], "Rajesh Sharma");

    client.delete(&format!("/customers/{}", id)).await.unwrap();
    let missing = client.get(&format!("/customers/{}", id)).await;
    assert_matches!(missing, Err(DemoError::NotFound(_)));

    // Deleting again is a permissive no-op.
    let again = client.delete(&format!("/customers/{}", id)).await.unwrap();
    assert_eq!(again["message"], "Customer deleted");
}

#[tokio::test]
async fn segment_counts_are_recomputed_per_read() {
    let (store, client) = fixture();
    client
        .post(
            "/segments",
            json!({"name": "Gold members", "filters": {"tier": "Gold"}}),
        )
        .await
        .unwrap();

    let before = client.get("/segments").await.unwrap();
    assert_eq!(before[0]["customer_count"], 4);

    let bronze_id = store.lock().unwrap().customers()[4].id.clone();
    client
        .put(&format!("/customers/{}", bronze_id), json!({"tier": "Gold"}))
        .await
        .unwrap();

    let after = client.get("/segments").await.unwrap();
    assert_eq!(after[0]["customer_count"], 5);
}

#[tokio::test]
async fn posting_points_updates_the_customer_record() {
    let (store, client) = fixture();
    let id = store.lock().unwrap().customers()[0].id.clone();

    let tx = client
        .post(
            "/points",
            json!({
                "customer_id": id,
                "points": 300,
                "type": "earned",
                "reason": "Bill payment",
                "bill_amount": 3000
            }),
        )
        .await
        .unwrap();
    assert_eq!(tx["points"], 300);
    assert_eq!(tx["customer_name"], "Rajesh Sharma");

    let customer = client.get(&format!("/customers/{}", id)).await.unwrap();
    assert_eq!(customer["total_points"], 400);
    assert_eq!(customer["visits"], 3);

    let scoped = client
        .get(&format!("/points?customer_id={}", id))
        .await
        .unwrap();
    assert_eq!(scoped.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn posting_wallet_credit_applies_bonus() {
    let (store, client) = fixture();
    let id = store.lock().unwrap().customers()[1].id.clone();

    client
        .post(
            "/wallet",
            json!({
                "customer_id": id,
                "amount": 1000,
                "type": "credit",
                "reason": "Wallet top-up",
                "bonus_amount": 100
            }),
        )
        .await
        .unwrap();

    let customer = client.get(&format!("/customers/{}", id)).await.unwrap();
    assert_eq!(customer["wallet_balance"], 1300);
}

#[tokio::test]
async fn settings_read_modify_read() {
    let (_store, client) = fixture();
    let updated = client
        .put("/loyalty/settings", json!({"points_per_rupee": 3}))
        .await
        .unwrap();
    assert_eq!(updated["points_per_rupee"], 3);

    let read_back = client.get("/loyalty/settings").await.unwrap();
    assert_eq!(read_back["points_per_rupee"], 3);
    assert_eq!(read_back["points_expiry_days"], 365);
}

#[tokio::test]
async fn rule_toggle_is_idempotent_when_doubled() {
    let (_store, client) = fixture();
    let template = client
        .post(
            "/whatsapp/templates",
            json!({"name": "Points Earned", "content": "You earned {{points_earned}}"}),
        )
        .await
        .unwrap();
    assert_eq!(template["variables"], json!(["points_earned"]));

    let rule = client
        .post(
            "/whatsapp/automation",
            json!({
                "event": "points_earned",
                "template_id": template["id"],
                "delay_minutes": 5
            }),
        )
        .await
        .unwrap();
    let rule_id = rule["id"].as_str().unwrap();
    assert_eq!(rule["is_enabled"], true);

    let once = client
        .post(&format!("/whatsapp/automation/{}/toggle", rule_id), json!({}))
        .await
        .unwrap();
    assert_eq!(once["is_enabled"], false);

    let twice = client
        .post(&format!("/whatsapp/automation/{}/toggle", rule_id), json!({}))
        .await
        .unwrap();
    assert_eq!(twice["is_enabled"], rule["is_enabled"]);

    let missing = client
        .post("/whatsapp/automation/rule-missing/toggle", json!({}))
        .await;
    assert_matches!(missing, Err(DemoError::NotFound(_)));
}

#[tokio::test]
async fn analytics_reflect_live_mutations() {
    let (store, client) = fixture();
    let before = client.get("/analytics/dashboard").await.unwrap();
    assert_eq!(before["total_customers"], 5);
    assert_eq!(before["total_points_issued"], 0);

    let id = store.lock().unwrap().customers()[0].id.clone();
    client
        .post(
            "/points",
            json!({"customer_id": id, "points": 120, "type": "bonus", "reason": "Birthday bonus"}),
        )
        .await
        .unwrap();

    let after = client.get("/analytics/dashboard").await.unwrap();
    assert_eq!(after["total_points_issued"], 120);
}

#[tokio::test]
async fn auth_and_qr_round_trip() {
    let (_store, client) = fixture();
    let login = client
        .post(
            "/auth/login",
            json!({"email": "demo@restaurant.com", "password": "demo"}),
        )
        .await
        .unwrap();
    assert_eq!(login["access_token"], "demo-token");
    assert_eq!(login["user"]["id"], "demo-user-1");

    let me = client.get("/auth/me").await.unwrap();
    assert_eq!(me["email"], "demo@restaurant.com");

    let qr = client.get("/qr/generate").await.unwrap();
    assert_eq!(
        qr["url"],
        "https://demo.restaurant.com/register?ref=demo-user-1"
    );
}

#[tokio::test]
async fn segment_stats_break_down_live_population() {
    let (_store, client) = fixture();
    let stats = client.get("/customers/segments/stats").await.unwrap();
    assert_eq!(stats["total"], 5);
    assert_eq!(stats["by_tier"]["gold"], 4);
    assert_eq!(stats["by_tier"]["bronze"], 1);
    assert_eq!(stats["by_type"]["normal"], 5);
    assert_eq!(stats["inactive_30_days"], 3);
}

#[tokio::test]
async fn unmatched_routes_degrade_to_empty_payloads() {
    let (_store, client) = fixture();
    let list = client.get("/reservations").await.unwrap();
    assert_eq!(list, json!([]));

    let created = client.post("/reservations", json!({"table": 4})).await.unwrap();
    assert_eq!(created, json!({}));

    let updated = client.put("/reservations/1", json!({})).await.unwrap();
    assert_eq!(updated, json!({}));

    let deleted = client.delete("/reservations/1").await.unwrap();
    assert_eq!(deleted, json!({}));
}

#[tokio::test]
async fn update_of_missing_id_is_a_permissive_no_op() {
    let (_store, client) = fixture();
    let result = client
        .put("/customers/customer-missing", json!({"tier": "Gold"}))
        .await
        .unwrap();
    assert_eq!(result, json!({}));
}

#[tokio::test(start_paused = true)]
async fn cancelled_calls_never_reach_the_store() {
    let (store, client) = fixture();
    let slow = MockApiClient::with_latency(store.clone(), Latency::from_millis(300, 300));
    slow.cancellation_token().cancel();

    let result = slow
        .post(
            "/customers",
            json!({"name": "Ghost", "phone": "9800000000"}),
        )
        .await;
    assert_matches!(result, Err(DemoError::Cancelled(_)));
    assert_eq!(store.lock().unwrap().customers().len(), 5);

    // The zero-latency client still works against the same store.
    let list = client.get("/customers").await.unwrap();
    assert_eq!(list.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn coupon_crud_round_trip() {
    let (_store, client) = fixture();
    let now = Utc::now();
    let coupon = client
        .post(
            "/coupons",
            json!({
                "code": "DEMO10",
                "description": "10% off",
                "discount_type": "percentage",
                "discount_value": 10,
                "valid_from": now,
                "valid_until": now + Duration::days(30),
                "channels": ["dine-in"]
            }),
        )
        .await
        .unwrap();
    let id = coupon["id"].as_str().unwrap().to_string();
    assert_eq!(coupon["used_count"], 0);

    client
        .put(&format!("/coupons/{}", id), json!({"is_active": false}))
        .await
        .unwrap();
    let read_back = client.get(&format!("/coupons/{}", id)).await.unwrap();
    assert_eq!(read_back["is_active"], false);

    client.delete(&format!("/coupons/{}", id)).await.unwrap();
    let missing = client.get(&format!("/coupons/{}", id)).await;
    assert_matches!(missing, Err(DemoError::NotFound(_)));
}
