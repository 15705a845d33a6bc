use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use serde_json::json;

use loyalty_demo::store::derived;
use loyalty_demo::types::{
    fresh_id, Customer, CustomerDraft, CustomerType, Dataset, Feedback, FeedbackDraft,
    PointsDraft, PointsTransaction, PointsType, SegmentDraft, SegmentFilters, TemplateDraft,
    Tier, WalletDraft, WalletDirection,
};
use loyalty_demo::{DemoError, SessionStore};

fn test_customer(name: &str, tier: Tier, created_days_ago: i64, visit_days_ago: i64) -> Customer {
    let now = Utc::now();
    Customer {
        id: fresh_id("customer"),
        name: name.to_string(),
        phone: "9812345678".to_string(),
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
        wallet_balance: 500,
        custom_field_1: None,
        custom_field_2: None,
        custom_field_3: None,
    }
}

fn seeded_store() -> SessionStore {
    let mut dataset = Dataset::empty();
    dataset.customers = vec![
        test_customer("Rajesh Sharma", Tier::Gold, 10, 5),
        test_customer("Priya Patel", Tier::Bronze, 20, 40),
        test_customer("Amit Kumar", Tier::Gold, 30, 70),
    ];
    SessionStore::new(dataset)
}

#[test]
fn points_transaction_updates_customer_accumulators() {
    let mut store = seeded_store();
    let id = store.customers()[0].id.clone();
    let before = store.customer(&id).unwrap().clone();

    let tx = store.add_points_transaction(PointsDraft {
        customer_id: id.clone(),
        points: 250,
        kind: PointsType::Earned,
        reason: "Bill payment".to_string(),
        bill_amount: Some(2_500),
    });

    let after = store.customer(&id).unwrap();
    assert_eq!(after.total_points, before.total_points + 250);
    assert_eq!(after.visits, before.visits + 1);
    assert_eq!(after.last_visit, tx.created_at);
    assert_eq!(tx.customer_name, after.name);
    // Newest-first insertion.
    assert_eq!(store.points_transactions(None)[0].id, tx.id);
}

#[test]
fn redemption_applies_negative_delta() {
    let mut store = seeded_store();
    let id = store.customers()[0].id.clone();
    let before = store.customer(&id).unwrap().total_points;

    store.add_points_transaction(PointsDraft {
        customer_id: id.clone(),
        points: -80,
        kind: PointsType::Redeemed,
        reason: "Reward claimed".to_string(),
        bill_amount: None,
    });

    assert_eq!(store.customer(&id).unwrap().total_points, before - 80);
}

#[test]
fn wallet_transaction_applies_amount_plus_bonus() {
    let mut store = seeded_store();
    let id = store.customers()[0].id.clone();
    let before = store.customer(&id).unwrap().wallet_balance;

    store.add_wallet_transaction(WalletDraft {
        customer_id: id.clone(),
        amount: 1_000,
        kind: WalletDirection::Credit,
        reason: "Wallet top-up".to_string(),
        bonus_amount: Some(100),
    });

    assert_eq!(store.customer(&id).unwrap().wallet_balance, before + 1_100);
}

#[test]
fn debit_beyond_balance_goes_negative() {
    // Permissive by decision: the store applies the signed delta without
    // clamping.
    let mut store = seeded_store();
    let id = store.customers()[0].id.clone();
    assert_eq!(store.customer(&id).unwrap().wallet_balance, 500);

    store.add_wallet_transaction(WalletDraft {
        customer_id: id.clone(),
        amount: -800,
        kind: WalletDirection::Debit,
        reason: "Bill payment".to_string(),
        bonus_amount: None,
    });

    assert_eq!(store.customer(&id).unwrap().wallet_balance, -300);
}

#[test]
fn update_merges_shallowly_and_reports_missing_ids() {
    let mut store = seeded_store();
    let id = store.customers()[1].id.clone();

    store
        .update_customer(&id, &json!({"tier": "Gold", "notes": "Regular"}))
        .unwrap();
    let updated = store.customer(&id).unwrap();
    assert_eq!(updated.tier, Tier::Gold);
    assert_eq!(updated.notes.as_deref(), Some("Regular"));
    // Untouched fields survive the merge.
    assert_eq!(updated.name, "Priya Patel");
    assert_eq!(updated.wallet_balance, 500);

    let missing = store.update_customer("customer-missing", &json!({"tier": "Gold"}));
    assert_matches!(missing, Err(DemoError::NotFound(_)));
}

#[test]
fn delete_reports_missing_ids() {
    let mut store = seeded_store();
    let id = store.customers()[0].id.clone();
    store.delete_customer(&id).unwrap();
    assert!(store.customer(&id).is_none());
    assert_matches!(store.delete_customer(&id), Err(DemoError::NotFound(_)));
}

#[test]
fn new_customers_start_at_zero() {
    let mut store = seeded_store();
    let created = store.add_customer(CustomerDraft {
        name: "Neha Verma".to_string(),
        phone: "9898989898".to_string(),
        ..Default::default()
    });
    assert_eq!(created.total_points, 0);
    assert_eq!(created.total_spent, 0);
    assert_eq!(created.visits, 0);
    assert_eq!(created.wallet_balance, 0);
    assert_eq!(created.tier, Tier::Bronze);
    // Appended, not prepended.
    assert_eq!(store.customers().last().unwrap().id, created.id);
}

#[test]
fn settings_patch_keeps_unrelated_fields() {
    let mut store = seeded_store();
    store
        .update_loyalty_settings(&json!({"points_per_rupee": 2, "min_points_to_redeem": 200}))
        .unwrap();
    let settings = store.loyalty_settings();
    assert_eq!(settings.points_per_rupee, 2);
    assert_eq!(settings.min_points_to_redeem, 200);
    assert_eq!(settings.points_expiry_days, 365);
    assert_eq!(settings.off_peak_hours_start, "14:00");
}

#[test]
fn template_variables_track_content_updates() {
    let mut store = seeded_store();
    let template = store.add_template(TemplateDraft {
        name: "Offer".to_string(),
        content: "Hi {{customer_name}}, enjoy {{offer}}!".to_string(),
    });
    assert_eq!(template.variables, vec!["customer_name", "offer"]);

    store
        .update_template(&template.id, &json!({"content": "Hello {{customer_name}}"}))
        .unwrap();
    let updated = store
        .templates()
        .iter()
        .find(|t| t.id == template.id)
        .unwrap();
    assert_eq!(updated.variables, vec!["customer_name"]);
}

#[test]
fn rule_double_toggle_restores_state() {
    let mut store = seeded_store();
    let template = store.add_template(TemplateDraft {
        name: "Points Earned".to_string(),
        content: "You earned {{points_earned}} points".to_string(),
    });
    let rule = store.add_rule(loyalty_demo::types::RuleDraft {
        event: "points_earned".to_string(),
        template_id: template.id,
        template_name: None,
        is_enabled: true,
        delay_minutes: 5,
    });
    assert_eq!(rule.template_name.as_deref(), Some("Points Earned"));

    let flipped = store.toggle_rule(&rule.id).unwrap();
    assert!(!flipped.is_enabled);
    let restored = store.toggle_rule(&rule.id).unwrap();
    assert_eq!(restored.is_enabled, rule.is_enabled);

    assert_matches!(store.toggle_rule("rule-missing"), Err(DemoError::NotFound(_)));
}

#[test]
fn segment_counts_follow_live_data() {
    let mut store = seeded_store();
    let segment = store.add_segment(SegmentDraft {
        name: "Gold members".to_string(),
        filters: SegmentFilters {
            tier: Some(Tier::Gold),
            ..Default::default()
        },
    });
    assert_eq!(store.segment_customer_count(&segment), 2);

    let bronze_id = store.customers()[1].id.clone();
    store
        .update_customer(&bronze_id, &json!({"tier": "Gold"}))
        .unwrap();
    assert_eq!(store.segment_customer_count(&segment), 3);
}

#[test]
fn segment_filter_precedence_is_first_present_key() {
    let store = seeded_store();
    let now = Utc::now();
    // tier wins over customer_type and inactivity when several keys are set.
    let filters = SegmentFilters {
        tier: Some(Tier::Gold),
        customer_type: Some(CustomerType::Corporate),
        last_visit_days: Some(1),
        city: None,
    };
    assert_eq!(
        derived::segment_customer_count(store.customers(), &filters, now),
        2
    );

    // Inactivity threshold is strictly-older-than.
    let inactive = SegmentFilters {
        last_visit_days: Some(30),
        ..Default::default()
    };
    assert_eq!(
        derived::segment_customer_count(store.customers(), &inactive, now),
        2
    );
}

#[test]
fn analytics_totals_follow_transaction_types() {
    let now = Utc::now();
    let mut dataset = Dataset::empty();
    let customer = test_customer("Rajesh Sharma", Tier::Gold, 3, 1);
    let customer_id = customer.id.clone();
    dataset.customers = vec![customer, test_customer("Priya Patel", Tier::Bronze, 60, 45)];

    let entry = |points: i64, kind: PointsType, days_ago: i64| PointsTransaction {
        id: fresh_id("points"),
        customer_id: customer_id.clone(),
        customer_name: "Rajesh Sharma".to_string(),
        points,
        kind,
        reason: "test".to_string(),
        created_at: now - Duration::days(days_ago),
        bill_amount: None,
    };
    dataset.points_transactions = vec![
        entry(100, PointsType::Earned, 1),
        entry(50, PointsType::Bonus, 2),
        entry(-70, PointsType::Redeemed, 3),
        entry(-30, PointsType::Expired, 4),
        entry(25, PointsType::Adjusted, 5),
    ];
    dataset.feedback = vec![
        Feedback {
            id: fresh_id("feedback"),
            customer_id: customer_id.clone(),
            customer_name: "Rajesh Sharma".to_string(),
            rating: 4,
            comments: "Great food and service!".to_string(),
            created_at: now - Duration::days(1),
        },
        Feedback {
            id: fresh_id("feedback"),
            customer_id: customer_id.clone(),
            customer_name: "Rajesh Sharma".to_string(),
            rating: 5,
            comments: "Best restaurant in the area!".to_string(),
            created_at: now - Duration::days(2),
        },
    ];

    let store = SessionStore::new(dataset);
    let analytics = store.analytics();
    assert_eq!(analytics.total_customers, 2);
    assert_eq!(analytics.new_customers_7d, 1);
    assert_eq!(analytics.active_customers_30d, 1);
    // earned + bonus magnitudes only.
    assert_eq!(analytics.total_points_issued, 150);
    assert_eq!(analytics.total_points_redeemed, 70);
    assert_eq!(analytics.avg_rating, Some(4.5));
}

#[test]
fn feedback_falls_back_to_store_customer_name() {
    let mut store = seeded_store();
    let id = store.customers()[0].id.clone();
    let entry = store.add_feedback(FeedbackDraft {
        customer_id: id,
        customer_name: String::new(),
        rating: 5,
        comments: "Great!".to_string(),
    });
    assert_eq!(entry.customer_name, "Rajesh Sharma");
    assert_eq!(store.feedback()[0].id, entry.id);
}
