//! Synthetic dataset generation for demo mode.
//!
//! Produces a self-consistent [`Dataset`]: randomized customers with
//! cross-referenced transaction histories and feedback, plus fixed
//! illustrative coupons, segments, templates, and automation rules.
//! Generation cannot fail; it is a pure synthesis step over an internal
//! random source.

mod vocab;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::store::derived;
use crate::types::{
    fresh_id, AutomationRule, Coupon, Customer, CustomerType, Dataset, DemoUser, DiscountType,
    Feedback, LoyaltySettings, PointsTransaction, PointsType, Segment, SegmentFilters, Tier,
    WalletDirection, WalletTransaction, WhatsAppTemplate,
};

/// Tuning knobs for the generator.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Number of customers to synthesize.
    pub customers: usize,
    /// RNG seed; `None` draws from entropy. A fixed seed reproduces the
    /// same structure across runs.
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            customers: 55,
            seed: None,
        }
    }
}

/// Generates a complete demo dataset from pseudo-random inputs.
pub struct DatasetGenerator {
    config: GeneratorConfig,
    rng: StdRng,
}

impl DatasetGenerator {
    /// Create a generator from the given configuration.
    pub fn new(config: GeneratorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { config, rng }
    }

    /// Produce a fresh dataset. Transaction-like collections come back
    /// sorted newest-first.
    pub fn generate(&mut self) -> Dataset {
        let now = Utc::now();

        let mut customers = self.generate_customers(now);
        customers.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut points_transactions = self.generate_points_transactions(&customers, now);
        points_transactions.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut wallet_transactions = self.generate_wallet_transactions(&customers, now);
        wallet_transactions.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut feedback = self.generate_feedback(&customers, now);
        feedback.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let whatsapp_templates = seed_templates(now);
        let automation_rules = seed_rules(&whatsapp_templates, now);

        let dataset = Dataset {
            user: DemoUser::default(),
            customers,
            points_transactions,
            wallet_transactions,
            coupons: seed_coupons(now),
            segments: seed_segments(now),
            feedback,
            whatsapp_templates,
            automation_rules,
            loyalty_settings: LoyaltySettings::default(),
            automation_events: vocab::automation_events(),
        };

        // Final derived pass over the generated collections.
        let analytics = derived::compute_analytics(
            &dataset.customers,
            &dataset.points_transactions,
            &dataset.feedback,
            now,
        );
        let stats = derived::compute_segment_stats(&dataset.customers, now);
        debug!(
            "generated demo dataset: {} customers ({} corporate), {} points issued, {} redeemed",
            analytics.total_customers,
            stats.by_type.corporate,
            analytics.total_points_issued,
            analytics.total_points_redeemed
        );

        dataset
    }

    fn generate_customers(&mut self, now: DateTime<Utc>) -> Vec<Customer> {
        let mut customers = Vec::with_capacity(self.config.customers);
        for i in 0..self.config.customers {
            customers.push(self.generate_customer(i, now));
        }
        customers
    }

    fn generate_customer(&mut self, index: usize, now: DateTime<Utc>) -> Customer {
        let rng = &mut self.rng;
        let first = *vocab::FIRST_NAMES.choose(rng).unwrap();
        let last = *vocab::LAST_NAMES.choose(rng).unwrap();
        let name = format!("{} {}", first, last);
        // 8 random digits behind a 98 prefix; collisions are possible but
        // rare enough for a demo.
        let phone = format!("98{}", rng.gen_range(10_000_000..100_000_000u64));

        let total_spent = rng.gen_range(1_000..51_000i64);
        let total_points = total_spent / 10;
        let visits = rng.gen_range(1..=30u32);
        let last_visit = now - Duration::days(rng.gen_range(0..90));
        let created_at = now - Duration::days(rng.gen_range(30..395));

        let customer_type = if rng.gen_bool(0.15) {
            CustomerType::Corporate
        } else {
            CustomerType::Normal
        };
        let corporate = customer_type == CustomerType::Corporate;
        let wallet_balance = if rng.gen_bool(0.3) {
            0
        } else {
            rng.gen_range(0..2_000i64)
        };

        let dob = if rng.gen_bool(0.5) {
            Some(random_date(rng, 1990..2000))
        } else {
            None
        };
        let anniversary = if rng.gen_bool(0.3) {
            Some(random_date(rng, 2010..2020))
        } else {
            None
        };
        let allergies = if rng.gen_bool(0.2) {
            let count = rng.gen_range(1..=vocab::ALLERGIES.len());
            Some(vocab::ALLERGIES[..count].iter().map(|s| s.to_string()).collect())
        } else {
            None
        };

        Customer {
            id: fresh_id("customer"),
            email: Some(format!(
                "{}.{}@email.com",
                first.to_lowercase(),
                last.to_lowercase()
            )),
            phone,
            country_code: "+91".to_string(),
            total_points,
            total_spent,
            visits,
            tier: Tier::for_spend(total_spent),
            last_visit,
            created_at,
            customer_type,
            gst_name: corporate.then(|| format!("{} Pvt Ltd", name)),
            gst_number: corporate.then(|| format!("27AABCU9603R1Z{}", index)),
            city: Some(vocab::CITIES.choose(rng).unwrap().to_string()),
            address: corporate.then(|| format!("Office {}, Business Park", index + 1)),
            pincode: Some(format!("400{:03}", rng.gen_range(0..100))),
            dob,
            anniversary,
            allergies,
            notes: rng.gen_bool(0.3).then(|| "Prefers window seating".to_string()),
            wallet_balance,
            custom_field_1: rng
                .gen_bool(0.5)
                .then(|| vocab::VISIT_CHANNELS.choose(rng).unwrap().to_string()),
            custom_field_2: None,
            custom_field_3: None,
            name,
        }
    }

    fn generate_points_transactions(
        &mut self,
        customers: &[Customer],
        now: DateTime<Utc>,
    ) -> Vec<PointsTransaction> {
        let rng = &mut self.rng;
        let mut transactions = Vec::new();
        for customer in customers {
            let count = rng.gen_range(5..20);
            for _ in 0..count {
                let kind = *vocab::POINTS_TYPES.choose(rng).unwrap();
                let points = if kind == PointsType::Redeemed {
                    -rng.gen_range(100..600i64)
                } else {
                    rng.gen_range(50..550i64)
                };
                let created_at = now
                    - Duration::days(rng.gen_range(0..180))
                    - Duration::seconds(rng.gen_range(0..86_400));
                transactions.push(PointsTransaction {
                    id: fresh_id("points"),
                    customer_id: customer.id.clone(),
                    customer_name: customer.name.clone(),
                    points,
                    kind,
                    reason: vocab::points_reasons(kind).choose(rng).unwrap().to_string(),
                    created_at,
                    bill_amount: (kind == PointsType::Earned)
                        .then(|| rng.gen_range(500..5_500)),
                });
            }
        }
        transactions
    }

    fn generate_wallet_transactions(
        &mut self,
        customers: &[Customer],
        now: DateTime<Utc>,
    ) -> Vec<WalletTransaction> {
        let rng = &mut self.rng;
        let mut transactions = Vec::new();
        for customer in customers {
            if customer.wallet_balance == 0 && !rng.gen_bool(0.5) {
                continue;
            }
            let count = rng.gen_range(3..13);
            for _ in 0..count {
                let kind = *vocab::WALLET_DIRECTIONS.choose(rng).unwrap();
                let amount = match kind {
                    WalletDirection::Debit => -rng.gen_range(100..1_100i64),
                    WalletDirection::Credit => rng.gen_range(500..2_500i64),
                };
                let bonus_amount = (kind == WalletDirection::Credit && rng.gen_bool(0.3))
                    .then(|| amount / 10);
                let created_at = now
                    - Duration::days(rng.gen_range(0..120))
                    - Duration::seconds(rng.gen_range(0..86_400));
                transactions.push(WalletTransaction {
                    id: fresh_id("wallet"),
                    customer_id: customer.id.clone(),
                    customer_name: customer.name.clone(),
                    amount,
                    kind,
                    reason: vocab::wallet_reasons(kind).choose(rng).unwrap().to_string(),
                    created_at,
                    bonus_amount,
                });
            }
        }
        transactions
    }

    fn generate_feedback(&mut self, customers: &[Customer], now: DateTime<Utc>) -> Vec<Feedback> {
        let rng = &mut self.rng;
        let mut feedback = Vec::new();
        for customer in customers.iter().take(30) {
            if !rng.gen_bool(0.7) {
                continue;
            }
            feedback.push(Feedback {
                id: fresh_id("feedback"),
                customer_id: customer.id.clone(),
                customer_name: customer.name.clone(),
                rating: rng.gen_range(3..=5),
                comments: vocab::FEEDBACK_COMMENTS.choose(rng).unwrap().to_string(),
                created_at: now
                    - Duration::days(rng.gen_range(0..60))
                    - Duration::seconds(rng.gen_range(0..86_400)),
            });
        }
        feedback
    }
}

fn random_date(rng: &mut StdRng, years: std::ops::Range<i32>) -> NaiveDate {
    let year = rng.gen_range(years);
    let month = rng.gen_range(1..=12);
    let day = rng.gen_range(1..=28);
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn seed_coupons(now: DateTime<Utc>) -> Vec<Coupon> {
    vec![
        Coupon {
            id: fresh_id("coupon"),
            code: "WELCOME20".to_string(),
            description: "Welcome offer - 20% off on first order".to_string(),
            discount_type: DiscountType::Percentage,
            discount_value: 20,
            min_order_value: Some(500),
            max_discount: Some(200),
            usage_limit: Some(100),
            used_count: 45,
            valid_from: now - Duration::days(30),
            valid_until: now + Duration::days(30),
            channels: channels(&["dine-in", "delivery", "takeaway"]),
            tier_restriction: None,
            is_active: true,
            created_at: now - Duration::days(30),
        },
        Coupon {
            id: fresh_id("coupon"),
            code: "GOLD50".to_string(),
            description: "Flat ₹50 off for Gold tier members".to_string(),
            discount_type: DiscountType::Fixed,
            discount_value: 50,
            min_order_value: Some(300),
            max_discount: None,
            usage_limit: Some(200),
            used_count: 87,
            valid_from: now - Duration::days(15),
            valid_until: now + Duration::days(45),
            channels: channels(&["dine-in"]),
            tier_restriction: Some(Tier::Gold),
            is_active: true,
            created_at: now - Duration::days(15),
        },
        Coupon {
            id: fresh_id("coupon"),
            code: "WEEKEND15".to_string(),
            description: "Weekend special - 15% off".to_string(),
            discount_type: DiscountType::Percentage,
            discount_value: 15,
            min_order_value: Some(800),
            max_discount: Some(150),
            usage_limit: Some(50),
            used_count: 23,
            valid_from: now - Duration::days(7),
            valid_until: now + Duration::days(7),
            channels: channels(&["dine-in", "takeaway"]),
            tier_restriction: None,
            is_active: true,
            created_at: now - Duration::days(7),
        },
        Coupon {
            id: fresh_id("coupon"),
            code: "FESTIVAL100".to_string(),
            description: "Festival special - ₹100 off".to_string(),
            discount_type: DiscountType::Fixed,
            discount_value: 100,
            min_order_value: Some(1_000),
            max_discount: None,
            usage_limit: Some(30),
            used_count: 30,
            valid_from: now - Duration::days(60),
            valid_until: now - Duration::days(5),
            channels: channels(&["dine-in", "delivery"]),
            tier_restriction: None,
            is_active: false,
            created_at: now - Duration::days(60),
        },
        Coupon {
            id: fresh_id("coupon"),
            code: "DELIVERY25".to_string(),
            description: "Delivery discount - 25% off".to_string(),
            discount_type: DiscountType::Percentage,
            discount_value: 25,
            min_order_value: Some(400),
            max_discount: Some(100),
            usage_limit: Some(150),
            used_count: 68,
            valid_from: now - Duration::days(20),
            valid_until: now + Duration::days(40),
            channels: channels(&["delivery"]),
            tier_restriction: None,
            is_active: true,
            created_at: now - Duration::days(20),
        },
    ]
}

fn seed_segments(now: DateTime<Utc>) -> Vec<Segment> {
    vec![
        Segment {
            id: fresh_id("segment"),
            name: "VIP Gold Members".to_string(),
            filters: SegmentFilters {
                tier: Some(Tier::Gold),
                ..Default::default()
            },
            created_at: now - Duration::days(45),
        },
        Segment {
            id: fresh_id("segment"),
            name: "Inactive Customers (30+ days)".to_string(),
            filters: SegmentFilters {
                last_visit_days: Some(30),
                ..Default::default()
            },
            created_at: now - Duration::days(30),
        },
        Segment {
            id: fresh_id("segment"),
            name: "Corporate Clients".to_string(),
            filters: SegmentFilters {
                customer_type: Some(CustomerType::Corporate),
                ..Default::default()
            },
            created_at: now - Duration::days(20),
        },
        Segment {
            id: fresh_id("segment"),
            name: "Mumbai Premium".to_string(),
            filters: SegmentFilters {
                tier: Some(Tier::Platinum),
                city: Some("Mumbai".to_string()),
                ..Default::default()
            },
            created_at: now - Duration::days(15),
        },
    ]
}

fn seed_templates(now: DateTime<Utc>) -> Vec<WhatsAppTemplate> {
    [
        (
            "Welcome Message",
            "Welcome to {{restaurant_name}}, {{customer_name}}! 🎉 Thank you for joining our loyalty program. Start earning points on every visit!",
            60,
        ),
        (
            "Points Earned",
            "Hi {{customer_name}}! You've earned {{points_earned}} points on your recent visit. Your total balance: {{points_balance}} points. Thank you for dining with us! 🌟",
            55,
        ),
        (
            "Birthday Wishes",
            "Happy Birthday {{customer_name}}! 🎂 We've added {{points_earned}} bonus points to your account. Visit us today and enjoy special birthday treats!",
            50,
        ),
        (
            "Wallet Credit",
            "Hi {{customer_name}}, ₹{{amount}} has been credited to your wallet! Your wallet balance is now ₹{{wallet_balance}}. Use it on your next visit! 💰",
            45,
        ),
        (
            "Tier Upgrade",
            "Congratulations {{customer_name}}! 🎊 You've been upgraded to {{tier}} tier. Enjoy enhanced benefits and exclusive rewards at {{restaurant_name}}!",
            40,
        ),
    ]
    .iter()
    .map(|(name, content, days_ago)| WhatsAppTemplate {
        id: fresh_id("template"),
        name: name.to_string(),
        content: content.to_string(),
        variables: crate::types::extract_template_variables(content),
        created_at: now - Duration::days(*days_ago),
    })
    .collect()
}

fn seed_rules(templates: &[WhatsAppTemplate], now: DateTime<Utc>) -> Vec<AutomationRule> {
    // (event, template index, enabled, delay minutes, days ago)
    let bindings = [
        ("points_earned", 1, true, 5, 50),
        ("birthday", 2, true, 0, 45),
        ("wallet_credit", 3, true, 2, 40),
        ("tier_upgrade", 4, false, 10, 35),
    ];
    bindings
        .iter()
        .map(|(event, idx, enabled, delay, days_ago)| {
            let template = &templates[*idx];
            AutomationRule {
                id: fresh_id("rule"),
                event: event.to_string(),
                template_id: template.id.clone(),
                template_name: Some(template.name.clone()),
                is_enabled: *enabled,
                delay_minutes: *delay,
                created_at: now - Duration::days(*days_ago),
            }
        })
        .collect()
}

fn channels(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}
