//! Fixed vocabularies the generator samples from.

use crate::types::{AutomationEvent, PointsType, WalletDirection};

pub const FIRST_NAMES: &[&str] = &[
    "Rajesh", "Priya", "Amit", "Sneha", "Vikram", "Anita", "Sanjay", "Kavita", "Rahul", "Deepika",
    "Arjun", "Pooja", "Karan", "Neha", "Rohan", "Anjali", "Aditya", "Riya", "Nikhil", "Simran",
    "Varun", "Swati", "Akash", "Meera", "Siddharth", "Nisha", "Harsh", "Tanvi", "Manish", "Isha",
];

pub const LAST_NAMES: &[&str] = &[
    "Sharma", "Patel", "Kumar", "Singh", "Reddy", "Iyer", "Gupta", "Joshi", "Shah", "Mehta",
    "Rao", "Nair", "Verma", "Desai", "Pillai", "Agarwal", "Chopra", "Malhotra", "Saxena", "Bhatia",
];

pub const CITIES: &[&str] = &[
    "Mumbai", "Delhi", "Bangalore", "Pune", "Hyderabad", "Chennai", "Kolkata",
];

pub const ALLERGIES: &[&str] = &["Peanuts", "Dairy"];

pub const VISIT_CHANNELS: &[&str] = &["Dine-in", "Takeaway", "Delivery"];

pub const FEEDBACK_COMMENTS: &[&str] = &[
    "Great food and service!",
    "Excellent ambiance, loved the experience",
    "Good food but service could be faster",
    "Amazing food quality, will visit again",
    "Nice place for family dining",
    "Delicious food, highly recommended",
    "Average experience, expected better",
    "Outstanding service and hospitality",
    "Food was good but portion size was small",
    "Best restaurant in the area!",
];

/// Type-keyed reason vocabulary for points ledger entries.
pub fn points_reasons(kind: PointsType) -> &'static [&'static str] {
    match kind {
        PointsType::Earned => &["Bill payment", "Purchase", "Dine-in"],
        PointsType::Redeemed => &["Discount redemption", "Reward claimed"],
        PointsType::Bonus => &[
            "Birthday bonus",
            "Anniversary bonus",
            "First visit bonus",
            "Tier upgrade bonus",
        ],
        PointsType::Expired => &["Points expired after 1 year"],
        PointsType::Adjusted => &["Manual adjustment by admin"],
    }
}

/// Direction-keyed reason vocabulary for wallet ledger entries.
pub fn wallet_reasons(kind: WalletDirection) -> &'static [&'static str] {
    match kind {
        WalletDirection::Credit => &["Wallet top-up", "Refund", "Bonus credit", "Cashback"],
        WalletDirection::Debit => &["Bill payment", "Purchase"],
    }
}

pub const POINTS_TYPES: &[PointsType] = &[
    PointsType::Earned,
    PointsType::Redeemed,
    PointsType::Bonus,
    PointsType::Expired,
    PointsType::Adjusted,
];

pub const WALLET_DIRECTIONS: &[WalletDirection] =
    &[WalletDirection::Credit, WalletDirection::Debit];

/// The fixed automation event vocabulary served by
/// `GET /whatsapp/automation/events`.
pub fn automation_events() -> Vec<AutomationEvent> {
    [
        ("points_earned", "Points Earned", "When customer earns points"),
        ("points_redeemed", "Points Redeemed", "When customer redeems points"),
        ("bonus_points", "Bonus Points", "When bonus points are awarded"),
        ("wallet_credit", "Wallet Credit", "When amount is credited to wallet"),
        ("wallet_debit", "Wallet Debit", "When amount is debited from wallet"),
        ("birthday", "Birthday", "On customer's birthday"),
        ("anniversary", "Anniversary", "On customer's anniversary"),
        ("first_visit", "First Visit", "On customer's first visit"),
        ("tier_upgrade", "Tier Upgrade", "When customer tier is upgraded"),
        ("coupon_earned", "Coupon Earned", "When customer earns a coupon"),
        ("points_expiring", "Points Expiring", "When points are about to expire"),
        ("feedback_received", "Feedback Received", "After customer submits feedback"),
        ("inactive_reminder", "Inactive Reminder", "For inactive customers"),
    ]
    .iter()
    .map(|(id, name, description)| AutomationEvent {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
    })
    .collect()
}
