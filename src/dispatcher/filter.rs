//! Customer list filtering, sorting, and limiting for `GET /customers`,
//! plus query-string decoding shared by the other list endpoints.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use log::debug;
use serde_json::Value;

use crate::error::DemoResult;
use crate::types::Customer;

/// Decode a query string into key/value pairs. Pairs split on `&`/`=` and
/// both halves are percent-decoded. Later duplicates win.
pub fn parse_query(query: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}

/// Sort direction for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// The filter/sort/limit pipeline of `GET /customers`, decoded from query
/// parameters. Filters apply in a fixed order: search, tier, customer
/// type, inactivity, city; sorting defaults to `created_at` descending.
#[derive(Debug, Clone)]
pub struct CustomerQuery {
    search: Option<String>,
    tier: Option<String>,
    customer_type: Option<String>,
    last_visit_days: Option<i64>,
    city: Option<String>,
    sort_by: String,
    sort_order: SortOrder,
    limit: Option<usize>,
}

impl CustomerQuery {
    /// Build a query from decoded parameters. A tier or customer_type of
    /// `all` means no filter; unparseable numeric parameters are ignored.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let filter = |key: &str| {
            params
                .get(key)
                .filter(|v| !v.is_empty() && *v != "all")
                .cloned()
        };
        let last_visit_days = params.get("last_visit_days").and_then(|raw| {
            if raw == "all" {
                return None;
            }
            match raw.parse::<i64>() {
                Ok(days) => Some(days),
                Err(_) => {
                    debug!("ignoring unparseable last_visit_days filter {:?}", raw);
                    None
                }
            }
        });
        let limit = params.get("limit").and_then(|raw| match raw.parse() {
            Ok(limit) => Some(limit),
            Err(_) => {
                debug!("ignoring unparseable limit {:?}", raw);
                None
            }
        });

        Self {
            search: params.get("search").filter(|v| !v.is_empty()).cloned(),
            tier: filter("tier"),
            customer_type: filter("customer_type"),
            last_visit_days,
            city: params.get("city").filter(|v| !v.is_empty()).cloned(),
            sort_by: params
                .get("sort_by")
                .cloned()
                .unwrap_or_else(|| "created_at".to_string()),
            sort_order: match params.get("sort_order").map(String::as_str) {
                Some("asc") => SortOrder::Ascending,
                _ => SortOrder::Descending,
            },
            limit,
        }
    }

    /// Run the pipeline against the live customer collection, returning
    /// JSON records ready for the wire.
    pub fn apply(&self, customers: &[Customer], now: DateTime<Utc>) -> DemoResult<Vec<Value>> {
        let cutoff = self.last_visit_days.map(|days| now - Duration::days(days));
        let mut matches: Vec<Value> = customers
            .iter()
            .filter(|c| self.matches(c, cutoff))
            .map(serde_json::to_value)
            .collect::<Result<_, _>>()?;

        // Stable sort: equal keys keep their stored (newest-first) order.
        matches.sort_by(|a, b| {
            let ordering = sort_key(a, &self.sort_by).cmp(&sort_key(b, &self.sort_by));
            match self.sort_order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            }
        });

        if let Some(limit) = self.limit {
            matches.truncate(limit);
        }
        Ok(matches)
    }

    fn matches(&self, customer: &Customer, cutoff: Option<DateTime<Utc>>) -> bool {
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let haystack_hit = customer.name.to_lowercase().contains(&needle)
                || customer.phone.contains(&needle)
                || customer
                    .email
                    .as_ref()
                    .is_some_and(|e| e.to_lowercase().contains(&needle));
            if !haystack_hit {
                return false;
            }
        }
        if let Some(tier) = &self.tier {
            if customer.tier.to_string() != *tier {
                return false;
            }
        }
        if let Some(kind) = &self.customer_type {
            if customer.customer_type.to_string() != *kind {
                return false;
            }
        }
        if let Some(cutoff) = cutoff {
            // Strictly older than the inactivity threshold.
            if customer.last_visit >= cutoff {
                return false;
            }
        }
        if let Some(city) = &self.city {
            if customer.city.as_deref() != Some(city.as_str()) {
                return false;
            }
        }
        true
    }
}

/// Comparable sort key for one field of a serialized record. Date-like
/// fields are promoted to timestamps before comparing; missing or null
/// fields sort below everything else.
#[derive(Debug, Clone, PartialEq)]
enum SortKey {
    Missing,
    Num(f64),
    Time(DateTime<Utc>),
    Text(String),
}

impl SortKey {
    fn rank(&self) -> u8 {
        match self {
            SortKey::Missing => 0,
            SortKey::Num(_) => 1,
            SortKey::Time(_) => 2,
            SortKey::Text(_) => 3,
        }
    }
}

impl Eq for SortKey {}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Num(a), SortKey::Num(b)) => a.total_cmp(b),
            (SortKey::Time(a), SortKey::Time(b)) => a.cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn sort_key(record: &Value, field: &str) -> SortKey {
    match record.get(field) {
        None | Some(Value::Null) => SortKey::Missing,
        Some(Value::Number(n)) => SortKey::Num(n.as_f64().unwrap_or(0.0)),
        Some(Value::String(s)) => {
            if matches!(field, "created_at" | "last_visit") {
                match DateTime::parse_from_rfc3339(s) {
                    Ok(dt) => SortKey::Time(dt.with_timezone(&Utc)),
                    Err(_) => SortKey::Text(s.clone()),
                }
            } else {
                SortKey::Text(s.clone())
            }
        }
        Some(other) => SortKey::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_pairs_are_percent_decoded() {
        let params = parse_query("search=Rajesh%20Sharma&tier=Gold&a%26b=c%3Dd");
        assert_eq!(params.get("search").unwrap(), "Rajesh Sharma");
        assert_eq!(params.get("tier").unwrap(), "Gold");
        assert_eq!(params.get("a&b").unwrap(), "c=d");
    }

    #[test]
    fn all_means_no_filter() {
        let params = parse_query("tier=all&customer_type=all&last_visit_days=all");
        let query = CustomerQuery::from_params(&params);
        assert!(query.tier.is_none());
        assert!(query.customer_type.is_none());
        assert!(query.last_visit_days.is_none());
    }

    #[test]
    fn sort_keys_promote_dates() {
        let older = serde_json::json!({"created_at": "2024-01-01T00:00:00Z"});
        let newer = serde_json::json!({"created_at": "2024-06-01T00:00:00Z"});
        assert!(sort_key(&older, "created_at") < sort_key(&newer, "created_at"));
    }
}
