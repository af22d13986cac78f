// src/domain/filter.rs

use crate::domain::record::FlatRecord;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

/// What the user asked for. Every `None` (and `show_all_units == false` for dedup
/// purposes, see `apply_filters`) leaves the collection as it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    pub name_contains: Option<String>,
    pub max_rent: Option<i64>,
    pub neighborhood_contains: Option<String>,
    pub bedrooms_contains: Option<String>,
    pub min_sqft: Option<i64>,
    pub move_in_by: Option<NaiveDate>,
    pub show_all_units: bool,
}

impl FilterSpec {
    /// Read options from query/form parameters. Blank text and non-positive numbers
    /// are treated as not set.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let text = |key: &str| {
            params
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        let positive = |key: &str| {
            text(key)
                .and_then(|v| v.parse::<f64>().ok())
                .filter(|n| n.is_finite() && *n > 0.0)
                .map(|n| n as i64)
        };

        Self {
            name_contains: text("name"),
            max_rent: positive("max_rent"),
            neighborhood_contains: text("neighborhood"),
            bedrooms_contains: text("bedrooms"),
            min_sqft: positive("min_sqft"),
            move_in_by: text("move_in_by")
                .and_then(|v| NaiveDate::parse_from_str(&v, "%Y-%m-%d").ok()),
            show_all_units: text("show_all_units")
                .is_some_and(|v| matches!(v.as_str(), "1" | "true" | "on" | "yes")),
        }
    }

    pub fn matches(&self, record: &FlatRecord) -> bool {
        contains_ci(&record.property_name, self.name_contains.as_deref())
            && contains_ci(&record.neighborhood, self.neighborhood_contains.as_deref())
            && contains_ci(&record.bedrooms, self.bedrooms_contains.as_deref())
            && self.max_rent.map_or(true, |max| record.rent_amount() <= max)
            && self
                .min_sqft
                .map_or(true, |min| record.sqft_amount().is_some_and(|s| s >= min))
            && self
                .move_in_by
                .map_or(true, |by| record.availability_date.is_some_and(|d| d <= by))
    }
}

/// Filter, then reduce:
/// - `show_all_units`: drop exact repeats of (property, unit, rent, availability), order kept;
/// - otherwise: the cheapest record per property, cheapest first.
///
/// The input is left untouched.
pub fn apply_filters(records: &[FlatRecord], spec: &FilterSpec) -> Vec<FlatRecord> {
    let matching = records.iter().filter(|r| spec.matches(r));

    if spec.show_all_units {
        let mut seen = HashSet::new();
        return matching
            .filter(|r| seen.insert(r.dedup_key()))
            .cloned()
            .collect();
    }

    let mut order: Vec<&str> = Vec::new();
    let mut cheapest: HashMap<&str, &FlatRecord> = HashMap::new();
    for record in matching {
        match cheapest.get(record.property_name.as_str()) {
            Some(best) if best.rent_amount() <= record.rent_amount() => {}
            Some(_) => {
                cheapest.insert(&record.property_name, record);
            }
            None => {
                order.push(&record.property_name);
                cheapest.insert(&record.property_name, record);
            }
        }
    }

    let mut out: Vec<FlatRecord> = order
        .into_iter()
        .filter_map(|name| cheapest.get(name).map(|r| (*r).clone()))
        .collect();
    out.sort_by_key(FlatRecord::rent_amount);
    out
}

fn contains_ci(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        Some(n) => haystack.to_lowercase().contains(&n.to_lowercase()),
        None => true,
    }
}
