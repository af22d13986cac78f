// src/domain/flatten.rs

use crate::apify::models::{value_text, SourceListing};
use crate::domain::availability::parse_availability;
use crate::domain::fees::format_fees;
use crate::domain::neighborhoods::NeighborhoodOverrides;
use crate::domain::record::{FlatRecord, NA, NO_DESCRIPTION, NO_URL, UNKNOWN};
use chrono::NaiveDate;
use serde_json::Value;

/// One `FlatRecord` per unit of every model of the listing.
/// Models without units, and listings without models, produce nothing.
pub fn flatten_listing(
    listing: &SourceListing,
    overrides: &NeighborhoodOverrides,
    today: NaiveDate,
) -> Vec<FlatRecord> {
    let or_na = |v: &Option<String>| v.clone().unwrap_or_else(|| NA.to_string());

    let property_name = or_na(&listing.property_name);
    let raw_neighborhood = or_na(&listing.location.neighborhood);
    let neighborhood = overrides
        .correct(&property_name, &raw_neighborhood)
        .to_string();

    let address = or_na(&listing.location.full_address);
    let walk_score = or_na(&listing.scores.walk_score);
    let transit_score = or_na(&listing.scores.transit_score);
    let rent_range = rent_range(listing);
    let description = listing
        .description
        .clone()
        .unwrap_or_else(|| NO_DESCRIPTION.to_string());
    let url = listing.url.clone().unwrap_or_else(|| NO_URL.to_string());
    let parking_fees = format_fees(listing.parking_fees.as_ref());
    let pet_fees = format_fees(listing.pet_fees.as_ref());

    let schools_nearby: Vec<String> = listing
        .schools
        .public
        .iter()
        .chain(&listing.schools.private)
        .cloned()
        .collect();
    let nearby_poi: Vec<String> = listing
        .transit_and_poi
        .iter()
        .flat_map(poi_names)
        .collect();

    let coords = &listing.location.coordinates;

    let mut records = Vec::new();
    for model in &listing.models {
        let floorplan = or_na(&model.model_name);
        let rent_label = or_na(&model.rent_label);
        let details = &model.details;
        let model_sqft = or_na(&details.sqft);

        for unit in &model.units {
            let availability = unit
                .availability
                .clone()
                .unwrap_or_else(|| UNKNOWN.to_string());
            let availability_date = parse_availability(&availability, today);

            records.push(FlatRecord {
                property_name: property_name.clone(),
                address: address.clone(),
                neighborhood: neighborhood.clone(),
                rent: unit.price.clone().unwrap_or_else(|| rent_label.clone()),
                rent_range: rent_range.clone(),
                deposit: or_na(&details.deposit),
                floorplan: floorplan.clone(),
                unit_number: or_na(&unit.unit_type),
                bedrooms: or_na(&details.bedrooms),
                bathrooms: or_na(&details.bathrooms),
                square_footage: unit.sqft.clone().unwrap_or_else(|| model_sqft.clone()),
                availability,
                availability_date,
                walk_score: walk_score.clone(),
                transit_score: transit_score.clone(),
                parking_fees: parking_fees.clone(),
                pet_fees: pet_fees.clone(),
                schools_nearby: schools_nearby.clone(),
                nearby_poi: nearby_poi.clone(),
                description: description.clone(),
                url: url.clone(),
                photos: listing.photos.clone(),
                latitude: coords.latitude,
                longitude: coords.longitude,
            });
        }
    }

    records
}

pub fn flatten_listings(
    listings: &[SourceListing],
    overrides: &NeighborhoodOverrides,
    today: NaiveDate,
) -> Vec<FlatRecord> {
    let records: Vec<FlatRecord> = listings
        .iter()
        .flat_map(|listing| flatten_listing(listing, overrides, today))
        .collect();

    tracing::debug!(
        listings = listings.len(),
        units = records.len(),
        "flattened listings"
    );
    records
}

fn rent_range(listing: &SourceListing) -> String {
    match (&listing.rent.min, &listing.rent.max) {
        (Some(min), Some(max)) if min == max => min.clone(),
        (Some(min), Some(max)) => format!("{min} - {max}"),
        (Some(only), None) | (None, Some(only)) => only.clone(),
        (None, None) => NA.to_string(),
    }
}

/// Names of nearby places. Grouped entries (`{"type": .., "items": [..]}`) are expanded
/// to their items; an item's distance is appended when present.
fn poi_names(entry: &Value) -> Vec<String> {
    if let Some(items) = entry.get("items").and_then(Value::as_array) {
        return items.iter().filter_map(poi_label).collect();
    }
    poi_label(entry).into_iter().collect()
}

fn poi_label(v: &Value) -> Option<String> {
    let name = match v {
        Value::Object(map) => ["name", "title", "type"]
            .iter()
            .find_map(|k| map.get(*k).and_then(value_text))?,
        other => value_text(other)?,
    };
    match v.get("distance").and_then(value_text) {
        Some(distance) => Some(format!("{name} ({distance})")),
        None => Some(name),
    }
}
