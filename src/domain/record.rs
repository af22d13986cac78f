// src/domain/record.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const NA: &str = "N/A";
pub const UNKNOWN: &str = "Unknown";
pub const NO_DESCRIPTION: &str = "No description available";
pub const NO_URL: &str = "#";

/// One rentable unit with everything about its property and floorplan copied in.
///
/// Every text field holds a value; missing upstream data is one of the sentinels above
/// (or `"Not specified"` for fees). The serialized names are the column headers of the
/// `/search` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatRecord {
    #[serde(rename = "Property Name")]
    pub property_name: String,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "Neighborhood")]
    pub neighborhood: String,
    #[serde(rename = "Rent")]
    pub rent: String,
    #[serde(rename = "Rent Range")]
    pub rent_range: String,
    #[serde(rename = "Deposit")]
    pub deposit: String,
    #[serde(rename = "Floorplan")]
    pub floorplan: String,
    #[serde(rename = "Unit Number")]
    pub unit_number: String,
    #[serde(rename = "Bedrooms")]
    pub bedrooms: String,
    #[serde(rename = "Bathrooms")]
    pub bathrooms: String,
    #[serde(rename = "Square Footage")]
    pub square_footage: String,
    #[serde(rename = "Availability")]
    pub availability: String,
    #[serde(rename = "Availability Date")]
    pub availability_date: Option<NaiveDate>,
    #[serde(rename = "Walk Score")]
    pub walk_score: String,
    #[serde(rename = "Transit Score")]
    pub transit_score: String,
    #[serde(rename = "Parking Fees")]
    pub parking_fees: String,
    #[serde(rename = "Pet Fees")]
    pub pet_fees: String,
    #[serde(rename = "Schools Nearby")]
    pub schools_nearby: Vec<String>,
    #[serde(rename = "Nearby Points of Interest")]
    pub nearby_poi: Vec<String>,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "Photos")]
    pub photos: Vec<String>,
    #[serde(rename = "Latitude")]
    pub latitude: Option<f64>,
    #[serde(rename = "Longitude")]
    pub longitude: Option<f64>,
}

impl FlatRecord {
    /// Rent as whole dollars: `$` and `,` stripped, cents dropped, 0 when what is left is
    /// not a number.
    pub fn rent_amount(&self) -> i64 {
        let cleaned: String = self
            .rent
            .chars()
            .filter(|c| *c != '$' && *c != ',')
            .collect();
        match cleaned.trim().parse::<f64>() {
            Ok(amount) if amount.is_finite() => amount.trunc() as i64,
            _ => 0,
        }
    }

    /// First whole number in the square footage text, e.g. `"1,050 sqft"` -> 1050.
    pub fn sqft_amount(&self) -> Option<i64> {
        let digits: String = self
            .square_footage
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(|c| c.is_ascii_digit() || *c == ',')
            .filter(|c| *c != ',')
            .collect();
        digits.parse().ok()
    }

    /// Two records with the same key are the same offer.
    pub fn dedup_key(&self) -> (&str, &str, &str, &str) {
        (
            &self.property_name,
            &self.unit_number,
            &self.rent,
            &self.availability,
        )
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}
