use crate::apify::FetchError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

// listing
//  ├── propertyName
//  ├── location
//  │    ├── fullAddress
//  │    ├── neighborhood
//  │    └── coordinates { latitude, longitude }
//  ├── scores { walkScore, transitScore }
//  ├── description, url, photos[]
//  ├── rent { min, max }
//  ├── parkingFees / petFees      (fee categories, or their JSON text)
//  ├── schools { public[], private[] }
//  ├── transitAndPOI[]
//  └── models[]
//       ├── modelName, rentLabel
//       ├── details[]              (bedrooms, bathrooms, sqft, deposit by position)
//       └── units[] { type, price, sqft, availability }
//
// Every field is optional upstream. A field with the wrong shape decodes as absent
// instead of failing the whole listing.

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceListing {
    #[serde(default, deserialize_with = "lenient_text")]
    pub property_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub location: Location,
    #[serde(default, deserialize_with = "lenient")]
    pub scores: Scores,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient_text_seq")]
    pub photos: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub rent: RentRange,
    #[serde(default)]
    pub parking_fees: Option<Value>,
    #[serde(default)]
    pub pet_fees: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub schools: Schools,
    #[serde(default, rename = "transitAndPOI", deserialize_with = "lenient_seq")]
    pub transit_and_poi: Vec<Value>,
    #[serde(default, deserialize_with = "lenient_record_seq")]
    pub models: Vec<Model>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(default, deserialize_with = "lenient_text")]
    pub full_address: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub neighborhood: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub coordinates: Coordinates,
}

#[derive(Debug, Default, Deserialize)]
pub struct Coordinates {
    #[serde(default, alias = "lat", deserialize_with = "lenient_f64")]
    pub latitude: Option<f64>,
    #[serde(default, alias = "lng", alias = "lon", deserialize_with = "lenient_f64")]
    pub longitude: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scores {
    #[serde(default, deserialize_with = "lenient_text")]
    pub walk_score: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub transit_score: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RentRange {
    #[serde(default, deserialize_with = "lenient_text")]
    pub min: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub max: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Schools {
    #[serde(default, deserialize_with = "lenient_text_seq")]
    pub public: Vec<String>,
    #[serde(default, deserialize_with = "lenient_text_seq")]
    pub private: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[serde(default, deserialize_with = "lenient_text")]
    pub model_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub rent_label: Option<String>,
    #[serde(default, deserialize_with = "positional_details")]
    pub details: ModelDetails,
    #[serde(default, deserialize_with = "lenient_record_seq")]
    pub units: Vec<Unit>,
}

/// The `details` array, named. Upstream gives no guarantee the positions stay put;
/// this is the one place that depends on them.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ModelDetails {
    pub bedrooms: Option<String>,
    pub bathrooms: Option<String>,
    pub sqft: Option<String>,
    pub deposit: Option<String>,
}

impl ModelDetails {
    pub fn from_positions(items: &[Value]) -> Self {
        let at = |i: usize| items.get(i).and_then(value_text);
        Self {
            bedrooms: at(0),
            bathrooms: at(1),
            sqft: at(2),
            deposit: at(3),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Unit {
    #[serde(default, rename = "type", deserialize_with = "lenient_text")]
    pub unit_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub price: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub sqft: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub availability: Option<String>,
}

/// Decode a dataset payload: a JSON array of listings.
/// Entries that are not objects are skipped; anything but an array is an error.
pub fn decode_listings(payload: &str) -> Result<Vec<SourceListing>, FetchError> {
    let raw: Vec<Value> =
        serde_json::from_str(payload).map_err(|e| FetchError::Decode(e.to_string()))?;

    let total = raw.len();
    let listings: Vec<SourceListing> = raw
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect();

    if listings.len() < total {
        tracing::warn!(
            skipped = total - listings.len(),
            "skipped listing entries that were not objects"
        );
    }
    Ok(listings)
}

/// Text form of a scalar. Empty strings count as absent.
pub fn value_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Text for a list item: a scalar, or an object's `name`/`url`/`title`.
fn item_text(v: &Value) -> Option<String> {
    match v {
        Value::Object(map) => ["name", "url", "title"]
            .iter()
            .find_map(|k| map.get(*k).and_then(value_text)),
        other => value_text(other),
    }
}

fn lenient_text<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(d)?;
    Ok(value_text(&v))
}

fn lenient_f64<'de, D>(d: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(d)?;
    Ok(match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|f: &f64| f.is_finite()))
}

fn lenient<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let v = Value::deserialize(d)?;
    Ok(match v {
        Value::Object(_) => serde_json::from_value(v).unwrap_or_default(),
        _ => T::default(),
    })
}

fn lenient_seq<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let v = Value::deserialize(d)?;
    Ok(match v {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Like `lenient_seq`, but only objects become records.
fn lenient_record_seq<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let v = Value::deserialize(d)?;
    Ok(match v {
        Value::Array(items) => items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_text_seq<'de, D>(d: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(d)?;
    Ok(match v {
        Value::Array(items) => items.iter().filter_map(item_text).collect(),
        _ => Vec::new(),
    })
}

fn positional_details<'de, D>(d: D) -> Result<ModelDetails, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(d)?;
    Ok(match v {
        Value::Array(items) => ModelDetails::from_positions(&items),
        _ => ModelDetails::default(),
    })
}
