use crate::domain::record::{FlatRecord, NO_URL};
use maud::{html, Markup};
use url::Url;

/// `raw` if it is an absolute http(s) URL; anything else is not put in an attribute.
fn web_url(raw: &str) -> Option<&str> {
    let parsed = Url::parse(raw.trim()).ok()?;
    matches!(parsed.scheme(), "http" | "https").then_some(raw)
}

pub fn apartment_card(record: &FlatRecord) -> Markup {
    let photo = record.photos.iter().find_map(|p| web_url(p));
    let link = (record.url != NO_URL)
        .then(|| web_url(&record.url))
        .flatten();

    html! {
        article class="apartment-card" {
            @if let Some(photo) = photo {
                img src=(photo) alt=(record.property_name) loading="lazy";
            }
            h2 { (record.property_name) }
            p { b { "Address: " } (record.address) " - " (record.neighborhood) }
            p { b { "Floorplan: " } (record.floorplan) " · " b { "Unit: " } (record.unit_number) }
            p {
                (record.bedrooms) " · " (record.bathrooms) " · " (record.square_footage)
            }
            p class="rent-price" { "Rent: " (record.rent) }
            p { b { "Rent range: " } (record.rent_range) " · " b { "Deposit: " } (record.deposit) }
            p { b { "Available: " } (record.availability) }
            p {
                b { "Walk score: " } (record.walk_score)
                " · "
                b { "Transit score: " } (record.transit_score)
            }
            p { b { "Parking Fees: " } (record.parking_fees) }
            p { b { "Pet Fees: " } (record.pet_fees) }

            @if !record.schools_nearby.is_empty() {
                details {
                    summary { "Schools nearby (" (record.schools_nearby.len()) ")" }
                    ul { @for school in &record.schools_nearby { li { (school) } } }
                }
            }
            @if !record.nearby_poi.is_empty() {
                details {
                    summary { "Nearby points of interest (" (record.nearby_poi.len()) ")" }
                    ul { @for poi in &record.nearby_poi { li { (poi) } } }
                }
            }

            p { (record.description) }
            @if let Some(link) = link {
                a href=(link) target="_blank" rel="noopener" { "View Listing" }
            }
        }
    }
}
