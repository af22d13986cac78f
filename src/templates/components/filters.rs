use crate::domain::FilterSpec;
use maud::{html, Markup};

/// Sidebar search form. Submits back to the dashboard as a GET so results are linkable.
pub fn filter_form(spec: &FilterSpec, show_map: bool) -> Markup {
    let number = |n: Option<i64>| n.map(|n| n.to_string()).unwrap_or_default();
    let move_in_by = spec.move_in_by.map(|d| d.format("%Y-%m-%d").to_string());

    html! {
        form class="filters card" method="get" action="/dashboard" {
            h3 { "Search Filters" }
            input type="hidden" name="search" value="1";

            label for="name" { "Apartment name" }
            input type="text" id="name" name="name" value=[spec.name_contains.as_deref()];

            label for="move_in_by" { "Move-in date" }
            input type="date" id="move_in_by" name="move_in_by"
                value=[move_in_by];

            label for="max_rent" { "Max rent ($)" }
            input type="number" id="max_rent" name="max_rent" min="0" step="100"
                value=(number(spec.max_rent));

            label for="neighborhood" { "Neighborhood" }
            input type="text" id="neighborhood" name="neighborhood"
                value=[spec.neighborhood_contains.as_deref()];

            label for="bedrooms" { "Bedrooms (e.g. Studio, 1 Bed, 2 Beds)" }
            input type="text" id="bedrooms" name="bedrooms"
                value=[spec.bedrooms_contains.as_deref()];

            label for="min_sqft" { "Minimum square footage" }
            input type="number" id="min_sqft" name="min_sqft" min="0" step="50"
                value=(number(spec.min_sqft));

            label {
                input type="checkbox" name="show_all_units" value="1" checked[spec.show_all_units];
                " Show all units"
            }
            label {
                input type="checkbox" name="map" value="1" checked[show_map];
                " Map view"
            }

            p { button type="submit" { "Search" } }
        }
    }
}
