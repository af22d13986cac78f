use crate::domain::FlatRecord;
use maud::{html, Markup, PreEscaped};
use serde::Serialize;

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";

#[derive(Serialize)]
struct Marker<'a> {
    lat: f64,
    lng: f64,
    title: &'a str,
    rent: &'a str,
    unit: &'a str,
}

fn markers(records: &[FlatRecord]) -> Vec<Marker<'_>> {
    records
        .iter()
        .filter_map(|r| {
            let (lat, lng) = r.coordinates()?;
            Some(Marker {
                lat,
                lng,
                title: &r.property_name,
                rent: &r.rent,
                unit: &r.unit_number,
            })
        })
        .collect()
}

/// Leaflet map with one marker per record that has coordinates.
pub fn map_panel(records: &[FlatRecord]) -> Markup {
    let markers = markers(records);
    if markers.is_empty() {
        return html! {
            p class="card" { "No coordinates available for these results." }
        };
    }

    // `</` would end the script element early
    let data = serde_json::to_string(&markers)
        .unwrap_or_else(|_| "[]".to_string())
        .replace("</", "<\\/");

    let script = format!(
        r#"
(function () {{
  var markers = {data};
  var map = L.map('map');
  L.tileLayer('https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png', {{
    maxZoom: 19,
    attribution: '&copy; OpenStreetMap contributors'
  }}).addTo(map);
  var bounds = [];
  markers.forEach(function (m) {{
    var label = document.createElement('div');
    label.textContent = m.title + ' #' + m.unit + ' - ' + m.rent;
    L.marker([m.lat, m.lng]).addTo(map).bindPopup(label);
    bounds.push([m.lat, m.lng]);
  }});
  map.fitBounds(bounds, {{ padding: [24, 24], maxZoom: 15 }});
}})();
"#
    );

    html! {
        link rel="stylesheet" href=(LEAFLET_CSS);
        script src=(LEAFLET_JS) {}
        div id="map" {}
        script { (PreEscaped(script)) }
    }
}
