// src/domain/neighborhoods.rs

use std::collections::HashMap;
use std::fs;
use std::path::Path;

const NAME_COLUMNS: [&str; 3] = ["property name", "property_name", "propertyname"];
const NEIGHBORHOOD_COLUMNS: [&str; 3] = [
    "corrected neighborhood",
    "corrected_neighborhood",
    "neighborhood",
];

/// Property name -> corrected neighborhood. Loaded once, read-only afterwards.
#[derive(Debug, Default, Clone)]
pub struct NeighborhoodOverrides {
    by_property: HashMap<String, String>,
}

impl NeighborhoodOverrides {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the table from a CSV file. A missing or malformed file yields an empty table.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(text) => {
                let table = Self::from_csv(&text);
                tracing::info!(
                    path = %path.display(),
                    entries = table.len(),
                    "loaded neighborhood overrides"
                );
                table
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "neighborhood override table unavailable, using raw neighborhoods"
                );
                Self::empty()
            }
        }
    }

    /// Parse CSV text with a header row. Column names are matched case-insensitively;
    /// rows that fail to parse or have blank cells are skipped.
    pub fn from_csv(text: &str) -> Self {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let headers = match reader.headers() {
            Ok(h) => h.clone(),
            Err(e) => {
                tracing::warn!(error = %e, "neighborhood override table has no readable header");
                return Self::empty();
            }
        };

        let find = |names: &[&str]| {
            names.iter().find_map(|wanted| {
                headers
                    .iter()
                    .position(|h| h.trim_start_matches('\u{feff}').eq_ignore_ascii_case(wanted))
            })
        };

        let (Some(name_col), Some(hood_col)) = (find(&NAME_COLUMNS), find(&NEIGHBORHOOD_COLUMNS))
        else {
            tracing::warn!(
                headers = ?headers.iter().collect::<Vec<_>>(),
                "neighborhood override table is missing its name or neighborhood column"
            );
            return Self::empty();
        };

        let by_property = reader
            .records()
            .filter_map(Result::ok)
            .filter_map(|row| {
                let name = row.get(name_col)?;
                let hood = row.get(hood_col)?;
                (!name.is_empty() && !hood.is_empty()).then(|| (name.to_string(), hood.to_string()))
            })
            .collect();

        Self { by_property }
    }

    /// The corrected neighborhood for `property_name`, or `raw` unchanged.
    pub fn correct<'a>(&'a self, property_name: &str, raw: &'a str) -> &'a str {
        self.by_property
            .get(property_name)
            .map(String::as_str)
            .unwrap_or(raw)
    }

    pub fn len(&self) -> usize {
        self.by_property.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_property.is_empty()
    }
}

impl FromIterator<(String, String)> for NeighborhoodOverrides {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            by_property: iter.into_iter().collect(),
        }
    }
}
