use crate::domain::FlatRecord;
use crate::errors::ServerError;
use crate::responses::xlsx_response;
use crate::responses::ResultResp;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

const HEADERS: [&str; 24] = [
    "Property Name",
    "Address",
    "Neighborhood",
    "Rent",
    "Rent Range",
    "Deposit",
    "Floorplan",
    "Unit Number",
    "Bedrooms",
    "Bathrooms",
    "Square Footage",
    "Availability",
    "Availability Date",
    "Walk Score",
    "Transit Score",
    "Parking Fees",
    "Pet Fees",
    "Schools Nearby",
    "Nearby Points of Interest",
    "Description",
    "URL",
    "Photos",
    "Latitude",
    "Longitude",
];

/// Longest string Excel stores in one cell, in characters.
const MAX_CELL_CHARS: usize = 32_767;

fn cell_text(value: &str) -> &str {
    match value.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => &value[..end],
        None => value,
    }
}

fn xlsx_err(what: &str) -> impl Fn(XlsxError) -> ServerError + '_ {
    move |e| ServerError::XlsxError(format!("Failed to write {what}: {e}"))
}

/// One header row, then one row per record in the order given.
pub fn records_workbook(records: &[FlatRecord]) -> Result<Vec<u8>, ServerError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let bold = Format::new().set_bold();

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &bold)
            .map_err(xlsx_err(header))?;
    }

    for (i, record) in records.iter().enumerate() {
        write_record(worksheet, (i + 1) as u32, record)?;
    }

    worksheet.set_freeze_panes(1, 0).map_err(xlsx_err("header freeze"))?;

    workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {e}")))
}

fn write_record(ws: &mut Worksheet, row: u32, r: &FlatRecord) -> Result<(), ServerError> {
    let date = r
        .availability_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    let schools = r.schools_nearby.join(", ");
    let poi = r.nearby_poi.join(", ");
    let photos = r.photos.join(", ");

    let text_cells: [(&str, &str); 22] = [
        ("property name", &r.property_name),
        ("address", &r.address),
        ("neighborhood", &r.neighborhood),
        ("rent", &r.rent),
        ("rent range", &r.rent_range),
        ("deposit", &r.deposit),
        ("floorplan", &r.floorplan),
        ("unit number", &r.unit_number),
        ("bedrooms", &r.bedrooms),
        ("bathrooms", &r.bathrooms),
        ("square footage", &r.square_footage),
        ("availability", &r.availability),
        ("availability date", &date),
        ("walk score", &r.walk_score),
        ("transit score", &r.transit_score),
        ("parking fees", &r.parking_fees),
        ("pet fees", &r.pet_fees),
        ("schools", &schools),
        ("points of interest", &poi),
        ("description", &r.description),
        ("url", &r.url),
        ("photos", &photos),
    ];

    for (col, (what, value)) in text_cells.iter().enumerate() {
        ws.write_string(row, col as u16, cell_text(value))
            .map_err(xlsx_err(what))?;
    }

    if let Some((lat, lng)) = r.coordinates() {
        ws.write_number(row, 22, lat).map_err(xlsx_err("latitude"))?;
        ws.write_number(row, 23, lng).map_err(xlsx_err("longitude"))?;
    }

    Ok(())
}

pub fn export_records_xlsx(records: &[FlatRecord], filename: &str) -> ResultResp {
    let buffer = records_workbook(records)?;
    tracing::info!(rows = records.len(), filename, "exported listings workbook");
    xlsx_response(buffer, filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::fixtures::record;

    #[test]
    fn header_row_matches_record_columns() {
        let value = serde_json::to_value(record("A", "1", "$1")).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        for header in HEADERS {
            assert!(keys.contains(&header), "{header} is not a record column");
        }
        assert_eq!(keys.len(), HEADERS.len());
    }

    #[test]
    fn workbook_is_a_zip_archive() {
        let buffer = records_workbook(&[record("A", "1", "$1"), record("B", "2", "$2")]).unwrap();
        assert_eq!(&buffer[..2], b"PK");
    }

    #[test]
    fn oversized_description_is_cut_to_cell_limit() {
        let mut long = record("A", "1", "$1");
        long.description = "é".repeat(40_000);
        let buffer = records_workbook(&[long.clone()]).unwrap();
        assert_eq!(&buffer[..2], b"PK");

        let cut = cell_text(&long.description);
        assert_eq!(cut.chars().count(), MAX_CELL_CHARS);
        assert_eq!(cell_text("short"), "short");
    }
}
