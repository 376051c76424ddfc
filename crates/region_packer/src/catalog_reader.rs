use crate::catalog::{Catalog, Region};
use crate::constants::{EXPECTED_HEIGHT_HEADER, EXPECTED_NAME_HEADER, EXPECTED_WIDTH_HEADER};
use crate::error::{PackError, Result};

use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Read;
use std::path::Path;

/// Reads a region catalog from a CSV file
///
/// # Arguments
/// * `path` - Path to a `Name,Width,Height` CSV file
///
/// # Errors
/// Returns error if the file cannot be read, the CSV format is invalid or the
/// regions fail catalog validation
pub fn read_catalog_csv<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let file = std::fs::File::open(path)?;
    read_catalog_from_reader(file)
}

/// Read CSV with `Name,Width,Height` format.
/// - Headers are matched case-insensitively, extra columns are ignored
/// - Blank rows are skipped
pub fn read_catalog_from_reader<R: Read>(reader: R) -> Result<Catalog> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    validate_csv_headers(&mut rdr)?;

    let mut regions = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let rec = result?;
        let row = i + 2; // CSV rows are 1-indexed, +1 for header

        if let Some(region) = parse_record(&rec, row)? {
            regions.push(region);
        }
    }

    Catalog::new(regions)
}

/// Validates CSV headers match expected format
fn validate_csv_headers<R: Read>(csv_reader: &mut csv::Reader<R>) -> Result<()> {
    let headers = csv_reader
        .headers()
        .map_err(|e| PackError::CsvHeader(format!("Failed to read headers: {}", e)))?;

    let expected = [
        EXPECTED_NAME_HEADER,
        EXPECTED_WIDTH_HEADER,
        EXPECTED_HEIGHT_HEADER,
    ];
    for (index, name) in expected.iter().enumerate() {
        let found = headers.get(index).ok_or_else(|| {
            PackError::CsvHeader(format!("Missing {} column at index {}", name, index))
        })?;
        if !found.eq_ignore_ascii_case(name) {
            return Err(PackError::CsvHeader(format!(
                "Expected '{}' in column {}, found '{}'",
                name, index, found
            )));
        }
    }

    Ok(())
}

fn parse_record(rec: &StringRecord, row: usize) -> Result<Option<Region>> {
    if rec.iter().all(|f| f.trim().is_empty()) {
        return Ok(None);
    }
    let name = get_column_value(rec, 0, row)?;
    let width = parse_dimension(get_column_value(rec, 1, row)?, "width", row)?;
    let height = parse_dimension(get_column_value(rec, 2, row)?, "height", row)?;

    Ok(Some(Region::new(name, width, height)))
}

/// Safely extracts a column value from a CSV record
fn get_column_value(record: &StringRecord, column_index: usize, row_number: usize) -> Result<&str> {
    record
        .get(column_index)
        .map(str::trim)
        .ok_or_else(|| PackError::CsvRow {
            row: row_number,
            got: record.len(),
        })
}

fn parse_dimension(value: &str, field: &'static str, row: usize) -> Result<u64> {
    value.parse().map_err(|source| PackError::FieldParse {
        row,
        field,
        value: value.to_string(),
        source,
    })
}
