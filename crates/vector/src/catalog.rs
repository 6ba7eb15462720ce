use rfqmatch_common::{Result, RfqMatchError};
use std::io::Read;
use std::path::Path;
use tracing::info;

use crate::types::CatalogEntry;

const SKU_COLUMN: &str = "SKU";
const BRAND_COLUMN: &str = "Brand";
const DESCRIPTION_COLUMN: &str = "Description";

/// Load catalog rows from a CSV file
pub fn load_catalog(path: &Path, quantity_column: &str) -> Result<Vec<CatalogEntry>> {
    let file = std::fs::File::open(path).map_err(|e| {
        RfqMatchError::catalog(format!("Failed to open catalog {}: {}", path.display(), e))
    })?;

    let entries = read_catalog(file, quantity_column)?;
    info!("Loaded {} catalog rows from {}", entries.len(), path.display());
    Ok(entries)
}

/// Read catalog rows from any CSV source
///
/// `SKU`, `Brand` and `Description` are required columns; the quantity
/// column is optional. Missing cells become empty strings.
pub fn read_catalog<R: Read>(reader: R, quantity_column: &str) -> Result<Vec<CatalogEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h == name);

    let (sku_idx, brand_idx, desc_idx) = match (
        column(SKU_COLUMN),
        column(BRAND_COLUMN),
        column(DESCRIPTION_COLUMN),
    ) {
        (Some(s), Some(b), Some(d)) => (s, b, d),
        _ => {
            return Err(RfqMatchError::catalog(format!(
                "catalog must have columns {}, {}, {} (found: {})",
                SKU_COLUMN,
                BRAND_COLUMN,
                DESCRIPTION_COLUMN,
                headers.iter().collect::<Vec<_>>().join(", ")
            )));
        }
    };
    let qty_idx = column(quantity_column);

    let mut entries = Vec::new();
    for record in reader.records() {
        let record = record?;
        let cell = |idx: usize| record.get(idx).unwrap_or("").to_string();

        entries.push(CatalogEntry {
            sku: cell(sku_idx),
            brand: cell(brand_idx),
            description: cell(desc_idx),
            monthly_quantity: qty_idx
                .and_then(|idx| record.get(idx))
                .map(parse_quantity)
                .unwrap_or(1),
        });
    }

    Ok(entries)
}

/// Coerce a demand cell to an integer
///
/// Thousands separators are stripped and fractions truncated; anything
/// that is not a non-negative number becomes 1.
pub fn parse_quantity(raw: &str) -> u64 {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => v.trunc() as u64,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("12"), 12);
        assert_eq!(parse_quantity("1,200"), 1200);
        assert_eq!(parse_quantity(" 2,500.75 "), 2500);
        assert_eq!(parse_quantity(""), 1);
        assert_eq!(parse_quantity("n/a"), 1);
        assert_eq!(parse_quantity("-4"), 1);
        assert_eq!(parse_quantity("NaN"), 1);
    }

    #[test]
    fn test_read_catalog() {
        let csv = "SKU,Brand,Description,Monthly Quantity,Notes\n\
                   A-1,Acme,Steel Bolt,\"1,200\",x\n\
                   B-2,,Hex Nut,abc,y\n\
                   C-3,Globex,,,\n";
        let entries = read_catalog(csv.as_bytes(), "Monthly Quantity").unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].sku, "A-1");
        assert_eq!(entries[0].monthly_quantity, 1200);
        assert_eq!(entries[1].brand, "");
        assert_eq!(entries[1].monthly_quantity, 1);
        assert_eq!(entries[2].description, "");
        assert_eq!(entries[2].combined_text(), "Globex ");
    }

    #[test]
    fn test_short_rows_fill_empty() {
        let csv = "SKU,Brand,Description\nA-1,Acme\n";
        let entries = read_catalog(csv.as_bytes(), "Qty").unwrap();
        assert_eq!(entries[0].description, "");
        assert_eq!(entries[0].monthly_quantity, 1);
    }

    #[test]
    fn test_missing_required_column() {
        let csv = "SKU,Description\nA-1,Steel Bolt\n";
        let err = read_catalog(csv.as_bytes(), "Qty").unwrap_err();
        assert!(matches!(err, RfqMatchError::Catalog(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = load_catalog(Path::new("/nonexistent/catalog.csv"), "Qty").unwrap_err();
        assert!(matches!(err, RfqMatchError::Catalog(_)));
    }
}
