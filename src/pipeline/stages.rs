use std::collections::HashSet;

use log::{debug, info, warn};

use super::table::{RawTable, SalesRow, SalesSchema, SalesTable, TextRow, TextTable};
use super::SchemaError;
use crate::config::DuplicatePolicy;

/// String-level cleanup: checks the header shape, trims every cell, drops
/// blank rows and rows without a country, and applies the duplicate-country
/// policy. No numeric interpretation happens here, so sanitizing an already
/// sanitized table changes nothing.
pub fn sanitize(raw: RawTable, duplicates: DuplicatePolicy) -> Result<TextTable, SchemaError> {
    let schema = SalesSchema::from_headers(&raw.headers)?;
    let width = raw.headers.len();
    let total = raw.rows.len();

    if raw.rows.is_empty() {
        warn!("input has a header but no data rows");
    }

    let mut seen = HashSet::new();
    let mut rows = Vec::with_capacity(total);

    for (index, cells) in raw.rows.into_iter().enumerate() {
        // Header is line 1 of the file.
        let line = index + 2;

        let mut cells: Vec<String> =
            cells.into_iter().map(|cell| cell.trim().to_string()).collect();
        cells.resize(width, String::new());

        if cells.iter().all(|cell| cell.is_empty()) {
            debug!("line {line}: blank row dropped");
            continue;
        }

        let country = cells.remove(0);
        if country.is_empty() {
            warn!("line {line}: row without a country dropped");
            continue;
        }

        if !seen.insert(country.clone()) {
            match duplicates {
                DuplicatePolicy::KeepFirst => {
                    warn!("line {line}: duplicate country '{country}' dropped, keeping the first");
                    continue;
                }
                DuplicatePolicy::Error => return Err(SchemaError::DuplicateCountry(country)),
            }
        }

        rows.push(TextRow::new(country, cells));
    }

    info!("sanitized input: kept {} of {} rows", rows.len(), total);
    Ok(TextTable::new(schema, rows))
}

/// Numeric coercion with null fallback: one bad cell does not drop the row.
/// A row is only dropped when `max_bad_cells` is set and its unparseable
/// cell count exceeds that limit.
pub fn validate(table: TextTable, max_bad_cells: Option<usize>) -> SalesTable {
    info!("coercing year cells to numbers; one bad cell does not drop the row");

    let (schema, rows) = table.into_parts();
    let mut out = Vec::with_capacity(rows.len());

    for row in rows {
        let (country, cells) = row.into_parts();
        let mut values = Vec::with_capacity(cells.len());
        let mut bad = 0usize;

        for (year, cell) in schema.years().iter().zip(cells.iter()) {
            match coerce_sales(cell) {
                Coerced::Value(value) => values.push(Some(value)),
                Coerced::Missing => values.push(None),
                Coerced::Bad => {
                    warn!(
                        "country '{country}', column '{year} Sales': \
                         cannot read '{cell}' as a number, treating as missing"
                    );
                    values.push(None);
                    bad += 1;
                }
            }
        }

        if let Some(limit) = max_bad_cells {
            if bad > limit {
                warn!("country '{country}': {bad} unparseable cells exceed the limit of {limit}, row dropped");
                continue;
            }
        }

        out.push(SalesRow::new(country, values));
    }

    SalesTable::new(schema, out)
}

enum Coerced {
    Value(f64),
    Missing,
    Bad,
}

/// Accepts optionally signed decimals with comma thousands separators.
/// Anything else, including non-finite parses, counts as a bad cell.
fn coerce_sales(cell: &str) -> Coerced {
    if cell.is_empty() {
        return Coerced::Missing;
    }

    match cell.replace(',', "").parse::<f64>() {
        Ok(value) if value.is_finite() => Coerced::Value(value),
        _ => Coerced::Bad,
    }
}
