use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use crate::pipeline::table::RawTable;

/// Reads the whole input CSV into memory, untouched: no trimming, no
/// coercion. Ragged rows are padded (or cut) to the header width so the
/// sanitize stage always sees one cell per column.
pub fn read_raw(path: &Path) -> Result<RawTable> {
    let file =
        File::open(path).with_context(|| format!("cannot open input file {}", path.display()))?;
    read_raw_from(file).with_context(|| format!("cannot read input file {}", path.display()))
}

pub fn read_raw_from<R: Read>(reader: R) -> Result<RawTable> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
    let width = headers.len();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let mut cells: Vec<String> = record.iter().map(str::to_string).collect();
        cells.resize(width, String::new());
        rows.push(cells);
    }

    info!("read {} data rows from input", rows.len());
    Ok(RawTable { headers, rows })
}
