use std::fs::{self, File};
use std::path::{Path, PathBuf};

use log::info;
use thiserror::Error;

use crate::pipeline::table::{ReportTable, COUNTRY_COLUMN};

pub mod store;

#[cfg(test)]
mod sink_tests;

/// Materialization failures, always carrying the destination that failed.
/// Never retried; the runner surfaces these and stops.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("csv output {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("cannot open store {path}: {source}")]
    StoreOpen {
        path: PathBuf,
        #[source]
        source: duckdb::Error,
    },
    #[error("store table '{table}': {source}")]
    Store {
        table: String,
        #[source]
        source: duckdb::Error,
    },
    #[error("store table '{table}' has {found} columns, expected {expected}")]
    ColumnMismatch { table: String, found: usize, expected: usize },
}

/// Serializes a report as CSV, header first, nulls as empty fields.
/// Creates missing parent directories and overwrites any existing file.
pub fn write_csv(report: &ReportTable, path: &Path) -> Result<(), SinkError> {
    let io_err = |source| SinkError::Io { path: path.to_path_buf(), source };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let file = File::create(path).map_err(io_err)?;

    let mut writer = csv::WriterBuilder::new().from_writer(file);
    let csv_err = |source| SinkError::Csv { path: path.to_path_buf(), source };

    let mut header = Vec::with_capacity(report.columns().len() + 1);
    header.push(COUNTRY_COLUMN);
    header.extend(report.columns().iter().map(String::as_str));
    writer.write_record(&header).map_err(csv_err)?;

    for row in report.rows() {
        let mut record = Vec::with_capacity(header.len());
        record.push(row.country().clone());
        record.extend(row.values().iter().map(format_cell));
        writer.write_record(&record).map_err(csv_err)?;
    }

    writer.flush().map_err(io_err)?;
    info!("wrote {} rows to {}", report.rows().len(), path.display());
    Ok(())
}

fn format_cell(value: &Option<f64>) -> String {
    match value {
        Some(number) => number.to_string(),
        None => String::new(),
    }
}
