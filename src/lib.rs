//! Batch processor for per-country yearly sales figures. Reads one CSV,
//! sanitizes and coerces it, derives totals and year-over-year growth
//! reports, and writes every report both as CSV and as a table in an
//! embedded relational store.

pub mod config;
pub mod data;
pub mod pipeline;
pub mod sink;

#[cfg(test)]
mod run_tests;

use std::fs;

use anyhow::{Context, Result};
use log::info;

use config::Config;
use pipeline::reports::{Growth, Report, Totals};
use pipeline::{stages, DeriveReport};
use sink::store::Store;

/// Runs the whole pipeline for one input file. Stops on the first
/// schema or output error; bad cells and bad rows only log.
pub fn run(config: &Config) -> Result<()> {
    fs::create_dir_all(&config.output_dir).with_context(|| {
        format!("cannot create output directory {}", config.output_dir.display())
    })?;

    let raw = data::read_raw(&config.input)?;
    let text = stages::sanitize(raw, config.duplicates)
        .with_context(|| format!("rejecting input {}", config.input.display()))?;
    let sales = stages::validate(text, config.max_bad_cells);

    let store = Store::open(&config.store_path())?;

    for report in [Report::Totals(Totals), Report::Growth(Growth)] {
        let label = report.label();
        let table = report.derive(&sales);
        info!("derived report '{}' with {} rows", label, table.rows().len());

        sink::write_csv(&table, &config.output_dir.join(format!("{label}.csv")))?;
        store.write_table(label, &table, config.refresh)?;
    }

    Ok(())
}
