use std::fs;

use anyhow::Result;
use pretty_assertions::assert_eq;
use serde::Deserialize;
use tempfile::TempDir;

use super::*;
use crate::pipeline::table::{ReportRow, ReportTable};

fn report(columns: &[&str], rows: &[(&str, &[Option<f64>])]) -> ReportTable {
    ReportTable::new(
        columns.iter().map(|c| c.to_string()).collect(),
        rows.iter()
            .map(|(country, values)| ReportRow::new(country.to_string(), values.to_vec()))
            .collect(),
    )
}

#[test]
fn test_write_csv_renders_header_and_null_cells() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("totals.csv");
    let table = report(
        &["2000 Sales", "Total Sales"],
        &[("USA", &[Some(10.0), Some(10.0)]), ("Chile", &[None, Some(0.0)])],
    );

    write_csv(&table, &path)?;

    assert_eq!(
        fs::read_to_string(&path)?,
        "Country,2000 Sales,Total Sales\nUSA,10,10\nChile,,0\n"
    );

    Ok(())
}

#[test]
fn test_write_csv_overwrites_previous_output() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("totals.csv");

    write_csv(&report(&["2000 Sales"], &[("USA", &[Some(1.0)]), ("Chile", &[Some(2.0)])]), &path)?;
    write_csv(&report(&["2000 Sales"], &[("Japan", &[Some(3.0)])]), &path)?;

    assert_eq!(fs::read_to_string(&path)?, "Country,2000 Sales\nJapan,3\n");

    Ok(())
}

#[test]
fn test_write_csv_creates_missing_directories() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("nested/reports/growth.csv");

    write_csv(&report(&["Growth 2000-2001"], &[("USA", &[None])]), &path)?;

    assert_eq!(fs::read_to_string(&path)?, "Country,Growth 2000-2001\nUSA,\n");

    Ok(())
}

#[derive(Debug, PartialEq, Deserialize)]
struct TotalsLine {
    #[serde(rename = "Country")]
    country: String,
    #[serde(rename = "2000 Sales")]
    sales: Option<f64>,
    #[serde(rename = "Total Sales")]
    total: Option<f64>,
}

#[test]
fn test_written_csv_reads_back_with_nulls_intact() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("totals.csv");
    write_csv(&report(&["2000 Sales", "Total Sales"], &[("USA", &[None, Some(250.5)])]), &path)?;

    let mut reader = csv::Reader::from_path(&path)?;
    let lines: Vec<TotalsLine> = reader.deserialize().collect::<Result<_, _>>()?;

    assert_eq!(
        lines,
        vec![TotalsLine { country: "USA".to_string(), sales: None, total: Some(250.5) }]
    );

    Ok(())
}
