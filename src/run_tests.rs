use std::fs;

use anyhow::{bail, Result};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use crate::config::{Config, DuplicatePolicy, RefreshMode};
use crate::run;

fn config(dir: &TempDir, input: &str) -> Result<Config> {
    let input_path = dir.path().join("sales.csv");
    fs::write(&input_path, input)?;

    Ok(Config {
        input: input_path,
        output_dir: dir.path().join("out"),
        store: None,
        log_file: None,
        duplicates: DuplicatePolicy::KeepFirst,
        max_bad_cells: None,
        refresh: RefreshMode::Replace,
    })
}

#[test]
fn test_run_writes_csv_reports_and_store_tables() -> Result<()> {
    let dir = TempDir::new()?;
    let config = config(&dir, "Country,2000 Sales,2001 Sales\nUSA,100,150\nChile,\"1,000\",abc\n")?;

    run(&config)?;

    assert_eq!(
        fs::read_to_string(config.output_dir.join("sales_totals.csv"))?,
        "Country,2000 Sales,2001 Sales,Total Sales,Average Sales\n\
         USA,100,150,250,125\n\
         Chile,1000,,1000,1000\n"
    );
    assert_eq!(
        fs::read_to_string(config.output_dir.join("sales_growth.csv"))?,
        "Country,Growth 2000-2001\nUSA,50\nChile,\n"
    );

    let conn = duckdb::Connection::open(config.store_path())?;
    let totals: i64 = conn.query_row("SELECT count(*) FROM sales_totals", [], |row| row.get(0))?;
    assert_eq!(totals, 2);

    let average: Option<f64> = conn.query_row(
        "SELECT \"Average Sales\" FROM sales_totals WHERE Country = 'USA'",
        [],
        |row| row.get(0),
    )?;
    assert_eq!(average, Some(125.0));

    let growth: Option<f64> = conn.query_row(
        "SELECT \"Growth 2000-2001\" FROM sales_growth WHERE Country = 'Chile'",
        [],
        |row| row.get(0),
    )?;
    assert_eq!(growth, None);

    Ok(())
}

#[test]
fn test_run_rejects_a_bad_header() -> Result<()> {
    let dir = TempDir::new()?;
    let config = config(&dir, "Nation,2000 Sales\nUSA,1\n")?;

    if run(&config).is_ok() {
        bail!("a header without a Country column should fail the run");
    }

    Ok(())
}

#[test]
fn test_run_handles_a_missing_input_file() -> Result<()> {
    let dir = TempDir::new()?;
    let config = Config {
        input: dir.path().join("absent.csv"),
        output_dir: dir.path().join("out"),
        store: None,
        log_file: None,
        duplicates: DuplicatePolicy::KeepFirst,
        max_bad_cells: None,
        refresh: RefreshMode::Replace,
    };

    if run(&config).is_ok() {
        bail!("a missing input file should fail the run");
    }

    Ok(())
}
