use std::fs;
use std::path::{Path, PathBuf};

use duckdb::{params, Connection, ToSql};
use log::info;

use crate::config::RefreshMode;
use crate::pipeline::table::{ReportTable, COUNTRY_COLUMN};

use super::SinkError;

/// Relational sink backed by an embedded DuckDB database file. One table
/// per report, country text column first, one DOUBLE column per report
/// column, nulls kept as NULL.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Opens the database at `path`, creating the file and any missing
    /// parent directories.
    pub fn open(path: &Path) -> Result<Store, SinkError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|source| SinkError::Io { path: path.to_path_buf(), source })?;
        }
        let conn = Connection::open(path)
            .map_err(|source| SinkError::StoreOpen { path: path.to_path_buf(), source })?;
        Ok(Store { conn })
    }

    /// Opens a transient in-memory database.
    pub fn open_in_memory() -> Result<Store, SinkError> {
        let conn = Connection::open_in_memory().map_err(|source| SinkError::StoreOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        Ok(Store { conn })
    }

    /// Materializes a report as table `name` according to `refresh`.
    pub fn write_table(
        &self,
        name: &str,
        report: &ReportTable,
        refresh: RefreshMode,
    ) -> Result<(), SinkError> {
        let store_err = |source| SinkError::Store { table: name.to_string(), source };
        match refresh {
            RefreshMode::Replace => self.replace_table(name, report).map_err(store_err)?,
            RefreshMode::Upsert => self.upsert_table(name, report)?,
        }
        info!("stored {} rows in table '{}'", report.rows().len(), name);
        Ok(())
    }

    /// Drops any previous table of the same name and rebuilds it from
    /// scratch, so the table always mirrors the latest run.
    fn replace_table(&self, name: &str, report: &ReportTable) -> Result<(), duckdb::Error> {
        let table = quote_ident(name);
        self.conn.execute_batch(&format!(
            "DROP TABLE IF EXISTS {table}; CREATE TABLE {table} ({});",
            column_defs(report, false)
        ))?;

        let insert =
            format!("INSERT INTO {table} VALUES ({})", placeholders(report.columns().len() + 1));
        self.insert_rows(&insert, report)
    }

    /// Inserts into an existing table keyed by country, updating rows for
    /// countries already present. The table must have the same column
    /// count as the report.
    fn upsert_table(&self, name: &str, report: &ReportTable) -> Result<(), SinkError> {
        let store_err = |source| SinkError::Store { table: name.to_string(), source };
        let table = quote_ident(name);
        let country = quote_ident(COUNTRY_COLUMN);

        self.conn
            .execute(
                &format!("CREATE TABLE IF NOT EXISTS {table} ({})", column_defs(report, true)),
                [],
            )
            .map_err(store_err)?;

        let expected = report.columns().len() + 1;
        let found: i64 = self
            .conn
            .query_row(
                "SELECT count(*) FROM information_schema.columns WHERE table_name = ?",
                params![name],
                |row| row.get(0),
            )
            .map_err(store_err)?;
        if found as usize != expected {
            return Err(SinkError::ColumnMismatch {
                table: name.to_string(),
                found: found as usize,
                expected,
            });
        }

        let insert = if report.columns().is_empty() {
            format!("INSERT INTO {table} VALUES (?) ON CONFLICT ({country}) DO NOTHING")
        } else {
            let updates = report
                .columns()
                .iter()
                .map(|column| {
                    let quoted = quote_ident(column);
                    format!("{quoted} = excluded.{quoted}")
                })
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "INSERT INTO {table} VALUES ({}) ON CONFLICT ({country}) DO UPDATE SET {updates}",
                placeholders(expected)
            )
        };
        self.insert_rows(&insert, report).map_err(store_err)
    }

    fn insert_rows(&self, sql: &str, report: &ReportTable) -> Result<(), duckdb::Error> {
        let mut statement = self.conn.prepare(sql)?;
        for row in report.rows() {
            let mut values: Vec<&dyn ToSql> = Vec::with_capacity(row.values().len() + 1);
            values.push(row.country());
            for value in row.values() {
                values.push(value);
            }
            statement.execute(values.as_slice())?;
        }
        Ok(())
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn column_defs(report: &ReportTable, keyed: bool) -> String {
    let key = if keyed { " PRIMARY KEY" } else { "" };
    let mut defs = vec![format!("{} VARCHAR{key}", quote_ident(COUNTRY_COLUMN))];
    defs.extend(report.columns().iter().map(|column| format!("{} DOUBLE", quote_ident(column))));
    defs.join(", ")
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}
