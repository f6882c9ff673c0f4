use std::path::PathBuf;

use clap::ValueEnum;

/// Store file created under the output directory when no path is given.
pub const DEFAULT_STORE_FILE: &str = "sales.duckdb";

/// What sanitize does when the same country appears twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DuplicatePolicy {
    /// Keep the first row and drop the rest, with a warning each.
    KeepFirst,
    /// Abort the run.
    Error,
}

/// How a report table replaces the previous run's table in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RefreshMode {
    /// Drop and recreate the table. Destructive full refresh.
    Replace,
    /// Update existing countries in place and insert new ones.
    Upsert,
}

/// Everything one pipeline run needs to know.
#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    /// Store file; defaults to [`DEFAULT_STORE_FILE`] under `output_dir`.
    pub store: Option<PathBuf>,
    /// Append log output here instead of stderr.
    pub log_file: Option<PathBuf>,
    pub duplicates: DuplicatePolicy,
    /// Drop a row when more than this many of its cells fail coercion.
    pub max_bad_cells: Option<usize>,
    pub refresh: RefreshMode,
}

impl Config {
    pub fn store_path(&self) -> PathBuf {
        match &self.store {
            Some(path) => path.clone(),
            None => self.output_dir.join(DEFAULT_STORE_FILE),
        }
    }
}
