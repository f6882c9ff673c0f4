use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Env, Target};
use log::{error, info};

use salesmill::config::{Config, DuplicatePolicy, RefreshMode};

#[derive(Debug, Parser)]
#[command(name = "salesmill", version, about = "Derive sales reports from a yearly sales CSV")]
struct Cli {
    /// Input CSV with a Country column and one `<year> Sales` column per year.
    input: PathBuf,

    /// Directory that receives the report CSVs, created if missing.
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Relational store file. Defaults to sales.duckdb under the output directory.
    #[arg(long)]
    store: Option<PathBuf>,

    /// Append log output to this file instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// What to do when the same country appears on several rows.
    #[arg(long, value_enum, default_value_t = DuplicatePolicy::KeepFirst)]
    duplicates: DuplicatePolicy,

    /// Drop a row outright when more than this many of its cells fail coercion.
    #[arg(long)]
    max_bad_cells: Option<usize>,

    /// How report tables written by earlier runs are refreshed in the store.
    #[arg(long, value_enum, default_value_t = RefreshMode::Replace)]
    refresh: RefreshMode,
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    if let Some(path) = log_file {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("cannot create log directory {}", parent.display()))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("cannot open log file {}", path.display()))?;
        builder.target(Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let config = Config {
        input: cli.input,
        output_dir: cli.output_dir,
        store: cli.store,
        log_file: cli.log_file,
        duplicates: cli.duplicates,
        max_bad_cells: cli.max_bad_cells,
        refresh: cli.refresh,
    };

    if let Err(err) = init_logging(config.log_file.as_deref()) {
        eprintln!("{err:#}");
        process::exit(1);
    }

    if let Err(err) = salesmill::run(&config) {
        error!("pipeline failed: {err:#}");
        process::exit(1);
    }
    info!("pipeline completed");
}
