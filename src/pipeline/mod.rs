use enum_dispatch::enum_dispatch;
use thiserror::Error;

pub mod reports;
pub mod stages;
pub mod table;


use reports::{Growth, Report, Totals};
use table::{ReportTable, SalesTable};

/// Fatal input-shape failures. Cell-level data quality is never an error;
/// the stages absorb it and log instead.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("input has no columns")]
    EmptyHeader,
    #[error("first column must be 'Country', found '{0}'")]
    MissingCountry(String),
    #[error("header has no '<year> Sales' columns")]
    NoYearColumns,
    #[error("column '{0}' is not of the form '<year> Sales'")]
    BadYearColumn(String),
    #[error("year columns must increase by one: '{found} Sales' follows '{previous} Sales'")]
    YearGap { previous: i32, found: i32 },
    #[error("duplicate country '{0}'")]
    DuplicateCountry(String),
}

/// One derived report over the validated sales table.
#[enum_dispatch]
pub trait DeriveReport {
    /// Stable name used for the output file and the store table.
    fn label(&self) -> &'static str;

    fn derive(&self, table: &SalesTable) -> ReportTable;
}
