use getset::Getters;

use super::SchemaError;

/// Name of the identity column every input must carry.
pub const COUNTRY_COLUMN: &str = "Country";

/// Raw parsed input: header and data cells exactly as they appear in the
/// file, padded so every row has one cell per header column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// The year columns declared by the input header, in header order.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct SalesSchema {
    /// Years covered by the input, ascending and contiguous.
    #[getset(get = "pub")]
    years: Vec<i32>,
}

impl SalesSchema {
    /// Parses and checks the header row: `Country` first, then one
    /// `<year> Sales` column per year, years increasing by one.
    pub fn from_headers(headers: &[String]) -> Result<SalesSchema, SchemaError> {
        let mut labels = headers.iter().map(|h| h.trim());

        let first = labels.next().ok_or(SchemaError::EmptyHeader)?;
        if first != COUNTRY_COLUMN {
            return Err(SchemaError::MissingCountry(first.to_string()));
        }

        let mut years = Vec::with_capacity(headers.len() - 1);
        for label in labels {
            let year =
                parse_year_label(label).ok_or_else(|| SchemaError::BadYearColumn(label.to_string()))?;
            if let Some(&previous) = years.last() {
                if year != previous + 1 {
                    return Err(SchemaError::YearGap { previous, found: year });
                }
            }
            years.push(year);
        }

        if years.is_empty() {
            return Err(SchemaError::NoYearColumns);
        }

        Ok(SalesSchema { years })
    }

    /// Column labels in input form, e.g. `2000 Sales`.
    pub fn year_labels(&self) -> Vec<String> {
        self.years.iter().map(|year| format!("{year} Sales")).collect()
    }
}

fn parse_year_label(label: &str) -> Option<i32> {
    let year = label.strip_suffix(" Sales")?;
    if year.is_empty() || !year.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    year.parse().ok()
}

/// String-level table produced by sanitize: trimmed cells, no blank or
/// duplicate countries, still uncoerced.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
#[getset(get = "pub")]
pub struct TextTable {
    schema: SalesSchema,
    rows: Vec<TextRow>,
}

impl TextTable {
    pub(crate) fn new(schema: SalesSchema, rows: Vec<TextRow>) -> TextTable {
        TextTable { schema, rows }
    }

    pub(crate) fn into_parts(self) -> (SalesSchema, Vec<TextRow>) {
        (self.schema, self.rows)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Getters)]
#[getset(get = "pub")]
pub struct TextRow {
    country: String,
    /// One cell per schema year.
    cells: Vec<String>,
}

impl TextRow {
    pub(crate) fn new(country: String, cells: Vec<String>) -> TextRow {
        TextRow { country, cells }
    }

    pub(crate) fn into_parts(self) -> (String, Vec<String>) {
        (self.country, self.cells)
    }
}

/// Numeric table produced by validate. Every present value is finite.
#[derive(Debug, Clone, PartialEq, Getters)]
#[getset(get = "pub")]
pub struct SalesTable {
    schema: SalesSchema,
    rows: Vec<SalesRow>,
}

impl SalesTable {
    pub(crate) fn new(schema: SalesSchema, rows: Vec<SalesRow>) -> SalesTable {
        SalesTable { schema, rows }
    }
}

#[derive(Debug, Clone, PartialEq, Getters)]
#[getset(get = "pub")]
pub struct SalesRow {
    country: String,
    /// One value per schema year; `None` marks a missing or unusable cell.
    values: Vec<Option<f64>>,
}

impl SalesRow {
    pub(crate) fn new(country: String, values: Vec<Option<f64>>) -> SalesRow {
        SalesRow { country, values }
    }
}

/// Derived output table, the only shape the sinks understand: ordered
/// column labels plus one country and one cell list per row.
#[derive(Debug, Clone, PartialEq, Getters)]
#[getset(get = "pub")]
pub struct ReportTable {
    columns: Vec<String>,
    rows: Vec<ReportRow>,
}

impl ReportTable {
    pub(crate) fn new(columns: Vec<String>, rows: Vec<ReportRow>) -> ReportTable {
        ReportTable { columns, rows }
    }
}

#[derive(Debug, Clone, PartialEq, Getters)]
#[getset(get = "pub")]
pub struct ReportRow {
    country: String,
    values: Vec<Option<f64>>,
}

impl ReportRow {
    pub(crate) fn new(country: String, values: Vec<Option<f64>>) -> ReportRow {
        ReportRow { country, values }
    }
}
