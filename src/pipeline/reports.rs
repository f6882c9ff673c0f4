use enum_dispatch::enum_dispatch;

use super::table::{ReportRow, ReportTable, SalesTable};
use super::DeriveReport;

pub const TOTAL_COLUMN: &str = "Total Sales";
pub const AVERAGE_COLUMN: &str = "Average Sales";

/// The reports the pipeline can derive. Both read the same validated table
/// and neither depends on the other's output.
#[enum_dispatch(DeriveReport)]
pub enum Report {
    Totals,
    Growth,
}

/// Per-country totals: the year values again, then their sum and mean.
/// All-missing rows total 0 and have no average.
pub struct Totals;

impl DeriveReport for Totals {
    fn label(&self) -> &'static str {
        "sales_totals"
    }

    fn derive(&self, table: &SalesTable) -> ReportTable {
        let mut columns = table.schema().year_labels();
        columns.push(TOTAL_COLUMN.to_string());
        columns.push(AVERAGE_COLUMN.to_string());

        let rows = table
            .rows()
            .iter()
            .map(|row| {
                let total: f64 = row.values().iter().flatten().sum();
                let count = row.values().iter().flatten().count();
                let average = if count == 0 { None } else { Some(total / count as f64) };

                let mut values = row.values().clone();
                values.push(Some(total));
                values.push(average);
                ReportRow::new(row.country().clone(), values)
            })
            .collect();

        ReportTable::new(columns, rows)
    }
}

/// Year-over-year growth percentages, one column per adjacent year pair.
pub struct Growth;

impl DeriveReport for Growth {
    fn label(&self) -> &'static str {
        "sales_growth"
    }

    fn derive(&self, table: &SalesTable) -> ReportTable {
        let columns = table
            .schema()
            .years()
            .windows(2)
            .map(|pair| format!("Growth {}-{}", pair[0], pair[1]))
            .collect();

        let rows = table
            .rows()
            .iter()
            .map(|row| {
                let values = row
                    .values()
                    .windows(2)
                    .map(|pair| growth_percent(pair[0], pair[1]))
                    .collect();
                ReportRow::new(row.country().clone(), values)
            })
            .collect();

        ReportTable::new(columns, rows)
    }
}

/// Undefined (`None`) when either value is missing or the earlier value is
/// exactly zero.
fn growth_percent(earlier: Option<f64>, later: Option<f64>) -> Option<f64> {
    match (earlier, later) {
        (Some(earlier), Some(later)) if earlier != 0.0 => {
            Some((later - earlier) / earlier * 100.0)
        }
        _ => None,
    }
}
