use crate::calendar::{self, DayMeta};
use crate::fmt::qty;
use crate::models::{ReportRequest, ReportRows};
use crate::schema::{build_columns, ColumnKind, ColumnSpec};

// ---------------------------------------------------------------------------
// Grid model
// ---------------------------------------------------------------------------

/// A single grid value. The compiler decides content; renderers decide
/// typography.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Count(i64),
}

impl Cell {
    pub fn display(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Count(n) => qty(*n),
        }
    }
}

/// Renderer-agnostic form of one report. Both renderers paint exactly
/// this; neither recomputes headers or sums.
#[derive(Debug, Clone, PartialEq)]
pub struct GridModel {
    pub columns: Vec<ColumnSpec>,
    /// Row 0 carries column titles and day numbers, row 1 the weekday
    /// abbreviations (blank for non-day columns). The document renderer
    /// stacks both lines in one header band; the spreadsheet emits two
    /// real rows.
    pub header_rows: [Vec<Cell>; 2],
    pub body_rows: Vec<Vec<Cell>>,
    pub totals_row: Vec<Cell>,
}

// ---------------------------------------------------------------------------
// Compiler
// ---------------------------------------------------------------------------

/// Compile a request into a grid. Pure and deterministic: the same
/// request always yields the same model, and structurally-valid but
/// empty input yields a valid all-zero grid.
pub fn compile(request: &ReportRequest) -> GridModel {
    let days_in_month = calendar::days_in_month(request.month.year, request.month.month);
    let days = calendar::month_days(request.month.year, request.month.month, days_in_month);
    let columns = build_columns(request.category(), &days);

    let header_rows = build_header_rows(&columns, &days);
    let body_rows = build_body_rows(&request.rows, &columns);
    let totals_row = build_totals_row(&columns, &body_rows);

    GridModel {
        columns,
        header_rows,
        body_rows,
        totals_row,
    }
}

fn build_header_rows(columns: &[ColumnSpec], days: &[DayMeta]) -> [Vec<Cell>; 2] {
    let titles = columns.iter().map(|c| Cell::Text(c.kind.title())).collect();
    let weekdays = columns
        .iter()
        .map(|c| match c.kind {
            ColumnKind::Day(d) => {
                Cell::Text(days[(d - 1) as usize].weekday_abbrev.to_string())
            }
            _ => Cell::Text(String::new()),
        })
        .collect();
    [titles, weekdays]
}

fn build_body_rows(rows: &ReportRows, columns: &[ColumnSpec]) -> Vec<Vec<Cell>> {
    match rows {
        ReportRows::Subsidized(list) => list
            .iter()
            .map(|r| {
                columns
                    .iter()
                    .map(|col| match col.kind {
                        ColumnKind::DepotId => Cell::Text(r.depot_id.clone()),
                        ColumnKind::DepotName => Cell::Text(r.depot_name.clone()),
                        ColumnKind::Quota => Cell::Count(r.monthly_quota),
                        ColumnKind::Day(d) => {
                            Cell::Count(r.daily.get(&d).copied().unwrap_or(0))
                        }
                        ColumnKind::TotalNormal => Cell::Count(r.total_normal),
                        ColumnKind::TotalFakultatif => Cell::Count(r.total_fakultatif),
                        ColumnKind::RemainingQuota => Cell::Count(r.remaining_quota),
                        ColumnKind::GrandTotal => Cell::Count(r.grand_total),
                    })
                    .collect()
            })
            .collect(),
        ReportRows::NonSubsidized(list) => list
            .iter()
            .map(|r| {
                columns
                    .iter()
                    .map(|col| match col.kind {
                        ColumnKind::DepotId => Cell::Text(r.depot_id.clone()),
                        ColumnKind::DepotName => Cell::Text(r.depot_name.clone()),
                        ColumnKind::Day(d) => {
                            Cell::Count(r.daily.get(&d).copied().unwrap_or(0))
                        }
                        ColumnKind::GrandTotal => Cell::Count(r.grand_total),
                        // The non-subsidized schema never emits these.
                        ColumnKind::Quota
                        | ColumnKind::TotalNormal
                        | ColumnKind::TotalFakultatif
                        | ColumnKind::RemainingQuota => Cell::Count(0),
                    })
                    .collect()
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Totals aggregator
// ---------------------------------------------------------------------------

/// Column-wise sums over the body rows. The compliance format requires
/// the totals row even for an empty depot list, in which case every
/// numeric entry is 0.
fn build_totals_row(columns: &[ColumnSpec], body_rows: &[Vec<Cell>]) -> Vec<Cell> {
    columns
        .iter()
        .enumerate()
        .map(|(i, col)| {
            if i == 0 {
                return Cell::Text("TOTAL".to_string());
            }
            if !col.kind.is_numeric() {
                return Cell::Text(String::new());
            }
            let sum = body_rows
                .iter()
                .map(|row| match &row[i] {
                    Cell::Count(n) => *n,
                    Cell::Text(_) => 0,
                })
                .sum();
            Cell::Count(sum)
        })
        .collect()
}
