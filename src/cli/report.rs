use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::build_request;
use crate::error::Result;
use crate::fmt::month_year;
use crate::grid;

/// Render the compiled grid as a terminal table, weekend columns
/// marked in red the way the exported documents shade them.
pub fn preview(
    request: Option<String>,
    rows: Option<String>,
    month: Option<String>,
    category: &str,
    product: &str,
    kind: &str,
) -> Result<()> {
    let request = build_request(&request, &rows, &month, category, product, kind)?;
    let grid = grid::compile(&request);

    let mut table = Table::new();
    let headers: Vec<Cell> = grid
        .columns
        .iter()
        .enumerate()
        .map(|(i, col)| {
            let top = grid.header_rows[0][i].display();
            let bottom = grid.header_rows[1][i].display();
            let label = if bottom.is_empty() {
                top
            } else {
                format!("{top}\n{bottom}")
            };
            if col.highlighted {
                Cell::new(label.red().bold())
            } else {
                Cell::new(label.bold())
            }
        })
        .collect();
    table.set_header(headers);

    for row in &grid.body_rows {
        let cells: Vec<Cell> = row.iter().map(|c| Cell::new(c.display())).collect();
        table.add_row(cells);
    }
    let totals: Vec<Cell> = grid
        .totals_row
        .iter()
        .map(|c| Cell::new(c.display().bold()))
        .collect();
    table.add_row(totals);

    let title = format!(
        "LAPORAN {} {} ({}), Periode {}",
        request.report_kind.title_label(),
        request.product_type,
        request.category().annotation(),
        month_year(request.month.year, request.month.month)
    );
    println!("{title}\n{table}");
    println!("{} pangkalan", request.rows.len());
    Ok(())
}
