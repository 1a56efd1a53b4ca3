use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};

use crate::error::{AlokasiError, Result};
use crate::fmt::month_year;
use crate::grid::{Cell, GridModel};
use crate::models::{AgentProfile, ReportFile, ReportRequest};
use crate::schema::Align;

fn xlsx_err(e: XlsxError) -> AlokasiError {
    AlokasiError::Xlsx(e.to_string())
}

// Band colors match the document renderer.
const HEADER_BG: u32 = 0x29426B;
const HEADER_WEEKEND_BG: u32 = 0x8C2929;
const WEEKEND_BG: u32 = 0xF6ECEC;
const TOTALS_BG: u32 = 0xE1E7F0;

const HEADER_ROW: u32 = 13;

struct SheetFormats {
    letterhead: Format,
    letterhead_sub: Format,
    title: Format,
    subtitle: Format,
    period: Format,
    info_label: Format,
    info_value: Format,
    header: Format,
    header_weekend: Format,
    text: Format,
    text_left: Format,
    count: Format,
    count_weekend: Format,
    total_label: Format,
    total_count: Format,
}

impl SheetFormats {
    fn new() -> Self {
        let header_base = Format::new()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_font_color(Color::White)
            .set_border(FormatBorder::Thin);
        Self {
            letterhead: Format::new().set_bold().set_font_size(14),
            letterhead_sub: Format::new().set_font_size(9),
            title: Format::new()
                .set_bold()
                .set_font_size(12)
                .set_align(FormatAlign::Center),
            subtitle: Format::new()
                .set_bold()
                .set_font_size(10)
                .set_align(FormatAlign::Center),
            period: Format::new()
                .set_font_size(10)
                .set_align(FormatAlign::Center),
            info_label: Format::new().set_font_size(9),
            info_value: Format::new().set_font_size(9),
            header: header_base.clone().set_background_color(Color::RGB(HEADER_BG)),
            header_weekend: header_base.set_background_color(Color::RGB(HEADER_WEEKEND_BG)),
            text: Format::new()
                .set_align(FormatAlign::Center)
                .set_border(FormatBorder::Thin),
            text_left: Format::new().set_border(FormatBorder::Thin),
            count: Format::new()
                .set_num_format("#,##0")
                .set_align(FormatAlign::Center)
                .set_border(FormatBorder::Thin),
            count_weekend: Format::new()
                .set_num_format("#,##0")
                .set_align(FormatAlign::Center)
                .set_border(FormatBorder::Thin)
                .set_background_color(Color::RGB(WEEKEND_BG)),
            total_label: Format::new()
                .set_bold()
                .set_align(FormatAlign::Center)
                .set_border(FormatBorder::Thin)
                .set_background_color(Color::RGB(TOTALS_BG)),
            total_count: Format::new()
                .set_bold()
                .set_num_format("#,##0")
                .set_align(FormatAlign::Center)
                .set_border(FormatBorder::Thin)
                .set_background_color(Color::RGB(TOTALS_BG)),
        }
    }
}

fn write_grid_row(
    ws: &mut Worksheet,
    row_num: u32,
    grid: &GridModel,
    cells: &[Cell],
    f: &SheetFormats,
    totals: bool,
) -> std::result::Result<(), XlsxError> {
    for (i, col) in grid.columns.iter().enumerate() {
        let c = i as u16;
        let fmt = if totals {
            match &cells[i] {
                Cell::Text(_) => &f.total_label,
                Cell::Count(_) => &f.total_count,
            }
        } else {
            match (&cells[i], col.highlighted, col.align) {
                (Cell::Count(_), true, _) => &f.count_weekend,
                (Cell::Count(_), false, _) => &f.count,
                (Cell::Text(_), _, Align::Left) => &f.text_left,
                (Cell::Text(_), _, _) => &f.text,
            }
        };
        match &cells[i] {
            Cell::Text(s) => ws.write_with_format(row_num, c, s, fmt)?,
            Cell::Count(n) => ws.write_with_format(row_num, c, *n as f64, fmt)?,
        };
    }
    Ok(())
}

fn write_report(
    wb: &mut Workbook,
    request: &ReportRequest,
    grid: &GridModel,
    profile: &AgentProfile,
) -> std::result::Result<(), XlsxError> {
    let ws = wb.add_worksheet();
    ws.set_name(month_year(request.month.year, request.month.month))?;
    let f = SheetFormats::new();
    let last_col = (grid.columns.len() - 1) as u16;

    // Text letterhead; the spreadsheet form carries no logo.
    ws.merge_range(0, 0, 0, last_col, &profile.name, &f.letterhead)?;
    let contact = format!(
        "{}  |  Email: {}  |  No. Registrasi: {}",
        profile.address, profile.email, profile.registration_no
    );
    ws.merge_range(1, 0, 1, last_col, &contact, &f.letterhead_sub)?;

    let title = format!("LAPORAN {}", request.report_kind.title_label());
    ws.merge_range(3, 0, 3, last_col, &title, &f.title)?;
    let product = format!(
        "{} ({})",
        request.product_type,
        request.category().annotation()
    );
    ws.merge_range(4, 0, 4, last_col, &product, &f.subtitle)?;
    let period = format!(
        "Periode {}",
        month_year(request.month.year, request.month.month)
    );
    ws.merge_range(5, 0, 5, last_col, &period, &f.period)?;

    let info = [
        ("Nama Agen", profile.name.as_str()),
        ("Alamat", profile.address.as_str()),
        ("Email", profile.email.as_str()),
        ("No. Registrasi", profile.registration_no.as_str()),
        ("Wilayah", profile.region.as_str()),
    ];
    for (i, (label, value)) in info.iter().enumerate() {
        let row = 7 + i as u32;
        ws.merge_range(row, 0, row, 1, label, &f.info_label)?;
        ws.merge_range(row, 2, row, 8, &format!(": {value}"), &f.info_value)?;
    }

    // Two header rows: day number over weekday abbreviation, written as
    // text so the labels match the printed document cell for cell.
    // Non-day headers span both rows in one merged cell.
    for (i, col) in grid.columns.iter().enumerate() {
        let c = i as u16;
        let fmt = if col.highlighted {
            &f.header_weekend
        } else {
            &f.header
        };
        let title = grid.header_rows[0][i].display();
        if col.kind.is_day() {
            let sub = grid.header_rows[1][i].display();
            ws.write_with_format(HEADER_ROW, c, title, fmt)?;
            ws.write_with_format(HEADER_ROW + 1, c, sub, fmt)?;
        } else {
            ws.merge_range(HEADER_ROW, c, HEADER_ROW + 1, c, &title, fmt)?;
        }
    }

    let first_body = HEADER_ROW + 2;
    for (r, row) in grid.body_rows.iter().enumerate() {
        write_grid_row(ws, first_body + r as u32, grid, row, &f, false)?;
    }
    let totals_row = first_body + grid.body_rows.len() as u32;
    write_grid_row(ws, totals_row, grid, &grid.totals_row, &f, true)?;

    for (i, col) in grid.columns.iter().enumerate() {
        ws.set_column_width(i as u16, (col.width_hint * 0.9) as f64)?;
    }

    ws.set_freeze_panes(first_body, 2)?;
    ws.set_landscape();
    ws.set_paper_size(9); // A4
    ws.set_print_fit_to_pages(1, 0);
    Ok(())
}

/// Paint a compiled grid as a single-sheet workbook mirroring the
/// printed document: same leading blocks, same header labels, same
/// totals row.
pub fn render_sheet(
    request: &ReportRequest,
    grid: &GridModel,
    profile: &AgentProfile,
) -> Result<ReportFile> {
    let mut wb = Workbook::new();
    write_report(&mut wb, request, grid, profile).map_err(xlsx_err)?;
    let bytes = wb.save_to_buffer().map_err(xlsx_err)?;
    Ok(ReportFile {
        filename: request.filename("xlsx"),
        bytes,
    })
}
