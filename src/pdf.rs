use std::io::BufWriter;

use printpdf::path::PaintMode;
use printpdf::*;

use crate::error::{AlokasiError, Result};
use crate::fmt::month_year;
use crate::grid::{Cell, GridModel};
use crate::models::{AgentProfile, LogoImage, ReportFile, ReportRequest};
use crate::schema::{Align, ColumnSpec};

// A4 landscape dimensions (mm)
const PAGE_W: f32 = 297.0;
const PAGE_H: f32 = 210.0;
const MARGIN_TOP: f32 = 12.0;
const MARGIN_BOTTOM: f32 = 14.0;
const MARGIN_LEFT: f32 = 10.0;
const MARGIN_RIGHT: f32 = 10.0;
const ROW_H: f32 = 5.2;
const HEADER_H: f32 = 8.4;
const FONT_SIZE: f32 = 7.0;
const SMALL_SIZE: f32 = 8.0;
const TITLE_SIZE: f32 = 12.0;
const LETTERHEAD_SIZE: f32 = 14.0;
const FOOTER_SIZE: f32 = 7.0;
const LOGO_H: f32 = 16.0;

// Band and highlight colors (RGB 0..1)
const BLACK: (f32, f32, f32) = (0.0, 0.0, 0.0);
const WHITE: (f32, f32, f32) = (1.0, 1.0, 1.0);
const HEADER_FILL: (f32, f32, f32) = (0.16, 0.26, 0.42);
const HEADER_WEEKEND_FILL: (f32, f32, f32) = (0.55, 0.16, 0.16);
const WEEKEND_FILL: (f32, f32, f32) = (0.97, 0.92, 0.92);
const TOTALS_FILL: (f32, f32, f32) = (0.88, 0.91, 0.96);

fn rgb((r, g, b): (f32, f32, f32)) -> Color {
    Color::Rgb(Rgb::new(r, g, b, None))
}

fn approx_text_width(text: &str, size: f32) -> f32 {
    text.len() as f32 * size * 0.18
}

fn fit_text(s: &str, max_w: f32, size: f32) -> String {
    let mut out = s.to_string();
    while out.len() > 1 && approx_text_width(&out, size) > max_w {
        out.pop();
    }
    out
}

/// Scale the schema's width hints so the columns span the printable
/// width exactly.
fn grid_widths(columns: &[ColumnSpec]) -> Vec<f32> {
    let table_w = PAGE_W - MARGIN_LEFT - MARGIN_RIGHT;
    let total: f32 = columns.iter().map(|c| c.width_hint).sum();
    columns
        .iter()
        .map(|c| c.width_hint / total * table_w)
        .collect()
}

struct PdfWriter {
    doc: PdfDocumentReference,
    font: IndirectFontRef,
    font_bold: IndirectFontRef,
    font_italic: IndirectFontRef,
    current_page: PdfPageIndex,
    current_layer: PdfLayerIndex,
    y: f32,
    /// Every page in creation order, for the footer pass once the
    /// total count is known.
    pages: Vec<(PdfPageIndex, PdfLayerIndex)>,
}

impl PdfWriter {
    fn new(title: &str) -> Result<Self> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| AlokasiError::Pdf(format!("{e:?}")))?;
        let font_bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| AlokasiError::Pdf(format!("{e:?}")))?;
        let font_italic = doc
            .add_builtin_font(BuiltinFont::HelveticaOblique)
            .map_err(|e| AlokasiError::Pdf(format!("{e:?}")))?;
        Ok(Self {
            doc,
            font,
            font_bold,
            font_italic,
            current_page: page,
            current_layer: layer,
            y: MARGIN_TOP,
            pages: vec![(page, layer)],
        })
    }

    fn layer(&self) -> PdfLayerReference {
        self.doc
            .get_page(self.current_page)
            .get_layer(self.current_layer)
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Layer");
        self.current_page = page;
        self.current_layer = layer;
        self.y = MARGIN_TOP;
        self.pages.push((page, layer));
    }

    fn ensure_space(&mut self, needed: f32) {
        if self.y + needed > PAGE_H - MARGIN_BOTTOM {
            self.new_page();
        }
    }

    /// Draw text with its baseline at `y` measured from the top edge.
    fn text_at(&self, s: &str, x: f32, y: f32, size: f32, bold: bool) {
        let font = if bold {
            self.font_bold.clone()
        } else {
            self.font.clone()
        };
        self.layer().use_text(s, size, Mm(x), Mm(PAGE_H - y), &font);
    }

    fn text(&self, s: &str, x: f32, size: f32, bold: bool) {
        self.text_at(s, x, self.y, size, bold);
    }

    fn text_centered_page(&self, s: &str, size: f32, bold: bool) {
        let tw = approx_text_width(s, size);
        self.text(s, (PAGE_W - tw) / 2.0, size, bold);
    }

    fn set_fill(&self, color: (f32, f32, f32)) {
        self.layer().set_fill_color(rgb(color));
    }

    fn fill_rect(&self, x: f32, w: f32, h: f32, color: (f32, f32, f32)) {
        let layer = self.layer();
        layer.set_fill_color(rgb(color));
        let rect = Rect::new(
            Mm(x),
            Mm(PAGE_H - self.y - h),
            Mm(x + w),
            Mm(PAGE_H - self.y),
        )
        .with_mode(PaintMode::Fill);
        layer.add_rect(rect);
    }

    fn hline_at(&self, x1: f32, x2: f32, y: f32, thickness: f32) {
        let layer = self.layer();
        layer.set_outline_thickness(thickness);
        let line = Line {
            points: vec![
                (Point::new(Mm(x1), Mm(PAGE_H - y)), false),
                (Point::new(Mm(x2), Mm(PAGE_H - y)), false),
            ],
            is_closed: false,
        };
        layer.add_line(line);
    }

    fn vline(&self, x: f32, y1: f32, y2: f32) {
        let layer = self.layer();
        layer.set_outline_thickness(0.2);
        let line = Line {
            points: vec![
                (Point::new(Mm(x), Mm(PAGE_H - y1)), false),
                (Point::new(Mm(x), Mm(PAGE_H - y2)), false),
            ],
            is_closed: false,
        };
        layer.add_line(line);
    }

    fn grid_lines(&self, widths: &[f32], h: f32) {
        let right = MARGIN_LEFT + widths.iter().sum::<f32>();
        self.hline_at(MARGIN_LEFT, right, self.y, 0.2);
        self.hline_at(MARGIN_LEFT, right, self.y + h, 0.2);
        let mut x = MARGIN_LEFT;
        self.vline(x, self.y, self.y + h);
        for w in widths {
            x += w;
            self.vline(x, self.y, self.y + h);
        }
    }

    /// Place the letterhead logo at the current cursor. Returns the
    /// displayed width, or None when the pixel data does not match the
    /// declared dimensions.
    fn place_logo(&self, logo: &LogoImage) -> Option<f32> {
        let expected = logo.width_px as usize * logo.height_px as usize * 3;
        if logo.width_px == 0 || logo.height_px == 0 || logo.rgb.len() != expected {
            log::warn!("Letterhead logo has invalid pixel data, rendering without it");
            return None;
        }
        let xobj = ImageXObject {
            width: Px(logo.width_px as usize),
            height: Px(logo.height_px as usize),
            color_space: ColorSpace::Rgb,
            bits_per_component: ColorBits::Bit8,
            interpolate: true,
            image_data: logo.rgb.clone(),
            image_filter: None,
            smask: None,
            clipping_bbox: None,
        };
        let dpi = logo.height_px as f32 * 25.4 / LOGO_H;
        let display_w = LOGO_H * logo.width_px as f32 / logo.height_px as f32;
        Image::from(xobj).add_to_layer(
            self.layer(),
            ImageTransform {
                translate_x: Some(Mm(MARGIN_LEFT)),
                translate_y: Some(Mm(PAGE_H - self.y - LOGO_H)),
                dpi: Some(dpi),
                ..Default::default()
            },
        );
        Some(display_w)
    }

    fn letterhead(&mut self, profile: &AgentProfile, logo: Option<&LogoImage>) {
        let mut text_x = MARGIN_LEFT;
        let mut has_logo = false;
        if let Some(img) = logo {
            if let Some(w) = self.place_logo(img) {
                text_x = MARGIN_LEFT + w + 5.0;
                has_logo = true;
            }
        }
        self.y += 4.0;
        self.text(&profile.name, text_x, LETTERHEAD_SIZE, true);
        self.y += 6.0;
        self.text(&profile.address, text_x, SMALL_SIZE, false);
        self.y += 4.4;
        let contact = format!(
            "Email: {}  |  No. Registrasi: {}",
            profile.email, profile.registration_no
        );
        self.text(&contact, text_x, SMALL_SIZE, false);
        self.y += 3.2;
        if has_logo && self.y < MARGIN_TOP + LOGO_H + 1.5 {
            self.y = MARGIN_TOP + LOGO_H + 1.5;
        }
        // Kop surat double rule
        self.hline_at(MARGIN_LEFT, PAGE_W - MARGIN_RIGHT, self.y, 0.8);
        self.hline_at(MARGIN_LEFT, PAGE_W - MARGIN_RIGHT, self.y + 1.1, 0.3);
        self.y += 7.0;
    }

    fn title_block(&mut self, request: &ReportRequest) {
        let title = format!("LAPORAN {}", request.report_kind.title_label());
        self.text_centered_page(&title, TITLE_SIZE, true);
        self.y += 6.0;
        let product = format!(
            "{} ({})",
            request.product_type,
            request.category().annotation()
        );
        self.text_centered_page(&product, 10.0, true);
        self.y += 5.2;
        let period = format!(
            "Periode {}",
            month_year(request.month.year, request.month.month)
        );
        self.text_centered_page(&period, 10.0, false);
        self.y += 7.5;
    }

    fn agent_block(&mut self, profile: &AgentProfile) {
        let rows = [
            ("Nama Agen", profile.name.as_str()),
            ("Alamat", profile.address.as_str()),
            ("Email", profile.email.as_str()),
            ("No. Registrasi", profile.registration_no.as_str()),
            ("Wilayah", profile.region.as_str()),
        ];
        for (label, value) in rows {
            self.text(label, MARGIN_LEFT, SMALL_SIZE, false);
            self.text(":", MARGIN_LEFT + 28.0, SMALL_SIZE, false);
            self.text(value, MARGIN_LEFT + 31.5, SMALL_SIZE, false);
            self.y += 4.4;
        }
        self.y += 3.5;
    }

    fn table_header(&mut self, grid: &GridModel, widths: &[f32]) {
        let mut x = MARGIN_LEFT;
        for (col, w) in grid.columns.iter().zip(widths) {
            let fill = if col.highlighted {
                HEADER_WEEKEND_FILL
            } else {
                HEADER_FILL
            };
            self.fill_rect(x, *w, HEADER_H, fill);
            x += w;
        }
        self.set_fill(WHITE);
        let mut x = MARGIN_LEFT;
        for (i, (col, w)) in grid.columns.iter().zip(widths).enumerate() {
            let title = grid.header_rows[0][i].display();
            let sub = grid.header_rows[1][i].display();
            if col.kind.is_day() {
                // Day number stacked over the weekday abbreviation.
                let tw = approx_text_width(&title, FONT_SIZE);
                self.text_at(&title, x + (w - tw) / 2.0, self.y + 3.5, FONT_SIZE, true);
                let sw = approx_text_width(&sub, FONT_SIZE - 1.0);
                self.text_at(&sub, x + (w - sw) / 2.0, self.y + 7.1, FONT_SIZE - 1.0, false);
            } else {
                let label = fit_text(&title, w - 1.0, FONT_SIZE);
                let tw = approx_text_width(&label, FONT_SIZE);
                self.text_at(&label, x + (w - tw) / 2.0, self.y + 5.4, FONT_SIZE, true);
            }
            x += w;
        }
        self.set_fill(BLACK);
        self.grid_lines(widths, HEADER_H);
        self.y += HEADER_H;
    }

    /// Page break inside the grid repeats the header band so every
    /// page reads on its own.
    fn ensure_table_space(&mut self, grid: &GridModel, widths: &[f32], needed: f32) {
        if self.y + needed > PAGE_H - MARGIN_BOTTOM {
            self.new_page();
            self.table_header(grid, widths);
        }
    }

    fn table_row(
        &mut self,
        grid: &GridModel,
        widths: &[f32],
        cells: &[Cell],
        bold: bool,
        row_fill: Option<(f32, f32, f32)>,
    ) {
        self.ensure_table_space(grid, widths, ROW_H);
        let mut x = MARGIN_LEFT;
        for (col, w) in grid.columns.iter().zip(widths) {
            match row_fill {
                Some(fill) => self.fill_rect(x, *w, ROW_H, fill),
                None if col.highlighted => self.fill_rect(x, *w, ROW_H, WEEKEND_FILL),
                None => {}
            }
            x += w;
        }
        self.set_fill(BLACK);
        let mut x = MARGIN_LEFT;
        for (i, (col, w)) in grid.columns.iter().zip(widths).enumerate() {
            let value = fit_text(&cells[i].display(), w - 2.0, FONT_SIZE);
            match col.align {
                Align::Left => self.text_at(&value, x + 1.2, self.y + 3.7, FONT_SIZE, bold),
                Align::Center => {
                    let tw = approx_text_width(&value, FONT_SIZE);
                    self.text_at(&value, x + (w - tw) / 2.0, self.y + 3.7, FONT_SIZE, bold);
                }
            }
            x += w;
        }
        self.grid_lines(widths, ROW_H);
        self.y += ROW_H;
    }

    fn disclaimer(&mut self, request: &ReportRequest) {
        self.ensure_space(12.0);
        self.y += 6.5;
        let kind = request.report_kind.title_label().to_lowercase();
        let line = format!(
            "Demikian laporan {kind} ini dibuat dengan sebenar-benarnya untuk dipergunakan sebagaimana mestinya."
        );
        self.layer()
            .use_text(&line, SMALL_SIZE, Mm(MARGIN_LEFT), Mm(PAGE_H - self.y), &self.font_italic);
        self.y += 4.0;
    }

    fn signature_block(&mut self, request: &ReportRequest, profile: &AgentProfile) {
        self.ensure_space(42.0);
        self.y += 7.0;
        let left_x = MARGIN_LEFT + 32.0;
        let right_x = PAGE_W - MARGIN_RIGHT - 80.0;
        let place_date = format!(
            "{}, {}",
            profile.region,
            month_year(request.month.year, request.month.month)
        );
        self.text(&place_date, right_x, SMALL_SIZE, false);
        self.y += 4.6;
        self.text("Mengetahui,", left_x, SMALL_SIZE, false);
        self.text("Hormat Kami,", right_x, SMALL_SIZE, false);
        self.y += 24.0;
        self.text("Nama :", left_x, SMALL_SIZE, false);
        self.text("Nama :", right_x, SMALL_SIZE, false);
        self.y += 4.6;
        self.text("Jabatan :", left_x, SMALL_SIZE, false);
        self.text("Jabatan :", right_x, SMALL_SIZE, false);
        self.y += 4.6;
    }

    /// Second pass once all pages exist: the page count is only known
    /// at the end.
    fn write_footers(&self) {
        let total = self.pages.len();
        let printed = chrono::Local::now()
            .format("Dicetak %Y-%m-%d %H:%M")
            .to_string();
        for (i, (page, layer)) in self.pages.iter().enumerate() {
            let layer = self.doc.get_page(*page).get_layer(*layer);
            layer.set_fill_color(rgb(BLACK));
            let label = format!("Halaman {} dari {}", i + 1, total);
            let tw = approx_text_width(&label, FOOTER_SIZE);
            layer.use_text(
                &label,
                FOOTER_SIZE,
                Mm(PAGE_W - MARGIN_RIGHT - tw),
                Mm(8.0),
                &self.font,
            );
            layer.use_text(&printed, FOOTER_SIZE, Mm(MARGIN_LEFT), Mm(8.0), &self.font);
        }
    }

    fn to_bytes(self) -> Result<Vec<u8>> {
        let mut buf = BufWriter::new(Vec::new());
        self.doc
            .save(&mut buf)
            .map_err(|e| AlokasiError::Pdf(format!("{e:?}")))?;
        buf.into_inner()
            .map_err(|e| AlokasiError::Pdf(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Render function
// ---------------------------------------------------------------------------

/// Paint a compiled grid as the paginated compliance document. The
/// layout reads top to bottom: letterhead, title block, agent block,
/// the allocation grid with its totals row, disclaimer, signatures.
pub fn render_document(
    request: &ReportRequest,
    grid: &GridModel,
    profile: &AgentProfile,
    logo: Option<&LogoImage>,
) -> Result<ReportFile> {
    let doc_title = format!("LAPORAN {}", request.report_kind.title_label());
    let mut pdf = PdfWriter::new(&doc_title)?;
    pdf.letterhead(profile, logo);
    pdf.title_block(request);
    pdf.agent_block(profile);

    let widths = grid_widths(&grid.columns);
    pdf.table_header(grid, &widths);
    for row in &grid.body_rows {
        pdf.table_row(grid, &widths, row, false, None);
    }
    pdf.table_row(grid, &widths, &grid.totals_row, true, Some(TOTALS_FILL));

    pdf.disclaimer(request);
    pdf.signature_block(request, profile);
    pdf.write_footers();

    let bytes = pdf.to_bytes()?;
    Ok(ReportFile {
        filename: request.filename("pdf"),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::compile;
    use crate::models::{NonSubsidizedRow, ReportKind, ReportMonth, ReportRows, SubsidizedRow};
    use std::collections::BTreeMap;

    fn depot(i: usize) -> SubsidizedRow {
        let mut daily = BTreeMap::new();
        for day in 1..=30u32 {
            daily.insert(day, ((i as i64 + day as i64) % 9) * 5);
        }
        let total: i64 = daily.values().sum();
        SubsidizedRow {
            depot_id: format!("PKL-{i:04}"),
            depot_name: format!("Pangkalan Contoh {i}"),
            daily,
            monthly_quota: 1200,
            total_normal: total,
            total_fakultatif: 0,
            remaining_quota: 1200 - total,
            grand_total: total,
        }
    }

    fn subsidized_request(rows: Vec<SubsidizedRow>) -> ReportRequest {
        ReportRequest {
            month: ReportMonth { year: 2025, month: 6 },
            product_type: "LPG 3 kg".to_string(),
            report_kind: ReportKind::Planning,
            rows: ReportRows::Subsidized(rows),
        }
    }

    fn tiny_logo() -> LogoImage {
        LogoImage {
            width_px: 2,
            height_px: 2,
            rgb: vec![255; 12],
        }
    }

    #[test]
    fn test_render_document_produces_pdf() {
        let request = subsidized_request(vec![depot(1), depot(2), depot(3)]);
        let grid = compile(&request);
        let profile = AgentProfile::default();
        let file = render_document(&request, &grid, &profile, Some(&tiny_logo())).unwrap();
        assert!(file.bytes.starts_with(b"%PDF"));
        assert_eq!(file.filename, "RencanaPenyaluran_2025-06.pdf");
    }

    #[test]
    fn test_render_document_without_logo() {
        let request = subsidized_request(vec![depot(1)]);
        let grid = compile(&request);
        let file = render_document(&request, &grid, &AgentProfile::default(), None).unwrap();
        assert!(file.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_document_with_invalid_logo_still_succeeds() {
        let logo = LogoImage {
            width_px: 4,
            height_px: 4,
            rgb: vec![0; 5],
        };
        let request = subsidized_request(vec![depot(1)]);
        let grid = compile(&request);
        let file = render_document(&request, &grid, &AgentProfile::default(), Some(&logo)).unwrap();
        assert!(file.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_non_subsidized_document() {
        let rows = vec![NonSubsidizedRow {
            depot_id: "PKL-0001".to_string(),
            depot_name: "Pangkalan Contoh".to_string(),
            daily: [(1u32, 12i64), (2, 8)].into_iter().collect(),
            grand_total: 20,
        }];
        let request = ReportRequest {
            month: ReportMonth { year: 2025, month: 6 },
            product_type: "LPG 12 kg".to_string(),
            report_kind: ReportKind::Distribution,
            rows: ReportRows::NonSubsidized(rows),
        };
        let grid = compile(&request);
        let file = render_document(&request, &grid, &AgentProfile::default(), None).unwrap();
        assert!(file.bytes.starts_with(b"%PDF"));
        assert_eq!(file.filename, "RealisasiPenyaluran_2025-06.pdf");
    }

    #[test]
    fn test_render_document_empty_rows() {
        let request = subsidized_request(Vec::new());
        let grid = compile(&request);
        let file = render_document(&request, &grid, &AgentProfile::default(), None).unwrap();
        assert!(file.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_document_paginates_large_grid() {
        let rows: Vec<SubsidizedRow> = (1..=80).map(depot).collect();
        let request = subsidized_request(rows);
        let grid = compile(&request);
        let file = render_document(&request, &grid, &AgentProfile::default(), None).unwrap();
        assert!(file.bytes.starts_with(b"%PDF"));
    }
}
