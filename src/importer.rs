use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{AlokasiError, Result};
use crate::models::{Category, NonSubsidizedRow, ReportRows, SubsidizedRow};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse one recap quantity. Exports use dotted Indonesian grouping
/// ("1.250") and leave untouched days blank, so anything unreadable
/// counts as zero rather than aborting the whole file.
pub fn parse_count(raw: &str) -> i64 {
    let s = raw.replace('.', "").replace(',', "").replace('"', "");
    let s = s.trim();
    if s.is_empty() {
        return 0;
    }
    s.parse().unwrap_or(0)
}

fn count_at(record: &csv::StringRecord, idx: Option<usize>) -> i64 {
    idx.and_then(|i| record.get(i)).map(parse_count).unwrap_or(0)
}

fn looks_like_header(record: &csv::StringRecord) -> bool {
    let has_id = record
        .iter()
        .any(|f| matches!(f.trim().to_lowercase().as_str(), "id" | "id pangkalan"));
    let has_name = record
        .iter()
        .any(|f| matches!(f.trim().to_lowercase().as_str(), "nama" | "nama pangkalan"));
    has_id && has_name
}

// ---------------------------------------------------------------------------
// Header mapping
// ---------------------------------------------------------------------------

struct HeaderMap {
    idx_id: usize,
    idx_name: usize,
    idx_quota: Option<usize>,
    idx_normal: Option<usize>,
    idx_fakultatif: Option<usize>,
    idx_remaining: Option<usize>,
    idx_total: usize,
    /// Day-of-month columns present in the file, as (day, column index).
    days: Vec<(u32, usize)>,
}

fn map_headers(record: &csv::StringRecord, category: Category) -> Result<HeaderMap> {
    let mut idx_id = None;
    let mut idx_name = None;
    let mut idx_quota = None;
    let mut idx_normal = None;
    let mut idx_fakultatif = None;
    let mut idx_remaining = None;
    let mut idx_total = None;
    let mut days = Vec::new();

    for (i, field) in record.iter().enumerate() {
        let f = field.trim().to_lowercase();
        if let Ok(d) = f.parse::<u32>() {
            if (1..=31).contains(&d) {
                days.push((d, i));
            }
            continue;
        }
        match f.as_str() {
            "id" | "id pangkalan" => idx_id = Some(i),
            "nama" | "nama pangkalan" => idx_name = Some(i),
            "alokasi" => idx_quota = Some(i),
            "normal" | "total normal" => idx_normal = Some(i),
            "fakultatif" | "total fakultatif" => idx_fakultatif = Some(i),
            "sisa" | "sisa alokasi" => idx_remaining = Some(i),
            "total" | "jumlah" => idx_total = Some(i),
            _ => {}
        }
    }

    let missing = |name: &str| AlokasiError::MissingColumn(name.to_string());
    let idx_id = idx_id.ok_or_else(|| missing("id"))?;
    let idx_name = idx_name.ok_or_else(|| missing("nama"))?;
    let idx_total = idx_total.ok_or_else(|| missing("total"))?;
    if category == Category::Subsidized {
        idx_quota.ok_or_else(|| missing("alokasi"))?;
        idx_normal.ok_or_else(|| missing("normal"))?;
        idx_fakultatif.ok_or_else(|| missing("fakultatif"))?;
        idx_remaining.ok_or_else(|| missing("sisa alokasi"))?;
    }

    Ok(HeaderMap {
        idx_id,
        idx_name,
        idx_quota,
        idx_normal,
        idx_fakultatif,
        idx_remaining,
        idx_total,
        days,
    })
}

// ---------------------------------------------------------------------------
// Recap CSV reader
// ---------------------------------------------------------------------------

/// Read depot rows from a wide recap export: one row per depot, one
/// column per day of month, plus the summary columns the category
/// calls for. Anything above the header row (titles, period labels)
/// is skipped, as are blank rows and a trailing TOTAL line.
pub fn read_rows(path: &Path, category: Category) -> Result<ReportRows> {
    let file = std::fs::File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(std::io::BufReader::new(file));

    let mut header: Option<HeaderMap> = None;
    let mut subsidized = Vec::new();
    let mut non_subsidized = Vec::new();

    for result in rdr.records() {
        let Ok(record) = result else { continue };
        let Some(map) = &header else {
            if looks_like_header(&record) {
                header = Some(map_headers(&record, category)?);
            }
            continue;
        };
        // Exports sometimes repeat the header mid-file.
        if looks_like_header(&record) {
            continue;
        }
        let Some(id_cell) = record.get(map.idx_id) else {
            continue;
        };
        let depot_id = id_cell.trim();
        if depot_id.is_empty() || depot_id.eq_ignore_ascii_case("total") {
            continue;
        }
        let depot_name = record
            .get(map.idx_name)
            .unwrap_or("")
            .trim()
            .to_string();

        let mut daily = BTreeMap::new();
        for &(day, i) in &map.days {
            let Some(cell) = record.get(i) else { continue };
            if cell.trim().is_empty() {
                continue;
            }
            daily.insert(day, parse_count(cell));
        }

        match category {
            Category::Subsidized => subsidized.push(SubsidizedRow {
                depot_id: depot_id.to_string(),
                depot_name,
                daily,
                monthly_quota: count_at(&record, map.idx_quota),
                total_normal: count_at(&record, map.idx_normal),
                total_fakultatif: count_at(&record, map.idx_fakultatif),
                remaining_quota: count_at(&record, map.idx_remaining),
                grand_total: count_at(&record, Some(map.idx_total)),
            }),
            Category::NonSubsidized => non_subsidized.push(NonSubsidizedRow {
                depot_id: depot_id.to_string(),
                depot_name,
                daily,
                grand_total: count_at(&record, Some(map.idx_total)),
            }),
        }
    }

    if header.is_none() {
        return Err(AlokasiError::Other(format!(
            "no recap header row found in {}",
            path.display()
        )));
    }

    Ok(match category {
        Category::Subsidized => ReportRows::Subsidized(subsidized),
        Category::NonSubsidized => ReportRows::NonSubsidized(non_subsidized),
    })
}
