use std::fs;
use std::path::{Path, PathBuf};

use crate::calendar;
use crate::error::Result;
use crate::grid;
use crate::models::{
    AgentProfile, NonSubsidizedRow, ReportFile, ReportKind, ReportMonth, ReportRequest,
    ReportRows, SubsidizedRow,
};

// June 2025 starts on a Sunday, so the rest-day highlighting is visible
// in the very first column of the demo output.
const DEMO_YEAR: i32 = 2025;
const DEMO_MONTH: u32 = 6;

struct DemoDepot {
    id: &'static str,
    name: &'static str,
    quota: i64,
    base: i64,
}

/// Sample depots sized so every quota covers a full month of deliveries.
const DEPOTS: &[DemoDepot] = &[
    DemoDepot { id: "PKL-0001", name: "Pangkalan Berkah Jaya", quota: 800, base: 24 },
    DemoDepot { id: "PKL-0002", name: "Pangkalan Sumber Rezeki", quota: 680, base: 20 },
    DemoDepot { id: "PKL-0003", name: "Pangkalan Tiga Putra", quota: 560, base: 16 },
    DemoDepot { id: "PKL-0004", name: "Pangkalan Maju Bersama", quota: 900, base: 28 },
    DemoDepot { id: "PKL-0005", name: "Pangkalan Sinar Harapan", quota: 440, base: 12 },
    DemoDepot { id: "PKL-0006", name: "Pangkalan Karya Mandiri", quota: 740, base: 22 },
    DemoDepot { id: "PKL-0007", name: "Pangkalan Mitra Keluarga", quota: 620, base: 18 },
    DemoDepot { id: "PKL-0008", name: "Pangkalan Cahaya Baru", quota: 840, base: 26 },
    DemoDepot { id: "PKL-0009", name: "Pangkalan Harum Sari", quota: 500, base: 14 },
    DemoDepot { id: "PKL-0010", name: "Pangkalan Dua Saudara", quota: 960, base: 30 },
];

/// Deliveries every non-Sunday, varied per depot and day. Recap columns
/// are derived from the generated days so the row arithmetic holds.
fn subsidized_rows() -> Vec<SubsidizedRow> {
    let days = calendar::days_in_month(DEMO_YEAR, DEMO_MONTH);
    let day_metas = calendar::month_days(DEMO_YEAR, DEMO_MONTH, days);

    DEPOTS
        .iter()
        .enumerate()
        .map(|(idx, depot)| {
            let daily: std::collections::BTreeMap<u32, i64> = day_metas
                .iter()
                .filter(|d| !d.is_weekend)
                .map(|d| {
                    let qty = depot.base + ((idx as i64 + d.day as i64) % 7) - 3;
                    (d.day, qty)
                })
                .collect();
            let total_normal: i64 = daily.values().sum();
            let total_fakultatif = if idx % 3 == 0 { 50 } else { 0 };
            let grand_total = total_normal + total_fakultatif;
            SubsidizedRow {
                depot_id: depot.id.to_string(),
                depot_name: depot.name.to_string(),
                daily,
                monthly_quota: depot.quota,
                total_normal,
                total_fakultatif,
                remaining_quota: depot.quota - grand_total,
                grand_total,
            }
        })
        .collect()
}

/// A smaller non-PSO panel: every other depot, deliveries on a sparse
/// five-day cadence.
fn non_subsidized_rows() -> Vec<NonSubsidizedRow> {
    let days = calendar::days_in_month(DEMO_YEAR, DEMO_MONTH);
    let day_metas = calendar::month_days(DEMO_YEAR, DEMO_MONTH, days);

    DEPOTS
        .iter()
        .enumerate()
        .filter(|(idx, _)| idx % 2 == 1)
        .map(|(idx, depot)| {
            let daily: std::collections::BTreeMap<u32, i64> = day_metas
                .iter()
                .filter(|d| d.day % 5 == 0 && !d.is_weekend)
                .map(|d| {
                    let qty = depot.base / 2 + (idx as i64 + d.day as i64) % 5;
                    (d.day, qty)
                })
                .collect();
            let grand_total = daily.values().sum();
            NonSubsidizedRow {
                depot_id: depot.id.to_string(),
                depot_name: depot.name.to_string(),
                daily,
                grand_total,
            }
        })
        .collect()
}

fn subsidized_request() -> ReportRequest {
    ReportRequest {
        month: ReportMonth { year: DEMO_YEAR, month: DEMO_MONTH },
        product_type: "LPG 3 kg".to_string(),
        report_kind: ReportKind::Planning,
        rows: ReportRows::Subsidized(subsidized_rows()),
    }
}

fn non_subsidized_request() -> ReportRequest {
    ReportRequest {
        month: ReportMonth { year: DEMO_YEAR, month: DEMO_MONTH },
        product_type: "LPG 12 kg".to_string(),
        report_kind: ReportKind::Distribution,
        rows: ReportRows::NonSubsidized(non_subsidized_rows()),
    }
}

fn write_report(dir: &Path, file: &ReportFile) -> Result<()> {
    let path = dir.join(&file.filename);
    fs::write(&path, &file.bytes)?;
    println!("Wrote {}", path.display());
    Ok(())
}

pub fn run(output_dir: Option<String>) -> Result<()> {
    let dir = PathBuf::from(output_dir.unwrap_or_else(|| ".".to_string()));
    fs::create_dir_all(&dir)?;

    let profile = AgentProfile::default();
    let mut written = 0usize;

    for request in [subsidized_request(), non_subsidized_request()] {
        let grid = grid::compile(&request);

        #[cfg(feature = "pdf")]
        {
            let file = crate::pdf::render_document(&request, &grid, &profile, None)?;
            write_report(&dir, &file)?;
            written += 1;
        }
        #[cfg(feature = "xlsx")]
        {
            let file = crate::xlsx::render_sheet(&request, &grid, &profile)?;
            write_report(&dir, &file)?;
            written += 1;
        }
    }

    println!("Demo wrote {written} report file(s) for Periode Juni 2025.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Sundays in June 2025.
    const REST_DAYS: &[u32] = &[1, 8, 15, 22, 29];

    #[test]
    fn test_subsidized_rows_sums_consistent() {
        for row in subsidized_rows() {
            let day_sum: i64 = row.daily.values().sum();
            assert_eq!(row.total_normal, day_sum, "{}", row.depot_id);
            assert_eq!(row.grand_total, row.total_normal + row.total_fakultatif);
            assert_eq!(row.remaining_quota, row.monthly_quota - row.grand_total);
            assert!(row.remaining_quota >= 0, "{} over quota", row.depot_id);
        }
    }

    #[test]
    fn test_demo_rows_skip_rest_days() {
        for row in subsidized_rows() {
            for day in REST_DAYS {
                assert!(!row.daily.contains_key(day), "{} delivered on day {day}", row.depot_id);
            }
        }
        for row in non_subsidized_rows() {
            for day in REST_DAYS {
                assert!(!row.daily.contains_key(day), "{} delivered on day {day}", row.depot_id);
            }
        }
    }

    #[test]
    fn test_non_subsidized_rows_grand_totals() {
        let rows = non_subsidized_rows();
        assert_eq!(rows.len(), DEPOTS.len() / 2);
        for row in &rows {
            let day_sum: i64 = row.daily.values().sum();
            assert_eq!(row.grand_total, day_sum);
            assert!(row.daily.keys().all(|d| d % 5 == 0));
        }
    }

    #[test]
    fn test_demo_requests_deterministic() {
        assert_eq!(subsidized_request(), subsidized_request());
        assert_eq!(non_subsidized_request(), non_subsidized_request());
    }

    #[test]
    fn test_run_writes_report_files() {
        let dir = tempfile::tempdir().unwrap();
        run(Some(dir.path().to_string_lossy().to_string())).unwrap();

        let mut expected = 0;
        if cfg!(feature = "pdf") {
            expected += 2;
        }
        if cfg!(feature = "xlsx") {
            expected += 2;
        }
        let count = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(count, expected);
    }
}
