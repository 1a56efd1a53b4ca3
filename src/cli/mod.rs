#[cfg(any(feature = "pdf", feature = "xlsx"))]
pub mod demo;
#[cfg(any(feature = "pdf", feature = "xlsx"))]
pub mod export;
pub mod profile;
pub mod report;

use std::path::Path;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::error::{AlokasiError, Result};
use crate::importer;
use crate::models::{Category, ReportKind, ReportMonth, ReportRequest};

pub(crate) fn parse_month(s: &str) -> Result<ReportMonth> {
    ReportMonth::parse(s).ok_or_else(|| AlokasiError::InvalidMonth(s.to_string()))
}

pub(crate) fn parse_category(s: &str) -> Result<Category> {
    match s.to_lowercase().as_str() {
        "pso" | "subsidi" | "subsidized" => Ok(Category::Subsidized),
        "non-pso" | "non_pso" | "nonpso" | "non-subsidized" => Ok(Category::NonSubsidized),
        _ => Err(AlokasiError::UnknownCategory(s.to_string())),
    }
}

pub(crate) fn parse_kind(s: &str) -> Result<ReportKind> {
    match s.to_lowercase().as_str() {
        "rencana" | "planning" => Ok(ReportKind::Planning),
        "realisasi" | "distribution" => Ok(ReportKind::Distribution),
        _ => Err(AlokasiError::UnknownKind(s.to_string())),
    }
}

/// Assemble the report request from either a full JSON request file or
/// a recap CSV plus the command-line report parameters.
pub(crate) fn build_request(
    request: &Option<String>,
    rows: &Option<String>,
    month: &Option<String>,
    category: &str,
    product: &str,
    kind: &str,
) -> Result<ReportRequest> {
    if let Some(path) = request {
        let raw = std::fs::read_to_string(path)?;
        return Ok(serde_json::from_str(&raw)?);
    }
    let Some(rows_path) = rows else {
        return Err(AlokasiError::Other(
            "either --request or --rows is required".to_string(),
        ));
    };
    let Some(month) = month else {
        return Err(AlokasiError::Other(
            "--month is required with --rows".to_string(),
        ));
    };
    let month = parse_month(month)?;
    let category = parse_category(category)?;
    let report_kind = parse_kind(kind)?;
    let rows = importer::read_rows(Path::new(rows_path), category)?;
    Ok(ReportRequest {
        month,
        product_type: product.to_string(),
        report_kind,
        rows,
    })
}

#[derive(Parser)]
#[command(
    name = "alokasi",
    about = "Monthly LPG allocation report generator for gas distribution agents."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Export an allocation report.
    #[cfg(any(feature = "pdf", feature = "xlsx"))]
    Export {
        #[command(subcommand)]
        command: ExportCommands,
    },
    /// Preview the allocation grid in the terminal.
    Report {
        /// Path to a JSON report request
        #[arg(long)]
        request: Option<String>,
        /// Path to a wide recap CSV (requires --month)
        #[arg(long)]
        rows: Option<String>,
        /// Report month: YYYY-MM
        #[arg(long)]
        month: Option<String>,
        /// Product category: pso or non-pso
        #[arg(long, default_value = "pso")]
        category: String,
        /// Product label shown in the title
        #[arg(long, default_value = "LPG 3 kg")]
        product: String,
        /// Report kind: rencana or realisasi
        #[arg(long, default_value = "rencana")]
        kind: String,
    },
    /// Manage the cached agent profile.
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// Write sample reports to explore the output formats.
    #[cfg(any(feature = "pdf", feature = "xlsx"))]
    Demo {
        /// Output directory (default: current directory)
        #[arg(long = "output-dir")]
        output_dir: Option<String>,
    },
    /// Generate shell completions.
    Completions {
        /// Shell: bash, zsh, fish, elvish, powershell
        shell: Shell,
    },
}

#[cfg(any(feature = "pdf", feature = "xlsx"))]
#[derive(Subcommand)]
pub enum ExportCommands {
    /// Export the paginated report document.
    #[cfg(feature = "pdf")]
    Pdf {
        #[arg(long)]
        request: Option<String>,
        #[arg(long)]
        rows: Option<String>,
        #[arg(long)]
        month: Option<String>,
        #[arg(long, default_value = "pso")]
        category: String,
        #[arg(long, default_value = "LPG 3 kg")]
        product: String,
        #[arg(long, default_value = "rencana")]
        kind: String,
        /// JSON profile file used instead of the cached profile
        #[arg(long)]
        profile: Option<String>,
        /// Output file path
        #[arg(long)]
        output: Option<String>,
    },
    /// Export the single-sheet report workbook.
    #[cfg(feature = "xlsx")]
    Xlsx {
        #[arg(long)]
        request: Option<String>,
        #[arg(long)]
        rows: Option<String>,
        #[arg(long)]
        month: Option<String>,
        #[arg(long, default_value = "pso")]
        category: String,
        #[arg(long, default_value = "LPG 3 kg")]
        product: String,
        #[arg(long, default_value = "rencana")]
        kind: String,
        /// JSON profile file used instead of the cached profile
        #[arg(long)]
        profile: Option<String>,
        /// Output file path
        #[arg(long)]
        output: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Show the cached agent profile.
    Show,
    /// Cache an agent profile from a JSON file.
    Set {
        /// Path to a JSON profile
        file: String,
    },
    /// Remove the cached profile.
    Clear,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2025-06").unwrap(), ReportMonth { year: 2025, month: 6 });
        assert!(parse_month("2025-13").is_err());
        assert!(parse_month("June 2025").is_err());
    }

    #[test]
    fn test_parse_category_aliases() {
        assert_eq!(parse_category("pso").unwrap(), Category::Subsidized);
        assert_eq!(parse_category("PSO").unwrap(), Category::Subsidized);
        assert_eq!(parse_category("subsidi").unwrap(), Category::Subsidized);
        assert_eq!(parse_category("non-pso").unwrap(), Category::NonSubsidized);
        assert!(parse_category("umum").is_err());
    }

    #[test]
    fn test_parse_kind_aliases() {
        assert_eq!(parse_kind("rencana").unwrap(), ReportKind::Planning);
        assert_eq!(parse_kind("realisasi").unwrap(), ReportKind::Distribution);
        assert_eq!(parse_kind("planning").unwrap(), ReportKind::Planning);
        assert!(parse_kind("final").is_err());
    }

    #[test]
    fn test_build_request_requires_rows_or_request() {
        let err = build_request(&None, &None, &None, "pso", "LPG 3 kg", "rencana").unwrap_err();
        assert!(err.to_string().contains("--request"));
    }

    #[test]
    fn test_build_request_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("request.json");
        let json = r#"{
            "month": { "year": 2025, "month": 6 },
            "product_type": "LPG 3 kg",
            "report_kind": "PLANNING",
            "category": "SUBSIDIZED",
            "rows": []
        }"#;
        std::fs::write(&path, json).unwrap();
        let request = build_request(
            &Some(path.display().to_string()),
            &None,
            &None,
            "pso",
            "LPG 3 kg",
            "rencana",
        )
        .unwrap();
        assert_eq!(request.month.month, 6);
        assert_eq!(request.category(), Category::Subsidized);
    }

    #[test]
    fn test_build_request_from_csv_requires_month() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.csv");
        std::fs::write(&path, "id,nama,1,total\nPKL-1,Pangkalan Satu,5,5\n").unwrap();
        let err = build_request(
            &None,
            &Some(path.display().to_string()),
            &None,
            "non-pso",
            "LPG 12 kg",
            "rencana",
        )
        .unwrap_err();
        assert!(err.to_string().contains("--month"));

        let request = build_request(
            &None,
            &Some(path.display().to_string()),
            &Some("2025-06".to_string()),
            "non-pso",
            "LPG 12 kg",
            "rencana",
        )
        .unwrap();
        assert_eq!(request.rows.len(), 1);
        assert_eq!(request.category(), Category::NonSubsidized);
    }
}
