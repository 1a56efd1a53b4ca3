use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// JSON object keys are always strings, and serde's flatten buffering
/// keeps them that way, so day numbers arrive as "1".."31" rather than
/// integers. Parse them back into numeric keys.
fn daily_from_string_keys<'de, D>(de: D) -> Result<BTreeMap<u32, i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, i64>::deserialize(de)?;
    raw.into_iter()
        .map(|(k, v)| {
            k.trim()
                .parse::<u32>()
                .map(|day| (day, v))
                .map_err(|_| D::Error::custom(format!("invalid day number '{k}'")))
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "SUBSIDIZED")]
    Subsidized,
    #[serde(rename = "NON_SUBSIDIZED")]
    NonSubsidized,
}

impl Category {
    /// Regulatory annotation printed next to the product label.
    pub fn annotation(&self) -> &'static str {
        match self {
            Self::Subsidized => "PSO",
            Self::NonSubsidized => "Non PSO",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportKind {
    #[serde(rename = "PLANNING")]
    Planning,
    #[serde(rename = "DISTRIBUTION")]
    Distribution,
}

impl ReportKind {
    pub fn title_label(&self) -> &'static str {
        match self {
            Self::Planning => "RENCANA PENYALURAN",
            Self::Distribution => "REALISASI PENYALURAN",
        }
    }

    pub fn file_label(&self) -> &'static str {
        match self {
            Self::Planning => "RencanaPenyaluran",
            Self::Distribution => "RealisasiPenyaluran",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMonth {
    pub year: i32,
    pub month: u32,
}

impl ReportMonth {
    /// Parse "YYYY-MM". Rejects month numbers outside 1..=12 and years
    /// outside 1900..=9999 (calendar arithmetic needs a real year, and
    /// the filename format expects four digits).
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.split('-').collect();
        if parts.len() != 2 {
            return None;
        }
        let year: i32 = parts[0].parse().ok()?;
        let month: u32 = parts[1].parse().ok()?;
        if !(1900..=9999).contains(&year) || !(1..=12).contains(&month) {
            return None;
        }
        Some(Self { year, month })
    }
}

/// One depot row for subsidized product: sparse daily counts plus the
/// pre-computed recap columns the compliance format requires. The recap
/// fields arrive from the upstream aggregation and are displayed and
/// summed as-is, never re-derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsidizedRow {
    pub depot_id: String,
    pub depot_name: String,
    /// Day number -> cylinders moved that day. Absent days count as 0.
    #[serde(default, deserialize_with = "daily_from_string_keys")]
    pub daily: BTreeMap<u32, i64>,
    pub monthly_quota: i64,
    pub total_normal: i64,
    pub total_fakultatif: i64,
    pub remaining_quota: i64,
    pub grand_total: i64,
}

/// One depot row for non-subsidized product: no quota accounting, only
/// the daily counts and a grand total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonSubsidizedRow {
    pub depot_id: String,
    pub depot_name: String,
    #[serde(default, deserialize_with = "daily_from_string_keys")]
    pub daily: BTreeMap<u32, i64>,
    pub grand_total: i64,
}

/// Rows tagged by category, so a request cannot pair subsidized columns
/// with non-subsidized row shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", content = "rows")]
pub enum ReportRows {
    #[serde(rename = "SUBSIDIZED")]
    Subsidized(Vec<SubsidizedRow>),
    #[serde(rename = "NON_SUBSIDIZED")]
    NonSubsidized(Vec<NonSubsidizedRow>),
}

impl ReportRows {
    pub fn category(&self) -> Category {
        match self {
            Self::Subsidized(_) => Category::Subsidized,
            Self::NonSubsidized(_) => Category::NonSubsidized,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Subsidized(rows) => rows.len(),
            Self::NonSubsidized(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub month: ReportMonth,
    /// Display label for the product, e.g. "LPG 3 kg".
    pub product_type: String,
    pub report_kind: ReportKind,
    #[serde(flatten)]
    pub rows: ReportRows,
}

impl ReportRequest {
    pub fn category(&self) -> Category {
        self.rows.category()
    }

    /// Output filename: {kind}_{YYYY-MM}.{ext}
    pub fn filename(&self, ext: &str) -> String {
        format!(
            "{}_{:04}-{:02}.{}",
            self.report_kind.file_label(),
            self.month.year,
            self.month.month,
            ext
        )
    }
}

/// Identity of the reporting agent, shown in the letterhead and the
/// info block. Resolved through the profile fallback chain before a
/// report is compiled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentProfile {
    pub name: String,
    pub address: String,
    pub email: String,
    pub registration_no: String,
    pub region: String,
}

impl Default for AgentProfile {
    fn default() -> Self {
        Self {
            name: "PT Mitra Energi Persada".to_string(),
            address: "Jl. Raya Bekasi Km 18 No. 5, Jakarta Timur".to_string(),
            email: "admin@mitraenergi.co.id".to_string(),
            registration_no: "AGEN-31-00418".to_string(),
            region: "Jakarta Timur".to_string(),
        }
    }
}

/// Pre-decoded letterhead logo. Decoding is the host's job; the
/// document renderer only places raw RGB8 pixels.
#[derive(Debug, Clone)]
pub struct LogoImage {
    pub width_px: u32,
    pub height_px: u32,
    pub rgb: Vec<u8>,
}

/// Finished artifact handed back to the caller, which owns delivery.
#[derive(Debug, Clone)]
pub struct ReportFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}
