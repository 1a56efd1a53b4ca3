use crate::calendar::DayMeta;
use crate::models::Category;

/// Horizontal alignment of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// Column identities of the allocation grid, in display order. A future
/// product category gets a new match arm here, not a runtime flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    DepotId,
    DepotName,
    Quota,
    Day(u32),
    TotalNormal,
    TotalFakultatif,
    RemainingQuota,
    GrandTotal,
}

impl ColumnKind {
    /// Header label. Day columns are zero-padded to two digits.
    pub fn title(&self) -> String {
        match self {
            Self::DepotId => "ID Pangkalan".to_string(),
            Self::DepotName => "Nama Pangkalan".to_string(),
            Self::Quota => "Alokasi".to_string(),
            Self::Day(d) => format!("{d:02}"),
            Self::TotalNormal => "Total Normal".to_string(),
            Self::TotalFakultatif => "Total Fakultatif".to_string(),
            Self::RemainingQuota => "Sisa Alokasi".to_string(),
            Self::GrandTotal => "Total".to_string(),
        }
    }

    pub fn align(&self) -> Align {
        match self {
            Self::DepotName => Align::Left,
            _ => Align::Center,
        }
    }

    /// Columns that carry counts and take part in the totals row.
    pub fn is_numeric(&self) -> bool {
        !matches!(self, Self::DepotId | Self::DepotName)
    }

    pub fn is_day(&self) -> bool {
        matches!(self, Self::Day(_))
    }

    /// Relative width weight. Renderers scale these to their own units.
    /// The non-subsidized layout has one summary column instead of five,
    /// so the freed space goes to the depot name.
    fn width_hint(&self, category: Category) -> f32 {
        match self {
            Self::DepotId => 16.0,
            Self::DepotName => match category {
                Category::Subsidized => 34.0,
                Category::NonSubsidized => 48.0,
            },
            Self::Quota => 11.0,
            Self::Day(_) => 5.0,
            Self::TotalNormal | Self::TotalFakultatif => 11.0,
            Self::RemainingQuota => 11.0,
            Self::GrandTotal => 11.0,
        }
    }
}

/// Final per-column rendering contract: identity, width weight,
/// alignment, and whether the column gets the weekend wash.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSpec {
    pub kind: ColumnKind,
    pub width_hint: f32,
    pub align: Align,
    pub highlighted: bool,
}

fn columns_for(category: Category, days_in_month: u32) -> Vec<ColumnKind> {
    let mut cols = vec![ColumnKind::DepotId, ColumnKind::DepotName];
    if category == Category::Subsidized {
        cols.push(ColumnKind::Quota);
    }
    cols.extend((1..=days_in_month).map(ColumnKind::Day));
    match category {
        Category::Subsidized => {
            cols.push(ColumnKind::TotalNormal);
            cols.push(ColumnKind::TotalFakultatif);
            cols.push(ColumnKind::RemainingQuota);
            cols.push(ColumnKind::GrandTotal);
        }
        Category::NonSubsidized => cols.push(ColumnKind::GrandTotal),
    }
    cols
}

/// Build the column specs for one report: schema order from the
/// category, weekend flags from the day metadata.
pub fn build_columns(category: Category, days: &[DayMeta]) -> Vec<ColumnSpec> {
    columns_for(category, days.len() as u32)
        .into_iter()
        .map(|kind| {
            let highlighted = match kind {
                ColumnKind::Day(d) => days[(d - 1) as usize].is_weekend,
                _ => false,
            };
            ColumnSpec {
                kind,
                width_hint: kind.width_hint(category),
                align: kind.align(),
                highlighted,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::month_days;

    #[test]
    fn test_subsidized_schema_has_all_summary_columns() {
        let days = month_days(2025, 6, 30);
        let cols = build_columns(Category::Subsidized, &days);
        // id + name + quota + 30 days + 4 summary columns
        assert_eq!(cols.len(), 37);
        assert_eq!(cols[2].kind, ColumnKind::Quota);
        let kinds: Vec<ColumnKind> = cols.iter().map(|c| c.kind).collect();
        assert!(kinds.contains(&ColumnKind::TotalNormal));
        assert!(kinds.contains(&ColumnKind::TotalFakultatif));
        assert!(kinds.contains(&ColumnKind::RemainingQuota));
        assert_eq!(kinds.last(), Some(&ColumnKind::GrandTotal));
    }

    #[test]
    fn test_non_subsidized_schema_has_single_summary_column() {
        let days = month_days(2025, 6, 30);
        let cols = build_columns(Category::NonSubsidized, &days);
        // id + name + 30 days + grand total
        assert_eq!(cols.len(), 33);
        let kinds: Vec<ColumnKind> = cols.iter().map(|c| c.kind).collect();
        assert!(!kinds.contains(&ColumnKind::Quota));
        assert!(!kinds.contains(&ColumnKind::TotalNormal));
        assert!(!kinds.contains(&ColumnKind::TotalFakultatif));
        assert!(!kinds.contains(&ColumnKind::RemainingQuota));
        assert_eq!(kinds.iter().filter(|k| **k == ColumnKind::GrandTotal).count(), 1);
    }

    #[test]
    fn test_weekend_columns_are_flagged() {
        let days = month_days(2025, 6, 30);
        let cols = build_columns(Category::Subsidized, &days);
        let highlighted: Vec<u32> = cols
            .iter()
            .filter(|c| c.highlighted)
            .filter_map(|c| match c.kind {
                ColumnKind::Day(d) => Some(d),
                _ => None,
            })
            .collect();
        assert_eq!(highlighted, vec![1, 8, 15, 22, 29]);
        // Only day columns ever carry the flag.
        assert!(cols.iter().all(|c| c.kind.is_day() || !c.highlighted));
    }

    #[test]
    fn test_day_titles_are_zero_padded() {
        assert_eq!(ColumnKind::Day(3).title(), "03");
        assert_eq!(ColumnKind::Day(31).title(), "31");
    }

    #[test]
    fn test_name_column_widens_without_quota_columns() {
        let days = month_days(2025, 6, 30);
        let sub = build_columns(Category::Subsidized, &days);
        let non = build_columns(Category::NonSubsidized, &days);
        assert!(non[1].width_hint > sub[1].width_hint);
        assert_eq!(sub[1].align, Align::Left);
        assert_eq!(sub[0].align, Align::Center);
    }
}
