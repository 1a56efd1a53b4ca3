/// Format a cylinder count with Indonesian thousands separators: 1.250
pub fn qty(val: i64) -> String {
    let negative = val < 0;
    let digits = val.unsigned_abs().to_string();

    let mut grouped = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    let grouped: String = grouped.chars().rev().collect();

    if negative {
        format!("-{grouped}")
    } else {
        grouped
    }
}

const MONTHS: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// Indonesian month name for a 1-based month number.
pub fn month_name(month: u32) -> &'static str {
    let idx = (month.saturating_sub(1) as usize).min(MONTHS.len() - 1);
    MONTHS[idx]
}

/// Month-year label used in titles and sheet names: "Juni 2025".
pub fn month_year(year: i32, month: u32) -> String {
    format!("{} {}", month_name(month), year)
}
