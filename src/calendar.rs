use chrono::{Datelike, NaiveDate, Weekday};

/// Indonesian weekday abbreviations, Monday first (chrono ordering).
const WEEKDAYS: [&str; 7] = ["Sen", "Sel", "Rab", "Kam", "Jum", "Sab", "Min"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayMeta {
    pub day: u32,
    pub weekday_abbrev: &'static str,
    /// Sunday is the distribution rest day.
    pub is_weekend: bool,
}

/// Last day number of the given month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month + 1, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year + 1, 1, 1).unwrap())
        .pred_opt()
        .unwrap()
        .day()
}

/// One record per day 1..=days, with the true calendar weekday. Months
/// do not start on a fixed weekday, so this never uses a modulo shortcut.
pub fn month_days(year: i32, month: u32, days: u32) -> Vec<DayMeta> {
    (1..=days)
        .map(|day| {
            let weekday = NaiveDate::from_ymd_opt(year, month, day)
                .map(|d| d.weekday())
                .unwrap_or(Weekday::Mon);
            DayMeta {
                day,
                weekday_abbrev: WEEKDAYS[weekday.num_days_from_monday() as usize],
                is_weekend: weekday == Weekday::Sun,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2025, 6), 30);
        assert_eq!(days_in_month(2025, 12), 31);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
    }

    #[test]
    fn test_month_starting_on_sunday() {
        // June 2025 starts on a Sunday.
        let days = month_days(2025, 6, 30);
        assert_eq!(days.len(), 30);
        assert_eq!(days[0].day, 1);
        assert_eq!(days[0].weekday_abbrev, "Min");
        assert!(days[0].is_weekend);

        let sundays: Vec<u32> = days.iter().filter(|d| d.is_weekend).map(|d| d.day).collect();
        assert_eq!(sundays, vec![1, 8, 15, 22, 29]);
    }

    #[test]
    fn test_month_with_no_sunday_in_first_week() {
        // September 2025 starts on a Monday; first Sunday is the 7th.
        let days = month_days(2025, 9, 30);
        assert_eq!(days[0].weekday_abbrev, "Sen");
        assert!(!days[0].is_weekend);

        let sundays: Vec<u32> = days.iter().filter(|d| d.is_weekend).map(|d| d.day).collect();
        assert_eq!(sundays, vec![7, 14, 21, 28]);
    }

    #[test]
    fn test_saturday_is_a_plain_day() {
        // 2025-06-07 is a Saturday.
        let days = month_days(2025, 6, 30);
        assert_eq!(days[6].weekday_abbrev, "Sab");
        assert!(!days[6].is_weekend);
    }
}
