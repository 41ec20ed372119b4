//! Date helper functions

use chrono::NaiveDate;

/// Format date in full format (like "January 15, 2024")
pub fn full_date(date: &NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(full_date(&date), "January 5, 2024");
    }
}
