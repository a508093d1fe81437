use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::error::{AppError, Result};

/// Accepted user input shape. Format is checked before calendar
/// validity so the two failure modes get distinct messages.
static INPUT_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}-\d{2}-\d{4}$").expect("valid date regex"));

const INPUT_FORMAT: &str = "%d-%m-%Y";
/// What the dashboard's filter inputs expect, e.g. `22 OCT 2025`.
const SITE_FORMAT: &str = "%d %b %Y";

/// Inclusive reservation date filter, as entered by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(AppError::Validation(format!(
                "date range ends before it starts ({} > {})",
                start.format(INPUT_FORMAT),
                end.format(INPUT_FORMAT)
            )));
        }
        Ok(Self { start, end })
    }

    /// Parse a `DD-MM-YYYY` pair.
    pub fn parse(from: &str, to: &str) -> Result<Self> {
        Self::new(parse_input_date(from)?, parse_input_date(to)?)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Start date rendered for the dashboard filter input.
    pub fn site_from(&self) -> String {
        format_site(self.start)
    }

    /// End date rendered for the dashboard filter input.
    pub fn site_to(&self) -> String {
        format_site(self.end)
    }

    /// Start date as it appears in output filenames.
    pub fn file_from(&self) -> String {
        self.start.format(INPUT_FORMAT).to_string()
    }

    /// End date as it appears in output filenames.
    pub fn file_to(&self) -> String {
        self.end.format(INPUT_FORMAT).to_string()
    }

    pub fn output_filename(&self) -> String {
        format!("reservations_{}_to_{}.json", self.file_from(), self.file_to())
    }
}

/// Validate and parse one `DD-MM-YYYY` date.
pub fn parse_input_date(input: &str) -> Result<NaiveDate> {
    let input = input.trim();
    if !INPUT_SHAPE.is_match(input) {
        return Err(AppError::Validation(format!(
            "wrong date format {:?}, use DD-MM-YYYY (e.g. 22-10-2025)",
            input
        )));
    }
    NaiveDate::parse_from_str(input, INPUT_FORMAT).map_err(|_| {
        AppError::Validation(format!(
            "{} does not exist on the calendar (e.g. 30-02-2025 is invalid)",
            input
        ))
    })
}

fn format_site(date: NaiveDate) -> String {
    date.format(SITE_FORMAT).to_string().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_renders_both_forms() {
        let range = DateRange::parse("01-10-2025", "22-10-2025").unwrap();
        assert_eq!(range.site_from(), "01 OCT 2025");
        assert_eq!(range.site_to(), "22 OCT 2025");
        assert_eq!(range.file_from(), "01-10-2025");
        assert_eq!(range.file_to(), "22-10-2025");
    }

    #[test]
    fn output_filename_uses_input_form() {
        let range = DateRange::parse("01-10-2025", "31-10-2025").unwrap();
        assert_eq!(
            range.output_filename(),
            "reservations_01-10-2025_to_31-10-2025.json"
        );
    }

    #[test]
    fn rejects_wrong_format_before_calendar_check() {
        let err = parse_input_date("2025-10-22").unwrap_err();
        assert!(err.to_string().contains("wrong date format"), "{}", err);
    }

    #[test]
    fn rejects_impossible_dates() {
        let err = parse_input_date("30-02-2025").unwrap_err();
        assert!(err.to_string().contains("calendar"), "{}", err);
    }

    #[test]
    fn rejects_inverted_range() {
        let err = DateRange::parse("22-10-2025", "01-10-2025").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn single_day_range_is_fine() {
        assert!(DateRange::parse("22-10-2025", "22-10-2025").is_ok());
    }
}
