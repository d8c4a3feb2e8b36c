use chrono::NaiveDate;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Normalizes a user-supplied due date. Empty input stays empty; a valid
/// `YYYY-MM-DD` string is kept as typed (minus surrounding whitespace); an
/// unparsable value is coerced to the empty string rather than rejected.
pub fn normalize_due_date(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    match NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        Ok(_) => trimmed.to_string(),
        Err(_) => String::new(),
    }
}

/// Overdue rule shared by todos and bills: the due date is non-empty,
/// parses, the record is not settled (completed/paid), and the date is
/// strictly before `today`.
pub fn is_overdue(due_date: &str, settled: bool, today: NaiveDate) -> bool {
    if settled || due_date.is_empty() {
        return false;
    }
    NaiveDate::parse_from_str(due_date, DATE_FORMAT)
        .map(|d| d < today)
        .unwrap_or(false)
}
