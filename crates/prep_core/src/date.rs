use chrono::NaiveDate;

/// Long-form display string sent to the server, e.g. "April 5, 2024".
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Parse a date typed by the user.
///
/// Accepts ISO dates (`2024-04-05`), the long form (`April 5, 2024`) and the
/// relative words `today`, `tomorrow` and `yesterday`, resolved against `today`.
pub fn parse_date_input(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    match trimmed.to_ascii_lowercase().as_str() {
        "today" => return Some(today),
        "tomorrow" => return today.succ_opt(),
        "yesterday" => return today.pred_opt(),
        _ => {}
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%B %d, %Y"))
        .ok()
}
