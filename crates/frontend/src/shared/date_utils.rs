/// Форматирование дат из API (ISO 8601) для таблиц и форм
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// "2024-03-15T14:02:26.123Z" -> "15.03.2024 14:02"
pub fn format_datetime(datetime_str: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(datetime_str) {
        return dt.format("%d.%m.%Y %H:%M").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(datetime_str, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%d.%m.%Y %H:%M").to_string();
    }
    format_date(datetime_str)
}

/// "2024-03-15" или "2024-03-15T14:02:26Z" -> "15.03.2024"
pub fn format_date(date_str: &str) -> String {
    let date_part = date_str.get(..10).unwrap_or(date_str);
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(date) => date.format("%d.%m.%Y").to_string(),
        Err(_) => date_str.to_string(),
    }
}

pub fn format_date_opt(value: Option<&str>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .map(format_date)
        .unwrap_or_else(|| "—".to_string())
}

/// Значение для `<input type="date">`
pub fn to_input_date(date_str: &str) -> String {
    let date_part = date_str.get(..10).unwrap_or(date_str);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_datetime() {
        assert_eq!(format_datetime("2024-03-15T14:02:26.123Z"), "15.03.2024 14:02");
        assert_eq!(format_datetime("2024-12-31T23:59:59"), "31.12.2024 23:59");
        assert_eq!(format_datetime("2024-12-31"), "31.12.2024");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-03-15"), "15.03.2024");
        assert_eq!(format_date("2024-03-15T14:02:26.123Z"), "15.03.2024");
        assert_eq!(format_date_opt(None), "—");
        assert_eq!(format_date_opt(Some(" ")), "—");
    }

    #[test]
    fn test_invalid_format() {
        assert_eq!(format_datetime("invalid"), "invalid");
        assert_eq!(format_date("2024-13-45"), "2024-13-45");
        assert_eq!(to_input_date("garbage"), "");
        assert_eq!(to_input_date("2024-03-15T00:00:00Z"), "2024-03-15");
    }
}
