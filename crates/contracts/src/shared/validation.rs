//! Поверхностная проверка полей форм (обязательность и формат).
//!
//! Бизнес-правила проверяет сервер; здесь только то, что можно показать
//! пользователю сразу рядом с полем.

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$").expect("valid email regex")
});

static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)+(:\d+)?(/\S*)?$").expect("valid url regex")
});

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9 ()\-]{7,20}$").expect("valid phone regex"));

/// Ошибка, если значение пустое
pub fn required(value: &str, label: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("Поле \"{}\" обязательно", label))
    } else {
        Ok(())
    }
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value.trim())
}

pub fn is_valid_url(value: &str) -> bool {
    URL_RE.is_match(value.trim())
}

pub fn is_valid_phone(value: &str) -> bool {
    PHONE_RE.is_match(value.trim())
}

/// Необязательное поле: пустое значение допустимо, непустое проверяется `check`
pub fn optional(value: Option<&str>, check: fn(&str) -> bool, message: &str) -> Result<(), String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() && !check(v) => Err(message.to_string()),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(is_valid_email("ann@shop.example.com"));
        assert!(is_valid_email(" bob.smith+pos@mail.io "));
        assert!(!is_valid_email("ann@"));
        assert!(!is_valid_email("ann shop@mail.io"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_url() {
        assert!(is_valid_url("https://res.cloudinary.com/demo/image/upload/logo.png"));
        assert!(is_valid_url("http://localhost.dev:8080"));
        assert!(!is_valid_url("ftp://files.example.com"));
        assert!(!is_valid_url("example.com"));
    }

    #[test]
    fn test_phone() {
        assert!(is_valid_phone("+1 (555) 123-4567"));
        assert!(!is_valid_phone("12-34"));
        assert!(!is_valid_phone("call me"));
    }

    #[test]
    fn test_required_and_optional() {
        assert!(required("  ", "Имя").is_err());
        assert!(required("Ann", "Имя").is_ok());
        assert!(optional(None, is_valid_email, "bad").is_ok());
        assert!(optional(Some(""), is_valid_email, "bad").is_ok());
        assert_eq!(optional(Some("nope"), is_valid_email, "bad"), Err("bad".to_string()));
    }
}
