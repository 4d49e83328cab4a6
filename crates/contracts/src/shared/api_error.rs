//! Извлечение текста ошибки из ответа сервера

use serde_json::Value;

/// Текст ошибки из тела ответа: `message`, затем `error` (строка или
/// объект с `message`). Если ничего не нашлось, возвращается `fallback`.
pub fn extract_error_message(body: &str, fallback: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(message_from_value)
        .unwrap_or_else(|| fallback.to_string())
}

fn message_from_value(value: &Value) -> Option<String> {
    let non_empty = |v: &Value| {
        v.as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    if let Some(msg) = value.get("message").and_then(non_empty) {
        return Some(msg);
    }
    match value.get("error") {
        Some(err @ Value::String(_)) => non_empty(err),
        Some(err @ Value::Object(_)) => err.get("message").and_then(non_empty),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_field() {
        assert_eq!(
            extract_error_message(r#"{"success":false,"message":"Employee code already exists"}"#, "fallback"),
            "Employee code already exists"
        );
    }

    #[test]
    fn test_error_field_variants() {
        assert_eq!(extract_error_message(r#"{"error":"Not found"}"#, "fallback"), "Not found");
        assert_eq!(
            extract_error_message(r#"{"error":{"message":"Order already verified"}}"#, "fallback"),
            "Order already verified"
        );
    }

    #[test]
    fn test_fallback() {
        assert_eq!(extract_error_message("<html>502</html>", "Ошибка сервера"), "Ошибка сервера");
        assert_eq!(extract_error_message(r#"{"message":"  "}"#, "Ошибка"), "Ошибка");
        assert_eq!(extract_error_message("", "Ошибка"), "Ошибка");
    }
}
