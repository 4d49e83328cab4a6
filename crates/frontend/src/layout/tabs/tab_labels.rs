//! Заголовки вкладок по ключу

/// Префиксы вкладок карточек: ключ вида `{prefix}{id}`
pub const SALE_DETAIL_PREFIX: &str = "a004_sale_detail_";
pub const INVOICE_PREFIX: &str = "a005_invoice_";
pub const SALE_RETURN_PREFIX: &str = "a006_sale_return_";

pub fn sale_detail_key(sale_id: &str) -> String {
    format!("{}{}", SALE_DETAIL_PREFIX, sale_id)
}

pub fn invoice_key(sale_id: &str) -> String {
    format!("{}{}", INVOICE_PREFIX, sale_id)
}

pub fn sale_return_key(sale_id: &str) -> String {
    format!("{}{}", SALE_RETURN_PREFIX, sale_id)
}

/// Читаемый заголовок вкладки. Fallback: сам ключ.
pub fn tab_label_for_key(key: &str) -> &str {
    match key {
        "a001_employee" => "Сотрудники",
        "a002_role_template" => "Шаблоны ролей",
        "a003_order_tracking" => "Проверка заказов",
        "a004_sale" => "Продажи",
        "a004_sale_new" => "Новая продажа",
        "a007_business_profile" => "Профиль компании",
        k if k.starts_with(SALE_DETAIL_PREFIX) => "Продажа",
        k if k.starts_with(INVOICE_PREFIX) => "Счёт",
        k if k.starts_with(SALE_RETURN_PREFIX) => "Возврат",
        other => other,
    }
}

/// Заголовок вкладки карточки: "Продажа · 65A1B2C3"
pub fn detail_tab_label(key: &str, identifier: &str) -> String {
    let short: String = identifier.chars().take(8).collect();
    format!("{} · {}", tab_label_for_key(key), short.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(tab_label_for_key("a001_employee"), "Сотрудники");
        assert_eq!(tab_label_for_key("a004_sale_detail_42"), "Продажа");
        assert_eq!(tab_label_for_key("unknown"), "unknown");
        assert_eq!(
            detail_tab_label("a005_invoice_65a1b2c3d4", "65a1b2c3d4"),
            "Счёт · 65A1B2C3"
        );
        assert_eq!(sale_return_key("42"), "a006_sale_return_42");
        assert_eq!(tab_label_for_key(&sale_detail_key("42")), "Продажа");
    }
}
