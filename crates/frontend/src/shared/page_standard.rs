//! Категории страниц во вкладках.
//!
//! Корневой элемент каждой страницы получает `id` вида `{entity}--{category}`
//! (например `"a001_employee--list"`) и `data-page-category`.

/// Список записей с фильтрами и пагинацией
pub const PAGE_CAT_LIST: &str = "list";

/// Карточка или форма одной записи
pub const PAGE_CAT_DETAIL: &str = "detail";

/// Настройки (профиль компании)
pub const PAGE_CAT_SETTINGS: &str = "settings";

/// `{entity}--{category}` с непустыми частями
pub fn is_valid_page_id(id: &str) -> bool {
    matches!(id.split_once("--"), Some((entity, category)) if !entity.is_empty() && !category.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_id_format() {
        assert!(is_valid_page_id("a001_employee--list"));
        assert!(!is_valid_page_id("a001_employee"));
        assert!(!is_valid_page_id("--list"));
    }
}
