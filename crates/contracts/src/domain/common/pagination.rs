use serde::{Deserialize, Serialize};

/// Метаданные пагинации из ответа сервера
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    #[serde(default)]
    pub page: usize,
    #[serde(default)]
    pub limit: usize,
    #[serde(default)]
    pub total: usize,
    #[serde(default, alias = "pages")]
    pub total_pages: usize,
}

impl PaginationMeta {
    /// Номер следующей страницы, если сервер сообщает о неполученных записях
    pub fn next_page(&self, fetched: usize) -> Option<usize> {
        let page = self.page.max(1);
        let rows_left = self.total == 0 || fetched < self.total;
        (page < self.total_pages && rows_left).then_some(page + 1)
    }

    /// Сколько записей сервер насчитал сверх полученных
    pub fn missing_rows(&self, fetched: usize) -> usize {
        self.total.saturating_sub(fetched)
    }
}

/// Страница данных с сервера
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub pagination: Option<PaginationMeta>,
}

impl<T> Paginated<T> {
    pub fn into_parts(self) -> (Vec<T>, Option<PaginationMeta>) {
        (self.data, self.pagination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_paginated_with_and_without_meta() {
        let page: Paginated<String> = serde_json::from_value(json!({
            "data": ["a", "b"],
            "pagination": {"page": 2, "limit": 2, "total": 7, "pages": 4}
        }))
        .unwrap();
        let (items, meta) = page.into_parts();
        assert_eq!(items, vec!["a", "b"]);
        assert_eq!(meta.unwrap().total_pages, 4);

        let bare: Paginated<String> = serde_json::from_value(json!({})).unwrap();
        assert!(bare.data.is_empty());
        assert!(bare.pagination.is_none());
    }

    #[test]
    fn test_next_page_and_missing_rows() {
        let meta = PaginationMeta {
            page: 1,
            limit: 500,
            total: 1200,
            total_pages: 3,
        };
        assert_eq!(meta.next_page(500), Some(2));
        assert_eq!(PaginationMeta { page: 3, ..meta }.next_page(1200), None);
        assert_eq!(PaginationMeta { page: 2, ..meta }.next_page(1200), None);
        assert_eq!(meta.missing_rows(500), 700);
        assert_eq!(meta.missing_rows(1300), 0);

        let pages_only = PaginationMeta {
            page: 0,
            limit: 10,
            total: 0,
            total_pages: 2,
        };
        assert_eq!(pages_only.next_page(10), Some(2));
    }
}
