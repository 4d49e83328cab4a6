//! Производное представление списка: поиск + фильтр по статусу + сортировка + пагинация.
//!
//! Все списочные экраны (сотрудники, шаблоны ролей, отслеживание заказов)
//! используют один и тот же конвейер. Сущность описывает свои поля через
//! [`FieldMap`], а [`derive_list_view`] строит нужную страницу строк, не
//! изменяя исходную коллекцию.
//!
//! ```rust
//! use contracts::shared::list_view::{derive_list_view, FieldMap, ListQuery, SortKey};
//!
//! #[derive(Clone)]
//! struct Row { name: String, status: String }
//!
//! let fields = FieldMap::<Row>::new()
//!     .search("name", |r| Some(r.name.as_str()))
//!     .status(|r| Some(r.status.as_str()))
//!     .sort("name", |r| SortKey::text(&r.name));
//!
//! let rows = vec![Row { name: "Ann".into(), status: "active".into() }];
//! let query = ListQuery { search_term: "an".into(), ..ListQuery::default() };
//! let page = derive_list_view(Some(&rows), &query, &fields);
//! assert_eq!(page.total_filtered, 1);
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Значение фильтра статуса, совпадающее с любой записью
pub const STATUS_ALL: &str = "All";

/// Подпись "все статусы" из выпадающих списков; тоже считается "всеми"
pub const STATUS_ALL_LABEL: &str = "All Status";

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Является ли значение фильтра статуса "пропускающим всё"
pub fn is_all_status(filter: &str) -> bool {
    let filter = filter.trim();
    filter.is_empty() || filter == STATUS_ALL || filter == STATUS_ALL_LABEL
}

// ============================================================================
// Sorting
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn is_ascending(self) -> bool {
        self == SortDirection::Asc
    }
}

/// Ключ сортировки, который поле отдаёт компаратору
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortKey<'a> {
    Text(&'a str),
    Number(f64),
    Date(NaiveDate),
    Flag(bool),
    /// Пустое значение; при любом направлении остаётся в конце
    Missing,
}

impl<'a> SortKey<'a> {
    pub fn text(value: &'a str) -> Self {
        SortKey::Text(value)
    }

    pub fn opt_text(value: Option<&'a str>) -> Self {
        value.map(SortKey::Text).unwrap_or(SortKey::Missing)
    }

    /// Дата из ISO-строки ("2024-03-15" или "2024-03-15T14:02:26Z")
    pub fn date(value: Option<&str>) -> Self {
        value
            .and_then(|s| s.get(..10))
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
            .map(SortKey::Date)
            .unwrap_or(SortKey::Missing)
    }

    fn rank(&self) -> u8 {
        match self {
            SortKey::Text(_) => 0,
            SortKey::Number(_) => 1,
            SortKey::Date(_) => 2,
            SortKey::Flag(_) => 3,
            SortKey::Missing => 4,
        }
    }

    /// Порядок по возрастанию: значения одного вида сравниваются между собой,
    /// разные виды упорядочены по рангу (Missing всегда последний).
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Text(a), SortKey::Text(b)) => compare_text(a, b),
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Date(a), SortKey::Date(b)) => a.cmp(b),
            (SortKey::Flag(a), SortKey::Flag(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Сравнение строк без учёта регистра; при равенстве решает исходная строка
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

// ============================================================================
// Field map
// ============================================================================

pub type TextAccessor<T> = fn(&T) -> Option<&str>;
pub type SortAccessor<T> = fn(&T) -> SortKey<'_>;

/// Карта полей сущности для поиска, фильтра статуса и сортировки
pub struct FieldMap<T> {
    search: Vec<(&'static str, TextAccessor<T>)>,
    status: Option<TextAccessor<T>>,
    sort: Vec<(&'static str, SortAccessor<T>)>,
}

impl<T> Default for FieldMap<T> {
    fn default() -> Self {
        Self {
            search: Vec::new(),
            status: None,
            sort: Vec::new(),
        }
    }
}

impl<T> FieldMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Добавить строковое поле, участвующее в поиске
    pub fn search(mut self, name: &'static str, accessor: TextAccessor<T>) -> Self {
        self.search.push((name, accessor));
        self
    }

    /// Задать поле статуса для фильтра
    pub fn status(mut self, accessor: TextAccessor<T>) -> Self {
        self.status = Some(accessor);
        self
    }

    /// Добавить поле, по которому разрешена сортировка
    pub fn sort(mut self, name: &'static str, accessor: SortAccessor<T>) -> Self {
        self.sort.push((name, accessor));
        self
    }

    fn sort_accessor(&self, field: &str) -> Option<SortAccessor<T>> {
        self.sort
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, accessor)| *accessor)
    }

    /// `term` уже приведён к нижнему регистру и обрезан
    fn matches_search(&self, record: &T, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }
        self.search.iter().any(|(_, accessor)| {
            accessor(record)
                .map(|value| value.to_lowercase().contains(term))
                .unwrap_or(false)
        })
    }

    fn matches_status(&self, record: &T, filter: &str) -> bool {
        if is_all_status(filter) {
            return true;
        }
        match self.status {
            Some(accessor) => accessor(record) == Some(filter),
            None => true,
        }
    }
}

/// Сущность, умеющая описать свои поля для списочного экрана
pub trait Listable: Sized {
    fn list_fields() -> FieldMap<Self>;
}

// ============================================================================
// Query / result
// ============================================================================

/// Состояние представления списка
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub search_term: String,
    pub status_filter: String,
    pub sort_field: Option<String>,
    pub sort_direction: SortDirection,
    /// Номер страницы, начиная с 1
    pub page: usize,
    pub page_size: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            status_filter: STATUS_ALL.to_string(),
            sort_field: None,
            sort_direction: SortDirection::Asc,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ListQuery {
    pub fn sorted_by(field: &str, direction: SortDirection) -> Self {
        Self {
            sort_field: Some(field.to_string()),
            sort_direction: direction,
            ..Self::default()
        }
    }

    /// Клик по заголовку: то же поле меняет направление, новое поле сортирует по возрастанию
    pub fn toggle_sort(&mut self, field: &str) {
        if self.sort_field.as_deref() == Some(field) {
            self.sort_direction = self.sort_direction.toggle();
        } else {
            self.sort_field = Some(field.to_string());
            self.sort_direction = SortDirection::Asc;
        }
    }

    pub fn set_search(&mut self, term: String) {
        self.search_term = term;
        self.page = 1;
    }

    pub fn set_status(&mut self, status: String) {
        self.status_filter = status;
        self.page = 1;
    }

    pub fn set_page_size(&mut self, size: usize) {
        self.page_size = size.max(1);
        self.page = 1;
    }
}

/// Результат: строки текущей страницы и счётчики
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPage<T> {
    pub rows: Vec<T>,
    pub total_filtered: usize,
    pub total_pages: usize,
}

impl<T> Default for ListPage<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            total_filtered: 0,
            total_pages: 0,
        }
    }
}

/// Построить страницу списка. Чистая функция, исходные записи не меняются.
///
/// Отсутствующая коллекция (`None`) обрабатывается как пустая.
pub fn derive_list_view<T: Clone>(
    records: Option<&[T]>,
    query: &ListQuery,
    fields: &FieldMap<T>,
) -> ListPage<T> {
    let records = records.unwrap_or(&[]);
    let term = query.search_term.trim().to_lowercase();

    let mut filtered: Vec<&T> = records
        .iter()
        .filter(|r| fields.matches_search(r, &term) && fields.matches_status(r, &query.status_filter))
        .collect();

    // Поле без компаратора не переупорядочивает записи
    if let Some(accessor) = query
        .sort_field
        .as_deref()
        .and_then(|field| fields.sort_accessor(field))
    {
        // Пустые значения остаются в конце в исходном порядке
        let (mut present, missing): (Vec<&T>, Vec<&T>) = filtered
            .into_iter()
            .partition(|r| accessor(r) != SortKey::Missing);
        present.sort_by(|a, b| accessor(a).compare(&accessor(b)));
        if !query.sort_direction.is_ascending() {
            present.reverse();
        }
        present.extend(missing);
        filtered = present;
    }

    let page_size = query.page_size.max(1);
    let page = query.page.max(1);
    let total_filtered = filtered.len();
    let total_pages = total_filtered.div_ceil(page_size);
    let start = (page - 1).saturating_mul(page_size);

    let rows = filtered
        .into_iter()
        .skip(start)
        .take(page_size)
        .cloned()
        .collect();

    ListPage {
        rows,
        total_filtered,
        total_pages,
    }
}

/// То же, что [`derive_list_view`], с картой полей самой сущности
pub fn derive_listable<T: Listable + Clone>(records: Option<&[T]>, query: &ListQuery) -> ListPage<T> {
    derive_list_view(records, query, &T::list_fields())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Person {
        first_name: String,
        code: String,
        status: String,
        age: f64,
        joined: Option<String>,
    }

    fn person(first_name: &str, code: &str, status: &str, age: f64) -> Person {
        Person {
            first_name: first_name.to_string(),
            code: code.to_string(),
            status: status.to_string(),
            age,
            joined: None,
        }
    }

    fn fields() -> FieldMap<Person> {
        FieldMap::<Person>::new()
            .search("firstName", |p| Some(p.first_name.as_str()))
            .search("code", |p| Some(p.code.as_str()))
            .status(|p| Some(p.status.as_str()))
            .sort("firstName", |p| SortKey::text(&p.first_name))
            .sort("age", |p| SortKey::Number(p.age))
            .sort("joined", |p| SortKey::date(p.joined.as_deref()))
    }

    fn names(page: &ListPage<Person>) -> Vec<&str> {
        page.rows.iter().map(|p| p.first_name.as_str()).collect()
    }

    fn sample() -> Vec<Person> {
        vec![
            person("Ann", "E-001", "active", 31.0),
            person("Bob", "E-002", "inactive", 45.0),
            person("carl", "E-003", "active", 28.0),
            person("Dana", "X-777", "suspended", 39.0),
            person("Eve", "E-005", "active", 52.0),
        ]
    }

    #[test]
    fn test_example_scenario() {
        let records = vec![person("Ann", "", "active", 0.0), person("Bob", "", "inactive", 0.0)];
        let query = ListQuery {
            search_term: "an".into(),
            status_filter: STATUS_ALL_LABEL.into(),
            page_size: 10,
            ..ListQuery::default()
        };

        let page = derive_list_view(Some(&records), &query, &fields());
        assert_eq!(names(&page), vec!["Ann"]);
        assert_eq!(page.total_filtered, 1);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_search_matches_any_configured_field() {
        let records = sample();
        let query = ListQuery {
            search_term: "x-77".into(),
            ..ListQuery::default()
        };
        let page = derive_list_view(Some(&records), &query, &fields());
        assert_eq!(names(&page), vec!["Dana"]);

        let query = ListQuery {
            search_term: "  CARL ".into(),
            ..ListQuery::default()
        };
        let page = derive_list_view(Some(&records), &query, &fields());
        assert_eq!(names(&page), vec!["carl"]);
    }

    #[test]
    fn test_filter_is_search_and_status() {
        let records = sample();
        let query = ListQuery {
            search_term: "e-00".into(),
            status_filter: "active".into(),
            ..ListQuery::default()
        };
        let page = derive_list_view(Some(&records), &query, &fields());
        assert_eq!(names(&page), vec!["Ann", "carl", "Eve"]);

        for p in &page.rows {
            assert!(p.code.to_lowercase().contains("e-00") && p.status == "active");
        }
    }

    #[test]
    fn test_status_sentinels_match_everything() {
        let records = sample();
        let unfiltered = derive_list_view(Some(&records), &ListQuery { status_filter: String::new(), ..ListQuery::default() }, &fields());
        for sentinel in [STATUS_ALL, STATUS_ALL_LABEL] {
            let query = ListQuery {
                status_filter: sentinel.into(),
                ..ListQuery::default()
            };
            assert_eq!(derive_list_view(Some(&records), &query, &fields()), unfiltered);
        }
        assert_eq!(unfiltered.total_filtered, records.len());
    }

    #[test]
    fn test_status_filter_is_exact() {
        let records = sample();
        let query = ListQuery {
            status_filter: "Active".into(),
            ..ListQuery::default()
        };
        let page = derive_list_view(Some(&records), &query, &fields());
        assert_eq!(page.total_filtered, 0);
        assert_eq!(page.total_pages, 0);
        assert!(page.rows.is_empty());
    }

    #[test]
    fn test_text_sort_is_case_insensitive_and_reversible() {
        let records = sample();
        let asc = derive_list_view(Some(&records), &ListQuery::sorted_by("firstName", SortDirection::Asc), &fields());
        assert_eq!(names(&asc), vec!["Ann", "Bob", "carl", "Dana", "Eve"]);

        let again = derive_list_view(Some(&asc.rows), &ListQuery::sorted_by("firstName", SortDirection::Asc), &fields());
        assert_eq!(again, asc);

        let desc = derive_list_view(Some(&records), &ListQuery::sorted_by("firstName", SortDirection::Desc), &fields());
        let mut reversed = names(&asc);
        reversed.reverse();
        assert_eq!(names(&desc), reversed);
    }

    #[test]
    fn test_numeric_and_date_fields_are_compared() {
        let records = sample();
        let page = derive_list_view(Some(&records), &ListQuery::sorted_by("age", SortDirection::Desc), &fields());
        assert_eq!(names(&page), vec!["Eve", "Bob", "Dana", "Ann", "carl"]);

        let mut dated = sample();
        dated[0].joined = Some("2024-05-01".into());
        dated[1].joined = Some("2023-01-15T10:00:00Z".into());
        dated[2].joined = Some("not a date".into());
        let page = derive_list_view(Some(&dated), &ListQuery::sorted_by("joined", SortDirection::Asc), &fields());
        // Пустые и некорректные даты уходят в конец в исходном порядке
        assert_eq!(names(&page), vec!["Bob", "Ann", "carl", "Dana", "Eve"]);
    }

    #[test]
    fn test_desc_exactly_reverses_equal_names() {
        let records = vec![person("Ann", "1", "active", 0.0), person("Ann", "2", "active", 0.0), person("Bob", "3", "active", 0.0)];
        let codes = |page: &ListPage<Person>| page.rows.iter().map(|p| p.code.clone()).collect::<Vec<_>>();

        let asc = derive_list_view(Some(&records), &ListQuery::sorted_by("firstName", SortDirection::Asc), &fields());
        let desc = derive_list_view(Some(&records), &ListQuery::sorted_by("firstName", SortDirection::Desc), &fields());
        assert_eq!(codes(&asc), vec!["1", "2", "3"]);
        assert_eq!(codes(&desc), vec!["3", "2", "1"]);

        let again = derive_list_view(Some(&records), &ListQuery::sorted_by("firstName", SortDirection::Desc), &fields());
        assert_eq!(again, desc);
    }

    #[test]
    fn test_missing_dates_stay_last_when_descending() {
        let mut dated = sample();
        dated[1].joined = Some("2023-01-15".into());
        dated[3].joined = Some("2024-05-01".into());
        let page = derive_list_view(Some(&dated), &ListQuery::sorted_by("joined", SortDirection::Desc), &fields());
        assert_eq!(names(&page), vec!["Dana", "Bob", "Ann", "carl", "Eve"]);

        let page = derive_list_view(Some(&dated), &ListQuery::sorted_by("joined", SortDirection::Asc), &fields());
        assert_eq!(names(&page), vec!["Bob", "Dana", "Ann", "carl", "Eve"]);
    }

    #[test]
    fn test_unknown_sort_field_keeps_order() {
        let records = sample();
        let page = derive_list_view(Some(&records), &ListQuery::sorted_by("status", SortDirection::Desc), &fields());
        assert_eq!(names(&page), vec!["Ann", "Bob", "carl", "Dana", "Eve"]);
    }

    #[test]
    fn test_pages_reconstruct_filtered_set() {
        let records: Vec<Person> = (0..23)
            .map(|i| person(&format!("P{:02}", i), &format!("C{}", i), if i % 3 == 0 { "inactive" } else { "active" }, i as f64))
            .collect();
        let mut query = ListQuery {
            status_filter: "active".into(),
            page_size: 4,
            ..ListQuery::default()
        };
        let first = derive_list_view(Some(&records), &query, &fields());
        assert_eq!(first.total_filtered, 15);
        assert_eq!(first.total_pages, 4);

        let mut collected = Vec::new();
        for page in 1..=first.total_pages {
            query.page = page;
            collected.extend(derive_list_view(Some(&records), &query, &fields()).rows);
        }
        let expected: Vec<Person> = records.iter().filter(|p| p.status == "active").cloned().collect();
        assert_eq!(collected, expected);
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let records = sample();
        let query = ListQuery {
            page: 9,
            page_size: 2,
            ..ListQuery::default()
        };
        let page = derive_list_view(Some(&records), &query, &fields());
        assert!(page.rows.is_empty());
        assert_eq!(page.total_filtered, 5);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_missing_records_and_degenerate_paging() {
        let page = derive_list_view::<Person>(None, &ListQuery::default(), &fields());
        assert_eq!(page, ListPage::default());

        let records = sample();
        let query = ListQuery {
            page: 0,
            page_size: 0,
            ..ListQuery::default()
        };
        let page = derive_list_view(Some(&records), &query, &fields());
        assert_eq!(names(&page), vec!["Ann"]);
        assert_eq!(page.total_pages, 5);
    }

    #[test]
    fn test_toggle_sort() {
        let mut query = ListQuery::default();
        query.toggle_sort("firstName");
        assert_eq!(query.sort_field.as_deref(), Some("firstName"));
        assert_eq!(query.sort_direction, SortDirection::Asc);
        query.toggle_sort("firstName");
        assert_eq!(query.sort_direction, SortDirection::Desc);
        query.toggle_sort("age");
        assert_eq!(query.sort_direction, SortDirection::Asc);
    }

    #[test]
    fn test_source_is_untouched() {
        let records = sample();
        let before = records.clone();
        let _ = derive_list_view(Some(&records), &ListQuery::sorted_by("age", SortDirection::Asc), &fields());
        assert_eq!(records, before);
    }
}
