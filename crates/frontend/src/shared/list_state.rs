//! Реактивная обёртка над производным представлением списка:
//! запрос (поиск, статус, сортировка, страница) и вычисленная страница строк.

use contracts::shared::list_view::{derive_listable, ListPage, ListQuery, Listable, SortDirection};
use leptos::prelude::*;

use super::entity_store::EntityStore;

pub struct ListView<T: Send + Sync + 'static> {
    pub query: RwSignal<ListQuery>,
    pub page: Memo<ListPage<T>>,
}

impl<T: Send + Sync + 'static> Clone for ListView<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Send + Sync + 'static> Copy for ListView<T> {}

impl<T> ListView<T>
where
    T: Listable + Clone + PartialEq + Send + Sync + 'static,
{
    /// Страница пересчитывается при изменении данных контейнера или запроса
    pub fn new(store: EntityStore<T>, initial: ListQuery) -> Self {
        let query = RwSignal::new(initial);
        let page = Memo::new(move |_| {
            let q = query.get();
            store.state.with(|s| derive_listable(Some(&s.items), &q))
        });

        // после удаления последней записи на странице остаёмся на существующей
        Effect::new(move |_| {
            let total = page.with(|p| p.total_pages);
            let current = query.with_untracked(|q| q.page);
            if total > 0 && current > total {
                query.update(|q| q.page = total);
            }
        });

        Self { query, page }
    }

    pub fn toggle_sort(&self, field: &str) {
        self.query.update(|q| q.toggle_sort(field));
    }

    pub fn set_search(&self, term: String) {
        self.query.update(|q| q.set_search(term));
    }

    pub fn set_status(&self, status: String) {
        self.query.update(|q| q.set_status(status));
    }

    pub fn go_to_page(&self, page: usize) {
        self.query.update(|q| q.page = page.max(1));
    }

    pub fn set_page_size(&self, size: usize) {
        self.query.update(|q| q.set_page_size(size));
    }

    pub fn sort_field(&self) -> Signal<Option<String>> {
        let query = self.query;
        Signal::derive(move || query.with(|q| q.sort_field.clone()))
    }

    pub fn sort_direction(&self) -> Signal<SortDirection> {
        let query = self.query;
        Signal::derive(move || query.with(|q| q.sort_direction))
    }

    pub fn search_term(&self) -> Signal<String> {
        let query = self.query;
        Signal::derive(move || query.with(|q| q.search_term.clone()))
    }

    pub fn rows(&self) -> Vec<T> {
        self.page.with(|p| p.rows.clone())
    }

    /// Сортировка по клику на заголовок
    pub fn on_sort(&self) -> Callback<String> {
        let this = *self;
        Callback::new(move |field: String| this.toggle_sort(&field))
    }
}
