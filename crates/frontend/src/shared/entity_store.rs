//! Контейнеры состояния для коллекций с сервера

use std::future::Future;

use contracts::domain::common::{Identified, PaginationMeta};
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::request_seq::RequestSequence;

/// Последняя загруженная коллекция, флаг загрузки, ошибка и пагинация
#[derive(Debug, Clone)]
pub struct EntityState<T> {
    pub items: Vec<T>,
    pub loading: bool,
    pub error: Option<String>,
    pub pagination: Option<PaginationMeta>,
    /// Записей на сервере сверх полученных при последней загрузке
    pub unfetched: usize,
    pub is_loaded: bool,
}

impl<T> Default for EntityState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            pagination: None,
            unfetched: 0,
            is_loaded: false,
        }
    }
}

impl<T: Identified> EntityState<T> {
    pub fn begin_load(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn finish_load(&mut self, items: Vec<T>, pagination: Option<PaginationMeta>) {
        self.unfetched = pagination.map(|p| p.missing_rows(items.len())).unwrap_or(0);
        self.items = items;
        self.pagination = pagination;
        self.loading = false;
        self.error = None;
        self.is_loaded = true;
    }

    /// Ошибка сохраняется, прежние данные остаются на экране
    pub fn fail(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }

    /// Заменить запись с тем же ID или добавить в конец
    pub fn upsert(&mut self, item: T) {
        match self.items.iter().position(|x| x.id() == item.id()) {
            Some(idx) => self.items[idx] = item,
            None => self.items.push(item),
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<T> {
        let idx = self.items.iter().position(|x| x.id() == id)?;
        Some(self.items.remove(idx))
    }

    pub fn find(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|x| x.id() == id)
    }
}

impl<T> EntityState<T> {
    /// Предупреждение для полной выгрузки, когда сервер отдал не всё
    pub fn unfetched_notice(&self) -> Option<String> {
        (self.unfetched > 0).then(|| {
            format!(
                "Сервер вернул не все записи: не загружено {}. Поиск и фильтры работают только по загруженным.",
                self.unfetched
            )
        })
    }
}

/// Реактивный контейнер: сигнал состояния и счётчик запросов.
///
/// `load` не делает повторов: ошибка пишется в `error` и в лог, повтор
/// запускает пользователь.
pub struct EntityStore<T: Send + Sync + 'static> {
    pub state: RwSignal<EntityState<T>>,
    sequence: StoredValue<RequestSequence>,
}

impl<T: Send + Sync + 'static> Clone for EntityStore<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Send + Sync + 'static> Copy for EntityStore<T> {}

impl<T> EntityStore<T>
where
    T: Identified + Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            state: RwSignal::new(EntityState::default()),
            sequence: StoredValue::new(RequestSequence::new()),
        }
    }

    /// Клон счётчика для `on_cleanup`
    pub fn sequence(&self) -> RequestSequence {
        self.sequence.get_value()
    }

    /// Отменить запросы в полёте, когда компонент размонтируется
    pub fn invalidate_on_cleanup(&self) {
        let sequence = self.sequence();
        on_cleanup(move || sequence.invalidate());
    }

    pub fn load<F, Fut>(&self, label: &'static str, fetch: F)
    where
        F: FnOnce() -> Fut + 'static,
        Fut: Future<Output = Result<(Vec<T>, Option<PaginationMeta>), String>> + 'static,
    {
        let sequence = self.sequence();
        let ticket = sequence.next();
        let state = self.state;
        state.update(|s| s.begin_load());

        spawn_local(async move {
            let result = fetch().await;
            if !sequence.is_current(ticket) {
                log::debug!("{}: discarding stale response #{}", label, ticket.number());
                return;
            }
            match result {
                Ok((items, pagination)) => {
                    log::debug!("{}: loaded {} records", label, items.len());
                    state.update(|s| s.finish_load(items, pagination));
                }
                Err(e) => {
                    log::error!("{}: load failed: {}", label, e);
                    state.update(|s| s.fail(e));
                }
            }
        });
    }

    pub fn upsert(&self, item: T) {
        self.state.update(|s| s.upsert(item));
    }

    pub fn remove(&self, id: &str) {
        self.state.update(|s| {
            s.remove(id);
        });
    }

    pub fn set_error(&self, message: String) {
        self.state.update(|s| s.error = Some(message));
    }
}

impl<T> Default for EntityStore<T>
where
    T: Identified + Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: String,
        name: String,
    }

    impl Identified for Row {
        fn id(&self) -> &str {
            &self.id
        }
    }

    fn row(id: &str, name: &str) -> Row {
        Row {
            id: id.into(),
            name: name.into(),
        }
    }

    #[test]
    fn test_load_lifecycle() {
        let mut state = EntityState::<Row>::default();
        state.begin_load();
        assert!(state.loading);

        state.fail("Сервер недоступен".into());
        assert!(!state.loading);
        assert!(!state.is_loaded);
        assert_eq!(state.error.as_deref(), Some("Сервер недоступен"));

        state.begin_load();
        assert!(state.error.is_none());
        state.finish_load(vec![row("1", "Ann")], None);
        assert!(state.is_loaded);
        assert_eq!(state.items.len(), 1);
    }

    #[test]
    fn test_fail_keeps_previous_items() {
        let mut state = EntityState::<Row>::default();
        state.finish_load(vec![row("1", "Ann")], None);
        state.begin_load();
        state.fail("timeout".into());
        assert_eq!(state.items, vec![row("1", "Ann")]);
    }

    #[test]
    fn test_unfetched_rows_survive_local_edits() {
        let mut state = EntityState::<Row>::default();
        let meta = PaginationMeta {
            page: 1,
            limit: 2,
            total: 5,
            total_pages: 3,
        };
        state.finish_load(vec![row("1", "Ann"), row("2", "Bob")], Some(meta));
        assert_eq!(state.unfetched, 3);

        state.remove("1");
        assert_eq!(state.unfetched, 3);
        assert!(state.unfetched_notice().is_some_and(|n| n.contains("не загружено 3")));

        state.finish_load(vec![row("1", "Ann")], None);
        assert_eq!(state.unfetched, 0);
        assert_eq!(state.unfetched_notice(), None);
    }

    #[test]
    fn test_upsert_and_remove() {
        let mut state = EntityState::<Row>::default();
        state.finish_load(vec![row("1", "Ann"), row("2", "Bob")], None);

        state.upsert(row("2", "Bobby"));
        state.upsert(row("3", "Cid"));
        assert_eq!(state.items.len(), 3);
        assert_eq!(state.find("2").map(|r| r.name.as_str()), Some("Bobby"));

        assert_eq!(state.remove("1"), Some(row("1", "Ann")));
        assert_eq!(state.remove("missing"), None);
        let ids: Vec<_> = state.items.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3"]);
    }
}
