use crate::system::auth::storage::{self, CurrentStore};
use leptos::prelude::Effect;
use leptos::prelude::*;
use std::collections::HashMap;
use web_sys::window;

#[derive(Clone, Debug, PartialEq)]
pub struct Tab {
    pub key: String,
    pub title: String,
}

/// Общее состояние приложения: открытые вкладки, сессия и текущий магазин.
///
/// Токен и магазин читаются из localStorage один раз в `load()`, дальше
/// компоненты берут их отсюда, а не из хранилища напрямую.
#[derive(Clone, Copy)]
pub struct AppGlobalContext {
    pub opened: RwSignal<Vec<Tab>>,
    pub active: RwSignal<Option<String>>,
    pub left_open: RwSignal<bool>,
    pub access_token: RwSignal<Option<String>>,
    pub current_store: RwSignal<Option<CurrentStore>>,
}

impl AppGlobalContext {
    pub fn new() -> Self {
        Self {
            opened: RwSignal::new(vec![]),
            active: RwSignal::new(None),
            left_open: RwSignal::new(true),
            access_token: RwSignal::new(None),
            current_store: RwSignal::new(None),
        }
    }

    /// Контекст с сессией и магазином из localStorage
    pub fn load() -> Self {
        let ctx = Self::new();
        ctx.access_token.set(storage::get_access_token());
        let store = storage::get_current_store();
        log::debug!(
            "Session restored: token={}, store={:?}",
            ctx.access_token.with_untracked(|t| t.is_some()),
            store.as_ref().map(|s| s.id.as_str())
        );
        ctx.current_store.set(store);
        ctx
    }

    /// ID текущего магазина без подписки на изменения
    pub fn store_id_untracked(&self) -> Option<String> {
        self.current_store
            .with_untracked(|s| s.as_ref().map(|s| s.id.clone()))
    }

    pub fn select_store(&self, store: CurrentStore) {
        log::info!("Current store -> {}", store.id);
        storage::save_current_store(&store);
        self.current_store.set(Some(store));
    }

    pub fn forget_store(&self) {
        storage::clear_current_store();
        self.current_store.set(None);
    }

    /// Выход: токен, магазин и вкладки сбрасываются
    pub fn clear_session(&self) {
        storage::clear_tokens();
        storage::clear_current_store();
        self.access_token.set(None);
        self.current_store.set(None);
        self.opened.set(vec![]);
        self.active.set(None);
    }

    pub fn init_router_integration(&self) {
        let search = window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        let params: HashMap<String, String> =
            serde_qs::from_str(search.trim_start_matches('?')).unwrap_or_default();
        if let Some(active_key) = params.get("active").cloned() {
            let title = crate::layout::tabs::tab_label_for_key(&active_key).to_string();
            self.open_tab(&active_key, &title);
        }

        let this = *self;
        Effect::new(move |_| {
            let Some(active_key) = this.active.get() else {
                return;
            };
            let query_string =
                serde_qs::to_string(&HashMap::from([("active".to_string(), active_key)]))
                    .unwrap_or_default();
            let new_url = format!("?{}", query_string);

            let current_search = window()
                .and_then(|w| w.location().search().ok())
                .unwrap_or_default();
            if current_search != new_url {
                if let Some(history) = window().and_then(|w| w.history().ok()) {
                    let _ = history.replace_state_with_url(
                        &wasm_bindgen::JsValue::NULL,
                        "",
                        Some(&new_url),
                    );
                }
            }
        });
    }

    pub fn open_tab(&self, key: &str, title: &str) {
        log::debug!("open_tab: key='{}', title='{}'", key, title);
        let exists = self
            .opened
            .with_untracked(|tabs| tabs.iter().any(|tab| tab.key == key));
        if !exists {
            self.opened.update(|tabs| {
                tabs.push(Tab {
                    key: key.to_string(),
                    title: title.to_string(),
                })
            });
        }
        self.activate_tab(key);
    }

    pub fn activate_tab(&self, key: &str) {
        self.active.set(Some(key.to_string()));
    }

    pub fn update_tab_title(&self, key: &str, new_title: &str) {
        self.opened.update(|tabs| {
            if let Some(tab) = tabs.iter_mut().find(|t| t.key == key) {
                tab.title = new_title.to_string();
            }
        });
    }

    pub fn close_tab(&self, key: &str) {
        log::debug!("close_tab: key='{}'", key);
        let next = self.opened.with_untracked(|tabs| {
            self.active
                .with_untracked(|active| next_active_after_close(tabs, active.as_deref(), key))
        });
        self.opened.update(|tabs| tabs.retain(|tab| tab.key != key));
        self.active.set(next);
    }

    pub fn toggle_left(&self) {
        self.left_open.update(|val| *val = !*val);
    }
}

impl Default for AppGlobalContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Какая вкладка станет активной после закрытия `closed`.
/// Закрытие неактивной вкладки активную не меняет; иначе берётся последняя оставшаяся.
pub fn next_active_after_close(tabs: &[Tab], active: Option<&str>, closed: &str) -> Option<String> {
    if active != Some(closed) {
        return active.map(str::to_string);
    }
    tabs.iter()
        .rev()
        .find(|t| t.key != closed)
        .map(|t| t.key.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tabs(keys: &[&str]) -> Vec<Tab> {
        keys.iter()
            .map(|k| Tab {
                key: k.to_string(),
                title: k.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_next_active_after_close() {
        let opened = tabs(&["a", "b", "c"]);
        assert_eq!(next_active_after_close(&opened, Some("c"), "c"), Some("b".into()));
        assert_eq!(next_active_after_close(&opened, Some("a"), "c"), Some("a".into()));
        assert_eq!(next_active_after_close(&opened, None, "b"), None);
        assert_eq!(next_active_after_close(&tabs(&["a"]), Some("a"), "a"), None);
    }
}
