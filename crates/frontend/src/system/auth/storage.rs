//! Состояние клиента в localStorage: токен доступа и выбранный магазин

use serde::{Deserialize, Serialize};
use web_sys::window;

const ACCESS_TOKEN_KEY: &str = "auth_access_token";
const REFRESH_TOKEN_KEY: &str = "auth_refresh_token";
const CURRENT_STORE_KEY: &str = "current_store";

/// Магазин, в контексте которого работает пользователь
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentStore {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl CurrentStore {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.trim().to_string(),
            name: name.trim().to_string(),
        }
    }

    /// Название для шапки; без названия показываем ID
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

fn get_local_storage() -> Option<web_sys::Storage> {
    window()?.local_storage().ok()?
}

/// Get access token from localStorage
pub fn get_access_token() -> Option<String> {
    get_local_storage()?
        .get_item(ACCESS_TOKEN_KEY)
        .ok()?
        .filter(|t| !t.trim().is_empty())
}

/// Clear all authentication tokens
pub fn clear_tokens() {
    if let Some(storage) = get_local_storage() {
        let _ = storage.remove_item(ACCESS_TOKEN_KEY);
        let _ = storage.remove_item(REFRESH_TOKEN_KEY);
    }
}

/// Разбор сохранённого магазина. Старые клиенты хранили только ID строкой.
pub fn parse_current_store(raw: &str) -> Option<CurrentStore> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match serde_json::from_str::<CurrentStore>(raw) {
        Ok(store) if !store.id.trim().is_empty() => Some(store),
        Ok(_) => None,
        Err(_) if !raw.starts_with('{') => Some(CurrentStore::new(raw.trim_matches('"'), "")),
        Err(e) => {
            log::warn!("Ignoring malformed current store in localStorage: {}", e);
            None
        }
    }
}

pub fn get_current_store() -> Option<CurrentStore> {
    let raw = get_local_storage()?.get_item(CURRENT_STORE_KEY).ok()??;
    parse_current_store(&raw)
}

pub fn save_current_store(store: &CurrentStore) {
    if let Some(storage) = get_local_storage() {
        match serde_json::to_string(store) {
            Ok(raw) => {
                let _ = storage.set_item(CURRENT_STORE_KEY, &raw);
            }
            Err(e) => log::error!("Failed to serialize current store: {}", e),
        }
    }
}

pub fn clear_current_store() {
    if let Some(storage) = get_local_storage() {
        let _ = storage.remove_item(CURRENT_STORE_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_current_store() {
        assert_eq!(
            parse_current_store(r#"{"id":"s1","name":"Main"}"#),
            Some(CurrentStore::new("s1", "Main"))
        );
        assert_eq!(parse_current_store("s2"), Some(CurrentStore::new("s2", "")));
        assert_eq!(parse_current_store(r#""s3""#), Some(CurrentStore::new("s3", "")));
        assert_eq!(parse_current_store(""), None);
        assert_eq!(parse_current_store(r#"{"id":""}"#), None);
        assert_eq!(parse_current_store("{broken"), None);
    }

    #[test]
    fn test_label_falls_back_to_id() {
        assert_eq!(CurrentStore::new("s1", "").label(), "s1");
        assert_eq!(CurrentStore::new("s1", " Main ").label(), "Main");
    }
}
