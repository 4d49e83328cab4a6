//! Права доступа: единый формат выдачи прав (resource, actions, storeId).
//!
//! Сотрудники и шаблоны ролей исторически присылают права в разной форме:
//! `{resource, actions: [...], storeId}` и `{resource, action, scope}`.
//! Обе формы читаются в [`PermissionGrant`]; наружу уходит только первая.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeSet, HashSet};

/// Ресурсы, на которые выдаются права: (код, подпись)
pub const RESOURCES: &[(&str, &str)] = &[
    ("employees", "Сотрудники"),
    ("roles", "Роли"),
    ("sales", "Продажи"),
    ("invoices", "Счета"),
    ("returns", "Возвраты"),
    ("order_tracking", "Отслеживание заказов"),
    ("business_profile", "Профиль компании"),
];

/// Действия над ресурсом: (код, подпись)
pub const ACTIONS: &[(&str, &str)] = &[
    ("create", "Создание"),
    ("read", "Просмотр"),
    ("update", "Изменение"),
    ("delete", "Удаление"),
];

/// Выдача прав на ресурс в рамках магазина
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "GrantWire")]
pub struct PermissionGrant {
    pub resource: String,
    pub actions: BTreeSet<String>,
    pub store_id: String,
}

impl PermissionGrant {
    pub fn new(resource: &str, store_id: &str) -> Self {
        Self {
            resource: resource.to_string(),
            actions: BTreeSet::new(),
            store_id: store_id.to_string(),
        }
    }

    pub fn with_actions<'a>(mut self, actions: impl IntoIterator<Item = &'a str>) -> Self {
        self.actions.extend(actions.into_iter().map(str::to_string));
        self
    }

    fn same_scope(&self, resource: &str, store_id: &str) -> bool {
        self.resource == resource && self.store_id == store_id
    }
}

/// Обе формы, в которых права приходят с сервера
#[derive(Deserialize)]
#[serde(untagged)]
enum GrantWire {
    // Форма шаблонов ролей: одно действие, область вместо магазина
    Single {
        resource: String,
        action: String,
        #[serde(default)]
        scope: String,
    },
    Multi {
        resource: String,
        #[serde(default)]
        actions: Vec<String>,
        #[serde(default, rename = "storeId", alias = "store_id")]
        store_id: String,
    },
}

impl From<GrantWire> for PermissionGrant {
    fn from(wire: GrantWire) -> Self {
        match wire {
            GrantWire::Single { resource, action, scope } => Self {
                resource,
                actions: BTreeSet::from([action]),
                store_id: scope,
            },
            GrantWire::Multi { resource, actions, store_id } => Self {
                resource,
                actions: actions.into_iter().collect(),
                store_id,
            },
        }
    }
}

/// Количество выданных действий по "сырому" значению поля `permissions`.
///
/// Отсутствующее значение, `null`, не-массив и пустой массив дают 0;
/// записи без `actions` вносят 0.
pub fn permission_count(value: Option<&Value>) -> usize {
    match value {
        Some(Value::Array(grants)) => grants
            .iter()
            .map(|grant| {
                grant
                    .get("actions")
                    .and_then(Value::as_array)
                    .map(Vec::len)
                    .unwrap_or(0)
            })
            .sum(),
        _ => 0,
    }
}

/// Количество выданных действий по всем ресурсам
pub fn total_actions(grants: &[PermissionGrant]) -> usize {
    grants.iter().map(|g| g.actions.len()).sum()
}

/// Объединяет записи с одинаковыми (resource, storeId) и убирает пустые.
/// Порядок по первому появлению.
pub fn canonicalize(grants: Vec<PermissionGrant>) -> Vec<PermissionGrant> {
    let mut result: Vec<PermissionGrant> = Vec::with_capacity(grants.len());
    for grant in grants {
        match result
            .iter_mut()
            .find(|g| g.same_scope(&grant.resource, &grant.store_id))
        {
            Some(existing) => existing.actions.extend(grant.actions),
            None => result.push(grant),
        }
    }
    result.retain(|g| !g.actions.is_empty());
    result
}

/// Повторяющиеся пары (resource, storeId), каждая один раз
pub fn duplicate_scopes(grants: &[PermissionGrant]) -> Vec<(String, String)> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut duplicates = Vec::new();
    for grant in grants {
        let key = (grant.resource.clone(), grant.store_id.clone());
        if !seen.insert(key.clone()) && reported.insert(key.clone()) {
            duplicates.push(key);
        }
    }
    duplicates
}

/// Черновик прав для редактора с чекбоксами
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PermissionDraft {
    grants: Vec<PermissionGrant>,
}

impl PermissionDraft {
    pub fn from_grants(grants: &[PermissionGrant]) -> Self {
        Self {
            grants: canonicalize(grants.to_vec()),
        }
    }

    pub fn has(&self, resource: &str, store_id: &str, action: &str) -> bool {
        self.grants
            .iter()
            .any(|g| g.same_scope(resource, store_id) && g.actions.contains(action))
    }

    pub fn toggle(&mut self, resource: &str, store_id: &str, action: &str, enabled: bool) {
        let idx = match self.grants.iter().position(|g| g.same_scope(resource, store_id)) {
            Some(idx) => idx,
            None if enabled => {
                self.grants.push(PermissionGrant::new(resource, store_id));
                self.grants.len() - 1
            }
            None => return,
        };
        let grant = &mut self.grants[idx];
        if enabled {
            grant.actions.insert(action.to_string());
        } else {
            grant.actions.remove(action);
        }
    }

    /// Выдать все действия ресурса или снять их
    pub fn set_all(&mut self, resource: &str, store_id: &str, enabled: bool) {
        for (action, _) in ACTIONS {
            self.toggle(resource, store_id, action, enabled);
        }
    }

    pub fn count(&self) -> usize {
        total_actions(&self.grants)
    }

    pub fn grants(&self) -> &[PermissionGrant] {
        &self.grants
    }

    pub fn into_grants(self) -> Vec<PermissionGrant> {
        canonicalize(self.grants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_permission_count_defaults_to_zero() {
        assert_eq!(permission_count(None), 0);
        assert_eq!(permission_count(Some(&Value::Null)), 0);
        assert_eq!(permission_count(Some(&json!("not an array"))), 0);
        assert_eq!(permission_count(Some(&json!([]))), 0);
        assert_eq!(permission_count(Some(&json!({"actions": ["read"]}))), 0);
    }

    #[test]
    fn test_permission_count_sums_actions() {
        let value = json!([
            {"resource": "sales", "actions": ["read", "create"], "storeId": "s1"},
            {"resource": "employees", "storeId": "s1"},
            {"resource": "returns", "actions": ["read", "update", "delete", "create"], "storeId": "s2"},
            "garbage",
            {"resource": "roles", "actions": null}
        ]);
        assert_eq!(permission_count(Some(&value)), 6);
    }

    #[test]
    fn test_both_wire_shapes_deserialize() {
        let grants: Vec<PermissionGrant> = serde_json::from_value(json!([
            {"resource": "sales", "actions": ["read", "create"], "storeId": "s1"},
            {"resource": "roles", "action": "read", "scope": "all"},
            {"resource": "returns"}
        ]))
        .unwrap();

        assert_eq!(grants[0], PermissionGrant::new("sales", "s1").with_actions(["create", "read"]));
        assert_eq!(grants[1], PermissionGrant::new("roles", "all").with_actions(["read"]));
        assert!(grants[2].actions.is_empty());
        assert_eq!(total_actions(&grants), 3);

        let out = serde_json::to_value(&grants[1]).unwrap();
        assert_eq!(out, json!({"resource": "roles", "actions": ["read"], "storeId": "all"}));
    }

    #[test]
    fn test_canonicalize_merges_scopes() {
        let grants = vec![
            PermissionGrant::new("roles", "all").with_actions(["read"]),
            PermissionGrant::new("sales", "s1").with_actions(["read"]),
            PermissionGrant::new("roles", "all").with_actions(["update"]),
            PermissionGrant::new("returns", "s1"),
        ];
        assert_eq!(duplicate_scopes(&grants), vec![("roles".to_string(), "all".to_string())]);

        let merged = canonicalize(grants);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0], PermissionGrant::new("roles", "all").with_actions(["read", "update"]));
        assert!(duplicate_scopes(&merged).is_empty());
    }

    #[test]
    fn test_draft_toggle() {
        let mut draft = PermissionDraft::from_grants(&[PermissionGrant::new("sales", "s1").with_actions(["read"])]);
        draft.toggle("sales", "s1", "create", true);
        draft.toggle("sales", "s2", "read", true);
        draft.toggle("employees", "s1", "read", false);
        assert!(draft.has("sales", "s1", "create"));
        assert_eq!(draft.count(), 3);

        draft.toggle("sales", "s2", "read", false);
        let grants = draft.into_grants();
        assert_eq!(grants, vec![PermissionGrant::new("sales", "s1").with_actions(["create", "read"])]);
    }

    #[test]
    fn test_draft_set_all() {
        let mut draft = PermissionDraft::default();
        draft.set_all("order_tracking", "s1", true);
        assert_eq!(draft.count(), ACTIONS.len());
        draft.set_all("order_tracking", "s1", false);
        assert!(draft.into_grants().is_empty());
    }
}
