use serde::{Deserialize, Serialize};

use crate::domain::common::{null_as_default, Identified};
use crate::shared::list_view::{FieldMap, Listable, SortKey};
use crate::shared::permissions::{canonicalize, total_actions, PermissionGrant};
use crate::shared::validation::required;

/// Шаблон роли: именованный набор прав, назначаемый нескольким сотрудникам
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleTemplate {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,

    /// Права в едином формате; старая форма `{resource, action, scope}`
    /// приводится к нему при разборе
    #[serde(default, deserialize_with = "null_as_default")]
    pub permissions: Vec<PermissionGrant>,

    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl RoleTemplate {
    /// Статус для фильтра списка
    pub fn status_label(&self) -> &'static str {
        if self.is_active {
            "active"
        } else {
            "inactive"
        }
    }

    pub fn permission_count(&self) -> usize {
        total_actions(&self.permissions)
    }

    /// Права, собранные по (resource, storeId): в старом формате одна
    /// запись на каждое действие
    pub fn grouped_permissions(&self) -> Vec<PermissionGrant> {
        canonicalize(self.permissions.clone())
    }
}

impl Identified for RoleTemplate {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Listable for RoleTemplate {
    fn list_fields() -> FieldMap<Self> {
        FieldMap::<Self>::new()
            .search("name", |r| Some(r.name.as_str()))
            .search("description", |r| r.description.as_deref())
            .status(|r| Some(r.status_label()))
            .sort("name", |r| SortKey::text(&r.name))
            .sort("priority", |r| SortKey::Number(r.priority as f64))
            .sort("isDefault", |r| SortKey::Flag(r.is_default))
            .sort("isActive", |r| SortKey::Flag(r.is_active))
            .sort("permissions", |r| SortKey::Number(r.permission_count() as f64))
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO для создания/обновления шаблона роли
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleTemplateDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub permissions: Vec<PermissionGrant>,
    pub is_default: bool,
    pub priority: i32,
    pub is_active: bool,
}

impl Default for RoleTemplateDto {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            description: None,
            permissions: Vec::new(),
            is_default: false,
            priority: 0,
            is_active: true,
        }
    }
}

impl RoleTemplateDto {
    pub fn from_template(template: &RoleTemplate) -> Self {
        Self {
            id: Some(template.id.clone()),
            name: template.name.clone(),
            description: template.description.clone(),
            permissions: template.grouped_permissions(),
            is_default: template.is_default,
            priority: template.priority,
            is_active: template.is_active,
        }
    }

    /// Валидация данных
    pub fn validate(&self) -> Result<(), String> {
        required(&self.name, "Название")?;
        if self.priority < 0 {
            return Err("Приоритет не может быть отрицательным".into());
        }
        if total_actions(&self.permissions) == 0 {
            return Err("Шаблон должен содержать хотя бы одно право".into());
        }
        Ok(())
    }
}

/// Назначение шаблона сотрудникам
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRoleDto {
    pub user_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,
}

impl AssignRoleDto {
    pub fn validate(&self) -> Result<(), String> {
        if self.user_ids.is_empty() {
            return Err("Выберите хотя бы одного сотрудника".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::list_view::{derive_listable, ListQuery, SortDirection};
    use serde_json::json;

    fn templates() -> Vec<RoleTemplate> {
        serde_json::from_value(json!([
            {"id": "r1", "name": "Cashier", "priority": 2, "isDefault": true,
             "permissions": [
                {"resource": "sales", "action": "create", "scope": "store"},
                {"resource": "sales", "action": "read", "scope": "store"}
             ]},
            {"id": "r2", "name": "Manager", "description": "Store manager", "priority": 10,
             "permissions": [{"resource": "employees", "actions": ["read", "update"], "storeId": "store"}]},
            {"id": "r3", "name": "Auditor", "priority": 5, "isActive": false, "permissions": null}
        ]))
        .unwrap()
    }

    #[test]
    fn test_legacy_permissions_are_grouped() {
        let all = templates();
        assert_eq!(all[0].permission_count(), 2);
        let grouped = all[0].grouped_permissions();
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].resource, "sales");
        assert_eq!(grouped[0].actions.len(), 2);
        assert!(all[2].permissions.is_empty());
        assert!(all[1].is_active);
    }

    #[test]
    fn test_status_filter_and_priority_sort() {
        let all = templates();
        let query = ListQuery {
            status_filter: "inactive".into(),
            ..ListQuery::default()
        };
        let page = derive_listable(Some(&all), &query);
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0].id, "r3");

        let page = derive_listable(Some(&all), &ListQuery::sorted_by("priority", SortDirection::Desc));
        let ids: Vec<&str> = page.rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r2", "r3", "r1"]);

        let query = ListQuery {
            search_term: "store".into(),
            ..ListQuery::default()
        };
        assert_eq!(derive_listable(Some(&all), &query).rows[0].id, "r2");
    }

    #[test]
    fn test_dto_validation() {
        let all = templates();
        let dto = RoleTemplateDto::from_template(&all[0]);
        assert!(dto.validate().is_ok());

        let empty = RoleTemplateDto {
            name: "Empty".into(),
            ..RoleTemplateDto::default()
        };
        assert!(empty.validate().is_err());

        assert!(AssignRoleDto { user_ids: vec![], store_id: None }.validate().is_err());
    }
}
