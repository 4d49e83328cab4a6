use serde::{Deserialize, Serialize};

use crate::domain::common::{null_as_default, Identified};
use crate::shared::list_view::{FieldMap, Listable, SortKey};
use crate::shared::permissions::{total_actions, PermissionGrant};
use crate::shared::validation::{is_valid_email, is_valid_phone, optional, required};

// ============================================================================
// Status
// ============================================================================

/// Статус сотрудника
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    #[default]
    Active,
    Inactive,
    Suspended,
}

impl EmployeeStatus {
    /// Значение в API
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeStatus::Active => "active",
            EmployeeStatus::Inactive => "inactive",
            EmployeeStatus::Suspended => "suspended",
        }
    }

    /// Получить человекочитаемое название
    pub fn display_name(&self) -> &'static str {
        match self {
            EmployeeStatus::Active => "Работает",
            EmployeeStatus::Inactive => "Не активен",
            EmployeeStatus::Suspended => "Отстранён",
        }
    }

    pub fn all() -> Vec<EmployeeStatus> {
        vec![
            EmployeeStatus::Active,
            EmployeeStatus::Inactive,
            EmployeeStatus::Suspended,
        ]
    }

    /// Парсинг из строки
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "active" => Some(EmployeeStatus::Active),
            "inactive" => Some(EmployeeStatus::Inactive),
            "suspended" => Some(EmployeeStatus::Suspended),
            _ => None,
        }
    }
}

// ============================================================================
// Record
// ============================================================================

/// Сотрудник магазина
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(alias = "_id")]
    pub id: String,

    pub first_name: String,
    #[serde(default)]
    pub last_name: String,

    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub employee_code: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub status: EmployeeStatus,
    #[serde(default)]
    pub joining_date: Option<String>,

    /// Выданные права, в порядке выдачи
    #[serde(default, deserialize_with = "null_as_default")]
    pub permissions: Vec<PermissionGrant>,

    /// Магазины, в которых работает сотрудник
    #[serde(default, deserialize_with = "null_as_default")]
    pub store_ids: Vec<String>,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Сколько действий выдано по всем ресурсам (для "6 прав" в таблице)
    pub fn permission_count(&self) -> usize {
        total_actions(&self.permissions)
    }

    /// Привязан ли сотрудник к магазину
    pub fn works_in(&self, store_id: &str) -> bool {
        self.store_ids.iter().any(|s| s == store_id)
    }
}

impl Identified for Employee {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Listable for Employee {
    fn list_fields() -> FieldMap<Self> {
        FieldMap::<Self>::new()
            .search("firstName", |e| Some(e.first_name.as_str()))
            .search("lastName", |e| Some(e.last_name.as_str()))
            .search("email", |e| Some(e.email.as_str()))
            .search("employeeCode", |e| Some(e.employee_code.as_str()))
            .search("position", |e| e.position.as_deref())
            .search("department", |e| e.department.as_deref())
            .search("phone", |e| e.phone.as_deref())
            .status(|e| Some(e.status.as_str()))
            .sort("firstName", |e| SortKey::text(&e.first_name))
            .sort("lastName", |e| SortKey::text(&e.last_name))
            .sort("email", |e| SortKey::text(&e.email))
            .sort("employeeCode", |e| SortKey::text(&e.employee_code))
            .sort("position", |e| SortKey::opt_text(e.position.as_deref()))
            .sort("department", |e| SortKey::opt_text(e.department.as_deref()))
            .sort("status", |e| SortKey::text(e.status.as_str()))
            .sort("joiningDate", |e| SortKey::date(e.joining_date.as_deref()))
            .sort("permissions", |e| SortKey::Number(e.permission_count() as f64))
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO для создания/обновления сотрудника; он же черновик формы
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub employee_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    pub status: EmployeeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub joining_date: Option<String>,
    pub permissions: Vec<PermissionGrant>,
    pub store_ids: Vec<String>,
}

impl EmployeeDto {
    /// Новый сотрудник, сразу привязанный к текущему магазину
    pub fn new_for_store(store_id: &str) -> Self {
        Self {
            store_ids: vec![store_id.to_string()],
            ..Self::default()
        }
    }

    pub fn from_employee(employee: &Employee) -> Self {
        Self {
            id: Some(employee.id.clone()),
            first_name: employee.first_name.clone(),
            last_name: employee.last_name.clone(),
            email: employee.email.clone(),
            phone: employee.phone.clone(),
            employee_code: employee.employee_code.clone(),
            position: employee.position.clone(),
            department: employee.department.clone(),
            status: employee.status,
            joining_date: employee.joining_date.clone(),
            permissions: employee.permissions.clone(),
            store_ids: employee.store_ids.clone(),
        }
    }

    /// Валидация данных
    pub fn validate(&self) -> Result<(), String> {
        required(&self.first_name, "Имя")?;
        required(&self.last_name, "Фамилия")?;
        required(&self.email, "Email")?;
        if !is_valid_email(&self.email) {
            return Err("Некорректный email".into());
        }
        optional(self.phone.as_deref(), is_valid_phone, "Некорректный номер телефона")?;
        if self.store_ids.is_empty() {
            return Err("Сотрудник должен быть привязан хотя бы к одному магазину".into());
        }
        Ok(())
    }
}

/// Замена прав сотрудника целиком
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdatePermissionsDto {
    pub permissions: Vec<PermissionGrant>,
}

/// Параметры запроса списка сотрудников
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeListParams {
    pub page: usize,
    pub limit: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,
}

/// Размер страницы при выгрузке всех сотрудников магазина
pub const EMPLOYEE_PAGE_LIMIT: usize = 500;

impl EmployeeListParams {
    pub fn for_store(store_id: &str, limit: usize) -> Self {
        Self {
            page: 1,
            limit,
            store_id: Some(store_id.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::list_view::{derive_listable, ListQuery, SortDirection};
    use serde_json::json;

    fn employee(id: &str, first: &str, last: &str, status: EmployeeStatus) -> Employee {
        Employee {
            id: id.into(),
            first_name: first.into(),
            last_name: last.into(),
            email: format!("{}@shop.io", first.to_lowercase()),
            phone: None,
            employee_code: format!("EMP-{}", id),
            position: Some("Cashier".into()),
            department: None,
            status,
            joining_date: None,
            permissions: vec![],
            store_ids: vec!["s1".into()],
        }
    }

    #[test]
    fn test_deserialize_tolerates_missing_and_null() {
        let e: Employee = serde_json::from_value(json!({
            "_id": "64f0",
            "firstName": "Ann",
            "lastName": "Lee",
            "email": "ann@shop.io",
            "status": "suspended",
            "permissions": null,
            "storeIds": null
        }))
        .unwrap();
        assert_eq!(e.id, "64f0");
        assert_eq!(e.status, EmployeeStatus::Suspended);
        assert!(e.permissions.is_empty());
        assert!(e.store_ids.is_empty());
        assert_eq!(e.permission_count(), 0);
        assert_eq!(e.full_name(), "Ann Lee");
    }

    #[test]
    fn test_works_in() {
        let mut e = employee("1", "Ann", "Lee", EmployeeStatus::Active);
        assert!(e.works_in("s1"));
        assert!(!e.works_in("s2"));
        e.store_ids.clear();
        assert!(!e.works_in("s1"));
    }

    #[test]
    fn test_permission_count() {
        let e: Employee = serde_json::from_value(json!({
            "id": "1",
            "firstName": "Bob",
            "permissions": [
                {"resource": "sales", "actions": ["read", "create"], "storeId": "s1"},
                {"resource": "returns", "actions": ["read", "create", "update", "delete"], "storeId": "s1"}
            ]
        }))
        .unwrap();
        assert_eq!(e.permission_count(), 6);
    }

    #[test]
    fn test_list_view_search_and_status() {
        let records = vec![
            employee("1", "Ann", "Lee", EmployeeStatus::Active),
            employee("2", "Bob", "Stone", EmployeeStatus::Inactive),
            employee("3", "Dana", "Ward", EmployeeStatus::Active),
        ];

        let query = ListQuery {
            search_term: "an".into(),
            status_filter: "All Status".into(),
            ..ListQuery::default()
        };
        let page = derive_listable(Some(&records), &query);
        let ids: Vec<&str> = page.rows.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);

        let query = ListQuery {
            search_term: "emp-2".into(),
            status_filter: "active".into(),
            ..ListQuery::default()
        };
        assert_eq!(derive_listable(Some(&records), &query).total_filtered, 0);

        let query = ListQuery::sorted_by("lastName", SortDirection::Desc);
        let page = derive_listable(Some(&records), &query);
        let ids: Vec<&str> = page.rows.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "2", "1"]);
    }

    #[test]
    fn test_dto_validation() {
        let mut dto = EmployeeDto::new_for_store("s1");
        assert!(dto.validate().is_err());

        dto.first_name = "Ann".into();
        dto.last_name = "Lee".into();
        dto.email = "ann@shop".into();
        assert_eq!(dto.validate(), Err("Некорректный email".to_string()));

        dto.email = "ann@shop.io".into();
        dto.phone = Some("123".into());
        assert!(dto.validate().is_err());

        dto.phone = Some("+1 555 123 4567".into());
        assert!(dto.validate().is_ok());

        dto.store_ids.clear();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_dto_serialization_skips_empty_id() {
        let dto = EmployeeDto::new_for_store("s1");
        let value = serde_json::to_value(&dto).unwrap();
        assert!(value.get("id").is_none());
        assert_eq!(value["storeIds"], json!(["s1"]));
        assert_eq!(value["status"], json!("active"));
    }
}
