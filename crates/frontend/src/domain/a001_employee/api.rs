use contracts::domain::a001_employee::aggregate::{
    Employee, EmployeeDto, EmployeeListParams, UpdatePermissionsDto, EMPLOYEE_PAGE_LIMIT,
};
use contracts::domain::common::PaginationMeta;
use contracts::shared::permissions::PermissionGrant;

use crate::shared::api_utils::{decode_page, delete, get_json, get_value, send_json, with_query, Verb};

const BASE: &str = "/api/employees";

/// Список сотрудников магазина (страница сервера)
pub async fn fetch_employees(
    params: &EmployeeListParams,
) -> Result<(Vec<Employee>, Option<PaginationMeta>), String> {
    let path = with_query(BASE, params)?;
    decode_page(get_value(&path, "fetch employees").await?)
}

/// Все сотрудники магазина: страницы запрашиваются, пока сервер сообщает о продолжении
pub async fn fetch_all_employees(
    store_id: &str,
) -> Result<(Vec<Employee>, Option<PaginationMeta>), String> {
    let mut params = EmployeeListParams::for_store(store_id, EMPLOYEE_PAGE_LIMIT);
    let mut all = Vec::new();
    loop {
        let (items, meta) = fetch_employees(&params).await?;
        let received = items.len();
        all.extend(items);
        match meta.and_then(|m| m.next_page(all.len())) {
            // пустая страница при total > fetched: дальше не идём
            Some(next) if received > 0 => params.page = next,
            _ => {
                if let Some(missing) = meta.map(|m| m.missing_rows(all.len())).filter(|n| *n > 0) {
                    log::warn!(
                        "fetch employees: store {} reports {} more rows than received ({})",
                        store_id,
                        missing,
                        all.len()
                    );
                }
                return Ok((all, meta));
            }
        }
    }
}

pub async fn fetch_employee(id: &str) -> Result<Employee, String> {
    get_json(&format!("{}/{}", BASE, id), "fetch employee").await
}

pub async fn create_employee(dto: &EmployeeDto) -> Result<Employee, String> {
    send_json(Verb::Post, BASE, dto, "create employee").await
}

pub async fn update_employee(id: &str, dto: &EmployeeDto) -> Result<Employee, String> {
    send_json(Verb::Put, &format!("{}/{}", BASE, id), dto, "update employee").await
}

/// Создание или обновление в зависимости от наличия ID
pub async fn save_employee(dto: &EmployeeDto) -> Result<Employee, String> {
    match dto.id.as_deref() {
        Some(id) => update_employee(id, dto).await,
        None => create_employee(dto).await,
    }
}

pub async fn delete_employee(id: &str) -> Result<(), String> {
    delete(&format!("{}/{}", BASE, id), "delete employee").await
}

/// Полная замена прав сотрудника
pub async fn update_permissions(
    id: &str,
    permissions: Vec<PermissionGrant>,
) -> Result<Employee, String> {
    let body = UpdatePermissionsDto { permissions };
    send_json(
        Verb::Put,
        &format!("{}/{}/permissions", BASE, id),
        &body,
        "update employee permissions",
    )
    .await
}
