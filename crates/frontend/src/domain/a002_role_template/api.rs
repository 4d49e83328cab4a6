use contracts::domain::a002_role_template::aggregate::{AssignRoleDto, RoleTemplate, RoleTemplateDto};
use contracts::domain::common::PaginationMeta;

use crate::shared::api_utils::{decode_page, delete, get_value, send_json, send_no_content, Verb};

const BASE: &str = "/api/role-templates";

pub async fn fetch_role_templates() -> Result<(Vec<RoleTemplate>, Option<PaginationMeta>), String> {
    decode_page(get_value(BASE, "fetch role templates").await?)
}

pub async fn save_role_template(dto: &RoleTemplateDto) -> Result<RoleTemplate, String> {
    match dto.id.as_deref() {
        Some(id) => send_json(Verb::Put, &format!("{}/{}", BASE, id), dto, "update role template").await,
        None => send_json(Verb::Post, BASE, dto, "create role template").await,
    }
}

pub async fn delete_role_template(id: &str) -> Result<(), String> {
    delete(&format!("{}/{}", BASE, id), "delete role template").await
}

/// Назначить шаблон сотрудникам; права сотрудников заменяет сервер
pub async fn assign_role_template(id: &str, dto: &AssignRoleDto) -> Result<(), String> {
    send_no_content(
        Verb::Post,
        &format!("{}/{}/assign", BASE, id),
        dto,
        "assign role template",
    )
    .await
}
