use crate::domain::a002_role_template::api;
use contracts::domain::a002_role_template::aggregate::{RoleTemplate, RoleTemplateDto};
use contracts::shared::permissions::{duplicate_scopes, PermissionDraft};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Область прав в шаблоне. Шаблон не привязан к магазину: конкретный
/// магазин подставляется при назначении.
pub const TEMPLATE_SCOPE: &str = "store";

#[derive(Clone, Copy)]
pub struct RoleTemplateDetailsViewModel {
    pub form: RwSignal<RoleTemplateDto>,
    /// Права редактируются отдельно и попадают в форму при сохранении
    pub permissions: RwSignal<PermissionDraft>,
    pub error: RwSignal<Option<String>>,
    pub saving: RwSignal<bool>,
}

impl RoleTemplateDetailsViewModel {
    pub fn new(template: Option<&RoleTemplate>) -> Self {
        if let Some(t) = template {
            for (resource, scope) in duplicate_scopes(&t.permissions) {
                log::warn!("Role template {}: duplicate grants for {} in {}", t.id, resource, scope);
            }
        }
        let dto = template.map(RoleTemplateDto::from_template).unwrap_or_default();
        let draft = PermissionDraft::from_grants(&dto.permissions);
        Self {
            form: RwSignal::new(dto),
            permissions: RwSignal::new(draft),
            error: RwSignal::new(None),
            saving: RwSignal::new(false),
        }
    }

    pub fn is_edit_mode(&self) -> bool {
        self.form.with(|f| f.id.is_some())
    }

    pub fn save_command(&self, on_saved: Callback<RoleTemplate>) {
        let mut current = self.form.get_untracked();
        current.permissions = self.permissions.get_untracked().into_grants();
        if let Err(msg) = current.validate() {
            self.error.set(Some(msg));
            return;
        }

        let error = self.error;
        let saving = self.saving;
        error.set(None);
        saving.set(true);
        spawn_local(async move {
            let result = api::save_role_template(&current).await;
            saving.set(false);
            match result {
                Ok(saved) => on_saved.run(saved),
                Err(e) => error.set(Some(format!("Ошибка сохранения: {}", e))),
            }
        });
    }
}
