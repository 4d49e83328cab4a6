//! Модальное окно прав сотрудника в текущем магазине

use crate::domain::a001_employee::api;
use crate::shared::components::permission_editor::PermissionEditor;
use crate::shared::modal::Modal;
use contracts::domain::a001_employee::aggregate::Employee;
use contracts::shared::permissions::{duplicate_scopes, PermissionDraft};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

#[component]
pub fn EmployeePermissions(
    employee: Employee,
    #[prop(into)] store_id: String,
    on_saved: Callback<Employee>,
    on_close: Callback<()>,
) -> impl IntoView {
    for (resource, scope) in duplicate_scopes(&employee.permissions) {
        log::warn!(
            "Employee {}: duplicate grants for {} in {}, merging",
            employee.id,
            resource,
            scope
        );
    }

    let draft = RwSignal::new(PermissionDraft::from_grants(&employee.permissions));
    let (error, set_error) = signal::<Option<String>>(None);
    let saving = RwSignal::new(false);
    let employee_id = StoredValue::new(employee.id.clone());
    let title = format!("Права: {}", employee.full_name());

    let on_save = move |_| {
        let grants = draft.get_untracked().into_grants();
        let id = employee_id.get_value();
        saving.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::update_permissions(&id, grants).await {
                Ok(updated) => {
                    saving.set(false);
                    on_saved.run(updated);
                }
                Err(e) => {
                    saving.set(false);
                    set_error.set(Some(format!("Не удалось сохранить права: {}", e)));
                }
            }
        });
    };

    view! {
        <Modal title=title on_close=on_close>
            {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
            <PermissionEditor draft=draft store_id=store_id disabled=saving />
            <div class="modal-footer">
                <Button
                    appearance=ButtonAppearance::Secondary
                    on_click=move |_| on_close.run(())
                    disabled=saving
                >
                    "Отмена"
                </Button>
                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=on_save
                    disabled=saving
                >
                    {move || if saving.get() { "Сохранение..." } else { "Сохранить" }}
                </Button>
            </div>
        </Modal>
    }
}
