use super::view_model::{RoleTemplateDetailsViewModel, TEMPLATE_SCOPE};
use crate::shared::components::permission_editor::PermissionEditor;
use crate::shared::form_utils::non_empty;
use crate::shared::icons::icon;
use crate::shared::modal::Modal;
use contracts::domain::a002_role_template::aggregate::RoleTemplate;
use leptos::prelude::*;
use thaw::*;

#[component]
pub fn RoleTemplateDetails(
    template: Option<RoleTemplate>,
    on_saved: Callback<RoleTemplate>,
    on_close: Callback<()>,
) -> impl IntoView {
    let vm = RoleTemplateDetailsViewModel::new(template.as_ref());
    let title = if vm.is_edit_mode() {
        "Редактирование шаблона роли"
    } else {
        "Новый шаблон роли"
    };

    view! {
        <Modal title=title on_close=on_close>
            <div class="details-form role-template-details">
                {move || vm.error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

                <div class="form__group">
                    <label for="name">"Название"</label>
                    <input
                        type="text"
                        id="name"
                        prop:value=move || vm.form.with(|f| f.name.clone())
                        on:input=move |ev| vm.form.update(|f| f.name = event_target_value(&ev))
                    />
                </div>

                <div class="form__group">
                    <label for="description">"Описание"</label>
                    <textarea
                        id="description"
                        rows="2"
                        prop:value=move || vm.form.with(|f| f.description.clone().unwrap_or_default())
                        on:input=move |ev| vm.form.update(|f| f.description = non_empty(event_target_value(&ev)))
                    />
                </div>

                <div class="form__row">
                    <div class="form__group">
                        <label for="priority">"Приоритет"</label>
                        <input
                            type="number"
                            id="priority"
                            min="0"
                            prop:value=move || vm.form.with(|f| f.priority.to_string())
                            on:input=move |ev| {
                                if let Ok(priority) = event_target_value(&ev).trim().parse::<i32>() {
                                    vm.form.update(|f| f.priority = priority);
                                }
                            }
                        />
                    </div>
                    <label class="form__checkbox">
                        <input
                            type="checkbox"
                            prop:checked=move || vm.form.with(|f| f.is_default)
                            on:change=move |ev| vm.form.update(|f| f.is_default = event_target_checked(&ev))
                        />
                        " По умолчанию"
                    </label>
                    <label class="form__checkbox">
                        <input
                            type="checkbox"
                            prop:checked=move || vm.form.with(|f| f.is_active)
                            on:change=move |ev| vm.form.update(|f| f.is_active = event_target_checked(&ev))
                        />
                        " Активен"
                    </label>
                </div>

                <h4 class="details-form__section">"Права"</h4>
                <PermissionEditor draft=vm.permissions store_id=TEMPLATE_SCOPE disabled=vm.saving />
            </div>

            <div class="modal-footer">
                <Button
                    appearance=ButtonAppearance::Secondary
                    on_click=move |_| on_close.run(())
                    disabled=vm.saving
                >
                    "Отмена"
                </Button>
                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=move |_| vm.save_command(on_saved)
                    disabled=vm.saving
                >
                    {icon("check")}
                    {move || if vm.saving.get() { " Сохранение..." } else { " Сохранить" }}
                </Button>
            </div>
        </Modal>
    }
}
