//! Назначение шаблона роли сотрудникам текущего магазина

use std::collections::BTreeSet;

use crate::domain::a001_employee::api as employee_api;
use crate::domain::a002_role_template::api;
use crate::layout::global_context::AppGlobalContext;
use crate::shared::entity_store::EntityStore;
use crate::shared::modal::Modal;
use contracts::domain::a001_employee::aggregate::Employee;
use contracts::domain::a002_role_template::aggregate::{AssignRoleDto, RoleTemplate};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

#[component]
pub fn RoleTemplateAssign(
    template: RoleTemplate,
    on_assigned: Callback<()>,
    on_close: Callback<()>,
) -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let employees = EntityStore::<Employee>::new();
    employees.invalidate_on_cleanup();
    let selected: RwSignal<BTreeSet<String>> = RwSignal::new(BTreeSet::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let busy = RwSignal::new(false);
    let store_id = ctx.store_id_untracked();

    if let Some(store_id) = store_id.clone() {
        employees.load("employees for assignment", move || async move {
            employee_api::fetch_all_employees(&store_id).await
        });
    }

    let template_id = StoredValue::new(template.id.clone());
    let on_assign = move |_| {
        let dto = AssignRoleDto {
            user_ids: selected.get_untracked().into_iter().collect(),
            store_id: ctx.store_id_untracked(),
        };
        if let Err(msg) = dto.validate() {
            set_error.set(Some(msg));
            return;
        }
        let id = template_id.get_value();
        busy.set(true);
        set_error.set(None);
        spawn_local(async move {
            let result = api::assign_role_template(&id, &dto).await;
            busy.set(false);
            match result {
                Ok(()) => {
                    log::info!("Role template {} assigned to {} employees", id, dto.user_ids.len());
                    on_assigned.run(());
                }
                Err(e) => set_error.set(Some(format!("Не удалось назначить шаблон: {}", e))),
            }
        });
    };

    view! {
        <Modal title=format!("Назначить шаблон \"{}\"", template.name) on_close=on_close>
            {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
            {move || employees.state.with(|s| s.error.clone()).map(|e| view! { <div class="alert alert--error">{e}</div> })}
            {move || employees.state.with(|s| s.unfetched_notice()).map(|n| view! { <div class="alert alert--warning">{n}</div> })}

            {if store_id.is_none() {
                view! { <p>"Сначала выберите магазин"</p> }.into_any()
            } else {
                view! {
                    <div class="assign-list">
                        <Show when=move || employees.state.with(|s| s.loading)>
                            <Spinner />
                        </Show>
                        {move || {
                            employees
                                .state
                                .with(|s| s.items.clone())
                                .into_iter()
                                .map(|employee| {
                                    let id = employee.id.clone();
                                    let id_for_change = employee.id.clone();
                                    view! {
                                        <label class="assign-list__item">
                                            <input
                                                type="checkbox"
                                                prop:checked=move || selected.with(|s| s.contains(&id))
                                                on:change=move |ev| {
                                                    let checked = event_target_checked(&ev);
                                                    selected.update(|s| {
                                                        if checked {
                                                            s.insert(id_for_change.clone());
                                                        } else {
                                                            s.remove(&id_for_change);
                                                        }
                                                    });
                                                }
                                            />
                                            {format!(" {} ({})", employee.full_name(), employee.email)}
                                        </label>
                                    }
                                })
                                .collect_view()
                        }}
                    </div>
                }
                    .into_any()
            }}

            <div class="modal-footer">
                <span class="modal-footer__info">
                    {move || format!("Выбрано: {}", selected.with(|s| s.len()))}
                </span>
                <Button
                    appearance=ButtonAppearance::Secondary
                    on_click=move |_| on_close.run(())
                    disabled=busy
                >
                    "Отмена"
                </Button>
                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=on_assign
                    disabled=Signal::derive(move || busy.get() || selected.with(|s| s.is_empty()))
                >
                    {move || if busy.get() { "Назначение..." } else { "Назначить" }}
                </Button>
            </div>
        </Modal>
    }
}
