use super::view_model::{parse_store_ids, EmployeeDetailsViewModel};
use crate::shared::date_utils::to_input_date;
use crate::shared::form_utils::non_empty;
use crate::shared::icons::icon;
use crate::shared::modal::Modal;
use contracts::domain::a001_employee::aggregate::{Employee, EmployeeStatus};
use leptos::prelude::*;
use thaw::*;

#[component]
pub fn EmployeeDetails(
    /// None: новый сотрудник текущего магазина
    employee: Option<Employee>,
    #[prop(into)] store_id: String,
    on_saved: Callback<Employee>,
    on_close: Callback<()>,
) -> impl IntoView {
    let vm = EmployeeDetailsViewModel::new(employee.as_ref(), &store_id);
    vm.load();
    let title = if vm.is_edit_mode() {
        "Редактирование сотрудника"
    } else {
        "Новый сотрудник"
    };

    view! {
        <Modal title=title on_close=on_close>
            <div class="details-form employee-details">
                {move || vm.error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
                <Show when=move || vm.loading.get()>
                    <Spinner />
                </Show>

                <div class="form__row">
                    <div class="form__group">
                        <label for="first_name">"Имя"</label>
                        <input
                            type="text"
                            id="first_name"
                            prop:value=move || vm.form.with(|f| f.first_name.clone())
                            on:input=move |ev| vm.form.update(|f| f.first_name = event_target_value(&ev))
                        />
                    </div>
                    <div class="form__group">
                        <label for="last_name">"Фамилия"</label>
                        <input
                            type="text"
                            id="last_name"
                            prop:value=move || vm.form.with(|f| f.last_name.clone())
                            on:input=move |ev| vm.form.update(|f| f.last_name = event_target_value(&ev))
                        />
                    </div>
                </div>

                <div class="form__row">
                    <div class="form__group">
                        <label for="email">"Email"</label>
                        <input
                            type="email"
                            id="email"
                            prop:value=move || vm.form.with(|f| f.email.clone())
                            on:input=move |ev| vm.form.update(|f| f.email = event_target_value(&ev))
                        />
                    </div>
                    <div class="form__group">
                        <label for="phone">"Телефон"</label>
                        <input
                            type="tel"
                            id="phone"
                            prop:value=move || vm.form.with(|f| f.phone.clone().unwrap_or_default())
                            on:input=move |ev| vm.form.update(|f| f.phone = non_empty(event_target_value(&ev)))
                        />
                    </div>
                </div>

                <div class="form__row">
                    <div class="form__group">
                        <label for="employee_code">"Табельный номер"</label>
                        <input
                            type="text"
                            id="employee_code"
                            prop:value=move || vm.form.with(|f| f.employee_code.clone())
                            on:input=move |ev| vm.form.update(|f| f.employee_code = event_target_value(&ev))
                            placeholder="EMP-001"
                        />
                    </div>
                    <div class="form__group">
                        <label for="status">"Статус"</label>
                        <select
                            id="status"
                            prop:value=move || vm.form.with(|f| f.status.as_str().to_string())
                            on:change=move |ev| {
                                if let Some(status) = EmployeeStatus::from_code(&event_target_value(&ev)) {
                                    vm.form.update(|f| f.status = status);
                                }
                            }
                        >
                            {EmployeeStatus::all()
                                .into_iter()
                                .map(|s| view! { <option value=s.as_str()>{s.display_name()}</option> })
                                .collect_view()}
                        </select>
                    </div>
                </div>

                <div class="form__row">
                    <div class="form__group">
                        <label for="position">"Должность"</label>
                        <input
                            type="text"
                            id="position"
                            prop:value=move || vm.form.with(|f| f.position.clone().unwrap_or_default())
                            on:input=move |ev| vm.form.update(|f| f.position = non_empty(event_target_value(&ev)))
                        />
                    </div>
                    <div class="form__group">
                        <label for="department">"Отдел"</label>
                        <input
                            type="text"
                            id="department"
                            prop:value=move || vm.form.with(|f| f.department.clone().unwrap_or_default())
                            on:input=move |ev| vm.form.update(|f| f.department = non_empty(event_target_value(&ev)))
                        />
                    </div>
                </div>

                <div class="form__row">
                    <div class="form__group">
                        <label for="joining_date">"Дата приёма"</label>
                        <input
                            type="date"
                            id="joining_date"
                            prop:value=move || {
                                vm.form.with(|f| f.joining_date.as_deref().map(to_input_date).unwrap_or_default())
                            }
                            on:change=move |ev| vm.form.update(|f| f.joining_date = non_empty(event_target_value(&ev)))
                        />
                    </div>
                    <div class="form__group">
                        <label for="store_ids">"Магазины (через запятую)"</label>
                        <input
                            type="text"
                            id="store_ids"
                            prop:value=move || vm.form.with(|f| f.store_ids.join(", "))
                            on:change=move |ev| vm.form.update(|f| f.store_ids = parse_store_ids(&event_target_value(&ev)))
                        />
                    </div>
                </div>
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
                    disabled=Signal::derive(move || vm.saving.get() || vm.loading.get())
                >
                    {icon("check")}
                    {move || {
                        if vm.saving.get() {
                            " Сохранение..."
                        } else if vm.is_edit_mode() {
                            " Сохранить"
                        } else {
                            " Создать"
                        }
                    }}
                </Button>
            </div>
        </Modal>
    }
}
