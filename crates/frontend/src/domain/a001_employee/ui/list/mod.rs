use contracts::domain::a001_employee::aggregate::{Employee, EmployeeStatus};
use contracts::shared::list_view::{ListQuery, SortDirection};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::details::EmployeeDetails;
use super::permissions::EmployeePermissions;
use crate::domain::a001_employee::api;
use crate::layout::global_context::AppGlobalContext;
use crate::shared::components::confirm_dialog::ConfirmDialog;
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::components::status_filter::StatusFilter;
use crate::shared::components::table::SortableHeaderCell;
use crate::shared::date_utils::format_date_opt;
use crate::shared::entity_store::EntityStore;
use crate::shared::icons::icon;
use crate::shared::list_state::ListView;
use crate::shared::list_utils::{highlight_matches, SearchInput};
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;

fn status_badge_class(status: EmployeeStatus) -> &'static str {
    match status {
        EmployeeStatus::Active => "badge badge--success",
        EmployeeStatus::Inactive => "badge badge--neutral",
        EmployeeStatus::Suspended => "badge badge--error",
    }
}

fn status_options() -> Vec<(&'static str, &'static str)> {
    EmployeeStatus::all()
        .into_iter()
        .map(|s| (s.as_str(), s.display_name()))
        .collect()
}

#[component]
pub fn EmployeeList() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let store = EntityStore::<Employee>::new();
    store.invalidate_on_cleanup();
    let list = ListView::new(store, ListQuery::sorted_by("firstName", SortDirection::Asc));

    let show_create = RwSignal::new(false);
    let editing: RwSignal<Option<Employee>> = RwSignal::new(None);
    let permissions_for: RwSignal<Option<Employee>> = RwSignal::new(None);
    let deleting: RwSignal<Option<Employee>> = RwSignal::new(None);
    let delete_busy = RwSignal::new(false);

    let load_data = move || {
        let Some(store_id) = ctx.store_id_untracked() else {
            return;
        };
        // все страницы сервера; дальше список фильтруется и листается на клиенте
        store.load("employees", move || async move { api::fetch_all_employees(&store_id).await });
    };

    // перезагрузка при смене магазина
    Effect::new(move |_| {
        ctx.current_store.track();
        load_data();
    });

    let on_saved = Callback::new(move |employee: Employee| {
        show_create.set(false);
        editing.set(None);
        permissions_for.set(None);
        match ctx.store_id_untracked() {
            Some(store_id) if !employee.works_in(&store_id) => {
                log::info!("Employee {} moved out of store {}", employee.id, store_id);
                store.remove(&employee.id);
            }
            _ => store.upsert(employee),
        }
    });

    let confirm_delete = Callback::new(move |_: ()| {
        let Some(employee) = deleting.get_untracked() else {
            return;
        };
        delete_busy.set(true);
        spawn_local(async move {
            match api::delete_employee(&employee.id).await {
                Ok(()) => {
                    log::info!("Employee deleted: {}", employee.id);
                    store.remove(&employee.id);
                }
                Err(e) => store.set_error(format!("Не удалось удалить сотрудника: {}", e)),
            }
            delete_busy.set(false);
            deleting.set(None);
        });
    });

    let loading = Signal::derive(move || store.state.with(|s| s.loading));
    let search_term = list.search_term();
    let store_id_for_forms = move || ctx.store_id_untracked().unwrap_or_default();

    view! {
        <PageFrame page_id="a001_employee--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Сотрудники"</h1>
                    <Badge>{move || list.page.with(|p| p.total_filtered.to_string())}</Badge>
                </div>
                <div class="page__header-right">
                    <Button appearance=ButtonAppearance::Primary on_click=move |_| show_create.set(true)>
                        {icon("plus")}
                        " Новый"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| load_data()
                        disabled=loading
                    >
                        {icon("refresh")}
                        {move || if loading.get() { " Загрузка..." } else { " Обновить" }}
                    </Button>
                </div>
            </div>

            <div class="page__content">
                {move || store.state.with(|s| s.error.clone()).map(|e| view! { <div class="alert alert--error">{e}</div> })}
                {move || store.state.with(|s| s.unfetched_notice()).map(|n| view! { <div class="alert alert--warning">{n}</div> })}

                <div class="filter-panel">
                    <div class="filter-panel-header">
                        <div class="filter-panel-header__left">
                            {icon("filter")}
                            <SearchInput
                                value=search_term
                                on_change=Callback::new(move |term: String| list.set_search(term))
                                placeholder="Имя, email, табельный номер..."
                            />
                            <StatusFilter
                                value=Signal::derive(move || list.query.with(|q| q.status_filter.clone()))
                                options=status_options()
                                on_change=Callback::new(move |status: String| list.set_status(status))
                            />
                        </div>
                        <div class="filter-panel-header__center">
                            <PaginationControls
                                current_page=Signal::derive(move || list.query.with(|q| q.page))
                                total_pages=Signal::derive(move || list.page.with(|p| p.total_pages))
                                total_count=Signal::derive(move || list.page.with(|p| p.total_filtered))
                                page_size=Signal::derive(move || list.query.with(|q| q.page_size))
                                on_page_change=Callback::new(move |page| list.go_to_page(page))
                                on_page_size_change=Callback::new(move |size| list.set_page_size(size))
                            />
                        </div>
                    </div>
                </div>

                <div class="table-wrapper">
                    <Table attr:style="width: 100%;">
                        <TableHeader>
                            <TableRow>
                                <SortableHeaderCell label="Имя" sort_field="firstName" current_sort_field=list.sort_field() sort_direction=list.sort_direction() on_sort=list.on_sort() min_width=160.0 />
                                <SortableHeaderCell label="Email" sort_field="email" current_sort_field=list.sort_field() sort_direction=list.sort_direction() on_sort=list.on_sort() min_width=180.0 />
                                <SortableHeaderCell label="Таб. №" sort_field="employeeCode" current_sort_field=list.sort_field() sort_direction=list.sort_direction() on_sort=list.on_sort() />
                                <SortableHeaderCell label="Должность" sort_field="position" current_sort_field=list.sort_field() sort_direction=list.sort_direction() on_sort=list.on_sort() min_width=120.0 />
                                <SortableHeaderCell label="Статус" sort_field="status" current_sort_field=list.sort_field() sort_direction=list.sort_direction() on_sort=list.on_sort() />
                                <SortableHeaderCell label="Принят" sort_field="joiningDate" current_sort_field=list.sort_field() sort_direction=list.sort_direction() on_sort=list.on_sort() />
                                <SortableHeaderCell label="Права" sort_field="permissions" current_sort_field=list.sort_field() sort_direction=list.sort_direction() on_sort=list.on_sort() min_width=80.0 align="right" />
                                <TableHeaderCell min_width=120.0>""</TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            {move || {
                                list.rows()
                                    .into_iter()
                                    .map(|employee| {
                                        let name = employee.full_name();
                                        let email = employee.email.clone();
                                        let code = employee.employee_code.clone();
                                        let for_edit = employee.clone();
                                        let for_permissions = employee.clone();
                                        let for_delete = employee.clone();
                                        let permission_count = employee.permission_count();
                                        view! {
                                            <TableRow>
                                                <TableCell>
                                                    <TableCellLayout truncate=true>
                                                        <span style="font-weight: 500;">
                                                            {move || highlight_matches(&name, &search_term.get())}
                                                        </span>
                                                    </TableCellLayout>
                                                </TableCell>
                                                <TableCell>
                                                    <TableCellLayout truncate=true>
                                                        {move || highlight_matches(&email, &search_term.get())}
                                                    </TableCellLayout>
                                                </TableCell>
                                                <TableCell>
                                                    <TableCellLayout>
                                                        {move || highlight_matches(&code, &search_term.get())}
                                                    </TableCellLayout>
                                                </TableCell>
                                                <TableCell>
                                                    <TableCellLayout truncate=true>
                                                        {employee.position.clone().unwrap_or_default()}
                                                    </TableCellLayout>
                                                </TableCell>
                                                <TableCell>
                                                    <TableCellLayout>
                                                        <span class=status_badge_class(employee.status)>
                                                            {employee.status.display_name()}
                                                        </span>
                                                    </TableCellLayout>
                                                </TableCell>
                                                <TableCell>
                                                    <TableCellLayout>
                                                        {format_date_opt(employee.joining_date.as_deref())}
                                                    </TableCellLayout>
                                                </TableCell>
                                                <TableCell>
                                                    <TableCellLayout>
                                                        <span style="display: block; text-align: right;">
                                                            {format!("{} прав", permission_count)}
                                                        </span>
                                                    </TableCellLayout>
                                                </TableCell>
                                                <TableCell>
                                                    <Button
                                                        appearance=ButtonAppearance::Subtle
                                                        on_click=move |_| editing.set(Some(for_edit.clone()))
                                                        attr:title="Редактировать"
                                                    >
                                                        {icon("edit")}
                                                    </Button>
                                                    <Button
                                                        appearance=ButtonAppearance::Subtle
                                                        on_click=move |_| permissions_for.set(Some(for_permissions.clone()))
                                                        attr:title="Права"
                                                    >
                                                        {icon("shield")}
                                                    </Button>
                                                    <Button
                                                        appearance=ButtonAppearance::Subtle
                                                        on_click=move |_| deleting.set(Some(for_delete.clone()))
                                                        attr:title="Удалить"
                                                    >
                                                        {icon("trash")}
                                                    </Button>
                                                </TableCell>
                                            </TableRow>
                                        }
                                    })
                                    .collect_view()
                            }}
                        </TableBody>
                    </Table>

                    <Show when=move || store.state.with(|s| s.is_loaded) && list.page.with(|p| p.total_filtered == 0)>
                        <div class="table__empty">"Сотрудники не найдены"</div>
                    </Show>
                </div>

                <Show when=move || show_create.get()>
                    <EmployeeDetails
                        employee=None
                        store_id=store_id_for_forms()
                        on_saved=on_saved
                        on_close=Callback::new(move |_| show_create.set(false))
                    />
                </Show>

                {move || editing.get().map(|employee| view! {
                    <EmployeeDetails
                        employee=Some(employee)
                        store_id=store_id_for_forms()
                        on_saved=on_saved
                        on_close=Callback::new(move |_| editing.set(None))
                    />
                })}

                {move || permissions_for.get().map(|employee| view! {
                    <EmployeePermissions
                        employee=employee
                        store_id=store_id_for_forms()
                        on_saved=on_saved
                        on_close=Callback::new(move |_| permissions_for.set(None))
                    />
                })}

                {move || deleting.get().map(|employee| view! {
                    <ConfirmDialog
                        title="Удаление сотрудника"
                        message=format!("Удалить сотрудника {}?", employee.full_name())
                        busy=delete_busy
                        on_confirm=confirm_delete
                        on_cancel=Callback::new(move |_| deleting.set(None))
                    />
                })}
            </div>
        </PageFrame>
    }
}
