use contracts::domain::a002_role_template::aggregate::RoleTemplate;
use contracts::shared::list_view::{ListQuery, SortDirection};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::assign::RoleTemplateAssign;
use super::details::RoleTemplateDetails;
use crate::domain::a002_role_template::api;
use crate::shared::components::confirm_dialog::ConfirmDialog;
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::components::status_filter::StatusFilter;
use crate::shared::components::table::SortableHeaderCell;
use crate::shared::entity_store::EntityStore;
use crate::shared::icons::icon;
use crate::shared::list_state::ListView;
use crate::shared::list_utils::{highlight_matches, SearchInput};
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;

#[component]
pub fn RoleTemplateList() -> impl IntoView {
    let store = EntityStore::<RoleTemplate>::new();
    store.invalidate_on_cleanup();
    let list = ListView::new(store, ListQuery::sorted_by("priority", SortDirection::Desc));

    let show_create = RwSignal::new(false);
    let editing: RwSignal<Option<RoleTemplate>> = RwSignal::new(None);
    let assigning: RwSignal<Option<RoleTemplate>> = RwSignal::new(None);
    let deleting: RwSignal<Option<RoleTemplate>> = RwSignal::new(None);
    let delete_busy = RwSignal::new(false);
    let (notice, set_notice) = signal::<Option<String>>(None);

    let load_data = move || store.load("role templates", api::fetch_role_templates);
    load_data();

    let on_saved = Callback::new(move |template: RoleTemplate| {
        show_create.set(false);
        editing.set(None);
        store.upsert(template);
    });

    let on_assigned = Callback::new(move |_: ()| {
        assigning.set(None);
        set_notice.set(Some("Шаблон назначен".to_string()));
    });

    let confirm_delete = Callback::new(move |_: ()| {
        let Some(template) = deleting.get_untracked() else {
            return;
        };
        delete_busy.set(true);
        spawn_local(async move {
            match api::delete_role_template(&template.id).await {
                Ok(()) => store.remove(&template.id),
                Err(e) => store.set_error(format!("Не удалось удалить шаблон: {}", e)),
            }
            delete_busy.set(false);
            deleting.set(None);
        });
    });

    let loading = Signal::derive(move || store.state.with(|s| s.loading));
    let search_term = list.search_term();

    view! {
        <PageFrame page_id="a002_role_template--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Шаблоны ролей"</h1>
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
                {move || notice.get().map(|n| view! { <div class="alert alert--success">{n}</div> })}

                <div class="filter-panel">
                    <div class="filter-panel-header">
                        <div class="filter-panel-header__left">
                            {icon("filter")}
                            <SearchInput
                                value=search_term
                                on_change=Callback::new(move |term: String| list.set_search(term))
                                placeholder="Название или описание..."
                            />
                            <StatusFilter
                                value=Signal::derive(move || list.query.with(|q| q.status_filter.clone()))
                                options=vec![("active", "Активные"), ("inactive", "Неактивные")]
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
                                <SortableHeaderCell label="Название" sort_field="name" current_sort_field=list.sort_field() sort_direction=list.sort_direction() on_sort=list.on_sort() min_width=180.0 />
                                <TableHeaderCell min_width=200.0>"Описание"</TableHeaderCell>
                                <SortableHeaderCell label="Приоритет" sort_field="priority" current_sort_field=list.sort_field() sort_direction=list.sort_direction() on_sort=list.on_sort() align="right" />
                                <SortableHeaderCell label="По умолч." sort_field="isDefault" current_sort_field=list.sort_field() sort_direction=list.sort_direction() on_sort=list.on_sort() />
                                <SortableHeaderCell label="Статус" sort_field="isActive" current_sort_field=list.sort_field() sort_direction=list.sort_direction() on_sort=list.on_sort() />
                                <SortableHeaderCell label="Права" sort_field="permissions" current_sort_field=list.sort_field() sort_direction=list.sort_direction() on_sort=list.on_sort() align="right" />
                                <TableHeaderCell min_width=120.0>""</TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            {move || {
                                list.rows()
                                    .into_iter()
                                    .map(|template| {
                                        let name = template.name.clone();
                                        let description = template.description.clone().unwrap_or_default();
                                        let for_edit = template.clone();
                                        let for_assign = template.clone();
                                        let for_delete = template.clone();
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
                                                        {move || highlight_matches(&description, &search_term.get())}
                                                    </TableCellLayout>
                                                </TableCell>
                                                <TableCell>
                                                    <TableCellLayout>
                                                        <span style="display: block; text-align: right;">{template.priority}</span>
                                                    </TableCellLayout>
                                                </TableCell>
                                                <TableCell>
                                                    <TableCellLayout>
                                                        {template.is_default.then(|| view! { <span class="badge badge--primary">"Да"</span> })}
                                                    </TableCellLayout>
                                                </TableCell>
                                                <TableCell>
                                                    <TableCellLayout>
                                                        {if template.is_active {
                                                            view! { <span class="badge badge--success">"Активен"</span> }.into_any()
                                                        } else {
                                                            view! { <span class="badge badge--neutral">"Неактивен"</span> }.into_any()
                                                        }}
                                                    </TableCellLayout>
                                                </TableCell>
                                                <TableCell>
                                                    <TableCellLayout>
                                                        <span style="display: block; text-align: right;">
                                                            {format!("{} прав", template.permission_count())}
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
                                                        on_click=move |_| {
                                                            set_notice.set(None);
                                                            assigning.set(Some(for_assign.clone()));
                                                        }
                                                        attr:title="Назначить сотрудникам"
                                                    >
                                                        {icon("users")}
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
                        <div class="table__empty">"Шаблоны не найдены"</div>
                    </Show>
                </div>

                <Show when=move || show_create.get()>
                    <RoleTemplateDetails
                        template=None
                        on_saved=on_saved
                        on_close=Callback::new(move |_| show_create.set(false))
                    />
                </Show>

                {move || editing.get().map(|template| view! {
                    <RoleTemplateDetails
                        template=Some(template)
                        on_saved=on_saved
                        on_close=Callback::new(move |_| editing.set(None))
                    />
                })}

                {move || assigning.get().map(|template| view! {
                    <RoleTemplateAssign
                        template=template
                        on_assigned=on_assigned
                        on_close=Callback::new(move |_| assigning.set(None))
                    />
                })}

                {move || deleting.get().map(|template| view! {
                    <ConfirmDialog
                        title="Удаление шаблона"
                        message=format!("Удалить шаблон \"{}\"?", template.name)
                        busy=delete_busy
                        on_confirm=confirm_delete
                        on_cancel=Callback::new(move |_| deleting.set(None))
                    />
                })}
            </div>
        </PageFrame>
    }
}
