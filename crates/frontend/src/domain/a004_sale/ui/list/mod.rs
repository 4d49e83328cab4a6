use contracts::domain::a004_sale::aggregate::{
    PaymentMethod, PaymentStatus, Sale, SaleListFilter, SaleStatus,
};
use leptos::prelude::*;
use thaw::*;

use crate::domain::a004_sale::api;
use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::detail_tab_label;
use crate::layout::tabs::tab_labels::sale_detail_key;
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::components::table::TableCellMoney;
use crate::shared::date_utils::format_datetime;
use crate::shared::entity_store::EntityStore;
use crate::shared::form_utils::non_empty;
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;

pub fn sale_status_badge(status: SaleStatus) -> &'static str {
    match status {
        SaleStatus::Completed => "badge badge--success",
        SaleStatus::Pending => "badge badge--warning",
        SaleStatus::Cancelled => "badge badge--neutral",
        SaleStatus::PartiallyReturned => "badge badge--primary",
        SaleStatus::Returned => "badge badge--error",
    }
}

pub fn payment_status_badge(status: PaymentStatus) -> &'static str {
    match status {
        PaymentStatus::Paid => "badge badge--success",
        PaymentStatus::Pending => "badge badge--warning",
        PaymentStatus::Partial => "badge badge--primary",
        PaymentStatus::Refunded => "badge badge--neutral",
    }
}

/// Выпадающий список "любое значение + варианты"
#[component]
fn CodeSelect(
    #[prop(into)] id: String,
    #[prop(into)] label: String,
    #[prop(into)] value: Signal<String>,
    options: Vec<(&'static str, &'static str)>,
    on_change: Callback<String>,
) -> impl IntoView {
    view! {
        <div class="form__group">
            <label for=id.clone()>{label}</label>
            <select
                id=id
                prop:value=move || value.get()
                on:change=move |ev| on_change.run(event_target_value(&ev))
            >
                <option value="">"Все"</option>
                {options
                    .into_iter()
                    .map(|(code, name)| view! { <option value=code>{name}</option> })
                    .collect_view()}
            </select>
        </div>
    }
}

#[component]
pub fn SaleList() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let store = EntityStore::<Sale>::new();
    store.invalidate_on_cleanup();

    // draft редактируется в панели фильтров, applied уходит на сервер
    let draft = RwSignal::new(SaleListFilter::default());
    let applied = RwSignal::new(SaleListFilter::default());

    let load_data = move || {
        let Some(store_id) = ctx.store_id_untracked() else {
            return;
        };
        let mut filter = applied.get_untracked();
        filter.store_id = Some(store_id);
        if let Err(msg) = filter.validate() {
            store.set_error(msg);
            return;
        }
        store.load("sales", move || async move { api::fetch_sales(&filter).await });
    };

    Effect::new(move |_| {
        ctx.current_store.track();
        load_data();
    });

    let apply = move |_| {
        let mut next = draft.get_untracked();
        next.page = 1;
        next.limit = applied.with_untracked(|f| f.limit);
        applied.set(next);
        load_data();
    };

    let reset = move |_| {
        draft.set(SaleListFilter::default());
        applied.set(SaleListFilter::default());
        load_data();
    };

    let go_to_page = Callback::new(move |page: usize| {
        applied.update(|f| f.page = page.max(1));
        load_data();
    });
    let set_page_size = Callback::new(move |size: usize| {
        applied.update(|f| {
            f.limit = size.max(1);
            f.page = 1;
        });
        load_data();
    });

    let open_sale = move |id: &str| {
        let key = sale_detail_key(id);
        ctx.open_tab(&key, &detail_tab_label(&key, id));
    };

    let loading = Signal::derive(move || store.state.with(|s| s.loading));
    let total_count = Signal::derive(move || {
        store
            .state
            .with(|s| s.pagination.as_ref().map(|p| p.total).unwrap_or(s.items.len()))
    });
    let total_pages = Signal::derive(move || {
        store
            .state
            .with(|s| s.pagination.as_ref().map(|p| p.total_pages).unwrap_or(1))
            .max(1)
    });

    let code_value = move |get: fn(&SaleListFilter) -> Option<&'static str>| {
        Signal::derive(move || draft.with(|f| get(f).unwrap_or("").to_string()))
    };

    view! {
        <PageFrame page_id="a004_sale--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Продажи"</h1>
                    <Badge>{move || total_count.get().to_string()}</Badge>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| ctx.open_tab("a004_sale_new", "Новая продажа")
                    >
                        {icon("plus")}
                        " Новая продажа"
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

                <div class="filter-panel">
                    <div class="filter-panel__body form__row">
                        <div class="form__group">
                            <label for="sale_customer">"Покупатель"</label>
                            <input
                                type="text"
                                id="sale_customer"
                                prop:value=move || draft.with(|f| f.customer.clone().unwrap_or_default())
                                on:input=move |ev| draft.update(|f| f.customer = non_empty(event_target_value(&ev)))
                            />
                        </div>
                        <CodeSelect
                            id="sale_status"
                            label="Статус"
                            value=code_value(|f| f.status.map(|s| s.as_str()))
                            options=SaleStatus::all().into_iter().map(|s| (s.as_str(), s.display_name())).collect()
                            on_change=Callback::new(move |code: String| draft.update(|f| f.status = SaleStatus::from_code(&code)))
                        />
                        <CodeSelect
                            id="sale_payment_status"
                            label="Оплата"
                            value=code_value(|f| f.payment_status.map(|s| s.as_str()))
                            options=PaymentStatus::all().into_iter().map(|s| (s.as_str(), s.display_name())).collect()
                            on_change=Callback::new(move |code: String| draft.update(|f| f.payment_status = PaymentStatus::from_code(&code)))
                        />
                        <CodeSelect
                            id="sale_payment_method"
                            label="Способ оплаты"
                            value=code_value(|f| f.payment_method.map(|m| m.as_str()))
                            options=PaymentMethod::all().into_iter().map(|m| (m.as_str(), m.display_name())).collect()
                            on_change=Callback::new(move |code: String| draft.update(|f| f.payment_method = PaymentMethod::from_code(&code)))
                        />
                        <div class="form__group">
                            <label for="sale_date_from">"С"</label>
                            <input
                                type="date"
                                id="sale_date_from"
                                prop:value=move || draft.with(|f| f.date_from.clone().unwrap_or_default())
                                on:change=move |ev| draft.update(|f| f.date_from = non_empty(event_target_value(&ev)))
                            />
                        </div>
                        <div class="form__group">
                            <label for="sale_date_to">"По"</label>
                            <input
                                type="date"
                                id="sale_date_to"
                                prop:value=move || draft.with(|f| f.date_to.clone().unwrap_or_default())
                                on:change=move |ev| draft.update(|f| f.date_to = non_empty(event_target_value(&ev)))
                            />
                        </div>
                        <div class="form__group filter-panel__actions">
                            <Button appearance=ButtonAppearance::Primary on_click=apply disabled=loading>
                                {icon("filter")}
                                " Применить"
                            </Button>
                            <Button appearance=ButtonAppearance::Subtle on_click=reset disabled=loading>
                                "Сбросить"
                            </Button>
                        </div>
                    </div>
                    <div class="filter-panel-header__center">
                        <PaginationControls
                            current_page=Signal::derive(move || applied.with(|f| f.page))
                            total_pages=total_pages
                            total_count=total_count
                            page_size=Signal::derive(move || applied.with(|f| f.limit))
                            on_page_change=go_to_page
                            on_page_size_change=set_page_size
                        />
                    </div>
                </div>

                <div class="table-wrapper">
                    <Table attr:style="width: 100%;">
                        <TableHeader>
                            <TableRow>
                                <TableHeaderCell min_width=110.0>"Номер"</TableHeaderCell>
                                <TableHeaderCell min_width=140.0>"Дата"</TableHeaderCell>
                                <TableHeaderCell min_width=180.0>"Покупатель"</TableHeaderCell>
                                <TableHeaderCell>"Позиций"</TableHeaderCell>
                                <TableHeaderCell>"Сумма"</TableHeaderCell>
                                <TableHeaderCell>"Оплата"</TableHeaderCell>
                                <TableHeaderCell>"Статус"</TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            {move || {
                                store
                                    .state
                                    .with(|s| s.items.clone())
                                    .into_iter()
                                    .map(|sale| {
                                        let id = sale.id.clone();
                                        let number = sale
                                            .invoice_number
                                            .clone()
                                            .unwrap_or_else(|| sale.id.chars().take(8).collect());
                                        let created = sale.created_at.as_deref().map(format_datetime).unwrap_or_default();
                                        let total = sale.total;
                                        view! {
                                            <TableRow>
                                                <TableCell>
                                                    <TableCellLayout>
                                                        <a href="#" class="table__link"
                                                            on:click=move |e| {
                                                                e.prevent_default();
                                                                open_sale(&id);
                                                            }
                                                        >
                                                            {number}
                                                        </a>
                                                    </TableCellLayout>
                                                </TableCell>
                                                <TableCell><TableCellLayout>{created}</TableCellLayout></TableCell>
                                                <TableCell>
                                                    <TableCellLayout truncate=true>{sale.customer_name.clone()}</TableCellLayout>
                                                </TableCell>
                                                <TableCell><TableCellLayout>{sale.items.len()}</TableCellLayout></TableCell>
                                                <TableCellMoney value=Signal::derive(move || total) bold=true />
                                                <TableCell>
                                                    <TableCellLayout>
                                                        <span class=payment_status_badge(sale.payment_status)>
                                                            {sale.payment_status.display_name()}
                                                        </span>
                                                        {format!(" {}", sale.payment_method.display_name())}
                                                    </TableCellLayout>
                                                </TableCell>
                                                <TableCell>
                                                    <TableCellLayout>
                                                        <span class=sale_status_badge(sale.status)>{sale.status.display_name()}</span>
                                                    </TableCellLayout>
                                                </TableCell>
                                            </TableRow>
                                        }
                                    })
                                    .collect_view()
                            }}
                        </TableBody>
                    </Table>

                    <Show when=move || store.state.with(|s| s.is_loaded && s.items.is_empty())>
                        <div class="table__empty">"Продажи не найдены"</div>
                    </Show>
                </div>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_status_has_badge() {
        for status in SaleStatus::all() {
            assert!(sale_status_badge(status).starts_with("badge badge--"));
        }
        assert_eq!(payment_status_badge(PaymentStatus::Paid), "badge badge--success");
        assert_eq!(sale_status_badge(SaleStatus::Returned), "badge badge--error");
    }
}
