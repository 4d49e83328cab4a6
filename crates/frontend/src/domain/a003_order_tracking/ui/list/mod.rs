//! Проверка оплат по заказам магазина.
//!
//! Сумму можно поправить прямо в таблице; при подтверждении изменённая сумма
//! сначала сохраняется, потом заказ подтверждается. После каждой операции
//! список перечитывается с сервера.

use std::collections::HashMap;

use contracts::domain::a003_order_tracking::aggregate::{
    RejectOrderDto, TrackingAction, TrackingOrder, TrackingStatus, UpdatePaymentDto,
};
use contracts::shared::list_view::{ListQuery, SortDirection};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::reject::RejectDialog;
use crate::domain::a003_order_tracking::api;
use crate::layout::global_context::AppGlobalContext;
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::components::status_filter::StatusFilter;
use crate::shared::components::table::{format_money, SortableHeaderCell};
use crate::shared::date_utils::format_datetime;
use crate::shared::entity_store::EntityStore;
use crate::shared::form_utils::{number_input_value, parse_number};
use crate::shared::icons::icon;
use crate::shared::list_state::ListView;
use crate::shared::list_utils::{highlight_matches, SearchInput};
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;

/// Введённая в таблице сумма: None, если поле не трогали или сумма не изменилась
pub fn pending_amount(order: &TrackingOrder, raw: Option<&str>) -> Result<Option<f64>, String> {
    let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
        return Ok(None);
    };
    let amount = parse_number(raw).ok_or_else(|| format!("Некорректная сумма: {}", raw.trim()))?;
    UpdatePaymentDto { payment_amount: amount }.validate()?;
    Ok(order.payment_changed(amount).then_some(amount))
}

fn status_badge_class(status: TrackingStatus) -> &'static str {
    match status {
        TrackingStatus::PendingVerification => "badge badge--warning",
        TrackingStatus::UnderReview => "badge badge--primary",
        TrackingStatus::Verified => "badge badge--success",
        TrackingStatus::Rejected => "badge badge--error",
    }
}

fn status_options() -> Vec<(&'static str, &'static str)> {
    TrackingStatus::all()
        .into_iter()
        .map(|s| (s.as_str(), s.display_name()))
        .collect()
}

fn short_id(id: &str) -> String {
    id.chars().take(8).collect::<String>().to_uppercase()
}

/// Текст ошибки операции над заказом для экрана; сбой пишется в лог
fn action_failure(id: &str, result: &Result<(), String>) -> Option<String> {
    match result {
        Ok(()) => None,
        Err(e) => {
            log::error!("order tracking {}: action failed: {}", id, e);
            Some(e.clone())
        }
    }
}

#[component]
pub fn OrderTrackingList() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let store = EntityStore::<TrackingOrder>::new();
    store.invalidate_on_cleanup();
    let list = ListView::new(store, ListQuery::sorted_by("validatedAt", SortDirection::Desc));

    // id -> текст из поля суммы
    let drafts: RwSignal<HashMap<String, String>> = RwSignal::new(HashMap::new());
    // заказ, по которому идёт запрос; его кнопки заблокированы
    let busy: RwSignal<Option<String>> = RwSignal::new(None);
    let rejecting: RwSignal<Option<TrackingOrder>> = RwSignal::new(None);
    let (action_error, set_action_error) = signal::<Option<String>>(None);

    let load_data = move || {
        let Some(store_id) = ctx.store_id_untracked() else {
            return;
        };
        store.load("order tracking", move || async move {
            api::fetch_tracking_orders(&store_id).await
        });
    };

    Effect::new(move |_| {
        ctx.current_store.track();
        load_data();
    });

    // общий хвост всех операций: перечитать список и разблокировать строку.
    // Ошибка операции живёт отдельно от store.error: перезагрузка его сбрасывает.
    let finish = move |id: &str, result: Result<(), String>| {
        let failure = action_failure(id, &result);
        if failure.is_none() {
            drafts.update(|d| {
                d.remove(id);
            });
        }
        set_action_error.set(failure);
        busy.set(None);
        load_data();
    };

    let start = move |id: &str| -> bool {
        if busy.with_untracked(|b| b.is_some()) {
            return false;
        }
        busy.set(Some(id.to_string()));
        set_action_error.set(None);
        true
    };

    let verify = move |order: TrackingOrder| {
        let raw = drafts.with_untracked(|d| d.get(&order.id).cloned());
        let amount = match pending_amount(&order, raw.as_deref()) {
            Ok(amount) => amount,
            Err(e) => {
                log::warn!("order tracking {}: invalid amount: {}", order.id, e);
                set_action_error.set(Some(e));
                return;
            }
        };
        if !order.can(TrackingAction::Verify) || !start(&order.id) {
            return;
        }
        let steps = order.verification_steps(amount);
        spawn_local(async move {
            let result = api::run_verification(&order.id, steps)
                .await
                .map_err(|e| format!("Не удалось подтвердить заказ {}: {}", short_id(&order.id), e));
            finish(&order.id, result);
        });
    };

    let save_payment = move |order: TrackingOrder| {
        let raw = drafts.with_untracked(|d| d.get(&order.id).cloned());
        let amount = match pending_amount(&order, raw.as_deref()) {
            Ok(Some(amount)) => amount,
            Ok(None) => return,
            Err(e) => {
                log::warn!("order tracking {}: invalid amount: {}", order.id, e);
                set_action_error.set(Some(e));
                return;
            }
        };
        if !order.can(TrackingAction::UpdatePayment) || !start(&order.id) {
            return;
        }
        spawn_local(async move {
            let result = api::update_payment(&order.id, &UpdatePaymentDto { payment_amount: amount })
                .await
                .map_err(|e| format!("Не удалось сохранить сумму: {}", e));
            finish(&order.id, result);
        });
    };

    let confirm_reject = Callback::new(move |dto: RejectOrderDto| {
        let Some(order) = rejecting.get_untracked() else {
            return;
        };
        if !order.can(TrackingAction::Reject) || !start(&order.id) {
            return;
        }
        spawn_local(async move {
            let result = api::reject_order(&order.id, &dto)
                .await
                .map_err(|e| format!("Не удалось отклонить заказ: {}", e));
            if result.is_ok() {
                rejecting.set(None);
            }
            finish(&order.id, result);
        });
    });

    let loading = Signal::derive(move || store.state.with(|s| s.loading));
    let search_term = list.search_term();

    view! {
        <PageFrame page_id="a003_order_tracking--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Проверка заказов"</h1>
                    <Badge>{move || list.page.with(|p| p.total_filtered.to_string())}</Badge>
                </div>
                <div class="page__header-right">
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
                {move || action_error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

                <div class="filter-panel">
                    <div class="filter-panel-header">
                        <div class="filter-panel-header__left">
                            {icon("filter")}
                            <SearchInput
                                value=search_term
                                on_change=Callback::new(move |term: String| list.set_search(term))
                                placeholder="Заказ, покупатель, водитель..."
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
                                <TableHeaderCell min_width=90.0>"Заказ"</TableHeaderCell>
                                <SortableHeaderCell label="Покупатель" sort_field="customerName" current_sort_field=list.sort_field() sort_direction=list.sort_direction() on_sort=list.on_sort() min_width=160.0 />
                                <SortableHeaderCell label="Водитель" sort_field="driverName" current_sort_field=list.sort_field() sort_direction=list.sort_direction() on_sort=list.on_sort() min_width=140.0 />
                                <TableHeaderCell min_width=90.0>"Оплата"</TableHeaderCell>
                                <SortableHeaderCell label="Сумма" sort_field="paymentAmount" current_sort_field=list.sort_field() sort_direction=list.sort_direction() on_sort=list.on_sort() min_width=140.0 align="right" />
                                <SortableHeaderCell label="Статус" sort_field="status" current_sort_field=list.sort_field() sort_direction=list.sort_direction() on_sort=list.on_sort() />
                                <SortableHeaderCell label="Проверен" sort_field="validatedAt" current_sort_field=list.sort_field() sort_direction=list.sort_direction() on_sort=list.on_sort() min_width=130.0 />
                                <TableHeaderCell min_width=200.0>""</TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            {move || {
                                list.rows()
                                    .into_iter()
                                    .map(|order| {
                                        let id = StoredValue::new(order.id.clone());
                                        let short = short_id(&order.id);
                                        let customer = order.customer_name.clone();
                                        let driver = order.driver_name.clone().unwrap_or_default();
                                        let actions = order.available_actions();
                                        let can_edit = actions.contains(&TrackingAction::UpdatePayment);
                                        let can_verify = actions.contains(&TrackingAction::Verify);
                                        let can_reject = actions.contains(&TrackingAction::Reject);
                                        let row_busy = Signal::derive(move || {
                                            busy.with(|b| id.with_value(|i| b.as_deref() == Some(i.as_str())))
                                        });
                                        let stored_order = StoredValue::new(order.clone());
                                        let saved_amount = order.payment_amount;
                                        let adjusted = order.payment_adjusted();
                                        let draft_changed = Signal::derive(move || {
                                            stored_order.with_value(|o| {
                                                drafts.with(|d| matches!(pending_amount(o, d.get(&o.id).map(String::as_str)), Ok(Some(_))))
                                            })
                                        });
                                        let validated = order
                                            .validated_at
                                            .as_deref()
                                            .map(format_datetime)
                                            .unwrap_or_else(|| "-".to_string());
                                        view! {
                                            <TableRow>
                                                <TableCell>
                                                    <TableCellLayout>
                                                        <code>{move || highlight_matches(&short, &search_term.get())}</code>
                                                    </TableCellLayout>
                                                </TableCell>
                                                <TableCell>
                                                    <TableCellLayout truncate=true>
                                                        {move || highlight_matches(&customer, &search_term.get())}
                                                    </TableCellLayout>
                                                </TableCell>
                                                <TableCell>
                                                    <TableCellLayout truncate=true>
                                                        {move || highlight_matches(&driver, &search_term.get())}
                                                    </TableCellLayout>
                                                </TableCell>
                                                <TableCell>
                                                    <TableCellLayout>{order.payment_type.clone()}</TableCellLayout>
                                                </TableCell>
                                                <TableCell>
                                                    <TableCellLayout>
                                                        {if can_edit {
                                                            view! {
                                                                <input
                                                                    type="text"
                                                                    inputmode="decimal"
                                                                    class="payment-input"
                                                                    class:payment-input--changed=move || draft_changed.get()
                                                                    disabled=move || row_busy.get()
                                                                    prop:value=move || {
                                                                        id.with_value(|i| drafts.with(|d| d.get(i).cloned()))
                                                                            .unwrap_or_else(|| number_input_value(saved_amount))
                                                                    }
                                                                    on:input=move |ev| {
                                                                        let value = event_target_value(&ev);
                                                                        id.with_value(|i| drafts.update(|d| {
                                                                            d.insert(i.clone(), value);
                                                                        }));
                                                                    }
                                                                />
                                                            }
                                                                .into_any()
                                                        } else {
                                                            view! {
                                                                <span
                                                                    class="table-cell-money"
                                                                    class:table-cell-money--changed=adjusted
                                                                    title=move || {
                                                                        stored_order.with_value(|o| {
                                                                            o.original_payment_amount
                                                                                .filter(|_| adjusted)
                                                                                .map(|a| format!("Исходная сумма: {}", format_money(a)))
                                                                                .unwrap_or_default()
                                                                        })
                                                                    }
                                                                >
                                                                    {format_money(saved_amount)}
                                                                </span>
                                                            }
                                                                .into_any()
                                                        }}
                                                    </TableCellLayout>
                                                </TableCell>
                                                <TableCell>
                                                    <TableCellLayout>
                                                        <span class=status_badge_class(order.status)>
                                                            {order.status.display_name()}
                                                        </span>
                                                    </TableCellLayout>
                                                </TableCell>
                                                <TableCell>
                                                    <TableCellLayout>{validated}</TableCellLayout>
                                                </TableCell>
                                                <TableCell>
                                                    {can_edit.then(|| view! {
                                                        <Show when=move || draft_changed.get()>
                                                            <Button
                                                                appearance=ButtonAppearance::Subtle
                                                                on_click=move |_| save_payment(stored_order.get_value())
                                                                disabled=row_busy
                                                                attr:title="Сохранить сумму"
                                                            >
                                                                {icon("check")}
                                                            </Button>
                                                        </Show>
                                                    })}
                                                    {can_verify.then(|| view! {
                                                        <Button
                                                            appearance=ButtonAppearance::Primary
                                                            on_click=move |_| verify(stored_order.get_value())
                                                            disabled=row_busy
                                                        >
                                                            {move || if row_busy.get() { "..." } else { "Подтвердить" }}
                                                        </Button>
                                                    })}
                                                    {can_reject.then(|| view! {
                                                        <Button
                                                            appearance=ButtonAppearance::Secondary
                                                            on_click=move |_| rejecting.set(Some(stored_order.get_value()))
                                                            disabled=row_busy
                                                        >
                                                            "Отклонить"
                                                        </Button>
                                                    })}
                                                </TableCell>
                                            </TableRow>
                                        }
                                    })
                                    .collect_view()
                            }}
                        </TableBody>
                    </Table>

                    <Show when=move || store.state.with(|s| s.is_loaded) && list.page.with(|p| p.total_filtered == 0)>
                        <div class="table__empty">"Заказов нет"</div>
                    </Show>
                </div>

                {move || rejecting.get().map(|order| view! {
                    <RejectDialog
                        order_label=short_id(&order.id)
                        busy=Signal::derive(move || busy.with(|b| b.is_some()))
                        on_confirm=confirm_reject
                        on_cancel=Callback::new(move |_| rejecting.set(None))
                    />
                })}
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(amount: f64) -> TrackingOrder {
        serde_json::from_value(serde_json::json!({
            "id": "t1",
            "customerName": "Ann",
            "status": "pending_verification",
            "paymentAmount": amount
        }))
        .unwrap()
    }

    #[test]
    fn test_pending_amount() {
        let o = order(120.0);
        assert_eq!(pending_amount(&o, None), Ok(None));
        assert_eq!(pending_amount(&o, Some("  ")), Ok(None));
        assert_eq!(pending_amount(&o, Some("120")), Ok(None));
        assert_eq!(pending_amount(&o, Some("115,50")), Ok(Some(115.5)));
        assert!(pending_amount(&o, Some("abc")).is_err());
        assert!(pending_amount(&o, Some("-5")).is_err());
    }

    #[test]
    fn test_action_failure() {
        assert_eq!(action_failure("t1", &Ok(())), None);
        assert_eq!(
            action_failure("t1", &Err("Failed to send request".into())),
            Some("Failed to send request".to_string())
        );
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("65a1b2c3d4e5"), "65A1B2C3");
        assert_eq!(short_id("t1"), "T1");
    }
}
