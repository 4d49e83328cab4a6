use super::view_model::{status_choices, SaleDetailsViewModel};
use crate::domain::a004_sale::ui::list::{payment_status_badge, sale_status_badge};
use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::detail_tab_label;
use crate::layout::tabs::tab_labels::{invoice_key, sale_return_key};
use crate::shared::components::table::{format_money, TableCellMoney};
use crate::shared::date_utils::format_datetime;
use crate::shared::form_utils::number_input_value;
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DETAIL;
use contracts::domain::a004_sale::aggregate::{PaymentStatus, Sale, SaleStatus};
use leptos::prelude::*;
use thaw::*;

#[component]
pub fn SaleDetails(id: String) -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let vm = SaleDetailsViewModel::new(id);
    vm.load();

    let open_related = move |key_of: fn(&str) -> String| {
        let id = vm.id.get_value();
        let key = key_of(&id);
        ctx.open_tab(&key, &detail_tab_label(&key, &id));
    };

    let busy = Signal::derive(move || vm.saving.get() || vm.loading.get());
    let returnable = Signal::derive(move || {
        vm.sale.with(|s| s.as_ref().is_some_and(|sale| sale.status.is_returnable()))
    });

    view! {
        <PageFrame page_id="a004_sale--detail" category=PAGE_CAT_DETAIL>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">
                        {move || vm.sale.with(|s| match s {
                            Some(sale) => format!(
                                "Продажа {}",
                                sale.invoice_number.clone().unwrap_or_else(|| sale.id.chars().take(8).collect())
                            ),
                            None => "Продажа".to_string(),
                        })}
                    </h1>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| open_related(invoice_key)
                        disabled=Signal::derive(move || vm.sale.with(|s| s.is_none()))
                    >
                        {icon("receipt")}
                        " Счёт"
                    </Button>
                    <Show when=move || returnable.get()>
                        <Button
                            appearance=ButtonAppearance::Secondary
                            on_click=move |_| open_related(sale_return_key)
                        >
                            {icon("package-x")}
                            " Возврат"
                        </Button>
                    </Show>
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| vm.save_command()
                        disabled=Signal::derive(move || busy.get() || !vm.is_dirty())
                    >
                        {icon("check")}
                        {move || if vm.saving.get() { " Сохранение..." } else { " Сохранить" }}
                    </Button>
                    <Button appearance=ButtonAppearance::Subtle on_click=move |_| vm.load() disabled=busy>
                        {icon("refresh")}
                    </Button>
                </div>
            </div>

            <div class="page__content">
                {move || vm.error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
                <Show when=move || vm.loading.get()>
                    <Spinner />
                </Show>
                {move || vm.sale.get().map(|sale| view! { <SaleBody sale=sale vm=vm /> })}
            </div>
        </PageFrame>
    }
}

#[component]
fn SaleBody(sale: Sale, vm: SaleDetailsViewModel) -> impl IntoView {
    let totals = sale.totals();
    let tax_rate = sale.tax_rate_percent();
    let created = sale.created_at.as_deref().map(format_datetime).unwrap_or_default();
    let status_options = status_choices(sale.status);

    view! {
        <div class="details-form">
            <div class="form__row">
                <div class="form__group">
                    <label>"Покупатель"</label>
                    <div>{sale.customer_name.clone()}</div>
                    <div class="text-muted">{sale.customer_phone.clone().unwrap_or_default()}</div>
                </div>
                <div class="form__group">
                    <label>"Дата"</label>
                    <div>{created}</div>
                </div>
                <div class="form__group">
                    <label>"Способ оплаты"</label>
                    <div>{sale.payment_method.display_name()}</div>
                </div>
            </div>

            <div class="form__row">
                <div class="form__group">
                    <label for="sale_status">"Статус"</label>
                    <span class=sale_status_badge(sale.status)>{sale.status.display_name()}</span>
                    <select
                        id="sale_status"
                        prop:value=move || vm.status.get().as_str()
                        on:change=move |ev| {
                            if let Some(s) = SaleStatus::from_code(&event_target_value(&ev)) {
                                vm.status.set(s);
                            }
                        }
                    >
                        {status_options
                            .into_iter()
                            .map(|s| view! { <option value=s.as_str()>{s.display_name()}</option> })
                            .collect_view()}
                    </select>
                </div>
                <div class="form__group">
                    <label for="sale_payment_status">"Оплата"</label>
                    <span class=payment_status_badge(sale.payment_status)>{sale.payment_status.display_name()}</span>
                    <select
                        id="sale_payment_status"
                        prop:value=move || vm.payment_status.get().as_str()
                        on:change=move |ev| {
                            if let Some(s) = PaymentStatus::from_code(&event_target_value(&ev)) {
                                vm.payment_status.set(s);
                            }
                        }
                    >
                        {PaymentStatus::all()
                            .into_iter()
                            .map(|s| view! { <option value=s.as_str()>{s.display_name()}</option> })
                            .collect_view()}
                    </select>
                </div>
            </div>

            <Table attr:style="width: 100%;">
                <TableHeader>
                    <TableRow>
                        <TableHeaderCell min_width=200.0>"Товар"</TableHeaderCell>
                        <TableHeaderCell>"Кол-во"</TableHeaderCell>
                        <TableHeaderCell>"Цена"</TableHeaderCell>
                        <TableHeaderCell>"Скидка, %"</TableHeaderCell>
                        <TableHeaderCell>"Сумма"</TableHeaderCell>
                    </TableRow>
                </TableHeader>
                <TableBody>
                    {sale
                        .items
                        .iter()
                        .map(|item| {
                            let price = item.unit_price;
                            let line_total = item.line_total();
                            let product_name = item.product_name.clone();
                            let quantity = number_input_value(item.quantity);
                            let discount_percent = number_input_value(item.discount_percent);
                            view! {
                                <TableRow>
                                    <TableCell>
                                        <TableCellLayout truncate=true>{product_name}</TableCellLayout>
                                    </TableCell>
                                    <TableCell><TableCellLayout>{quantity}</TableCellLayout></TableCell>
                                    <TableCellMoney value=Signal::derive(move || price) />
                                    <TableCell><TableCellLayout>{discount_percent}</TableCellLayout></TableCell>
                                    <TableCellMoney value=Signal::derive(move || line_total) bold=true />
                                </TableRow>
                            }
                        })
                        .collect_view()}
                </TableBody>
            </Table>

            <div class="sale-totals">
                <div>"Подытог: " {format_money(totals.subtotal)}</div>
                <div>"Скидка: " {format_money(totals.discount)}</div>
                <div>{format!("Налог ({}%): ", number_input_value(tax_rate))} {format_money(totals.tax)}</div>
                <div class="sale-totals__total">"Итого: " {format_money(totals.total)}</div>
            </div>

            {sale.notes.clone().map(|notes| view! {
                <div class="form__group">
                    <label>"Комментарий"</label>
                    <div>{notes}</div>
                </div>
            })}
        </div>
    }
}
