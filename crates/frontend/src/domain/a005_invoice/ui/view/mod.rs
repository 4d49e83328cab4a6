//! Счёт по продаже: реквизиты продавца из профиля компании

use crate::domain::a004_sale::api as sale_api;
use crate::domain::a007_business_profile::api as profile_api;
use crate::shared::components::table::format_currency;
use crate::shared::date_utils::format_date_opt;
use crate::shared::form_utils::number_input_value;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DETAIL;
use contracts::domain::a005_invoice::aggregate::InvoiceDocument;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

async fn load_invoice(sale_id: &str) -> Result<InvoiceDocument, String> {
    let sale = sale_api::fetch_sale(sale_id).await?;
    // без профиля счёт всё равно строится, реквизиты продавца будут пустыми
    let profile = match profile_api::fetch_business_profile().await {
        Ok(profile) => profile,
        Err(e) => {
            log::warn!("Invoice {}: business profile unavailable: {}", sale_id, e);
            Default::default()
        }
    };
    Ok(InvoiceDocument::from_sale(&sale, &profile))
}

#[component]
pub fn InvoiceView(sale_id: String) -> impl IntoView {
    let invoice: RwSignal<Option<InvoiceDocument>> = RwSignal::new(None);
    let (error, set_error) = signal::<Option<String>>(None);
    let loading = RwSignal::new(true);

    spawn_local(async move {
        match load_invoice(&sale_id).await {
            Ok(doc) => {
                if !doc.lines_match_subtotal() {
                    log::warn!("Invoice {}: line totals differ from subtotal", doc.number);
                }
                invoice.set(Some(doc));
            }
            Err(e) => set_error.set(Some(format!("Не удалось сформировать счёт: {}", e))),
        }
        loading.set(false);
    });

    view! {
        <PageFrame page_id="a005_invoice--detail" category=PAGE_CAT_DETAIL>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">
                        {move || invoice.with(|d| d.as_ref().map(|d| format!("Счёт {}", d.number)).unwrap_or_else(|| "Счёт".into()))}
                    </h1>
                </div>
            </div>

            <div class="page__content">
                {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
                <Show when=move || loading.get()>
                    <Spinner />
                </Show>
                {move || invoice.get().map(|doc| view! { <InvoiceSheet doc=doc /> })}
            </div>
        </PageFrame>
    }
}

#[component]
fn InvoiceSheet(doc: InvoiceDocument) -> impl IntoView {
    let currency = doc.currency.clone();
    let money = move |value: f64| format_currency(value, &currency);
    let seller = doc.seller.clone();
    let seller_lines: Vec<String> = [
        seller.address.clone(),
        seller.phone.clone(),
        seller.email.clone(),
        seller.tax_id.clone().map(|t| format!("ИНН: {}", t)),
    ]
    .into_iter()
    .flatten()
    .collect();

    view! {
        <div class="invoice">
            <div class="invoice__header">
                <div class="invoice__seller">
                    {seller.logo_url.clone().map(|url| view! { <img class="invoice__logo" src=url alt="logo" /> })}
                    <h2>{seller.name.clone()}</h2>
                    {seller_lines.into_iter().map(|line| view! { <div>{line}</div> }).collect_view()}
                </div>
                <div class="invoice__meta">
                    <div class="invoice__number">{format!("Счёт № {}", doc.number)}</div>
                    <div>{format!("от {}", format_date_opt(doc.issued_at.as_deref()))}</div>
                </div>
            </div>

            <div class="invoice__customer">
                <strong>"Покупатель: "</strong>
                {doc.customer_name.clone()}
                {doc.customer_phone.clone().map(|p| format!(", {}", p))}
            </div>

            <table class="invoice__lines">
                <thead>
                    <tr>
                        <th>"№"</th>
                        <th>"Наименование"</th>
                        <th>"Кол-во"</th>
                        <th>"Цена"</th>
                        <th>"Скидка, %"</th>
                        <th>"Сумма"</th>
                    </tr>
                </thead>
                <tbody>
                    {doc.lines
                        .iter()
                        .map(|line| view! {
                            <tr>
                                <td>{line.position}</td>
                                <td>{line.description.clone()}</td>
                                <td class="invoice__num">{number_input_value(line.quantity)}</td>
                                <td class="invoice__num">{money(line.unit_price)}</td>
                                <td class="invoice__num">{number_input_value(line.discount_percent)}</td>
                                <td class="invoice__num">{money(line.line_total)}</td>
                            </tr>
                        })
                        .collect_view()}
                </tbody>
            </table>

            <div class="invoice__totals">
                <div>"Подытог: " {money(doc.subtotal)}</div>
                {(doc.discount > 0.0).then(|| view! { <div>"Скидка: " {money(doc.discount)}</div> })}
                <div>{format!("Налог ({}%): ", number_input_value(doc.tax_rate_percent))} {money(doc.tax)}</div>
                <div class="invoice__total">"Итого: " {money(doc.total)}</div>
            </div>

            <div class="invoice__payment">
                {format!("Оплата: {} ({})", doc.payment_method.display_name(), doc.payment_status.display_name())}
            </div>
            {doc.notes.clone().map(|n| view! { <div class="invoice__notes">{n}</div> })}
        </div>
    }
}
