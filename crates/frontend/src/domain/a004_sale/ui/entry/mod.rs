//! Ввод новой продажи: позиции, скидка на чек, налог и итоги на лету

use contracts::domain::a004_sale::aggregate::{
    CreateSaleDto, Discount, PaymentMethod, PaymentStatus, SaleItem,
};
use contracts::shared::money::is_sane_amount;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;
use uuid::Uuid;

use crate::domain::a004_sale::api;
use crate::domain::a007_business_profile::api as profile_api;
use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::detail_tab_label;
use crate::layout::tabs::tab_labels::sale_detail_key;
use crate::shared::components::table::{format_currency, format_money};
use crate::shared::form_utils::{non_empty, number_input_value, parse_number};
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DETAIL;

/// Строка ввода позиции, как её набрал пользователь
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemInput {
    pub product_id: String,
    pub product_name: String,
    pub quantity: String,
    pub unit_price: String,
    pub discount_percent: String,
}

impl ItemInput {
    /// Позиция для черновика. Без кода товара ID генерируется.
    pub fn to_item(&self) -> Result<SaleItem, String> {
        let name = self.product_name.trim();
        if name.is_empty() {
            return Err("Укажите товар".into());
        }
        let quantity = parse_number(&self.quantity)
            .filter(|q| *q > 0.0)
            .ok_or("Количество должно быть больше нуля")?;
        let unit_price = parse_number(&self.unit_price)
            .filter(|p| *p >= 0.0)
            .ok_or("Укажите цену")?;
        if !is_sane_amount(quantity) || !is_sane_amount(quantity * unit_price) {
            return Err("Слишком большое количество или цена".into());
        }
        let discount_percent = match self.discount_percent.trim() {
            "" => 0.0,
            raw => parse_number(raw)
                .filter(|d| (0.0..=100.0).contains(d))
                .ok_or("Скидка по строке должна быть от 0 до 100")?,
        };
        let product_id = match self.product_id.trim() {
            "" => Uuid::new_v4().to_string(),
            code => code.to_string(),
        };

        let mut item = SaleItem::new(&product_id, name, quantity, unit_price);
        item.discount_percent = discount_percent;
        Ok(item)
    }
}

/// Скидка на чек из вида ("none" | "percent" | "fixed") и значения
pub fn discount_from_input(kind: &str, raw: &str) -> Result<Discount, String> {
    let value = || parse_number(raw).filter(|v| *v >= 0.0).ok_or("Некорректная скидка");
    match kind {
        "percent" => {
            let v = value()?;
            if v > 100.0 {
                return Err("Скидка не может превышать 100%".into());
            }
            Ok(Discount::Percent(v))
        }
        "fixed" => Ok(Discount::Fixed(value()?)),
        _ => Ok(Discount::None),
    }
}

#[component]
pub fn SaleEntry(on_close: Callback<()>) -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let store_id = ctx.store_id_untracked().unwrap_or_default();

    let draft = RwSignal::new(CreateSaleDto::new_for_store(&store_id, 0.0));
    let currency = RwSignal::new("USD".to_string());
    let item_input = RwSignal::new(ItemInput::default());
    let discount_kind = RwSignal::new("none".to_string());
    let discount_value = RwSignal::new(String::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let saving = RwSignal::new(false);

    // налог и валюта по умолчанию из профиля компании
    spawn_local(async move {
        match profile_api::fetch_business_profile().await {
            Ok(profile) => {
                currency.set(profile.currency.clone());
                draft.update(|d| {
                    d.tax_rate = profile.tax_rate;
                    d.recompute();
                });
            }
            Err(e) => log::warn!("Sale entry: business profile unavailable: {}", e),
        }
    });

    let add_item = move |_| match item_input.with_untracked(ItemInput::to_item) {
        Ok(item) => {
            draft.update(|d| d.add_item(item));
            item_input.set(ItemInput::default());
            set_error.set(None);
        }
        Err(msg) => set_error.set(Some(msg)),
    };

    let apply_discount = move || {
        match discount_from_input(&discount_kind.get_untracked(), &discount_value.get_untracked()) {
            Ok(discount) => {
                draft.update(|d| d.set_discount(discount));
                set_error.set(None);
            }
            Err(msg) => set_error.set(Some(msg)),
        }
    };

    let on_save = move |_| {
        let dto = draft.get_untracked();
        if let Err(msg) = dto.validate() {
            set_error.set(Some(msg));
            return;
        }
        saving.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::create_sale(&dto).await {
                Ok(sale) => {
                    log::info!("Sale created: {} total={}", sale.id, sale.total);
                    saving.set(false);
                    let key = sale_detail_key(&sale.id);
                    ctx.open_tab(&key, &detail_tab_label(&key, &sale.id));
                    on_close.run(());
                }
                Err(e) => {
                    saving.set(false);
                    set_error.set(Some(format!("Не удалось сохранить продажу: {}", e)));
                }
            }
        });
    };

    let money = move |value: f64| format_currency(value, &currency.get());
    let input_field = move |get: fn(&ItemInput) -> String, set: fn(&mut ItemInput, String)| {
        (
            move || item_input.with(get),
            move |ev: leptos::ev::Event| item_input.update(|i| set(i, event_target_value(&ev))),
        )
    };
    let (code_value, code_input) = input_field(|i| i.product_id.clone(), |i, v| i.product_id = v);
    let (name_value, name_input) = input_field(|i| i.product_name.clone(), |i, v| i.product_name = v);
    let (qty_value, qty_input) = input_field(|i| i.quantity.clone(), |i, v| i.quantity = v);
    let (price_value, price_input) = input_field(|i| i.unit_price.clone(), |i, v| i.unit_price = v);
    let (disc_value, disc_input) = input_field(|i| i.discount_percent.clone(), |i, v| i.discount_percent = v);

    view! {
        <PageFrame page_id="a004_sale--entry" category=PAGE_CAT_DETAIL>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Новая продажа"</h1>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=on_save
                        disabled=Signal::derive(move || saving.get() || draft.with(|d| d.items.is_empty()))
                    >
                        {icon("check")}
                        {move || if saving.get() { " Сохранение..." } else { " Провести" }}
                    </Button>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_close.run(()) disabled=saving>
                        "Закрыть"
                    </Button>
                </div>
            </div>

            <div class="page__content">
                {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

                <div class="details-form sale-entry">
                    <div class="form__row">
                        <div class="form__group">
                            <label for="customer_name">"Покупатель"</label>
                            <input
                                type="text"
                                id="customer_name"
                                prop:value=move || draft.with(|d| d.customer_name.clone())
                                on:input=move |ev| draft.update(|d| d.customer_name = event_target_value(&ev))
                            />
                        </div>
                        <div class="form__group">
                            <label for="customer_phone">"Телефон"</label>
                            <input
                                type="tel"
                                id="customer_phone"
                                prop:value=move || draft.with(|d| d.customer_phone.clone().unwrap_or_default())
                                on:input=move |ev| draft.update(|d| d.customer_phone = non_empty(event_target_value(&ev)))
                            />
                        </div>
                        <div class="form__group">
                            <label for="payment_method">"Способ оплаты"</label>
                            <select
                                id="payment_method"
                                prop:value=move || draft.with(|d| d.payment_method.as_str().to_string())
                                on:change=move |ev| {
                                    if let Some(m) = PaymentMethod::from_code(&event_target_value(&ev)) {
                                        draft.update(|d| d.payment_method = m);
                                    }
                                }
                            >
                                {PaymentMethod::all()
                                    .into_iter()
                                    .map(|m| view! { <option value=m.as_str()>{m.display_name()}</option> })
                                    .collect_view()}
                            </select>
                        </div>
                        <div class="form__group">
                            <label for="payment_status">"Оплата"</label>
                            <select
                                id="payment_status"
                                prop:value=move || draft.with(|d| d.payment_status.as_str().to_string())
                                on:change=move |ev| {
                                    if let Some(s) = PaymentStatus::from_code(&event_target_value(&ev)) {
                                        draft.update(|d| d.payment_status = s);
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

                    <h4 class="details-form__section">"Позиции"</h4>
                    <div class="form__row sale-entry__item-input">
                        <input type="text" placeholder="Код" prop:value=code_value on:input=code_input />
                        <input type="text" placeholder="Товар" prop:value=name_value on:input=name_input />
                        <input type="text" inputmode="decimal" placeholder="Кол-во" prop:value=qty_value on:input=qty_input />
                        <input type="text" inputmode="decimal" placeholder="Цена" prop:value=price_value on:input=price_input />
                        <input type="text" inputmode="decimal" placeholder="Скидка, %" prop:value=disc_value on:input=disc_input />
                        <Button appearance=ButtonAppearance::Secondary on_click=add_item>
                            {icon("plus")}
                            " Добавить"
                        </Button>
                    </div>

                    <Table attr:style="width: 100%;">
                        <TableHeader>
                            <TableRow>
                                <TableHeaderCell>"Товар"</TableHeaderCell>
                                <TableHeaderCell>"Кол-во"</TableHeaderCell>
                                <TableHeaderCell>"Цена"</TableHeaderCell>
                                <TableHeaderCell>"Скидка, %"</TableHeaderCell>
                                <TableHeaderCell>"Сумма"</TableHeaderCell>
                                <TableHeaderCell>""</TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            {move || {
                                draft
                                    .with(|d| d.items.clone())
                                    .into_iter()
                                    .enumerate()
                                    .map(|(idx, item)| {
                                        let line_total = item.line_total();
                                        view! {
                                            <TableRow>
                                                <TableCell><TableCellLayout truncate=true>{item.product_name.clone()}</TableCellLayout></TableCell>
                                                <TableCell><TableCellLayout>{number_input_value(item.quantity)}</TableCellLayout></TableCell>
                                                <TableCell><TableCellLayout>{format_money(item.unit_price)}</TableCellLayout></TableCell>
                                                <TableCell><TableCellLayout>{number_input_value(item.discount_percent)}</TableCellLayout></TableCell>
                                                <TableCell><TableCellLayout>{format_money(line_total)}</TableCellLayout></TableCell>
                                                <TableCell>
                                                    <Button
                                                        appearance=ButtonAppearance::Subtle
                                                        on_click=move |_| draft.update(|d| d.remove_item(idx))
                                                        attr:title="Убрать"
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

                    <div class="form__row">
                        <div class="form__group">
                            <label for="discount_kind">"Скидка на чек"</label>
                            <select
                                id="discount_kind"
                                prop:value=move || discount_kind.get()
                                on:change=move |ev| {
                                    discount_kind.set(event_target_value(&ev));
                                    apply_discount();
                                }
                            >
                                <option value="none">"Нет"</option>
                                <option value="percent">"Процент"</option>
                                <option value="fixed">"Сумма"</option>
                            </select>
                        </div>
                        <div class="form__group">
                            <label for="discount_value">"Значение"</label>
                            <input
                                type="text"
                                inputmode="decimal"
                                id="discount_value"
                                disabled=move || discount_kind.with(|k| k == "none")
                                prop:value=move || discount_value.get()
                                on:input=move |ev| discount_value.set(event_target_value(&ev))
                                on:change=move |_| apply_discount()
                            />
                        </div>
                        <div class="form__group">
                            <label for="tax_rate">"Налог, %"</label>
                            <input
                                type="text"
                                inputmode="decimal"
                                id="tax_rate"
                                prop:value=move || draft.with(|d| number_input_value(d.tax_rate))
                                on:change=move |ev| match parse_number(&event_target_value(&ev)).filter(|r| *r >= 0.0) {
                                    Some(rate) => draft.update(|d| {
                                        d.tax_rate = rate;
                                        d.recompute();
                                    }),
                                    None => set_error.set(Some("Ставка налога должна быть неотрицательным числом".into())),
                                }
                            />
                        </div>
                    </div>

                    <div class="form__group">
                        <label for="notes">"Комментарий"</label>
                        <textarea
                            id="notes"
                            rows="2"
                            prop:value=move || draft.with(|d| d.notes.clone().unwrap_or_default())
                            on:input=move |ev| draft.update(|d| d.notes = non_empty(event_target_value(&ev)))
                        />
                    </div>

                    <div class="sale-totals">
                        <div>"Подытог: " {move || money(draft.with(|d| d.totals.subtotal))}</div>
                        <div>"Скидка: " {move || money(draft.with(|d| d.totals.discount))}</div>
                        <div>"Налог: " {move || money(draft.with(|d| d.totals.tax))}</div>
                        <div class="sale-totals__total">"Итого: " {move || money(draft.with(|d| d.totals.total))}</div>
                    </div>
                </div>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, qty: &str, price: &str) -> ItemInput {
        ItemInput {
            product_name: name.into(),
            quantity: qty.into(),
            unit_price: price.into(),
            ..ItemInput::default()
        }
    }

    #[test]
    fn test_item_input() {
        let item = input("Keyboard", "2", "35,5").to_item().unwrap();
        assert_eq!(item.quantity, 2.0);
        assert_eq!(item.unit_price, 35.5);
        assert!(!item.product_id.is_empty());

        let mut with_code = input("Mouse", "1", "50");
        with_code.product_id = " p2 ".into();
        with_code.discount_percent = "10".into();
        let item = with_code.to_item().unwrap();
        assert_eq!(item.product_id, "p2");
        assert_eq!(item.line_total(), 45.0);

        assert!(input("", "1", "1").to_item().is_err());
        assert!(input("X", "0", "1").to_item().is_err());
        assert!(input("X", "1", "").to_item().is_err());
        assert!(input("X", "1e200", "1e200").to_item().is_err());
        assert!(input("X", "2", "9e11").to_item().is_err());
        let mut bad_discount = input("X", "1", "1");
        bad_discount.discount_percent = "150".into();
        assert!(bad_discount.to_item().is_err());
    }

    #[test]
    fn test_discount_from_input() {
        assert_eq!(discount_from_input("none", "abc"), Ok(Discount::None));
        assert_eq!(discount_from_input("percent", "10"), Ok(Discount::Percent(10.0)));
        assert_eq!(discount_from_input("fixed", "5,5"), Ok(Discount::Fixed(5.5)));
        assert!(discount_from_input("percent", "101").is_err());
        assert!(discount_from_input("fixed", "-1").is_err());
    }
}
