//! Оформление возврата по продаже

use contracts::domain::a006_sale_return::aggregate::{RefundMode, ReturnDraft, ReturnLine};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a004_sale::api as sale_api;
use crate::domain::a006_sale_return::api;
use crate::shared::components::table::format_money;
use crate::shared::form_utils::{number_input_value, parse_number};
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DETAIL;

/// Режим возврата из вида ("percent" | "fixed") и значения
pub fn refund_mode_from_input(kind: &str, raw: &str) -> Result<RefundMode, String> {
    let value = parse_number(raw).ok_or("Укажите размер возврата")?;
    match kind {
        "fixed" if value >= 0.0 => Ok(RefundMode::Fixed(value)),
        "fixed" => Err("Сумма возврата не может быть отрицательной".into()),
        _ if (0.0..=100.0).contains(&value) => Ok(RefundMode::Percentage(value)),
        _ => Err("Процент возврата должен быть от 0 до 100".into()),
    }
}

fn mode_parts(mode: RefundMode) -> (&'static str, f64) {
    match mode {
        RefundMode::Percentage(p) => ("percent", p),
        RefundMode::Fixed(a) => ("fixed", a),
    }
}

/// Количество к возврату, ограниченное проданным
pub fn clamp_quantity(line: &ReturnLine, raw: &str) -> f64 {
    parse_number(raw)
        .unwrap_or(0.0)
        .clamp(0.0, line.sold_quantity)
}

#[component]
pub fn SaleReturnForm(sale_id: String, on_close: Callback<()>) -> impl IntoView {
    let draft: RwSignal<Option<ReturnDraft>> = RwSignal::new(None);
    let (error, set_error) = signal::<Option<String>>(None);
    let loading = RwSignal::new(true);
    let saving = RwSignal::new(false);

    spawn_local(async move {
        match sale_api::fetch_sale(&sale_id).await {
            Ok(sale) if sale.status.is_returnable() => draft.set(Some(ReturnDraft::from_sale(&sale))),
            Ok(sale) => set_error.set(Some(format!(
                "Возврат невозможен: продажа в статусе \"{}\"",
                sale.status.display_name()
            ))),
            Err(e) => set_error.set(Some(format!("Ошибка загрузки продажи: {}", e))),
        }
        loading.set(false);
    });

    let update_line = move |idx: usize, f: &dyn Fn(&mut ReturnLine)| {
        draft.update(|d| {
            if let Some(line) = d.as_mut().and_then(|d| d.lines.get_mut(idx)) {
                f(line);
            }
        });
    };

    let on_submit = move |_| {
        let Some(current) = draft.get_untracked() else {
            return;
        };
        if let Err(msg) = current.validate() {
            set_error.set(Some(msg));
            return;
        }
        saving.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::create_return(&current).await {
                Ok(_) => {
                    log::info!(
                        "Return for sale {} created: refund={} full={}",
                        current.sale_id,
                        current.total_refund(),
                        current.is_full_return()
                    );
                    saving.set(false);
                    on_close.run(());
                }
                Err(e) => {
                    saving.set(false);
                    set_error.set(Some(format!("Не удалось оформить возврат: {}", e)));
                }
            }
        });
    };

    view! {
        <PageFrame page_id="a006_sale_return--detail" category=PAGE_CAT_DETAIL>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Возврат по продаже"</h1>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=on_submit
                        disabled=Signal::derive(move || saving.get() || draft.with(|d| d.is_none()))
                    >
                        {icon("package-x")}
                        {move || if saving.get() { " Оформление..." } else { " Оформить возврат" }}
                    </Button>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_close.run(()) disabled=saving>
                        "Отмена"
                    </Button>
                </div>
            </div>

            <div class="page__content">
                {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
                <Show when=move || loading.get()>
                    <Spinner />
                </Show>

                <Show when=move || draft.with(|d| d.is_some())>
                    <div class="details-form">
                        <Table attr:style="width: 100%;">
                            <TableHeader>
                                <TableRow>
                                    <TableHeaderCell min_width=200.0>"Товар"</TableHeaderCell>
                                    <TableHeaderCell>"Продано"</TableHeaderCell>
                                    <TableHeaderCell>"Вернуть"</TableHeaderCell>
                                    <TableHeaderCell>"Цена"</TableHeaderCell>
                                    <TableHeaderCell>"Возврат"</TableHeaderCell>
                                    <TableHeaderCell>"К возврату"</TableHeaderCell>
                                </TableRow>
                            </TableHeader>
                            <TableBody>
                                {move || {
                                    draft
                                        .with(|d| d.as_ref().map(|d| d.lines.clone()).unwrap_or_default())
                                        .into_iter()
                                        .enumerate()
                                        .map(|(idx, line)| {
                                            let (kind, value) = mode_parts(line.refund_mode);
                                            let for_qty = line.clone();
                                            let refund_amount = line.refund_amount();
                                            view! {
                                                <TableRow>
                                                    <TableCell>
                                                        <TableCellLayout truncate=true>{line.product_name.clone()}</TableCellLayout>
                                                    </TableCell>
                                                    <TableCell><TableCellLayout>{number_input_value(line.sold_quantity)}</TableCellLayout></TableCell>
                                                    <TableCell>
                                                        <input
                                                            type="text"
                                                            inputmode="decimal"
                                                            class="input--narrow"
                                                            prop:value=number_input_value(line.quantity)
                                                            on:change=move |ev| {
                                                                let qty = clamp_quantity(&for_qty, &event_target_value(&ev));
                                                                update_line(idx, &|l| l.quantity = qty);
                                                            }
                                                        />
                                                    </TableCell>
                                                    <TableCell><TableCellLayout>{format_money(line.unit_price)}</TableCellLayout></TableCell>
                                                    <TableCell>
                                                        <select
                                                            prop:value=kind
                                                            on:change=move |ev| {
                                                                match refund_mode_from_input(&event_target_value(&ev), &number_input_value(value)) {
                                                                    Ok(mode) => update_line(idx, &|l| l.refund_mode = mode),
                                                                    Err(msg) => set_error.set(Some(msg)),
                                                                }
                                                            }
                                                        >
                                                            <option value="percent">"%"</option>
                                                            <option value="fixed">"Сумма"</option>
                                                        </select>
                                                        <input
                                                            type="text"
                                                            inputmode="decimal"
                                                            class="input--narrow"
                                                            prop:value=number_input_value(value)
                                                            on:change=move |ev| {
                                                                match refund_mode_from_input(kind, &event_target_value(&ev)) {
                                                                    Ok(mode) => {
                                                                        set_error.set(None);
                                                                        update_line(idx, &|l| l.refund_mode = mode);
                                                                    }
                                                                    Err(msg) => set_error.set(Some(msg)),
                                                                }
                                                            }
                                                        />
                                                    </TableCell>
                                                    <TableCell><TableCellLayout>{format_money(refund_amount)}</TableCellLayout></TableCell>
                                                </TableRow>
                                            }
                                        })
                                        .collect_view()
                                }}
                            </TableBody>
                        </Table>

                        <div class="form__group">
                            <label for="return_reason">"Причина возврата"</label>
                            <textarea
                                id="return_reason"
                                rows="2"
                                prop:value=move || draft.with(|d| d.as_ref().map(|d| d.reason.clone()).unwrap_or_default())
                                on:input=move |ev| {
                                    let reason = event_target_value(&ev);
                                    draft.update(|d| {
                                        if let Some(d) = d.as_mut() {
                                            d.reason = reason;
                                        }
                                    });
                                }
                            />
                        </div>

                        <div class="sale-totals">
                            <div class="sale-totals__total">
                                "Итого к возврату: "
                                {move || format_money(draft.with(|d| d.as_ref().map(ReturnDraft::total_refund).unwrap_or(0.0)))}
                            </div>
                            <Show when=move || draft.with(|d| d.as_ref().is_some_and(ReturnDraft::is_full_return))>
                                <span class="badge badge--warning">"Полный возврат"</span>
                            </Show>
                        </div>
                    </div>
                </Show>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> ReturnLine {
        ReturnLine {
            product_id: "p1".into(),
            product_name: "Keyboard".into(),
            sold_quantity: 2.0,
            quantity: 0.0,
            unit_price: 35.5,
            refund_mode: RefundMode::default(),
        }
    }

    #[test]
    fn test_refund_mode_from_input() {
        assert_eq!(refund_mode_from_input("percent", "50"), Ok(RefundMode::Percentage(50.0)));
        assert_eq!(refund_mode_from_input("fixed", "12,5"), Ok(RefundMode::Fixed(12.5)));
        assert!(refund_mode_from_input("percent", "120").is_err());
        assert!(refund_mode_from_input("fixed", "-1").is_err());
        assert!(refund_mode_from_input("fixed", "").is_err());
    }

    #[test]
    fn test_clamp_quantity() {
        let l = line();
        assert_eq!(clamp_quantity(&l, "1"), 1.0);
        assert_eq!(clamp_quantity(&l, "5"), 2.0);
        assert_eq!(clamp_quantity(&l, "-3"), 0.0);
        assert_eq!(clamp_quantity(&l, "abc"), 0.0);
    }

    #[test]
    fn test_mode_parts() {
        assert_eq!(mode_parts(RefundMode::default()), ("percent", 100.0));
        assert_eq!(mode_parts(RefundMode::Fixed(3.0)), ("fixed", 3.0));
    }
}
