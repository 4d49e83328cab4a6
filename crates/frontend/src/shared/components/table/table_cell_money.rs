use super::number_format::format_money;
use leptos::prelude::*;
use thaw::*;

/// Ячейка с суммой: два знака, разделитель тысяч, выравнивание вправо
#[component]
pub fn TableCellMoney(
    #[prop(into)]
    value: Signal<f64>,

    /// Подсветить, если сумма отличается от исходной
    #[prop(optional, into)]
    highlight: MaybeProp<bool>,

    #[prop(optional, default = false)]
    bold: bool,
) -> impl IntoView {
    view! {
        <TableCell>
            <TableCellLayout>
                <span
                    class="table-cell-money"
                    class:table-cell-money--changed=move || highlight.get().unwrap_or(false)
                    style:font-weight=if bold { "600" } else { "400" }
                >
                    {move || format_money(value.get())}
                </span>
            </TableCellLayout>
        </TableCell>
    }
}
