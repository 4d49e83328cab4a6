//! Заголовок колонки с сортировкой по клику
//!
//! ```rust,ignore
//! <SortableHeaderCell
//!     label="Сумма"
//!     sort_field="paymentAmount"
//!     current_sort_field=list.sort_field()
//!     sort_direction=list.sort_direction()
//!     on_sort=list.on_sort()
//!     align="right"
//! />
//! ```

use crate::shared::list_utils::{get_sort_class, get_sort_indicator};
use contracts::shared::list_view::SortDirection;
use leptos::prelude::*;
use thaw::*;

/// Значение `aria-sort` для колонки
fn aria_sort(active: bool, direction: SortDirection) -> &'static str {
    match (active, direction) {
        (false, _) => "none",
        (true, SortDirection::Asc) => "ascending",
        (true, SortDirection::Desc) => "descending",
    }
}

#[component]
pub fn SortableHeaderCell(
    #[prop(into)]
    label: String,

    /// Имя поля в карте полей записи
    #[prop(into)]
    sort_field: String,

    #[prop(into)]
    current_sort_field: Signal<Option<String>>,

    #[prop(into)]
    sort_direction: Signal<SortDirection>,

    on_sort: Callback<String>,

    #[prop(optional, default = 100.0)]
    min_width: f64,

    /// "left" | "right"
    #[prop(optional, default = "left")]
    align: &'static str,
) -> impl IntoView {
    let field = StoredValue::new(sort_field);
    let active = Memo::new(move |_| {
        current_sort_field.with(|f| field.with_value(|name| f.as_deref() == Some(name.as_str())))
    });
    let current = move || current_sort_field.get();
    let header_class = if align == "right" {
        "table__sortable-header table__sortable-header--right"
    } else {
        "table__sortable-header"
    };

    view! {
        <TableHeaderCell min_width=min_width>
            <div
                class=header_class
                aria-sort=move || aria_sort(active.get(), sort_direction.get())
                on:click=move |_| on_sort.run(field.get_value())
            >
                {label}
                <span class=move || field.with_value(|name| get_sort_class(current().as_deref(), name))>
                    {move || field.with_value(|name| get_sort_indicator(current().as_deref(), name, sort_direction.get()))}
                </span>
            </div>
        </TableHeaderCell>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aria_sort() {
        assert_eq!(aria_sort(false, SortDirection::Desc), "none");
        assert_eq!(aria_sort(true, SortDirection::Asc), "ascending");
        assert_eq!(aria_sort(true, SortDirection::Desc), "descending");
    }
}
