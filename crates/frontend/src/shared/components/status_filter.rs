use contracts::shared::list_view::STATUS_ALL;
use leptos::prelude::*;

/// Выпадающий фильтр статуса; первый пункт пропускает все записи
#[component]
pub fn StatusFilter(
    #[prop(into)]
    value: Signal<String>,
    /// (код, подпись)
    options: Vec<(&'static str, &'static str)>,
    on_change: Callback<String>,
) -> impl IntoView {
    view! {
        <select
            class="status-filter"
            prop:value=move || value.get()
            on:change=move |ev| on_change.run(event_target_value(&ev))
        >
            <option value=STATUS_ALL>"Все статусы"</option>
            {options
                .into_iter()
                .map(|(code, label)| view! { <option value=code>{label}</option> })
                .collect_view()}
        </select>
    }
}
