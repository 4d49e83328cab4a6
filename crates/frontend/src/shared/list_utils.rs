/// Утилиты для списков: поиск с задержкой, подсветка совпадений, индикаторы сортировки
use contracts::shared::list_view::SortDirection;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::request_seq::RequestSequence;

/// Задержка поиска после последнего нажатия клавиши
pub const SEARCH_DEBOUNCE_MS: u32 = 300;

/// Разбить текст на куски; `true` помечает совпадение с фильтром (без учёта регистра)
pub fn split_matches(text: &str, filter: &str) -> Vec<(String, bool)> {
    let filter = filter.trim();
    let text_lower = text.to_lowercase();
    // lowercase может менять длину в байтах, тогда позиции не совпадут
    if filter.is_empty() || text_lower.len() != text.len() {
        return vec![(text.to_string(), false)];
    }
    let filter_lower = filter.to_lowercase();

    let mut parts = Vec::new();
    let mut last_pos = 0;
    while let Some(pos) = text_lower[last_pos..].find(&filter_lower) {
        let start = last_pos + pos;
        let end = start + filter_lower.len();
        if !text.is_char_boundary(start) || !text.is_char_boundary(end) {
            break;
        }
        if start > last_pos {
            parts.push((text[last_pos..start].to_string(), false));
        }
        parts.push((text[start..end].to_string(), true));
        last_pos = end;
    }
    if last_pos < text.len() {
        parts.push((text[last_pos..].to_string(), false));
    }
    parts
}

/// Подсветка совпадений в тексте (case-insensitive)
pub fn highlight_matches(text: &str, filter: &str) -> AnyView {
    let parts = split_matches(text, filter);
    view! {
        <>
            {parts
                .into_iter()
                .map(|(chunk, hit)| {
                    if hit {
                        view! { <mark class="search-hit">{chunk}</mark> }.into_any()
                    } else {
                        view! { <span>{chunk}</span> }.into_any()
                    }
                })
                .collect_view()}
        </>
    }
    .into_any()
}

/// Получить индикатор сортировки для заголовка
pub fn get_sort_indicator(current_field: Option<&str>, field: &str, direction: SortDirection) -> &'static str {
    match (current_field == Some(field), direction) {
        (true, SortDirection::Asc) => " ▲",
        (true, SortDirection::Desc) => " ▼",
        (false, _) => " ⇅",
    }
}

pub fn get_sort_class(current_field: Option<&str>, field: &str) -> &'static str {
    if current_field == Some(field) {
        "table__sort-indicator table__sort-indicator--active"
    } else {
        "table__sort-indicator"
    }
}

/// Поле поиска с задержкой и кнопкой очистки.
///
/// `on_change` вызывается через `SEARCH_DEBOUNCE_MS` после последнего ввода;
/// промежуточные значения отбрасываются.
#[component]
pub fn SearchInput(
    /// Текущее значение фильтра (для подсветки поля)
    #[prop(into)]
    value: Signal<String>,
    #[prop(into)]
    on_change: Callback<String>,
    #[prop(optional, into)]
    placeholder: String,
) -> impl IntoView {
    let placeholder = if placeholder.is_empty() {
        "Поиск...".to_string()
    } else {
        placeholder
    };

    let (input_value, set_input_value) = signal(value.get_untracked());
    let pending = StoredValue::new(RequestSequence::new());
    let sequence = pending.get_value();
    on_cleanup(move || sequence.invalidate());

    let handle_input_change = move |new_value: String| {
        set_input_value.set(new_value.clone());
        let sequence = pending.get_value();
        let ticket = sequence.next();
        spawn_local(async move {
            TimeoutFuture::new(SEARCH_DEBOUNCE_MS).await;
            if sequence.is_current(ticket) {
                on_change.run(new_value);
            }
        });
    };

    let is_filter_active = move || !value.get().trim().is_empty();

    let clear_filter = move |_| {
        pending.with_value(|s| s.invalidate());
        set_input_value.set(String::new());
        on_change.run(String::new());
    };

    view! {
        <div class="search-input" class:search-input--active=is_filter_active>
            <input
                type="text"
                placeholder=placeholder
                prop:value=move || input_value.get()
                on:input=move |ev| handle_input_change(event_target_value(&ev))
            />
            <Show when=move || !input_value.get().is_empty()>
                <button class="search-input__clear" on:click=clear_filter title="Очистить">
                    {crate::shared::icons::icon("x")}
                </button>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_matches() {
        assert_eq!(
            split_matches("Ann Anderson", "an"),
            vec![
                ("An".to_string(), true),
                ("n ".to_string(), false),
                ("An".to_string(), true),
                ("derson".to_string(), false),
            ]
        );
        assert_eq!(split_matches("Bob", ""), vec![("Bob".to_string(), false)]);
        assert_eq!(split_matches("Bob", "x"), vec![("Bob".to_string(), false)]);
    }

    #[test]
    fn test_split_matches_cyrillic() {
        let parts = split_matches("Иван Петров", "пет");
        assert_eq!(parts[1], ("Пет".to_string(), true));
    }

    #[test]
    fn test_sort_indicator() {
        assert_eq!(get_sort_indicator(Some("name"), "name", SortDirection::Asc), " ▲");
        assert_eq!(get_sort_indicator(Some("name"), "name", SortDirection::Desc), " ▼");
        assert_eq!(get_sort_indicator(None, "name", SortDirection::Asc), " ⇅");
        assert_eq!(get_sort_class(Some("email"), "name"), "table__sort-indicator");
    }
}
