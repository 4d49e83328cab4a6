use crate::shared::icons::icon;
use leptos::prelude::*;

/// Размеры страницы по умолчанию для клиентских списков
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [10, 25, 50, 100];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNav {
    First,
    Prev,
    Next,
    Last,
}

impl PageNav {
    fn icon_name(self) -> &'static str {
        match self {
            PageNav::First => "chevrons-left",
            PageNav::Prev => "chevron-left",
            PageNav::Next => "chevron-right",
            PageNav::Last => "chevrons-right",
        }
    }

    fn title(self) -> &'static str {
        match self {
            PageNav::First => "Первая страница",
            PageNav::Prev => "Предыдущая страница",
            PageNav::Next => "Следующая страница",
            PageNav::Last => "Последняя страница",
        }
    }

    /// Страница перехода; None, если кнопка неактивна
    pub fn target(self, current: usize, total_pages: usize) -> Option<usize> {
        let current = current.max(1);
        match self {
            PageNav::First | PageNav::Prev if current <= 1 => None,
            PageNav::First => Some(1),
            PageNav::Prev => Some(current - 1),
            PageNav::Next | PageNav::Last if current >= total_pages => None,
            PageNav::Next => Some(current + 1),
            PageNav::Last => Some(total_pages),
        }
    }
}

/// Текст "страница / всего (записей)". Пустой список показывается как 0 / 0.
pub fn page_info(page: usize, total_pages: usize, total_count: usize) -> String {
    match total_pages {
        0 => format!("0 / 0 ({})", total_count),
        n => format!("{} / {} ({})", page.clamp(1, n), n, total_count),
    }
}

/// Переключатель страниц. Страницы нумеруются с 1.
#[component]
pub fn PaginationControls(
    #[prop(into)]
    current_page: Signal<usize>,

    #[prop(into)]
    total_pages: Signal<usize>,

    /// Записей после фильтрации
    #[prop(into)]
    total_count: Signal<usize>,

    #[prop(into)]
    page_size: Signal<usize>,

    on_page_change: Callback<usize>,

    on_page_size_change: Callback<usize>,

    #[prop(optional)]
    page_size_options: Option<Vec<usize>>,
) -> impl IntoView {
    let sizes = page_size_options.unwrap_or_else(|| PAGE_SIZE_OPTIONS.to_vec());
    let nav_button = move |nav: PageNav| {
        let target = move || nav.target(current_page.get(), total_pages.get());
        view! {
            <button
                class="pagination-btn"
                title=nav.title()
                disabled=move || target().is_none()
                on:click=move |_| {
                    if let Some(page) = target() {
                        on_page_change.run(page);
                    }
                }
            >
                {icon(nav.icon_name())}
            </button>
        }
    };

    view! {
        <div class="pagination-controls">
            {nav_button(PageNav::First)}
            {nav_button(PageNav::Prev)}
            <span class="pagination-info">
                {move || page_info(current_page.get(), total_pages.get(), total_count.get())}
            </span>
            {nav_button(PageNav::Next)}
            {nav_button(PageNav::Last)}
            <select
                class="page-size-select"
                prop:value=move || page_size.get().to_string()
                on:change=move |ev| {
                    match event_target_value(&ev).parse::<usize>() {
                        Ok(size) if size > 0 => on_page_size_change.run(size),
                        _ => log::warn!("Ignoring page size {:?}", event_target_value(&ev)),
                    }
                }
            >
                {sizes
                    .into_iter()
                    .map(|size| view! { <option value=size.to_string()>{size}</option> })
                    .collect_view()}
            </select>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_info() {
        assert_eq!(page_info(1, 3, 25), "1 / 3 (25)");
        assert_eq!(page_info(0, 0, 0), "0 / 0 (0)");
        assert_eq!(page_info(9, 3, 25), "3 / 3 (25)");
    }

    #[test]
    fn test_nav_targets() {
        assert_eq!(PageNav::First.target(1, 3), None);
        assert_eq!(PageNav::Prev.target(2, 3), Some(1));
        assert_eq!(PageNav::Next.target(2, 3), Some(3));
        assert_eq!(PageNav::Next.target(3, 3), None);
        assert_eq!(PageNav::Last.target(1, 3), Some(3));
        assert_eq!(PageNav::Last.target(1, 0), None);
        assert_eq!(PageNav::Prev.target(0, 3), None);
    }
}
