use crate::layout::global_context::AppGlobalContext;
use leptos::prelude::*;

/// Содержимое только при наличии токена.
/// Получение токена происходит вне приложения; без него показываем подсказку.
#[component]
pub fn RequireSession(children: ChildrenFn) -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");

    view! {
        <Show
            when=move || ctx.access_token.with(|t| t.is_some())
            fallback=|| view! {
                <div class="session-missing">
                    <h2>"Сессия не найдена"</h2>
                    <p>"Войдите в систему и откройте страницу снова."</p>
                </div>
            }
        >
            {children()}
        </Show>
    }
}
