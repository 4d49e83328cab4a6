use crate::app_shell::AppShell;
use crate::layout::global_context::AppGlobalContext;
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    // Текущий магазин и токен читаются из localStorage один раз при старте
    provide_context(AppGlobalContext::load());

    view! {
        <AppShell />
    }
}
