//! Верхняя панель: меню, текущий магазин, выход

use crate::layout::global_context::AppGlobalContext;
use crate::shared::components::store_picker::StorePicker;
use crate::shared::icons::icon;
use crate::shared::modal::Modal;
use leptos::prelude::*;

#[component]
pub fn TopHeader() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let (show_picker, set_show_picker) = signal(false);

    let store_label = move || {
        ctx.current_store.with(|s| {
            s.as_ref()
                .map(|s| s.label().to_string())
                .unwrap_or_else(|| "Магазин не выбран".to_string())
        })
    };

    view! {
        <div class="top-header">
            <div class="top-header__brand">
                <button class="top-header__icon-btn" on:click=move |_| ctx.toggle_left() title="Навигация">
                    {icon("menu")}
                </button>
                <span class="top-header__title">"Business Admin"</span>
            </div>

            <div class="top-header__actions">
                <button class="top-header__store" on:click=move |_| set_show_picker.set(true) title="Сменить магазин">
                    {icon("store")}
                    <span>{store_label}</span>
                </button>
                <button class="top-header__icon-btn" on:click=move |_| ctx.clear_session() title="Выйти">
                    {icon("log-out")}
                </button>
            </div>

            <Show when=move || show_picker.get()>
                <Modal title="Магазин" on_close=Callback::new(move |_| set_show_picker.set(false))>
                    <StorePicker on_selected=Callback::new(move |_| set_show_picker.set(false)) />
                </Modal>
            </Show>
        </div>
    }
}
