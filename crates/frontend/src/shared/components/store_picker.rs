//! Выбор текущего магазина и охранник для экранов, которым он нужен

use crate::layout::global_context::AppGlobalContext;
use crate::system::auth::storage::CurrentStore;
use leptos::prelude::*;
use thaw::*;

#[component]
pub fn StorePicker(
    /// Вызывается после выбора
    #[prop(optional)]
    on_selected: Option<Callback<()>>,
) -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let current = ctx.current_store.get_untracked();
    let store_id = RwSignal::new(current.as_ref().map(|s| s.id.clone()).unwrap_or_default());
    let store_name = RwSignal::new(current.map(|s| s.name).unwrap_or_default());
    let (error, set_error) = signal::<Option<String>>(None);

    let on_select = move |_| {
        let id = store_id.get_untracked();
        if id.trim().is_empty() {
            set_error.set(Some("Укажите ID магазина".into()));
            return;
        }
        set_error.set(None);
        ctx.select_store(CurrentStore::new(&id, &store_name.get_untracked()));
        if let Some(cb) = on_selected {
            cb.run(());
        }
    };

    view! {
        <div class="store-picker">
            <h3 class="store-picker__title">"Выберите магазин"</h3>
            {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
            <div class="form__group">
                <Label>"ID магазина"</Label>
                <Input value=store_id placeholder="store id" />
            </div>
            <div class="form__group">
                <Label>"Название"</Label>
                <Input value=store_name placeholder="необязательно" />
            </div>
            <Button appearance=ButtonAppearance::Primary on_click=on_select>
                "Выбрать"
            </Button>
        </div>
    }
}

/// Показывает содержимое только при выбранном магазине, иначе выбор магазина
#[component]
pub fn RequireStore(children: ChildrenFn) -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");

    view! {
        <Show
            when=move || ctx.current_store.with(|s| s.is_some())
            fallback=|| view! { <StorePicker /> }
        >
            {children()}
        </Show>
    }
}
