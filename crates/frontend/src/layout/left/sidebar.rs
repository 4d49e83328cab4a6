//! Боковое меню

use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::tab_label_for_key;
use crate::shared::icons::icon;
use leptos::prelude::*;

struct MenuGroup {
    label: &'static str,
    /// (tab key, icon)
    items: &'static [(&'static str, &'static str)],
}

const MENU: &[MenuGroup] = &[
    MenuGroup {
        label: "Продажи",
        items: &[
            ("a004_sale_new", "plus"),
            ("a004_sale", "cart"),
            ("a003_order_tracking", "truck"),
        ],
    },
    MenuGroup {
        label: "Персонал",
        items: &[("a001_employee", "users"), ("a002_role_template", "shield")],
    },
    MenuGroup {
        label: "Настройки",
        items: &[("a007_business_profile", "building")],
    },
];

#[component]
pub fn Sidebar() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");

    view! {
        <div class="app-sidebar__content">
            {MENU
                .iter()
                .map(|group| {
                    view! {
                        <div class="app-sidebar__group">
                            <div class="app-sidebar__group-label">{group.label}</div>
                            {group
                                .items
                                .iter()
                                .map(|&(key, icon_name)| {
                                    let label = tab_label_for_key(key);
                                    view! {
                                        <div
                                            class="app-sidebar__item"
                                            class:app-sidebar__item--active=move || {
                                                ctx.active.with(|a| a.as_deref() == Some(key))
                                            }
                                            on:click=move |_| ctx.open_tab(key, label)
                                        >
                                            {icon(icon_name)}
                                            <span>{label}</span>
                                        </div>
                                    }
                                })
                                .collect_view()}
                        </div>
                    }
                })
                .collect_view()}
        </div>
    }
}
