//! tab.key → View. Все ключи вкладок собраны здесь.

use super::tab_labels::{INVOICE_PREFIX, SALE_DETAIL_PREFIX, SALE_RETURN_PREFIX};
use crate::domain::a001_employee::ui::list::EmployeeList;
use crate::domain::a002_role_template::ui::list::RoleTemplateList;
use crate::domain::a003_order_tracking::ui::list::OrderTrackingList;
use crate::domain::a004_sale::ui::details::SaleDetails;
use crate::domain::a004_sale::ui::entry::SaleEntry;
use crate::domain::a004_sale::ui::list::SaleList;
use crate::domain::a005_invoice::ui::view::InvoiceView;
use crate::domain::a006_sale_return::ui::form::SaleReturnForm;
use crate::domain::a007_business_profile::ui::form::BusinessProfileForm;
use crate::layout::global_context::AppGlobalContext;
use crate::shared::components::store_picker::RequireStore;
use leptos::prelude::*;

/// Рендерит контент вкладки по ключу; для неизвестных ключей заглушка
pub fn render_tab_content(key: &str, tabs_store: AppGlobalContext) -> AnyView {
    let key_for_close = key.to_string();
    let close = Callback::new(move |_: ()| tabs_store.close_tab(&key_for_close));

    match key {
        "a001_employee" => view! { <RequireStore><EmployeeList /></RequireStore> }.into_any(),
        "a002_role_template" => view! { <RoleTemplateList /> }.into_any(),
        "a003_order_tracking" => {
            view! { <RequireStore><OrderTrackingList /></RequireStore> }.into_any()
        }
        "a004_sale" => view! { <RequireStore><SaleList /></RequireStore> }.into_any(),
        "a004_sale_new" => {
            view! { <RequireStore><SaleEntry on_close=close /></RequireStore> }.into_any()
        }
        "a007_business_profile" => view! { <BusinessProfileForm /> }.into_any(),
        k if k.starts_with(SALE_DETAIL_PREFIX) => {
            let id = k.trim_start_matches(SALE_DETAIL_PREFIX).to_string();
            view! { <SaleDetails id=id /> }.into_any()
        }
        k if k.starts_with(INVOICE_PREFIX) => {
            let sale_id = k.trim_start_matches(INVOICE_PREFIX).to_string();
            view! { <InvoiceView sale_id=sale_id /> }.into_any()
        }
        k if k.starts_with(SALE_RETURN_PREFIX) => {
            let sale_id = k.trim_start_matches(SALE_RETURN_PREFIX).to_string();
            view! { <SaleReturnForm sale_id=sale_id on_close=close /> }.into_any()
        }
        _ => {
            log::warn!("Unknown tab key: {}", key);
            view! { <div class="page">{format!("Неизвестная вкладка: {}", key)}</div> }.into_any()
        }
    }
}
