//! Таблица чекбоксов "ресурс × действие" для одной области (магазина)

use contracts::shared::permissions::{PermissionDraft, ACTIONS, RESOURCES};
use leptos::prelude::*;

#[component]
pub fn PermissionEditor(
    draft: RwSignal<PermissionDraft>,
    /// Магазин (область), права которого редактируются; прочие области не трогаем
    #[prop(into)]
    store_id: String,
    #[prop(optional, into)]
    disabled: Signal<bool>,
) -> impl IntoView {
    let store_id = StoredValue::new(store_id);

    view! {
        <table class="permission-editor">
            <thead>
                <tr>
                    <th>"Ресурс"</th>
                    {ACTIONS.iter().map(|(_, label)| view! { <th>{*label}</th> }).collect_view()}
                    <th>"Все"</th>
                </tr>
            </thead>
            <tbody>
                {RESOURCES
                    .iter()
                    .map(|&(resource, resource_label)| {
                        let all_checked = move || {
                            store_id.with_value(|sid| {
                                draft.with(|d| ACTIONS.iter().all(|(a, _)| d.has(resource, sid, a)))
                            })
                        };
                        view! {
                            <tr>
                                <td>{resource_label}</td>
                                {ACTIONS
                                    .iter()
                                    .map(|&(action, _)| {
                                        view! {
                                            <td>
                                                <input
                                                    type="checkbox"
                                                    disabled=move || disabled.get()
                                                    prop:checked=move || {
                                                        store_id.with_value(|sid| draft.with(|d| d.has(resource, sid, action)))
                                                    }
                                                    on:change=move |ev| {
                                                        let enabled = event_target_checked(&ev);
                                                        store_id.with_value(|sid| {
                                                            draft.update(|d| d.toggle(resource, sid, action, enabled))
                                                        });
                                                    }
                                                />
                                            </td>
                                        }
                                    })
                                    .collect_view()}
                                <td>
                                    <input
                                        type="checkbox"
                                        disabled=move || disabled.get()
                                        prop:checked=all_checked
                                        on:change=move |ev| {
                                            let enabled = event_target_checked(&ev);
                                            store_id.with_value(|sid| {
                                                draft.update(|d| d.set_all(resource, sid, enabled))
                                            });
                                        }
                                    />
                                </td>
                            </tr>
                        }
                    })
                    .collect_view()}
            </tbody>
        </table>
        <div class="permission-editor__summary">
            {move || format!("Выдано прав: {}", draft.with(|d| d.count()))}
        </div>
    }
}
