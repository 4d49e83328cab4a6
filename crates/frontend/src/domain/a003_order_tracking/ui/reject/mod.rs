use crate::shared::modal::Modal;
use contracts::domain::a003_order_tracking::aggregate::RejectOrderDto;
use leptos::prelude::*;
use thaw::*;

/// Диалог отклонения: без причины запрос не отправляется
#[component]
pub fn RejectDialog(
    #[prop(into)] order_label: String,
    #[prop(into)] busy: Signal<bool>,
    on_confirm: Callback<RejectOrderDto>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let reason = RwSignal::new(String::new());
    let (error, set_error) = signal::<Option<String>>(None);

    let submit = move |_| {
        let dto = RejectOrderDto {
            reason: reason.get_untracked().trim().to_string(),
        };
        match dto.validate() {
            Ok(()) => {
                set_error.set(None);
                on_confirm.run(dto);
            }
            Err(msg) => set_error.set(Some(msg)),
        }
    };

    view! {
        <Modal title=format!("Отклонить заказ {}", order_label) on_close=on_cancel>
            {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
            <div class="form__group">
                <label for="reject_reason">"Причина"</label>
                <textarea
                    id="reject_reason"
                    rows="3"
                    prop:value=move || reason.get()
                    on:input=move |ev| reason.set(event_target_value(&ev))
                />
            </div>
            <div class="modal-footer">
                <Button
                    appearance=ButtonAppearance::Secondary
                    on_click=move |_| on_cancel.run(())
                    disabled=busy
                >
                    "Отмена"
                </Button>
                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=submit
                    disabled=Signal::derive(move || busy.get() || reason.with(|r| r.trim().is_empty()))
                >
                    {move || if busy.get() { "Отклонение..." } else { "Отклонить" }}
                </Button>
            </div>
        </Modal>
    }
}
