use crate::shared::modal::Modal;
use leptos::prelude::*;
use thaw::*;

/// Подтверждение необратимого действия (удаление и т.п.)
#[component]
pub fn ConfirmDialog(
    #[prop(into)] title: String,
    #[prop(into)] message: String,
    #[prop(optional, into)] confirm_label: Option<String>,
    /// Кнопки заблокированы, пока запрос в полёте
    #[prop(into)]
    busy: Signal<bool>,
    on_confirm: Callback<()>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let confirm_label = confirm_label.unwrap_or_else(|| "Удалить".to_string());

    view! {
        <Modal title=title on_close=on_cancel>
            <p class="confirm-dialog__message">{message}</p>
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
                    on_click=move |_| on_confirm.run(())
                    disabled=busy
                >
                    {move || if busy.get() { "Выполняется...".to_string() } else { confirm_label.clone() }}
                </Button>
            </div>
        </Modal>
    }
}
