use leptos::*;

use crate::components::modal::Modal;

/// Yes/no confirmation. Both buttons are disabled while `busy` is set.
#[component]
pub fn ConfirmDialog(
    #[prop(into)] title: String,
    #[prop(into)] message: String,
    #[prop(optional, into)] confirm_label: Option<String>,
    #[prop(into)] busy: Signal<bool>,
    #[prop(into)] on_confirm: Callback<()>,
    #[prop(into)] on_cancel: Callback<()>,
) -> impl IntoView {
    let confirm_label = confirm_label.unwrap_or_else(|| "Delete".to_string());

    view! {
        <Modal title=title on_close=on_cancel locked=busy>
            <div class="modal-body">
                <p>{message}</p>
            </div>
            <div class="modal-footer">
                <button
                    type="button"
                    class="btn btn-outline"
                    disabled=move || busy.get()
                    on:click=move |_| on_cancel.call(())
                >
                    "Cancel"
                </button>
                <button
                    type="button"
                    class="btn btn-danger"
                    disabled=move || busy.get()
                    on:click=move |_| on_confirm.call(())
                >
                    {move || if busy.get() { "Deleting...".to_string() } else { confirm_label.clone() }}
                </button>
            </div>
        </Modal>
    }
}
