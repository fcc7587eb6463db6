use leptos::*;

/// Dialog shell. Clicking the backdrop or the close button calls `on_close`
/// unless `locked` is set, which is used while a request is in flight.
#[component]
pub fn Modal(
    #[prop(into)] title: MaybeSignal<String>,
    #[prop(into)] on_close: Callback<()>,
    #[prop(optional, into)] locked: MaybeSignal<bool>,
    #[prop(optional)] large: bool,
    children: Children,
) -> impl IntoView {
    let close = move |_| {
        if !locked.get_untracked() {
            on_close.call(());
        }
    };

    let modal_class = if large { "modal modal-large" } else { "modal" };

    view! {
        <div class="modal-backdrop" on:click=close>
            <div class="modal-wrapper" role="dialog" aria-modal="true">
                <div class=modal_class on:click=|e| e.stop_propagation()>
                    <div class="modal-header">
                        <h3 class="modal-title">{move || title.get()}</h3>
                        <button
                            class="modal-close"
                            type="button"
                            disabled=move || locked.get()
                            on:click=close
                        >
                            "×"
                        </button>
                    </div>
                    {children()}
                </div>
            </div>
        </div>
    }
}
