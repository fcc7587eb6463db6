use leptos::*;

#[component]
pub fn Loading(#[prop(optional, into)] label: Option<String>) -> impl IntoView {
    view! {
        <div class="loading" aria-busy="true">
            <div class="spinner"></div>
            {label.map(|label| view! { <span class="loading-label">{label}</span> })}
        </div>
    }
}

/// Spinner laid over the table while a refetch keeps the old rows visible.
#[component]
pub fn LoadingOverlay() -> impl IntoView {
    view! {
        <div class="table-overlay">
            <div class="spinner"></div>
        </div>
    }
}
