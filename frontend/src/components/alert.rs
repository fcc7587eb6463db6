use leptos::*;
use shared::ApiError;

#[derive(Default, Clone, Copy, PartialEq)]
pub enum AlertVariant {
    #[default]
    Info,
    Success,
    Error,
}

impl AlertVariant {
    pub fn class(&self) -> &'static str {
        match self {
            AlertVariant::Info => "alert",
            AlertVariant::Success => "alert alert-success",
            AlertVariant::Error => "alert alert-error",
        }
    }
}

/// Text shown for a failed request: the friendly message, plus the status
/// when one was received.
pub fn error_text(error: &ApiError) -> String {
    match error.status {
        Some(status) => format!("{} ({} {})", error.message, status, error.code()),
        None => format!("{} ({})", error.message, error.code()),
    }
}

/// Dismissible message banner.
#[component]
pub fn Alert(
    #[prop(optional)] variant: AlertVariant,
    #[prop(into)] message: String,
    #[prop(into)] on_dismiss: Callback<()>,
) -> impl IntoView {
    view! {
        <div class=variant.class() role="alert">
            <span>{message}</span>
            <button
                class="alert-dismiss"
                type="button"
                on:click=move |_| on_dismiss.call(())
            >
                "×"
            </button>
        </div>
    }
}
