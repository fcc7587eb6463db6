use leptos::*;

/// Select dropdown component. The current value is read from `value` and
/// changes are reported through `on_change`.
#[component]
pub fn SelectInput(
    #[prop(into)] value: Signal<String>,
    #[prop(into)] options: MaybeSignal<Vec<(String, String)>>,
    #[prop(into)] on_change: Callback<String>,
    #[prop(optional, into)] id: Option<String>,
    #[prop(optional, into)] class: Option<String>,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
) -> impl IntoView {
    let full_class = if let Some(extra) = class {
        format!("form-select {}", extra)
    } else {
        "form-select".to_string()
    };

    view! {
        <select
            class=full_class
            id=id
            disabled=disabled
            on:change=move |ev| on_change.call(event_target_value(&ev))
        >
            {move || {
                options.get().into_iter().map(|(val, label)| {
                    let val_clone = val.clone();
                    view! {
                        <option
                            value=val.clone()
                            selected=move || value.get() == val_clone
                        >
                            {label}
                        </option>
                    }
                }).collect_view()
            }}
        </select>
    }
}

/// `(value, label)` pairs for the category selects. `any_label` adds a
/// leading "all" entry.
pub fn category_options(any_label: Option<&str>) -> Vec<(String, String)> {
    any_label
        .map(|label| ("all".to_string(), label.to_string()))
        .into_iter()
        .chain(
            shared::ACHIEVEMENT_CATEGORIES
                .iter()
                .map(|c| (c.to_string(), c.to_string())),
        )
        .collect()
}
