use leptos::*;

/// CSS color for a completion percentage.
pub fn progress_color(value: u8) -> &'static str {
    if value >= 100 {
        "var(--success-color)"
    } else if value >= 50 {
        "var(--primary-color)"
    } else if value > 0 {
        "var(--warning-color)"
    } else {
        "var(--border-color)"
    }
}

/// Progress bar with the percentage next to it.
#[component]
pub fn ProgressBar(
    #[prop(into)] value: MaybeSignal<u8>,
    #[prop(optional, into)] height: Option<String>,
) -> impl IntoView {
    let height = height.unwrap_or_else(|| "8px".to_string());

    let container_style = format!(
        "background: var(--border-color); border-radius: 4px; height: {}; overflow: hidden; flex: 1;",
        height
    );

    view! {
        <div class="progress-cell" style="display: flex; align-items: center; gap: 0.5rem;">
            <div class="progress-bar-container" style=container_style>
                <div style=move || {
                    let v = value.get().min(100);
                    format!(
                        "background: {}; width: {}%; height: {}; display: block; transition: width 0.3s;",
                        progress_color(v),
                        v,
                        height
                    )
                }></div>
            </div>
            <span class="progress-label">{move || format!("{}%", value.get().min(100))}</span>
        </div>
    }
}
