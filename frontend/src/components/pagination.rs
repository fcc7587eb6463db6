use leptos::*;
use shared::query::PAGE_SIZE_OPTIONS;

use crate::components::select_input::SelectInput;

/// Page numbers to show around `current`, at most `width` of them.
pub fn page_window(current: u32, total: u32, width: u32) -> Vec<u32> {
    let total = total.max(1);
    let width = width.clamp(1, total);
    let current = current.clamp(1, total);

    let start = current
        .saturating_sub(width / 2)
        .max(1)
        .min(total - width + 1);
    (start..start + width).collect()
}

#[component]
pub fn Pagination(
    #[prop(into)] page: Signal<u32>,
    #[prop(into)] total_pages: Signal<u32>,
    #[prop(into)] total_items: Signal<u32>,
    #[prop(into)] page_size: Signal<u32>,
    #[prop(into)] on_page: Callback<u32>,
    #[prop(into)] on_page_size: Callback<u32>,
) -> impl IntoView {
    let size_value = Signal::derive(move || page_size.get().to_string());
    let size_options: Vec<(String, String)> = PAGE_SIZE_OPTIONS
        .iter()
        .map(|size| (size.to_string(), format!("{} / page", size)))
        .collect();

    view! {
        <div class="pagination">
            <span class="pagination-summary">
                {move || format!("{} items", total_items.get())}
            </span>

            <div class="pagination-pages">
                <button
                    class="btn btn-outline btn-sm"
                    disabled=move || page.get() <= 1
                    on:click=move |_| on_page.call(page.get_untracked().saturating_sub(1).max(1))
                >
                    "‹"
                </button>
                {move || {
                    let current = page.get();
                    page_window(current, total_pages.get(), 5)
                        .into_iter()
                        .map(|n| {
                            let class = if n == current {
                                "btn btn-primary btn-sm"
                            } else {
                                "btn btn-outline btn-sm"
                            };
                            view! {
                                <button class=class on:click=move |_| on_page.call(n)>
                                    {n}
                                </button>
                            }
                        })
                        .collect_view()
                }}
                <button
                    class="btn btn-outline btn-sm"
                    disabled=move || page.get() >= total_pages.get()
                    on:click=move |_| on_page.call(page.get_untracked() + 1)
                >
                    "›"
                </button>
            </div>

            <SelectInput
                class="form-select-sm"
                value=size_value
                options=size_options
                on_change=move |value: String| {
                    if let Ok(size) = value.parse::<u32>() {
                        on_page_size.call(size);
                    }
                }
            />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_window() {
        assert_eq!(page_window(1, 1, 5), vec![1]);
        assert_eq!(page_window(1, 10, 5), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(6, 10, 5), vec![4, 5, 6, 7, 8]);
        assert_eq!(page_window(10, 10, 5), vec![6, 7, 8, 9, 10]);
        assert_eq!(page_window(3, 3, 5), vec![1, 2, 3]);
        assert_eq!(page_window(0, 0, 5), vec![1]);
    }
}
