use leptos::*;
use shared::ListFilters;

use crate::components::select_input::{category_options, SelectInput};
use crate::utils::date_input_value;

/// Parses a percentage input, clamping to 100. Blank or invalid input yields
/// `fallback`.
pub fn parse_percent(input: &str, fallback: u8) -> u8 {
    input
        .trim()
        .parse::<u32>()
        .map(|v| v.min(100) as u8)
        .unwrap_or(fallback)
}

fn optional_date(value: String) -> Option<String> {
    let value = value.trim().to_string();
    (!value.is_empty()).then_some(value)
}

/// Search, category, date range and progress range controls.
#[component]
pub fn AchievementToolbar(
    #[prop(into)] filters: Signal<ListFilters>,
    #[prop(into)] on_change: Callback<ListFilters>,
    #[prop(into)] on_create: Callback<()>,
) -> impl IntoView {
    let change = move |edit: Box<dyn FnOnce(&mut ListFilters)>| {
        let mut next = filters.get_untracked();
        edit(&mut next);
        if next != filters.get_untracked() {
            on_change.call(next);
        }
    };

    let category = Signal::derive(move || {
        filters.with(|f| f.category_filter().unwrap_or("all").to_string())
    });

    view! {
        <div class="toolbar">
            <div class="toolbar-filters">
                <input
                    type="search"
                    class="form-input"
                    placeholder="Search by title"
                    prop:value=move || filters.with(|f| f.search.clone())
                    on:change=move |ev| {
                        let search = event_target_value(&ev);
                        change(Box::new(move |f: &mut ListFilters| f.set_search(search)));
                    }
                />

                <SelectInput
                    value=category
                    options=category_options(Some("All categories"))
                    on_change=move |value: String| change(Box::new(move |f: &mut ListFilters| f.set_category(value)))
                />

                <label class="toolbar-field">
                    <span>"Updated from"</span>
                    <input
                        type="date"
                        class="form-input"
                        prop:value=move || filters.with(|f| date_input_value(f.updated_from.as_deref()))
                        on:change=move |ev| {
                            let from = optional_date(event_target_value(&ev));
                            change(Box::new(move |f: &mut ListFilters| {
                                let to = f.updated_to.clone();
                                f.set_updated_range(from, to);
                            }));
                        }
                    />
                </label>
                <label class="toolbar-field">
                    <span>"to"</span>
                    <input
                        type="date"
                        class="form-input"
                        prop:value=move || filters.with(|f| date_input_value(f.updated_to.as_deref()))
                        on:change=move |ev| {
                            let to = optional_date(event_target_value(&ev));
                            change(Box::new(move |f: &mut ListFilters| {
                                let from = f.updated_from.clone();
                                f.set_updated_range(from, to);
                            }));
                        }
                    />
                </label>

                <label class="toolbar-field">
                    <span>"Progress"</span>
                    <input
                        type="number"
                        class="form-input form-input-sm"
                        min="0"
                        max="100"
                        prop:value=move || filters.with(|f| f.progress_min.to_string())
                        on:change=move |ev| {
                            let min = parse_percent(&event_target_value(&ev), 0);
                            change(Box::new(move |f: &mut ListFilters| {
                                let max = f.progress_max;
                                f.set_progress_range(min, max);
                            }));
                        }
                    />
                    <span>"–"</span>
                    <input
                        type="number"
                        class="form-input form-input-sm"
                        min="0"
                        max="100"
                        prop:value=move || filters.with(|f| f.progress_max.to_string())
                        on:change=move |ev| {
                            let max = parse_percent(&event_target_value(&ev), 100);
                            change(Box::new(move |f: &mut ListFilters| {
                                let min = f.progress_min;
                                f.set_progress_range(min, max);
                            }));
                        }
                    />
                </label>

                <button
                    type="button"
                    class="btn btn-outline"
                    on:click=move |_| change(Box::new(|f: &mut ListFilters| f.reset()))
                >
                    "Reset"
                </button>
            </div>

            <button class="btn btn-primary" on:click=move |_| on_create.call(())>
                "New achievement"
            </button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_percent() {
        assert_eq!(parse_percent("20", 0), 20);
        assert_eq!(parse_percent(" 150 ", 0), 100);
        assert_eq!(parse_percent("", 100), 100);
        assert_eq!(parse_percent("-5", 0), 0);
        assert_eq!(parse_percent("abc", 7), 7);
    }

    #[test]
    fn test_optional_date() {
        assert_eq!(optional_date("2024-01-01".to_string()), Some("2024-01-01".to_string()));
        assert_eq!(optional_date("  ".to_string()), None);
    }
}
