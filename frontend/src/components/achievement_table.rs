use chrono_tz::Tz;
use leptos::*;
use shared::{
    calculate_progress, Achievement, AchievementEditable, AchievementsState, Field, RowEditor,
    SortOrder, TodoItem,
};

use crate::components::progress_bar::ProgressBar;
use crate::components::select_input::{category_options, SelectInput};
use crate::components::todo_list::{TodoChange, TodoListEditor, TodoSummary};
use crate::utils::format_timestamp;

/// Sort after clicking the `clicked` column header: the active column flips
/// direction, any other column starts ascending.
pub fn next_sort(field: &str, order: SortOrder, clicked: &str) -> (String, SortOrder) {
    if field == clicked {
        (field.to_string(), order.toggled())
    } else {
        (clicked.to_string(), SortOrder::Asc)
    }
}

pub fn sort_indicator(field: &str, order: SortOrder, column: &str) -> &'static str {
    match (field == column, order) {
        (false, _) => "",
        (true, SortOrder::Asc) => " ▲",
        (true, SortOrder::Desc) => " ▼",
    }
}

#[component]
fn SortHeader(
    label: &'static str,
    column: &'static str,
    #[prop(into)] sort: Signal<(String, SortOrder)>,
    #[prop(into)] on_sort: Callback<String>,
) -> impl IntoView {
    view! {
        <th class="sortable" on:click=move |_| on_sort.call(column.to_string())>
            {label}
            {move || sort.with(|(field, order)| sort_indicator(field, *order, column))}
        </th>
    }
}

/// Achievements table with inline editing of one row at a time.
#[component]
pub fn AchievementTable(
    #[prop(into)] items: Signal<Vec<Achievement>>,
    state: RwSignal<AchievementsState>,
    editor: RwSignal<RowEditor>,
    #[prop(into)] sort: Signal<(String, SortOrder)>,
    #[prop(into)] on_sort: Callback<String>,
    #[prop(into)] on_save: Callback<()>,
    #[prop(into)] on_open_dialog: Callback<Achievement>,
    #[prop(into)] on_delete: Callback<String>,
    tz: Tz,
) -> impl IntoView {
    view! {
        <table class="table achievements-table">
            <thead>
                <tr>
                    <SortHeader label="Title" column="title" sort=sort on_sort=on_sort />
                    <th>"Description"</th>
                    <SortHeader label="Category" column="category" sort=sort on_sort=on_sort />
                    <th>"Todos"</th>
                    <SortHeader label="Progress" column="progress" sort=sort on_sort=on_sort />
                    <SortHeader label="Updated" column="updatedAt" sort=sort on_sort=on_sort />
                    <th>"Actions"</th>
                </tr>
            </thead>
            <tbody>
                <For
                    each=move || items.get()
                    key=|a| (a.id.clone(), a.updated_at)
                    children=move |achievement| view! {
                        <AchievementRow
                            achievement=achievement
                            state=state
                            editor=editor
                            on_save=on_save
                            on_open_dialog=on_open_dialog
                            on_delete=on_delete
                            tz=tz
                        />
                    }
                />
            </tbody>
        </table>
    }
}

#[component]
fn AchievementRow(
    achievement: Achievement,
    state: RwSignal<AchievementsState>,
    editor: RwSignal<RowEditor>,
    on_save: Callback<()>,
    on_open_dialog: Callback<Achievement>,
    on_delete: Callback<String>,
    tz: Tz,
) -> impl IntoView {
    let id = store_value(achievement.id.clone());
    let record = store_value(achievement);

    let is_editing = create_memo(move |_| id.with_value(|id| editor.with(|e| e.is_editing(id))));
    let is_busy = create_memo(move |_| id.with_value(|id| state.with(|s| s.is_busy(id))));

    let view_mode = move || {
        let a = record.get_value();
        let updated = format_timestamp(a.updated_at, tz);
        view! {
            <td class="cell-title">{a.title.clone()}</td>
            <td class="cell-description">{a.description.clone()}</td>
            <td><span class="badge">{a.category.clone()}</span></td>
            <td><TodoSummary todos=a.todos().to_vec() /></td>
            <td><ProgressBar value=a.progress() /></td>
            <td class="cell-date">{updated}</td>
            <td class="cell-actions">
                <button
                    class="btn btn-outline btn-sm"
                    disabled=move || is_busy.get() || editor.with(|e| e.is_saving())
                    on:click=move |_| editor.update(|e| e.start(&record.get_value()))
                >
                    "Edit"
                </button>
                <button
                    class="btn btn-outline btn-sm"
                    disabled=move || is_busy.get()
                    on:click=move |_| on_open_dialog.call(record.get_value())
                >
                    "Details"
                </button>
                <button
                    class="btn btn-danger btn-sm"
                    disabled=move || is_busy.get()
                    on:click=move |_| on_delete.call(id.get_value())
                >
                    {move || if is_busy.get() { "Working..." } else { "Delete" }}
                </button>
            </td>
        }
    };

    view! {
        <tr class:row-editing=move || is_editing.get() class:row-busy=move || is_busy.get()>
            <Show when=move || is_editing.get() fallback=view_mode>
                <InlineEditor editor=editor on_save=on_save />
            </Show>
        </tr>
    }
}

/// Cells of the row being edited, bound to the editor's buffer.
#[component]
fn InlineEditor(editor: RwSignal<RowEditor>, on_save: Callback<()>) -> impl IntoView {
    let saving = Signal::derive(move || editor.with(|e| e.is_saving()));
    let text = move |read: fn(&AchievementEditable) -> String| {
        editor.with(|e| e.buffer().map(read).unwrap_or_default())
    };
    let edit = move |write: Box<dyn FnOnce(&mut AchievementEditable)>| {
        editor.update(|e| {
            if let Some(buffer) = e.buffer_mut() {
                write(buffer);
            }
        })
    };
    let field_error = move |field: Field| {
        editor.with(|e| e.errors().and_then(|errors| errors.get(field)).map(str::to_string))
    };

    let category = Signal::derive(move || text(|b| b.category.clone()));
    let todos: Signal<Vec<TodoItem>> =
        Signal::derive(move || editor.with(|e| e.buffer().map(|b| b.todos.clone()).unwrap_or_default()));
    let progress = Signal::derive(move || calculate_progress(&todos.get()));

    view! {
        <td>
            <input
                type="text"
                class="form-input form-input-sm"
                prop:value=move || text(|b| b.title.clone())
                disabled=move || saving.get()
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    edit(Box::new(move |b: &mut AchievementEditable| b.title = value));
                }
            />
            {move || field_error(Field::Title).map(|e| view! { <p class="form-error">{e}</p> })}
        </td>
        <td>
            <textarea
                class="form-input form-input-sm"
                rows="2"
                prop:value=move || text(|b| b.description.clone())
                disabled=move || saving.get()
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    edit(Box::new(move |b: &mut AchievementEditable| b.description = value));
                }
            />
            {move || field_error(Field::Description).map(|e| view! { <p class="form-error">{e}</p> })}
        </td>
        <td>
            <SelectInput
                class="form-select-sm"
                value=category
                options=category_options(None)
                disabled=saving
                on_change=move |value: String| edit(Box::new(move |b: &mut AchievementEditable| b.category = value))
            />
            {move || field_error(Field::Category).map(|e| view! { <p class="form-error">{e}</p> })}
        </td>
        <td>
            <TodoListEditor
                todos=todos
                disabled=saving
                on_change=move |change: TodoChange| edit(Box::new(move |b: &mut AchievementEditable| change.apply(b)))
            />
        </td>
        <td><ProgressBar value=progress /></td>
        <td></td>
        <td class="cell-actions">
            <button
                class="btn btn-primary btn-sm"
                disabled=move || saving.get()
                on:click=move |_| on_save.call(())
            >
                {move || if saving.get() { "Saving..." } else { "Save" }}
            </button>
            <button
                class="btn btn-outline btn-sm"
                disabled=move || saving.get()
                on:click=move |_| editor.update(|e| e.cancel())
            >
                "Cancel"
            </button>
        </td>
    }
}
