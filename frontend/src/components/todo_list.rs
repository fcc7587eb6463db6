use leptos::*;
use shared::{AchievementEditable, TodoItem};

/// One edit to a todo list, as emitted by [`TodoListEditor`].
#[derive(Debug, Clone, PartialEq)]
pub enum TodoChange {
    Add,
    Toggle(i64),
    Retitle(i64, String),
    Remove(i64),
}

impl TodoChange {
    pub fn apply(self, form: &mut AchievementEditable) {
        match self {
            TodoChange::Add => {
                form.add_todo();
            }
            TodoChange::Toggle(id) => form.toggle_todo(id),
            TodoChange::Retitle(id, title) => form.set_todo_title(id, title),
            TodoChange::Remove(id) => form.remove_todo(id),
        }
    }
}

/// Editable checklist of todos. Todos with a blank title are dropped on save.
#[component]
pub fn TodoListEditor(
    #[prop(into)] todos: Signal<Vec<TodoItem>>,
    #[prop(into)] on_change: Callback<TodoChange>,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
) -> impl IntoView {
    view! {
        <div class="todo-editor">
            <ul class="todo-list">
                <For
                    each=move || todos.get()
                    key=|todo| todo.id
                    children=move |todo| {
                        let id = todo.id;
                        let done = move || {
                            todos.with(|list| list.iter().any(|t| t.id == id && t.done))
                        };
                        view! {
                            <li class="todo-item">
                                <input
                                    type="checkbox"
                                    prop:checked=done
                                    disabled=move || disabled.get()
                                    on:change=move |_| on_change.call(TodoChange::Toggle(id))
                                />
                                <input
                                    type="text"
                                    class="form-input form-input-sm"
                                    placeholder="Todo"
                                    prop:value=todo.title.clone()
                                    disabled=move || disabled.get()
                                    on:input=move |ev| {
                                        on_change.call(TodoChange::Retitle(id, event_target_value(&ev)))
                                    }
                                />
                                <button
                                    type="button"
                                    class="btn btn-outline btn-sm"
                                    title="Remove todo"
                                    disabled=move || disabled.get()
                                    on:click=move |_| on_change.call(TodoChange::Remove(id))
                                >
                                    "×"
                                </button>
                            </li>
                        }
                    }
                />
            </ul>
            <button
                type="button"
                class="btn btn-outline btn-sm"
                disabled=move || disabled.get()
                on:click=move |_| on_change.call(TodoChange::Add)
            >
                "+ Add todo"
            </button>
        </div>
    }
}

/// Read-only checklist used in view mode.
#[component]
pub fn TodoSummary(todos: Vec<TodoItem>) -> impl IntoView {
    if todos.is_empty() {
        return view! { <span class="text-muted">"No todos"</span> }.into_view();
    }

    view! {
        <ul class="todo-summary">
            {todos.into_iter().map(|todo| {
                let class = if todo.done { "todo-done" } else { "todo-open" };
                view! {
                    <li class=class>
                        {if todo.done { "☑ " } else { "☐ " }}
                        {todo.title}
                    </li>
                }
            }).collect_view()}
        </ul>
    }
    .into_view()
}
