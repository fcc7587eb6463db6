use leptos::*;
use shared::{
    submit_dialog, Achievement, AchievementEditable, ApiError, DialogError, Field,
    ValidationErrors,
};

use crate::api::repository;
use crate::components::alert::{error_text, Alert, AlertVariant};
use crate::components::modal::Modal;
use crate::components::select_input::{category_options, SelectInput};
use crate::components::todo_list::{TodoChange, TodoListEditor};

/// Create/edit dialog. `achievement` is `None` for create.
#[component]
pub fn AchievementDialog(
    achievement: Option<Achievement>,
    #[prop(into)] on_close: Callback<()>,
    #[prop(into)] on_save: Callback<Achievement>,
) -> impl IntoView {
    let editing_id = achievement.as_ref().map(|a| a.id.clone());
    let is_edit = editing_id.is_some();

    let form = create_rw_signal(
        achievement
            .as_ref()
            .map(AchievementEditable::from)
            .unwrap_or_else(|| AchievementEditable {
                category: shared::ACHIEVEMENT_CATEGORIES[0].to_string(),
                ..Default::default()
            }),
    );
    let errors = create_rw_signal(ValidationErrors::default());
    let error = create_rw_signal(Option::<ApiError>::None);
    let saving = create_rw_signal(false);

    let field_error = move |field: Field| errors.with(|e| e.get(field).map(str::to_string));

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if saving.get_untracked() {
            return;
        }

        saving.set(true);
        error.set(None);
        errors.set(ValidationErrors::default());

        let editing_id = editing_id.clone();
        let current = form.get_untracked();

        wasm_bindgen_futures::spawn_local(async move {
            let repo = repository();
            match submit_dialog(&repo, editing_id.as_deref(), &current).await {
                Ok(saved) => {
                    saving.set(false);
                    on_save.call(saved);
                }
                Err(DialogError::Invalid(invalid)) => {
                    errors.set(invalid);
                    saving.set(false);
                }
                Err(DialogError::Api(e)) => {
                    error.set(Some(e));
                    saving.set(false);
                }
            }
        });
    };

    let title = if is_edit { "Edit Achievement" } else { "New Achievement" };
    let submit_text = if is_edit { "Save Changes" } else { "Create" };
    let saving_text = if is_edit { "Saving..." } else { "Creating..." };

    let todos = Signal::derive(move || form.with(|f| f.todos.clone()));
    let category = Signal::derive(move || form.with(|f| f.category.clone()));

    view! {
        <Modal title=title.to_string() on_close=on_close locked=saving large=true>
            {move || error.get().map(|e| view! {
                <Alert
                    variant=AlertVariant::Error
                    message=error_text(&e)
                    on_dismiss=move |_| error.set(None)
                />
            })}

            <form on:submit=on_submit novalidate>
                <div class="modal-body">
                    <div class="form-group">
                        <label class="form-label" for="achievement-title">"Title"</label>
                        <input
                            type="text"
                            id="achievement-title"
                            class="form-input"
                            placeholder="e.g. AWS Solutions Architect"
                            prop:value=move || form.with(|f| f.title.clone())
                            on:input=move |ev| form.update(|f| f.title = event_target_value(&ev))
                        />
                        {move || field_error(Field::Title).map(|e| view! { <p class="form-error">{e}</p> })}
                    </div>

                    <div class="form-group">
                        <label class="form-label" for="achievement-description">"Description"</label>
                        <textarea
                            id="achievement-description"
                            class="form-input"
                            rows="4"
                            prop:value=move || form.with(|f| f.description.clone())
                            on:input=move |ev| form.update(|f| f.description = event_target_value(&ev))
                        />
                        {move || field_error(Field::Description).map(|e| view! { <p class="form-error">{e}</p> })}
                    </div>

                    <div class="form-group">
                        <label class="form-label" for="achievement-category">"Category"</label>
                        <SelectInput
                            id="achievement-category"
                            value=category
                            options=category_options(None)
                            on_change=move |value: String| form.update(|f| f.category = value)
                        />
                        {move || field_error(Field::Category).map(|e| view! { <p class="form-error">{e}</p> })}
                    </div>

                    <div class="form-group">
                        <label class="form-label">"Todos"</label>
                        <TodoListEditor
                            todos=todos
                            disabled=saving
                            on_change=move |change: TodoChange| form.update(|f| change.apply(f))
                        />
                        <p class="form-hint">
                            {move || format!(
                                "Progress after saving: {}%",
                                shared::calculate_progress(&form.with(|f| f.todos.clone()))
                            )}
                        </p>
                    </div>
                </div>

                <div class="modal-footer">
                    <button
                        type="button"
                        class="btn btn-outline"
                        on:click=move |_| on_close.call(())
                        disabled=move || saving.get()
                    >
                        "Cancel"
                    </button>
                    <button
                        type="submit"
                        class="btn btn-primary"
                        disabled=move || saving.get()
                    >
                        {move || if saving.get() { saving_text } else { submit_text }}
                    </button>
                </div>
            </form>
        </Modal>
    }
}
