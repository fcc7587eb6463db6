use leptos::*;
use leptos_router::*;
use shared::{
    confirm_delete, Achievement, AchievementsState, DeleteFlow, DeleteOutcome, ListFilters,
    ListQuery, Mutation, RequestState, RowEditor, SaveStep,
};

use crate::api::repository;
use crate::components::achievement_dialog::AchievementDialog;
use crate::components::achievement_table::{next_sort, AchievementTable};
use crate::components::achievement_toolbar::AchievementToolbar;
use crate::components::alert::{error_text, Alert, AlertVariant};
use crate::components::confirm_dialog::ConfirmDialog;
use crate::components::loading::{Loading, LoadingOverlay};
use crate::components::pagination::Pagination;
use crate::utils::browser_timezone;

/// Builds the page URL for `filters`, keeping only non-default values.
pub fn filters_url(path: &str, filters: &ListFilters) -> String {
    let query = filters.to_url_query();
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query)
    }
}

#[component]
pub fn AchievementsPage() -> impl IntoView {
    let tz = browser_timezone();

    // Filters live in the URL so reloads and shared links keep the view
    let query = use_query_map();
    let location = use_location();
    let navigate = use_navigate();

    let filters = create_memo(move |_| {
        query.with(|q| ListFilters::from_lookup(|key| q.get(key).cloned()))
    });

    let set_filters = Callback::new(move |next: ListFilters| {
        let url = filters_url(&location.pathname.get_untracked(), &next);
        navigate(&url, Default::default());
    });

    let state = create_rw_signal(AchievementsState::new());
    let editor = create_rw_signal(RowEditor::default());
    let delete_flow = create_rw_signal(DeleteFlow::default());
    // None = closed, Some(None) = create, Some(Some(a)) = edit
    let dialog = create_rw_signal(Option::<Option<Achievement>>::None);
    let notice = create_rw_signal(Option::<String>::None);

    let fetch = move |current: &ListFilters| {
        let Some(ticket) = state.try_update(|s| s.begin_fetch()) else {
            return;
        };
        let list_query = ListQuery::from_filters(current, tz);

        wasm_bindgen_futures::spawn_local(async move {
            let result = repository().list(&list_query).await;
            if let Err(e) = &result {
                logging::error!("Failed to load achievements: {}", e);
            }
            state.update(|s| {
                s.finish_fetch(ticket, result);
            });
        });
    };

    let refresh = move || fetch(&filters.get_untracked());

    // Load on mount and whenever the filters change
    create_effect(move |_| {
        let current = filters.get();
        fetch(&current);
    });

    let on_sort = Callback::new(move |column: String| {
        let current = filters.get_untracked();
        let (field, order) = next_sort(&current.sort_by, current.order, &column);
        set_filters.call(current.with(|f| f.set_sort(field, order)));
    });

    let save_inline = Callback::new(move |_: ()| {
        let Some(step) = editor.try_update(|e| e.begin_save()) else {
            return;
        };

        match step {
            SaveStep::NotEditing | SaveStep::Invalid(_) => {}
            SaveStep::NoChanges => notice.set(Some("No changes to save".to_string())),
            SaveStep::Submit { id, input } => {
                let started = state
                    .try_update(|s| s.try_begin(&id, RequestState::Saving))
                    .unwrap_or(false);
                if !started {
                    editor.update(|e| e.finish_save(false));
                    return;
                }

                wasm_bindgen_futures::spawn_local(async move {
                    let result = repository().update(&id, &input).await;
                    state.update(|s| s.finish_request(&id));
                    match result {
                        Ok(saved) => {
                            editor.update(|e| e.finish_save(true));
                            state.update(|s| s.apply(Mutation::Updated(saved)));
                            notice.set(Some("Achievement saved".to_string()));
                            refresh();
                        }
                        Err(e) => {
                            logging::error!("Failed to save achievement {}: {}", id, e);
                            editor.update(|ed| ed.finish_save(false));
                            state.update(|s| s.set_error(e));
                        }
                    }
                });
            }
        }
    });

    let request_delete = Callback::new(move |id: String| {
        delete_flow.update(|f| f.request(id));
    });

    let cancel_delete = Callback::new(move |_: ()| {
        delete_flow.update(|f| f.cancel());
    });

    let confirm_pending_delete = Callback::new(move |_: ()| {
        let mut flow = delete_flow.get_untracked();
        if !flow.is_confirming() {
            return;
        }
        let Some(id) = flow.pending_id().map(str::to_string) else {
            return;
        };
        let started = state
            .try_update(|s| s.try_begin(&id, RequestState::Deleting))
            .unwrap_or(false);
        if !started {
            return;
        }

        wasm_bindgen_futures::spawn_local(async move {
            let outcome = confirm_delete(&repository(), &mut flow).await;
            state.update(|s| s.finish_request(&id));
            delete_flow.set(flow);

            match outcome {
                DeleteOutcome::Deleted(id) => {
                    state.update(|s| s.apply(Mutation::Deleted(id)));
                    notice.set(Some("Achievement deleted".to_string()));

                    let current = filters.get_untracked();
                    let emptied = state.with_untracked(|s| s.items().is_empty());
                    if emptied && current.page > 1 {
                        set_filters.call(current.with(|f| f.set_page(current.page - 1)));
                    } else {
                        refresh();
                    }
                }
                DeleteOutcome::Failed(_, e) => state.update(|s| s.set_error(e)),
                DeleteOutcome::NothingToConfirm => {}
            }
        });
    });

    let on_dialog_save = Callback::new(move |saved: Achievement| {
        let created = matches!(dialog.get_untracked(), Some(None));
        dialog.set(None);
        state.update(|s| {
            s.apply(if created {
                Mutation::Created(saved)
            } else {
                Mutation::Updated(saved)
            })
        });
        notice.set(Some(
            if created { "Achievement created" } else { "Achievement saved" }.to_string(),
        ));
        refresh();
    });

    let items = Signal::derive(move || state.with(|s| s.items().to_vec()));
    let loading = Signal::derive(move || state.with(|s| s.is_loading()));
    let sort = Signal::derive(move || filters.with(|f| (f.sort_by.clone(), f.order)));
    let pending_busy = Signal::derive(move || {
        delete_flow.with(|f| {
            f.pending_id()
                .map(|id| state.with(|s| s.is_busy(id)))
                .unwrap_or(false)
        })
    });

    view! {
        <div class="dashboard-header">
            <h1 class="dashboard-title">"Achievements"</h1>
        </div>

        {move || state.with(|s| s.error().cloned()).map(|e| view! {
            <Alert
                variant=AlertVariant::Error
                message=error_text(&e)
                on_dismiss=move |_| state.update(|s| s.clear_error())
            />
        })}

        {move || notice.get().map(|message| view! {
            <Alert
                variant=AlertVariant::Success
                message=message
                on_dismiss=move |_| notice.set(None)
            />
        })}

        <AchievementToolbar
            filters=filters
            on_change=set_filters
            on_create=move |_| dialog.set(Some(None))
        />

        <div class="table-container">
            <Show when=move || loading.get() && !items.with(|i| i.is_empty()) fallback=|| ()>
                <LoadingOverlay />
            </Show>

            {move || {
                if items.with(|i| i.is_empty()) {
                    if loading.get() {
                        view! { <Loading label="Loading achievements..." /> }.into_view()
                    } else {
                        view! {
                            <div class="empty-state">
                                <p>"No achievements match these filters."</p>
                            </div>
                        }
                        .into_view()
                    }
                } else {
                    view! {
                        <AchievementTable
                            items=items
                            state=state
                            editor=editor
                            sort=sort
                            on_sort=on_sort
                            on_save=save_inline
                            on_open_dialog=move |a: Achievement| dialog.set(Some(Some(a)))
                            on_delete=request_delete
                            tz=tz
                        />
                    }
                    .into_view()
                }
            }}
        </div>

        <Pagination
            page=Signal::derive(move || filters.with(|f| f.page))
            total_pages=Signal::derive(move || state.with(|s| s.pagination().total_pages()))
            total_items=Signal::derive(move || {
                state.with(|s| {
                    s.pagination()
                        .items
                        .unwrap_or(s.items().len() as u32)
                })
            })
            page_size=Signal::derive(move || filters.with(|f| f.page_size))
            on_page=move |page: u32| {
                let current = filters.get_untracked();
                set_filters.call(current.with(|f| f.set_page(page)));
            }
            on_page_size=move |size: u32| {
                let current = filters.get_untracked();
                set_filters.call(current.with(|f| f.set_page_size(size)));
            }
        />

        {move || delete_flow.with(|f| f.pending_id().map(str::to_string)).map(|id| {
            let title = state.with_untracked(|s| {
                s.items()
                    .iter()
                    .find(|a| a.id == id)
                    .map(|a| a.title.clone())
                    .unwrap_or_default()
            });
            view! {
                <ConfirmDialog
                    title="Delete achievement"
                    message=format!("Delete \"{}\"? This cannot be undone.", title)
                    busy=pending_busy
                    on_confirm=confirm_pending_delete
                    on_cancel=cancel_delete
                />
            }
        })}

        {move || dialog.get().map(|achievement| view! {
            <AchievementDialog
                achievement=achievement
                on_close=move |_| dialog.set(None)
                on_save=on_dialog_save
            />
        })}
    }
}
