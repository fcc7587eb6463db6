//! Edit and delete flows for achievement rows and the dialog.
//!
//! A row moves `Viewing -> Editing -> Saving -> Viewing`; cancelling or a
//! no-op save returns to `Viewing` without touching the network, a failed
//! save drops back to `Editing` with the buffer intact. Deletion needs an
//! explicit confirmation step before any request is sent.

use crate::compare::editables_equal;
use crate::error::ApiError;
use crate::repository::AchievementRepository;
use crate::transport::HttpTransport;
use crate::types::{Achievement, AchievementEditable, AchievementUpdateInput};
use crate::validation::{validate, ValidationErrors};

#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    pub id: String,
    /// Snapshot taken when editing started.
    pub baseline: AchievementEditable,
    pub buffer: AchievementEditable,
    pub errors: ValidationErrors,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum RowEditor {
    #[default]
    Viewing,
    Editing(EditSession),
    Saving(EditSession),
}

/// What the caller has to do after [`RowEditor::begin_save`].
#[derive(Debug, Clone, PartialEq)]
pub enum SaveStep {
    NotEditing,
    Invalid(ValidationErrors),
    NoChanges,
    Submit {
        id: String,
        input: AchievementUpdateInput,
    },
}

impl RowEditor {
    /// Starts editing `achievement`, replacing any edit in progress.
    pub fn start(&mut self, achievement: &Achievement) {
        let snapshot = achievement.editable();
        *self = RowEditor::Editing(EditSession {
            id: achievement.id.clone(),
            baseline: snapshot.clone(),
            buffer: snapshot,
            errors: ValidationErrors::default(),
        });
    }

    pub fn session(&self) -> Option<&EditSession> {
        match self {
            RowEditor::Viewing => None,
            RowEditor::Editing(session) | RowEditor::Saving(session) => Some(session),
        }
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.session().map(|session| session.id.as_str())
    }

    pub fn is_editing(&self, id: &str) -> bool {
        self.editing_id() == Some(id)
    }

    pub fn is_saving(&self) -> bool {
        matches!(self, RowEditor::Saving(_))
    }

    pub fn buffer(&self) -> Option<&AchievementEditable> {
        self.session().map(|session| &session.buffer)
    }

    /// The buffer is only writable while editing, not while a save is in flight.
    pub fn buffer_mut(&mut self) -> Option<&mut AchievementEditable> {
        match self {
            RowEditor::Editing(session) => Some(&mut session.buffer),
            _ => None,
        }
    }

    pub fn errors(&self) -> Option<&ValidationErrors> {
        self.session().map(|session| &session.errors)
    }

    /// Discards the buffer. Has no effect while saving.
    pub fn cancel(&mut self) {
        if let RowEditor::Editing(_) = self {
            *self = RowEditor::Viewing;
        }
    }

    pub fn begin_save(&mut self) -> SaveStep {
        let RowEditor::Editing(session) = self else {
            return SaveStep::NotEditing;
        };

        let cleaned = match validate(&session.buffer) {
            Ok(cleaned) => cleaned,
            Err(errors) => {
                session.errors = errors.clone();
                return SaveStep::Invalid(errors);
            }
        };

        if editables_equal(&cleaned, &session.baseline) {
            *self = RowEditor::Viewing;
            return SaveStep::NoChanges;
        }

        let mut session = session.clone();
        session.buffer = cleaned.clone();
        session.errors = ValidationErrors::default();
        let id = session.id.clone();
        *self = RowEditor::Saving(session);

        SaveStep::Submit {
            id,
            input: AchievementUpdateInput::from(cleaned),
        }
    }

    pub fn finish_save(&mut self, succeeded: bool) {
        if let RowEditor::Saving(session) = self {
            *self = if succeeded {
                RowEditor::Viewing
            } else {
                RowEditor::Editing(session.clone())
            };
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    NotEditing,
    Invalid(ValidationErrors),
    NoChanges,
    Saved(Achievement),
    Failed(ApiError),
}

/// Runs the save flow for the row being edited. The network is only touched
/// when the validated buffer differs from the baseline.
pub async fn save_row<T: HttpTransport>(
    repository: &AchievementRepository<T>,
    editor: &mut RowEditor,
) -> SaveOutcome {
    match editor.begin_save() {
        SaveStep::NotEditing => SaveOutcome::NotEditing,
        SaveStep::Invalid(errors) => SaveOutcome::Invalid(errors),
        SaveStep::NoChanges => SaveOutcome::NoChanges,
        SaveStep::Submit { id, input } => match repository.update(&id, &input).await {
            Ok(achievement) => {
                editor.finish_save(true);
                SaveOutcome::Saved(achievement)
            }
            Err(e) => {
                log::error!("Failed to update achievement {}: {}", id, e);
                editor.finish_save(false);
                SaveOutcome::Failed(e)
            }
        },
    }
}

/// Two-step delete: request, then confirm.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DeleteFlow {
    #[default]
    Idle,
    Confirming(String),
    Deleting(String),
}

impl DeleteFlow {
    pub fn request(&mut self, id: impl Into<String>) {
        if !matches!(self, DeleteFlow::Deleting(_)) {
            *self = DeleteFlow::Confirming(id.into());
        }
    }

    pub fn pending_id(&self) -> Option<&str> {
        match self {
            DeleteFlow::Idle => None,
            DeleteFlow::Confirming(id) | DeleteFlow::Deleting(id) => Some(id),
        }
    }

    pub fn is_confirming(&self) -> bool {
        matches!(self, DeleteFlow::Confirming(_))
    }

    pub fn is_deleting(&self) -> bool {
        matches!(self, DeleteFlow::Deleting(_))
    }

    pub fn cancel(&mut self) {
        if let DeleteFlow::Confirming(_) = self {
            *self = DeleteFlow::Idle;
        }
    }

    /// Moves to `Deleting` and returns the id to delete.
    pub fn confirm(&mut self) -> Option<String> {
        let DeleteFlow::Confirming(id) = self else {
            return None;
        };
        let id = id.clone();
        *self = DeleteFlow::Deleting(id.clone());
        Some(id)
    }

    /// Closes the dialog on success, keeps it open for a retry on failure.
    pub fn finish(&mut self, succeeded: bool) {
        if let DeleteFlow::Deleting(id) = self {
            *self = if succeeded {
                DeleteFlow::Idle
            } else {
                DeleteFlow::Confirming(id.clone())
            };
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    NothingToConfirm,
    Deleted(String),
    Failed(String, ApiError),
}

/// Deletes the confirmed row. A record that is already gone counts as
/// deleted.
pub async fn confirm_delete<T: HttpTransport>(
    repository: &AchievementRepository<T>,
    flow: &mut DeleteFlow,
) -> DeleteOutcome {
    let Some(id) = flow.confirm() else {
        return DeleteOutcome::NothingToConfirm;
    };

    match repository.remove(&id).await {
        Ok(()) => {
            flow.finish(true);
            DeleteOutcome::Deleted(id)
        }
        Err(e) if e.is_not_found() => {
            log::info!("Achievement {} was already deleted", id);
            flow.finish(true);
            DeleteOutcome::Deleted(id)
        }
        Err(e) => {
            log::error!("Failed to delete achievement {}: {}", id, e);
            flow.finish(false);
            DeleteOutcome::Failed(id, e)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DialogError {
    Invalid(ValidationErrors),
    Api(ApiError),
}

/// Submits the create/edit dialog: creates when `editing_id` is `None`,
/// otherwise updates every editable field of that record.
pub async fn submit_dialog<T: HttpTransport>(
    repository: &AchievementRepository<T>,
    editing_id: Option<&str>,
    form: &AchievementEditable,
) -> Result<Achievement, DialogError> {
    let cleaned = validate(form).map_err(DialogError::Invalid)?;
    let result = match editing_id {
        Some(id) => {
            repository
                .update(id, &AchievementUpdateInput::from(cleaned))
                .await
        }
        None => repository.create(&cleaned.into()).await,
    };
    result.map_err(|e| {
        log::error!("Failed to submit achievement dialog: {}", e);
        DialogError::Api(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeTransport;
    use crate::transport::{Method, TransportError};
    use crate::types::TodoItem;
    use crate::validation::Field;
    use futures::executor::block_on;
    use serde_json::{json, Value};

    const BASE: &str = "/api/achievements";

    fn achievement() -> Achievement {
        Achievement {
            id: "a1".to_string(),
            title: "Run a marathon".to_string(),
            description: "42km".to_string(),
            category: "Competition".to_string(),
            progress: Some(50),
            todos: Some(vec![
                TodoItem::new(1, "10k", true),
                TodoItem::new(2, "half", false),
            ]),
            created_at: 100,
            updated_at: 200,
        }
    }

    fn stored() -> Value {
        serde_json::to_value(achievement()).unwrap()
    }

    fn repo(transport: &FakeTransport) -> AchievementRepository<&FakeTransport> {
        AchievementRepository::new(transport, BASE).with_clock(|| 300)
    }

    #[test]
    fn test_start_snapshots_baseline() {
        let mut editor = RowEditor::default();
        editor.start(&achievement());
        assert!(editor.is_editing("a1"));
        assert!(!editor.is_editing("b"));
        let session = editor.session().unwrap();
        assert_eq!(session.baseline, session.buffer);
    }

    #[test]
    fn test_unchanged_save_skips_network() {
        let transport = FakeTransport::new();
        let mut editor = RowEditor::default();
        editor.start(&achievement());

        let outcome = block_on(save_row(&repo(&transport), &mut editor));

        assert_eq!(outcome, SaveOutcome::NoChanges);
        assert_eq!(editor, RowEditor::Viewing);
        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn test_blank_new_todo_is_still_a_no_op() {
        let transport = FakeTransport::new();
        let mut editor = RowEditor::default();
        editor.start(&achievement());
        editor.buffer_mut().unwrap().add_todo();

        let outcome = block_on(save_row(&repo(&transport), &mut editor));
        assert_eq!(outcome, SaveOutcome::NoChanges);
        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn test_invalid_save_stays_editing() {
        let transport = FakeTransport::new();
        let mut editor = RowEditor::default();
        editor.start(&achievement());
        editor.buffer_mut().unwrap().title.clear();

        let outcome = block_on(save_row(&repo(&transport), &mut editor));

        let SaveOutcome::Invalid(errors) = outcome else {
            panic!("expected validation errors");
        };
        assert_eq!(errors.get(Field::Title), Some("Title is required"));
        assert!(editor.is_editing("a1"));
        assert_eq!(editor.errors().unwrap().get(Field::Title), Some("Title is required"));
        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn test_changed_save_updates() {
        let transport = FakeTransport::new();
        transport.respond(200, stored());
        let mut updated = stored();
        updated["title"] = json!("Run two marathons");
        transport.respond(200, updated);

        let mut editor = RowEditor::default();
        editor.start(&achievement());
        editor.buffer_mut().unwrap().title = "Run two marathons".to_string();
        editor.buffer_mut().unwrap().toggle_todo(2);

        let outcome = block_on(save_row(&repo(&transport), &mut editor));

        let SaveOutcome::Saved(saved) = outcome else {
            panic!("expected a saved record");
        };
        assert_eq!(saved.title, "Run two marathons");
        assert_eq!(editor, RowEditor::Viewing);
        assert_eq!(transport.methods(), vec![Method::Get, Method::Put]);
        let body = transport.requests()[1].body.clone().unwrap();
        assert_eq!(body["progress"], 100);
        assert_eq!(body["updatedAt"], 300);
    }

    #[test]
    fn test_failed_save_keeps_buffer() {
        let transport = FakeTransport::new();
        transport.fail(TransportError::Timeout);

        let mut editor = RowEditor::default();
        editor.start(&achievement());
        editor.buffer_mut().unwrap().description = "Boston".to_string();

        let outcome = block_on(save_row(&repo(&transport), &mut editor));

        assert!(matches!(outcome, SaveOutcome::Failed(ref e) if e.code() == "TIMEOUT"));
        assert!(editor.is_editing("a1"));
        assert_eq!(editor.buffer().unwrap().description, "Boston");
        assert!(editor.buffer_mut().is_some());
    }

    #[test]
    fn test_buffer_is_locked_while_saving() {
        let mut editor = RowEditor::default();
        editor.start(&achievement());
        editor.buffer_mut().unwrap().category = "Award".to_string();
        assert!(matches!(editor.begin_save(), SaveStep::Submit { .. }));
        assert!(editor.is_saving());
        assert!(editor.buffer_mut().is_none());
        editor.cancel();
        assert!(editor.is_saving());
    }

    #[test]
    fn test_cancel_discards_edit() {
        let mut editor = RowEditor::default();
        editor.start(&achievement());
        editor.buffer_mut().unwrap().title = "changed".to_string();
        editor.cancel();
        assert_eq!(editor, RowEditor::Viewing);
        assert_eq!(editor.begin_save(), SaveStep::NotEditing);
    }

    #[test]
    fn test_delete_waits_for_confirmation() {
        let transport = FakeTransport::new();
        let mut flow = DeleteFlow::default();
        flow.request("a1");

        assert!(flow.is_confirming());
        assert_eq!(transport.request_count(), 0);

        transport.respond(200, stored());
        let outcome = block_on(confirm_delete(&repo(&transport), &mut flow));
        assert_eq!(outcome, DeleteOutcome::Deleted("a1".to_string()));
        assert_eq!(flow, DeleteFlow::Idle);
        assert_eq!(transport.methods(), vec![Method::Delete]);
    }

    #[test]
    fn test_cancelled_delete_makes_no_call() {
        let transport = FakeTransport::new();
        let mut flow = DeleteFlow::default();
        flow.request("a1");
        flow.cancel();

        let outcome = block_on(confirm_delete(&repo(&transport), &mut flow));
        assert_eq!(outcome, DeleteOutcome::NothingToConfirm);
        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn test_delete_of_missing_record_counts_as_deleted() {
        let transport = FakeTransport::new();
        transport.respond(404, json!({ "error": "not_found", "message": "gone" }));
        let mut flow = DeleteFlow::default();
        flow.request("a1");

        let outcome = block_on(confirm_delete(&repo(&transport), &mut flow));
        assert_eq!(outcome, DeleteOutcome::Deleted("a1".to_string()));
    }

    #[test]
    fn test_failed_delete_returns_to_confirming() {
        let transport = FakeTransport::new();
        transport.respond(500, json!({}));
        let mut flow = DeleteFlow::default();
        flow.request("a1");

        let outcome = block_on(confirm_delete(&repo(&transport), &mut flow));
        assert!(matches!(outcome, DeleteOutcome::Failed(ref id, ref e) if id == "a1" && e.status == Some(500)));
        assert_eq!(flow, DeleteFlow::Confirming("a1".to_string()));
    }

    #[test]
    fn test_dialog_create_and_update() {
        let transport = FakeTransport::new();
        transport.respond(201, stored());
        let form = AchievementEditable {
            title: "New".to_string(),
            description: "Desc".to_string(),
            category: "Award".to_string(),
            todos: vec![TodoItem::new(1, "", false)],
        };
        let repository = repo(&transport);

        block_on(submit_dialog(&repository, None, &form)).unwrap();
        let body = transport.requests()[0].body.clone().unwrap();
        assert_eq!(body["todos"], json!([]));
        assert_eq!(body["createdAt"], 300);

        transport.respond(200, stored());
        transport.respond(200, stored());
        block_on(submit_dialog(&repository, Some("a1"), &form)).unwrap();
        assert_eq!(
            transport.methods(),
            vec![Method::Post, Method::Get, Method::Put]
        );
    }

    #[test]
    fn test_dialog_validation_blocks_network() {
        let transport = FakeTransport::new();
        let result = block_on(submit_dialog(
            &repo(&transport),
            None,
            &AchievementEditable::default(),
        ));
        assert!(matches!(result, Err(DialogError::Invalid(_))));
        assert_eq!(transport.request_count(), 0);
    }
}
