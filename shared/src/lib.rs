pub mod compare;
pub mod decode;
pub mod editor;
pub mod error;
pub mod progress;
pub mod query;
pub mod repository;
pub mod state;
pub mod transport;
pub mod types;
pub mod validation;

#[cfg(test)]
mod testing;

pub use compare::{editables_equal, has_changes};
pub use decode::{decode_list_response, Decoded};
pub use editor::{
    confirm_delete, save_row, submit_dialog, DeleteFlow, DeleteOutcome, DialogError,
    EditSession, RowEditor, SaveOutcome, SaveStep,
};
pub use error::{ApiError, ApiErrorKind};
pub use progress::calculate_progress;
pub use query::{ListFilters, ListQuery};
pub use repository::{AchievementRepository, DEFAULT_BASE_URL};
pub use state::{apply_mutation, AchievementsState, FetchTicket, Mutation, RequestState};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, Method, TransportError};
pub use types::*;
pub use validation::{validate, Field, ValidationErrors};
