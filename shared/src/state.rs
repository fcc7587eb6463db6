use std::collections::HashMap;

use crate::error::ApiError;
use crate::types::{Achievement, ListResponse, Pagination};

/// In-flight request kind for a single achievement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestState {
    #[default]
    Idle,
    Saving,
    Deleting,
}

/// A confirmed change to the list, applied after the backend answered.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Created(Achievement),
    Updated(Achievement),
    Deleted(String),
}

/// Returns the list with `mutation` applied. Created records go first,
/// updates replace in place, unknown ids are left alone.
pub fn apply_mutation(mut items: Vec<Achievement>, mutation: &Mutation) -> Vec<Achievement> {
    match mutation {
        Mutation::Created(achievement) => {
            items.insert(0, achievement.clone());
        }
        Mutation::Updated(achievement) => {
            if let Some(slot) = items.iter_mut().find(|item| item.id == achievement.id) {
                *slot = achievement.clone();
            }
        }
        Mutation::Deleted(id) => {
            items.retain(|item| &item.id != id);
        }
    }
    items
}

/// Identifies one list fetch; only the most recently issued ticket may
/// replace the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// List page state: the current page of achievements, its pagination, and
/// per-row request state.
#[derive(Debug, Clone, Default)]
pub struct AchievementsState {
    items: Vec<Achievement>,
    pagination: Pagination,
    loading: bool,
    error: Option<ApiError>,
    requests: HashMap<String, RequestState>,
    latest_fetch: u64,
}

impl AchievementsState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Achievement] {
        &self.items
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    pub fn set_error(&mut self, error: ApiError) {
        self.error = Some(error);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.latest_fetch += 1;
        self.loading = true;
        self.error = None;
        FetchTicket(self.latest_fetch)
    }

    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.0 == self.latest_fetch
    }

    /// Applies a fetch result unless a newer fetch has been issued since.
    /// Returns whether the result was applied.
    pub fn finish_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<ListResponse, ApiError>,
    ) -> bool {
        if !self.is_current(ticket) {
            log::debug!(
                "Discarding stale list response {} (latest is {})",
                ticket.0,
                self.latest_fetch
            );
            return false;
        }

        self.loading = false;
        match result {
            Ok(response) => {
                self.items = response.data;
                self.pagination = response.pagination;
            }
            Err(e) => {
                self.error = Some(e);
            }
        }
        true
    }

    pub fn request_state(&self, id: &str) -> RequestState {
        self.requests.get(id).copied().unwrap_or_default()
    }

    pub fn is_busy(&self, id: &str) -> bool {
        self.request_state(id) != RequestState::Idle
    }

    /// Marks `id` as busy with `state`. Fails if a request for the row is
    /// already in flight.
    pub fn try_begin(&mut self, id: &str, state: RequestState) -> bool {
        if state == RequestState::Idle || self.is_busy(id) {
            return false;
        }
        self.requests.insert(id.to_string(), state);
        true
    }

    pub fn finish_request(&mut self, id: &str) {
        self.requests.remove(id);
    }

    pub fn apply(&mut self, mutation: Mutation) {
        if let Mutation::Deleted(id) = &mutation {
            self.requests.remove(id);
        }
        let items = std::mem::take(&mut self.items);
        self.items = apply_mutation(items, &mutation);
    }

    /// Drops everything, including in-flight markers.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiErrorKind;

    fn achievement(id: &str, title: &str) -> Achievement {
        Achievement {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            category: "Award".to_string(),
            progress: Some(0),
            todos: None,
            created_at: 1,
            updated_at: 1,
        }
    }

    fn page(ids: &[&str]) -> ListResponse {
        ListResponse {
            data: ids.iter().map(|id| achievement(id, "t")).collect(),
            pagination: Pagination {
                pages: Some(2),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_apply_mutation_created_prepends() {
        let items = vec![achievement("a", "A")];
        let items = apply_mutation(items, &Mutation::Created(achievement("b", "B")));
        let ids: Vec<&str> = items.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_apply_mutation_updated_replaces_in_place() {
        let items = vec![achievement("a", "A"), achievement("b", "B")];
        let items = apply_mutation(items, &Mutation::Updated(achievement("b", "B2")));
        assert_eq!(items[1].title, "B2");
        assert_eq!(items.len(), 2);

        let untouched = apply_mutation(items.clone(), &Mutation::Updated(achievement("z", "Z")));
        assert_eq!(untouched, items);
    }

    #[test]
    fn test_apply_mutation_deleted_removes() {
        let items = vec![achievement("a", "A"), achievement("b", "B")];
        let items = apply_mutation(items, &Mutation::Deleted("a".to_string()));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "b");
    }

    #[test]
    fn test_stale_fetch_is_discarded() {
        let mut state = AchievementsState::new();
        let first = state.begin_fetch();
        let second = state.begin_fetch();

        assert!(state.finish_fetch(second, Ok(page(&["new"]))));
        assert!(!state.finish_fetch(first, Ok(page(&["old"]))));

        assert_eq!(state.items()[0].id, "new");
        assert!(!state.is_loading());
    }

    #[test]
    fn test_fetch_stays_loading_until_latest_answers() {
        let mut state = AchievementsState::new();
        let first = state.begin_fetch();
        let _second = state.begin_fetch();
        state.finish_fetch(first, Ok(page(&["old"])));
        assert!(state.is_loading());
        assert!(state.items().is_empty());
    }

    #[test]
    fn test_fetch_error_keeps_previous_items() {
        let mut state = AchievementsState::new();
        let ticket = state.begin_fetch();
        state.finish_fetch(ticket, Ok(page(&["a"])));

        let ticket = state.begin_fetch();
        state.finish_fetch(ticket, Err(ApiError::timeout()));
        assert_eq!(state.items().len(), 1);
        assert_eq!(state.error().unwrap().kind, ApiErrorKind::Timeout);
        assert_eq!(state.pagination().pages, Some(2));
    }

    #[test]
    fn test_row_requests_block_double_submission() {
        let mut state = AchievementsState::new();
        assert!(state.try_begin("a", RequestState::Deleting));
        assert!(!state.try_begin("a", RequestState::Deleting));
        assert!(!state.try_begin("a", RequestState::Saving));
        assert!(state.try_begin("b", RequestState::Saving));
        assert_eq!(state.request_state("a"), RequestState::Deleting);

        state.finish_request("a");
        assert!(!state.is_busy("a"));
        assert!(!state.try_begin("a", RequestState::Idle));
    }

    #[test]
    fn test_apply_delete_clears_request_state() {
        let mut state = AchievementsState::new();
        let ticket = state.begin_fetch();
        state.finish_fetch(ticket, Ok(page(&["a", "b"])));
        state.try_begin("a", RequestState::Deleting);

        state.apply(Mutation::Deleted("a".to_string()));
        assert_eq!(state.items().len(), 1);
        assert_eq!(state.request_state("a"), RequestState::Idle);

        state.reset();
        assert!(state.items().is_empty());
    }
}
