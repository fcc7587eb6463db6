use crate::types::AchievementEditable;

/// Structural equality of two edit buffers.
///
/// Todos are compared pairwise in order on `(title, done)`; ids are ignored
/// and a reordering counts as a change.
pub fn editables_equal(a: &AchievementEditable, b: &AchievementEditable) -> bool {
    a.title == b.title
        && a.description == b.description
        && a.category == b.category
        && a.todos.len() == b.todos.len()
        && a
            .todos
            .iter()
            .zip(&b.todos)
            .all(|(x, y)| x.title == y.title && x.done == y.done)
}

pub fn has_changes(current: &AchievementEditable, baseline: &AchievementEditable) -> bool {
    !editables_equal(current, baseline)
}
