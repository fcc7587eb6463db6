use crate::types::TodoItem;

/// Percentage of completed todos, rounded half up. An empty list is 0%.
pub fn calculate_progress(todos: &[TodoItem]) -> u8 {
    if todos.is_empty() {
        return 0;
    }
    let done = todos.iter().filter(|todo| todo.done).count();
    let total = todos.len();
    // round(100 * done / total) in integers: (200 * done + total) / (2 * total)
    let percent = (200 * done + total) / (2 * total);
    percent.min(100) as u8
}
