use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use shared::{calculate_progress, Achievement, TodoItem};

/// Database model for achievements. Todos are stored as a JSON array.
#[derive(Debug, Clone, FromRow)]
pub struct AchievementRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub progress: i64,
    pub todos: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl AchievementRow {
    pub fn to_shared(&self) -> Result<Achievement, serde_json::Error> {
        let todos: Vec<TodoItem> = serde_json::from_str(&self.todos)?;
        Ok(Achievement {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            progress: Some(self.progress.clamp(0, 100) as u8),
            todos: Some(todos),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Body of POST and PUT requests. The id comes from the path (or is
/// assigned), so any id in the body is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementPayload {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub progress: Option<u8>,
    #[serde(default)]
    pub todos: Option<Vec<TodoItem>>,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub updated_at: Option<i64>,
}

impl AchievementPayload {
    pub fn todos(&self) -> &[TodoItem] {
        self.todos.as_deref().unwrap_or(&[])
    }

    /// Derived from the todos when there are any; otherwise the value sent by
    /// the client, capped at 100.
    pub fn progress(&self) -> u8 {
        resolve_progress(self.progress, self.todos())
    }
}

/// Todos win over a stored or submitted percentage.
pub fn resolve_progress(explicit: Option<u8>, todos: &[TodoItem]) -> u8 {
    match explicit {
        Some(progress) if todos.is_empty() => progress.min(100),
        _ => calculate_progress(todos),
    }
}

/// Paginated list body, returned when `_page` is present.
#[derive(Debug, Clone, Serialize)]
pub struct PageEnvelope {
    pub first: u32,
    pub prev: Option<u32>,
    pub next: Option<u32>,
    pub last: u32,
    pub pages: u32,
    pub items: u32,
    pub data: Vec<Achievement>,
}

impl PageEnvelope {
    pub fn new(data: Vec<Achievement>, page: u32, per_page: u32, items: u32) -> Self {
        let pages = items.div_ceil(per_page.max(1)).max(1);
        Self {
            first: 1,
            prev: (page > 1).then(|| page - 1),
            next: (page < pages).then(|| page + 1),
            last: pages,
            pages,
            items,
            data,
        }
    }
}
