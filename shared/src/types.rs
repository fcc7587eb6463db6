use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Achievement Types
// ============================================================================

/// Categories offered by the category selectors.
pub const ACHIEVEMENT_CATEGORIES: &[&str] = &[
    "Technical",
    "Education",
    "Certification",
    "Award",
    "Competition",
    "Project",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    #[serde(deserialize_with = "deserialize_todo_id")]
    pub id: i64,
    pub title: String,
    pub done: bool,
}

impl TodoItem {
    pub fn new(id: i64, title: impl Into<String>, done: bool) -> Self {
        Self {
            id,
            title: title.into(),
            done,
        }
    }
}

/// An achievement as stored by the backend.
///
/// `progress` is a cache of the todo completion percentage and is recomputed
/// by the repository on every create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(
        default,
        deserialize_with = "deserialize_progress",
        skip_serializing_if = "Option::is_none"
    )]
    pub progress: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub todos: Option<Vec<TodoItem>>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl Achievement {
    pub fn todos(&self) -> &[TodoItem] {
        self.todos.as_deref().unwrap_or_default()
    }

    pub fn progress(&self) -> u8 {
        self.progress.unwrap_or(0)
    }

    pub fn editable(&self) -> AchievementEditable {
        AchievementEditable::from(self)
    }
}

/// Mock JSON servers hand out numeric ids as often as string ones.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}

/// Todo ids arrive as numbers or as numeric strings.
fn deserialize_todo_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTodoId {
        Number(i64),
        Text(String),
    }

    match RawTodoId::deserialize(deserializer)? {
        RawTodoId::Number(id) => Ok(id),
        RawTodoId::Text(id) => id
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("todo id {:?} is not numeric", id))),
    }
}

/// Accepts fractional percentages, rounded and clamped to `0..=100`.
fn deserialize_progress<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = Option::<f64>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if !value.is_finite() {
        return Err(de::Error::custom("progress must be a finite number"));
    }
    Ok(Some(value.round().clamp(0.0, 100.0) as u8))
}

/// The user-editable projection of an achievement, used by the inline editor
/// and the create/edit dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementEditable {
    pub title: String,
    pub description: String,
    pub category: String,
    pub todos: Vec<TodoItem>,
}

impl From<&Achievement> for AchievementEditable {
    fn from(achievement: &Achievement) -> Self {
        Self {
            title: achievement.title.clone(),
            description: achievement.description.clone(),
            category: achievement.category.clone(),
            todos: achievement.todos().to_vec(),
        }
    }
}

impl AchievementEditable {
    pub fn todo(&self, todo_id: i64) -> Option<&TodoItem> {
        self.todos.iter().find(|todo| todo.id == todo_id)
    }

    /// Appends an empty todo and returns its id (one past the current maximum).
    pub fn add_todo(&mut self) -> i64 {
        let id = self.todos.iter().map(|todo| todo.id).max().unwrap_or(0) + 1;
        self.todos.push(TodoItem::new(id, "", false));
        id
    }

    pub fn toggle_todo(&mut self, todo_id: i64) {
        if let Some(todo) = self.todos.iter_mut().find(|todo| todo.id == todo_id) {
            todo.done = !todo.done;
        }
    }

    pub fn set_todo_title(&mut self, todo_id: i64, title: impl Into<String>) {
        if let Some(todo) = self.todos.iter_mut().find(|todo| todo.id == todo_id) {
            todo.title = title.into();
        }
    }

    pub fn remove_todo(&mut self, todo_id: i64) {
        self.todos.retain(|todo| todo.id != todo_id);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementCreateInput {
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub todos: Vec<TodoItem>,
}

impl From<AchievementEditable> for AchievementCreateInput {
    fn from(form: AchievementEditable) -> Self {
        Self {
            title: form.title,
            description: form.description,
            category: form.category,
            todos: form.todos,
        }
    }
}

/// Partial update; absent fields keep the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementUpdateInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub todos: Option<Vec<TodoItem>>,
}

impl From<AchievementEditable> for AchievementUpdateInput {
    fn from(form: AchievementEditable) -> Self {
        Self {
            title: Some(form.title),
            description: Some(form.description),
            category: Some(form.category),
            todos: Some(form.todos),
        }
    }
}

// ============================================================================
// List Types
// ============================================================================

/// Pagination metadata as reported by the backend. Every field is optional;
/// a response without any of them is treated as a single page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<u32>,
}

impl Pagination {
    pub fn is_empty(&self) -> bool {
        *self == Pagination::default()
    }

    pub fn total_pages(&self) -> u32 {
        self.pages.unwrap_or(1).max(1)
    }

    pub fn total_items(&self) -> u32 {
        self.items.unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListResponse {
    pub data: Vec<Achievement>,
    #[serde(flatten)]
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

impl FromStr for SortOrder {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(()),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sortable columns: (wire field, label).
pub const SORT_FIELDS: &[(&str, &str)] = &[
    ("updatedAt", "Updated"),
    ("createdAt", "Created"),
    ("title", "Title"),
    ("category", "Category"),
    ("progress", "Progress"),
];

// ============================================================================
// API Response Types
// ============================================================================

/// Error body returned by the backend for non-2xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
