use std::collections::BTreeMap;
use std::fmt;

use crate::types::{AchievementEditable, TodoItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Title,
    Description,
    Category,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Description => "description",
            Field::Category => "category",
        }
    }
}

/// Field-scoped validation messages for an edit buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<Field, String>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.errors.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.errors.values().map(String::as_str).collect();
        f.write_str(&messages.join(", "))
    }
}

/// Todos without a title are never persisted.
pub fn prune_blank_todos(todos: Vec<TodoItem>) -> Vec<TodoItem> {
    todos
        .into_iter()
        .filter(|todo| !todo.title.trim().is_empty())
        .collect()
}

/// Drops blank todos, then checks the required fields. Returns the cleaned
/// buffer on success.
pub fn validate(form: &AchievementEditable) -> Result<AchievementEditable, ValidationErrors> {
    let cleaned = AchievementEditable {
        todos: prune_blank_todos(form.todos.clone()),
        ..form.clone()
    };

    let mut errors = ValidationErrors::default();
    if cleaned.title.trim().is_empty() {
        errors.insert(Field::Title, "Title is required");
    }
    if cleaned.description.trim().is_empty() {
        errors.insert(Field::Description, "Description is required");
    }
    if cleaned.category.trim().is_empty() {
        errors.insert(Field::Category, "Category is required");
    }

    if errors.is_empty() {
        Ok(cleaned)
    } else {
        Err(errors)
    }
}
