use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TodoList {
    pub id: i64,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewTodoList {
    #[validate(length(min = 1, max = 255, message = "title is required"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 255, message = "description is too long"))]
    pub description: String,
}

/// Partial update; only the fields that are present are written
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct TodoListPatch {
    #[validate(length(min = 1, max = 255, message = "title must not be empty"))]
    pub title: Option<String>,
    #[validate(length(max = 255, message = "description is too long"))]
    pub description: Option<String>,
}

impl TodoListPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}
