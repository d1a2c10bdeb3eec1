use std::sync::Arc;

use super::ServiceError;
use crate::auth::AuthUser;
use crate::database::models::{NewTodoItem, TodoItem, TodoItemPatch};
use crate::database::{TodoItemRepository, TodoListRepository};

/// Items are reached through their list; every repository call is scoped
/// to lists the caller owns.
pub struct TodoItemService {
    repo: Arc<dyn TodoItemRepository>,
    lists: Arc<dyn TodoListRepository>,
}

impl TodoItemService {
    pub fn new(repo: Arc<dyn TodoItemRepository>, lists: Arc<dyn TodoListRepository>) -> Self {
        Self { repo, lists }
    }

    async fn ensure_list_owned(&self, user: AuthUser, list_id: i64) -> Result<(), ServiceError> {
        self.lists.get_by_id(user, list_id).await?;
        Ok(())
    }

    pub async fn create(&self, user: AuthUser, list_id: i64, item: NewTodoItem) -> Result<i64, ServiceError> {
        Ok(self.repo.create(user, list_id, item).await?)
    }

    pub async fn get_all(&self, user: AuthUser, list_id: i64) -> Result<Vec<TodoItem>, ServiceError> {
        self.ensure_list_owned(user, list_id).await?;
        Ok(self.repo.get_all(user, list_id).await?)
    }

    pub async fn get_by_id(&self, user: AuthUser, list_id: i64, item_id: i64) -> Result<TodoItem, ServiceError> {
        Ok(self.repo.get_by_id(user, list_id, item_id).await?)
    }

    pub async fn update(
        &self,
        user: AuthUser,
        list_id: i64,
        item_id: i64,
        patch: TodoItemPatch,
    ) -> Result<(), ServiceError> {
        if patch.is_empty() {
            return Err(ServiceError::Validation("update structure has no values".to_string()));
        }
        Ok(self.repo.update(user, list_id, item_id, patch).await?)
    }

    pub async fn toggle_done(&self, user: AuthUser, list_id: i64, item_id: i64) -> Result<TodoItem, ServiceError> {
        Ok(self.repo.toggle_done(user, list_id, item_id).await?)
    }

    pub async fn delete(&self, user: AuthUser, list_id: i64, item_id: i64) -> Result<(), ServiceError> {
        Ok(self.repo.delete(user, list_id, item_id).await?)
    }
}
