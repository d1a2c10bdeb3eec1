use std::sync::Arc;

use super::ServiceError;
use crate::auth::AuthUser;
use crate::database::models::{NewTodoList, TodoList, TodoListPatch};
use crate::database::TodoListRepository;

pub struct TodoListService {
    repo: Arc<dyn TodoListRepository>,
}

impl TodoListService {
    pub fn new(repo: Arc<dyn TodoListRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, user: AuthUser, list: NewTodoList) -> Result<i64, ServiceError> {
        Ok(self.repo.create(user, list).await?)
    }

    pub async fn get_all(&self, user: AuthUser) -> Result<Vec<TodoList>, ServiceError> {
        Ok(self.repo.get_all(user).await?)
    }

    pub async fn get_by_id(&self, user: AuthUser, list_id: i64) -> Result<TodoList, ServiceError> {
        Ok(self.repo.get_by_id(user, list_id).await?)
    }

    pub async fn update(&self, user: AuthUser, list_id: i64, patch: TodoListPatch) -> Result<(), ServiceError> {
        if patch.is_empty() {
            return Err(ServiceError::Validation("update structure has no values".to_string()));
        }
        Ok(self.repo.update(user, list_id, patch).await?)
    }

    pub async fn delete(&self, user: AuthUser, list_id: i64) -> Result<(), ServiceError> {
        Ok(self.repo.delete(user, list_id).await?)
    }
}
