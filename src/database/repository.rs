use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::auth::AuthUser;
use crate::database::manager::DatabaseError;
use crate::database::models::{
    NewTodoItem, NewTodoList, NewUser, TodoItem, TodoItemPatch, TodoList, TodoListPatch, User,
};
use crate::database::postgres::{PgHealthCheck, PgTodoItemRepository, PgTodoListRepository, PgUserRepository};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: NewUser) -> Result<i64, DatabaseError>;

    async fn get_user(&self, username: &str) -> Result<User, DatabaseError>;
}

/// Lists, always scoped to the owning user
#[async_trait]
pub trait TodoListRepository: Send + Sync {
    async fn create(&self, user: AuthUser, list: NewTodoList) -> Result<i64, DatabaseError>;

    async fn get_all(&self, user: AuthUser) -> Result<Vec<TodoList>, DatabaseError>;

    async fn get_by_id(&self, user: AuthUser, list_id: i64) -> Result<TodoList, DatabaseError>;

    async fn update(&self, user: AuthUser, list_id: i64, patch: TodoListPatch) -> Result<(), DatabaseError>;

    /// Removes the list together with every item linked to it
    async fn delete(&self, user: AuthUser, list_id: i64) -> Result<(), DatabaseError>;
}

/// Items, scoped to the owning user through the list they belong to
#[async_trait]
pub trait TodoItemRepository: Send + Sync {
    /// Fails with `NotFound` unless `list_id` belongs to the user
    async fn create(&self, user: AuthUser, list_id: i64, item: NewTodoItem) -> Result<i64, DatabaseError>;

    async fn get_all(&self, user: AuthUser, list_id: i64) -> Result<Vec<TodoItem>, DatabaseError>;

    async fn get_by_id(&self, user: AuthUser, list_id: i64, item_id: i64) -> Result<TodoItem, DatabaseError>;

    async fn update(
        &self,
        user: AuthUser,
        list_id: i64,
        item_id: i64,
        patch: TodoItemPatch,
    ) -> Result<(), DatabaseError>;

    async fn toggle_done(&self, user: AuthUser, list_id: i64, item_id: i64) -> Result<TodoItem, DatabaseError>;

    async fn delete(&self, user: AuthUser, list_id: i64, item_id: i64) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn ping(&self) -> Result<(), DatabaseError>;
}

/// Every repository the services need, behind trait objects
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub lists: Arc<dyn TodoListRepository>,
    pub items: Arc<dyn TodoItemRepository>,
    pub health: Arc<dyn HealthCheck>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            lists: Arc::new(PgTodoListRepository::new(pool.clone())),
            items: Arc::new(PgTodoItemRepository::new(pool.clone())),
            health: Arc::new(PgHealthCheck::new(pool)),
        }
    }
}
