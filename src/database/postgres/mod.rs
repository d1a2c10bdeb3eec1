//! Postgres implementations of the repository traits.

mod todo_items;
mod todo_lists;
mod users;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::{self, DatabaseError};
use crate::database::repository::HealthCheck;

pub use todo_items::PgTodoItemRepository;
pub use todo_lists::PgTodoListRepository;
pub use users::PgUserRepository;

pub(crate) const USERS_TABLE: &str = "users";
pub(crate) const TODO_LISTS_TABLE: &str = "todo_lists";
pub(crate) const USERS_LISTS_TABLE: &str = "users_lists";
pub(crate) const TODO_ITEMS_TABLE: &str = "todo_items";
pub(crate) const LISTS_ITEMS_TABLE: &str = "lists_items";

pub struct PgHealthCheck {
    pool: PgPool,
}

impl PgHealthCheck {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthCheck for PgHealthCheck {
    async fn ping(&self) -> Result<(), DatabaseError> {
        manager::health_check(&self.pool).await
    }
}
