pub mod auth_service;
pub mod todo_item_service;
pub mod todo_list_service;

use std::sync::Arc;

use thiserror::Error;

use crate::auth::TokenKeys;
use crate::config::AppConfig;
use crate::database::{DatabaseError, HealthCheck, Repositories};

pub use auth_service::{AuthService, SignInInput, SignUpInput};
pub use todo_item_service::TodoItemService;
pub use todo_list_service::TodoListService;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// No owned row matched; deliberately the same for "missing" and "not yours"
    #[error("Not found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("{0}")]
    InvalidToken(String),

    #[error("username '{0}' is already taken")]
    UsernameTaken(String),

    #[error("failed to hash password: {0}")]
    PasswordHash(String),

    #[error("failed to issue token: {0}")]
    Token(String),

    #[error(transparent)]
    Database(DatabaseError),
}

impl From<DatabaseError> for ServiceError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound => ServiceError::NotFound,
            DatabaseError::EmptyUpdate => ServiceError::Validation(err.to_string()),
            other => ServiceError::Database(other),
        }
    }
}

/// The service layer, assembled once from the repositories and config
pub struct Services {
    pub auth: AuthService,
    pub lists: TodoListService,
    pub items: TodoItemService,
    health: Arc<dyn HealthCheck>,
}

impl Services {
    pub fn new(repos: Repositories, config: &AppConfig) -> Self {
        let keys = TokenKeys::from_config(&config.auth);
        Self {
            auth: AuthService::new(repos.users.clone(), keys),
            lists: TodoListService::new(repos.lists.clone()),
            items: TodoItemService::new(repos.items.clone(), repos.lists.clone()),
            health: repos.health,
        }
    }

    pub async fn health_check(&self) -> Result<(), ServiceError> {
        self.health.ping().await.map_err(ServiceError::Database)
    }
}
