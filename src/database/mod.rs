pub mod manager;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod update_set;

pub use manager::DatabaseError;
pub use repository::{HealthCheck, Repositories, TodoItemRepository, TodoListRepository, UserRepository};
pub use update_set::{SqlParam, UpdateSet};
