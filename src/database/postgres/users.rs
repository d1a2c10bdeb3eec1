use async_trait::async_trait;
use sqlx::PgPool;

use super::USERS_TABLE;
use crate::database::manager::DatabaseError;
use crate::database::models::{NewUser, User};
use crate::database::repository::UserRepository;

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create_user(&self, user: NewUser) -> Result<i64, DatabaseError> {
        let query = format!(
            "INSERT INTO {} (name, username, password_hash) VALUES ($1, $2, $3) RETURNING id",
            USERS_TABLE
        );

        let id: i64 = sqlx::query_scalar(&query)
            .bind(&user.name)
            .bind(&user.username)
            .bind(&user.password_hash)
            .fetch_one(&self.pool)
            .await?;
        Ok(id)
    }

    async fn get_user(&self, username: &str) -> Result<User, DatabaseError> {
        let query = format!(
            "SELECT id, name, username, password_hash FROM {} WHERE username = $1",
            USERS_TABLE
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_one(&self.pool)
            .await?;
        Ok(user)
    }
}
