use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info};
use validator::Validate;

use super::ServiceError;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::{AuthUser, TokenKeys};
use crate::database::models::NewUser;
use crate::database::{DatabaseError, UserRepository};

/// Checked against when the username does not exist, so an unknown user
/// costs the same argon2 work as a wrong password. Parameters match
/// `Argon2::default()`.
const DUMMY_PASSWORD_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$eYyyIsbJwsYlwbTjdvDPVg$+zOHH3T30k1vqK1BUexXw0PQbrPYGXfrKJFFD8w9+Zc";

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignUpInput {
    #[validate(length(min = 1, max = 255, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 255, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignInInput {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Registration, credential checks and bearer tokens
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    keys: TokenKeys,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, keys: TokenKeys) -> Self {
        Self { users, keys }
    }

    pub async fn create_user(&self, input: SignUpInput) -> Result<i64, ServiceError> {
        let password = input.password;
        // argon2 is deliberately slow; keep it off the async workers
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| ServiceError::PasswordHash(e.to_string()))?
            .map_err(|e| ServiceError::PasswordHash(e.to_string()))?;

        let username = input.username.clone();
        let id = self
            .users
            .create_user(NewUser {
                name: input.name,
                username: input.username,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                DatabaseError::UniqueViolation(_) => ServiceError::UsernameTaken(username.clone()),
                other => other.into(),
            })?;

        info!(user_id = id, username = %username, "registered user");
        Ok(id)
    }

    /// Check credentials and issue a token. Unknown user and wrong password
    /// are indistinguishable to the caller.
    pub async fn generate_token(&self, username: &str, password: &str) -> Result<String, ServiceError> {
        let user = match self.users.get_user(username).await {
            Ok(user) => user,
            Err(DatabaseError::NotFound) => {
                debug!(username = %username, "sign-in for unknown user");
                self.check_password(password, DUMMY_PASSWORD_HASH).await?;
                return Err(ServiceError::InvalidCredentials);
            }
            Err(e) => return Err(e.into()),
        };

        if !self.check_password(password, &user.password_hash).await? {
            debug!(username = %username, "sign-in with wrong password");
            return Err(ServiceError::InvalidCredentials);
        }

        self.keys
            .generate(user.id)
            .map_err(|e| ServiceError::Token(e.to_string()))
    }

    async fn check_password(&self, password: &str, hash: &str) -> Result<bool, ServiceError> {
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| ServiceError::PasswordHash(e.to_string()))
    }

    pub fn parse_token(&self, token: &str) -> Result<AuthUser, ServiceError> {
        self.keys
            .validate(token)
            .map(AuthUser::from)
            .map_err(|e| ServiceError::InvalidToken(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::password_hash::PasswordHash;
    use argon2::Params;

    #[test]
    fn dummy_hash_costs_the_same_as_a_real_one() {
        let parsed = PasswordHash::new(DUMMY_PASSWORD_HASH).unwrap();
        let params = Params::try_from(&parsed).unwrap();
        let default = Params::default();

        assert_eq!(parsed.algorithm.as_str(), "argon2id");
        assert_eq!(params.m_cost(), default.m_cost());
        assert_eq!(params.t_cost(), default.t_cost());
        assert_eq!(params.p_cost(), default.p_cost());
        assert!(!verify_password("password123", DUMMY_PASSWORD_HASH));
    }
}
