//! Argon2 password hashing.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hash `plain_text` with a fresh random salt, returning a PHC string
pub fn hash_password(plain_text: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(plain_text.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Check `plain_text` against a stored PHC string. A malformed hash never
/// verifies.
pub fn verify_password(plain_text: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
