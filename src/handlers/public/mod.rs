pub mod auth;
pub mod health;

pub use auth::{sign_in, sign_up};
pub use health::{health, root};
