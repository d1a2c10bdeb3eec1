//! Multi-user to-do list REST API.
//!
//! Requests flow handler → service → repository → Postgres. The bearer
//! middleware turns a token into an [`auth::AuthUser`], which every layer
//! below receives explicitly and uses to scope its queries.

pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;

pub use config::AppConfig;
pub use routes::{app, AppState};
