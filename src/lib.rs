//! ForumFlow backend
//!
//! A forum REST API backed by MongoDB and an external identity
//! provider: posts with embedded comment threads and vote counters,
//! a tag directory, announcements, moderation reports, and role-based
//! user management.

pub mod app_state;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod middleware;
pub mod models;
pub mod routes;

pub use app_state::AppState;
pub use config::Config;
pub use error::{AppError, Result};
