//! MongoDB wiring and per-collection repositories
//!
//! The database handle is created once at startup and passed explicitly
//! into every repository; nothing here is global.

pub mod announcement_repo;
pub mod post_repo;
pub mod report_repo;
pub mod user_repo;

pub use announcement_repo::AnnouncementsDb;
pub use post_repo::{PostFilter, PostsDb};
pub use report_repo::ReportsDb;
pub use user_repo::UsersDb;

use crate::config::DatabaseConfig;
use anyhow::Context;
use mongodb::bson::doc;
use mongodb::{Client, Database};

pub const POSTS_COLLECTION: &str = "posts";
pub const USERS_COLLECTION: &str = "users";
pub const ANNOUNCEMENTS_COLLECTION: &str = "announcements";
pub const REPORTS_COLLECTION: &str = "reports";

/// Connect to MongoDB and verify reachability with a ping. A failed
/// ping at startup is fatal for the process.
pub async fn connect(config: &DatabaseConfig) -> anyhow::Result<Database> {
    let client = Client::with_uri_str(&config.uri)
        .await
        .context("invalid MongoDB connection string")?;

    let database = client.database(&config.name);
    database
        .run_command(doc! { "ping": 1 })
        .await
        .context("MongoDB ping failed")?;

    tracing::info!(database = %config.name, "connected to MongoDB");
    Ok(database)
}
