//! Shared application state
//!
//! Constructed once in `main` and injected into handlers through
//! `web::Data`; handlers hold no state of their own across requests.

use crate::db::{AnnouncementsDb, PostsDb, ReportsDb, UsersDb};
use crate::identity::IdentityVerifier;
use crate::middleware::AuthPolicy;
use mongodb::Database;
use std::sync::Arc;

pub struct AppState {
    pub db: Database,
    pub verifier: Arc<dyn IdentityVerifier>,
}

impl AppState {
    pub fn new(db: Database, verifier: Arc<dyn IdentityVerifier>) -> Self {
        Self { db, verifier }
    }

    pub fn posts(&self) -> PostsDb {
        PostsDb::new(&self.db)
    }

    pub fn users(&self) -> UsersDb {
        UsersDb::new(&self.db)
    }

    pub fn announcements(&self) -> AnnouncementsDb {
        AnnouncementsDb::new(&self.db)
    }

    pub fn reports(&self) -> ReportsDb {
        ReportsDb::new(&self.db)
    }

    pub fn policy(&self) -> AuthPolicy {
        AuthPolicy::new(self.users())
    }
}
