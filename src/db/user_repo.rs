//! Database operations for the user directory

use crate::error::Result;
use crate::identity::VerifiedIdentity;
use crate::models::{Role, User};
use chrono::Utc;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, to_bson};
use mongodb::{Collection, Database};

/// Database operations for the users collection
pub struct UsersDb {
    collection: Collection<User>,
}

impl UsersDb {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(super::USERS_COLLECTION),
        }
    }

    /// Upsert the verified identity into the directory. First sight gets
    /// the default role and a creation timestamp; every call refreshes
    /// email, display name, and last login. A single upsert keyed on uid
    /// keeps concurrent requests from the same identity from racing.
    pub async fn sync(&self, identity: &VerifiedIdentity) -> Result<()> {
        let now = to_bson(&Utc::now())?;

        let result = self
            .collection
            .update_one(
                doc! { "uid": &identity.uid },
                doc! {
                    "$set": {
                        "email": &identity.email,
                        "name": identity.display_name(),
                        "lastLogin": now.clone(),
                    },
                    "$setOnInsert": {
                        "role": Role::User.as_str(),
                        "membership": "",
                        "createdAt": now,
                    },
                },
            )
            .upsert(true)
            .await?;

        if result.upserted_id.is_some() {
            tracing::info!(uid = %identity.uid, "user registered");
        }
        Ok(())
    }

    pub async fn find_by_uid(&self, uid: &str) -> Result<Option<User>> {
        Ok(self.collection.find_one(doc! { "uid": uid }).await?)
    }

    /// All users, most recently registered first.
    pub async fn list(&self) -> Result<Vec<User>> {
        Ok(self
            .collection
            .find(doc! {})
            .sort(doc! { "createdAt": -1 })
            .await?
            .try_collect()
            .await?)
    }

    /// Escalate a user to the privileged role; false when uid is unknown.
    pub async fn promote_to_admin(&self, uid: &str) -> Result<bool> {
        let result = self
            .collection
            .update_one(
                doc! { "uid": uid },
                doc! { "$set": { "role": Role::Admin.as_str() } },
            )
            .await?;

        if result.matched_count > 0 {
            tracing::info!(uid = %uid, "user promoted to admin");
        }
        Ok(result.matched_count > 0)
    }

    pub async fn set_membership(&self, uid: &str, membership: &str) -> Result<bool> {
        let result = self
            .collection
            .update_one(
                doc! { "uid": uid },
                doc! { "$set": { "membership": membership } },
            )
            .await?;
        Ok(result.matched_count > 0)
    }
}
