//! Database operations for announcements

use crate::error::Result;
use crate::models::Announcement;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::{Collection, Database};

pub struct AnnouncementsDb {
    collection: Collection<Announcement>,
}

impl AnnouncementsDb {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(super::ANNOUNCEMENTS_COLLECTION),
        }
    }

    /// All announcements, newest first.
    pub async fn list(&self) -> Result<Vec<Announcement>> {
        Ok(self
            .collection
            .find(doc! {})
            .sort(doc! { "createdAt": -1 })
            .await?
            .try_collect()
            .await?)
    }

    pub async fn create(&self, announcement: &Announcement) -> Result<String> {
        let result = self.collection.insert_one(announcement).await?;
        let announcement_id = result
            .inserted_id
            .as_object_id()
            .map(|oid| oid.to_hex())
            .unwrap_or_default();

        tracing::info!(announcement_id = %announcement_id, "announcement published");
        Ok(announcement_id)
    }

    pub async fn delete(&self, id: ObjectId) -> Result<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}
