//! Database operations for moderation reports

use crate::error::Result;
use crate::models::{Report, ReportAction, ReportActionRecord, ReportStatus};
use chrono::Utc;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, to_bson};
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};

/// Database operations for the reports collection
pub struct ReportsDb {
    collection: Collection<Report>,
}

impl ReportsDb {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(super::REPORTS_COLLECTION),
        }
    }

    pub async fn create(&self, report: &Report) -> Result<String> {
        let result = self.collection.insert_one(report).await?;
        let report_id = result
            .inserted_id
            .as_object_id()
            .map(|oid| oid.to_hex())
            .unwrap_or_default();

        tracing::info!(
            report_id = %report_id,
            reporter = %report.reporter_uid,
            reported = %report.reported_user_uid,
            "report filed"
        );
        Ok(report_id)
    }

    /// All reports, newest first.
    pub async fn list(&self) -> Result<Vec<Report>> {
        Ok(self
            .collection
            .find(doc! {})
            .sort(doc! { "createdAt": -1 })
            .await?
            .try_collect()
            .await?)
    }

    /// Append one action record and recompute status in a single
    /// document update. Returns the updated report, or None when the id
    /// matches nothing.
    pub async fn apply_action(
        &self,
        id: ObjectId,
        action: ReportAction,
    ) -> Result<Option<Report>> {
        let record = ReportActionRecord {
            kind: action,
            at: Utc::now(),
        };
        let status = ReportStatus::after(action);

        let updated = self
            .collection
            .find_one_and_update(
                doc! { "_id": id },
                doc! {
                    "$push": { "actions": to_bson(&record)? },
                    "$set": { "status": status.as_str() },
                },
            )
            .return_document(ReturnDocument::After)
            .await?;

        if updated.is_some() {
            tracing::info!(
                report_id = %id.to_hex(),
                action = ?action,
                status = status.as_str(),
                "report action applied"
            );
        }
        Ok(updated)
    }
}
