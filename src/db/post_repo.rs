//! Database operations for posts

use crate::error::Result;
use crate::models::{Comment, Post, PostStatus, SortMode, VoteType};
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, to_bson, Document};
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};

/// Exact-match filters for post listings.
#[derive(Debug, Default, Clone)]
pub struct PostFilter {
    pub author_email: Option<String>,
    pub tag: Option<String>,
}

impl PostFilter {
    fn to_document(&self) -> Document {
        let mut filter = Document::new();
        if let Some(email) = &self.author_email {
            filter.insert("authorEmail", email);
        }
        if let Some(tag) = &self.tag {
            filter.insert("tag", tag);
        }
        filter
    }
}

/// Database operations for the posts collection
pub struct PostsDb {
    collection: Collection<Post>,
}

impl PostsDb {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(super::POSTS_COLLECTION),
        }
    }

    /// List one page of posts plus the total over the filtered set.
    pub async fn list(
        &self,
        filter: &PostFilter,
        page: i64,
        limit: i64,
        sort: SortMode,
    ) -> Result<(Vec<Post>, u64)> {
        let filter_doc = filter.to_document();
        let total = self.collection.count_documents(filter_doc.clone()).await?;
        let skip = ((page - 1) * limit) as u64;

        let posts: Vec<Post> = match sort {
            SortMode::Recent => {
                self.collection
                    .find(filter_doc)
                    .sort(doc! { "createdAt": -1 })
                    .skip(skip)
                    .limit(limit)
                    .await?
                    .try_collect()
                    .await?
            }
            // Net votes is a computed key, so popularity goes through an
            // aggregation pipeline instead of a plain find.
            SortMode::Popularity => {
                let pipeline = vec![
                    doc! { "$match": filter_doc },
                    doc! { "$addFields": { "netVotes": { "$subtract": ["$upVote", "$downVote"] } } },
                    doc! { "$sort": { "netVotes": -1, "createdAt": -1 } },
                    doc! { "$skip": skip as i64 },
                    doc! { "$limit": limit },
                ];

                self.collection
                    .aggregate(pipeline)
                    .with_type::<Post>()
                    .await?
                    .try_collect()
                    .await?
            }
        };

        Ok((posts, total))
    }

    pub async fn find_by_id(&self, id: ObjectId) -> Result<Option<Post>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    /// Insert a new post and return its generated id as a hex string.
    pub async fn create(&self, post: &Post) -> Result<String> {
        let result = self.collection.insert_one(post).await?;
        let post_id = result
            .inserted_id
            .as_object_id()
            .map(|oid| oid.to_hex())
            .unwrap_or_default();

        tracing::info!(post_id = %post_id, author = %post.author_email, "post created");
        Ok(post_id)
    }

    /// Atomically increment one vote counter, returning the updated
    /// post, or None when the id matches nothing.
    pub async fn vote(&self, id: ObjectId, vote: VoteType) -> Result<Option<Post>> {
        let mut counters = Document::new();
        counters.insert(vote.counter_field(), 1);

        Ok(self
            .collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$inc": counters })
            .return_document(ReturnDocument::After)
            .await?)
    }

    /// Append a comment to a post's embedded thread.
    pub async fn append_comment(&self, id: ObjectId, comment: &Comment) -> Result<Option<Post>> {
        Ok(self
            .collection
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$push": { "comments": to_bson(comment)? } },
            )
            .return_document(ReturnDocument::After)
            .await?)
    }

    /// Apply a `$set` update; returns false when no document matched.
    pub async fn update_fields(&self, id: ObjectId, fields: Document) -> Result<bool> {
        let result = self
            .collection
            .update_one(doc! { "_id": id }, doc! { "$set": fields })
            .await?;
        Ok(result.matched_count > 0)
    }

    pub async fn delete(&self, id: ObjectId) -> Result<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        if result.deleted_count > 0 {
            tracing::info!(post_id = %id.to_hex(), "post deleted");
        }
        Ok(result.deleted_count > 0)
    }

    /// Count posts, optionally restricted to one author.
    pub async fn count_by_author(&self, email: Option<&str>) -> Result<u64> {
        let filter = match email {
            Some(email) => doc! { "authorEmail": email },
            None => Document::new(),
        };
        Ok(self.collection.count_documents(filter).await?)
    }

    /// Post counts for the author dashboard: total, published, draft.
    pub async fn author_stats(&self, email: &str) -> Result<(u64, u64, u64)> {
        let total = self
            .collection
            .count_documents(doc! { "authorEmail": email })
            .await?;
        let published = self
            .collection
            .count_documents(
                doc! { "authorEmail": email, "status": PostStatus::Published.as_str() },
            )
            .await?;
        let draft = self
            .collection
            .count_documents(doc! { "authorEmail": email, "status": PostStatus::Draft.as_str() })
            .await?;

        Ok((total, published, draft))
    }

    /// Distinct non-empty tag values across all posts, sorted for a
    /// stable order.
    pub async fn distinct_tags(&self) -> Result<Vec<String>> {
        let values = self.collection.distinct("tag", doc! {}).await?;
        Ok(normalize_tags(values))
    }
}

fn normalize_tags(values: Vec<mongodb::bson::Bson>) -> Vec<String> {
    let mut tags: Vec<String> = values
        .into_iter()
        .filter_map(|value| value.as_str().map(str::to_string))
        .filter(|tag| !tag.trim().is_empty())
        .collect();
    tags.sort();
    tags.dedup();
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::Bson;

    #[test]
    fn test_filter_document() {
        let filter = PostFilter {
            author_email: Some("ada@example.com".into()),
            tag: Some("intro".into()),
        };
        let doc = filter.to_document();
        assert_eq!(doc.get_str("authorEmail").unwrap(), "ada@example.com");
        assert_eq!(doc.get_str("tag").unwrap(), "intro");

        assert!(PostFilter::default().to_document().is_empty());
    }

    #[test]
    fn test_normalize_tags_drops_empty_and_null() {
        let raw = vec![
            Bson::String("rust".into()),
            Bson::String("".into()),
            Bson::String("  ".into()),
            Bson::Null,
            Bson::String("intro".into()),
            Bson::String("rust".into()),
        ];

        let tags = normalize_tags(raw);
        assert_eq!(tags, vec!["intro".to_string(), "rust".to_string()]);
    }
}
