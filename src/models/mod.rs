//! Persistent document types for the forum collections
//!
//! Field names are camelCase on the wire and in storage. Timestamps are
//! `chrono::DateTime<Utc>` values serialized as RFC 3339 strings, so
//! lexicographic order in the database equals chronological order.

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize, Serializer};

/// Serialize an optional document id as its hex form instead of the
/// extended-JSON `{"$oid": ...}` wrapper.
pub fn serialize_object_id<S>(id: &Option<ObjectId>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match id {
        Some(oid) => serializer.serialize_str(&oid.to_hex()),
        None => serializer.serialize_none(),
    }
}

/// A discussion post with its embedded comment thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(
        rename = "_id",
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_object_id",
        default
    )]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub author_image: String,
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub author_email: String,
    pub post_title: String,
    pub post_description: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub up_vote: i64,
    #[serde(default)]
    pub down_vote: i64,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PostStatus>,
}

/// A comment embedded in a post. Created once, never edited.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub text: String,
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub author_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Published,
    Draft,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Published => "published",
            PostStatus::Draft => "draft",
        }
    }
}

/// Listing order for posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    /// Creation time descending
    Recent,
    /// Net votes descending, creation time descending as tie-break
    Popularity,
}

impl SortMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "recent" => Some(SortMode::Recent),
            "popularity" => Some(SortMode::Popularity),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteType {
    Upvote,
    Downvote,
}

impl VoteType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "upvote" => Some(VoteType::Upvote),
            "downvote" => Some(VoteType::Downvote),
            _ => None,
        }
    }

    /// Counter field incremented by this vote.
    pub fn counter_field(&self) -> &'static str {
        match self {
            VoteType::Upvote => "upVote",
            VoteType::Downvote => "downVote",
        }
    }
}

/// A directory entry for a verified identity, upserted on every
/// authenticated request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(
        rename = "_id",
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_object_id",
        default
    )]
    pub id: Option<ObjectId>,
    pub uid: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub membership: String,
    pub created_at: DateTime<Utc>,
    pub last_login: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    #[serde(
        rename = "_id",
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_object_id",
        default
    )]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub author_image: String,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// A moderation report filed against a user's content. Reporter fields
/// come from the verified identity, never from client input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(
        rename = "_id",
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_object_id",
        default
    )]
    pub id: Option<ObjectId>,
    pub reporter_uid: String,
    pub reporter_email: String,
    pub reported_user_uid: String,
    pub reported_user_email: String,
    pub content_id: String,
    #[serde(default)]
    pub content_snippet: String,
    pub reason: String,
    pub status: ReportStatus,
    #[serde(default)]
    pub actions: Vec<ReportActionRecord>,
    pub created_at: DateTime<Utc>,
}

/// One applied moderation action, appended per admin call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportActionRecord {
    #[serde(rename = "type")]
    pub kind: ReportAction,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportAction {
    Warn,
    Delete,
    Ban,
    Resolve,
}

impl ReportAction {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "warn" => Some(ReportAction::Warn),
            "delete" => Some(ReportAction::Delete),
            "ban" => Some(ReportAction::Ban),
            "resolve" => Some(ReportAction::Resolve),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    ActionTaken,
    Resolved,
}

impl ReportStatus {
    /// Status a report moves to after an action is applied.
    pub fn after(action: ReportAction) -> Self {
        match action {
            ReportAction::Resolve => ReportStatus::Resolved,
            _ => ReportStatus::ActionTaken,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::ActionTaken => "action_taken",
            ReportStatus::Resolved => "resolved",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_action_parsing() {
        assert_eq!(ReportAction::parse("warn"), Some(ReportAction::Warn));
        assert_eq!(ReportAction::parse("delete"), Some(ReportAction::Delete));
        assert_eq!(ReportAction::parse("ban"), Some(ReportAction::Ban));
        assert_eq!(ReportAction::parse("resolve"), Some(ReportAction::Resolve));
        assert_eq!(ReportAction::parse("nuke"), None);
        assert_eq!(ReportAction::parse(""), None);
    }

    #[test]
    fn test_report_status_transition() {
        assert_eq!(
            ReportStatus::after(ReportAction::Resolve),
            ReportStatus::Resolved
        );
        assert_eq!(
            ReportStatus::after(ReportAction::Warn),
            ReportStatus::ActionTaken
        );
        assert_eq!(
            ReportStatus::after(ReportAction::Delete),
            ReportStatus::ActionTaken
        );
        assert_eq!(
            ReportStatus::after(ReportAction::Ban),
            ReportStatus::ActionTaken
        );
    }

    #[test]
    fn test_vote_type_counter_field() {
        assert_eq!(VoteType::parse("upvote"), Some(VoteType::Upvote));
        assert_eq!(VoteType::parse("downvote"), Some(VoteType::Downvote));
        assert_eq!(VoteType::parse("sideways"), None);
        assert_eq!(VoteType::Upvote.counter_field(), "upVote");
        assert_eq!(VoteType::Downvote.counter_field(), "downVote");
    }

    #[test]
    fn test_sort_mode_parsing() {
        assert_eq!(SortMode::parse("recent"), Some(SortMode::Recent));
        assert_eq!(SortMode::parse("popularity"), Some(SortMode::Popularity));
        assert_eq!(SortMode::parse("trending"), None);
    }

    #[test]
    fn test_post_wire_format() {
        let post = Post {
            id: Some(ObjectId::parse_str("507f1f77bcf86cd799439011").unwrap()),
            author_image: String::new(),
            author_name: "Ada".into(),
            author_email: "ada@example.com".into(),
            post_title: "Hello".into(),
            post_description: "World".into(),
            tag: "intro".into(),
            up_vote: 0,
            down_vote: 0,
            comments: vec![],
            created_at: Utc::now(),
            updated_at: None,
            status: Some(PostStatus::Published),
        };

        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["_id"], "507f1f77bcf86cd799439011");
        assert_eq!(json["postTitle"], "Hello");
        assert_eq!(json["upVote"], 0);
        assert_eq!(json["status"], "published");
        assert!(json.get("updatedAt").is_none());
    }

    #[test]
    fn test_report_status_wire_format() {
        let json = serde_json::to_value(ReportStatus::ActionTaken).unwrap();
        assert_eq!(json, "action_taken");
    }
}
