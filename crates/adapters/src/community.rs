//! Community category and post adapters

use crate::fields::{date, integer, strings, text};
use crate::payload::{Entity, Record};
use crate::status::post_status;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyCategory {
    pub id: String,
    pub category_name: String,
    pub description: String,
    pub icon: String,
    pub slug: String,
    pub post_count: i64,
    pub member_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyPost {
    pub id: String,
    pub title: String,
    pub content: String,
    pub content_type: String,
    pub category_id: String,
    pub category_name: String,
    pub author_id: String,
    pub author_name: String,
    pub author_avatar: String,
    pub media: Vec<String>,
    pub tags: Vec<String>,
    pub likes_count: i64,
    pub comments_count: i64,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

pub struct CommunityCategory;

impl Entity for CommunityCategory {
    const COLLECTION: &'static str = "categories";
    type Legacy = LegacyCategory;

    fn is_legacy(record: &Record) -> bool {
        record.contains_key("category_name")
    }

    fn to_legacy(record: &Record) -> LegacyCategory {
        LegacyCategory {
            id: text(record, &["id", "_id"]),
            category_name: text(record, &["category_name", "name", "title"]),
            description: text(record, &["description"]),
            icon: text(record, &["icon", "iconUrl"]),
            slug: text(record, &["slug"]),
            post_count: integer(record, &["post_count", "postCount", "postsCount"]),
            member_count: integer(record, &["member_count", "memberCount", "membersCount"]),
        }
    }
}

pub struct CommunityPost;

impl Entity for CommunityPost {
    const COLLECTION: &'static str = "posts";
    type Legacy = LegacyPost;

    fn is_legacy(record: &Record) -> bool {
        record.contains_key("content_type")
    }

    fn to_legacy(record: &Record) -> LegacyPost {
        let status = text(record, &["status"]);

        LegacyPost {
            id: text(record, &["id", "_id"]),
            title: text(record, &["title"]),
            content: text(record, &["content", "body", "text"]),
            content_type: text(record, &["content_type", "contentType", "type"]),
            category_id: text(
                record,
                &["category_id", "categoryId", "category._id", "category.id"],
            ),
            category_name: text(record, &["category_name", "categoryName", "category.name"]),
            author_id: text(record, &["author_id", "authorId", "author._id", "author.id"]),
            author_name: text(record, &["author_name", "authorName", "author.name"]),
            author_avatar: text(record, &["author_avatar", "authorAvatar", "author.avatar"]),
            media: strings(record, &["media", "mediaUrls", "images"]),
            tags: strings(record, &["tags"]),
            likes_count: integer(record, &["likes_count", "likesCount", "likes"]),
            comments_count: integer(record, &["comments_count", "commentsCount"]),
            status: post_status(&status),
            created_at: date(record, &["created_at", "createdAt"]),
            updated_at: date(record, &["updated_at", "updatedAt"]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_category_mapping() {
        let r = record(json!({ "_id": "c1", "name": "Robotics", "postCount": 14, "iconUrl": "bot.svg" }));
        let legacy = CommunityCategory::to_legacy(&r);

        assert_eq!(legacy.id, "c1");
        assert_eq!(legacy.category_name, "Robotics");
        assert_eq!(legacy.icon, "bot.svg");
        assert_eq!(legacy.post_count, 14);
        assert_eq!(legacy.member_count, 0);
        assert_eq!(legacy.slug, "");
    }

    #[test]
    fn test_post_mapping_from_nested_objects() {
        let r = record(json!({
            "_id": "p1",
            "title": "Hello",
            "body": "First post",
            "contentType": "text",
            "category": { "_id": "c1", "name": "General" },
            "author": { "_id": "u1", "name": "Ada", "avatar": "ada.png" },
            "mediaUrls": ["a.png"],
            "likesCount": 3,
            "status": "published",
            "createdAt": "2025-05-02T08:00:00Z"
        }));
        let legacy = CommunityPost::to_legacy(&r);

        assert_eq!(legacy.content, "First post");
        assert_eq!(legacy.content_type, "text");
        assert_eq!(legacy.category_id, "c1");
        assert_eq!(legacy.category_name, "General");
        assert_eq!(legacy.author_name, "Ada");
        assert_eq!(legacy.author_avatar, "ada.png");
        assert_eq!(legacy.media, vec!["a.png"]);
        assert_eq!(legacy.likes_count, 3);
        assert_eq!(legacy.comments_count, 0);
        assert_eq!(legacy.status, "approved");
        assert_eq!(legacy.created_at, "2025-05-02");
        assert_eq!(legacy.updated_at, "");
    }

    #[test]
    fn test_markers() {
        assert!(CommunityPost::is_legacy(&record(json!({ "content_type": "image" }))));
        assert!(!CommunityPost::is_legacy(&record(json!({ "contentType": "image" }))));
        assert!(CommunityCategory::is_legacy(&record(json!({ "category_name": "x" }))));
        assert!(!CommunityCategory::is_legacy(&record(json!({ "name": "x" }))));
    }
}
