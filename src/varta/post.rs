use serde::{Deserialize, Serialize};

use crate::utils::RawId;

/// A post as the content service returns it.
///
/// Records from different service versions disagree on the id field name,
/// so both are kept and resolved during normalization.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawPost {
    #[serde(default)]
    pub id: Option<RawId>,
    #[serde(default)]
    pub post_id: Option<RawId>,
    #[serde(default, alias = "authorId")]
    pub user_id: Option<RawId>,
    #[serde(default)]
    pub author: Option<RawAuthor>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, alias = "likeCount")]
    pub likes_count: Option<u32>,
    #[serde(default, alias = "commentCount")]
    pub comments_count: Option<u32>,
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default, alias = "likedByMe")]
    pub liked: Option<bool>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct RawAuthor {
    #[serde(default)]
    pub id: Option<RawId>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Body of `POST /posts`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub category: String,
}

/// Body of `POST /posts/:id/rate`.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RatePost {
    pub rating_value: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_service_shape() {
        let raw: RawPost = serde_json::from_str(
            r#"{
                "postId": 12,
                "userId": 1,
                "title": "Dune",
                "content": "{\"genre\":\"Sci-Fi\"}",
                "category": "book",
                "likesCount": 3,
                "commentsCount": 1,
                "averageRating": 4.5,
                "createdAt": "2024-05-01T10:00:00"
            }"#,
        )
        .unwrap();

        assert_eq!(raw.id, None);
        assert_eq!(raw.post_id, Some(RawId::Int(12)));
        assert_eq!(raw.user_id, Some(RawId::Int(1)));
        assert_eq!(raw.likes_count, Some(3));
        assert_eq!(raw.category.as_deref(), Some("book"));
    }

    #[test]
    fn rate_body() {
        let body = serde_json::to_string(&RatePost { rating_value: 4 }).unwrap();
        assert_eq!(body, r#"{"ratingValue":4}"#);
    }
}
