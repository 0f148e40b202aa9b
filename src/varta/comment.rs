use serde::{Deserialize, Serialize};

use crate::utils::RawId;

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawComment {
    #[serde(default, alias = "id")]
    pub comment_id: Option<RawId>,
    #[serde(default)]
    pub post_id: Option<RawId>,
    #[serde(default)]
    pub user_id: Option<RawId>,
    #[serde(default, alias = "content", alias = "ratingText")]
    pub text: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Body of `POST /posts/:id/comment`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct NewComment {
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_service_shape() {
        let raw: RawComment = serde_json::from_str(
            r#"{"commentId":5,"postId":12,"userId":"7","text":"nice","createdAt":"2024-05-01T10:00:00"}"#,
        )
        .unwrap();
        assert_eq!(raw.comment_id, Some(RawId::Int(5)));
        assert_eq!(raw.user_id, Some(RawId::Text("7".into())));
        assert_eq!(raw.text.as_deref(), Some("nice"));
    }

    #[test]
    fn placeholder_comment_has_only_text() {
        let raw: RawComment = serde_json::from_str(r#"{"text":"hi","commentId":null}"#).unwrap();
        assert!(raw.comment_id.is_none());
        assert!(raw.user_id.is_none());
    }
}
