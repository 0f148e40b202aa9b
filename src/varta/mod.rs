pub mod comment;
pub mod post;

use serde::{Deserialize, Serialize};

use crate::utils::RawId;

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(alias = "userId")]
    pub id: Option<RawId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "userName")]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

impl User {
    pub fn id(&self) -> Option<String> {
        self.id.as_ref().and_then(RawId::canonical)
    }

    /// Name shown next to the user's posts and comments.
    pub fn display_name(&self) -> Option<&str> {
        [&self.name, &self.username]
            .into_iter()
            .flatten()
            .map(|name| name.trim())
            .find(|name| !name.is_empty())
    }
}

/// One row of a followers/following listing.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Follower {
    #[serde(default)]
    pub id: Option<RawId>,
    #[serde(default, alias = "follower_id")]
    pub follower_id: Option<RawId>,
    #[serde(default, alias = "followingId", alias = "followeeId", alias = "following_id")]
    pub followed_id: Option<RawId>,
}

impl Follower {
    pub fn follower(&self) -> Option<String> {
        self.follower_id.as_ref().and_then(RawId::canonical)
    }
    pub fn followed(&self) -> Option<String> {
        self.followed_id.as_ref().and_then(RawId::canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_display_name() {
        let user: User = serde_json::from_str(r#"{"id":3,"name":"  ","username":"asha"}"#).unwrap();
        assert_eq!(user.id().as_deref(), Some("3"));
        assert_eq!(user.display_name(), Some("asha"));

        let user: User = serde_json::from_str(r#"{"userId":"4"}"#).unwrap();
        assert_eq!(user.id().as_deref(), Some("4"));
        assert_eq!(user.display_name(), None);
    }

    #[test]
    fn follower_row() {
        let row: Follower =
            serde_json::from_str(r#"{"id":1,"followerId":1,"followingId":9}"#).unwrap();
        assert_eq!(row.follower().as_deref(), Some("1"));
        assert_eq!(row.followed().as_deref(), Some("9"));
    }
}
