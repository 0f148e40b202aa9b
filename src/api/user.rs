use reqwest::Method;
use url::Url;

use crate::{
    error::{Error, Result},
    utils::Listing,
    varta::{Follower, User},
};

use super::{checked_id, endpoint, ApiClient};

/// Client for the user service (`/users`).
#[derive(Debug, Clone)]
pub struct UserClient {
    inner: ApiClient,
    base: Url,
    viewer: Option<String>,
}

impl UserClient {
    pub fn new(inner: ApiClient, base: Url, viewer: Option<String>) -> Self {
        Self {
            inner,
            base,
            viewer,
        }
    }

    /// Id of the signed-in user that follow status is evaluated for.
    pub fn viewer(&self) -> Option<&str> {
        self.viewer.as_deref()
    }

    pub fn set_viewer(&mut self, viewer: String) {
        self.viewer = Some(viewer);
    }

    pub async fn me(&self) -> Result<User> {
        self.inner.authorized()?;
        let url = endpoint(&self.base, &["users", "me"]);
        self.inner.fetch(url).await
    }

    pub async fn get_user(&self, user_id: &str) -> Result<User> {
        let url = endpoint(&self.base, &["users", checked_id(user_id)?]);
        self.inner.fetch(url).await
    }

    pub async fn followers(&self, user_id: &str) -> Result<Vec<Follower>> {
        let url = endpoint(&self.base, &["users", "followers", checked_id(user_id)?]);
        let listing: Listing<Follower> = self.inner.fetch(url).await?;
        Ok(listing.into_vec())
    }

    pub async fn following(&self, user_id: &str) -> Result<Vec<Follower>> {
        let url = endpoint(&self.base, &["users", "following", checked_id(user_id)?]);
        let listing: Listing<Follower> = self.inner.fetch(url).await?;
        Ok(listing.into_vec())
    }

    /// Whether the viewer appears among `user_id`'s followers.
    pub async fn is_following(&self, user_id: &str) -> Result<bool> {
        let viewer = self.viewer.as_deref().ok_or(Error::NotAuthenticated)?;
        let followers = self.followers(user_id).await?;
        Ok(is_follower(&followers, viewer))
    }

    pub async fn follow_user(&self, user_id: &str) -> Result<()> {
        self.inner.authorized()?;
        let url = endpoint(&self.base, &["users", "follow", checked_id(user_id)?]);
        self.inner.request(Method::POST, url, None::<&()>).await?;
        Ok(())
    }

    pub async fn unfollow_user(&self, user_id: &str) -> Result<()> {
        self.inner.authorized()?;
        let url = endpoint(&self.base, &["users", "unfollow", checked_id(user_id)?]);
        self.inner.request(Method::POST, url, None::<&()>).await?;
        Ok(())
    }
}

pub fn is_follower(followers: &[Follower], viewer: &str) -> bool {
    followers
        .iter()
        .any(|row| row.follower().as_deref() == Some(viewer))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follower_membership() {
        let rows: Vec<Follower> = serde_json::from_str(
            r#"[{"id":1,"followerId":3,"followingId":9},{"id":2,"followerId":"5","followingId":9}]"#,
        )
        .unwrap();
        assert!(is_follower(&rows, "3"));
        assert!(is_follower(&rows, "5"));
        assert!(!is_follower(&rows, "9"));
        assert!(!is_follower(&[], "3"));
    }

    #[tokio::test]
    async fn follow_status_needs_a_viewer() {
        let client = UserClient::new(
            ApiClient::with_limit(None, 1),
            Url::parse("http://localhost:8083").unwrap(),
            None,
        );
        assert!(matches!(
            client.is_following("9").await,
            Err(Error::NotAuthenticated)
        ));
    }
}
