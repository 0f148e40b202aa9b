use crate::{
    api::SocialGateway,
    author::AuthorDisplayCache,
    error::Result,
    follow::{self, FollowState, FollowStatus},
};

/// View state shared by everything the viewer has on screen.
///
/// Passed by `&mut` into the feed, comment and profile operations instead
/// of living in globals.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub follows: FollowState,
    pub authors: AuthorDisplayCache,
    viewer: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// A session for a signed-in user, whose own name is known up front.
    pub fn signed_in(viewer: impl Into<String>, name: impl Into<String>) -> Self {
        let viewer = viewer.into();
        let mut session = Self::new();
        session.authors.insert(viewer.clone(), name);
        session.viewer = Some(viewer);
        session
    }

    pub fn viewer(&self) -> Option<&str> {
        self.viewer.as_deref()
    }

    /// Resolves names and follow status for one batch of authors, with all
    /// lookups in flight together.
    pub async fn resolve_authors<G: SocialGateway>(&mut self, gateway: &G, ids: &[String]) {
        let follows = std::mem::take(&mut self.follows);
        let ((), follows) = futures::join!(
            self.authors
                .resolve(gateway, ids.iter().map(String::as_str)),
            follow::reconcile(gateway, ids.iter().map(String::as_str), follows),
        );
        self.follows = follows;
    }

    /// Reconciles follow status for a batch of authors.
    pub async fn reconcile<'a, G: SocialGateway>(
        &mut self,
        gateway: &G,
        ids: impl IntoIterator<Item = &'a str>,
    ) {
        let state = std::mem::take(&mut self.follows);
        self.follows = follow::reconcile(gateway, ids, state).await;
    }

    /// Follows or unfollows `user_id` depending on the current state.
    /// Returns the new status; the state is untouched when the service refuses.
    pub async fn toggle_follow<G: SocialGateway>(
        &mut self,
        gateway: &G,
        user_id: &str,
    ) -> Result<FollowStatus> {
        if self.follows.is_following(user_id) {
            self.unfollow(gateway, user_id).await
        } else {
            self.follow(gateway, user_id).await
        }
    }

    pub async fn follow<G: SocialGateway>(
        &mut self,
        gateway: &G,
        user_id: &str,
    ) -> Result<FollowStatus> {
        gateway.follow_user(user_id).await?;
        self.follows.set(user_id.trim(), FollowStatus::Following);
        Ok(FollowStatus::Following)
    }

    pub async fn unfollow<G: SocialGateway>(
        &mut self,
        gateway: &G,
        user_id: &str,
    ) -> Result<FollowStatus> {
        gateway.unfollow_user(user_id).await?;
        self.follows.set(user_id.trim(), FollowStatus::NotFollowing);
        Ok(FollowStatus::NotFollowing)
    }
}
