use std::collections::HashSet;

use log::{debug, info};

use crate::{
    api::{PostQuery, SocialGateway},
    error::{Error, Result},
    post::{normalize_page, Post},
    varta::User,
};

/// The viewer's own profile page.
#[derive(Debug, Clone)]
pub struct Profile {
    pub user: User,
    pub followers: usize,
    pub following: usize,
    pub posts: Vec<Post>,
}

impl Profile {
    /// Loads the viewer, then their follow counts and their posts in parallel.
    /// The post listing is paged through with `page_size` posts per request.
    pub async fn load<G: SocialGateway>(gateway: &G, page_size: u32) -> Result<Self> {
        let user = gateway.me().await?;
        let id = user.id().ok_or(Error::MissingIdentifier)?;

        let (followers, following, posts) = futures::try_join!(
            gateway.followers(&id),
            gateway.following(&id),
            own_posts(gateway, &id, page_size),
        )?;
        info!(
            "profile {}: {} followers, {} following, {} posts",
            id,
            followers.len(),
            following.len(),
            posts.len()
        );

        Ok(Self {
            user,
            followers: followers.len(),
            following: following.len(),
            posts,
        })
    }
}

/// Every post by `author_id`, read page by page until a short page, or a
/// page with nothing new for servers that ignore paging.
async fn own_posts<G: SocialGateway>(gateway: &G, author_id: &str, page_size: u32) -> Result<Vec<Post>> {
    let mut query = PostQuery::new(page_size.max(1), None);
    let mut seen = HashSet::new();
    let mut posts = vec![];

    loop {
        let raw = gateway.list_posts(&query).await?;
        let received = raw.len();
        let mut fresh = false;
        for post in normalize_page(raw) {
            if !seen.insert(post.id.clone()) {
                continue;
            }
            fresh = true;
            if post.author_id.as_deref() == Some(author_id) {
                posts.push(post);
            }
        }
        debug!("profile scan page {}: {} posts", query.page, received);

        if received < query.page_size as usize || !fresh {
            return Ok(posts);
        }
        query = query.page(query.page + 1);
    }
}
