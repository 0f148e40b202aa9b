use std::collections::{HashMap, HashSet};

use log::{debug, info};

use crate::{
    api::{PostQuery, SocialGateway, Sort},
    comment::{CommentPanel, PanelState},
    error::{Error, Result},
    post::{normalize_page, Category, Post},
    session::Session,
};

/// A paginated list of posts plus the local view state attached to them.
#[derive(Debug, Clone)]
pub struct Feed {
    query: PostQuery,
    page: u32,
    posts: Vec<Post>,
    panels: HashMap<String, CommentPanel>,
    has_more: bool,
    loading: bool,
}

impl Feed {
    pub fn new(page_size: u32, category: Option<Category>) -> Self {
        Self {
            query: PostQuery::new(page_size.max(1), category),
            page: 0,
            posts: vec![],
            panels: HashMap::new(),
            has_more: true,
            loading: false,
        }
    }

    /// Orders the listing on the server. Takes effect from the next load.
    pub fn sorted(mut self, sort: Option<Sort>) -> Self {
        self.query = self.query.sorted(sort);
        self
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn post(&self, post_id: &str) -> Option<&Post> {
        self.posts.iter().find(|post| post.id == post_id)
    }

    pub fn panel(&self, post_id: &str) -> Option<&CommentPanel> {
        self.panels.get(post_id)
    }

    /// Last page loaded, `0` before the first load.
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Loads page 1, replacing whatever was shown.
    pub async fn load_first<G: SocialGateway>(
        &mut self,
        gateway: &G,
        session: &mut Session,
    ) -> Result<usize> {
        self.load_page(gateway, session, 1).await
    }

    /// Appends the next page. Does nothing once the last page was seen.
    pub async fn load_more<G: SocialGateway>(
        &mut self,
        gateway: &G,
        session: &mut Session,
    ) -> Result<usize> {
        if !self.has_more {
            return Ok(0);
        }
        self.load_page(gateway, session, self.page + 1).await
    }

    /// Fetches one page, normalizes it and reconciles its authors.
    ///
    /// On failure the feed keeps what it had. Returns the number of posts
    /// added.
    pub async fn load_page<G: SocialGateway>(
        &mut self,
        gateway: &G,
        session: &mut Session,
        page: u32,
    ) -> Result<usize> {
        let query = self.query.page(page);
        self.loading = true;
        let response = gateway.list_posts(&query).await;
        self.loading = false;
        let raw = response?;

        let received = raw.len();
        let mut posts = normalize_page(raw);

        for post in &posts {
            if let (Some(id), Some(name)) = (&post.author_id, &post.author_name) {
                if session.authors.get(id).is_none() {
                    session.authors.insert(id.clone(), name.clone());
                }
            }
        }
        let authors: Vec<String> = posts.iter().filter_map(|post| post.author_id.clone()).collect();
        session.resolve_authors(gateway, &authors).await;

        if page <= 1 {
            self.posts.clear();
            self.panels.clear();
        } else {
            let known: HashSet<&str> = self.posts.iter().map(|post| post.id.as_str()).collect();
            let before = posts.len();
            posts.retain(|post| !known.contains(post.id.as_str()));
            if posts.len() < before {
                debug!("{} posts of page {} already shown", before - posts.len(), page);
            }
        }

        let added = posts.len();
        self.posts.extend(posts);
        fill_author_names(&mut self.posts, session);
        self.page = page;
        self.has_more = received >= query.page_size as usize;
        info!(
            "page {}: {} posts received, {} shown, more: {}",
            page, received, added, self.has_more
        );
        Ok(added)
    }

    /// Likes or unlikes a post. The count moves immediately and is restored
    /// when the service refuses. Returns the new liked flag.
    pub async fn toggle_like<G: SocialGateway>(&mut self, gateway: &G, post_id: &str) -> Result<bool> {
        let post = self.post_mut(post_id)?;
        let saved = (post.liked, post.like_count);
        let liked = !post.liked;
        apply_like(post, liked);

        if let Err(e) = gateway.toggle_like(post_id).await {
            if let Ok(post) = self.post_mut(post_id) {
                (post.liked, post.like_count) = saved;
            }
            return Err(e);
        }
        Ok(liked)
    }

    /// Deletes a post on the service, then drops it from the feed.
    pub async fn delete_post<G: SocialGateway>(&mut self, gateway: &G, post_id: &str) -> Result<()> {
        gateway.delete_post(post_id).await?;
        self.posts.retain(|post| post.id != post_id);
        self.panels.remove(post_id);
        Ok(())
    }

    /// Opens or closes the comment panel of a post.
    pub async fn toggle_comments<G: SocialGateway>(
        &mut self,
        gateway: &G,
        session: &mut Session,
        post_id: &str,
    ) -> Result<PanelState> {
        self.post_mut(post_id)?;
        let panel = self
            .panels
            .entry(post_id.to_string())
            .or_insert_with(|| CommentPanel::new(post_id));
        Ok(panel.toggle(gateway, session).await)
    }

    /// Adds a comment to a post. See [`CommentPanel::submit`].
    pub async fn submit_comment<G: SocialGateway>(
        &mut self,
        gateway: &G,
        session: &Session,
        post_id: &str,
        text: &str,
    ) -> Result<bool> {
        let post = self
            .posts
            .iter_mut()
            .find(|post| post.id == post_id)
            .ok_or_else(|| Error::InvalidId(post_id.to_string()))?;
        let panel = self
            .panels
            .entry(post_id.to_string())
            .or_insert_with(|| CommentPanel::new(post_id));
        panel.submit(gateway, session, post, text).await
    }

    fn post_mut(&mut self, post_id: &str) -> Result<&mut Post> {
        self.posts
            .iter_mut()
            .find(|post| post.id == post_id)
            .ok_or_else(|| Error::InvalidId(post_id.to_string()))
    }
}

fn apply_like(post: &mut Post, liked: bool) {
    post.liked = liked;
    post.like_count = if liked {
        post.like_count + 1
    } else {
        post.like_count.saturating_sub(1)
    };
}

/// Names every post whose author was unresolved so far, including posts of
/// earlier pages whose lookup failed then.
fn fill_author_names(posts: &mut [Post], session: &Session) {
    for post in posts.iter_mut().filter(|post| post.author_name.is_none()) {
        if let Some(name) = post.author_id.as_deref().and_then(|id| session.authors.get(id)) {
            post.author_name = Some(name.to_string());
        }
    }
}
