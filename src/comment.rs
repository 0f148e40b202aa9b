//! Comment panels and the pipeline that fills them.

use chrono::{NaiveDateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{
    api::SocialGateway,
    author::AuthorDisplayCache,
    error::Result,
    post::{parse_timestamp, Post},
    session::Session,
    utils::RawId,
    varta::comment::RawComment,
};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: Option<String>,
    pub post_id: String,
    pub author_id: Option<String>,
    pub author_name: String,
    pub text: String,
    pub created_at: Option<NaiveDateTime>,
    /// Shown locally, not yet confirmed by the service.
    pub pending: bool,
}

impl Comment {
    fn from_raw(raw: RawComment, post_id: &str, authors: &AuthorDisplayCache) -> Self {
        let author_id = raw.user_id.as_ref().and_then(RawId::canonical);
        Self {
            id: raw.comment_id.as_ref().and_then(RawId::canonical),
            post_id: raw
                .post_id
                .as_ref()
                .and_then(RawId::canonical)
                .unwrap_or_else(|| post_id.to_string()),
            author_name: authors.name(author_id.as_deref()).to_string(),
            author_id,
            text: raw.text.unwrap_or_default(),
            created_at: raw.created_at.as_deref().and_then(parse_timestamp),
            pending: false,
        }
    }
}

/// Fetches the comments of a post, resolves their authors' names and
/// reconciles follow status for those authors.
///
/// A failed fetch yields an empty list.
pub async fn load_comments<G: SocialGateway>(
    gateway: &G,
    session: &mut Session,
    post_id: &str,
) -> Vec<Comment> {
    let raw = match gateway.get_comments(post_id).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!("comments of post {} unavailable: {}", post_id, e);
            return vec![];
        }
    };

    let authors: Vec<String> = raw
        .iter()
        .filter_map(|comment| comment.user_id.as_ref().and_then(RawId::canonical))
        .collect();
    session.resolve_authors(gateway, &authors).await;

    debug!("{} comments on post {}", raw.len(), post_id);
    raw.into_iter()
        .map(|comment| Comment::from_raw(comment, post_id, &session.authors))
        .collect()
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Collapsed,
    Loading,
    Loaded,
}

/// The comment section under one post.
///
/// Comments are fetched on the first expansion only; later expansions show
/// the cached list.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentPanel {
    post_id: String,
    state: PanelState,
    comments: Option<Vec<Comment>>,
}

impl CommentPanel {
    pub fn new(post_id: impl Into<String>) -> Self {
        Self {
            post_id: post_id.into(),
            state: PanelState::Collapsed,
            comments: None,
        }
    }

    pub fn post_id(&self) -> &str {
        &self.post_id
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn is_loaded(&self) -> bool {
        self.comments.is_some()
    }

    pub fn comments(&self) -> &[Comment] {
        self.comments.as_deref().unwrap_or_default()
    }

    pub async fn toggle<G: SocialGateway>(
        &mut self,
        gateway: &G,
        session: &mut Session,
    ) -> PanelState {
        match self.state {
            PanelState::Collapsed => self.expand(gateway, session).await,
            PanelState::Loading | PanelState::Loaded => self.collapse(),
        }
    }

    pub async fn expand<G: SocialGateway>(
        &mut self,
        gateway: &G,
        session: &mut Session,
    ) -> PanelState {
        if self.comments.is_none() {
            self.state = PanelState::Loading;
            let comments = load_comments(gateway, session, &self.post_id).await;
            self.comments = Some(comments);
        }
        self.state = PanelState::Loaded;
        self.state
    }

    pub fn collapse(&mut self) -> PanelState {
        self.state = PanelState::Collapsed;
        self.state
    }

    /// Adds a comment to `post`.
    ///
    /// The comment and the count bump show immediately; both are rolled back
    /// when the service refuses. Returns `false` for blank text, which is
    /// ignored.
    pub async fn submit<G: SocialGateway>(
        &mut self,
        gateway: &G,
        session: &Session,
        post: &mut Post,
        text: &str,
    ) -> Result<bool> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(false);
        }

        let local = Comment {
            id: None,
            post_id: self.post_id.clone(),
            author_id: session.viewer().map(str::to_string),
            author_name: session.authors.name(session.viewer()).to_string(),
            text: text.to_string(),
            created_at: Some(Utc::now().naive_utc()),
            pending: true,
        };
        // an unloaded panel must still fetch on first expansion
        let index = self.comments.as_mut().map(|comments| {
            comments.push(local);
            comments.len() - 1
        });
        post.comment_count += 1;

        match gateway.add_comment(&self.post_id, text).await {
            Ok(stored) => {
                if let Some(comment) = index.and_then(|i| self.comment_mut(i)) {
                    comment.pending = false;
                    if let Some(stored) = stored {
                        comment.id = stored.comment_id.as_ref().and_then(RawId::canonical);
                        if let Some(created) = stored.created_at.as_deref().and_then(parse_timestamp) {
                            comment.created_at = Some(created);
                        }
                    }
                }
                Ok(true)
            }
            Err(e) => {
                if let (Some(i), Some(comments)) = (index, self.comments.as_mut()) {
                    comments.remove(i);
                }
                post.comment_count = post.comment_count.saturating_sub(1);
                Err(e)
            }
        }
    }

    fn comment_mut(&mut self, index: usize) -> Option<&mut Comment> {
        self.comments.as_mut().and_then(|comments| comments.get_mut(index))
    }
}
