pub mod content;
pub mod user;

use std::{future::Future, sync::Arc};

use clap::ValueEnum;
use log::{debug, log_enabled, trace};
use reqwest::{header, Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::sync::{Semaphore, SemaphorePermit};
use url::Url;

use crate::{
    config::Config,
    error::{Error, Result},
    post::Category,
    varta::{comment::RawComment, post::RawPost, Follower, User},
};

pub use content::ContentClient;
pub use user::UserClient;

/// Transport shared by both service clients.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    semaphore: Arc<Semaphore>,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &Config) -> Self {
        Self::with_limit(config.token(), config.limit())
    }

    pub fn with_limit(token: Option<String>, permits: usize) -> Self {
        Self {
            client: Client::new(),
            semaphore: Arc::new(Semaphore::new(permits.max(1))),
            token,
        }
    }

    async fn client(&self) -> (&Client, SemaphorePermit) {
        let permit = self
            .semaphore
            .acquire()
            .await
            .expect("request semaphore is never closed");
        (&self.client, permit)
    }

    fn wrap_request(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.header(header::ACCEPT, "application/json");
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Fails fast for actions the services only accept from a signed-in user.
    pub fn authorized(&self) -> Result<()> {
        match &self.token {
            Some(token) if !token.trim().is_empty() => Ok(()),
            _ => Err(Error::NotAuthenticated),
        }
    }

    pub async fn fetch<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let body = self.request(Method::GET, url, None::<&()>).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Sends a request and returns the raw response body.
    pub async fn request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<String> {
        let (client, _permit) = self.client().await;
        let mut request = self.wrap_request(client.request(method.clone(), url.clone()));
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!("{} {}", method, url);
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            debug!("{} {} -> {}", method, url, status);
            return Err(Error::from_status(status, url.as_str()));
        }

        let body = response.text().await?;
        if log_enabled!(log::Level::Trace) && !body.is_empty() {
            match serde_json::from_str::<Value>(&body) {
                Ok(value) => trace!("{}", serde_json::to_string_pretty(&value)?),
                Err(_) => trace!("{}", body),
            }
        }
        Ok(body)
    }
}

/// Appends percent-encoded path segments to a service base url.
pub fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    let tail = segments
        .iter()
        .map(|segment| urlencoding::encode(segment))
        .collect::<Vec<_>>()
        .join("/");
    let path = format!("{}/{}", base.path().trim_end_matches('/'), tail);
    url.set_path(&path);
    url
}

/// Rejects ids that would address the collection instead of one record.
pub fn checked_id(id: &str) -> Result<&str> {
    let id = id.trim();
    if id.is_empty() {
        return Err(Error::InvalidId(id.to_string()));
    }
    Ok(id)
}

/// Server-side ordering of the post listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Sort {
    Latest,
    TopRated,
}

impl Sort {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Latest => "latest",
            Self::TopRated => "top-rated",
        }
    }
}

/// One page request against the post listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostQuery {
    pub page: u32,
    pub page_size: u32,
    pub category: Option<Category>,
    pub sort: Option<Sort>,
}

impl PostQuery {
    pub fn new(page_size: u32, category: Option<Category>) -> Self {
        Self {
            page: 1,
            page_size,
            category,
            sort: None,
        }
    }

    pub fn page(self, page: u32) -> Self {
        Self { page, ..self }
    }

    pub fn sorted(self, sort: Option<Sort>) -> Self {
        Self { sort, ..self }
    }
}

/// The operations the feed, comment and profile logic need from the
/// services. [`VartaClient`] talks HTTP; tests substitute an in-memory fake.
pub trait SocialGateway: Sync {
    fn list_posts(&self, query: &PostQuery) -> impl Future<Output = Result<Vec<RawPost>>> + Send;
    fn get_comments(&self, post_id: &str) -> impl Future<Output = Result<Vec<RawComment>>> + Send;
    /// Returns the stored comment when the service echoes one back.
    fn add_comment(
        &self,
        post_id: &str,
        text: &str,
    ) -> impl Future<Output = Result<Option<RawComment>>> + Send;
    fn toggle_like(&self, post_id: &str) -> impl Future<Output = Result<()>> + Send;
    fn delete_post(&self, post_id: &str) -> impl Future<Output = Result<()>> + Send;

    fn me(&self) -> impl Future<Output = Result<User>> + Send;
    fn get_user(&self, user_id: &str) -> impl Future<Output = Result<User>> + Send;
    fn followers(&self, user_id: &str) -> impl Future<Output = Result<Vec<Follower>>> + Send;
    fn following(&self, user_id: &str) -> impl Future<Output = Result<Vec<Follower>>> + Send;
    fn is_following(&self, user_id: &str) -> impl Future<Output = Result<bool>> + Send;
    fn follow_user(&self, user_id: &str) -> impl Future<Output = Result<()>> + Send;
    fn unfollow_user(&self, user_id: &str) -> impl Future<Output = Result<()>> + Send;
}

/// Both services behind one handle.
#[derive(Debug, Clone)]
pub struct VartaClient {
    pub content: ContentClient,
    pub users: UserClient,
}

impl VartaClient {
    pub fn new(config: &Config) -> Self {
        let inner = ApiClient::new(config);
        Self {
            content: ContentClient::new(inner.clone(), config.content_url().clone()),
            users: UserClient::new(inner, config.user_url().clone(), config.viewer()),
        }
    }

    pub fn viewer(&self) -> Option<&str> {
        self.users.viewer()
    }

    pub fn set_viewer(&mut self, viewer: String) {
        self.users.set_viewer(viewer);
    }
}

impl SocialGateway for VartaClient {
    async fn list_posts(&self, query: &PostQuery) -> Result<Vec<RawPost>> {
        self.content.list_posts(query).await
    }
    async fn get_comments(&self, post_id: &str) -> Result<Vec<RawComment>> {
        self.content.get_comments(post_id).await
    }
    async fn add_comment(&self, post_id: &str, text: &str) -> Result<Option<RawComment>> {
        self.content.add_comment(post_id, text).await
    }
    async fn toggle_like(&self, post_id: &str) -> Result<()> {
        self.content.toggle_like(post_id).await
    }
    async fn delete_post(&self, post_id: &str) -> Result<()> {
        self.content.delete_post(post_id).await
    }

    async fn me(&self) -> Result<User> {
        self.users.me().await
    }
    async fn get_user(&self, user_id: &str) -> Result<User> {
        self.users.get_user(user_id).await
    }
    async fn followers(&self, user_id: &str) -> Result<Vec<Follower>> {
        self.users.followers(user_id).await
    }
    async fn following(&self, user_id: &str) -> Result<Vec<Follower>> {
        self.users.following(user_id).await
    }
    async fn is_following(&self, user_id: &str) -> Result<bool> {
        self.users.is_following(user_id).await
    }
    async fn follow_user(&self, user_id: &str) -> Result<()> {
        self.users.follow_user(user_id).await
    }
    async fn unfollow_user(&self, user_id: &str) -> Result<()> {
        self.users.unfollow_user(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_segments() {
        let base = Url::parse("http://localhost:8082").unwrap();
        assert_eq!(
            endpoint(&base, &["posts", "12", "comments"]).as_str(),
            "http://localhost:8082/posts/12/comments"
        );

        let base = Url::parse("http://gateway.local/content/").unwrap();
        assert_eq!(
            endpoint(&base, &["posts", "a/b"]).as_str(),
            "http://gateway.local/content/posts/a%2Fb"
        );
    }

    #[test]
    fn blank_ids_are_rejected() {
        assert!(matches!(checked_id("  "), Err(Error::InvalidId(_))));
        assert_eq!(checked_id(" 12 ").unwrap(), "12");
    }

    #[test]
    fn anonymous_client_is_not_authorized() {
        assert!(matches!(
            ApiClient::with_limit(None, 1).authorized(),
            Err(Error::NotAuthenticated)
        ));
        assert!(ApiClient::with_limit(Some("t0k3n".into()), 1)
            .authorized()
            .is_ok());
    }
}
