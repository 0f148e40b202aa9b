use log::debug;
use reqwest::Method;
use url::Url;

use crate::{
    error::{Error, Result},
    utils::Listing,
    varta::{
        comment::{NewComment, RawComment},
        post::{NewPost, RatePost, RawPost},
    },
};

use super::{checked_id, endpoint, ApiClient, PostQuery};

/// Client for the content service (`/posts`).
#[derive(Debug, Clone)]
pub struct ContentClient {
    inner: ApiClient,
    base: Url,
}

impl ContentClient {
    pub fn new(inner: ApiClient, base: Url) -> Self {
        Self { inner, base }
    }

    pub fn list_url(&self, query: &PostQuery) -> Url {
        let mut url = endpoint(&self.base, &["posts"]);
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("page", &query.page.to_string())
                .append_pair("limit", &query.page_size.to_string());
            if let Some(category) = query.category {
                pairs.append_pair("category", category.as_str());
            }
            if let Some(sort) = query.sort {
                pairs.append_pair("sort", sort.as_str());
            }
        }
        url
    }

    pub async fn list_posts(&self, query: &PostQuery) -> Result<Vec<RawPost>> {
        let url = self.list_url(query);
        let listing: Listing<RawPost> = self.inner.fetch(url).await?;
        Ok(listing.into_vec())
    }

    pub async fn trending_posts(&self) -> Result<Vec<RawPost>> {
        let url = endpoint(&self.base, &["posts", "trending"]);
        let listing: Listing<RawPost> = self.inner.fetch(url).await?;
        Ok(listing.into_vec())
    }

    pub async fn search_posts(&self, query: &str) -> Result<Vec<RawPost>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::EmptyField("search query"));
        }
        let mut url = endpoint(&self.base, &["posts", "search"]);
        url.query_pairs_mut().append_pair("query", query);
        let listing: Listing<RawPost> = self.inner.fetch(url).await?;
        Ok(listing.into_vec())
    }

    pub async fn get_post(&self, post_id: &str) -> Result<RawPost> {
        let url = endpoint(&self.base, &["posts", checked_id(post_id)?]);
        self.inner.fetch(url).await
    }

    pub async fn create_post(&self, post: &NewPost) -> Result<RawPost> {
        self.inner.authorized()?;
        if post.title.trim().is_empty() {
            return Err(Error::EmptyField("title"));
        }
        let url = endpoint(&self.base, &["posts"]);
        let body = self.inner.request(Method::POST, url, Some(post)).await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn delete_post(&self, post_id: &str) -> Result<()> {
        self.inner.authorized()?;
        let url = endpoint(&self.base, &["posts", checked_id(post_id)?]);
        self.inner.request(Method::DELETE, url, None::<&()>).await?;
        Ok(())
    }

    pub async fn get_comments(&self, post_id: &str) -> Result<Vec<RawComment>> {
        let url = endpoint(&self.base, &["posts", checked_id(post_id)?, "comments"]);
        let listing: Listing<RawComment> = self.inner.fetch(url).await?;
        Ok(listing.into_vec())
    }

    pub async fn add_comment(&self, post_id: &str, text: &str) -> Result<Option<RawComment>> {
        self.inner.authorized()?;
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::EmptyField("comment"));
        }
        let url = endpoint(&self.base, &["posts", checked_id(post_id)?, "comment"]);
        let body = NewComment {
            text: text.to_string(),
        };
        let response = self.inner.request(Method::POST, url, Some(&body)).await?;
        if response.trim().is_empty() {
            return Ok(None);
        }
        match serde_json::from_str(&response) {
            Ok(comment) => Ok(Some(comment)),
            Err(e) => {
                debug!("comment response ignored: {}", e);
                Ok(None)
            }
        }
    }

    pub async fn toggle_like(&self, post_id: &str) -> Result<()> {
        self.inner.authorized()?;
        let url = endpoint(&self.base, &["posts", checked_id(post_id)?, "like"]);
        self.inner.request(Method::POST, url, None::<&()>).await?;
        Ok(())
    }

    pub async fn rate_post(&self, post_id: &str, rating: u8) -> Result<()> {
        self.inner.authorized()?;
        if !(1..=5).contains(&rating) {
            return Err(Error::InvalidRating(rating));
        }
        let url = endpoint(&self.base, &["posts", checked_id(post_id)?, "rate"]);
        let body = RatePost {
            rating_value: rating,
        };
        self.inner.request(Method::POST, url, Some(&body)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{api::Sort, post::Category};

    fn client(token: Option<&str>) -> ContentClient {
        ContentClient::new(
            ApiClient::with_limit(token.map(str::to_string), 2),
            Url::parse("http://localhost:8082").unwrap(),
        )
    }

    #[test]
    fn list_url_carries_paging_and_category() {
        let query = PostQuery::new(10, Some(Category::Book)).page(2);
        assert_eq!(
            client(None).list_url(&query).as_str(),
            "http://localhost:8082/posts?page=2&limit=10&category=book"
        );

        let query = PostQuery::new(10, None);
        assert_eq!(
            client(None).list_url(&query).as_str(),
            "http://localhost:8082/posts?page=1&limit=10"
        );

        let query = PostQuery::new(10, None).sorted(Some(Sort::TopRated));
        assert_eq!(
            client(None).list_url(&query).as_str(),
            "http://localhost:8082/posts?page=1&limit=10&sort=top-rated"
        );
    }

    #[tokio::test]
    async fn mutations_need_a_token() {
        let client = client(None);
        assert!(matches!(
            client.toggle_like("1").await,
            Err(Error::NotAuthenticated)
        ));
        assert!(matches!(
            client.add_comment("1", "hello").await,
            Err(Error::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn invalid_input_is_refused_before_sending() {
        let client = client(Some("t0k3n"));
        assert!(matches!(
            client.rate_post("1", 6).await,
            Err(Error::InvalidRating(6))
        ));
        assert!(matches!(
            client.toggle_like(" ").await,
            Err(Error::InvalidId(_))
        ));
        assert!(matches!(
            client.add_comment("1", "   ").await,
            Err(Error::EmptyField("comment"))
        ));
        assert!(matches!(
            client.search_posts("").await,
            Err(Error::EmptyField(_))
        ));
    }
}
