mod body;

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use clap::ValueEnum;
use log::debug;
use serde::{Deserialize, Serialize};

pub use body::{PostBody, Review, DEFAULT_YEAR, UNKNOWN_AUTHOR};

use crate::{utils::RawId, varta::post::RawPost};

#[derive(Deserialize, Serialize, Debug, Clone, Copy, Hash, ValueEnum, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    General,
    Review,
    Book,
    Movie,
    Show,
}

impl Category {
    /// Reads the service's category tag. Unknown tags are general posts.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "book" | "books" => Self::Book,
            "movie" | "movies" | "film" => Self::Movie,
            "show" | "shows" | "tv" | "series" => Self::Show,
            "review" | "reviews" => Self::Review,
            _ => Self::General,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Review => "review",
            Self::Book => "book",
            Self::Movie => "movie",
            Self::Show => "show",
        }
    }

    /// Categories whose body is a JSON-encoded review payload.
    pub fn is_media(&self) -> bool {
        matches!(self, Self::Book | Self::Movie | Self::Show)
    }

    pub fn default_genre(&self) -> &'static str {
        match self {
            Self::Book => "Fiction",
            _ => "Drama",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A post in the shape the feed works with.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Post {
    pub id: String,
    pub author_id: Option<String>,
    pub author_name: Option<String>,
    pub title: String,
    pub body: PostBody,
    pub category: Category,
    pub like_count: u32,
    pub comment_count: u32,
    pub liked: bool,
    pub average_rating: Option<f64>,
    pub created_at: Option<NaiveDateTime>,
}

impl Post {
    /// Normalizes one raw record, or returns `None` when it has no usable id.
    pub fn normalize(raw: RawPost) -> Option<Self> {
        let id = [&raw.id, &raw.post_id]
            .into_iter()
            .flatten()
            .find_map(RawId::canonical);
        let Some(id) = id else {
            debug!("dropping post without id: {:?}", raw.title);
            return None;
        };

        let category = raw
            .category
            .as_deref()
            .map(Category::from_tag)
            .unwrap_or_default();
        let author = raw.author.unwrap_or_default();
        let author_id = raw
            .user_id
            .as_ref()
            .or(author.id.as_ref())
            .and_then(RawId::canonical);
        let author_name = author
            .name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        Some(Self {
            id,
            author_id,
            author_name,
            title: raw.title.unwrap_or_default(),
            body: PostBody::parse(category, raw.content.as_deref()),
            category,
            like_count: raw.likes_count.unwrap_or_default(),
            comment_count: raw.comments_count.unwrap_or_default(),
            liked: raw.liked.unwrap_or_default(),
            average_rating: raw.average_rating.filter(|rating| rating.is_finite()),
            created_at: raw.created_at.as_deref().and_then(parse_timestamp),
        })
    }

    pub fn author_name(&self) -> &str {
        self.author_name.as_deref().unwrap_or(crate::author::ANONYMOUS)
    }

    /// Filled stars out of five for the average rating.
    pub fn stars(&self) -> u8 {
        self.average_rating
            .map(|rating| rating.floor().clamp(0.0, 5.0) as u8)
            .unwrap_or_default()
    }
}

/// Normalizes a page of raw posts, silently dropping the unusable ones.
pub fn normalize_page(raw: Vec<RawPost>) -> Vec<Post> {
    let total = raw.len();
    let posts: Vec<Post> = raw.into_iter().filter_map(Post::normalize).collect();
    if posts.len() < total {
        debug!("{} of {} posts dropped", total - posts.len(), total);
    }
    posts
}

/// Reads the services' timestamps: Java local date-times without an offset,
/// RFC 3339, or a bare date.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(time) = DateTime::parse_from_rfc3339(value) {
        return Some(time.naive_utc());
    }
    if let Ok(time) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(time);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::varta::post::RawAuthor;

    fn raw(id: Option<RawId>, post_id: Option<RawId>) -> RawPost {
        RawPost {
            id,
            post_id,
            title: Some("title".into()),
            ..Default::default()
        }
    }

    #[test]
    fn id_resolution() {
        let post = Post::normalize(raw(Some(RawId::Int(4)), Some(RawId::Int(9)))).unwrap();
        assert_eq!(post.id, "4");

        let post = Post::normalize(raw(None, Some(RawId::Int(9)))).unwrap();
        assert_eq!(post.id, "9");

        let post = Post::normalize(raw(Some(RawId::Int(0)), Some(RawId::Text("p9".into())))).unwrap();
        assert_eq!(post.id, "p9");

        assert!(Post::normalize(raw(None, None)).is_none());
        assert!(Post::normalize(raw(Some(RawId::Text(" ".into())), None)).is_none());
    }

    #[test]
    fn malformed_records_shrink_the_page() {
        let page = vec![
            raw(Some(RawId::Int(1)), None),
            raw(None, None),
            raw(None, Some(RawId::Int(3))),
            raw(Some(RawId::Text(String::new())), None),
        ];
        let posts = normalize_page(page);
        assert_eq!(posts.len(), 2);
        assert_eq!(
            posts.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(),
            vec!["1", "3"]
        );
    }

    #[test]
    fn fields_and_defaults() {
        let post = Post::normalize(RawPost {
            post_id: Some(RawId::Int(12)),
            user_id: None,
            author: Some(RawAuthor {
                id: Some(RawId::Int(7)),
                name: Some("Meera".into()),
            }),
            category: Some("Movie".into()),
            content: Some(r#"{"genre":"Mystery","year":2019}"#.into()),
            average_rating: Some(3.7),
            created_at: Some("2024-05-01T10:00:00.123".into()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(post.author_id.as_deref(), Some("7"));
        assert_eq!(post.author_name(), "Meera");
        assert_eq!(post.category, Category::Movie);
        assert_eq!(post.body.review().unwrap().genre, "Mystery");
        assert_eq!(post.stars(), 3);
        assert_eq!(post.like_count, 0);
        assert!(post.created_at.is_some());
    }

    #[test]
    fn anonymous_author() {
        let post = Post::normalize(raw(Some(RawId::Int(1)), None)).unwrap();
        assert_eq!(post.author_name(), "Anonymous");
        assert_eq!(post.stars(), 0);
    }

    #[test]
    fn category_tags() {
        assert_eq!(Category::from_tag("Books"), Category::Book);
        assert_eq!(Category::from_tag("tv"), Category::Show);
        assert_eq!(Category::from_tag("poetry"), Category::General);
        assert!(!Category::Review.is_media());
    }

    #[test]
    fn timestamps() {
        assert!(parse_timestamp("2024-05-01T10:00:00").is_some());
        assert!(parse_timestamp("2024-05-01T10:00:00Z").is_some());
        assert!(parse_timestamp("2024-05-01").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }
}
