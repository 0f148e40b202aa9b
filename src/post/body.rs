use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Category;

pub const DEFAULT_YEAR: i32 = 2024;
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// What a post carries besides its title.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum PostBody {
    Text { text: String },
    Review(Review),
}

impl PostBody {
    /// Reads a post body for the given category.
    ///
    /// Book, movie and show posts embed their metadata as a JSON object in
    /// the body. Anything that does not parse as such an object is kept as
    /// the description and every other field takes its default.
    pub fn parse(category: Category, content: Option<&str>) -> Self {
        let content = content.unwrap_or_default();
        if !category.is_media() {
            return Self::Text {
                text: content.to_string(),
            };
        }

        match serde_json::from_str::<Value>(content) {
            Ok(Value::Object(fields)) => Self::Review(Review::from_fields(category, &fields)),
            _ => Self::Review(Review {
                description: content.to_string(),
                ..Review::defaults(category)
            }),
        }
    }

    /// Plain text shown as the post's description.
    pub fn text(&self) -> &str {
        match self {
            Self::Text { text } => text,
            Self::Review(review) => &review.description,
        }
    }

    pub fn review(&self) -> Option<&Review> {
        match self {
            Self::Review(review) => Some(review),
            Self::Text { .. } => None,
        }
    }
}

/// Metadata of a book, movie or show post.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Review {
    pub author: String,
    pub description: String,
    pub genre: String,
    pub year: i32,
}

impl Review {
    pub fn defaults(category: Category) -> Self {
        Self {
            author: UNKNOWN_AUTHOR.to_string(),
            description: String::new(),
            genre: category.default_genre().to_string(),
            year: DEFAULT_YEAR,
        }
    }

    fn from_fields(category: Category, fields: &Map<String, Value>) -> Self {
        let text = |key: &str| {
            fields
                .get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };
        let defaults = Self::defaults(category);

        Self {
            author: text("author").unwrap_or(defaults.author),
            description: text("description").unwrap_or(defaults.description),
            genre: text("genre").unwrap_or(defaults.genre),
            year: fields.get("year").and_then(parse_year).unwrap_or(defaults.year),
        }
    }

    /// Encodes the review the way the services store it in a post body.
    /// Blank fields are replaced by their defaults first.
    pub fn encode(&self, category: Category) -> String {
        let defaults = Self::defaults(category);
        let pick = |value: &str, default: String| {
            let value = value.trim();
            if value.is_empty() {
                default
            } else {
                value.to_string()
            }
        };
        let year = if self.year > 0 { self.year } else { DEFAULT_YEAR };

        let mut fields = Map::new();
        if category == Category::Book {
            fields.insert("author".into(), pick(&self.author, defaults.author).into());
        }
        fields.insert("description".into(), self.description.trim().into());
        fields.insert("genre".into(), pick(&self.genre, defaults.genre).into());
        fields.insert("year".into(), year.to_string().into());
        Value::Object(fields).to_string()
    }
}

/// Reads a year from a number or from the leading digits of a string.
/// Zero counts as missing.
fn parse_year(value: &Value) -> Option<i32> {
    let year = match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|year| year.trunc() as i64))
            .and_then(|year| i32::try_from(year).ok())?,
        Value::String(text) => {
            let text = text.trim_start();
            let (sign, digits) = match text.strip_prefix('-') {
                Some(rest) => (-1, rest),
                None => (1, text.strip_prefix('+').unwrap_or(text)),
            };
            let end = digits
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(digits.len());
            sign * digits[..end].parse::<i32>().ok()?
        }
        _ => return None,
    };
    (year != 0).then_some(year)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_show_body() {
        let body = PostBody::parse(Category::Show, Some(r#"{"genre":"Mystery","year":"2019"}"#));
        let review = body.review().unwrap();
        assert_eq!(review.genre, "Mystery");
        assert_eq!(review.year, 2019);
        assert_eq!(review.description, "");
    }

    #[test]
    fn plain_text_falls_back_to_defaults() {
        let body = PostBody::parse(Category::Movie, Some("plain text"));
        let review = body.review().unwrap();
        assert_eq!(review.genre, "Drama");
        assert_eq!(review.year, 2024);
        assert_eq!(review.description, "plain text");

        let book = PostBody::parse(Category::Book, Some("plain text"));
        let review = book.review().unwrap();
        assert_eq!(review.genre, "Fiction");
        assert_eq!(review.author, UNKNOWN_AUTHOR);
    }

    #[test]
    fn general_posts_stay_text() {
        let body = PostBody::parse(Category::General, Some(r#"{"genre":"Mystery"}"#));
        assert_eq!(body.text(), r#"{"genre":"Mystery"}"#);
        assert!(body.review().is_none());
    }

    #[test]
    fn year_forms() {
        assert_eq!(parse_year(&Value::from(1999)), Some(1999));
        assert_eq!(parse_year(&Value::from("1999 (remaster)")), Some(1999));
        assert_eq!(parse_year(&Value::from("soon")), None);
        assert_eq!(parse_year(&Value::from("0")), None);
        assert_eq!(parse_year(&Value::Null), None);

        let body = PostBody::parse(Category::Book, Some(r#"{"year":"unknown","genre":""}"#));
        let review = body.review().unwrap();
        assert_eq!(review.year, DEFAULT_YEAR);
        assert_eq!(review.genre, "Fiction");
    }

    #[test]
    fn encode_applies_defaults() {
        let review = Review {
            author: " ".into(),
            description: "A slow burn".into(),
            genre: String::new(),
            year: 0,
        };
        let encoded = review.encode(Category::Book);
        let back = PostBody::parse(Category::Book, Some(&encoded));
        assert_eq!(
            back.review().unwrap(),
            &Review {
                author: UNKNOWN_AUTHOR.into(),
                description: "A slow burn".into(),
                genre: "Fiction".into(),
                year: 2024,
            }
        );

        let show: Value = serde_json::from_str(&review.encode(Category::Show)).unwrap();
        assert!(show.get("author").is_none());
        assert_eq!(show["genre"], "Drama");
    }
}
