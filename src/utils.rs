use std::fmt;

use serde::{Deserialize, Serialize};

#[macro_export]
macro_rules! step {
  ($name:expr, $($tail:tt)*) => {
    {
      log::info!("* {}", $name);
      let now = std::time::Instant::now();
      let value = $($tail)*;
      log::debug!("Done  `{}` ({} ms)", $name, now.elapsed().as_millis());
      value
    }
  };
}

/// Identifier as the services send it: the content service uses numeric
/// ids, older records and the user service sometimes use strings.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum RawId {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawId {
    /// Returns the canonical string form, or `None` when the id is unusable.
    pub fn canonical(&self) -> Option<String> {
        let id = match self {
            Self::Int(0) => return None,
            Self::Int(id) => id.to_string(),
            Self::Float(id) if *id == 0.0 || !id.is_finite() => return None,
            Self::Float(id) if id.fract() == 0.0 => format!("{}", *id as i64),
            Self::Float(id) => id.to_string(),
            Self::Text(id) => id.trim().to_string(),
        };
        (!id.is_empty()).then_some(id)
    }
}

impl fmt::Display for RawId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{}", id),
            Self::Float(id) => write!(f, "{}", id),
            Self::Text(id) => write!(f, "{}", id),
        }
    }
}

/// List responses come either bare or wrapped in an object.
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum Listing<T> {
    Bare(Vec<T>),
    Wrapped {
        #[serde(alias = "posts", alias = "comments", alias = "followers", alias = "following")]
        items: Vec<T>,
    },
}

impl<T> Listing<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Bare(items) | Self::Wrapped { items } => items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_ids() {
        assert_eq!(RawId::Int(7).canonical().as_deref(), Some("7"));
        assert_eq!(RawId::Int(0).canonical(), None);
        assert_eq!(RawId::Float(12.0).canonical().as_deref(), Some("12"));
        assert_eq!(RawId::Text(" p-9 ".into()).canonical().as_deref(), Some("p-9"));
        assert_eq!(RawId::Text("   ".into()).canonical(), None);
    }

    #[test]
    fn listing_shapes() {
        let bare: Listing<u32> = serde_json::from_str("[1,2,3]").unwrap();
        assert_eq!(bare.into_vec(), vec![1, 2, 3]);

        let wrapped: Listing<u32> = serde_json::from_str(r#"{"posts":[4,5]}"#).unwrap();
        assert_eq!(wrapped.into_vec(), vec![4, 5]);

        let comments: Listing<u32> = serde_json::from_str(r#"{"comments":[]}"#).unwrap();
        assert!(comments.into_vec().is_empty());
    }
}
