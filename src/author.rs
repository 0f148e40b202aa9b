use std::collections::HashMap;

use futures::future::join_all;
use log::{debug, warn};

use crate::{api::SocialGateway, follow::distinct_authors};

pub const ANONYMOUS: &str = "Anonymous";

/// Display names resolved during this session. Entries are never
/// invalidated. A failed lookup leaves no entry, so the next batch asks again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorDisplayCache(HashMap<String, String>);

impl AuthorDisplayCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, user_id: &str) -> Option<&str> {
        self.0.get(user_id).map(String::as_str)
    }

    /// Name to show for `user_id`, falling back to [`ANONYMOUS`].
    pub fn name(&self, user_id: Option<&str>) -> &str {
        user_id.and_then(|id| self.get(id)).unwrap_or(ANONYMOUS)
    }

    pub fn insert(&mut self, user_id: impl Into<String>, name: impl Into<String>) {
        self.0.insert(user_id.into(), name.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Looks up the users not cached yet, all at once.
    pub async fn resolve<'a, G: SocialGateway>(
        &mut self,
        gateway: &G,
        ids: impl IntoIterator<Item = &'a str>,
    ) {
        let missing: Vec<String> = distinct_authors(ids)
            .into_iter()
            .filter(|id| !self.0.contains_key(id))
            .collect();
        if missing.is_empty() {
            return;
        }
        debug!("resolving {} author names", missing.len());

        let lookups = missing.into_iter().map(|id| async move {
            match gateway.get_user(&id).await {
                Ok(user) => {
                    let name = user.display_name().unwrap_or(ANONYMOUS).to_string();
                    Some((id, name))
                }
                Err(e) => {
                    warn!("user {} unavailable: {}", id, e);
                    None
                }
            }
        });

        self.0.extend(join_all(lookups).await.into_iter().flatten());
    }
}
