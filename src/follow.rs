//! Follow status of the authors the viewer is looking at.
//!
//! A feed page or a comment thread is reconciled as one batch: every distinct
//! author is looked up once, all lookups run together, and the results are
//! merged into the session's [`FollowState`] by key.

use std::collections::{HashMap, HashSet};

use futures::future::join_all;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::api::SocialGateway;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, Hash, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FollowStatus {
    Following,
    NotFollowing,
    /// The lookup failed. Rendered like [`FollowStatus::NotFollowing`].
    Unknown,
}

impl FollowStatus {
    pub fn is_following(&self) -> bool {
        *self == Self::Following
    }
}

impl From<bool> for FollowStatus {
    fn from(following: bool) -> Self {
        if following {
            Self::Following
        } else {
            Self::NotFollowing
        }
    }
}

/// `user_id -> status`, one entry per user, last write wins.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct FollowState(HashMap<String, FollowStatus>);

impl FollowState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, user_id: &str) -> Option<FollowStatus> {
        self.0.get(user_id).copied()
    }

    /// What the follow button shows. Unknown and missing entries read as
    /// not following.
    pub fn is_following(&self, user_id: &str) -> bool {
        self.get(user_id).is_some_and(|status| status.is_following())
    }

    pub fn set(&mut self, user_id: impl Into<String>, status: FollowStatus) {
        self.0.insert(user_id.into(), status);
    }

    /// Overwrites every key present in `other`.
    pub fn merge(mut self, other: impl IntoIterator<Item = (String, FollowStatus)>) -> Self {
        self.0.extend(other);
        self
    }

    /// Users whose last lookup failed.
    pub fn unknown(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|(_, status)| **status == FollowStatus::Unknown)
            .map(|(id, _)| id.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Distinct, non-empty ids in first-seen order.
pub fn distinct_authors<'a>(ids: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.into_iter()
        .map(str::trim)
        .filter(|id| !id.is_empty() && seen.insert(*id))
        .map(str::to_string)
        .collect()
}

/// Looks up every distinct author once and merges the answers into `state`.
///
/// A failed lookup only affects its own author, which is recorded as
/// [`FollowStatus::Unknown`].
pub async fn reconcile<'a, G: SocialGateway>(
    gateway: &G,
    ids: impl IntoIterator<Item = &'a str>,
    state: FollowState,
) -> FollowState {
    let authors = distinct_authors(ids);
    if authors.is_empty() {
        return state;
    }
    debug!("reconciling follow status of {} authors", authors.len());

    let lookups = authors.into_iter().map(|id| async move {
        let status = match gateway.is_following(&id).await {
            Ok(following) => FollowStatus::from(following),
            Err(e) => {
                warn!("follow status of {} unavailable: {}", id, e);
                FollowStatus::Unknown
            }
        };
        (id, status)
    });

    state.merge(join_all(lookups).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_keeps_first_occurrence() {
        let ids = distinct_authors(["3", "1", "3", " ", "2", "1"]);
        assert_eq!(ids, vec!["3", "1", "2"]);
    }

    #[test]
    fn merge_is_last_write_wins() {
        let mut state = FollowState::new();
        state.set("1", FollowStatus::Following);
        state.set("2", FollowStatus::Unknown);

        let state = state.merge([
            ("2".to_string(), FollowStatus::Following),
            ("3".to_string(), FollowStatus::NotFollowing),
        ]);

        assert_eq!(state.len(), 3);
        assert!(state.is_following("1"));
        assert!(state.is_following("2"));
        assert!(!state.is_following("3"));
        assert!(!state.is_following("4"));
        assert_eq!(state.unknown().count(), 0);
    }

    #[test]
    fn unknown_reads_as_not_following() {
        let mut state = FollowState::new();
        state.set("9", FollowStatus::Unknown);
        assert!(!state.is_following("9"));
        assert_eq!(state.unknown().collect::<Vec<_>>(), vec!["9"]);
    }
}
