use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Coarse classification used to pick a degradation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network failures and server-side faults.
    Transport,
    /// Responses that could not be understood.
    Malformed,
    /// The request was refused for a reason the user can act on.
    Business,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{url} answered {status}")]
    Status { status: StatusCode, url: String },
    #[error("unreadable response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("record has no usable identifier")]
    MissingIdentifier,
    #[error("please login first")]
    NotAuthenticated,
    #[error("invalid id `{0}`")]
    InvalidId(String),
    #[error("request rejected by {url}")]
    Rejected { url: String },
    #[error("rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) | Self::Status { .. } => ErrorKind::Transport,
            Self::Decode(_) | Self::MissingIdentifier => ErrorKind::Malformed,
            Self::NotAuthenticated
            | Self::InvalidId(_)
            | Self::Rejected { .. }
            | Self::InvalidRating(_)
            | Self::EmptyField(_) => ErrorKind::Business,
        }
    }

    /// Maps a non-success status to the matching error.
    pub fn from_status(status: StatusCode, url: &str) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::NotAuthenticated,
            StatusCode::NOT_FOUND => Self::InvalidId(last_segment(url).to_string()),
            StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                Self::Rejected {
                    url: url.to_string(),
                }
            }
            status => Self::Status {
                status,
                url: url.to_string(),
            },
        }
    }
}

fn last_segment(url: &str) -> &str {
    let path = url.split('?').next().unwrap_or(url);
    path.trim_end_matches('/').rsplit('/').next().unwrap_or(path)
}
