pub mod api;
pub mod author;
pub mod comment;
pub mod config;
pub mod display;
pub mod error;
pub mod feed;
pub mod follow;
pub mod post;
pub mod profile;
pub mod session;
pub mod utils;
pub mod varta;

pub use error::{Error, ErrorKind, Result};
