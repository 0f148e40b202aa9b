use clap::Subcommand;

use crate::{api::Sort, post::Category};

#[derive(Debug, Clone, Subcommand, PartialEq)]
pub enum Command {
    /// Show the post feed with the follow status of every author
    Feed {
        /// Only show posts of this category
        #[arg(short, long, value_enum)]
        category: Option<Category>,
        /// Order of the listing
        #[arg(short, long, value_enum)]
        sort: Option<Sort>,
        /// How many pages to load
        #[arg(short, long, default_value = "1")]
        pages: u32,
        /// Expand the comments of every post
        #[arg(long)]
        comments: bool,
    },
    /// Show the comments of a post
    Comments { post_id: String },
    /// Like or unlike a post
    Like { post_id: String },
    /// Comment on a post
    Comment { post_id: String, text: String },
    /// Follow a user
    Follow { user_id: String },
    /// Unfollow a user
    Unfollow { user_id: String },
    /// Delete one of your posts
    Delete { post_id: String },
    /// Create a post, or a book/movie/show review
    Post {
        title: String,
        /// Post text, or the review's description
        text: String,
        #[arg(short, long, value_enum, default_value = "general")]
        category: Category,
        /// Book author
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        genre: Option<String>,
        #[arg(long)]
        year: Option<i32>,
    },
    /// Rate a post from 1 to 5
    Rate {
        post_id: String,
        #[arg(value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: u8,
    },
    /// Show your follower counts and posts
    Profile,
    /// Show the most liked posts
    Trending,
    /// Search posts by title and text
    Search { query: String },
}

impl Command {
    /// Whether the command acts for the signed-in user.
    pub fn needs_viewer(&self) -> bool {
        !matches!(self, Self::Trending | Self::Search { .. })
    }
}
