//! Terminal rendering of the view state.

use log::info;

use crate::{
    comment::Comment,
    follow::{FollowState, FollowStatus},
    post::Post,
    profile::Profile,
};

pub fn follow_label(follows: &FollowState, author_id: Option<&str>) -> &'static str {
    match author_id.and_then(|id| follows.get(id)) {
        Some(FollowStatus::Following) => "Following",
        Some(FollowStatus::Unknown) => "Follow?",
        Some(FollowStatus::NotFollowing) | None => "Follow",
    }
}

pub fn star_bar(post: &Post) -> String {
    let filled = post.stars() as usize;
    format!("{}{}", "*".repeat(filled), ".".repeat(5 - filled))
}

pub fn display_posts(posts: &[Post], follows: &FollowState) {
    if !log::log_enabled!(log::Level::Info) {
        return;
    }

    let (mut id_width, mut author_width) = (4_usize, 8_usize);
    for post in posts {
        id_width = post.id.len().max(id_width);
        author_width = post.author_name().len().max(author_width);
    }

    info!(
        "+-{:-<id_width$}-+-{:-<author_width$}-+-{:-<9}-+-{:-<8}-+-{:-<5}-+-{}------- - -",
        " Id ", " Author ", " Follow ", " Type ", " Rate ", " Title "
    );
    for post in posts {
        info!(
            "| {:id_width$} | {:author_width$} | {:9} | {:8} | {} | {} ({} likes{}, {} comments)",
            post.id,
            post.author_name(),
            follow_label(follows, post.author_id.as_deref()),
            post.category,
            star_bar(post),
            post.title,
            post.like_count,
            if post.liked { ", liked" } else { "" },
            post.comment_count,
        );
        if let Some(review) = post.body.review() {
            info!(
                "| {:id_width$} | {:author_width$} | {:9} | {:8} |       |   {} / {} / {}",
                "", "", "", "", review.author, review.genre, review.year
            );
        }
    }
    info!(
        "+-{}-+-{}-+-----------+----------+-------+------------ - -",
        "-".repeat(id_width),
        "-".repeat(author_width)
    );
}

pub fn display_comments(comments: &[Comment], follows: &FollowState) {
    if comments.is_empty() {
        info!("  (no comments yet)");
        return;
    }
    for comment in comments {
        let time = comment
            .created_at
            .map(|time| time.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        info!(
            "  {} [{}] {}: {}{}",
            time,
            follow_label(follows, comment.author_id.as_deref()),
            comment.author_name,
            comment.text,
            if comment.pending { " (sending)" } else { "" }
        );
    }
}

pub fn display_profile(profile: &Profile, follows: &FollowState) {
    info!(
        "{} ({} followers, {} following)",
        profile.user.display_name().unwrap_or("User"),
        profile.followers,
        profile.following
    );
    if let Some(bio) = profile.user.bio.as_deref().filter(|bio| !bio.is_empty()) {
        info!("{}", bio);
    }
    info!("");
    display_posts(&profile.posts, follows);
}
