use std::error::Error;

use log::{info, warn};
use varta_feed::{
    api::VartaClient,
    comment::CommentPanel,
    config::{Command, Config},
    display::{display_comments, display_posts, display_profile},
    feed::Feed,
    post::{normalize_page, Post, Review},
    profile::Profile,
    session::Session,
    step,
    varta::{post::NewPost, User},
    ErrorKind,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::parse();
    config.init_logger();
    info!("# VartaVerse #");
    info!("");

    let mut client = VartaClient::new(&config);
    let mut session = sign_in(&config, &mut client).await;

    match run(&config, &client, &mut session).await {
        Ok(()) => {
            info!("");
            info!("All done!");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::Business => {
            warn!("{}", e);
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

/// Works out who the viewer is. Without a token everything is read-only.
async fn sign_in(config: &Config, client: &mut VartaClient) -> Session {
    if config.token().is_none() {
        info!("No token configured, browsing read-only");
        return Session::new();
    }
    if !config.command.needs_viewer() {
        return Session::new();
    }

    let user = match client.users.me().await {
        Ok(user) => Some(user),
        Err(e) => {
            warn!("Could not load the signed-in user: {}", e);
            None
        }
    };
    let Some(viewer) = config.viewer().or_else(|| user.as_ref().and_then(User::id)) else {
        return Session::new();
    };
    let name = user
        .as_ref()
        .and_then(User::display_name)
        .unwrap_or(viewer.as_str())
        .to_string();

    info!("Signed in as {} ({})", name, viewer);
    info!("");
    client.set_viewer(viewer.clone());
    Session::signed_in(viewer, name)
}

async fn run(config: &Config, client: &VartaClient, session: &mut Session) -> varta_feed::Result<()> {
    match &config.command {
        Command::Feed {
            category,
            sort,
            pages,
            comments,
        } => {
            let mut feed = Feed::new(config.page_size(), *category).sorted(*sort);
            step!("Loading feed", feed.load_first(client, session).await)?;
            while feed.page() < *pages && feed.has_more() {
                step!("Loading more posts", feed.load_more(client, session).await)?;
            }
            info!("");
            display_posts(feed.posts(), &session.follows);

            if *comments {
                let ids: Vec<String> = feed.posts().iter().map(|post| post.id.clone()).collect();
                for id in ids {
                    feed.toggle_comments(client, session, &id).await?;
                    if let (Some(post), Some(panel)) = (feed.post(&id), feed.panel(&id)) {
                        info!("");
                        info!("# {} ({})", post.title, post.id);
                        display_comments(panel.comments(), &session.follows);
                    }
                }
            }

            if feed.has_more() {
                info!("");
                info!("More posts available (--pages {})", feed.page() + 1);
            }
        }
        Command::Comments { post_id } => {
            let post = load_post(client, post_id).await?;
            let mut panel = CommentPanel::new(post.id.as_str());
            step!("Loading comments", panel.expand(client, session).await);
            info!("# {} ({} comments)", post.title, post.comment_count);
            display_comments(panel.comments(), &session.follows);
        }
        Command::Like { post_id } => {
            client.content.toggle_like(post_id).await?;
            info!("Toggled like on post {}", post_id);
        }
        Command::Comment { post_id, text } => {
            let mut post = load_post(client, post_id).await?;
            let mut panel = CommentPanel::new(post.id.as_str());
            panel.expand(client, session).await;
            if panel.submit(client, session, &mut post, text).await? {
                info!("Comment added ({} comments)", post.comment_count);
            } else {
                warn!("Comment is empty, nothing was sent");
            }
            display_comments(panel.comments(), &session.follows);
        }
        Command::Follow { user_id } => {
            session.follow(client, user_id).await?;
            info!("Following {}", user_id);
        }
        Command::Unfollow { user_id } => {
            session.unfollow(client, user_id).await?;
            info!("Unfollowed {}", user_id);
        }
        Command::Delete { post_id } => {
            client.content.delete_post(post_id).await?;
            info!("Deleted post {}", post_id);
        }
        Command::Post {
            title,
            text,
            category,
            author,
            genre,
            year,
        } => {
            let content = if category.is_media() {
                Review {
                    author: author.clone().unwrap_or_default(),
                    description: text.clone(),
                    genre: genre.clone().unwrap_or_default(),
                    year: year.unwrap_or_default(),
                }
                .encode(*category)
            } else {
                text.trim().to_string()
            };
            let post = NewPost {
                title: title.trim().to_string(),
                content,
                category: category.as_str().to_string(),
            };
            let created = client.content.create_post(&post).await?;
            match Post::normalize(created) {
                Some(created) => info!("Created {} post {}", created.category, created.id),
                None => info!("Created {} post", category),
            }
        }
        Command::Rate { post_id, rating } => {
            client.content.rate_post(post_id, *rating).await?;
            info!("Rated post {} with {}/5", post_id, rating);
        }
        Command::Profile => {
            let profile = step!("Loading profile", Profile::load(client, config.page_size()).await)?;
            let authors: Vec<String> = profile
                .posts
                .iter()
                .filter_map(|post| post.author_id.clone())
                .collect();
            session.resolve_authors(client, &authors).await;
            display_profile(&profile, &session.follows);
        }
        Command::Trending => {
            let posts = step!("Loading trending posts", client.content.trending_posts().await)?;
            show_listing(client, session, normalize_page(posts)).await;
        }
        Command::Search { query } => {
            let posts = step!("Searching", client.content.search_posts(query).await)?;
            show_listing(client, session, normalize_page(posts)).await;
        }
    }
    Ok(())
}

async fn load_post(client: &VartaClient, post_id: &str) -> varta_feed::Result<Post> {
    let raw = client.content.get_post(post_id).await?;
    Post::normalize(raw).ok_or(varta_feed::Error::MissingIdentifier)
}

async fn show_listing(client: &VartaClient, session: &mut Session, mut posts: Vec<Post>) {
    let authors: Vec<String> = posts.iter().filter_map(|post| post.author_id.clone()).collect();
    session.resolve_authors(client, &authors).await;
    for post in posts.iter_mut().filter(|post| post.author_name.is_none()) {
        if let Some(name) = post.author_id.as_deref().and_then(|id| session.authors.get(id)) {
            post.author_name = Some(name.to_string());
        }
    }
    info!("");
    display_posts(&posts, &session.follows);
}
