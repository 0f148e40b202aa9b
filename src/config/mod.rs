pub mod command;

use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use dotenv::dotenv;
use url::Url;

pub use command::Command;

#[derive(Debug, Clone, Parser)]
#[command(name = "varta-feed", version, about = "Browse VartaVerse from the terminal")]
pub struct Config {
    /// Base url of the content service
    #[arg(long, env = "CONTENT_API_URL", default_value = "http://localhost:8082")]
    content_url: Url,
    /// Base url of the user service
    #[arg(long, env = "USER_API_URL", default_value = "http://localhost:8083")]
    user_url: Url,
    /// Bearer token of the signed-in user
    #[arg(long, env = "VARTA_TOKEN", hide_env_values = true)]
    token: Option<String>,
    /// Id of the signed-in user [default: resolved from /users/me]
    #[arg(long, env = "VARTA_VIEWER_ID")]
    viewer: Option<String>,
    /// Limit request concurrency
    #[arg(long, default_value = "5")]
    limit: usize,
    /// Posts per page
    #[arg(long, default_value = "10")]
    page_size: u32,
    #[command(flatten)]
    pub verbose: Verbosity<InfoLevel>,
    #[command(subcommand)]
    pub command: Command,
}

impl Config {
    /// Parse the configuration from the environment and command line arguments
    pub fn parse() -> Self {
        dotenv().ok();
        <Self as Parser>::parse()
    }
    /// Create a logger with the configured verbosity level
    pub fn init_logger(&self) {
        env_logger::Builder::new()
            .filter_level(self.verbose.log_level_filter())
            .format_target(false)
            .init();
    }
    pub fn content_url(&self) -> &Url {
        &self.content_url
    }
    pub fn user_url(&self) -> &Url {
        &self.user_url
    }
    pub fn token(&self) -> Option<String> {
        self.token
            .as_deref()
            .map(|token| token.trim().trim_start_matches("Bearer ").trim().to_string())
            .filter(|token| !token.is_empty())
    }
    pub fn viewer(&self) -> Option<String> {
        self.viewer
            .as_deref()
            .map(str::trim)
            .filter(|viewer| !viewer.is_empty())
            .map(str::to_string)
    }
    pub const fn limit(&self) -> usize {
        self.limit
    }
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{api::Sort, post::Category};

    #[test]
    fn defaults_and_overrides() {
        let config = Config::try_parse_from([
            "varta-feed",
            "--token",
            "Bearer abc",
            "--page-size",
            "5",
            "feed",
            "--category",
            "book",
        ])
        .unwrap();

        assert_eq!(config.content_url().as_str(), "http://localhost:8082/");
        assert_eq!(config.token().as_deref(), Some("abc"));
        assert_eq!(config.page_size(), 5);
        assert!(matches!(
            config.command,
            Command::Feed {
                category: Some(Category::Book),
                ..
            }
        ));
    }

    #[test]
    fn feed_sort_flag() {
        let config =
            Config::try_parse_from(["varta-feed", "feed", "--sort", "top-rated"]).unwrap();
        assert!(matches!(
            config.command,
            Command::Feed {
                sort: Some(Sort::TopRated),
                ..
            }
        ));
    }

    #[test]
    fn blank_token_is_none() {
        let config = Config::try_parse_from(["varta-feed", "--token", "  ", "profile"]).unwrap();
        assert_eq!(config.token(), None);
    }
}
