//! Site configuration. There is no configuration file: everything is a
//! constant in this module. [`Config`] gathers the constants into a value so
//! the rest of the crate (and its tests) never reads them directly.

use std::path::{Path, PathBuf};

/// Directory under the home directory holding the Markdown sources.
pub const SOURCE_DIR: &str = "Code/website-sources";

/// Directory under the home directory receiving the generated site.
pub const DESTINATION_DIR: &str = "Code/website";

/// Directory under [`SOURCE_DIR`] holding the posts.
pub const POSTS_DIR: &str = "posts";

/// Directory holding the templates, relative to the working directory.
pub const TEMPLATES_DIR: &str = "templates";

/// Site feed location, relative to [`DESTINATION_DIR`].
pub const FEED_PATH: &str = "feeds/feed.xml";

/// Number of posts per index page.
pub const POSTS_PER_PAGE: usize = 10;

/// Maximum number of posts in a feed.
pub const POSTS_IN_FEED: usize = 20;

/// Separates a post's excerpt from the rest of its content.
pub const EXCERPT_SEPARATOR: &str = "<!-- read more -->";

/// Image files looked up next to a post source, in order of preference.
pub const POST_IMAGE_FILES: &[&str] = &["index.jpg", "index.jpeg", "index.png"];

/// Title of the site, used for index pages and the site feed.
pub const SITE_TITLE: &str = "Website";

/// Absolute base URL of the published site. Feeds need absolute links.
pub const SITE_URL: &str = "http://localhost/";

/// Glob patterns, relative to [`SOURCE_DIR`], excluded from processing.
/// Directories that match are not descended into.
pub const IGNORE: &[&str] = &[
    "README.md",
    "test",
    "LICENSE",
    ".git",
    ".git/*",
    "drafts",
    "drafts/*",
];

/// Everything the generator needs to know about where things live.
#[derive(Clone, Debug)]
pub struct Config {
    pub source_directory: PathBuf,
    pub destination_directory: PathBuf,
    pub posts_directory: PathBuf,
    pub templates_directory: PathBuf,
    pub feed_path: PathBuf,
    pub posts_per_page: usize,
    pub posts_in_feed: usize,
    pub excerpt_separator: String,
    pub post_image_files: Vec<String>,
    pub site_title: String,
    pub site_url: String,
    pub ignore: Vec<String>,
}

impl Config {
    /// Builds a [`Config`] from the module constants, with the source and
    /// destination directories swapped for `source` and `destination`. Every
    /// other path is derived from these two roots.
    pub fn with_roots(source: &Path, destination: &Path) -> Config {
        Config {
            source_directory: source.to_owned(),
            destination_directory: destination.to_owned(),
            posts_directory: source.join(POSTS_DIR),
            templates_directory: PathBuf::from(TEMPLATES_DIR),
            feed_path: destination.join(FEED_PATH),
            posts_per_page: POSTS_PER_PAGE,
            posts_in_feed: POSTS_IN_FEED,
            excerpt_separator: EXCERPT_SEPARATOR.to_owned(),
            post_image_files: POST_IMAGE_FILES.iter().map(|f| f.to_string()).collect(),
            site_title: SITE_TITLE.to_owned(),
            site_url: SITE_URL.to_owned(),
            ignore: IGNORE.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl Default for Config {
    /// Resolves [`SOURCE_DIR`] and [`DESTINATION_DIR`] against the user's
    /// home directory. Without a home directory they resolve against the
    /// working directory.
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_default();
        Config::with_roots(&home.join(SOURCE_DIR), &home.join(DESTINATION_DIR))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_with_roots_derives_paths() {
        let config = Config::with_roots(
            Path::new("/home/user/source-dir"),
            Path::new("/home/user/destination-dir"),
        );
        assert_eq!(
            config.posts_directory,
            PathBuf::from("/home/user/source-dir/posts")
        );
        assert_eq!(
            config.feed_path,
            PathBuf::from("/home/user/destination-dir/feeds/feed.xml")
        );
        assert_eq!(config.posts_per_page, 10);
        assert_eq!(config.posts_in_feed, 20);
        assert!(config.ignore.iter().any(|p| p == "drafts/*"));
    }
}
