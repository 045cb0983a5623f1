//! Where generated artifacts live, both on disk (relative to the destination
//! directory) and as site-relative URLs:
//!
//! * index pages: `index.html`, then `pages/{n}/index.html`
//! * tag pages: `tags/{tag}/index.html`, plus `tags/index.html`
//! * feeds: `feeds/{tag}.xml`, plus the site feed and `feeds/index.html`

use crate::config::Config;
use std::path::PathBuf;
use url::{ParseError, Url};

const INDEX_FILE: &str = "index.html";
const PAGES_DIR: &str = "pages";
const TAGS_DIR: &str = "tags";
const FEEDS_DIR: &str = "feeds";
const FEED_EXTENSION: &str = "xml";

/// The output file for index page `number`. Page 0 is the site root.
pub fn page_path(config: &Config, number: usize) -> PathBuf {
    match number {
        0 => config.destination_directory.join(INDEX_FILE),
        n => config
            .destination_directory
            .join(PAGES_DIR)
            .join(n.to_string())
            .join(INDEX_FILE),
    }
}

pub fn page_url(number: usize) -> String {
    match number {
        0 => String::from("/"),
        n => format!("/{}/{}/", PAGES_DIR, n),
    }
}

pub fn tag_path(config: &Config, tag: &str) -> PathBuf {
    config
        .destination_directory
        .join(TAGS_DIR)
        .join(tag)
        .join(INDEX_FILE)
}

pub fn tag_url(tag: &str) -> String {
    format!("/{}/{}/", TAGS_DIR, tag)
}

pub fn tags_index_path(config: &Config) -> PathBuf {
    config.destination_directory.join(TAGS_DIR).join(INDEX_FILE)
}

pub fn tag_feed_path(config: &Config, tag: &str) -> PathBuf {
    config
        .destination_directory
        .join(FEEDS_DIR)
        .join(format!("{}.{}", tag, FEED_EXTENSION))
}

pub fn tag_feed_url(tag: &str) -> String {
    format!("/{}/{}.{}", FEEDS_DIR, tag, FEED_EXTENSION)
}

/// The site feed's URL, derived from `config.feed_path`.
pub fn feed_url(config: &Config) -> String {
    match config.feed_path.strip_prefix(&config.destination_directory) {
        Ok(relative) => format!("/{}", crate::source::url_path(relative)),
        Err(_) => format!("/{}/feed.{}", FEEDS_DIR, FEED_EXTENSION),
    }
}

pub fn feeds_index_path(config: &Config) -> PathBuf {
    config.destination_directory.join(FEEDS_DIR).join(INDEX_FILE)
}

/// Resolves a site-relative URL against the site's absolute base URL. A
/// base URL with a path (`https://example.org/blog/`) keeps that path.
pub fn absolute_url(site_url: &Url, relative: &str) -> Result<Url, ParseError> {
    site_url.join(relative.trim_start_matches('/'))
}
