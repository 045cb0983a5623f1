//! Enumerates posts and arranges them: by publication date, by tag, into
//! index pages and into feeds.

use crate::cache::SourceCache;
use crate::config::Config;
use crate::post::{self, Post};
use crate::source::{IgnoreList, Source, SourceKind};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use walkdir::WalkDir;

/// Loads every post under `config.posts_directory` and returns them sorted
/// by date, most recent first. Posts published on the same date are
/// ordered by source path. A missing posts directory yields no posts.
pub fn posts(config: &Config, ignore: &IgnoreList, cache: &SourceCache) -> Result<Vec<Post>> {
    if !config.posts_directory.is_dir() {
        tracing::warn!(
            dir = %config.posts_directory.display(),
            "posts directory not found"
        );
        return Ok(Vec::new());
    }

    let mut posts = Vec::new();
    let mut destinations: HashMap<PathBuf, PathBuf> = HashMap::new();
    let walker = WalkDir::new(&config.posts_directory)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()))
        .into_iter()
        .filter_entry(|entry| {
            match entry.path().strip_prefix(&config.source_directory) {
                Ok(relative) => !ignore.is_excluded(relative),
                Err(_) => true,
            }
        });
    for result in walker {
        let entry = result?;
        let source = Source::from_entry(config, &entry)?;
        if source.kind() == SourceKind::Post {
            if let Some(first) = destinations.insert(
                source.destination().to_owned(),
                source.path().to_owned(),
            ) {
                return Err(Error::DuplicateDestination {
                    destination: source.destination().to_owned(),
                    first,
                    second: source.path().to_owned(),
                });
            }
            posts.push(Post::load(config, source, cache)?);
        }
    }

    tracing::debug!(count = posts.len(), "collected posts");
    Ok(sort_by_date(group_by_date(posts)))
}

/// Groups posts by publication date. Each group is ordered by source path
/// so the result doesn't depend on filesystem enumeration order.
pub fn group_by_date(posts: Vec<Post>) -> BTreeMap<NaiveDate, Vec<Post>> {
    let mut groups: BTreeMap<NaiveDate, Vec<Post>> = BTreeMap::new();
    for post in posts {
        groups.entry(post.date_published).or_default().push(post);
    }
    for group in groups.values_mut() {
        group.sort_by(|a, b| a.source.path().cmp(b.source.path()));
    }
    groups
}

/// Flattens date groups, most recent date first.
pub fn sort_by_date(groups: BTreeMap<NaiveDate, Vec<Post>>) -> Vec<Post> {
    groups.into_iter().rev().flat_map(|(_, group)| group).collect()
}

/// Splits `items` into pages of `page_size` (at least 1). Every page but the
/// last is full, and an empty input gives no pages.
pub fn paginate<T>(items: &[T], page_size: usize) -> Vec<&[T]> {
    items.chunks(page_size.max(1)).collect()
}

/// Groups posts by tag. Keys are sorted; each list keeps the order of
/// `posts`.
pub fn group_by_tag(posts: &[Post]) -> BTreeMap<String, Vec<&Post>> {
    let mut tags: BTreeMap<String, Vec<&Post>> = BTreeMap::new();
    for post in posts {
        for tag in post.tags.iter() {
            tags.entry(tag.clone()).or_default().push(post);
        }
    }
    tags
}

/// The newest `limit` posts of a date-sorted sequence.
pub fn feed_posts<T>(posts: &[T], limit: usize) -> &[T] {
    &posts[..posts.len().min(limit)]
}

/// The result of a fallible collection operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error enumerating posts.
#[derive(Debug)]
pub enum Error {
    /// Returned when a post fails to load.
    Post(post::Error),

    /// Returned for directory-walk I/O errors.
    WalkDir(walkdir::Error),

    /// Returned when a walked path escapes the source root.
    OutsideRoot(crate::source::OutsideRootError),

    /// Returned when two posts would be written to the same file, e.g.
    /// `foo.md` and `foo/index.md`.
    DuplicateDestination {
        destination: PathBuf,
        first: PathBuf,
        second: PathBuf,
    },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::Post(err) => err.fmt(f),
            Error::WalkDir(err) => err.fmt(f),
            Error::OutsideRoot(err) => err.fmt(f),
            Error::DuplicateDestination {
                destination,
                first,
                second,
            } => write!(
                f,
                "{:?} and {:?} both render to {:?}",
                first, second, destination
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Post(err) => Some(err),
            Error::WalkDir(err) => Some(err),
            Error::OutsideRoot(err) => Some(err),
            Error::DuplicateDestination { .. } => None,
        }
    }
}

impl From<post::Error> for Error {
    fn from(err: post::Error) -> Error {
        Error::Post(err)
    }
}

impl From<walkdir::Error> for Error {
    /// Converts a [`walkdir::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator while walking directories.
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}

impl From<crate::source::OutsideRootError> for Error {
    fn from(err: crate::source::OutsideRootError) -> Error {
        Error::OutsideRoot(err)
    }
}
