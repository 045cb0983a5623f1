//! Exports [`Site`], which drives the four phases of a build, and
//! [`build_site`], which runs them in order:
//!
//! 1. render: walk the source tree; render posts, copy assets, recreate
//!    directories
//! 2. paginate: write the paginated index pages
//! 3. tag: write one page per tag and the tag index
//! 4. feed: write the site feed, one feed per tag and the feed index
//!
//! Each phase can be skipped. A phase recomputes the post set from the
//! filesystem, going through the [`SourceCache`] so files are read once.

use crate::cache::SourceCache;
use crate::collection::{self, feed_posts, group_by_tag, paginate};
use crate::config::Config;
use crate::feed::{self, FeedConfig, FeedLink};
use crate::layout;
use crate::post::{self, Post};
use crate::source::{IgnoreList, OutsideRootError, Source, SourceKind};
use crate::tag::Tag;
use crate::template::{self, Render, TemplateName, Templates};
use crate::value::{array, counted_tag, number, object, optional, string};
use crate::write::{self, Writer};
use gtmpl::Value;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};
use url::Url;
use walkdir::WalkDir;

/// Which phases to run, and whether to write anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Options {
    pub dry_run: bool,
    pub render: bool,
    pub paginate: bool,
    pub tag: bool,
    pub feed: bool,
}

impl Default for Options {
    /// Every phase, writing to disk.
    fn default() -> Self {
        Options {
            dry_run: false,
            render: true,
            paginate: true,
            tag: true,
            feed: true,
        }
    }
}

/// Builds the site described by `config`, using the templates in
/// `config.templates_directory`.
pub fn build_site(config: &Config, options: &Options) -> Result<()> {
    let templates = Templates::new(&config.templates_directory);
    let site = Site::new(config, &templates, options.dry_run)?;
    site.build(options)
}

/// One build of a site. Holds everything that lives for the duration of a
/// run: the read cache, the ignore list and the output [`Writer`].
pub struct Site<'a, R: Render> {
    config: &'a Config,
    renderer: &'a R,
    writer: Writer,
    cache: SourceCache,
    ignore: IgnoreList,
}

impl<'a, R: Render> Site<'a, R> {
    pub fn new(config: &'a Config, renderer: &'a R, dry_run: bool) -> Result<Site<'a, R>> {
        Ok(Site {
            config,
            renderer,
            writer: Writer::new(dry_run),
            cache: SourceCache::new(),
            ignore: IgnoreList::new(&config.ignore)?,
        })
    }

    /// Runs the phases enabled in `options`, in order.
    pub fn build(&self, options: &Options) -> Result<()> {
        if options.render {
            self.render()?;
        }
        if options.paginate {
            self.paginate()?;
        }
        if options.tag {
            self.tag()?;
        }
        if options.feed {
            self.feed()?;
        }
        Ok(())
    }

    /// All posts, most recent first.
    pub fn posts(&self) -> Result<Vec<Post>> {
        Ok(collection::posts(self.config, &self.ignore, &self.cache)?)
    }

    /// Walks the source tree. Directories are recreated, Markdown files are
    /// rendered with the `post` template and everything else is copied.
    pub fn render(&self) -> Result<()> {
        info!(
            dir = %self.config.source_directory.display(),
            dry_run = self.writer.dry_run(),
            "rendering sources"
        );
        let posts = self.posts()?;
        let tags = site_tags(&posts);
        let loaded: HashMap<&Path, &Post> =
            posts.iter().map(|post| (post.source.path(), post)).collect();

        let source_directory = &self.config.source_directory;
        let walker = WalkDir::new(source_directory)
            .min_depth(1)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()))
            .into_iter()
            .filter_entry(|entry| match entry.path().strip_prefix(source_directory) {
                Ok(relative) if self.ignore.is_ignored(relative) => {
                    debug!(path = %entry.path().display(), "ignoring source");
                    false
                }
                _ => true,
            });

        for result in walker {
            let entry = result?;
            let source = Source::from_entry(self.config, &entry)?;
            match source.kind() {
                SourceKind::Directory => self.writer.create_dir(source.destination())?,
                SourceKind::Asset => self.writer.copy(source.path(), source.destination())?,
                SourceKind::Post => {
                    // markdown outside the posts directory isn't loaded yet
                    let post = match loaded.get(source.path()) {
                        Some(post) => Cow::Borrowed(*post),
                        None => Cow::Owned(Post::load(self.config, source, &self.cache)?),
                    };
                    let html = self.renderer.render(
                        TemplateName::Post,
                        object([
                            ("post", Value::from(&*post)),
                            ("title", string(post.title.as_str())),
                            ("tags", array(&tags, |t| Value::from(t))),
                        ]),
                    )?;
                    self.writer
                        .write(post.source.destination(), html.as_bytes())?;
                }
            }
        }
        Ok(())
    }

    /// Writes the paginated index pages. Page 0 is the site root.
    pub fn paginate(&self) -> Result<()> {
        let posts = self.posts()?;
        let tags = site_tags(&posts);
        let pages = paginate(&posts, self.config.posts_per_page);
        info!(posts = posts.len(), pages = pages.len(), "paginating");

        for (index, chunk) in pages.iter().enumerate() {
            let title = match index {
                0 => self.config.site_title.clone(),
                n => format!("{} - Page {}", self.config.site_title, n),
            };
            let page_links = (0..pages.len())
                .map(|n| {
                    object([
                        ("number", number(n)),
                        ("url", string(layout::page_url(n))),
                        ("current", Value::Bool(n == index)),
                    ])
                })
                .collect();
            let prev = index.checked_sub(1).map(layout::page_url);
            let next = Some(index + 1)
                .filter(|n| *n < pages.len())
                .map(layout::page_url);

            let context = object([
                ("title", string(title)),
                ("posts", array(*chunk, |p| Value::from(p))),
                ("current_page", number(index)),
                ("pages", Value::Array(page_links)),
                ("prev", optional(prev)),
                ("next", optional(next)),
                ("tags", array(&tags, |t| Value::from(t))),
            ]);
            let html = self.renderer.render(TemplateName::Page, context)?;
            self.writer
                .write(&layout::page_path(self.config, index), html.as_bytes())?;
        }
        Ok(())
    }

    /// Writes one page per tag and the page listing all tags.
    pub fn tag(&self) -> Result<()> {
        let posts = self.posts()?;
        let by_tag = group_by_tag(&posts);
        let tags = site_tags(&posts);
        info!(tags = by_tag.len(), "writing tag pages");

        for (name, tagged) in by_tag.iter() {
            let tag = Tag::new(name);
            let context = object([
                ("title", string(format!("{} - {}", self.config.site_title, name))),
                ("tag", Value::from(&tag)),
                ("posts", array(tagged, |p| Value::from(*p))),
                ("tags", array(&tags, |t| Value::from(t))),
            ]);
            let html = self.renderer.render(TemplateName::Tag, context)?;
            self.writer
                .write(&layout::tag_path(self.config, name), html.as_bytes())?;
        }

        let context = object([
            ("title", string(format!("{} - Tags", self.config.site_title))),
            (
                "tags",
                Value::Array(
                    by_tag
                        .iter()
                        .map(|(name, tagged)| counted_tag(&Tag::new(name), tagged.len()))
                        .collect(),
                ),
            ),
        ]);
        let html = self.renderer.render(TemplateName::Tags, context)?;
        self.writer
            .write(&layout::tags_index_path(self.config), html.as_bytes())
            .map_err(Error::from)
    }

    /// Writes a feed per tag, the site feed and the page listing the feeds.
    /// The site feed is written last so it wins over a tag named like it.
    pub fn feed(&self) -> Result<()> {
        let site_url = Url::parse(&self.config.site_url).map_err(feed::Error::from)?;
        let posts = self.posts()?;
        let by_tag = group_by_tag(&posts);
        let limit = self.config.posts_in_feed;
        info!(feeds = by_tag.len() + 1, limit, "writing feeds");

        let site_feed_path = &self.config.feed_path;
        let mut links = vec![FeedLink {
            name: self.config.site_title.clone(),
            url: layout::feed_url(self.config),
        }];

        for (name, tagged) in by_tag.iter() {
            let tag = Tag::new(name);
            let path = layout::tag_feed_path(self.config, name);
            if &path == site_feed_path {
                warn!(tag = %name, "tag feed collides with the site feed");
            }
            let context = feed::feed(
                &FeedConfig {
                    title: format!("{} - {}", self.config.site_title, name),
                    site_url: &site_url,
                    link: tag.url.clone(),
                    feed_url: tag.feed_url.clone(),
                    tag: Some(&tag),
                },
                feed_posts(tagged, limit),
            )?;
            let xml = self.renderer.render(TemplateName::Feed, context)?;
            self.writer.write(&path, xml.as_bytes())?;
            links.push(FeedLink {
                name: name.clone(),
                url: tag.feed_url.clone(),
            });
        }

        let newest: Vec<&Post> = feed_posts(&posts, limit).iter().collect();
        let context = feed::feed(
            &FeedConfig {
                title: self.config.site_title.clone(),
                site_url: &site_url,
                link: layout::page_url(0),
                feed_url: layout::feed_url(self.config),
                tag: None,
            },
            &newest,
        )?;
        let xml = self.renderer.render(TemplateName::Feed, context)?;
        self.writer.write(site_feed_path, xml.as_bytes())?;

        let context = feed::feeds(&format!("{} - Feeds", self.config.site_title), &links);
        let html = self.renderer.render(TemplateName::Feeds, context)?;
        self.writer
            .write(&layout::feeds_index_path(self.config), html.as_bytes())
            .map_err(Error::from)
    }
}

// Every tag used by `posts`, sorted.
fn site_tags(posts: &[Post]) -> Vec<Tag> {
    group_by_tag(posts).keys().map(|name| Tag::new(name)).collect()
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Errors can come from loading posts,
/// walking the source tree, templating, writing output and building feeds.
#[derive(Debug)]
pub enum Error {
    /// Returned when enumerating or loading posts fails.
    Collect(collection::Error),

    /// Returned when a post fails to load during the render phase.
    Post(post::Error),

    /// Returned for errors loading or executing templates.
    Template(template::Error),

    /// Returned for errors writing the output tree.
    Write(write::Error),

    /// Returned for errors building feeds.
    Feed(feed::Error),

    /// Returned for directory-walk I/O errors.
    WalkDir(walkdir::Error),

    /// Returned when a walked path escapes the source root.
    OutsideRoot(OutsideRootError),

    /// Returned when an ignore pattern is invalid.
    IgnorePattern(glob::PatternError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Collect(err) => err.fmt(f),
            Error::Post(err) => err.fmt(f),
            Error::Template(err) => err.fmt(f),
            Error::Write(err) => err.fmt(f),
            Error::Feed(err) => err.fmt(f),
            Error::WalkDir(err) => err.fmt(f),
            Error::OutsideRoot(err) => err.fmt(f),
            Error::IgnorePattern(err) => write!(f, "Invalid ignore pattern: {}", err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Collect(err) => Some(err),
            Error::Post(err) => Some(err),
            Error::Template(err) => Some(err),
            Error::Write(err) => Some(err),
            Error::Feed(err) => Some(err),
            Error::WalkDir(err) => Some(err),
            Error::OutsideRoot(err) => Some(err),
            Error::IgnorePattern(err) => Some(err),
        }
    }
}

impl From<collection::Error> for Error {
    fn from(err: collection::Error) -> Error {
        Error::Collect(err)
    }
}

impl From<post::Error> for Error {
    fn from(err: post::Error) -> Error {
        Error::Post(err)
    }
}

impl From<template::Error> for Error {
    /// Converts [`template::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator.
    fn from(err: template::Error) -> Error {
        Error::Template(err)
    }
}

impl From<write::Error> for Error {
    /// Converts [`write::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: write::Error) -> Error {
        Error::Write(err)
    }
}

impl From<feed::Error> for Error {
    /// Converts [`feed::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: feed::Error) -> Error {
        Error::Feed(err)
    }
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}

impl From<OutsideRootError> for Error {
    fn from(err: OutsideRootError) -> Error {
        Error::OutsideRoot(err)
    }
}

impl From<glob::PatternError> for Error {
    fn from(err: glob::PatternError) -> Error {
        Error::IgnorePattern(err)
    }
}
